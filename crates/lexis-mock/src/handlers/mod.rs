pub mod analytics;
pub mod auth;
pub mod collaboration;
pub mod documents;
pub mod notifications;
pub mod sharing;
pub mod subscriptions;
pub mod users;
