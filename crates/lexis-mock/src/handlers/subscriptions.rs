use crate::{
    auth::AuthUser,
    error::Result,
    models::{BillingPortal, CheckoutBody, CheckoutSession, SubscriptionStatus},
    store::MockStore,
};
use axum::{extract::State, Json};
use std::sync::Arc;

pub async fn create_checkout(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CheckoutBody>,
) -> Result<Json<CheckoutSession>> {
    store.checkout(&user, &payload.plan).map(Json)
}

pub async fn status(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
) -> Result<Json<SubscriptionStatus>> {
    store.subscription_status(&user).map(Json)
}

pub async fn portal(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
) -> Result<Json<BillingPortal>> {
    store.billing_portal(&user).map(Json)
}
