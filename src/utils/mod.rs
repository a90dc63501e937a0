/// Display helpers (dates, truncation).
pub mod format;
/// `lexis.toml` loading, defaults and environment overrides.
pub mod toml_config;
