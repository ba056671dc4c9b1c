mod auth;

pub use auth::MetricsAuth;
