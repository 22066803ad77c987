use axum::{
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod duties;
pub mod duty_types;
pub mod duty_workers;
pub mod system;

/// Router for endpoints that do their own credential handling.
pub fn public_router() -> Router {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
}

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/auth/me", get(auth::me))
        .nest("/duties", duties::router())
        .nest("/dutyTypes", duty_types::router())
        .nest("/dutyWorkers", duty_workers::router())
}
