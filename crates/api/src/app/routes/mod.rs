use axum::{
    routing::{get, post},
    Router,
};

pub mod statements;
pub mod system;
pub mod users;

/// Endpoints reachable without a token.
pub fn public_router() -> Router {
    Router::new()
        .route("/users", post(users::create_user))
        .route("/sessions", post(users::authenticate))
}

/// Endpoints behind the bearer-token middleware.
pub fn protected_router() -> Router {
    Router::new()
        .route("/profile", get(users::show_profile))
        .nest("/statements", statements::router())
}
