//! API endpoints.

mod admin;
mod rounds;
mod votes;

use axum::Router;
use ovation_common::AppError;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/votes", votes::router())
        .nest("/rounds", rounds::router())
        .nest("/admin", admin::router())
        .fallback(unknown_route)
}

/// Unknown routes answer with the same error shape as everything else.
async fn unknown_route() -> AppError {
    AppError::NotFound("unknown route".to_string())
}
