//! Request extractors.

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use ovation_common::AppError;

use crate::middleware::AppState;

/// Editor authentication extractor.
///
/// Editor routes take this as an argument. The request must carry
/// `Authorization: Bearer <token>` matching the configured editor token.
/// An empty configured token rejects every request.
#[derive(Debug, Clone, Copy)]
pub struct EditorAuth;

impl FromRequestParts<AppState> for EditorAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        match token {
            Some(token) if !state.editor_token.is_empty() && token == state.editor_token => Ok(Self),
            _ => Err(AppError::Unauthorized),
        }
    }
}
