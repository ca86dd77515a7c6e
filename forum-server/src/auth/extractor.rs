//! CurrentUser extractors
//!
//! The auth middleware has already validated the token and resolved
//! permissions; these extractors only read the result back.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use std::convert::Infallible;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppError;

/// Required caller: rejects anonymous requests with 401
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(AppError::not_authenticated)
    }
}

/// `Option<CurrentUser>` for public routes that adapt to the caller
impl OptionalFromRequestParts<ServerState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentUser>().cloned())
    }
}
