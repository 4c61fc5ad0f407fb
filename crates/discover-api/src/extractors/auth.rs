//! Authentication extractor
//!
//! Resolves the bearer token in the Authorization header to a user key.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use discover_core::UserKey;

use crate::response::ApiError;
use crate::state::AppState;

/// Signed-in viewer extracted from the bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub key: UserKey,
}

impl AuthUser {
    pub fn new(key: UserKey) -> Self {
        Self { key }
    }
}

fn identify(state: &AppState, token: &str) -> Result<UserKey, ApiError> {
    state.jwt_service().identify(token).map_err(|e| {
        tracing::warn!(error = %e, "Rejected access token");
        ApiError::InvalidToken
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);
        let key = identify(&app_state, bearer.token())?;
        Ok(AuthUser::new(key))
    }
}

/// Optional viewer
///
/// `None` when no Authorization header is present; an invalid token is
/// still rejected.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    pub fn key(&self) -> Option<&UserKey> {
        self.0.as_ref().map(|user| &user.key)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => {
                let app_state = AppState::from_ref(state);
                let key = identify(&app_state, bearer.token())?;
                Ok(OptionalAuthUser(Some(AuthUser::new(key))))
            }
            Err(_) => Ok(OptionalAuthUser(None)),
        }
    }
}
