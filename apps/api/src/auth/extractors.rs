use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::auth::session::token_from_headers;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

/// The signed-in user, if any. Missing, invalid or expired sessions resolve to
/// `None` rather than an error.
pub struct CurrentUser(pub Option<User>);

/// Protected tier: rejects with `Unauthorized` when no user is signed in.
pub struct AuthUser(pub User);

/// Admin tier: `Unauthorized` without a session, `Forbidden` for non-admins.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let Some(token) = token_from_headers(&parts.headers) else {
            return Ok(CurrentUser(None));
        };
        let Some(claims) = state.sessions.verify(&token) else {
            return Ok(CurrentUser(None));
        };
        let user = state.store()?.get_user_by_open_id(&claims.sub).await?;
        Ok(CurrentUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        user.map(AuthUser).ok_or(AppError::Unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Forbidden);
        }
        Ok(AdminUser(user))
    }
}
