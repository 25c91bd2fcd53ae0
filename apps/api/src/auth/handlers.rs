use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;
use validator::Validate;

use crate::auth::identity::{self, IdentityAssertion, SIGNATURE_HEADER};
use crate::auth::session::{clear_session_cookie, session_cookie};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::user::User;
use crate::routes::input::{validation_error, Success};
use crate::state::AppState;

#[derive(Serialize)]
pub struct SignInResponse {
    pub user: User,
    pub token: String,
}

/// GET /api/rpc/auth.me
pub async fn handle_me(CurrentUser(user): CurrentUser) -> Json<Option<User>> {
    Json(user)
}

/// POST /api/rpc/auth.logout
pub async fn handle_logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_session_cookie(state.config.cookie_secure))],
        Json(Success::ok()),
    )
}

/// POST /api/oauth/callback
pub async fn handle_oauth_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let Some(secret) = state.config.identity_callback_secret.as_deref() else {
        warn!("Identity callback received but IDENTITY_CALLBACK_SECRET is not configured");
        return Err(AppError::Unauthorized);
    };
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;
    if !identity::verify_signature(secret, &body, signature) {
        warn!("Identity callback rejected: signature mismatch");
        return Err(AppError::Unauthorized);
    }

    let assertion: IdentityAssertion = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid identity assertion: {e}")))?;
    assertion.validate().map_err(validation_error)?;

    let now = Utc::now();
    if let Err(e) = identity::check_freshness(&assertion, now) {
        warn!(
            "Identity callback rejected: assertion for {} issued at {} is stale",
            assertion.open_id, assertion.iat
        );
        return Err(e);
    }

    let user = identity::sign_in(
        state.store()?,
        state.config.owner_open_id.as_deref(),
        assertion,
        now,
    )
    .await?;
    let token = state.sessions.issue(&user)?;
    let cookie = session_cookie(
        &token,
        state.sessions.ttl_secs(),
        state.config.cookie_secure,
    );

    Ok(([(header::SET_COOKIE, cookie)], Json(SignInResponse { user, token })))
}
