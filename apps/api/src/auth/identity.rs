//! Identity-provider boundary: signed sign-in assertions and the user upsert.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use tracing::info;
use validator::Validate;

use crate::auth::roles::resolve_role;
use crate::errors::AppError;
use crate::models::user::{Role, User};
use crate::store::{GymStore, UpsertUser};

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-identity-signature";

/// How far an assertion's `iat` may sit from the server clock, either way.
pub const ASSERTION_MAX_AGE_SECS: i64 = 300;

/// Profile fields the identity provider sends after a successful login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IdentityAssertion {
    #[validate(length(min = 1, max = 64))]
    pub open_id: String,
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 64))]
    pub login_method: Option<String>,
    pub role: Option<Role>,
    /// Issue time in unix seconds; part of the signed body.
    pub iat: i64,
}

/// Checks a hex HMAC-SHA256 of `body` keyed by the shared callback secret.
/// Comparison is constant-time.
pub fn verify_signature(secret: &str, body: &[u8], signature_hex: &str) -> bool {
    let Ok(expected) = hex::decode(signature_hex.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Rejects assertions issued outside the allowed window around `now`, so a
/// captured body and signature stop working after a few minutes.
pub fn check_freshness(assertion: &IdentityAssertion, now: DateTime<Utc>) -> Result<(), AppError> {
    let skew = now.timestamp().saturating_sub(assertion.iat).saturating_abs();
    if skew > ASSERTION_MAX_AGE_SECS {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

/// Inserts or refreshes the user behind an identity assertion.
pub async fn sign_in(
    store: &dyn GymStore,
    owner_open_id: Option<&str>,
    assertion: IdentityAssertion,
    now: DateTime<Utc>,
) -> Result<User, AppError> {
    let role = resolve_role(&assertion.open_id, assertion.role, owner_open_id);
    let user = store
        .upsert_user(UpsertUser {
            open_id: assertion.open_id,
            name: assertion.name,
            email: assertion.email,
            login_method: assertion.login_method,
            role,
            signed_in_at: now,
        })
        .await?;
    info!("User {} signed in (role {:?})", user.id, user.role);
    Ok(user)
}

#[cfg(test)]
pub fn sign_body(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac accepts any key");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}
