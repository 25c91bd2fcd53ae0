use axum::{extract::State, Json};

use crate::auth::AuthUser;
use crate::engagement::inbox::{mark_as_read, MarkReadInput};
use crate::errors::AppError;
use crate::models::engagement::{Notification, UserReward};
use crate::routes::input::{Success, ValidatedJson};
use crate::state::AppState;

/// GET /api/rpc/notifications.getUserNotifications
pub async fn handle_get_notifications(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Notification>>, AppError> {
    Ok(Json(state.store()?.list_user_notifications(user.id).await?))
}

/// POST /api/rpc/notifications.markAsRead
pub async fn handle_mark_as_read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(input): ValidatedJson<MarkReadInput>,
) -> Result<Json<Success>, AppError> {
    mark_as_read(state.store()?, &user, input.notification_id).await?;
    Ok(Json(Success::ok()))
}

/// GET /api/rpc/rewards.getUserRewards
///
/// `null` when the user has never earned points.
pub async fn handle_get_user_rewards(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Option<UserReward>>, AppError> {
    Ok(Json(state.store()?.get_user_rewards(user.id).await?))
}
