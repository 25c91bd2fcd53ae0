use serde::Deserialize;
use tracing::debug;
use validator::Validate;

use crate::errors::AppError;
use crate::models::engagement::Notification;
use crate::models::user::User;
use crate::store::GymStore;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadInput {
    pub notification_id: i32,
}

/// Marks one of `user`'s notifications read. Admins may mark any.
pub async fn mark_as_read(
    store: &dyn GymStore,
    user: &User,
    notification_id: i32,
) -> Result<Notification, AppError> {
    let notification = store
        .get_notification(notification_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;
    if notification.user_id != user.id && !user.is_admin() {
        return Err(AppError::Forbidden);
    }
    if notification.is_read {
        return Ok(notification);
    }

    debug!("User {} read notification {notification_id}", user.id);
    store
        .mark_notification_read(notification_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))
}
