use axum::{extract::State, Json};

use crate::auth::AdminUser;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;
use crate::store::AdminStats;

/// GET /api/rpc/admin.stats
pub async fn handle_stats(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<AdminStats>, AppError> {
    Ok(Json(state.store()?.admin_stats().await?))
}

/// GET /api/rpc/admin.listUsers
pub async fn handle_list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.store()?.list_users().await?))
}
