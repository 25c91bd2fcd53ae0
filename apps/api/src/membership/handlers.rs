use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use crate::auth::{AdminUser, AuthUser};
use crate::errors::AppError;
use crate::membership::plans::{active_subscription, create_plan, CreatePlanInput};
use crate::models::membership::{Payment, SubscriptionPlan, UserSubscription};
use crate::routes::input::{ValidatedJson, ValidatedQuery};
use crate::state::AppState;

#[derive(Deserialize, Validate)]
pub struct PlanIdInput {
    pub id: i32,
}

/// GET /api/rpc/subscriptions.getPlans
pub async fn handle_get_plans(
    State(state): State<AppState>,
) -> Result<Json<Vec<SubscriptionPlan>>, AppError> {
    Ok(Json(state.store()?.list_active_plans().await?))
}

/// GET /api/rpc/subscriptions.getPlanById
pub async fn handle_get_plan(
    State(state): State<AppState>,
    ValidatedQuery(input): ValidatedQuery<PlanIdInput>,
) -> Result<Json<Option<SubscriptionPlan>>, AppError> {
    Ok(Json(state.store()?.get_plan(input.id).await?))
}

/// GET /api/rpc/subscriptions.getUserSubscriptions
pub async fn handle_get_user_subscriptions(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<UserSubscription>>, AppError> {
    Ok(Json(state.store()?.list_user_subscriptions(user.id).await?))
}

/// GET /api/rpc/subscriptions.getActiveSubscription
pub async fn handle_get_active_subscription(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Option<UserSubscription>>, AppError> {
    Ok(Json(
        active_subscription(state.store()?, user.id, Utc::now()).await?,
    ))
}

/// POST /api/rpc/subscriptions.createPlan
pub async fn handle_create_plan(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    ValidatedJson(input): ValidatedJson<CreatePlanInput>,
) -> Result<Json<SubscriptionPlan>, AppError> {
    Ok(Json(create_plan(state.store()?, input).await?))
}

/// GET /api/rpc/payments.getUserPayments
pub async fn handle_get_user_payments(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Payment>>, AppError> {
    Ok(Json(state.store()?.list_user_payments(user.id).await?))
}
