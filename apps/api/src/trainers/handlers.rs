use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use crate::auth::{AdminUser, AuthUser};
use crate::errors::AppError;
use crate::models::trainer::{Trainer, TrainerReview};
use crate::routes::input::{Success, ValidatedJson, ValidatedQuery};
use crate::state::AppState;
use crate::trainers::profiles::{create_trainer, CreateTrainerInput};
use crate::trainers::reviews::{add_review, AddReviewInput};

#[derive(Deserialize, Validate)]
pub struct TrainerIdInput {
    pub id: i32,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserIdInput {
    pub user_id: i32,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsInput {
    pub trainer_id: i32,
}

/// GET /api/rpc/trainers.getAll
pub async fn handle_get_trainers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Trainer>>, AppError> {
    Ok(Json(state.store()?.list_active_trainers().await?))
}

/// GET /api/rpc/trainers.getById
pub async fn handle_get_trainer(
    State(state): State<AppState>,
    ValidatedQuery(input): ValidatedQuery<TrainerIdInput>,
) -> Result<Json<Trainer>, AppError> {
    let trainer = state
        .store()?
        .get_trainer(input.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Trainer not found".to_string()))?;
    Ok(Json(trainer))
}

/// GET /api/rpc/trainers.getByUserId
pub async fn handle_get_trainer_by_user(
    State(state): State<AppState>,
    ValidatedQuery(input): ValidatedQuery<UserIdInput>,
) -> Result<Json<Option<Trainer>>, AppError> {
    Ok(Json(state.store()?.get_trainer_by_user(input.user_id).await?))
}

/// GET /api/rpc/trainers.getReviews
pub async fn handle_get_reviews(
    State(state): State<AppState>,
    ValidatedQuery(input): ValidatedQuery<ReviewsInput>,
) -> Result<Json<Vec<TrainerReview>>, AppError> {
    Ok(Json(state.store()?.list_reviews(input.trainer_id).await?))
}

/// POST /api/rpc/trainers.addReview
pub async fn handle_add_review(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(input): ValidatedJson<AddReviewInput>,
) -> Result<Json<Success>, AppError> {
    add_review(state.store()?, &user, input).await?;
    Ok(Json(Success::ok()))
}

/// POST /api/rpc/trainers.create
pub async fn handle_create_trainer(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    ValidatedJson(input): ValidatedJson<CreateTrainerInput>,
) -> Result<Json<Trainer>, AppError> {
    Ok(Json(create_trainer(state.store()?, input).await?))
}
