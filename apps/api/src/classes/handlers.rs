use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{AdminUser, AuthUser};
use crate::classes::booking::{self, BookingIdInput, ClassIdInput};
use crate::classes::schedule::{
    self, CreateClassInput, CreateClassTypeInput, SetClassActiveInput,
};
use crate::errors::AppError;
use crate::models::class::{ClassBooking, ClassType, GymClass};
use crate::routes::input::{Success, ValidatedJson, ValidatedQuery};
use crate::state::AppState;
use crate::store::ClassFilter;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListClassesInput {
    pub upcoming_only: Option<bool>,
}

#[derive(Deserialize, Validate)]
pub struct GetClassInput {
    pub id: i32,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ByTrainerInput {
    pub trainer_id: i32,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ByTypeInput {
    pub class_type_id: i32,
}

#[derive(Serialize)]
pub struct BookClassResponse {
    pub success: bool,
    pub booking: ClassBooking,
}

/// GET /api/rpc/classes.getAll
pub async fn handle_get_classes(
    State(state): State<AppState>,
    ValidatedQuery(input): ValidatedQuery<ListClassesInput>,
) -> Result<Json<Vec<GymClass>>, AppError> {
    let filter = ClassFilter {
        starts_at_or_after: input.upcoming_only.unwrap_or(false).then(Utc::now),
        ..ClassFilter::default()
    };
    Ok(Json(state.store()?.list_classes(filter).await?))
}

/// GET /api/rpc/classes.getById
pub async fn handle_get_class(
    State(state): State<AppState>,
    ValidatedQuery(input): ValidatedQuery<GetClassInput>,
) -> Result<Json<GymClass>, AppError> {
    let class = state
        .store()?
        .get_class(input.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Class not found".to_string()))?;
    Ok(Json(class))
}

/// GET /api/rpc/classes.getByTrainer
pub async fn handle_get_classes_by_trainer(
    State(state): State<AppState>,
    ValidatedQuery(input): ValidatedQuery<ByTrainerInput>,
) -> Result<Json<Vec<GymClass>>, AppError> {
    let filter = ClassFilter {
        trainer_id: Some(input.trainer_id),
        ..ClassFilter::default()
    };
    Ok(Json(state.store()?.list_classes(filter).await?))
}

/// GET /api/rpc/classes.getByType
pub async fn handle_get_classes_by_type(
    State(state): State<AppState>,
    ValidatedQuery(input): ValidatedQuery<ByTypeInput>,
) -> Result<Json<Vec<GymClass>>, AppError> {
    let filter = ClassFilter {
        class_type_id: Some(input.class_type_id),
        ..ClassFilter::default()
    };
    Ok(Json(state.store()?.list_classes(filter).await?))
}

/// GET /api/rpc/classTypes.getAll
pub async fn handle_get_class_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClassType>>, AppError> {
    Ok(Json(state.store()?.list_class_types().await?))
}

/// GET /api/rpc/classBookings.getUserBookings
pub async fn handle_get_user_bookings(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<ClassBooking>>, AppError> {
    Ok(Json(state.store()?.list_user_bookings(user.id).await?))
}

/// GET /api/rpc/classBookings.checkBooking
pub async fn handle_check_booking(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedQuery(input): ValidatedQuery<ClassIdInput>,
) -> Result<Json<Option<ClassBooking>>, AppError> {
    Ok(Json(
        state.store()?.find_booking(user.id, input.class_id).await?,
    ))
}

/// POST /api/rpc/classBookings.bookClass
pub async fn handle_book_class(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(input): ValidatedJson<ClassIdInput>,
) -> Result<Json<BookClassResponse>, AppError> {
    let booking = booking::book_class(state.store()?, &user, input.class_id).await?;
    Ok(Json(BookClassResponse {
        success: true,
        booking,
    }))
}

/// POST /api/rpc/classBookings.cancelBooking
pub async fn handle_cancel_booking(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(input): ValidatedJson<BookingIdInput>,
) -> Result<Json<Success>, AppError> {
    booking::cancel_booking(
        state.store()?,
        &user,
        input.booking_id,
        state.config.seat_policy,
        Utc::now(),
    )
    .await?;
    Ok(Json(Success::ok()))
}

/// POST /api/rpc/classBookings.markAttended
pub async fn handle_mark_attended(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    ValidatedJson(input): ValidatedJson<BookingIdInput>,
) -> Result<Json<Success>, AppError> {
    booking::mark_attended(state.store()?, input.booking_id).await?;
    Ok(Json(Success::ok()))
}

/// GET /api/rpc/classes.getEnrollments
pub async fn handle_get_enrollments(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    ValidatedQuery(input): ValidatedQuery<ClassIdInput>,
) -> Result<Json<Vec<ClassBooking>>, AppError> {
    Ok(Json(state.store()?.list_class_bookings(input.class_id).await?))
}

/// POST /api/rpc/classTypes.create
pub async fn handle_create_class_type(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    ValidatedJson(input): ValidatedJson<CreateClassTypeInput>,
) -> Result<Json<ClassType>, AppError> {
    Ok(Json(schedule::create_class_type(state.store()?, input).await?))
}

/// POST /api/rpc/classes.create
pub async fn handle_create_class(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    ValidatedJson(input): ValidatedJson<CreateClassInput>,
) -> Result<Json<GymClass>, AppError> {
    Ok(Json(schedule::create_class(state.store()?, input).await?))
}

/// POST /api/rpc/classes.setActive
pub async fn handle_set_class_active(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    ValidatedJson(input): ValidatedJson<SetClassActiveInput>,
) -> Result<Json<Success>, AppError> {
    schedule::set_class_active(state.store()?, input).await?;
    Ok(Json(Success::ok()))
}
