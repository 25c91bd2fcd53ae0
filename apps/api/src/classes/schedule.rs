use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::errors::AppError;
use crate::models::class::{ClassType, GymClass};
use crate::store::{GymStore, NewClass, NewClassType};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassTypeInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassInput {
    pub class_type_id: i32,
    pub trainer_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[validate(range(min = 1, max = 1000, message = "Capacity must be between 1 and 1000"))]
    pub max_capacity: i32,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetClassActiveInput {
    pub id: i32,
    pub is_active: bool,
}

pub async fn create_class_type(
    store: &dyn GymStore,
    input: CreateClassTypeInput,
) -> Result<ClassType, AppError> {
    let class_type = store
        .create_class_type(NewClassType {
            name: input.name.trim().to_string(),
            description: input.description,
            icon: input.icon,
        })
        .await?;
    info!("Created class type {} ({})", class_type.id, class_type.name);
    Ok(class_type)
}

/// Schedules a class. Enrollment always starts at zero.
pub async fn create_class(store: &dyn GymStore, input: CreateClassInput) -> Result<GymClass, AppError> {
    if input.end_time <= input.start_time {
        return Err(AppError::BadRequest(
            "Class must end after it starts".to_string(),
        ));
    }
    if store.get_class_type(input.class_type_id).await?.is_none() {
        return Err(AppError::NotFound("Class type not found".to_string()));
    }
    if store.get_trainer(input.trainer_id).await?.is_none() {
        return Err(AppError::NotFound("Trainer not found".to_string()));
    }

    let class = store
        .create_class(NewClass {
            class_type_id: input.class_type_id,
            trainer_id: input.trainer_id,
            title: input.title,
            description: input.description,
            start_time: input.start_time,
            end_time: input.end_time,
            max_capacity: input.max_capacity,
            location: input.location,
            image: input.image,
        })
        .await?;

    info!(
        "Scheduled class {} '{}' at {} (capacity {})",
        class.id, class.title, class.start_time, class.max_capacity
    );
    Ok(class)
}

pub async fn set_class_active(
    store: &dyn GymStore,
    input: SetClassActiveInput,
) -> Result<GymClass, AppError> {
    store
        .set_class_active(input.id, input.is_active)
        .await?
        .ok_or_else(|| AppError::NotFound("Class not found".to_string()))
}
