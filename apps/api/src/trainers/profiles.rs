use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::errors::AppError;
use crate::models::trainer::Trainer;
use crate::store::{GymStore, NewTrainer};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrainerInput {
    pub user_id: i32,
    #[validate(length(max = 255))]
    pub specialization: Option<String>,
    #[validate(length(max = 5000))]
    pub bio: Option<String>,
    #[validate(range(min = 0, max = 80))]
    pub experience: Option<i32>,
    pub image: Option<String>,
}

/// Attaches a trainer profile to an existing user. Members are promoted to
/// the trainer role; admins keep theirs. The store enforces one profile per
/// user, so concurrent requests for the same user yield one profile.
pub async fn create_trainer(
    store: &dyn GymStore,
    input: CreateTrainerInput,
) -> Result<Trainer, AppError> {
    let user = store
        .get_user(input.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let trainer = store
        .create_trainer(NewTrainer {
            user_id: user.id,
            specialization: input.specialization,
            bio: input.bio,
            experience: input.experience,
            image: input.image,
        })
        .await?;

    info!("Created trainer {} for user {}", trainer.id, user.id);
    Ok(trainer)
}
