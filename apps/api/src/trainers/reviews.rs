use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::errors::AppError;
use crate::models::trainer::TrainerReview;
use crate::models::user::User;
use crate::store::{GymStore, NewReview};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddReviewInput {
    pub trainer_id: i32,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

/// Records a review and refreshes the trainer's rating and review count.
pub async fn add_review(
    store: &dyn GymStore,
    author: &User,
    input: AddReviewInput,
) -> Result<TrainerReview, AppError> {
    let review = store
        .add_review(NewReview {
            trainer_id: input.trainer_id,
            user_id: author.id,
            rating: input.rating,
            comment: input.comment,
        })
        .await?
        .ok_or_else(|| AppError::NotFound("Trainer not found".to_string()))?;

    info!(
        "User {} reviewed trainer {} ({} stars)",
        author.id, review.trainer_id, review.rating
    );
    Ok(review)
}
