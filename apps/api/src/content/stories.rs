use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::errors::AppError;
use crate::models::content::SuccessStory;
use crate::store::{GymStore, NewSuccessStory};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoryInput {
    pub user_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub before_image: Option<String>,
    pub after_image: Option<String>,
    #[validate(length(max = 100))]
    pub duration: Option<String>,
}

pub async fn create_story(
    store: &dyn GymStore,
    input: CreateStoryInput,
) -> Result<SuccessStory, AppError> {
    let story = store
        .create_story(NewSuccessStory {
            user_id: input.user_id,
            title: input.title,
            description: input.description,
            before_image: input.before_image,
            after_image: input.after_image,
            duration: input.duration,
        })
        .await?;
    info!("Created success story {} for user {}", story.id, story.user_id);
    Ok(story)
}

pub async fn set_published(
    store: &dyn GymStore,
    id: i32,
    is_published: bool,
) -> Result<SuccessStory, AppError> {
    store
        .set_story_published(id, is_published)
        .await?
        .ok_or_else(|| AppError::NotFound("Success story not found".to_string()))
}
