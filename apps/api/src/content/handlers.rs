use axum::{extract::State, Json};
use chrono::Utc;

use crate::auth::AdminUser;
use crate::content::blog::{self, CreatePostInput, SetPublishedInput, SlugInput};
use crate::content::stories::{self, CreateStoryInput};
use crate::errors::AppError;
use crate::models::content::{BlogPost, SuccessStory};
use crate::routes::input::{Success, ValidatedJson, ValidatedQuery};
use crate::state::AppState;

/// GET /api/rpc/successStories.getPublished
pub async fn handle_get_published_stories(
    State(state): State<AppState>,
) -> Result<Json<Vec<SuccessStory>>, AppError> {
    Ok(Json(state.store()?.list_published_stories().await?))
}

/// POST /api/rpc/successStories.create
pub async fn handle_create_story(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    ValidatedJson(input): ValidatedJson<CreateStoryInput>,
) -> Result<Json<SuccessStory>, AppError> {
    Ok(Json(stories::create_story(state.store()?, input).await?))
}

/// POST /api/rpc/successStories.setPublished
pub async fn handle_set_story_published(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    ValidatedJson(input): ValidatedJson<SetPublishedInput>,
) -> Result<Json<Success>, AppError> {
    stories::set_published(state.store()?, input.id, input.is_published).await?;
    Ok(Json(Success::ok()))
}

/// GET /api/rpc/blog.getPublished
pub async fn handle_get_published_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<BlogPost>>, AppError> {
    Ok(Json(state.store()?.list_published_posts().await?))
}

/// GET /api/rpc/blog.getBySlug
///
/// Drafts are invisible here; a miss is `null`, not an error.
pub async fn handle_get_post_by_slug(
    State(state): State<AppState>,
    ValidatedQuery(input): ValidatedQuery<SlugInput>,
) -> Result<Json<Option<BlogPost>>, AppError> {
    Ok(Json(
        state.store()?.get_published_post_by_slug(&input.slug).await?,
    ))
}

/// POST /api/rpc/blog.create
pub async fn handle_create_post(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ValidatedJson(input): ValidatedJson<CreatePostInput>,
) -> Result<Json<BlogPost>, AppError> {
    Ok(Json(blog::create_post(state.store()?, &admin, input).await?))
}

/// POST /api/rpc/blog.setPublished
pub async fn handle_set_post_published(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    ValidatedJson(input): ValidatedJson<SetPublishedInput>,
) -> Result<Json<Success>, AppError> {
    blog::set_published(state.store()?, input, Utc::now()).await?;
    Ok(Json(Success::ok()))
}
