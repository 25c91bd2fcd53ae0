use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use validator::{Validate, ValidationError};

use crate::errors::AppError;
use crate::models::content::BlogPost;
use crate::models::user::User;
use crate::store::{GymStore, NewBlogPost};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 255), custom = "slug_chars")]
    pub slug: String,
    pub content: Option<String>,
    #[validate(length(max = 500))]
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetPublishedInput {
    pub id: i32,
    pub is_published: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SlugInput {
    #[validate(length(min = 1, max = 255))]
    pub slug: String,
}

/// Lowercase ASCII letters, digits and hyphens only.
fn slug_chars(slug: &str) -> Result<(), ValidationError> {
    let valid = slug
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
    if !valid {
        return Err(ValidationError::new("slug"));
    }
    Ok(())
}

/// Stores a draft post authored by `author`.
pub async fn create_post(
    store: &dyn GymStore,
    author: &User,
    input: CreatePostInput,
) -> Result<BlogPost, AppError> {
    let post = store
        .create_post(NewBlogPost {
            author_id: author.id,
            title: input.title,
            slug: input.slug,
            content: input.content,
            excerpt: input.excerpt,
            featured_image: input.featured_image,
            category: input.category,
        })
        .await?;
    info!("User {} drafted post {} ({})", author.id, post.id, post.slug);
    Ok(post)
}

pub async fn set_published(
    store: &dyn GymStore,
    input: SetPublishedInput,
    now: DateTime<Utc>,
) -> Result<BlogPost, AppError> {
    let post = store
        .set_post_published(input.id, input.is_published, now)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;
    info!("Post {} published: {}", post.id, post.is_published);
    Ok(post)
}
