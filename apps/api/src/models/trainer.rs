use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Trainer {
    pub id: i32,
    pub user_id: i32,
    pub specialization: Option<String>,
    pub bio: Option<String>,
    /// Years of experience.
    pub experience: Option<i32>,
    pub image: Option<String>,
    /// Mean review rating, 0.00 – 5.00.
    pub rating: Decimal,
    pub total_reviews: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TrainerReview {
    pub id: i32,
    pub trainer_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
