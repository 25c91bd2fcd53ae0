use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use validator::{Validate, ValidationError};

use crate::errors::AppError;
use crate::models::membership::{SubscriptionPlan, UserSubscription};
use crate::store::{GymStore, NewPlan};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(custom = "non_negative")]
    pub monthly_price: Decimal,
    #[validate(custom = "non_negative")]
    pub yearly_price: Decimal,
    /// Omitted for unlimited plans.
    #[validate(range(min = 1, message = "At least one class per month"))]
    pub classes_per_month: Option<i32>,
    #[serde(default)]
    pub features: Vec<String>,
}

fn non_negative(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("negative_price"));
    }
    Ok(())
}

pub async fn create_plan(
    store: &dyn GymStore,
    input: CreatePlanInput,
) -> Result<SubscriptionPlan, AppError> {
    let features = input
        .features
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();

    let plan = store
        .create_plan(NewPlan {
            name: input.name,
            description: input.description,
            monthly_price: input.monthly_price.round_dp(2),
            yearly_price: input.yearly_price.round_dp(2),
            classes_per_month: input.classes_per_month,
            features,
        })
        .await?;

    info!("Created subscription plan {} ({})", plan.id, plan.name);
    Ok(plan)
}

/// The subscription covering `now`, if any. The store narrows by status and
/// end date; the row is re-checked against the model's own rule.
pub async fn active_subscription(
    store: &dyn GymStore,
    user_id: i32,
    now: DateTime<Utc>,
) -> Result<Option<UserSubscription>, AppError> {
    Ok(store
        .active_subscription(user_id, now)
        .await?
        .filter(|s| s.is_active_at(now)))
}
