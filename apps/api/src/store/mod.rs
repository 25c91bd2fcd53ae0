//! Persistence seam.
//!
//! `AppState` carries an `Arc<dyn GymStore>`; the Postgres backend serves
//! production and the in-memory backend serves tests. Every multi-step write
//! (booking, cancellation, review) is a single trait call so each backend can
//! make it atomic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::class::{ClassBooking, ClassType, GymClass};
use crate::models::content::{BlogPost, SuccessStory};
use crate::models::engagement::{Notification, UserReward};
use crate::models::membership::{Payment, SubscriptionPlan, UserSubscription};
use crate::models::trainer::{Trainer, TrainerReview};
use crate::models::user::{Role, User};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

/// Fields applied when an external identity signs in.
/// `None` leaves the stored value untouched on update.
#[derive(Debug, Clone)]
pub struct UpsertUser {
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    /// Resolved role; `None` keeps the existing role, or `member` for a new row.
    pub role: Option<Role>,
    pub signed_in_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTrainer {
    pub user_id: i32,
    pub specialization: Option<String>,
    pub bio: Option<String>,
    pub experience: Option<i32>,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub trainer_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewClassType {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewClass {
    pub class_type_id: i32,
    pub trainer_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_capacity: i32,
    pub location: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPlan {
    pub name: String,
    pub description: Option<String>,
    pub monthly_price: Decimal,
    pub yearly_price: Decimal,
    pub classes_per_month: Option<i32>,
    pub features: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewBlogPost {
    pub author_id: i32,
    pub title: String,
    pub slug: String,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewSuccessStory {
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub before_image: Option<String>,
    pub after_image: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i32,
    pub kind: String,
    pub title: String,
    pub message: Option<String>,
}

/// Active classes matching every populated field, ascending by start time.
#[derive(Debug, Clone, Default)]
pub struct ClassFilter {
    /// Keep classes starting at or after this instant.
    pub starts_at_or_after: Option<DateTime<Utc>>,
    pub trainer_id: Option<i32>,
    pub class_type_id: Option<i32>,
}

/// Result of the atomic booking sequence, checked in this order.
#[derive(Debug, Clone)]
pub enum BookingOutcome {
    AlreadyBooked,
    ClassNotFound,
    ClassFull,
    /// The booking row, plus the class as it stands after the increment.
    Booked {
        booking: ClassBooking,
        class: GymClass,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: i64,
    pub active_classes: i64,
    pub active_trainers: i64,
    /// Sum of completed payments.
    pub revenue: Decimal,
}

#[async_trait]
pub trait GymStore: Send + Sync {
    /// Short backend name reported by the health endpoint.
    fn backend_tag(&self) -> &'static str;

    // Users
    async fn upsert_user(&self, user: UpsertUser) -> Result<User, AppError>;
    async fn get_user_by_open_id(&self, open_id: &str) -> Result<Option<User>, AppError>;
    async fn get_user(&self, id: i32) -> Result<Option<User>, AppError>;
    async fn list_users(&self) -> Result<Vec<User>, AppError>;

    // Trainers and reviews
    async fn list_active_trainers(&self) -> Result<Vec<Trainer>, AppError>;
    async fn get_trainer(&self, id: i32) -> Result<Option<Trainer>, AppError>;
    async fn get_trainer_by_user(&self, user_id: i32) -> Result<Option<Trainer>, AppError>;
    /// Inserts the profile and promotes a member owner to the trainer role in
    /// one unit of work. A user holds at most one profile; a second insert
    /// fails with `BadRequest`.
    async fn create_trainer(&self, trainer: NewTrainer) -> Result<Trainer, AppError>;
    async fn list_reviews(&self, trainer_id: i32) -> Result<Vec<TrainerReview>, AppError>;
    /// Inserts the review and recomputes the trainer's rating and review count
    /// in the same unit of work. Returns `None` when the trainer is missing.
    async fn add_review(&self, review: NewReview) -> Result<Option<TrainerReview>, AppError>;

    // Class types and classes
    async fn list_class_types(&self) -> Result<Vec<ClassType>, AppError>;
    async fn get_class_type(&self, id: i32) -> Result<Option<ClassType>, AppError>;
    async fn create_class_type(&self, class_type: NewClassType) -> Result<ClassType, AppError>;
    async fn list_classes(&self, filter: ClassFilter) -> Result<Vec<GymClass>, AppError>;
    async fn get_class(&self, id: i32) -> Result<Option<GymClass>, AppError>;
    async fn create_class(&self, class: NewClass) -> Result<GymClass, AppError>;
    async fn set_class_active(&self, id: i32, is_active: bool)
        -> Result<Option<GymClass>, AppError>;

    // Bookings
    async fn list_user_bookings(&self, user_id: i32) -> Result<Vec<ClassBooking>, AppError>;
    async fn list_class_bookings(&self, class_id: i32) -> Result<Vec<ClassBooking>, AppError>;
    /// Most recent booking for the pair, whatever its status.
    async fn find_booking(
        &self,
        user_id: i32,
        class_id: i32,
    ) -> Result<Option<ClassBooking>, AppError>;
    async fn get_booking(&self, id: i32) -> Result<Option<ClassBooking>, AppError>;
    /// Duplicate check, capacity check, booking insert, enrollment increment
    /// and notification insert, atomic with respect to other bookings of the
    /// same class.
    async fn book_class(
        &self,
        user_id: i32,
        class_id: i32,
        confirmation: NewNotification,
    ) -> Result<BookingOutcome, AppError>;
    /// Moves a booked booking to cancelled. Bookings in any other status are
    /// returned unchanged; `release_seat` decrements enrollment only on the
    /// transition.
    async fn cancel_booking(
        &self,
        id: i32,
        at: DateTime<Utc>,
        release_seat: bool,
    ) -> Result<Option<ClassBooking>, AppError>;
    /// Moves a booked booking to attended; other statuses are returned unchanged.
    async fn mark_attended(&self, id: i32) -> Result<Option<ClassBooking>, AppError>;

    // Plans, subscriptions, payments
    async fn list_active_plans(&self) -> Result<Vec<SubscriptionPlan>, AppError>;
    async fn get_plan(&self, id: i32) -> Result<Option<SubscriptionPlan>, AppError>;
    async fn create_plan(&self, plan: NewPlan) -> Result<SubscriptionPlan, AppError>;
    async fn list_user_subscriptions(
        &self,
        user_id: i32,
    ) -> Result<Vec<UserSubscription>, AppError>;
    async fn active_subscription(
        &self,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> Result<Option<UserSubscription>, AppError>;
    async fn list_user_payments(&self, user_id: i32) -> Result<Vec<Payment>, AppError>;

    // Published content
    async fn list_published_stories(&self) -> Result<Vec<SuccessStory>, AppError>;
    async fn create_story(&self, story: NewSuccessStory) -> Result<SuccessStory, AppError>;
    async fn set_story_published(
        &self,
        id: i32,
        is_published: bool,
    ) -> Result<Option<SuccessStory>, AppError>;
    async fn list_published_posts(&self) -> Result<Vec<BlogPost>, AppError>;
    async fn get_published_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, AppError>;
    /// Fails with `BadRequest` when the slug is taken.
    async fn create_post(&self, post: NewBlogPost) -> Result<BlogPost, AppError>;
    /// The first publish stamps `published_at`; later toggles keep it.
    async fn set_post_published(
        &self,
        id: i32,
        is_published: bool,
        at: DateTime<Utc>,
    ) -> Result<Option<BlogPost>, AppError>;

    // Notifications and rewards
    async fn list_user_notifications(&self, user_id: i32) -> Result<Vec<Notification>, AppError>;
    async fn get_notification(&self, id: i32) -> Result<Option<Notification>, AppError>;
    async fn mark_notification_read(&self, id: i32) -> Result<Option<Notification>, AppError>;
    async fn get_user_rewards(&self, user_id: i32) -> Result<Option<UserReward>, AppError>;

    async fn admin_stats(&self) -> Result<AdminStats, AppError>;
}
