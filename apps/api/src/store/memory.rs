//! In-memory store for tests. One mutex guards every table, so each trait
//! call is atomic with respect to every other.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::models::class::{BookingStatus, ClassBooking, ClassType, GymClass};
use crate::models::content::{BlogPost, SuccessStory};
use crate::models::engagement::{Notification, UserReward};
use crate::models::membership::{
    Payment, PaymentStatus, SubscriptionPlan, SubscriptionStatus, UserSubscription,
};
use crate::models::trainer::{Trainer, TrainerReview};
use crate::models::user::{Role, User};
use crate::store::{
    AdminStats, BookingOutcome, ClassFilter, GymStore, NewBlogPost, NewClass, NewClassType,
    NewNotification, NewPlan, NewReview, NewSuccessStory, NewTrainer, UpsertUser,
};

#[derive(Default)]
struct Tables {
    next_id: i32,
    users: Vec<User>,
    trainers: Vec<Trainer>,
    reviews: Vec<TrainerReview>,
    class_types: Vec<ClassType>,
    classes: Vec<GymClass>,
    bookings: Vec<ClassBooking>,
    plans: Vec<SubscriptionPlan>,
    subscriptions: Vec<UserSubscription>,
    payments: Vec<Payment>,
    stories: Vec<SuccessStory>,
    posts: Vec<BlogPost>,
    notifications: Vec<Notification>,
    rewards: Vec<UserReward>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_subscription(
        &self,
        user_id: i32,
        plan_id: i32,
        status: SubscriptionStatus,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> UserSubscription {
        let mut t = self.tables.lock().await;
        let now = Utc::now();
        let row = UserSubscription {
            id: t.next_id(),
            user_id,
            plan_id,
            status,
            start_date,
            end_date,
            classes_used: 0,
            payment_id: None,
            created_at: now,
            updated_at: now,
        };
        t.subscriptions.push(row.clone());
        row
    }

    pub async fn insert_payment(
        &self,
        user_id: i32,
        amount: Decimal,
        status: PaymentStatus,
    ) -> Payment {
        let mut t = self.tables.lock().await;
        let now = Utc::now();
        let row = Payment {
            id: t.next_id(),
            user_id,
            subscription_id: None,
            amount,
            currency: "USD".to_string(),
            status,
            payment_method: Some("card".to_string()),
            processor_payment_id: None,
            description: None,
            created_at: now,
            updated_at: now,
        };
        t.payments.push(row.clone());
        row
    }

    pub async fn insert_reward(&self, user_id: i32, points: i32) -> UserReward {
        let mut t = self.tables.lock().await;
        let now = Utc::now();
        let row = UserReward {
            id: t.next_id(),
            user_id,
            points,
            total_points_earned: points,
            total_points_redeemed: 0,
            created_at: now,
            updated_at: now,
        };
        t.rewards.push(row.clone());
        row
    }

    pub async fn insert_notification(&self, n: NewNotification) -> Notification {
        let mut t = self.tables.lock().await;
        let row = Notification {
            id: t.next_id(),
            user_id: n.user_id,
            kind: n.kind,
            title: n.title,
            message: n.message,
            is_read: false,
            created_at: Utc::now(),
        };
        t.notifications.push(row.clone());
        row
    }
}

fn newest_first<T, K: Ord>(rows: &mut [T], key: impl Fn(&T) -> K) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl GymStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn upsert_user(&self, user: UpsertUser) -> Result<User, AppError> {
        let mut t = self.tables.lock().await;
        if let Some(existing) = t.users.iter_mut().find(|u| u.open_id == user.open_id) {
            if user.name.is_some() {
                existing.name = user.name;
            }
            if user.email.is_some() {
                existing.email = user.email;
            }
            if user.login_method.is_some() {
                existing.login_method = user.login_method;
            }
            if let Some(role) = user.role {
                existing.role = role;
            }
            existing.last_signed_in = user.signed_in_at;
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let row = User {
            id: t.next_id(),
            open_id: user.open_id,
            name: user.name,
            email: user.email,
            login_method: user.login_method,
            role: user.role.unwrap_or(Role::Member),
            phone: None,
            profile_image: None,
            created_at: now,
            updated_at: now,
            last_signed_in: user.signed_in_at,
        };
        t.users.push(row.clone());
        Ok(row)
    }

    async fn get_user_by_open_id(&self, open_id: &str) -> Result<Option<User>, AppError> {
        let t = self.tables.lock().await;
        Ok(t.users.iter().find(|u| u.open_id == open_id).cloned())
    }

    async fn get_user(&self, id: i32) -> Result<Option<User>, AppError> {
        let t = self.tables.lock().await;
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let t = self.tables.lock().await;
        let mut rows = t.users.clone();
        newest_first(&mut rows, |u| (u.created_at, u.id));
        Ok(rows)
    }

    async fn list_active_trainers(&self) -> Result<Vec<Trainer>, AppError> {
        let t = self.tables.lock().await;
        let mut rows: Vec<Trainer> = t.trainers.iter().filter(|tr| tr.is_active).cloned().collect();
        rows.sort_by(|a, b| b.rating.cmp(&a.rating).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn get_trainer(&self, id: i32) -> Result<Option<Trainer>, AppError> {
        let t = self.tables.lock().await;
        Ok(t.trainers.iter().find(|tr| tr.id == id).cloned())
    }

    async fn get_trainer_by_user(&self, user_id: i32) -> Result<Option<Trainer>, AppError> {
        let t = self.tables.lock().await;
        Ok(t.trainers.iter().find(|tr| tr.user_id == user_id).cloned())
    }

    async fn create_trainer(&self, trainer: NewTrainer) -> Result<Trainer, AppError> {
        let mut t = self.tables.lock().await;
        if t.trainers.iter().any(|tr| tr.user_id == trainer.user_id) {
            return Err(AppError::BadRequest(
                "User already has a trainer profile".to_string(),
            ));
        }
        let now = Utc::now();
        let row = Trainer {
            id: t.next_id(),
            user_id: trainer.user_id,
            specialization: trainer.specialization,
            bio: trainer.bio,
            experience: trainer.experience,
            image: trainer.image,
            rating: Decimal::ZERO,
            total_reviews: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        t.trainers.push(row.clone());
        if let Some(user) = t
            .users
            .iter_mut()
            .find(|u| u.id == trainer.user_id && u.role == Role::Member)
        {
            user.role = Role::Trainer;
            user.updated_at = now;
        }
        Ok(row)
    }

    async fn list_reviews(&self, trainer_id: i32) -> Result<Vec<TrainerReview>, AppError> {
        let t = self.tables.lock().await;
        let mut rows: Vec<TrainerReview> = t
            .reviews
            .iter()
            .filter(|r| r.trainer_id == trainer_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |r| (r.created_at, r.id));
        Ok(rows)
    }

    async fn add_review(&self, review: NewReview) -> Result<Option<TrainerReview>, AppError> {
        let mut t = self.tables.lock().await;
        if !t.trainers.iter().any(|tr| tr.id == review.trainer_id) {
            return Ok(None);
        }

        let now = Utc::now();
        let row = TrainerReview {
            id: t.next_id(),
            trainer_id: review.trainer_id,
            user_id: review.user_id,
            rating: review.rating,
            comment: review.comment,
            created_at: now,
            updated_at: now,
        };
        t.reviews.push(row.clone());

        let ratings: Vec<i32> = t
            .reviews
            .iter()
            .filter(|r| r.trainer_id == review.trainer_id)
            .map(|r| r.rating)
            .collect();
        let count = ratings.len() as i32;
        let sum: i32 = ratings.iter().sum();
        let mean = (Decimal::from(sum) / Decimal::from(count))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        if let Some(trainer) = t.trainers.iter_mut().find(|tr| tr.id == review.trainer_id) {
            trainer.rating = mean;
            trainer.total_reviews = count;
            trainer.updated_at = now;
        }
        Ok(Some(row))
    }

    async fn list_class_types(&self) -> Result<Vec<ClassType>, AppError> {
        let t = self.tables.lock().await;
        Ok(t.class_types.clone())
    }

    async fn get_class_type(&self, id: i32) -> Result<Option<ClassType>, AppError> {
        let t = self.tables.lock().await;
        Ok(t.class_types.iter().find(|ct| ct.id == id).cloned())
    }

    async fn create_class_type(&self, class_type: NewClassType) -> Result<ClassType, AppError> {
        let mut t = self.tables.lock().await;
        let row = ClassType {
            id: t.next_id(),
            name: class_type.name,
            description: class_type.description,
            icon: class_type.icon,
            created_at: Utc::now(),
        };
        t.class_types.push(row.clone());
        Ok(row)
    }

    async fn list_classes(&self, filter: ClassFilter) -> Result<Vec<GymClass>, AppError> {
        let t = self.tables.lock().await;
        let mut rows: Vec<GymClass> = t
            .classes
            .iter()
            .filter(|c| c.is_active)
            .filter(|c| filter.starts_at_or_after.map_or(true, |at| c.start_time >= at))
            .filter(|c| filter.trainer_id.map_or(true, |id| c.trainer_id == id))
            .filter(|c| filter.class_type_id.map_or(true, |id| c.class_type_id == id))
            .cloned()
            .collect();
        rows.sort_by_key(|c| (c.start_time, c.id));
        Ok(rows)
    }

    async fn get_class(&self, id: i32) -> Result<Option<GymClass>, AppError> {
        let t = self.tables.lock().await;
        Ok(t.classes.iter().find(|c| c.id == id).cloned())
    }

    async fn create_class(&self, class: NewClass) -> Result<GymClass, AppError> {
        let mut t = self.tables.lock().await;
        let now = Utc::now();
        let row = GymClass {
            id: t.next_id(),
            class_type_id: class.class_type_id,
            trainer_id: class.trainer_id,
            title: class.title,
            description: class.description,
            start_time: class.start_time,
            end_time: class.end_time,
            max_capacity: class.max_capacity,
            current_enrollment: 0,
            location: class.location,
            image: class.image,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        t.classes.push(row.clone());
        Ok(row)
    }

    async fn set_class_active(
        &self,
        id: i32,
        is_active: bool,
    ) -> Result<Option<GymClass>, AppError> {
        let mut t = self.tables.lock().await;
        Ok(t.classes.iter_mut().find(|c| c.id == id).map(|c| {
            c.is_active = is_active;
            c.updated_at = Utc::now();
            c.clone()
        }))
    }

    async fn list_user_bookings(&self, user_id: i32) -> Result<Vec<ClassBooking>, AppError> {
        let t = self.tables.lock().await;
        let mut rows: Vec<ClassBooking> = t
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |b| (b.booked_at, b.id));
        Ok(rows)
    }

    async fn list_class_bookings(&self, class_id: i32) -> Result<Vec<ClassBooking>, AppError> {
        let t = self.tables.lock().await;
        let mut rows: Vec<ClassBooking> = t
            .bookings
            .iter()
            .filter(|b| b.class_id == class_id)
            .cloned()
            .collect();
        rows.sort_by_key(|b| (b.booked_at, b.id));
        Ok(rows)
    }

    async fn find_booking(
        &self,
        user_id: i32,
        class_id: i32,
    ) -> Result<Option<ClassBooking>, AppError> {
        let t = self.tables.lock().await;
        Ok(t
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id && b.class_id == class_id)
            .max_by_key(|b| (b.booked_at, b.id))
            .cloned())
    }

    async fn get_booking(&self, id: i32) -> Result<Option<ClassBooking>, AppError> {
        let t = self.tables.lock().await;
        Ok(t.bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn book_class(
        &self,
        user_id: i32,
        class_id: i32,
        confirmation: NewNotification,
    ) -> Result<BookingOutcome, AppError> {
        let mut t = self.tables.lock().await;

        let already_booked = t
            .bookings
            .iter()
            .any(|b| b.user_id == user_id && b.class_id == class_id && !b.is_cancelled());
        if already_booked {
            return Ok(BookingOutcome::AlreadyBooked);
        }

        let now = Utc::now();
        let class = match t.classes.iter_mut().find(|c| c.id == class_id) {
            None => return Ok(BookingOutcome::ClassNotFound),
            Some(c) if c.is_full() => return Ok(BookingOutcome::ClassFull),
            Some(c) => {
                c.current_enrollment += 1;
                c.updated_at = now;
                c.clone()
            }
        };

        let booking = ClassBooking {
            id: t.next_id(),
            user_id,
            class_id,
            status: BookingStatus::Booked,
            booked_at: now,
            cancelled_at: None,
            created_at: now,
        };
        t.bookings.push(booking.clone());

        let notification = Notification {
            id: t.next_id(),
            user_id: confirmation.user_id,
            kind: confirmation.kind,
            title: confirmation.title,
            message: confirmation.message,
            is_read: false,
            created_at: now,
        };
        t.notifications.push(notification);

        Ok(BookingOutcome::Booked { booking, class })
    }

    async fn cancel_booking(
        &self,
        id: i32,
        at: DateTime<Utc>,
        release_seat: bool,
    ) -> Result<Option<ClassBooking>, AppError> {
        let mut t = self.tables.lock().await;
        let Some(booking) = t.bookings.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        if booking.status != BookingStatus::Booked {
            return Ok(Some(booking.clone()));
        }

        booking.status = BookingStatus::Cancelled;
        booking.cancelled_at = Some(at);
        let booking = booking.clone();

        if release_seat {
            if let Some(class) = t.classes.iter_mut().find(|c| c.id == booking.class_id) {
                class.current_enrollment = (class.current_enrollment - 1).max(0);
                class.updated_at = Utc::now();
            }
        }
        Ok(Some(booking))
    }

    async fn mark_attended(&self, id: i32) -> Result<Option<ClassBooking>, AppError> {
        let mut t = self.tables.lock().await;
        Ok(t.bookings.iter_mut().find(|b| b.id == id).map(|b| {
            if b.status == BookingStatus::Booked {
                b.status = BookingStatus::Attended;
            }
            b.clone()
        }))
    }

    async fn list_active_plans(&self) -> Result<Vec<SubscriptionPlan>, AppError> {
        let t = self.tables.lock().await;
        Ok(t.plans.iter().filter(|p| p.is_active).cloned().collect())
    }

    async fn get_plan(&self, id: i32) -> Result<Option<SubscriptionPlan>, AppError> {
        let t = self.tables.lock().await;
        Ok(t.plans.iter().find(|p| p.id == id).cloned())
    }

    async fn create_plan(&self, plan: NewPlan) -> Result<SubscriptionPlan, AppError> {
        let mut t = self.tables.lock().await;
        let now = Utc::now();
        let row = SubscriptionPlan {
            id: t.next_id(),
            name: plan.name,
            description: plan.description,
            monthly_price: plan.monthly_price,
            yearly_price: plan.yearly_price,
            classes_per_month: plan.classes_per_month,
            features: plan.features,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        t.plans.push(row.clone());
        Ok(row)
    }

    async fn list_user_subscriptions(
        &self,
        user_id: i32,
    ) -> Result<Vec<UserSubscription>, AppError> {
        let t = self.tables.lock().await;
        let mut rows: Vec<UserSubscription> = t
            .subscriptions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |s| (s.created_at, s.id));
        Ok(rows)
    }

    async fn active_subscription(
        &self,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> Result<Option<UserSubscription>, AppError> {
        let t = self.tables.lock().await;
        Ok(t
            .subscriptions
            .iter()
            .filter(|s| s.user_id == user_id && s.is_active_at(now))
            .max_by_key(|s| (s.end_date, s.id))
            .cloned())
    }

    async fn list_user_payments(&self, user_id: i32) -> Result<Vec<Payment>, AppError> {
        let t = self.tables.lock().await;
        let mut rows: Vec<Payment> = t
            .payments
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |p| (p.created_at, p.id));
        Ok(rows)
    }

    async fn list_published_stories(&self) -> Result<Vec<SuccessStory>, AppError> {
        let t = self.tables.lock().await;
        let mut rows: Vec<SuccessStory> =
            t.stories.iter().filter(|s| s.is_published).cloned().collect();
        newest_first(&mut rows, |s| (s.created_at, s.id));
        Ok(rows)
    }

    async fn create_story(&self, story: NewSuccessStory) -> Result<SuccessStory, AppError> {
        let mut t = self.tables.lock().await;
        let now = Utc::now();
        let row = SuccessStory {
            id: t.next_id(),
            user_id: story.user_id,
            title: story.title,
            description: story.description,
            before_image: story.before_image,
            after_image: story.after_image,
            duration: story.duration,
            is_published: false,
            created_at: now,
            updated_at: now,
        };
        t.stories.push(row.clone());
        Ok(row)
    }

    async fn set_story_published(
        &self,
        id: i32,
        is_published: bool,
    ) -> Result<Option<SuccessStory>, AppError> {
        let mut t = self.tables.lock().await;
        Ok(t.stories.iter_mut().find(|s| s.id == id).map(|s| {
            s.is_published = is_published;
            s.updated_at = Utc::now();
            s.clone()
        }))
    }

    async fn list_published_posts(&self) -> Result<Vec<BlogPost>, AppError> {
        let t = self.tables.lock().await;
        let mut rows: Vec<BlogPost> = t.posts.iter().filter(|p| p.is_published).cloned().collect();
        // `Some(_)` orders above `None`, matching NULLS LAST on a descending sort.
        newest_first(&mut rows, |p| (p.published_at, p.id));
        Ok(rows)
    }

    async fn get_published_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, AppError> {
        let t = self.tables.lock().await;
        Ok(t
            .posts
            .iter()
            .find(|p| p.slug == slug && p.is_published)
            .cloned())
    }

    async fn create_post(&self, post: NewBlogPost) -> Result<BlogPost, AppError> {
        let mut t = self.tables.lock().await;
        if t.posts.iter().any(|p| p.slug == post.slug) {
            return Err(AppError::BadRequest(format!(
                "Slug '{}' is already in use",
                post.slug
            )));
        }
        let now = Utc::now();
        let row = BlogPost {
            id: t.next_id(),
            author_id: post.author_id,
            title: post.title,
            slug: post.slug,
            content: post.content,
            excerpt: post.excerpt,
            featured_image: post.featured_image,
            category: post.category,
            is_published: false,
            published_at: None,
            created_at: now,
            updated_at: now,
        };
        t.posts.push(row.clone());
        Ok(row)
    }

    async fn set_post_published(
        &self,
        id: i32,
        is_published: bool,
        at: DateTime<Utc>,
    ) -> Result<Option<BlogPost>, AppError> {
        let mut t = self.tables.lock().await;
        Ok(t.posts.iter_mut().find(|p| p.id == id).map(|p| {
            p.is_published = is_published;
            if is_published && p.published_at.is_none() {
                p.published_at = Some(at);
            }
            p.updated_at = Utc::now();
            p.clone()
        }))
    }

    async fn list_user_notifications(&self, user_id: i32) -> Result<Vec<Notification>, AppError> {
        let t = self.tables.lock().await;
        let mut rows: Vec<Notification> = t
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |n| (n.created_at, n.id));
        Ok(rows)
    }

    async fn get_notification(&self, id: i32) -> Result<Option<Notification>, AppError> {
        let t = self.tables.lock().await;
        Ok(t.notifications.iter().find(|n| n.id == id).cloned())
    }

    async fn mark_notification_read(&self, id: i32) -> Result<Option<Notification>, AppError> {
        let mut t = self.tables.lock().await;
        Ok(t.notifications.iter_mut().find(|n| n.id == id).map(|n| {
            n.is_read = true;
            n.clone()
        }))
    }

    async fn get_user_rewards(&self, user_id: i32) -> Result<Option<UserReward>, AppError> {
        let t = self.tables.lock().await;
        Ok(t.rewards.iter().find(|r| r.user_id == user_id).cloned())
    }

    async fn admin_stats(&self) -> Result<AdminStats, AppError> {
        let t = self.tables.lock().await;
        Ok(AdminStats {
            total_users: t.users.len() as i64,
            active_classes: t.classes.iter().filter(|c| c.is_active).count() as i64,
            active_trainers: t.trainers.iter().filter(|tr| tr.is_active).count() as i64,
            revenue: t
                .payments
                .iter()
                .filter(|p| p.status == PaymentStatus::Completed)
                .map(|p| p.amount)
                .sum(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_class(capacity: i32, start_time: DateTime<Utc>) -> NewClass {
        NewClass {
            class_type_id: 1,
            trainer_id: 1,
            title: "Morning Flow".to_string(),
            description: None,
            start_time,
            end_time: start_time + Duration::hours(1),
            max_capacity: capacity,
            location: None,
            image: None,
        }
    }

    fn confirmation(user_id: i32) -> NewNotification {
        NewNotification {
            user_id,
            kind: "booking_confirmation".to_string(),
            title: "Class Booking Confirmed".to_string(),
            message: None,
        }
    }

    #[tokio::test]
    async fn test_cancel_without_release_keeps_enrollment() {
        let store = MemoryStore::new();
        let class = store
            .create_class(new_class(5, Utc::now() + Duration::days(1)))
            .await
            .unwrap();
        let BookingOutcome::Booked { booking, .. } =
            store.book_class(7, class.id, confirmation(7)).await.unwrap()
        else {
            panic!("expected a booking");
        };

        store.cancel_booking(booking.id, Utc::now(), false).await.unwrap();
        let class = store.get_class(class.id).await.unwrap().unwrap();
        assert_eq!(class.current_enrollment, 1);
    }

    #[tokio::test]
    async fn test_cancel_with_release_decrements_once() {
        let store = MemoryStore::new();
        let class = store
            .create_class(new_class(5, Utc::now() + Duration::days(1)))
            .await
            .unwrap();
        let BookingOutcome::Booked { booking, .. } =
            store.book_class(7, class.id, confirmation(7)).await.unwrap()
        else {
            panic!("expected a booking");
        };

        store.cancel_booking(booking.id, Utc::now(), true).await.unwrap();
        store.cancel_booking(booking.id, Utc::now(), true).await.unwrap();
        let class = store.get_class(class.id).await.unwrap().unwrap();
        assert_eq!(class.current_enrollment, 0);
    }

    #[tokio::test]
    async fn test_upsert_keeps_fields_not_supplied() {
        let store = MemoryStore::new();
        let first = store
            .upsert_user(UpsertUser {
                open_id: "abc".to_string(),
                name: Some("Dana".to_string()),
                email: Some("dana@example.com".to_string()),
                login_method: None,
                role: None,
                signed_in_at: Utc::now(),
            })
            .await
            .unwrap();
        assert_eq!(first.role, Role::Member);

        let second = store
            .upsert_user(UpsertUser {
                open_id: "abc".to_string(),
                name: None,
                email: Some("dana@gym.example".to_string()),
                login_method: Some("google".to_string()),
                role: None,
                signed_in_at: Utc::now(),
            })
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.name.as_deref(), Some("Dana"));
        assert_eq!(second.email.as_deref(), Some("dana@gym.example"));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_published_posts_newest_first() {
        let store = MemoryStore::new();
        let base = Utc::now();
        for (i, slug) in ["first", "second", "draft"].iter().enumerate() {
            let post = store
                .create_post(NewBlogPost {
                    author_id: 1,
                    title: slug.to_string(),
                    slug: slug.to_string(),
                    content: None,
                    excerpt: None,
                    featured_image: None,
                    category: None,
                })
                .await
                .unwrap();
            if *slug != "draft" {
                store
                    .set_post_published(post.id, true, base + Duration::minutes(i as i64))
                    .await
                    .unwrap();
            }
        }

        let slugs: Vec<String> = store
            .list_published_posts()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["second".to_string(), "first".to_string()]);
    }
}
