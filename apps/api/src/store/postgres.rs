use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::class::{ClassBooking, ClassType, GymClass};
use crate::models::content::{BlogPost, SuccessStory};
use crate::models::engagement::{Notification, UserReward};
use crate::models::membership::{Payment, SubscriptionPlan, UserSubscription};
use crate::models::trainer::{Trainer, TrainerReview};
use crate::models::user::User;
use crate::store::{
    AdminStats, BookingOutcome, ClassFilter, GymStore, NewBlogPost, NewClass, NewClassType,
    NewNotification, NewPlan, NewReview, NewSuccessStory, NewTrainer, UpsertUser,
};

/// Postgres-backed store. Queries are runtime-checked `query_as` calls over
/// the schema in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GymStore for PgStore {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn upsert_user(&self, user: UpsertUser) -> Result<User, AppError> {
        Ok(sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (open_id, name, email, login_method, role, last_signed_in)
            VALUES ($1, $2, $3, $4, COALESCE($5, 'member'::user_role), $6)
            ON CONFLICT (open_id) DO UPDATE SET
                name = COALESCE($2, users.name),
                email = COALESCE($3, users.email),
                login_method = COALESCE($4, users.login_method),
                role = COALESCE($5, users.role),
                last_signed_in = $6,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(&user.open_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.login_method)
        .bind(user.role)
        .bind(user.signed_in_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_user_by_open_id(&self, open_id: &str) -> Result<Option<User>, AppError> {
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE open_id = $1 LIMIT 1")
                .bind(open_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn get_user(&self, id: i32) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC, id DESC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn list_active_trainers(&self) -> Result<Vec<Trainer>, AppError> {
        Ok(sqlx::query_as::<_, Trainer>(
            "SELECT * FROM trainers WHERE is_active = TRUE ORDER BY rating DESC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_trainer(&self, id: i32) -> Result<Option<Trainer>, AppError> {
        Ok(sqlx::query_as::<_, Trainer>("SELECT * FROM trainers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn get_trainer_by_user(&self, user_id: i32) -> Result<Option<Trainer>, AppError> {
        Ok(sqlx::query_as::<_, Trainer>(
            "SELECT * FROM trainers WHERE user_id = $1 ORDER BY id ASC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_trainer(&self, trainer: NewTrainer) -> Result<Trainer, AppError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Trainer>(
            r#"
            INSERT INTO trainers (user_id, specialization, bio, experience, image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(trainer.user_id)
        .bind(&trainer.specialization)
        .bind(&trainer.bio)
        .bind(trainer.experience)
        .bind(&trainer.image)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::BadRequest("User already has a trainer profile".to_string())
            }
            other => AppError::Database(other),
        })?;

        sqlx::query(
            "UPDATE users SET role = 'trainer', updated_at = now() WHERE id = $1 AND role = 'member'",
        )
        .bind(trainer.user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn list_reviews(&self, trainer_id: i32) -> Result<Vec<TrainerReview>, AppError> {
        Ok(sqlx::query_as::<_, TrainerReview>(
            "SELECT * FROM trainer_reviews WHERE trainer_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(trainer_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn add_review(&self, review: NewReview) -> Result<Option<TrainerReview>, AppError> {
        let mut tx = self.pool.begin().await?;

        let trainer: Option<i32> =
            sqlx::query_scalar("SELECT id FROM trainers WHERE id = $1 FOR UPDATE")
                .bind(review.trainer_id)
                .fetch_optional(&mut *tx)
                .await?;
        if trainer.is_none() {
            return Ok(None);
        }

        let inserted = sqlx::query_as::<_, TrainerReview>(
            r#"
            INSERT INTO trainer_reviews (trainer_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(review.trainer_id)
        .bind(review.user_id)
        .bind(review.rating)
        .bind(&review.comment)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE trainers
            SET rating = agg.avg_rating,
                total_reviews = agg.review_count,
                updated_at = now()
            FROM (
                SELECT ROUND(AVG(rating)::numeric, 2) AS avg_rating,
                       COUNT(*)::int AS review_count
                FROM trainer_reviews
                WHERE trainer_id = $1
            ) AS agg
            WHERE trainers.id = $1
            "#,
        )
        .bind(review.trainer_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(inserted))
    }

    async fn list_class_types(&self) -> Result<Vec<ClassType>, AppError> {
        Ok(
            sqlx::query_as::<_, ClassType>("SELECT * FROM class_types ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn get_class_type(&self, id: i32) -> Result<Option<ClassType>, AppError> {
        Ok(
            sqlx::query_as::<_, ClassType>("SELECT * FROM class_types WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_class_type(&self, class_type: NewClassType) -> Result<ClassType, AppError> {
        Ok(sqlx::query_as::<_, ClassType>(
            "INSERT INTO class_types (name, description, icon) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&class_type.name)
        .bind(&class_type.description)
        .bind(&class_type.icon)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_classes(&self, filter: ClassFilter) -> Result<Vec<GymClass>, AppError> {
        Ok(sqlx::query_as::<_, GymClass>(
            r#"
            SELECT * FROM classes
            WHERE is_active = TRUE
              AND ($1::timestamptz IS NULL OR start_time >= $1)
              AND ($2::int4 IS NULL OR trainer_id = $2)
              AND ($3::int4 IS NULL OR class_type_id = $3)
            ORDER BY start_time ASC, id ASC
            "#,
        )
        .bind(filter.starts_at_or_after)
        .bind(filter.trainer_id)
        .bind(filter.class_type_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_class(&self, id: i32) -> Result<Option<GymClass>, AppError> {
        Ok(sqlx::query_as::<_, GymClass>("SELECT * FROM classes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_class(&self, class: NewClass) -> Result<GymClass, AppError> {
        Ok(sqlx::query_as::<_, GymClass>(
            r#"
            INSERT INTO classes
                (class_type_id, trainer_id, title, description, start_time, end_time,
                 max_capacity, location, image)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(class.class_type_id)
        .bind(class.trainer_id)
        .bind(&class.title)
        .bind(&class.description)
        .bind(class.start_time)
        .bind(class.end_time)
        .bind(class.max_capacity)
        .bind(&class.location)
        .bind(&class.image)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn set_class_active(
        &self,
        id: i32,
        is_active: bool,
    ) -> Result<Option<GymClass>, AppError> {
        Ok(sqlx::query_as::<_, GymClass>(
            "UPDATE classes SET is_active = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_user_bookings(&self, user_id: i32) -> Result<Vec<ClassBooking>, AppError> {
        Ok(sqlx::query_as::<_, ClassBooking>(
            "SELECT * FROM class_bookings WHERE user_id = $1 ORDER BY booked_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_class_bookings(&self, class_id: i32) -> Result<Vec<ClassBooking>, AppError> {
        Ok(sqlx::query_as::<_, ClassBooking>(
            "SELECT * FROM class_bookings WHERE class_id = $1 ORDER BY booked_at ASC, id ASC",
        )
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_booking(
        &self,
        user_id: i32,
        class_id: i32,
    ) -> Result<Option<ClassBooking>, AppError> {
        Ok(sqlx::query_as::<_, ClassBooking>(
            r#"
            SELECT * FROM class_bookings
            WHERE user_id = $1 AND class_id = $2
            ORDER BY booked_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(class_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn get_booking(&self, id: i32) -> Result<Option<ClassBooking>, AppError> {
        Ok(
            sqlx::query_as::<_, ClassBooking>("SELECT * FROM class_bookings WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn book_class(
        &self,
        user_id: i32,
        class_id: i32,
        confirmation: NewNotification,
    ) -> Result<BookingOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        // The row lock serializes every booking of this class until commit.
        let locked: Option<i32> =
            sqlx::query_scalar("SELECT id FROM classes WHERE id = $1 FOR UPDATE")
                .bind(class_id)
                .fetch_optional(&mut *tx)
                .await?;

        let existing: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT id FROM class_bookings
            WHERE user_id = $1 AND class_id = $2 AND status <> 'cancelled'
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(class_id)
        .fetch_optional(&mut *tx)
        .await?;
        if existing.is_some() {
            return Ok(BookingOutcome::AlreadyBooked);
        }
        if locked.is_none() {
            return Ok(BookingOutcome::ClassNotFound);
        }

        // Conditional increment: no row back means the class was already full.
        let class = sqlx::query_as::<_, GymClass>(
            r#"
            UPDATE classes
            SET current_enrollment = current_enrollment + 1, updated_at = now()
            WHERE id = $1 AND current_enrollment < max_capacity
            RETURNING *
            "#,
        )
        .bind(class_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(class) = class else {
            return Ok(BookingOutcome::ClassFull);
        };

        let booking = sqlx::query_as::<_, ClassBooking>(
            r#"
            INSERT INTO class_bookings (user_id, class_id, status)
            VALUES ($1, $2, 'booked')
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(class_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO notifications (user_id, kind, title, message) VALUES ($1, $2, $3, $4)")
            .bind(confirmation.user_id)
            .bind(&confirmation.kind)
            .bind(&confirmation.title)
            .bind(&confirmation.message)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(BookingOutcome::Booked { booking, class })
    }

    async fn cancel_booking(
        &self,
        id: i32,
        at: DateTime<Utc>,
        release_seat: bool,
    ) -> Result<Option<ClassBooking>, AppError> {
        let mut tx = self.pool.begin().await?;

        let cancelled = sqlx::query_as::<_, ClassBooking>(
            r#"
            UPDATE class_bookings
            SET status = 'cancelled', cancelled_at = $2
            WHERE id = $1 AND status = 'booked'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(at)
        .fetch_optional(&mut *tx)
        .await?;

        let booking = match cancelled {
            Some(booking) => {
                if release_seat {
                    sqlx::query(
                        r#"
                        UPDATE classes
                        SET current_enrollment = GREATEST(current_enrollment - 1, 0),
                            updated_at = now()
                        WHERE id = $1
                        "#,
                    )
                    .bind(booking.class_id)
                    .execute(&mut *tx)
                    .await?;
                }
                Some(booking)
            }
            None => {
                sqlx::query_as::<_, ClassBooking>("SELECT * FROM class_bookings WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?
            }
        };

        tx.commit().await?;
        Ok(booking)
    }

    async fn mark_attended(&self, id: i32) -> Result<Option<ClassBooking>, AppError> {
        let updated = sqlx::query_as::<_, ClassBooking>(
            "UPDATE class_bookings SET status = 'attended' WHERE id = $1 AND status = 'booked' RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        match updated {
            Some(booking) => Ok(Some(booking)),
            None => self.get_booking(id).await,
        }
    }

    async fn list_active_plans(&self) -> Result<Vec<SubscriptionPlan>, AppError> {
        Ok(sqlx::query_as::<_, SubscriptionPlan>(
            "SELECT * FROM subscription_plans WHERE is_active = TRUE ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_plan(&self, id: i32) -> Result<Option<SubscriptionPlan>, AppError> {
        Ok(
            sqlx::query_as::<_, SubscriptionPlan>("SELECT * FROM subscription_plans WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_plan(&self, plan: NewPlan) -> Result<SubscriptionPlan, AppError> {
        Ok(sqlx::query_as::<_, SubscriptionPlan>(
            r#"
            INSERT INTO subscription_plans
                (name, description, monthly_price, yearly_price, classes_per_month, features)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.monthly_price)
        .bind(plan.yearly_price)
        .bind(plan.classes_per_month)
        .bind(&plan.features)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_user_subscriptions(
        &self,
        user_id: i32,
    ) -> Result<Vec<UserSubscription>, AppError> {
        Ok(sqlx::query_as::<_, UserSubscription>(
            "SELECT * FROM user_subscriptions WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn active_subscription(
        &self,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> Result<Option<UserSubscription>, AppError> {
        Ok(sqlx::query_as::<_, UserSubscription>(
            r#"
            SELECT * FROM user_subscriptions
            WHERE user_id = $1 AND status = 'active' AND end_date >= $2
            ORDER BY end_date DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_user_payments(&self, user_id: i32) -> Result<Vec<Payment>, AppError> {
        Ok(sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_published_stories(&self) -> Result<Vec<SuccessStory>, AppError> {
        Ok(sqlx::query_as::<_, SuccessStory>(
            "SELECT * FROM success_stories WHERE is_published = TRUE ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_story(&self, story: NewSuccessStory) -> Result<SuccessStory, AppError> {
        Ok(sqlx::query_as::<_, SuccessStory>(
            r#"
            INSERT INTO success_stories
                (user_id, title, description, before_image, after_image, duration)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(story.user_id)
        .bind(&story.title)
        .bind(&story.description)
        .bind(&story.before_image)
        .bind(&story.after_image)
        .bind(&story.duration)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn set_story_published(
        &self,
        id: i32,
        is_published: bool,
    ) -> Result<Option<SuccessStory>, AppError> {
        Ok(sqlx::query_as::<_, SuccessStory>(
            "UPDATE success_stories SET is_published = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_published)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_published_posts(&self) -> Result<Vec<BlogPost>, AppError> {
        Ok(sqlx::query_as::<_, BlogPost>(
            r#"
            SELECT * FROM blog_posts
            WHERE is_published = TRUE
            ORDER BY published_at DESC NULLS LAST, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_published_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, AppError> {
        Ok(sqlx::query_as::<_, BlogPost>(
            "SELECT * FROM blog_posts WHERE slug = $1 AND is_published = TRUE LIMIT 1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_post(&self, post: NewBlogPost) -> Result<BlogPost, AppError> {
        sqlx::query_as::<_, BlogPost>(
            r#"
            INSERT INTO blog_posts
                (author_id, title, slug, content, excerpt, featured_image, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(post.author_id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.content)
        .bind(&post.excerpt)
        .bind(&post.featured_image)
        .bind(&post.category)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::BadRequest(format!("Slug '{}' is already in use", post.slug))
            }
            other => AppError::Database(other),
        })
    }

    async fn set_post_published(
        &self,
        id: i32,
        is_published: bool,
        at: DateTime<Utc>,
    ) -> Result<Option<BlogPost>, AppError> {
        Ok(sqlx::query_as::<_, BlogPost>(
            r#"
            UPDATE blog_posts
            SET is_published = $2,
                published_at = CASE WHEN $2 AND published_at IS NULL THEN $3 ELSE published_at END,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(is_published)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_user_notifications(&self, user_id: i32) -> Result<Vec<Notification>, AppError> {
        Ok(sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_notification(&self, id: i32) -> Result<Option<Notification>, AppError> {
        Ok(
            sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn mark_notification_read(&self, id: i32) -> Result<Option<Notification>, AppError> {
        Ok(sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn get_user_rewards(&self, user_id: i32) -> Result<Option<UserReward>, AppError> {
        Ok(
            sqlx::query_as::<_, UserReward>("SELECT * FROM user_rewards WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn admin_stats(&self) -> Result<AdminStats, AppError> {
        let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        let active_classes: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM classes WHERE is_active = TRUE")
                .fetch_one(&self.pool)
                .await?;
        let active_trainers: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM trainers WHERE is_active = TRUE")
                .fetch_one(&self.pool)
                .await?;
        let revenue: Option<Decimal> =
            sqlx::query_scalar("SELECT SUM(amount) FROM payments WHERE status = 'completed'")
                .fetch_one(&self.pool)
                .await?;

        Ok(AdminStats {
            total_users,
            active_classes,
            active_trainers,
            revenue: revenue.unwrap_or(Decimal::ZERO),
        })
    }
}
