pub mod health;
pub mod input;


use axum::{
    routing::{get, post},
    Router,
};

use crate::admin::handlers as admin;
use crate::auth::handlers as auth;
use crate::classes::handlers as classes;
use crate::content::handlers as content;
use crate::engagement::handlers as engagement;
use crate::membership::handlers as membership;
use crate::state::AppState;
use crate::trainers::handlers as trainers;

/// Every procedure is mounted at `/api/rpc/<resource>.<procedure>`:
/// queries as GET with query-string input, mutations as POST with a JSON body.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/oauth/callback", post(auth::handle_oauth_callback))
        .nest("/api/rpc", rpc_routes())
        .with_state(state)
}

fn rpc_routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth.me", get(auth::handle_me))
        .route("/auth.logout", post(auth::handle_logout))
        // Trainers
        .route("/trainers.getAll", get(trainers::handle_get_trainers))
        .route("/trainers.getById", get(trainers::handle_get_trainer))
        .route(
            "/trainers.getByUserId",
            get(trainers::handle_get_trainer_by_user),
        )
        .route("/trainers.getReviews", get(trainers::handle_get_reviews))
        .route("/trainers.addReview", post(trainers::handle_add_review))
        .route("/trainers.create", post(trainers::handle_create_trainer))
        // Classes
        .route("/classes.getAll", get(classes::handle_get_classes))
        .route("/classes.getById", get(classes::handle_get_class))
        .route(
            "/classes.getByTrainer",
            get(classes::handle_get_classes_by_trainer),
        )
        .route("/classes.getByType", get(classes::handle_get_classes_by_type))
        .route("/classes.getEnrollments", get(classes::handle_get_enrollments))
        .route("/classes.create", post(classes::handle_create_class))
        .route("/classes.setActive", post(classes::handle_set_class_active))
        .route("/classTypes.getAll", get(classes::handle_get_class_types))
        .route("/classTypes.create", post(classes::handle_create_class_type))
        // Bookings
        .route(
            "/classBookings.getUserBookings",
            get(classes::handle_get_user_bookings),
        )
        .route(
            "/classBookings.checkBooking",
            get(classes::handle_check_booking),
        )
        .route("/classBookings.bookClass", post(classes::handle_book_class))
        .route(
            "/classBookings.cancelBooking",
            post(classes::handle_cancel_booking),
        )
        .route(
            "/classBookings.markAttended",
            post(classes::handle_mark_attended),
        )
        // Subscriptions and payments
        .route("/subscriptions.getPlans", get(membership::handle_get_plans))
        .route("/subscriptions.getPlanById", get(membership::handle_get_plan))
        .route(
            "/subscriptions.getUserSubscriptions",
            get(membership::handle_get_user_subscriptions),
        )
        .route(
            "/subscriptions.getActiveSubscription",
            get(membership::handle_get_active_subscription),
        )
        .route(
            "/subscriptions.createPlan",
            post(membership::handle_create_plan),
        )
        .route(
            "/payments.getUserPayments",
            get(membership::handle_get_user_payments),
        )
        // Content
        .route(
            "/successStories.getPublished",
            get(content::handle_get_published_stories),
        )
        .route("/successStories.create", post(content::handle_create_story))
        .route(
            "/successStories.setPublished",
            post(content::handle_set_story_published),
        )
        .route("/blog.getPublished", get(content::handle_get_published_posts))
        .route("/blog.getBySlug", get(content::handle_get_post_by_slug))
        .route("/blog.create", post(content::handle_create_post))
        .route("/blog.setPublished", post(content::handle_set_post_published))
        // Notifications and rewards
        .route(
            "/notifications.getUserNotifications",
            get(engagement::handle_get_notifications),
        )
        .route(
            "/notifications.markAsRead",
            post(engagement::handle_mark_as_read),
        )
        .route(
            "/rewards.getUserRewards",
            get(engagement::handle_get_user_rewards),
        )
        // Admin
        .route("/admin.stats", get(admin::handle_stats))
        .route("/admin.listUsers", get(admin::handle_list_users))
}
