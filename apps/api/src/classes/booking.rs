//! Booking commands: the only place booking rules are enforced.
//!
//! The capacity and duplicate checks run inside `GymStore::book_class` so the
//! store can hold them atomically per class; this module maps the outcome to
//! the caller-facing error kinds.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

use crate::config::SeatPolicy;
use crate::errors::AppError;
use crate::models::class::{BookingStatus, ClassBooking};
use crate::models::engagement::BOOKING_CONFIRMATION;
use crate::models::user::User;
use crate::store::{BookingOutcome, GymStore, NewNotification};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClassIdInput {
    pub class_id: i32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingIdInput {
    pub booking_id: i32,
}

pub async fn book_class(
    store: &dyn GymStore,
    user: &User,
    class_id: i32,
) -> Result<ClassBooking, AppError> {
    let confirmation = NewNotification {
        user_id: user.id,
        kind: BOOKING_CONFIRMATION.to_string(),
        title: "Class Booking Confirmed".to_string(),
        message: Some("You have successfully booked the class".to_string()),
    };

    match store.book_class(user.id, class_id, confirmation).await? {
        BookingOutcome::AlreadyBooked => {
            debug!("User {} already holds a booking for class {class_id}", user.id);
            Err(AppError::BadRequest(
                "You already booked this class".to_string(),
            ))
        }
        BookingOutcome::ClassNotFound => Err(AppError::NotFound("Class not found".to_string())),
        BookingOutcome::ClassFull => {
            debug!("Class {class_id} is full; rejected booking by user {}", user.id);
            Err(AppError::BadRequest("Class is full".to_string()))
        }
        BookingOutcome::Booked { booking, class } => {
            info!(
                "User {} booked class {} ({}/{})",
                user.id, class.id, class.current_enrollment, class.max_capacity
            );
            if class.is_full() {
                info!("Class {} is now full", class.id);
            }
            Ok(booking)
        }
    }
}

/// Cancels a booking owned by `user` (admins may cancel any). Cancelling an
/// already-cancelled booking returns it unchanged.
pub async fn cancel_booking(
    store: &dyn GymStore,
    user: &User,
    booking_id: i32,
    policy: SeatPolicy,
    now: DateTime<Utc>,
) -> Result<ClassBooking, AppError> {
    let booking = store
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;
    if booking.user_id != user.id && !user.is_admin() {
        return Err(AppError::Forbidden);
    }
    if booking.is_cancelled() {
        return Ok(booking);
    }

    // The status read above may be stale; only the store's answer counts.
    let release_seat = policy == SeatPolicy::ReleaseOnCancel;
    let cancelled = store
        .cancel_booking(booking_id, now, release_seat)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;
    if cancelled.status != BookingStatus::Cancelled {
        return Err(AppError::BadRequest(
            "Attended bookings cannot be cancelled".to_string(),
        ));
    }

    info!(
        "Booking {} for class {} cancelled by user {} (seat released: {release_seat})",
        cancelled.id, cancelled.class_id, user.id
    );
    Ok(cancelled)
}

pub async fn mark_attended(store: &dyn GymStore, booking_id: i32) -> Result<ClassBooking, AppError> {
    let booking = store
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;
    if booking.is_cancelled() {
        return Err(AppError::BadRequest(
            "Cancelled bookings cannot be marked attended".to_string(),
        ));
    }
    store
        .mark_attended(booking_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}
