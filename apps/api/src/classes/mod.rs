pub mod booking;
pub mod handlers;
pub mod schedule;
