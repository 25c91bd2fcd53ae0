pub mod handlers;
pub mod plans;
