pub mod handlers;
pub mod profiles;
pub mod reviews;
