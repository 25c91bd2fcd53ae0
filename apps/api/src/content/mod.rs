pub mod blog;
pub mod handlers;
pub mod stories;
