pub mod class;
pub mod content;
pub mod engagement;
pub mod membership;
pub mod trainer;
pub mod user;
