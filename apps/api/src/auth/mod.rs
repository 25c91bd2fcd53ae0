//! Session resolution, sign-in, and the access tiers used by the router.
//! Procedures pick a tier by the extractor they take: `CurrentUser` (public),
//! `AuthUser` (protected) or `AdminUser` (admin).

pub mod extractors;
pub mod handlers;
pub mod identity;
pub mod roles;
pub mod session;

pub use extractors::{AdminUser, AuthUser, CurrentUser};
