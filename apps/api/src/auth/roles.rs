use crate::models::user::Role;

/// Role to write on sign-in. An explicit role wins; otherwise the configured
/// owner identity is made admin. `None` leaves the stored role alone (new rows
/// default to member).
pub fn resolve_role(
    open_id: &str,
    explicit: Option<Role>,
    owner_open_id: Option<&str>,
) -> Option<Role> {
    if explicit.is_some() {
        return explicit;
    }
    match owner_open_id {
        Some(owner) if owner == open_id => Some(Role::Admin),
        _ => None,
    }
}
