//! Well-known role name constants.
//!
//! Roles are stored as free text on the `users` table; these are the names
//! the authorization extractors recognise.

pub const ROLE_ADMIN: &str = "Admin";
pub const ROLE_STRINGER: &str = "Stringer";
pub const ROLE_USER: &str = "User";

/// Role assigned to self-registered accounts.
pub const DEFAULT_ROLE: &str = ROLE_USER;

/// Whether the role may perform workshop writes (players, racquets, strings, jobs).
pub fn is_staff(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_STRINGER
}
