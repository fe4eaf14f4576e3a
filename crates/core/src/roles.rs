//! Well-known role name constants.
//!
//! Role names travel inside access tokens verbatim, so they must match the
//! values stored in `users.roles`.

pub const ROLE_USER: &str = "User";
pub const ROLE_ADMINISTRATOR: &str = "Administrator";
pub const ROLE_SUPER_ADMINISTRATOR: &str = "Super Administrator";

/// Roles allowed to list every record of a resource and to amend
/// transactions after the fact.
pub const BULK_ACCESS_ROLES: &[&str] = &[ROLE_SUPER_ADMINISTRATOR, ROLE_ADMINISTRATOR];

/// Roles granted to the seeded default administrator.
pub const ALL_ROLES: &[&str] = &[ROLE_USER, ROLE_ADMINISTRATOR, ROLE_SUPER_ADMINISTRATOR];

/// Returns `true` when any of `held` appears in `allowed`.
pub fn has_any_role<S: AsRef<str>>(held: &[S], allowed: &[&str]) -> bool {
    held.iter().any(|role| allowed.contains(&role.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn administrator_passes_bulk_gate() {
        let held = vec![ROLE_USER.to_string(), ROLE_ADMINISTRATOR.to_string()];
        assert!(has_any_role(&held, BULK_ACCESS_ROLES));
    }

    #[test]
    fn plain_user_fails_bulk_gate() {
        assert!(!has_any_role(&[ROLE_USER], BULK_ACCESS_ROLES));
    }

    #[test]
    fn role_match_is_case_sensitive() {
        assert!(!has_any_role(&["administrator"], BULK_ACCESS_ROLES));
    }
}
