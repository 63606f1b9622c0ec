//! Well-known role name constants.
//!
//! These must match the `ck_users_role` check constraint in
//! `20261001000002_create_users_table.sql`.

pub const ROLE_USER: &str = "user";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_ADMIN: &str = "admin";

/// All assignable roles.
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_MODERATOR, ROLE_ADMIN];

/// Validate a role name against the known set.
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "\"{role}\" is not a valid choice. Valid roles: {}",
            VALID_ROLES.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_are_valid() {
        for role in VALID_ROLES {
            assert!(validate_role(role).is_ok());
        }
    }

    #[test]
    fn unknown_role_rejected() {
        let msg = validate_role("superuser").unwrap_err();
        assert!(msg.contains("superuser"));
    }
}
