//! Well-known role names.
//!
//! Roles are stored as plain text in `users.role` and embedded verbatim in
//! JWT claims, so these strings are part of the wire format.

use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "administrateur";
pub const ROLE_PRESTATAIRE: &str = "prestataire";
pub const ROLE_DONATEUR: &str = "donateur";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_PRESTATAIRE, ROLE_DONATEUR];

/// Roles a visitor may pick when registering. Administrators are created by
/// other administrators only.
pub const SELF_REGISTRATION_ROLES: &[&str] = &[ROLE_PRESTATAIRE, ROLE_DONATEUR];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrateur,
    Prestataire,
    Donateur,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Administrateur => ROLE_ADMIN,
            Role::Prestataire => ROLE_PRESTATAIRE,
            Role::Donateur => ROLE_DONATEUR,
        }
    }

    /// Parse a stored role name. Unknown names yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            ROLE_ADMIN => Some(Role::Administrateur),
            ROLE_PRESTATAIRE => Some(Role::Prestataire),
            ROLE_DONATEUR => Some(Role::Donateur),
            _ => None,
        }
    }

    pub fn is_admin(self) -> bool {
        self == Role::Administrateur
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a role chosen on the public registration form.
pub fn validate_registration_role(role: &str) -> Result<Role, String> {
    Role::parse(role)
        .filter(|r| SELF_REGISTRATION_ROLES.contains(&r.as_str()))
        .ok_or_else(|| {
            format!(
                "Invalid role '{role}'. Must be one of: {}",
                SELF_REGISTRATION_ROLES.join(", ")
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_role() {
        for name in VALID_ROLES {
            let role = Role::parse(name).expect("known role must parse");
            assert_eq!(role.as_str(), *name);
        }
    }

    #[test]
    fn parse_rejects_unknown_role() {
        assert!(Role::parse("admin").is_none());
        assert!(Role::parse("").is_none());
    }

    #[test]
    fn registration_accepts_prestataire_and_donateur() {
        assert_eq!(
            validate_registration_role("prestataire"),
            Ok(Role::Prestataire)
        );
        assert_eq!(validate_registration_role("donateur"), Ok(Role::Donateur));
    }

    #[test]
    fn registration_rejects_administrateur() {
        let err = validate_registration_role("administrateur").unwrap_err();
        assert!(err.contains("Invalid role"));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Role::Donateur).unwrap();
        assert_eq!(json, "\"donateur\"");
    }
}
