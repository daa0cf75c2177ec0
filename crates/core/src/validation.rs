//! Custom field validators used with `#[validate(custom(function = ...))]`
//! on request DTOs.

use std::borrow::Cow;

use validator::ValidationError;

use crate::{projet, roles, site};

fn invalid(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

/// Reject strings that are empty once trimmed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("blank", "This field may not be blank".into()));
    }
    Ok(())
}

/// Lowercase slug: ASCII letters, digits, `-` and `_`, starting with a letter.
pub fn slug(value: &str) -> Result<(), ValidationError> {
    let mut chars = value.chars();
    let starts_ok = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    let rest_ok =
        chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if starts_ok && rest_ok {
        Ok(())
    } else {
        Err(invalid(
            "slug",
            format!("'{value}' must be a lowercase slug (a-z, 0-9, '-', '_')"),
        ))
    }
}

pub fn projet_statut(value: &str) -> Result<(), ValidationError> {
    projet::ProjetStatut::parse(value)
        .map(|_| ())
        .ok_or_else(|| {
            invalid(
                "statut",
                format!(
                    "Invalid statut '{value}'. Must be one of: {}",
                    projet::VALID_STATUTS.join(", ")
                ),
            )
        })
}

pub fn village_statut(value: &str) -> Result<(), ValidationError> {
    site::validate_one_of("statut", value, site::VILLAGE_STATUTS)
        .map_err(|msg| invalid("statut", msg))
}

pub fn content_status(value: &str) -> Result<(), ValidationError> {
    site::validate_one_of("status", value, site::CONTENT_STATUSES)
        .map_err(|msg| invalid("status", msg))
}

/// Only prestataire and donateur accounts may be self-registered.
pub fn registration_role(value: &str) -> Result<(), ValidationError> {
    roles::validate_registration_role(value)
        .map(|_| ())
        .map_err(|msg| invalid("role", msg))
}

/// Any known role, for administrator edits.
pub fn user_role(value: &str) -> Result<(), ValidationError> {
    site::validate_one_of("role", value, roles::VALID_ROLES).map_err(|msg| invalid("role", msg))
}

pub fn setting_group(value: &str) -> Result<(), ValidationError> {
    site::validate_one_of("group", value, site::SETTING_GROUPS).map_err(|msg| invalid("group", msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_are_rejected() {
        assert!(not_blank("Koulikoro").is_ok());
        assert!(not_blank("   ").is_err());
    }

    #[test]
    fn slug_accepts_lowercase_identifiers() {
        assert!(slug("hero").is_ok());
        assert!(slug("page-2_fr").is_ok());
    }

    #[test]
    fn slug_rejects_invalid_input() {
        assert!(slug("").is_err());
        assert!(slug("Hero").is_err());
        assert!(slug("2col").is_err());
        assert!(slug("a b").is_err());
    }

    #[test]
    fn statut_validators_carry_messages() {
        assert!(projet_statut("terminé").is_ok());
        let err = village_statut("ferme").unwrap_err();
        assert_eq!(err.code, "statut");
        assert!(err.message.unwrap().contains("actif"));
        assert!(content_status("published").is_ok());
    }

    #[test]
    fn administrateur_cannot_self_register() {
        assert!(registration_role("donateur").is_ok());
        assert!(registration_role("administrateur").is_err());
    }

    #[test]
    fn admin_may_assign_any_known_role() {
        assert!(user_role("administrateur").is_ok());
        assert!(user_role("superviseur").is_err());
    }

    #[test]
    fn setting_groups_are_closed() {
        assert!(setting_group("social").is_ok());
        assert!(setting_group("misc").is_err());
    }
}
