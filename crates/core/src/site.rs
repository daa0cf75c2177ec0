//! Public-site vocabularies: content status, contact status, village status,
//! known sections, media limits and listing pagination.

pub const CONTENT_DRAFT: &str = "draft";
pub const CONTENT_PUBLISHED: &str = "published";
pub const CONTENT_STATUSES: &[&str] = &[CONTENT_DRAFT, CONTENT_PUBLISHED];

pub const CONTACT_NOUVEAU: &str = "nouveau";
pub const CONTACT_LU: &str = "lu";
pub const CONTACT_STATUSES: &[&str] = &[CONTACT_NOUVEAU, CONTACT_LU];

pub const VILLAGE_ACTIF: &str = "actif";
pub const VILLAGE_INACTIF: &str = "inactif";
pub const VILLAGE_STATUTS: &[&str] = &[VILLAGE_ACTIF, VILLAGE_INACTIF];

/// Sections the marketing site renders. Other slugs are accepted but only
/// these are assembled into the homepage.
pub const SECTION_HERO: &str = "hero";
pub const SECTION_ABOUT: &str = "about";
pub const SECTION_MISSION: &str = "mission";
pub const SECTION_FEATURES: &str = "features";
pub const SECTION_TESTIMONIALS: &str = "testimonials";
pub const SECTION_PARTNERS: &str = "partners";
pub const SECTION_FOOTER: &str = "footer";

pub const HOMEPAGE_SECTIONS: &[&str] = &[
    SECTION_HERO,
    SECTION_MISSION,
    SECTION_FEATURES,
    SECTION_TESTIMONIALS,
    SECTION_PARTNERS,
    SECTION_FOOTER,
];

/// Setting groups used by the admin screens.
pub const SETTING_GROUPS: &[&str] = &["general", "contact", "social", "appearance", "seo"];

/// Largest accepted media upload, in bytes (10 MiB).
pub const MAX_MEDIA_BYTES: usize = 10 * 1024 * 1024;

pub const MEDIA_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "pdf", "mp4"];

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

/// Clamp a requested page size to `1..=MAX_PER_PAGE`.
pub fn clamp_per_page(per_page: Option<i64>) -> i64 {
    per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
}

/// Pages are 1-based; anything below 1 is treated as the first page.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Row offset for a 1-based page.
pub fn page_offset(page: i64, per_page: i64) -> i64 {
    (page - 1) * per_page
}

/// Number of pages needed for `total` rows.
pub fn last_page(total: i64, per_page: i64) -> i64 {
    if total <= 0 {
        1
    } else {
        (total + per_page - 1) / per_page
    }
}

/// Validate a value against one of the vocabularies above.
pub fn validate_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), String> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "Invalid {field} '{value}'. Must be one of: {}",
            allowed.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_page_is_clamped() {
        assert_eq!(clamp_per_page(None), DEFAULT_PER_PAGE);
        assert_eq!(clamp_per_page(Some(0)), 1);
        assert_eq!(clamp_per_page(Some(-5)), 1);
        assert_eq!(clamp_per_page(Some(500)), MAX_PER_PAGE);
        assert_eq!(clamp_per_page(Some(42)), 42);
    }

    #[test]
    fn page_is_one_based() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(0)), 1);
        assert_eq!(clamp_page(Some(3)), 3);
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(3, 20), 40);
    }

    #[test]
    fn last_page_rounds_up() {
        assert_eq!(last_page(0, 20), 1);
        assert_eq!(last_page(20, 20), 1);
        assert_eq!(last_page(21, 20), 2);
    }

    #[test]
    fn one_of_lists_allowed_values() {
        assert!(validate_one_of("statut", "lu", CONTACT_STATUSES).is_ok());
        let err = validate_one_of("statut", "archive", CONTACT_STATUSES).unwrap_err();
        assert!(err.contains("nouveau, lu"));
    }
}
