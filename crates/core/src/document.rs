//! Technical document types, review states, and upload limits.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Largest accepted technical document, in bytes (20 MiB).
pub const MAX_DOCUMENT_BYTES: usize = 20 * 1024 * 1024;

/// File extensions accepted for technical documents.
pub const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "jpg", "jpeg", "png", "dwg", "zip",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Plan,
    Devis,
    EtudeFaisabilite,
    Rapport,
    Photo,
    Autre,
}

impl DocumentType {
    pub const ALL: [DocumentType; 6] = [
        DocumentType::Plan,
        DocumentType::Devis,
        DocumentType::EtudeFaisabilite,
        DocumentType::Rapport,
        DocumentType::Photo,
        DocumentType::Autre,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Plan => "plan",
            DocumentType::Devis => "devis",
            DocumentType::EtudeFaisabilite => "etude_faisabilite",
            DocumentType::Rapport => "rapport",
            DocumentType::Photo => "photo",
            DocumentType::Autre => "autre",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|t| t.as_str()).collect();
                CoreError::Validation(format!(
                    "Invalid type_document '{value}'. Must be one of: {}",
                    names.join(", ")
                ))
            })
    }
}

pub const REVIEW_PENDING: &str = "pending";
pub const REVIEW_APPROVED: &str = "approved";
pub const REVIEW_REJECTED: &str = "rejected";

/// Review decisions an administrator may record.
pub const REVIEW_DECISIONS: &[&str] = &[REVIEW_APPROVED, REVIEW_REJECTED];

/// Validate an administrator's review decision. A rejection must carry a
/// comment so the prestataire knows what to fix.
pub fn validate_review(decision: &str, comment: Option<&str>) -> Result<(), CoreError> {
    if !REVIEW_DECISIONS.contains(&decision) {
        return Err(CoreError::Validation(format!(
            "Invalid review_status '{decision}'. Must be one of: {}",
            REVIEW_DECISIONS.join(", ")
        )));
    }
    let has_comment = comment.is_some_and(|c| !c.trim().is_empty());
    if decision == REVIEW_REJECTED && !has_comment {
        return Err(CoreError::Validation(
            "A rejection requires a review_comment".into(),
        ));
    }
    Ok(())
}

/// Lower-cased extension of a file name, without the dot.
pub fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Check an uploaded file against an extension allow-list and size limit,
/// returning its normalized extension.
pub fn check_upload(
    file_name: &str,
    size: usize,
    allowed: &[&str],
    max_bytes: usize,
) -> Result<String, CoreError> {
    let ext = extension_of(file_name).ok_or_else(|| {
        CoreError::Validation(format!("File '{file_name}' has no extension"))
    })?;
    if !allowed.contains(&ext.as_str()) {
        return Err(CoreError::Validation(format!(
            "Unsupported file type '.{ext}'. Allowed: {}",
            allowed.join(", ")
        )));
    }
    if size == 0 {
        return Err(CoreError::Validation("Uploaded file is empty".into()));
    }
    if size > max_bytes {
        return Err(CoreError::Validation(format!(
            "File exceeds the maximum size of {} MiB",
            max_bytes / (1024 * 1024)
        )));
    }
    Ok(ext)
}

/// MIME type to record and serve for a known extension.
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "zip" => "application/zip",
        "dwg" => "image/vnd.dwg",
        _ => "application/octet-stream",
    }
}
