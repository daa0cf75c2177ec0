//! Handlers for technical documents attached to a projet.

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use khayroukum_core::document::{
    self, DocumentType, DOCUMENT_EXTENSIONS, MAX_DOCUMENT_BYTES,
};
use khayroukum_core::policy;
use khayroukum_core::types::DbId;
use khayroukum_db::models::document::{CreateDocument, DocumentTechnique, ReviewDocument};
use khayroukum_db::repositories::DocumentRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::projet::find_visible_projet;
use crate::handlers::upload::UploadForm;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::notifications::Notice;
use crate::response::DataResponse;
use crate::state::AppState;

/// A document with the public URL of its file.
#[derive(Debug, Serialize)]
pub struct DocumentView {
    #[serde(flatten)]
    pub document: DocumentTechnique,
    pub url: String,
}

impl DocumentView {
    fn new(state: &AppState, document: DocumentTechnique) -> Self {
        let url = state.storage.url(&document.file_path);
        Self { document, url }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReviewDocumentRequest {
    pub review_status: String,
    #[validate(length(max = 2000))]
    pub review_comment: Option<String>,
}

async fn find_document(state: &AppState, projet_id: DbId, id: DbId) -> AppResult<DocumentTechnique> {
    DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|d| d.projet_id == projet_id)
        .ok_or_else(|| AppError::not_found("DocumentTechnique", id))
}

/// GET /api/projets/{projet_id}/documents
pub async fn list_documents(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(projet_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<DocumentView>>>> {
    find_visible_projet(&state, &auth, projet_id).await?;
    let documents = DocumentRepo::list_by_projet(&state.pool, projet_id).await?;
    Ok(Json(DataResponse {
        data: documents
            .into_iter()
            .map(|d| DocumentView::new(&state, d))
            .collect(),
    }))
}

/// POST /api/projets/{projet_id}/documents
///
/// Multipart form with `titre`, `type_document` and `file`. Only the
/// projet creator may upload.
pub async fn upload_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(projet_id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<DocumentView>>)> {
    let projet = find_visible_projet(&state, &auth, projet_id).await?;
    if !policy::can_upload_document(&auth.actor(), projet.created_by) {
        return Err(AppError::forbidden(
            "Only the projet creator can upload documents",
        ));
    }

    let mut form = UploadForm::read(multipart).await?;
    let titre = form.require_text("titre")?;
    let type_document = DocumentType::parse(&form.require_text("type_document")?)?;
    let file = form.take_file()?;
    let ext = document::check_upload(
        &file.file_name,
        file.bytes.len(),
        DOCUMENT_EXTENSIONS,
        MAX_DOCUMENT_BYTES,
    )?;

    let file_path = state
        .storage
        .put(&format!("documents/{projet_id}"), &ext, &file.bytes)
        .await?;

    let created = DocumentRepo::create(
        &state.pool,
        &CreateDocument {
            projet_id,
            titre,
            type_document: type_document.as_str().to_string(),
            file_path: file_path.clone(),
            original_name: file.file_name,
            mime_type: document::mime_for_extension(&ext).to_string(),
            size_bytes: file.bytes.len() as i64,
            uploaded_by: auth.user_id,
        },
    )
    .await;
    let created = match created {
        Ok(doc) => doc,
        Err(e) => {
            state.storage.delete_quietly(&file_path).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        document_id = created.id,
        projet_id,
        size_bytes = created.size_bytes,
        "Document uploaded"
    );
    state
        .notifier()
        .notify_admins(&Notice::document_ajoute(&created, &projet.titre), Some(auth.user_id))
        .await;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: DocumentView::new(&state, created),
        }),
    ))
}

/// GET /api/projets/{projet_id}/documents/{id}
pub async fn get_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((projet_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<DocumentView>>> {
    find_visible_projet(&state, &auth, projet_id).await?;
    let document = find_document(&state, projet_id, id).await?;
    Ok(Json(DataResponse {
        data: DocumentView::new(&state, document),
    }))
}

/// GET /api/projets/{projet_id}/documents/{id}/download
pub async fn download_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((projet_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    find_visible_projet(&state, &auth, projet_id).await?;
    let document = find_document(&state, projet_id, id).await?;
    let bytes = state.storage.read(&document.file_path).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        document.original_name.replace(['"', '\\'], "_")
    );
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, document.mime_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

/// PATCH /api/projets/{projet_id}/documents/{id}/review
pub async fn review_document(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path((projet_id, id)): Path<(DbId, DbId)>,
    ValidatedJson(input): ValidatedJson<ReviewDocumentRequest>,
) -> AppResult<Json<DataResponse<DocumentView>>> {
    find_document(&state, projet_id, id).await?;
    document::validate_review(&input.review_status, input.review_comment.as_deref())?;

    let reviewed = DocumentRepo::review(
        &state.pool,
        id,
        &ReviewDocument {
            review_status: input.review_status,
            review_comment: input.review_comment,
            reviewed_by: admin.user_id,
        },
    )
    .await?
    .ok_or_else(|| AppError::not_found("DocumentTechnique", id))?;

    tracing::info!(
        document_id = id,
        admin_id = admin.user_id,
        review_status = %reviewed.review_status,
        "Document reviewed"
    );
    state
        .notifier()
        .notify(reviewed.uploaded_by, &Notice::document_revise(&reviewed))
        .await;

    Ok(Json(DataResponse {
        data: DocumentView::new(&state, reviewed),
    }))
}

/// DELETE /api/projets/{projet_id}/documents/{id}
pub async fn delete_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((projet_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let document = find_document(&state, projet_id, id).await?;
    if !policy::can_delete_document(&auth.actor(), document.uploaded_by) {
        return Err(AppError::forbidden("You cannot delete this document"));
    }

    let deleted = DocumentRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("DocumentTechnique", id))?;
    state.storage.delete_quietly(&deleted.file_path).await;

    tracing::info!(document_id = id, user_id = auth.user_id, "Document deleted");
    Ok(StatusCode::NO_CONTENT)
}
