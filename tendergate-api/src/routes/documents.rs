/// Qualification-document endpoints
///
/// Submission records metadata only; file transfer and content review are
/// external collaborators. A recorded document is the precondition for the
/// `upload_document -> choose_plan` transition, which the client requests
/// separately once the refreshed snapshot shows `documentStatus`.

use crate::{
    app::AppState,
    error::{ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Extension, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tendergate_shared::{
    auth::session::CurrentAccount,
    models::document::{CreateDocument, Document},
};
use validator::Validate;

/// Document submission request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDocumentRequest {
    /// Original file name
    #[validate(length(min = 1, max = 255, message = "File name must be 1-255 characters"))]
    pub file_name: String,
}

/// Document submission response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDocumentResponse {
    /// Always true
    pub success: bool,

    /// The recorded document
    pub document: Document,
}

/// Document list response
#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    /// Submissions, newest first
    pub documents: Vec<Document>,
}

/// Records a document submission for the signed-in account
///
/// # Endpoint
///
/// ```text
/// POST /v1/documents
/// Content-Type: application/json
///
/// { "fileName": "company-registration.pdf" }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Empty or oversized file name
pub async fn submit_document(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Json(req): Json<SubmitDocumentRequest>,
) -> ApiResult<Json<SubmitDocumentResponse>> {
    req.validate().map_err(|_| {
        crate::error::ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "fileName".to_string(),
            message: "File name must be 1-255 characters".to_string(),
        }])
    })?;

    let document = Document::create(
        &state.db,
        CreateDocument {
            account_id: current.account_id,
            file_name: req.file_name,
        },
    )
    .await?;

    tracing::info!(
        account_id = %current.account_id,
        document_id = %document.id,
        "document submission recorded"
    );

    Ok(Json(SubmitDocumentResponse {
        success: true,
        document,
    }))
}

/// Lists the account's submissions, newest first
///
/// # Endpoint
///
/// ```text
/// GET /v1/documents
/// ```
pub async fn list_documents(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> ApiResult<Json<DocumentListResponse>> {
    let documents = Document::list_for_account(&state.db, current.account_id).await?;
    Ok(Json(DocumentListResponse { documents }))
}
