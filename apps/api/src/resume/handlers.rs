//! Axum route handlers for resume ingestion.

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::resume::fields::ParsedResume;
use crate::resume::pipeline::{process_resume, UploadedFile};
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const DEFAULT_FILENAME: &str = "resume";

/// POST /parse_resume/
///
/// Multipart upload with one `file` field. Responds with the fields the model extracted,
/// including the skills exactly as extracted (not the merged taxonomy).
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParsedResume>, AppError> {
    let file = read_upload(&mut multipart).await?;
    let outcome = process_resume(&state, file).await?;

    info!(
        contact_id = outcome.contact.contact_id(),
        file_url = %outcome.file_url,
        "Resume synced to CRM"
    );
    Ok(Json(outcome.parsed))
}

async fn read_upload(multipart: &mut Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidRequest(e.to_string()))?;

        return Ok(UploadedFile {
            filename,
            content_type,
            data,
        });
    }

    Err(AppError::InvalidRequest(format!(
        "multipart field '{FILE_FIELD}' is required"
    )))
}
