//! The resume ingestion pipeline.
//!
//! `Extract Text → Upload Original → Extract Fields → Merge Skill Taxonomy → Upsert Contact`
//!
//! Stages run strictly in order and the first failure ends the run. Nothing is rolled
//! back: an uploaded file stays in the document store if a later stage fails.

use std::collections::BTreeSet;

use bytes::Bytes;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::hubspot::contacts::{upsert_contact, UpsertOutcome};
use crate::hubspot::properties::merge_skills;
use crate::resume::fields::{extract_fields, ParsedResume};
use crate::state::AppState;

/// One uploaded document. Lives only for the duration of a request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub parsed: ParsedResume,
    pub file_url: String,
    pub contact: UpsertOutcome,
}

pub async fn process_resume(
    state: &AppState,
    file: UploadedFile,
) -> Result<PipelineOutcome, AppError> {
    let span = info_span!(
        "parse_resume",
        request_id = %Uuid::new_v4(),
        filename = %file.filename,
    );
    run_stages(state, file).instrument(span).await
}

async fn run_stages(state: &AppState, file: UploadedFile) -> Result<PipelineOutcome, AppError> {
    info!(
        content_type = %file.content_type,
        bytes = file.data.len(),
        "Processing resume upload"
    );

    let text = extract_text(file.data.clone(), &file.content_type).await?;

    let file_url = state
        .documents
        .upload(file.data, &file.filename, &state.folder_id)
        .await?;
    info!(%file_url, "Original document stored");

    let parsed = extract_fields(state.llm.as_ref(), &text).await?;

    let incoming: BTreeSet<String> = parsed.distinct_skills().into_iter().collect();
    merge_skills(state.crm.as_ref(), &incoming).await?;

    let contact = upsert_contact(state.crm.as_ref(), &parsed, &file_url).await?;

    Ok(PipelineOutcome {
        parsed,
        file_url,
        contact,
    })
}
