//! Private, non-overwriting uploads of the original resume into HubSpot File Manager.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::hubspot::HubSpotClient;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("upload rejected (status {status}): {body}")]
    Rejected { status: u16, body: String },

    /// The file was stored but no URL came back, so it cannot be referenced.
    #[error("file uploaded but no URL was returned")]
    MissingUrl,
}

/// Somewhere to keep the original document. Returns a retrievable URL.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn upload(
        &self,
        data: Bytes,
        filename: &str,
        folder_id: &str,
    ) -> Result<String, UploadError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: Option<String>,
}

fn upload_form(data: Bytes, filename: &str, folder_id: &str) -> Result<Form, UploadError> {
    let options = json!({"access": "PRIVATE", "overwrite": false}).to_string();

    Ok(Form::new()
        .part(
            "file",
            Part::bytes(data.to_vec()).file_name(filename.to_string()),
        )
        .text("fileName", filename.to_string())
        .text("folderId", folder_id.to_string())
        .text("access", "PRIVATE")
        .text("overwrite", "false")
        .part("options", Part::text(options).mime_str("application/json")?))
}

#[async_trait]
impl DocumentStore for HubSpotClient {
    async fn upload(
        &self,
        data: Bytes,
        filename: &str,
        folder_id: &str,
    ) -> Result<String, UploadError> {
        let size = data.len();
        let form = upload_form(data, filename, folder_id)?;

        let response = self
            .request(reqwest::Method::POST, "/files/v3/files")
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let uploaded: UploadResponse = response.json().await?;
        let url = uploaded
            .url
            .filter(|u| !u.is_empty())
            .ok_or(UploadError::MissingUrl)?;

        debug!(filename, size, "Uploaded original document");
        Ok(url)
    }
}
