use std::sync::Arc;

use crate::hubspot::files::DocumentStore;
use crate::hubspot::CrmApi;
use crate::llm_client::LanguageModel;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The clients are built once at startup and shared by every in-flight request; nothing
/// request-scoped lives here.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn LanguageModel>,
    pub crm: Arc<dyn CrmApi>,
    /// Where original documents are kept. HubSpot File Manager in production.
    pub documents: Arc<dyn DocumentStore>,
    /// Document-store folder that receives every upload.
    pub folder_id: String,
}
