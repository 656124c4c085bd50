//! In-memory stand-ins for the outbound services, shared by unit and endpoint tests.
//! Each fake is a cheap clone over shared state so a test can keep a handle for
//! assertions after handing a copy to `AppState`.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::hubspot::contacts::ContactProperties;
use crate::hubspot::files::{DocumentStore, UploadError};
use crate::hubspot::properties::{EnumerationUpdate, PropertyOption};
use crate::hubspot::{CrmApi, CrmError};
use crate::llm_client::{LanguageModel, LlmError};
use crate::state::AppState;

pub const TEST_FOLDER_ID: &str = "folder-test";

pub fn test_state(model: &FakeModel, crm: &FakeCrm, store: &FakeStore) -> AppState {
    AppState {
        llm: Arc::new(model.clone()),
        crm: Arc::new(crm.clone()),
        documents: Arc::new(store.clone()),
        folder_id: TEST_FOLDER_ID.to_string(),
    }
}

// ── Language model ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct FakeModel {
    answer: String,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeModel {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            ..Default::default()
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn generate_json_text(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.answer.clone())
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

// ── Document store ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct FakeStore {
    url: String,
    uploads: Arc<Mutex<Vec<String>>>,
}

impl FakeStore {
    pub fn returning(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Default::default()
        }
    }

    /// Filenames uploaded so far.
    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    async fn upload(
        &self,
        _data: Bytes,
        filename: &str,
        folder_id: &str,
    ) -> Result<String, UploadError> {
        assert_eq!(folder_id, TEST_FOLDER_ID);
        self.uploads.lock().unwrap().push(filename.to_string());
        Ok(self.url.clone())
    }
}

// ── CRM ─────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct CrmRecords {
    skill_options: Vec<PropertyOption>,
    contacts: Vec<(String, String)>,
    created: Vec<ContactProperties>,
    updated: Vec<(String, ContactProperties)>,
    searches: usize,
    calls: usize,
}

#[derive(Clone, Default)]
pub struct FakeCrm {
    records: Arc<Mutex<CrmRecords>>,
}

impl FakeCrm {
    pub fn with_skill_options(self, values: &[&str]) -> Self {
        self.records.lock().unwrap().skill_options = values
            .iter()
            .map(|v| PropertyOption {
                label: v.to_string(),
                value: v.to_string(),
            })
            .collect();
        self
    }

    pub fn with_contact(self, id: &str, email: &str) -> Self {
        self.records
            .lock()
            .unwrap()
            .contacts
            .push((id.to_string(), email.to_string()));
        self
    }

    pub fn skill_values(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .skill_options
            .iter()
            .map(|o| o.value.clone())
            .collect()
    }

    pub fn created(&self) -> Vec<ContactProperties> {
        self.records.lock().unwrap().created.clone()
    }

    pub fn updated(&self) -> Vec<(String, ContactProperties)> {
        self.records.lock().unwrap().updated.clone()
    }

    pub fn searches(&self) -> usize {
        self.records.lock().unwrap().searches
    }

    /// Total number of CRM operations of any kind.
    pub fn calls(&self) -> usize {
        self.records.lock().unwrap().calls
    }
}

#[async_trait]
impl CrmApi for FakeCrm {
    async fn property_options(&self, _property: &str) -> Result<Vec<PropertyOption>, CrmError> {
        let mut records = self.records.lock().unwrap();
        records.calls += 1;
        Ok(records.skill_options.clone())
    }

    async fn update_enumeration(
        &self,
        _property: &str,
        update: &EnumerationUpdate,
    ) -> Result<(), CrmError> {
        let mut records = self.records.lock().unwrap();
        records.calls += 1;
        records.skill_options = update.options.clone();
        Ok(())
    }

    async fn find_contact_by_email(&self, email: &str) -> Result<Option<String>, CrmError> {
        let mut records = self.records.lock().unwrap();
        records.calls += 1;
        records.searches += 1;
        Ok(records
            .contacts
            .iter()
            .find(|(_, e)| e == email)
            .map(|(id, _)| id.clone()))
    }

    async fn update_contact(
        &self,
        contact_id: &str,
        properties: &ContactProperties,
    ) -> Result<(), CrmError> {
        let mut records = self.records.lock().unwrap();
        records.calls += 1;
        records
            .updated
            .push((contact_id.to_string(), properties.clone()));
        Ok(())
    }

    async fn create_contact(&self, properties: &ContactProperties) -> Result<String, CrmError> {
        let mut records = self.records.lock().unwrap();
        records.calls += 1;
        let id = format!("{}", 1000 + records.created.len());
        records.created.push(properties.clone());
        if let Some(email) = &properties.email {
            records.contacts.push((id.clone(), email.clone()));
        }
        Ok(id)
    }
}
