//! HubSpot REST client.
//!
//! One `HubSpotClient` is built at startup and shared by every request. The CRM surface
//! the pipeline needs is expressed as the `CrmApi` trait; the taxonomy merge and the
//! contact upsert are written against the trait, not the HTTP client.

pub mod contacts;
pub mod files;
pub mod properties;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::hubspot::contacts::ContactProperties;
use crate::hubspot::properties::{EnumerationUpdate, PropertyOption};

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("parsed resume has no '{0}' value")]
    MissingField(&'static str),
}

/// The CRM operations the pipeline performs against contacts and their schema.
#[async_trait]
pub trait CrmApi: Send + Sync {
    /// Current options of a contact enumeration property.
    async fn property_options(&self, property: &str) -> Result<Vec<PropertyOption>, CrmError>;

    /// Replaces the full definition of a contact enumeration property.
    async fn update_enumeration(
        &self,
        property: &str,
        update: &EnumerationUpdate,
    ) -> Result<(), CrmError>;

    /// Id of the first contact whose `email` equals `email`, if any.
    async fn find_contact_by_email(&self, email: &str) -> Result<Option<String>, CrmError>;

    async fn update_contact(
        &self,
        contact_id: &str,
        properties: &ContactProperties,
    ) -> Result<(), CrmError>;

    /// Creates a contact and returns its id.
    async fn create_contact(&self, properties: &ContactProperties) -> Result<String, CrmError>;
}

#[derive(Clone)]
pub struct HubSpotClient {
    client: Client,
    api_base: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct HubSpotErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct PropertyResponse {
    #[serde(default)]
    options: Vec<PropertyOption>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ObjectRef>,
}

#[derive(Debug, Deserialize)]
struct ObjectRef {
    id: String,
}

#[derive(Debug, Serialize)]
struct PropertiesInput<'a> {
    properties: &'a ContactProperties,
}

impl HubSpotClient {
    pub fn new(api_base: impl Into<String>, token: String) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    pub(crate) fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(&self.token)
    }

    /// Sends the request and turns any non-success status into `CrmError::Api`,
    /// preferring HubSpot's `message` field over the raw body.
    async fn execute(&self, request: RequestBuilder) -> Result<Response, CrmError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<HubSpotErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(CrmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, CrmError> {
        let response = self.execute(request).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| CrmError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CrmApi for HubSpotClient {
    async fn property_options(&self, property: &str) -> Result<Vec<PropertyOption>, CrmError> {
        let path = format!("/crm/v3/properties/contacts/{property}");
        let response: PropertyResponse = self
            .execute_json(self.request(reqwest::Method::GET, &path))
            .await?;
        Ok(response.options)
    }

    async fn update_enumeration(
        &self,
        property: &str,
        update: &EnumerationUpdate,
    ) -> Result<(), CrmError> {
        let path = format!("/crm/v3/properties/contacts/{property}");
        self.execute(self.request(reqwest::Method::PATCH, &path).json(update))
            .await?;
        Ok(())
    }

    async fn find_contact_by_email(&self, email: &str) -> Result<Option<String>, CrmError> {
        let body = json!({
            "filterGroups": [{
                "filters": [{"propertyName": "email", "operator": "EQ", "value": email}]
            }],
            "properties": ["email"],
            "limit": 1
        });
        let response: SearchResponse = self
            .execute_json(
                self.request(reqwest::Method::POST, "/crm/v3/objects/contacts/search")
                    .json(&body),
            )
            .await?;
        Ok(response.results.into_iter().next().map(|r| r.id))
    }

    async fn update_contact(
        &self,
        contact_id: &str,
        properties: &ContactProperties,
    ) -> Result<(), CrmError> {
        let path = format!("/crm/v3/objects/contacts/{contact_id}");
        self.execute(
            self.request(reqwest::Method::PATCH, &path)
                .json(&PropertiesInput { properties }),
        )
        .await?;
        Ok(())
    }

    async fn create_contact(&self, properties: &ContactProperties) -> Result<String, CrmError> {
        let created: ObjectRef = self
            .execute_json(
                self.request(reqwest::Method::POST, "/crm/v3/objects/contacts")
                    .json(&PropertiesInput { properties }),
            )
            .await?;
        Ok(created.id)
    }
}
