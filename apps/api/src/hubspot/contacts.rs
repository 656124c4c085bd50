//! Find-or-create of the candidate's contact, keyed by email.

use serde::Serialize;
use tracing::info;

use crate::hubspot::{CrmApi, CrmError};
use crate::resume::fields::ParsedResume;

/// Contact properties written on create and update. `email` is only sent on create;
/// an update never rewrites the natural key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactProperties {
    pub firstname: String,
    pub lastname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone: String,
    pub jobtitle: String,
    pub company: String,
    /// Semicolon-joined multi-checkbox value.
    pub skills: String,
    pub resume_file_url: String,
}

impl ContactProperties {
    pub fn from_resume(parsed: &ParsedResume, file_url: &str) -> Self {
        let (firstname, lastname) = parsed.split_name();
        Self {
            firstname,
            lastname,
            email: None,
            phone: parsed.phone.clone(),
            jobtitle: parsed.job_title.clone(),
            company: parsed.company.clone(),
            skills: parsed.distinct_skills().join(";"),
            resume_file_url: file_url.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(String),
    Updated(String),
}

impl UpsertOutcome {
    pub fn contact_id(&self) -> &str {
        match self {
            UpsertOutcome::Created(id) | UpsertOutcome::Updated(id) => id,
        }
    }
}

/// Updates the first contact whose email matches `parsed.email`, or creates one.
///
/// Fields not listed in `ContactProperties` are left untouched on update.
pub async fn upsert_contact(
    crm: &dyn CrmApi,
    parsed: &ParsedResume,
    file_url: &str,
) -> Result<UpsertOutcome, CrmError> {
    let email = parsed
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or(CrmError::MissingField("email"))?;

    let mut properties = ContactProperties::from_resume(parsed, file_url);

    let outcome = match crm.find_contact_by_email(email).await? {
        Some(contact_id) => {
            crm.update_contact(&contact_id, &properties).await?;
            UpsertOutcome::Updated(contact_id)
        }
        None => {
            properties.email = Some(email.to_string());
            UpsertOutcome::Created(crm.create_contact(&properties).await?)
        }
    };

    info!(contact_id = outcome.contact_id(), ?outcome, "Contact upserted");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCrm;

    fn resume(email: Option<&str>) -> ParsedResume {
        ParsedResume {
            name: "John Doe".to_string(),
            email: email.map(String::from),
            phone: "(555) 123-4567".to_string(),
            job_title: "Senior Engineer".to_string(),
            skills: vec!["Python".to_string(), "Go".to_string(), "Python".to_string()],
            company: "Acme".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_properties_from_resume() {
        let props = ContactProperties::from_resume(&resume(Some("john@x.com")), "https://f/1");
        assert_eq!(props.firstname, "John");
        assert_eq!(props.lastname, "Doe");
        assert_eq!(props.email, None);
        assert_eq!(props.jobtitle, "Senior Engineer");
        assert_eq!(props.skills, "Python;Go");
        assert_eq!(props.resume_file_url, "https://f/1");
    }

    #[test]
    fn test_update_payload_omits_email() {
        let props = ContactProperties::from_resume(&resume(Some("john@x.com")), "u");
        let body = serde_json::to_value(&props).unwrap();
        assert!(body.get("email").is_none());
        assert_eq!(body["jobtitle"], "Senior Engineer");
    }

    #[tokio::test]
    async fn test_creates_contact_when_email_unknown() {
        let crm = FakeCrm::default();
        let outcome = upsert_contact(&crm, &resume(Some("john@x.com")), "https://f/1")
            .await
            .unwrap();

        assert!(matches!(outcome, UpsertOutcome::Created(_)));
        let created = crm.created();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].email.as_deref(), Some("john@x.com"));
        assert_eq!(created[0].firstname, "John");
        assert!(crm.updated().is_empty());
    }

    #[tokio::test]
    async fn test_updates_existing_contact() {
        let crm = FakeCrm::default().with_contact("42", "john@x.com");
        let outcome = upsert_contact(&crm, &resume(Some("john@x.com")), "https://f/2")
            .await
            .unwrap();

        assert_eq!(outcome, UpsertOutcome::Updated("42".to_string()));
        assert!(crm.created().is_empty());
        let updated = crm.updated();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].0, "42");
        assert_eq!(updated[0].1.resume_file_url, "https://f/2");
    }

    #[tokio::test]
    async fn test_missing_email_is_rejected_before_search() {
        let crm = FakeCrm::default();
        for email in [None, Some("   ")] {
            let err = upsert_contact(&crm, &resume(email), "u").await.unwrap_err();
            assert!(matches!(err, CrmError::MissingField("email")));
        }
        assert_eq!(crm.searches(), 0);
    }
}
