//! Global skill taxonomy kept on the contact `skills` enumeration property.
//!
//! The option list only ever grows. Every sync rewrites the whole list sorted by value with
//! `label == value`, so custom labels, display order, hidden flags and descriptions set
//! in HubSpot are not preserved.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::hubspot::{CrmApi, CrmError};

pub const SKILLS_PROPERTY: &str = "skills";
const SKILLS_LABEL: &str = "Skills";
const SKILLS_GROUP: &str = "contactinformation";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyOption {
    pub label: String,
    pub value: String,
}

impl PropertyOption {
    fn from_value(value: String) -> Self {
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Full replacement definition for an enumeration property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumerationUpdate {
    pub label: String,
    pub group_name: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub field_type: String,
    pub options: Vec<PropertyOption>,
}

impl EnumerationUpdate {
    fn skills(options: Vec<PropertyOption>) -> Self {
        Self {
            label: SKILLS_LABEL.to_string(),
            group_name: SKILLS_GROUP.to_string(),
            property_type: "enumeration".to_string(),
            field_type: "checkbox".to_string(),
            options,
        }
    }
}

/// Union of existing option values and `incoming`, sorted lexicographically by value.
pub fn merge_options(
    existing: &[PropertyOption],
    incoming: &BTreeSet<String>,
) -> Vec<PropertyOption> {
    existing
        .iter()
        .map(|opt| opt.value.clone())
        .chain(incoming.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(PropertyOption::from_value)
        .collect()
}

/// Reads the current skill options, merges `incoming` in, and pushes the merged list
/// back. Returns the option list that was written.
pub async fn merge_skills(
    crm: &dyn CrmApi,
    incoming: &BTreeSet<String>,
) -> Result<Vec<PropertyOption>, CrmError> {
    let existing = crm.property_options(SKILLS_PROPERTY).await?;
    let merged = merge_options(&existing, incoming);

    info!(
        existing = existing.len(),
        incoming = incoming.len(),
        merged = merged.len(),
        "Syncing skill taxonomy"
    );

    crm.update_enumeration(SKILLS_PROPERTY, &EnumerationUpdate::skills(merged.clone()))
        .await?;

    Ok(merged)
}
