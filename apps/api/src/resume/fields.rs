//! Structured candidate fields extracted by the language model.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::llm_client::{call_json, LanguageModel, LlmError};
use crate::resume::prompts::build_resume_prompt;

/// Candidate fields as returned by the model and echoed back to the caller.
///
/// Missing or `null` string fields become empty strings and a missing `skills` list
/// becomes empty. `email` stays optional here; the contact upsert rejects a resume
/// without one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResume {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ParsedResume {
    /// First whitespace-separated token is the first name; the rest, joined by single
    /// spaces, is the last name.
    pub fn split_name(&self) -> (String, String) {
        let mut parts = self.name.split_whitespace();
        let first = parts.next().unwrap_or_default().to_string();
        let last = parts.collect::<Vec<_>>().join(" ");
        (first, last)
    }

    /// Trimmed, non-blank skills with duplicates removed, in first-seen order.
    pub fn distinct_skills(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty() && seen.insert(*s))
            .map(String::from)
            .collect()
    }
}

/// Asks the model for the candidate fields of `resume_text`.
///
/// An answer that is not valid JSON for `ParsedResume`, even after fence stripping,
/// is an `LlmError::Parse`.
pub async fn extract_fields(
    model: &dyn LanguageModel,
    resume_text: &str,
) -> Result<ParsedResume, LlmError> {
    let prompt = build_resume_prompt(resume_text);
    let parsed: ParsedResume = call_json(model, &prompt).await?;

    debug!(
        model = model.model_name(),
        skills = parsed.skills.len(),
        has_email = parsed.email.is_some(),
        "Resume fields extracted"
    );
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeModel;

    fn named(name: &str) -> ParsedResume {
        ParsedResume {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_split_name() {
        assert_eq!(
            named("John Doe").split_name(),
            ("John".to_string(), "Doe".to_string())
        );
        assert_eq!(
            named("  Mary   Ann  van Buren ").split_name(),
            ("Mary".to_string(), "Ann van Buren".to_string())
        );
        assert_eq!(named("Cher").split_name(), ("Cher".to_string(), String::new()));
        assert_eq!(named("   ").split_name(), (String::new(), String::new()));
    }

    #[test]
    fn test_distinct_skills() {
        let resume = ParsedResume {
            skills: vec![
                " Rust".to_string(),
                "Go".to_string(),
                "".to_string(),
                "Rust".to_string(),
                "SQL ".to_string(),
            ],
            ..Default::default()
        };
        assert_eq!(resume.distinct_skills(), vec!["Rust", "Go", "SQL"]);
    }

    #[test]
    fn test_nulls_and_missing_keys_default() {
        let parsed: ParsedResume = serde_json::from_str(
            r#"{"name": "Ada Lovelace", "email": null, "phone": null, "skills": null}"#,
        )
        .unwrap();
        assert_eq!(parsed.name, "Ada Lovelace");
        assert_eq!(parsed.email, None);
        assert_eq!(parsed.phone, "");
        assert!(parsed.skills.is_empty());
        assert_eq!(parsed.location, "");
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        let result = serde_json::from_str::<ParsedResume>(r#"{"skills": "Rust, Go"}"#);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_extract_fields_prompt_and_fenced_answer() {
        let model = FakeModel::answering(
            "```json\n{\"name\": \"John Doe\", \"email\": \"john@x.com\", \"skills\": [\"Python\"]}\n```",
        );
        let parsed = extract_fields(&model, "John Doe john@x.com").await.unwrap();

        assert_eq!(parsed.name, "John Doe");
        assert_eq!(parsed.email.as_deref(), Some("john@x.com"));
        assert_eq!(parsed.skills, vec!["Python"]);

        let prompt = model.last_prompt().unwrap();
        assert!(prompt.contains("\"job_title\""));
        assert!(prompt.ends_with("Resume Text:\n\n\nJohn Doe john@x.com"));
    }

    #[tokio::test]
    async fn test_extract_fields_trailing_comma_is_parse_error() {
        let model = FakeModel::answering("```json\n{\"name\": \"John\",}\n```");
        let err = extract_fields(&model, "text").await.unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }
}
