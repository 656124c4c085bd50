// Resume field extraction prompt.
// The model is also asked for JSON via the response MIME type; the schema text here is
// what pins the field names.

pub const RESUME_PARSE_PROMPT: &str = r#"
You are a resume parser. Extract the following fields from the resume text below and output ONLY a VALID JSON object that exactly matches this schema (no extra text, formatting, or comments):

{
  "name": "",         // Full name of the candidate
  "email": "",        // Email address
  "phone": "",        // Contact number
  "job_title": "",    // Current or most recent job title
  "skills": [],       // List of key technical and soft skills
  "experience": "",   // Brief summary of professional experience
  "company": "",      // Current or most recent employer
  "location": ""      // City and state/country
}

Resume Text:
"#;

/// Instruction block, a blank line, then the extracted text.
pub fn build_resume_prompt(resume_text: &str) -> String {
    format!("{RESUME_PARSE_PROMPT}\n\n{resume_text}")
}
