//! The prep pack returned by the generation backend, and the request that
//! produces it.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{LoadError, ValidationError};

/// Minimum number of characters in the trimmed job description.
pub const MIN_JOB_DESCRIPTION_CHARS: usize = 30;

/// Placeholder shown wherever a field has no content.
pub const PLACEHOLDER: &str = "—";

/// Seniority the pack should be tailored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Level {
    #[default]
    Intern,
    Fresher,
    Experienced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Intern => "Intern",
            Level::Fresher => "Fresher",
            Level::Experienced => "Experienced",
        }
    }

    pub fn all() -> Vec<Level> {
        vec![Level::Intern, Level::Fresher, Level::Experienced]
    }

    /// The level after this one, wrapping around.
    pub fn next(&self) -> Self {
        match self {
            Level::Intern => Level::Fresher,
            Level::Fresher => Level::Experienced,
            Level::Experienced => Level::Intern,
        }
    }
}

/// A technical question with the outline of a good answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechQuestion {
    pub question: String,
    pub answer_outline: String,
}

/// Structured result of one generation call. Read-only once created.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrepPack {
    #[serde(default, deserialize_with = "null_as_default")]
    pub role_summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tech_questions: Vec<TechQuestion>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hr_questions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resume_improvements: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub study_plan: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl PrepPack {
    /// Decode a pack from JSON. This is the only way untrusted JSON becomes a
    /// `PrepPack`, both for backend responses and for the stored slot.
    /// Missing question fields are rejected by the typed decoding; blank
    /// strings are kept and shown as the placeholder.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(LoadError::Parse(format!(
                "expected a JSON object, found {}",
                json_kind(&value)
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Summary text, or the placeholder when it is blank.
    pub fn summary_or_placeholder(&self) -> &str {
        or_placeholder(&self.role_summary)
    }
}

/// `text`, or the placeholder when it is blank.
pub fn or_placeholder(text: &str) -> &str {
    if text.trim().is_empty() {
        PLACEHOLDER
    } else {
        text
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Body of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub job_description: String,
    pub resume_text: String,
    pub level: Level,
}

impl GenerateRequest {
    /// Build a request, rejecting a job description that is too short once
    /// surrounding whitespace is removed.
    pub fn new(
        job_description: &str,
        resume_text: &str,
        level: Level,
    ) -> Result<Self, ValidationError> {
        let actual = job_description.trim().chars().count();
        if actual < MIN_JOB_DESCRIPTION_CHARS {
            return Err(ValidationError::JobDescriptionTooShort {
                min: MIN_JOB_DESCRIPTION_CHARS,
                actual,
            });
        }

        Ok(Self {
            job_description: job_description.to_string(),
            resume_text: resume_text.to_string(),
            level,
        })
    }
}

/// Whether the form may submit this job description.
pub fn can_generate(job_description: &str) -> bool {
    job_description.trim().chars().count() >= MIN_JOB_DESCRIPTION_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_null_lists_are_empty() {
        let pack = PrepPack::from_json(r#"{"role_summary": "X", "hr_questions": null}"#).unwrap();
        assert_eq!(pack.role_summary, "X");
        assert!(pack.required_skills.is_empty());
        assert!(pack.tech_questions.is_empty());
        assert!(pack.hr_questions.is_empty());
        assert!(pack.study_plan.is_empty());
    }

    #[test]
    fn test_full_pack_decodes() {
        let json = r#"{
            "role_summary": "X",
            "required_skills": ["A", "B"],
            "tech_questions": [{"question": "Q1", "answer_outline": "O1"}],
            "hr_questions": ["H1"],
            "resume_improvements": ["R1"],
            "study_plan": ["Day1 plan"]
        }"#;
        let pack = PrepPack::from_json(json).unwrap();
        assert_eq!(pack.required_skills, vec!["A", "B"]);
        assert_eq!(pack.tech_questions[0].answer_outline, "O1");
        assert_eq!(pack.study_plan, vec!["Day1 plan"]);
    }

    #[test]
    fn test_non_object_is_parse_error() {
        assert!(matches!(PrepPack::from_json("[1, 2]"), Err(LoadError::Parse(_))));
        assert!(matches!(PrepPack::from_json("not json"), Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_wrong_field_type_is_parse_error() {
        let result = PrepPack::from_json(r#"{"required_skills": "Rust"}"#);
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_question_without_outline_is_parse_error() {
        let result = PrepPack::from_json(r#"{"tech_questions": [{"question": "Q1"}]}"#);
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_blank_question_is_kept() {
        let pack = PrepPack::from_json(
            r#"{"role_summary": "X", "tech_questions": [{"question": "", "answer_outline": "O1"}]}"#,
        )
        .unwrap();
        assert_eq!(pack.tech_questions.len(), 1);
        assert_eq!(pack.tech_questions[0].question, "");
        assert_eq!(or_placeholder(&pack.tech_questions[0].question), PLACEHOLDER);
        assert_eq!(or_placeholder("O1"), "O1");
    }

    #[test]
    fn test_short_job_description_rejected() {
        let err = GenerateRequest::new("short", "", Level::Intern).unwrap_err();
        assert_eq!(err, ValidationError::JobDescriptionTooShort { min: 30, actual: 5 });
        assert!(!can_generate("short"));
    }

    #[test]
    fn test_length_is_measured_after_trim() {
        let padded = format!("   {}   ", "a".repeat(29));
        assert!(GenerateRequest::new(&padded, "", Level::Fresher).is_err());

        let exact = "a".repeat(30);
        let request = GenerateRequest::new(&exact, "cv", Level::Fresher).unwrap();
        assert_eq!(request.level, Level::Fresher);
        assert!(can_generate(&exact));
    }

    #[test]
    fn test_request_serializes_level_name() {
        let request = GenerateRequest::new(&"x".repeat(40), "", Level::Experienced).unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["level"], "Experienced");
        assert_eq!(json["resume_text"], "");
    }

    #[test]
    fn test_level_cycles() {
        assert_eq!(Level::Intern.next(), Level::Fresher);
        assert_eq!(Level::Experienced.next(), Level::Intern);
        assert_eq!(Level::default(), Level::Intern);
        assert_eq!(Level::all().len(), 3);
    }

    #[test]
    fn test_summary_placeholder() {
        let pack = PrepPack::default();
        assert_eq!(pack.summary_or_placeholder(), PLACEHOLDER);
    }
}
