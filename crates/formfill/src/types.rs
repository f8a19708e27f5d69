//! Core data types for form fields, answers, and errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder for an option slot without a fixed label (any text accepted).
pub const ANY_TEXT_FIELD: &str = "ANY TEXT!!";

/// Value Google Forms expects when a closed-option answer uses the "other" slot.
pub const OTHER_OPTION: &str = "__other_option__";

/// Suffix of the free-text key paired with [`OTHER_OPTION`].
pub const OTHER_OPTION_RESPONSE_SUFFIX: &str = ".other_option_response";

/// Id of the synthetic email pseudo-field.
pub const EMAIL_FIELD_ID: &str = "emailAddress";

/// Id of the synthetic page-history pseudo-field.
pub const PAGE_HISTORY_FIELD_ID: &str = "pageHistory";

/// Question type ids as encoded in `FB_PUBLIC_LOAD_DATA_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    ShortAnswer,
    Paragraph,
    MultipleChoice,
    Dropdown,
    Checkboxes,
    LinearScale,
    TitleAndDescription,
    Grid,
    PageBreak,
    Date,
    Time,
    Image,
    Video,
    Unknown(i64),
}

impl QuestionType {
    pub fn from_id(id: i64) -> Self {
        match id {
            0 => QuestionType::ShortAnswer,
            1 => QuestionType::Paragraph,
            2 => QuestionType::MultipleChoice,
            3 => QuestionType::Dropdown,
            4 => QuestionType::Checkboxes,
            5 => QuestionType::LinearScale,
            6 => QuestionType::TitleAndDescription,
            7 => QuestionType::Grid,
            8 => QuestionType::PageBreak,
            9 => QuestionType::Date,
            10 => QuestionType::Time,
            11 => QuestionType::Image,
            12 => QuestionType::Video,
            other => QuestionType::Unknown(other),
        }
    }

    pub fn id(self) -> i64 {
        match self {
            QuestionType::ShortAnswer => 0,
            QuestionType::Paragraph => 1,
            QuestionType::MultipleChoice => 2,
            QuestionType::Dropdown => 3,
            QuestionType::Checkboxes => 4,
            QuestionType::LinearScale => 5,
            QuestionType::TitleAndDescription => 6,
            QuestionType::Grid => 7,
            QuestionType::PageBreak => 8,
            QuestionType::Date => 9,
            QuestionType::Time => 10,
            QuestionType::Image => 11,
            QuestionType::Video => 12,
            QuestionType::Unknown(id) => id,
        }
    }
}

/// What kind of input a [`FieldDescriptor`] stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "question", rename_all = "snake_case")]
pub enum FieldKind {
    /// Derived from one sub-entry of a form question.
    Question(QuestionType),
    /// Pseudo-field synthesized from form metadata (email, page history).
    /// Submitted under its bare id rather than `entry.<id>`.
    Required,
    /// Free-text companion of an "other" option.
    Text,
}

impl FieldKind {
    /// Short label used in annotations and prompts.
    pub fn label(&self) -> String {
        match self {
            FieldKind::Question(q) => q.id().to_string(),
            FieldKind::Required => "required".to_string(),
            FieldKind::Text => "text".to_string(),
        }
    }
}

/// A resolved or candidate answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    One(String),
    /// Several selections (checkboxes); submitted as a repeated key.
    Many(Vec<String>),
}

impl Answer {
    pub fn empty() -> Self {
        Answer::One(String::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Answer::One(s) => s.is_empty(),
            Answer::Many(v) => v.is_empty(),
        }
    }

    /// Convert an arbitrary JSON value from an answer set.
    ///
    /// Strings pass through, arrays become [`Answer::Many`], null becomes an
    /// empty answer and other scalars use their JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => Answer::One(s.clone()),
            Value::Null => Answer::empty(),
            Value::Array(items) => Answer::Many(items.iter().map(scalar_text).collect()),
            other => Answer::One(scalar_text(other)),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Answer::One(s) => Value::String(s.clone()),
            Answer::Many(v) => Value::Array(v.iter().cloned().map(Value::String).collect()),
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Answer::One(s.to_string())
    }
}

impl From<String> for Answer {
    fn from(s: String) -> Self {
        Answer::One(s)
    }
}

impl From<Vec<String>> for Answer {
    fn from(v: Vec<String>) -> Self {
        Answer::Many(v)
    }
}

/// One submittable input of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: String,
    pub container_name: String,
    pub kind: FieldKind,
    pub required: bool,
    /// Row label for grid and scale variants.
    pub name: Option<String>,
    pub options: Option<Vec<String>>,
    /// Free-form description of the expected value (pseudo-fields only).
    pub hint: Option<String>,
    pub default_value: Option<Answer>,
}

impl FieldDescriptor {
    /// Key under which this field is posted to `formResponse`.
    pub fn submission_key(&self) -> String {
        match self.kind {
            FieldKind::Required => self.id.clone(),
            _ => format!("entry.{}", self.id),
        }
    }

    pub fn is_pseudo(&self) -> bool {
        self.kind == FieldKind::Required
    }

    pub fn question_type(&self) -> Option<QuestionType> {
        match self.kind {
            FieldKind::Question(q) => Some(q),
            _ => None,
        }
    }

    /// Options with the free-text sentinel removed.
    pub fn labelled_options(&self) -> Vec<&str> {
        self.options
            .iter()
            .flatten()
            .map(String::as_str)
            .filter(|o| *o != ANY_TEXT_FIELD)
            .collect()
    }
}

/// Errors that can occur while extracting, filling, or submitting a form.
#[derive(thiserror::Error, Debug)]
pub enum FormError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Fetch error: HTTP {status} from {url}")]
    FetchStatus { url: String, status: u16 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Schema error: {0}. Login may be required")]
    Schema(String),

    #[error("Submission error: HTTP {status} from {url}")]
    Submission { url: String, status: u16 },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM response error: {0}")]
    LlmResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type.
pub type FormResult<T> = Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(kind: FieldKind) -> FieldDescriptor {
        FieldDescriptor {
            id: "123".to_string(),
            container_name: "Q".to_string(),
            kind,
            required: false,
            name: None,
            options: None,
            hint: None,
            default_value: None,
        }
    }

    #[test]
    fn test_question_type_ids_roundtrip() {
        for id in 0..=12 {
            assert_eq!(QuestionType::from_id(id).id(), id);
        }
        assert_eq!(QuestionType::from_id(42), QuestionType::Unknown(42));
    }

    #[test]
    fn test_submission_key_prefix() {
        assert_eq!(
            field(FieldKind::Question(QuestionType::ShortAnswer)).submission_key(),
            "entry.123"
        );
        assert_eq!(field(FieldKind::Text).submission_key(), "entry.123");
        assert_eq!(field(FieldKind::Required).submission_key(), "123");
    }

    #[test]
    fn test_answer_from_json() {
        assert_eq!(Answer::from_json(&json!("x")), Answer::One("x".into()));
        assert_eq!(Answer::from_json(&json!(null)), Answer::empty());
        assert_eq!(Answer::from_json(&json!(5)), Answer::One("5".into()));
        assert_eq!(
            Answer::from_json(&json!(["a", 2])),
            Answer::Many(vec!["a".into(), "2".into()])
        );
    }

    #[test]
    fn test_labelled_options_skip_sentinel() {
        let mut f = field(FieldKind::Question(QuestionType::MultipleChoice));
        f.options = Some(vec!["A".into(), ANY_TEXT_FIELD.into()]);
        assert_eq!(f.labelled_options(), vec!["A"]);
    }
}
