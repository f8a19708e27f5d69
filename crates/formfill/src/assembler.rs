//! Build the submission payload from resolved fields.

use crate::types::{Answer, FieldDescriptor, FieldKind, FormResult, QuestionType};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::str::FromStr;

/// Human-readable description of a payload entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAnnotation {
    pub container_name: String,
    pub name: Option<String>,
    pub required: bool,
    pub options: Option<Vec<String>>,
    /// Shape of the expected value when there are no fixed options.
    pub value_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayloadEntry {
    pub key: String,
    pub value: Answer,
    pub annotation: FieldAnnotation,
}

/// Ordered `submission key -> value` mapping ready for transport.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionPayload {
    pub entries: Vec<PayloadEntry>,
}

fn value_hint(field: &FieldDescriptor) -> Option<String> {
    if field.hint.is_some() {
        return field.hint.clone();
    }
    let hint = match field.kind {
        FieldKind::Text => "any text",
        FieldKind::Required => return None,
        FieldKind::Question(q) => match q {
            QuestionType::ShortAnswer | QuestionType::Paragraph => "any text",
            QuestionType::Date => "YYYY-MM-DD",
            QuestionType::Time => "HH:MM",
            _ => return None,
        },
    };
    Some(hint.to_string())
}

/// Assemble resolved fields into a payload. Fields without a default are
/// sent as empty strings.
pub fn assemble(fields: &[FieldDescriptor]) -> SubmissionPayload {
    let entries = fields
        .iter()
        .map(|field| PayloadEntry {
            key: field.submission_key(),
            value: field.default_value.clone().unwrap_or_else(Answer::empty),
            annotation: FieldAnnotation {
                container_name: field.container_name.clone(),
                name: field.name.clone(),
                required: field.required,
                options: field.options.clone(),
                value_hint: value_hint(field),
            },
        })
        .collect();

    SubmissionPayload { entries }
}

impl SubmissionPayload {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Url-encodable pairs. Multi-valued answers repeat their key.
    pub fn form_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            match &entry.value {
                Answer::One(v) => pairs.push((entry.key.clone(), v.clone())),
                Answer::Many(values) => {
                    pairs.extend(values.iter().map(|v| (entry.key.clone(), v.clone())))
                }
            }
        }
        pairs
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|e| (e.key.clone(), e.value.to_json()))
            .collect();
        Value::Object(map)
    }

    /// Render as a request-body text.
    ///
    /// With `with_comment`, every entry is preceded by `#` lines describing
    /// the question and its options; without, the output is plain JSON.
    pub fn render(&self, with_comment: bool) -> String {
        let mut out = String::from("{\n");
        for (i, entry) in self.entries.iter().enumerate() {
            if with_comment {
                let a = &entry.annotation;
                let sub = a.name.as_deref().map(|n| format!(": {n}")).unwrap_or_default();
                let req = if a.required { " (required)" } else { "" };
                out.push_str(&format!("    # {}{sub}{req}\n", a.container_name));
                if let Some(options) = &a.options {
                    let listed = serde_json::to_string(options).unwrap_or_default();
                    out.push_str(&format!("    #   Options: {listed}\n"));
                } else if let Some(hint) = &a.value_hint {
                    out.push_str(&format!("    #   Option: {hint}\n"));
                }
            }
            let key = Value::String(entry.key.clone());
            let sep = if i + 1 < self.entries.len() { "," } else { "" };
            out.push_str(&format!("    {key}: {}{sep}\n", entry.value.to_json()));
        }
        out.push('}');
        out
    }
}

/// Where a rendered request body goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Console,
    /// Hand the body back to the caller.
    Return,
    File(PathBuf),
}

impl FromStr for OutputTarget {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "console" => OutputTarget::Console,
            "return" => OutputTarget::Return,
            path => OutputTarget::File(PathBuf::from(path)),
        })
    }
}

/// Deliver `body` to `target`. Returns the body only for [`OutputTarget::Return`].
pub fn write_request_body(body: String, target: &OutputTarget) -> FormResult<Option<String>> {
    match target {
        OutputTarget::Console => {
            println!("{body}");
            Ok(None)
        }
        OutputTarget::Return => Ok(Some(body)),
        OutputTarget::File(path) => {
            std::fs::write(path, body)?;
            tracing::info!("saved request body to {}", path.display());
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OTHER_OPTION, PAGE_HISTORY_FIELD_ID};

    fn resolved(id: &str, kind: FieldKind, value: Option<Answer>) -> FieldDescriptor {
        FieldDescriptor {
            id: id.to_string(),
            container_name: format!("Question {id}"),
            kind,
            required: true,
            name: None,
            options: None,
            hint: None,
            default_value: value,
        }
    }

    fn sample_fields() -> Vec<FieldDescriptor> {
        let mut choice = resolved(
            "1",
            FieldKind::Question(QuestionType::MultipleChoice),
            Some(OTHER_OPTION.into()),
        );
        choice.options = Some(vec!["Red".into(), "Green".into()]);
        vec![
            choice,
            resolved(
                "2",
                FieldKind::Question(QuestionType::Checkboxes),
                Some(Answer::Many(vec!["A".into(), "C".into()])),
            ),
            resolved("3", FieldKind::Question(QuestionType::Date), None),
            resolved(PAGE_HISTORY_FIELD_ID, FieldKind::Required, Some("0,1".into())),
            resolved("1.other_option_response", FieldKind::Text, Some("Teal \"blue\"".into())),
        ]
    }

    #[test]
    fn test_keys_and_defaults() {
        let payload = assemble(&sample_fields());
        let keys: Vec<_> = payload.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["entry.1", "entry.2", "entry.3", "pageHistory", "entry.1.other_option_response"]
        );
        assert_eq!(payload.entries[2].value, Answer::empty());
    }

    #[test]
    fn test_checkbox_repeats_key() {
        let pairs = assemble(&sample_fields()).form_pairs();
        let checkbox: Vec<_> = pairs.iter().filter(|(k, _)| k == "entry.2").collect();
        assert_eq!(checkbox.len(), 2);
        assert_eq!(checkbox[0].1, "A");
        assert_eq!(checkbox[1].1, "C");
    }

    #[test]
    fn test_render_without_comment_roundtrips() {
        let fields = sample_fields();
        let payload = assemble(&fields);
        let text = payload.render(false);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, payload.to_json());

        let obj = parsed.as_object().unwrap();
        assert_eq!(obj.len(), fields.len());
        for field in &fields {
            let expected = field.default_value.clone().unwrap_or_else(Answer::empty);
            assert_eq!(obj[&field.submission_key()], expected.to_json());
        }
    }

    #[test]
    fn test_render_with_comment() {
        let text = assemble(&sample_fields()).render(true);
        assert!(text.contains("    # Question 1 (required)\n"));
        assert!(text.contains("#   Options: [\"Red\",\"Green\"]"));
        assert!(text.contains("#   Option: YYYY-MM-DD"));
        assert!(text.contains("\"entry.2\": [\"A\",\"C\"],"));
        assert!(text.trim_end().ends_with('}'));
    }

    #[test]
    fn test_render_empty_payload_is_json() {
        let text = assemble(&[]).render(false);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert!(parsed.as_object().unwrap().is_empty());
    }

    #[test]
    fn test_output_target_parse() {
        assert_eq!("console".parse::<OutputTarget>().unwrap(), OutputTarget::Console);
        assert_eq!("return".parse::<OutputTarget>().unwrap(), OutputTarget::Return);
        assert_eq!(
            "out.json".parse::<OutputTarget>().unwrap(),
            OutputTarget::File(PathBuf::from("out.json"))
        );
    }

    #[test]
    fn test_write_to_file_and_return() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.txt");
        let target = OutputTarget::File(path.clone());
        assert!(write_request_body("{}".into(), &target).unwrap().is_none());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
        assert_eq!(
            write_request_body("{}".into(), &OutputTarget::Return).unwrap(),
            Some("{}".to_string())
        );
    }
}
