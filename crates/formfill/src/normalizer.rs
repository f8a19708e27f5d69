//! Turn the raw positional schema into a flat list of [`FieldDescriptor`]s.
//!
//! Layout of `FB_PUBLIC_LOAD_DATA_` (as `v`) that we rely on:
//!
//! - `v[1][1]` — question array. For each question `q`:
//!   - `q[0]` container id, `q[1]` title, `q[3]` question type id
//!   - `q[4]` variant list (one entry per input; several for grids/scales):
//!     - `sub[0]` entry id used as the submission key
//!     - `sub[1]` options, `sub[1][i][0]` the i-th label (null for "other")
//!     - `sub[2]` required flag (`1` when required)
//!     - `sub[3]` row label(s) for grid and scale questions
//! - `v[1][10][6]` — email collection mode: `1` do not collect,
//!   `2` verified, `3` responder input.
//!
//! Each question is decoded once into [`RawQuestion`]; shapes we don't
//! recognise are skipped with a warning rather than failing the whole form.

use crate::extractor::RawFormDump;
use crate::types::{
    FieldDescriptor, FieldKind, FormError, FormResult, QuestionType, ANY_TEXT_FIELD,
    EMAIL_FIELD_ID, PAGE_HISTORY_FIELD_ID,
};
use serde_json::Value;

/// Email collection mode meaning "do not collect".
const EMAIL_NOT_COLLECTED: i64 = 1;

/// A question decoded from the positional array.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuestion {
    pub title: String,
    pub question_type: QuestionType,
    pub variants: RawVariants,
}

/// The variant list of a question.
#[derive(Debug, Clone, PartialEq)]
pub enum RawVariants {
    Present(Vec<RawVariant>),
    /// `q[4]` was null or not an array (titles, images, videos...).
    Malformed,
}

/// One physical input of a question.
#[derive(Debug, Clone, PartialEq)]
pub struct RawVariant {
    pub id: String,
    /// `None` when the input takes free text.
    pub options: Option<Vec<Option<String>>>,
    pub required: bool,
    pub labels: Option<Vec<String>>,
}

impl RawQuestion {
    /// Decode one entry of `v[1][1]`. Returns `None` if the entry itself is
    /// not an array.
    pub fn decode(entry: &Value) -> Option<Self> {
        let fields = entry.as_array()?;
        let title = fields
            .get(1)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let question_type = QuestionType::from_id(fields.get(3).and_then(Value::as_i64).unwrap_or(-1));

        let variants = match fields.get(4).and_then(Value::as_array) {
            Some(subs) => RawVariants::Present(
                subs.iter()
                    .filter_map(|sub| {
                        let decoded = RawVariant::decode(sub);
                        if decoded.is_none() {
                            tracing::warn!("skipping malformed sub-entry in '{title}': {sub}");
                        }
                        decoded
                    })
                    .collect(),
            ),
            None => RawVariants::Malformed,
        };

        Some(Self {
            title,
            question_type,
            variants,
        })
    }
}

impl RawVariant {
    fn decode(sub: &Value) -> Option<Self> {
        let fields = sub.as_array()?;
        let id = match fields.first()? {
            Value::Number(n) => n.to_string(),
            Value::String(s) if !s.is_empty() => s.clone(),
            _ => return None,
        };

        let options = fields
            .get(1)
            .and_then(Value::as_array)
            .filter(|opts| !opts.is_empty())
            .map(|opts| {
                opts.iter()
                    .map(|opt| {
                        opt.get(0)
                            .and_then(Value::as_str)
                            .filter(|label| !label.is_empty())
                            .map(str::to_string)
                    })
                    .collect()
            });

        let required = fields.get(2).and_then(Value::as_i64) == Some(1);

        let labels = fields
            .get(3)
            .and_then(Value::as_array)
            .filter(|labels| !labels.is_empty())
            .map(|labels| {
                labels
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            });

        Some(Self {
            id,
            options,
            required,
            labels,
        })
    }

    fn into_descriptor(self, container_name: &str, question_type: QuestionType) -> FieldDescriptor {
        FieldDescriptor {
            id: self.id,
            container_name: container_name.to_string(),
            kind: FieldKind::Question(question_type),
            required: self.required,
            name: self.labels.map(|l| l.join(" - ")),
            options: self.options.map(|opts| {
                opts.into_iter()
                    .map(|o| o.unwrap_or_else(|| ANY_TEXT_FIELD.to_string()))
                    .collect()
            }),
            hint: None,
            default_value: None,
        }
    }
}

/// Parse the raw dump into field descriptors.
///
/// Fails with [`FormError::Schema`] when the question array is missing,
/// which usually means the form requires a login.
pub fn parse_form_entries(dump: &RawFormDump, only_required: bool) -> FormResult<Vec<FieldDescriptor>> {
    let root = dump.as_value();
    let questions = root
        .get(1)
        .and_then(|v| v.get(1))
        .and_then(Value::as_array)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| {
            tracing::warn!("form dump has no question array");
            FormError::Schema("can't get form entries".to_string())
        })?;

    let mut fields = Vec::new();
    let mut page_count = 0usize;

    for entry in questions {
        let Some(question) = RawQuestion::decode(entry) else {
            tracing::warn!("skipping non-array question entry: {entry}");
            continue;
        };

        if question.question_type == QuestionType::PageBreak {
            page_count += 1;
            continue;
        }

        let RawVariants::Present(variants) = question.variants else {
            tracing::warn!("variant list is not iterable for entry: {entry}");
            continue;
        };

        if let QuestionType::Unknown(id) = question.question_type {
            tracing::warn!("unrecognised question type {id} for '{}'", question.title);
        }

        for variant in variants {
            if only_required && !variant.required {
                continue;
            }
            fields.push(variant.into_descriptor(&question.title, question.question_type));
        }
    }

    if page_count > 0 {
        fields.push(page_history_field(page_count));
    }

    let email_mode = root
        .get(1)
        .and_then(|v| v.get(10))
        .and_then(|v| v.get(6))
        .and_then(Value::as_i64)
        .unwrap_or(EMAIL_NOT_COLLECTED);
    if email_mode > EMAIL_NOT_COLLECTED {
        fields.push(email_field());
    }

    tracing::info!(
        "parsed {} field(s) from {} question(s), {page_count} page break(s)",
        fields.len(),
        questions.len()
    );
    Ok(fields)
}

fn page_history_field(page_count: usize) -> FieldDescriptor {
    let history = (0..=page_count)
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(",");

    FieldDescriptor {
        id: PAGE_HISTORY_FIELD_ID.to_string(),
        container_name: "Page History".to_string(),
        kind: FieldKind::Required,
        required: false,
        name: None,
        options: None,
        hint: Some("from 0 to (number of page - 1)".to_string()),
        default_value: Some(history.into()),
    }
}

fn email_field() -> FieldDescriptor {
    FieldDescriptor {
        id: EMAIL_FIELD_ID.to_string(),
        container_name: "Email Address".to_string(),
        kind: FieldKind::Required,
        required: true,
        name: None,
        options: None,
        hint: Some("email address".to_string()),
        default_value: None,
    }
}
