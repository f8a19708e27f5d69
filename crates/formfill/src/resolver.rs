//! Reconcile generated answers with a field's fixed option set.
//!
//! Choice-type submissions must echo one of the form's option labels
//! verbatim, or use [`OTHER_OPTION`] together with a companion
//! `<id>.other_option_response` text field. Generated text rarely matches
//! exactly, so both sides are normalized before comparison and the original
//! option label is what gets stored.

use crate::types::{
    Answer, FieldDescriptor, FieldKind, OTHER_OPTION, OTHER_OPTION_RESPONSE_SUFFIX,
};
use unicode_normalization::UnicodeNormalization;

/// Source of candidate answers for unresolved fields.
pub trait AnswerGenerator {
    /// Produce a candidate answer for `field`. The candidate does not have to
    /// match the field's options; the resolver reconciles it.
    fn answer(&mut self, field: &FieldDescriptor) -> Answer;
}

impl<F> AnswerGenerator for F
where
    F: FnMut(&FieldDescriptor) -> Answer,
{
    fn answer(&mut self, field: &FieldDescriptor) -> Answer {
        self(field)
    }
}

/// Normalize text for option comparison only.
///
/// Folds quote variants to `'`, strips diacritics and any other non-ASCII,
/// collapses whitespace runs, trims and lowercases.
pub fn normalize_text(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201B}' | '\u{02BC}' | '\u{2032}' | '`' | '\u{00B4}' => '\'',
            other => other,
        })
        .collect();

    let ascii: String = folded.nfkd().filter(char::is_ascii).collect();

    ascii
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Find the original option matching `candidate`.
///
/// An exact match wins. Otherwise the normalized forms are compared, but
/// only when the candidate keeps some ASCII text: scripts such as CJK or
/// Cyrillic normalize to `""` and would all collide.
fn match_option<'a>(candidate: &str, options: &'a [String]) -> Option<&'a str> {
    if let Some(exact) = options.iter().find(|opt| opt.as_str() == candidate) {
        return Some(exact.as_str());
    }

    let wanted = normalize_text(candidate);
    if wanted.is_empty() {
        return None;
    }
    options
        .iter()
        .find(|opt| normalize_text(opt) == wanted)
        .map(String::as_str)
}

fn other_response_field(field: &FieldDescriptor, text: String) -> FieldDescriptor {
    FieldDescriptor {
        id: format!("{}{OTHER_OPTION_RESPONSE_SUFFIX}", field.id),
        container_name: format!("{} (Other)", field.container_name),
        kind: FieldKind::Text,
        required: field.required,
        name: None,
        options: None,
        hint: None,
        default_value: Some(Answer::One(text)),
    }
}

/// Store `candidate` on `field`, matched against its options.
///
/// Returns the synthetic "other" response field when the candidate fell
/// outside the option set. A field that already has a default is left
/// untouched.
pub fn resolve_field(field: &mut FieldDescriptor, candidate: Answer) -> Option<FieldDescriptor> {
    if field.default_value.is_some() {
        return None;
    }

    let options = match field.options.as_deref() {
        Some(opts) if !opts.is_empty() && !candidate.is_empty() => opts,
        _ => {
            field.default_value = Some(candidate);
            return None;
        }
    };

    match candidate {
        Answer::One(text) => {
            tracing::debug!(
                "comparing '{}' against {} option(s) of {}",
                normalize_text(&text),
                options.len(),
                field.id
            );
            if let Some(original) = match_option(&text, options) {
                field.default_value = Some(Answer::One(original.to_string()));
                None
            } else {
                field.default_value = Some(Answer::One(OTHER_OPTION.to_string()));
                Some(other_response_field(field, text))
            }
        }
        Answer::Many(values) => {
            let mut selected = Vec::with_capacity(values.len());
            let mut unmatched = Vec::new();
            for value in values {
                match match_option(&value, options) {
                    Some(original) if !selected.iter().any(|s| s == original) => {
                        selected.push(original.to_string())
                    }
                    Some(_) => {}
                    None if value.trim().is_empty() => {}
                    None => unmatched.push(value),
                }
            }

            let other = if unmatched.is_empty() {
                None
            } else {
                selected.push(OTHER_OPTION.to_string());
                Some(other_response_field(field, unmatched.join(", ")))
            };
            field.default_value = Some(Answer::Many(selected));
            other
        }
    }
}

/// Resolve every field without a default using `generator`.
///
/// Original descriptors are processed first; synthesized "other" response
/// fields are appended afterwards in the order they were created.
pub fn resolve_fields(fields: &mut Vec<FieldDescriptor>, generator: &mut dyn AnswerGenerator) {
    let mut synthesized = Vec::new();

    for field in fields.iter_mut() {
        if field.default_value.is_some() {
            continue;
        }
        let candidate = generator.answer(field);
        if let Some(other) = resolve_field(field, candidate) {
            synthesized.push(other);
        }
    }

    fields.extend(synthesized);
}
