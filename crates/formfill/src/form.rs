//! Fetch a form once, then fill and submit it as many times as needed.

use crate::answers::AnswerSet;
use crate::assembler::{assemble, SubmissionPayload};
use crate::extractor::fetch_form_dump;
use crate::generator::ScriptedGenerator;
use crate::http_client::HttpClient;
use crate::normalizer::parse_form_entries;
use crate::resolver::{resolve_fields, AnswerGenerator};
use crate::submitter::submit;
use crate::types::{FieldDescriptor, FormResult};

/// A form's normalized schema. Immutable once fetched.
#[derive(Debug, Clone)]
pub struct Form {
    pub url: String,
    pub fields: Vec<FieldDescriptor>,
}

/// Outcome of a batch submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub submitted: usize,
    pub failed: usize,
}

impl Form {
    /// Download and normalize the schema of the form at `url`.
    pub async fn fetch(client: &HttpClient, url: &str, only_required: bool) -> FormResult<Self> {
        let dump = fetch_form_dump(client, url).await?;
        let fields = parse_form_entries(&dump, only_required)?;
        Ok(Self {
            url: url.to_string(),
            fields,
        })
    }

    /// A resolved copy of the schema.
    pub fn fill(&self, generator: &mut dyn AnswerGenerator) -> Vec<FieldDescriptor> {
        let mut fields = self.fields.clone();
        resolve_fields(&mut fields, generator);
        fields
    }

    pub fn payload(&self, generator: &mut dyn AnswerGenerator) -> SubmissionPayload {
        assemble(&self.fill(generator))
    }

    /// Render the request body. Without a generator, values are left empty
    /// (pseudo-field defaults excepted), which is the schema view.
    pub fn request_body(&self, generator: Option<&mut dyn AnswerGenerator>, with_comment: bool) -> String {
        let payload = match generator {
            Some(gen) => self.payload(gen),
            None => assemble(&self.fields),
        };
        payload.render(with_comment)
    }

    /// Fill with `generator` and submit once.
    pub async fn submit_with(
        &self,
        client: &HttpClient,
        generator: &mut dyn AnswerGenerator,
    ) -> FormResult<SubmissionPayload> {
        let payload = self.payload(generator);
        submit(client, &self.url, &payload).await?;
        Ok(payload)
    }

    /// Submit one response per answer set, sequentially.
    ///
    /// A failed submission is logged and counted; the remaining sets are
    /// still submitted.
    pub async fn submit_answer_sets(&self, client: &HttpClient, sets: &[AnswerSet]) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, set) in sets.iter().enumerate() {
            tracing::info!("submitting form {}/{}", index + 1, sets.len());
            let mut generator = ScriptedGenerator::new(set.clone());
            match self.submit_with(client, &mut generator).await {
                Ok(_) => report.submitted += 1,
                Err(e) => {
                    tracing::warn!("submission {} failed: {e}", index + 1);
                    report.failed += 1;
                }
            }
        }

        report
    }
}
