//! Post an assembled payload to the form's `formResponse` endpoint.

use crate::assembler::SubmissionPayload;
use crate::extractor::response_url;
use crate::http_client::{HttpClient, SUBMIT_TIMEOUT_MS};
use crate::types::{FormError, FormResult};

/// Submit `payload` to the response endpoint derived from `url`.
///
/// Any status other than 200 is a [`FormError::Submission`]; nothing is
/// retried.
pub async fn submit(client: &HttpClient, url: &str, payload: &SubmissionPayload) -> FormResult<()> {
    let url = response_url(url);
    let pairs = payload.form_pairs();
    tracing::debug!("posting {} pair(s) to {url}", pairs.len());

    let resp = client.post_form(&url, &pairs, SUBMIT_TIMEOUT_MS).await?;
    if !resp.is_ok() {
        tracing::warn!("can't submit form, HTTP {}", resp.status);
        return Err(FormError::Submission {
            url,
            status: resp.status,
        });
    }

    tracing::info!("form submitted successfully");
    Ok(())
}
