//! Pull the embedded `FB_PUBLIC_LOAD_DATA_` array out of a form page.
//!
//! Google Forms ships its schema as a JavaScript array literal inside an
//! inline `<script>`. We locate it with a DOTALL regex and decode it as JSON;
//! no DOM parsing is needed.

use crate::http_client::{HttpClient, FETCH_TIMEOUT_MS};
use crate::types::{FormError, FormResult};
use regex::Regex;
use serde_json::Value;

/// Script variable holding the form schema.
pub const ALL_DATA_FIELDS: &str = "FB_PUBLIC_LOAD_DATA_";

/// The decoded top-level schema array. Positionally indexed and undocumented.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFormDump(pub Value);

impl RawFormDump {
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Convert a form URL into its `formResponse` submission URL.
///
/// `/viewform` is replaced; any other URL gets `formResponse` appended.
pub fn response_url(url: &str) -> String {
    let mut url = url.replace("/viewform", "/formResponse");
    if !url.ends_with("/formResponse") {
        if !url.ends_with('/') {
            url.push('/');
        }
        url.push_str("formResponse");
    }
    url
}

/// Extract a `var NAME = [...];` array literal from an HTML page.
pub fn extract_script_variable(name: &str, html: &str) -> FormResult<Value> {
    let pattern = format!(r"(?s)var\s{}\s*=\s*(\[.*?\]);", regex::escape(name));
    let re = Regex::new(&pattern).expect("escaped name yields a valid regex");

    let value_str = re
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| FormError::Parse(format!("script variable {name} not found")))?;

    serde_json::from_str(value_str).map_err(|e| {
        tracing::warn!("failed to decode {name}: {e}");
        FormError::Parse(format!("invalid JSON in {name}: {e}"))
    })
}

/// Fetch a form page and extract its raw schema.
///
/// The page is requested at the `formResponse` address, which serves the
/// same markup as `viewform` for public forms.
pub async fn fetch_form_dump(client: &HttpClient, url: &str) -> FormResult<RawFormDump> {
    let url = response_url(url);
    tracing::info!("fetching form schema from {url}");

    let resp = client.get(&url, FETCH_TIMEOUT_MS).await?;
    if !resp.is_ok() {
        tracing::warn!("can't get form data, HTTP {}", resp.status);
        return Err(FormError::FetchStatus {
            url,
            status: resp.status,
        });
    }

    extract_script_variable(ALL_DATA_FIELDS, &resp.body).map(RawFormDump)
}
