//! `formfill submit <url> <json_file>` — submit one response per answer set.

use anyhow::{bail, Context, Result};
use formfill::{load_answer_sets, BatchReport, Form, HttpClient};
use std::path::Path;

/// Run the submit command.
pub async fn run(url: &str, json_file: &Path, only_required: bool) -> Result<()> {
    let sets = load_answer_sets(json_file)
        .with_context(|| format!("can't load answer sets from {}", json_file.display()))?;
    if sets.is_empty() {
        bail!("{} contains no answer sets", json_file.display());
    }

    let client = HttpClient::new();
    let form = Form::fetch(&client, url, only_required)
        .await
        .context("can't read form schema")?;

    let report = form.submit_answer_sets(&client, &sets).await;
    print_report(&report);
    Ok(())
}

pub(crate) fn print_report(report: &BatchReport) {
    println!(
        "Submitted {} response(s), {} failed.",
        report.submitted, report.failed
    );
}
