//! `formfill schema <url>` — print the request body skeleton of a form.

use anyhow::{Context, Result};
use formfill::{write_request_body, Form, HttpClient, OutputTarget};

/// Run the schema command.
pub async fn run(url: &str, output: &str, only_required: bool, with_comment: bool) -> Result<()> {
    let client = HttpClient::new();
    let form = Form::fetch(&client, url, only_required)
        .await
        .context("can't read form schema")?;

    if form.fields.is_empty() {
        eprintln!("Form has no fillable fields.");
        return Ok(());
    }

    let body = form.request_body(None, with_comment);
    let target: OutputTarget = output.parse()?;
    if let OutputTarget::File(path) = &target {
        write_request_body(body, &target)?;
        println!("Saved to {}", path.display());
    } else if let Some(body) = write_request_body(body, &target)? {
        // `return` only makes sense to library callers; print it bare.
        println!("{body}");
    }

    Ok(())
}
