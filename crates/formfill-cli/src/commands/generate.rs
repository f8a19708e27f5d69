//! `formfill generate <url>` — generate answer sets with an LLM and
//! optionally submit them.

use anyhow::{bail, Context, Result};
use formfill::llm::{build_prompt, collect_answer_sets, OpenAiClient};
use formfill::{save_answer_sets, Form, HttpClient};
use std::path::PathBuf;

use crate::commands::submit::print_report;
use crate::config::resolve_llm_config;

/// Consecutive empty LLM batches tolerated before giving up.
const MAX_EMPTY_BATCHES: usize = 3;

pub struct GenerateArgs {
    pub url: String,
    pub total: usize,
    pub batch_size: usize,
    pub output: Option<PathBuf>,
    pub yes: bool,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// Run the generate command.
pub async fn run(args: GenerateArgs) -> Result<()> {
    if args.total == 0 || args.batch_size == 0 {
        bail!("--total and --batch-size must be greater than zero");
    }

    let config = resolve_llm_config(
        args.api_key.as_deref(),
        args.model.as_deref(),
        args.base_url.as_deref(),
    )?;

    let client = HttpClient::new();
    let form = Form::fetch(&client, &args.url, false)
        .await
        .context("can't read form schema")?;

    let prompt = build_prompt(&form.request_body(None, true), args.batch_size);
    tracing::debug!("generated prompt:\n{prompt}");

    let llm = OpenAiClient::new(config);
    let sets = collect_answer_sets(&llm, &prompt, args.total, MAX_EMPTY_BATCHES).await;
    if sets.is_empty() {
        bail!("the model produced no usable answer sets");
    }

    println!("Generated responses:\n{}", serde_json::to_string_pretty(&sets)?);

    if let Some(path) = &args.output {
        save_answer_sets(path, &sets)?;
        println!("Saved to {}", path.display());
    }

    if !args.yes && !confirm("Do you want to submit these responses? (yes/no): ")? {
        println!("Submission aborted by the user.");
        return Ok(());
    }

    let report = form.submit_answer_sets(&client, &sets).await;
    print_report(&report);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    let mut editor = rustyline::DefaultEditor::new()?;
    match editor.readline(prompt) {
        Ok(line) => Ok(line.trim().eq_ignore_ascii_case("yes")),
        Err(rustyline::error::ReadlineError::Interrupted | rustyline::error::ReadlineError::Eof) => {
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
