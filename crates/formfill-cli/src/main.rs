// Copyright 2026 formfill contributors
// SPDX-License-Identifier: MIT

//! formfill — entry point.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use formfill_cli::commands::{self, generate::GenerateArgs};

#[derive(Parser)]
#[command(
    name = "formfill",
    about = "formfill — inspect, generate, and submit Google Form responses",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the request body of a form with empty values.
    Schema {
        /// Google Form URL.
        url: String,
        /// Output target: console, return, or a file path.
        #[arg(short, long, default_value = "console")]
        output: String,
        /// Only include required fields.
        #[arg(short, long)]
        required: bool,
        /// Don't include an explanatory comment for each field.
        #[arg(short = 'c', long)]
        no_comment: bool,
    },

    /// Submit the form once per answer set in a JSON file.
    Submit {
        /// Google Form URL.
        url: String,
        /// JSON file holding a list of `entry.<id> -> value` objects.
        json_file: PathBuf,
        /// Only include required fields.
        #[arg(short, long)]
        required: bool,
    },

    /// Generate answer sets with an LLM, then optionally submit them.
    Generate {
        /// Google Form URL.
        url: String,
        /// Number of responses to generate.
        #[arg(long, default_value = "40")]
        total: usize,
        /// Responses requested per LLM call.
        #[arg(long, default_value = "3")]
        batch_size: usize,
        /// Save generated answer sets to this JSON file.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Submit without asking for confirmation.
        #[arg(short, long)]
        yes: bool,
        /// API key. Also reads from OPENAI_API_KEY.
        #[arg(long)]
        api_key: Option<String>,
        /// Model name. Also reads from FORMFILL_LLM_MODEL.
        #[arg(long)]
        model: Option<String>,
        /// Base URL of an OpenAI-compatible API. Also reads from FORMFILL_LLM_BASE_URL.
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Schema {
            url,
            output,
            required,
            no_comment,
        } => commands::schema::run(&url, &output, required, !no_comment).await,

        Commands::Submit {
            url,
            json_file,
            required,
        } => commands::submit::run(&url, &json_file, required).await,

        Commands::Generate {
            url,
            total,
            batch_size,
            output,
            yes,
            api_key,
            model,
            base_url,
        } => {
            commands::generate::run(GenerateArgs {
                url,
                total,
                batch_size,
                output,
                yes,
                api_key,
                model,
                base_url,
            })
            .await
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "formfill", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = &result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    result
}
