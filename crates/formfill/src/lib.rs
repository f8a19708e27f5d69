// Copyright 2026 formfill contributors
// SPDX-License-Identifier: MIT

//! formfill — Google Form schema extraction, answer resolution, and submission.
//!
//! Pipeline: [`extractor`] pulls `FB_PUBLIC_LOAD_DATA_` out of the form page,
//! [`normalizer`] turns it into [`FieldDescriptor`]s, [`resolver`] reconciles
//! generated answers with each field's options, [`assembler`] builds the
//! payload and [`submitter`] posts it.

pub mod answers;
pub mod assembler;
pub mod extractor;
pub mod form;
pub mod generator;
pub mod http_client;
pub mod llm;
pub mod normalizer;
pub mod resolver;
pub mod submitter;
pub mod types;

pub use answers::{load_answer_sets, save_answer_sets, AnswerSet};
pub use assembler::{assemble, write_request_body, OutputTarget, SubmissionPayload};
pub use extractor::{extract_script_variable, fetch_form_dump, response_url, RawFormDump};
pub use form::{BatchReport, Form};
pub use generator::{RuleBasedGenerator, ScriptedGenerator};
pub use http_client::HttpClient;
pub use llm::{collect_answer_sets, CompletionClient, LlmConfig, OpenAiClient};
pub use normalizer::parse_form_entries;
pub use resolver::{normalize_text, resolve_field, resolve_fields, AnswerGenerator};
pub use submitter::submit;
pub use types::*;
