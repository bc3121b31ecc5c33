//! Offline validation and one-shot execution of SPARQL files.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use serde::Serialize;

use crate::context::Context;
use crate::di::FromRef;
use crate::mcp::Response;
use crate::services::SparqlService;
use crate::sparql::{self, Verdict};

/// Source of a SPARQL query: a file, or stdin when omitted or `-`.
#[derive(Debug, Args)]
pub struct QueryInput {
    /// File containing the query
    pub file: Option<PathBuf>,
}

impl QueryInput {
    fn read(&self) -> Result<String> {
        match self.file.as_deref() {
            Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
                .wrap_err_with(|| format!("Failed to read {}", path.display())),
            _ => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .wrap_err("Failed to read query from stdin")?;
                Ok(text)
            }
        }
    }
}

/// Output of `validate`.
#[derive(Debug, Serialize)]
struct Report {
    #[serde(flatten)]
    verdict: Verdict,
    /// Lines the sanitizer removed.
    dropped: Vec<String>,
    /// Text that would be sent to the endpoint.
    prepared: String,
}

fn report(query: &str) -> Report {
    let sanitized = sparql::sanitize(query);
    Report {
        verdict: sparql::validate(query),
        prepared: sparql::inject_prefixes(&sanitized.text),
        dropped: sanitized.dropped,
    }
}

impl QueryInput {
    /// Validate and prepare a query without touching the network.
    pub fn run_validate(&self) -> Result<()> {
        let query = self.read()?;
        let report = report(&query);

        println!("{}", serde_json::to_string_pretty(&report)?);

        if report.verdict.valid {
            Ok(())
        } else {
            Err(eyre!("query failed validation"))
        }
    }

    /// Run a query through the same path as `execute_wikidata_sparql`.
    pub async fn run_query(&self) -> Result<()> {
        let query = self.read()?;

        let ctx = Context::load()?;
        let service = SparqlService::from_ref(&ctx);

        let rendered = Response(service.execute(&query).await).render();
        println!("{}", rendered.text);

        if rendered.is_error {
            Err(eyre!("query failed"))
        } else {
            Ok(())
        }
    }
}
