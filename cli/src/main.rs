// ./cli/src/main.rs
mod command;
mod config;
mod error;

use application::DocumentService;
use domain::Document;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use command::{Response, handle_line};
use config::Config;
use error::CliError;
use infrastructure::InMemoryDocumentRepository;

fn main() -> ExitCode {
    // --- Logger Initialization ---
    // Logs go to stderr; stdout carries responses only.
    let filter: EnvFilter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let config = Config::from_env();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("docstore stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), CliError> {
    let repository = Arc::new(InMemoryDocumentRepository::new());
    let service = DocumentService::with_system_clock(repository);
    info!("In-memory document store initialized.");

    if let Some(path) = &config.seed_path {
        let seeded = seed(&service, path)?;
        info!(count = seeded, "Seed documents saved");
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if let Some(response) = handle_line(&service, &line) {
            write_response(&mut stdout, &response)?;
        }
    }

    info!(documents = service.count(), "Input closed; shutting down.");
    Ok(())
}

/// Saves every document from a JSON array file through the normal save path.
fn seed(service: &DocumentService, path: &Path) -> Result<usize, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::SeedRead {
        path: path.to_path_buf(),
        source,
    })?;
    let documents: Vec<Document> =
        serde_json::from_str(&raw).map_err(|source| CliError::SeedParse {
            path: path.to_path_buf(),
            source,
        })?;

    let count = documents.len();
    for document in documents {
        service.save(document);
    }
    Ok(count)
}

/// Writes one response as a single compact JSON line.
fn write_response(out: &mut impl Write, response: &Response) -> Result<(), CliError> {
    serde_json::to_writer(&mut *out, response)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
