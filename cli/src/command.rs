use application::{DocumentService, SearchRequest};
use domain::Document;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One request line read from stdin.
#[derive(Deserialize, Debug)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Save {
        document: Document,
    },
    FindById {
        id: String,
    },
    Search {
        #[serde(default)]
        request: SearchRequest,
    },
    Count,
}

/// Result payload of a successful command.
#[derive(Serialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum Outcome {
    Document(Document),
    Found(Option<Document>),
    Documents(Vec<Document>),
    Count(usize),
}

/// One response line written to stdout.
#[derive(Serialize, Debug, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ok { result: Outcome },
    Error { message: String },
}

pub fn execute(service: &DocumentService, command: Command) -> Outcome {
    match command {
        Command::Save { document } => Outcome::Document(service.save(document)),
        Command::FindById { id } => Outcome::Found(service.find_by_id(&id)),
        Command::Search { request } => Outcome::Documents(service.search(&request)),
        Command::Count => Outcome::Count(service.count()),
    }
}

/// Parses and runs a single input line. Blank lines produce no response.
pub fn handle_line(service: &DocumentService, line: &str) -> Option<Response> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let response = match serde_json::from_str::<Command>(line) {
        Ok(command) => {
            debug!(?command, "Executing command");
            Response::Ok {
                result: execute(service, command),
            }
        }
        Err(e) => {
            warn!("Rejected malformed command: {}", e);
            Response::Error {
                message: format!("Invalid command: {}", e),
            }
        }
    };
    Some(response)
}
