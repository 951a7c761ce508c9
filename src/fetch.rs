// The fetch-and-save loop: one GET per endpoint, classified and written to
// the snapshot folder.

use crate::api::{ApiClient, RequestOutcome};
use crate::endpoints::{error_filename, is_plain, normalize_endpoint, success_filename};
use crate::error::{FetchError, Result};
use indicatif::ProgressBar;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;

/// One failed endpoint: the error log filename and a status description
/// such as `Status code: 404`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub file: String,
    pub status: String,
}

impl ErrorEntry {
    pub fn new(file: impl Into<String>, status: impl Into<String>) -> Self {
        ErrorEntry {
            file: file.into(),
            status: status.into(),
        }
    }
}

/// Saved filenames and error entries of one run, in endpoint order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub saved: Vec<String>,
    pub errors: Vec<ErrorEntry>,
}

impl FetchReport {
    pub fn is_empty(&self) -> bool {
        self.saved.is_empty() && self.errors.is_empty()
    }

    fn record(&mut self, outcome: EndpointOutcome) {
        match outcome {
            EndpointOutcome::Saved(file) => self.saved.push(file),
            EndpointOutcome::Failed { file, status } => {
                self.errors.push(ErrorEntry::new(file, status))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointOutcome {
    Saved(String),
    Failed { file: String, status: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Status(u16),
    Transport(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Status(code) => write!(f, "Status code: {}", code),
            FailureReason::Transport(cause) => write!(f, "Transport error: {}", cause),
        }
    }
}

/// How a request outcome is handled under the current response policy.
#[derive(Debug, PartialEq, Eq)]
enum Classified<'a> {
    Success { body: &'a str },
    Failure { reason: FailureReason, details: &'a str },
}

/// Strict mode needs exactly 200; all-responses mode keeps any status.
/// Transport errors always fail.
fn classify(outcome: &RequestOutcome, accept_all: bool) -> Classified<'_> {
    match outcome {
        RequestOutcome::Response { status, body } if accept_all || *status == 200 => {
            Classified::Success { body }
        }
        RequestOutcome::Response { status, body } => Classified::Failure {
            reason: FailureReason::Status(*status),
            details: body,
        },
        RequestOutcome::Transport { cause } => Classified::Failure {
            reason: FailureReason::Transport(cause.clone()),
            details: cause,
        },
    }
}

/// Fetch every endpoint in order and persist each response under
/// `output_dir`. Endpoint failures are recorded and the loop continues;
/// only filesystem errors abort.
pub fn fetch_and_save(
    client: &ApiClient,
    endpoints: &[String],
    output_dir: &Path,
    accept_all: bool,
    progress: &ProgressBar,
) -> Result<FetchReport> {
    let mut report = FetchReport::default();
    tracing::info!(
        count = endpoints.len(),
        accept_all,
        "fetching into {}",
        output_dir.display()
    );
    for endpoint in endpoints {
        let endpoint = normalize_endpoint(endpoint);
        progress.set_message(endpoint.to_string());
        let outcome = client.get(endpoint);
        let result = save_outcome(endpoint, &outcome, output_dir, accept_all)?;
        match &result {
            EndpointOutcome::Saved(file) => {
                tracing::info!(endpoint, file = file.as_str(), "saved");
                progress.println(format!("Saved {}", file));
            }
            EndpointOutcome::Failed { status, .. } => {
                tracing::warn!(endpoint, status = status.as_str(), "fetch failed");
                progress.println(format!("Error fetching {}: {}", endpoint, status));
            }
        }
        report.record(result);
        progress.inc(1);
    }
    Ok(report)
}

fn save_outcome(
    endpoint: &str,
    outcome: &RequestOutcome,
    output_dir: &Path,
    accept_all: bool,
) -> Result<EndpointOutcome> {
    match classify(outcome, accept_all) {
        Classified::Success { body } => {
            let file = success_filename(endpoint);
            let path = output_dir.join(&file);
            let contents = if is_plain(endpoint) {
                body.to_string()
            } else {
                json_document(body)?
            };
            fs::write(&path, contents).map_err(FetchError::io(&path))?;
            Ok(EndpointOutcome::Saved(file))
        }
        Classified::Failure { reason, details } => {
            let file = error_filename(endpoint);
            let path = output_dir.join(&file);
            let details = match serde_json::from_str::<Value>(details) {
                // Transport causes are plain text; only response bodies can be JSON.
                Ok(v) if matches!(reason, FailureReason::Status(_)) => to_pretty(&v)?,
                _ => details.to_string(),
            };
            let log = format!(
                "Error fetching {}: {}\nError details: {}\n",
                endpoint, reason, details
            );
            fs::write(&path, log).map_err(FetchError::io(&path))?;
            Ok(EndpointOutcome::Failed {
                file,
                status: reason.to_string(),
            })
        }
    }
}

/// Pretty-printed body, or the wrapped error document when it is not JSON.
pub fn json_document(body: &str) -> Result<String> {
    match serde_json::from_str::<Value>(body) {
        Ok(v) => to_pretty(&v),
        Err(e) => {
            tracing::debug!("response is not JSON: {}", e);
            to_pretty(&serde_json::json!({
                "error": "Invalid JSON format",
                "response_text": body,
            }))
        }
    }
}

/// JSON with four-space indentation.
pub fn to_pretty<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, fmt);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
