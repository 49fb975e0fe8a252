//! Response documents for the triage boundary.
//!
//! Every request ends in exactly one [`TriageResponse`]: the result document,
//! or `{ "error": { "code": "...", "status": 400, "message": "..." } }`.
//! Failures of any cause, including request bodies that are not JSON at all,
//! are reported here with their message text instead of escaping as faults.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::model::ModelHandle;
use crate::triage::{TriageEngine, TriageError};
use crate::types::TriageResult;

/// Failure category with its HTTP-equivalent status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    ServiceUnavailable,
    InternalError,
}

impl ErrorCode {
    pub const fn status(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::ServiceUnavailable => 503,
            Self::InternalError => 500,
        }
    }
}

/// Error detail inside [`ErrorResponse`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub status: u16,
    pub message: String,
}

impl ErrorReport {
    fn build(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            status: code.status(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::build(ErrorCode::BadRequest, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::build(ErrorCode::ServiceUnavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::build(ErrorCode::InternalError, message)
    }
}

impl From<&TriageError> for ErrorReport {
    fn from(err: &TriageError) -> Self {
        match err {
            TriageError::InvalidInput { .. } => Self::bad_request(err.to_string()),
            TriageError::ModelUnavailable => Self::service_unavailable(err.to_string()),
            TriageError::Inference(_) | TriageError::UnexpectedClass(_) => {
                Self::internal(err.to_string())
            }
        }
    }
}

/// Error document: `{ "error": { ... } }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorReport,
}

/// Outcome of one request, serialized without a wrapper tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TriageResponse {
    Success(TriageResult),
    Failure(ErrorResponse),
}

impl TriageResponse {
    pub fn failure(error: ErrorReport) -> Self {
        Self::Failure(ErrorResponse { error })
    }

    pub fn from_result(result: Result<TriageResult, TriageError>) -> Self {
        match result {
            Ok(r) => Self::Success(r),
            Err(e) => {
                debug!(error = %e, "Triage request rejected");
                Self::failure(ErrorReport::from(&e))
            }
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// HTTP-equivalent status: 200 on success.
    pub const fn status(&self) -> u16 {
        match self {
            Self::Success(_) => 200,
            Self::Failure(f) => f.error.status,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to serialize triage response");
            format!(
                r#"{{"error":{{"code":"INTERNAL_ERROR","status":500,"message":{}}}}}"#,
                Value::String(e.to_string())
            )
        })
    }
}

/// Handle one parsed request document.
pub fn handle_request(engine: &TriageEngine, request: &Value) -> TriageResponse {
    TriageResponse::from_result(engine.triage(request))
}

fn unavailable() -> TriageResponse {
    TriageResponse::from_result(Err(TriageError::ModelUnavailable))
}

/// Decode one request body. Bodies that are not UTF-8 or not JSON become
/// a bad-request report.
fn parse_body(body: &[u8]) -> Result<Value, ErrorReport> {
    let text = std::str::from_utf8(body)
        .map_err(|e| ErrorReport::bad_request(format!("Request is not valid UTF-8: {e}")))?;
    serde_json::from_str(text).map_err(|e| ErrorReport::bad_request(format!("Malformed JSON: {e}")))
}

/// Handle one raw request body.
///
/// The model check comes first, matching [`TriageEngine::triage`]: with no
/// model every request is reported unavailable, parseable or not.
pub fn handle_raw(engine: &TriageEngine, body: &str) -> TriageResponse {
    handle_bytes(engine, body.as_bytes())
}

/// Handle one request body read as raw bytes.
pub fn handle_bytes(engine: &TriageEngine, body: &[u8]) -> TriageResponse {
    if !engine.model().is_loaded() {
        return unavailable();
    }
    match parse_body(body) {
        Ok(request) => handle_request(engine, &request),
        Err(report) => TriageResponse::failure(report),
    }
}

/// Handle many raw bodies, preserving order.
///
/// Bodies are decoded up front; the ones that parse are triaged in
/// parallel by [`TriageEngine::triage_batch`]. A body that fails to decode
/// only fails its own slot.
pub fn handle_batch<B: AsRef<[u8]>>(engine: &TriageEngine, bodies: &[B]) -> Vec<TriageResponse> {
    if !engine.model().is_loaded() {
        return bodies.iter().map(|_| unavailable()).collect();
    }

    let mut requests = Vec::with_capacity(bodies.len());
    let slots: Vec<Option<ErrorReport>> = bodies
        .iter()
        .map(|b| match parse_body(b.as_ref()) {
            Ok(request) => {
                requests.push(request);
                None
            }
            Err(report) => Some(report),
        })
        .collect();

    let mut results = engine.triage_batch(&requests).into_iter();
    slots
        .into_iter()
        .map(|slot| match slot {
            Some(report) => TriageResponse::failure(report),
            None => results.next().map_or_else(
                || TriageResponse::failure(ErrorReport::internal("Batch result missing")),
                TriageResponse::from_result,
            ),
        })
        .collect()
}

/// Handle a JSON Lines document: one request per `\n`-separated line.
///
/// Lines are decoded individually, so one bad line yields one error
/// document and the rest are still served. Blank lines are skipped.
pub fn handle_jsonl(engine: &TriageEngine, raw: &[u8]) -> Vec<TriageResponse> {
    let lines: Vec<&[u8]> = raw
        .split(|b| *b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
        .collect();
    handle_batch(engine, &lines)
}

/// Service status document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    pub model_loaded: bool,
    pub model: Option<String>,
}

impl ServiceStatus {
    pub fn of(model: &ModelHandle) -> Self {
        Self {
            status: "online",
            model_loaded: model.is_loaded(),
            model: model.name().map(str::to_string),
        }
    }
}
