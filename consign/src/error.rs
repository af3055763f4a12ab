use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsignError {
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unrecognized response shape: {0}")]
    Mapping(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("config error: {0}")]
    Config(String),
}

/// Coarse failure classes surfaced to the table as an error reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport-level failure (connect, timeout, body read).
    NetworkFailure,
    /// Non-2xx response carrying a message payload.
    ServerRejection,
    /// Response body matched none of the known page shapes.
    MappingFailure,
    /// Rejected locally before anything was sent.
    Invalid,
}

impl ConsignError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ConsignError::Http { .. } => FailureKind::ServerRejection,
            ConsignError::Request(e) if e.is_decode() => FailureKind::MappingFailure,
            ConsignError::Request(_) => FailureKind::NetworkFailure,
            ConsignError::Json(_) | ConsignError::Mapping(_) => FailureKind::MappingFailure,
            ConsignError::Validation(_) | ConsignError::Config(_) => FailureKind::Invalid,
        }
    }

    /// Human-readable reason for an errored table.
    ///
    /// Server rejections prefer the `message` field of a JSON error body.
    pub fn reason(&self) -> String {
        match self {
            ConsignError::Http { status, message } => {
                let extracted = serde_json::from_str::<serde_json::Value>(message)
                    .ok()
                    .and_then(|v| {
                        v.get("message")
                            .and_then(|m| m.as_str())
                            .map(str::to_string)
                    });
                match extracted {
                    Some(msg) => format!("server rejected request ({status}): {msg}"),
                    None if message.is_empty() => format!("server rejected request ({status})"),
                    None => format!("server rejected request ({status}): {message}"),
                }
            }
            ConsignError::Request(e) => format!("network failure: {e}"),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsignError>;
