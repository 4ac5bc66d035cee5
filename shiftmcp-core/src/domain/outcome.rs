//! The result envelope returned for every invocation.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Failure taxonomy surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    UnknownTool,
    InvalidArguments,
    UnknownProvider,
    ProviderAuthFailure,
    ProviderRateLimited,
    ProviderUnreachable,
    ProviderBadResponse,
    CollaboratorFailure,
    Timeout,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnknownTool => "UnknownTool",
            ErrorKind::InvalidArguments => "InvalidArguments",
            ErrorKind::UnknownProvider => "UnknownProvider",
            ErrorKind::ProviderAuthFailure => "ProviderAuthFailure",
            ErrorKind::ProviderRateLimited => "ProviderRateLimited",
            ErrorKind::ProviderUnreachable => "ProviderUnreachable",
            ErrorKind::ProviderBadResponse => "ProviderBadResponse",
            ErrorKind::CollaboratorFailure => "CollaboratorFailure",
            ErrorKind::Timeout => "Timeout",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl ToolFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Provider and model that served a completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderUse {
    pub provider: String,
    pub model: String,
}

/// Outcome of one invocation.
///
/// Success and failure are a single `Result`, so a successful outcome can
/// never carry an error descriptor and vice versa.
#[derive(Debug, Clone)]
pub struct InvocationOutcome {
    id: Uuid,
    tool: String,
    payload: Result<Value, ToolFailure>,
    elapsed: Duration,
    provider: Option<ProviderUse>,
    finished_at: DateTime<Utc>,
}

impl InvocationOutcome {
    pub fn success(tool: impl Into<String>, result: Value, elapsed: Duration) -> Self {
        Self::from_result(tool, Ok(result), elapsed)
    }

    pub fn failure(tool: impl Into<String>, failure: ToolFailure, elapsed: Duration) -> Self {
        Self::from_result(tool, Err(failure), elapsed)
    }

    pub fn from_result(
        tool: impl Into<String>,
        payload: Result<Value, ToolFailure>,
        elapsed: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tool: tool.into(),
            payload,
            elapsed,
            provider: None,
            finished_at: Utc::now(),
        }
    }

    pub fn with_provider(mut self, provider: Option<ProviderUse>) -> Self {
        self.provider = provider;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    pub fn is_success(&self) -> bool {
        self.payload.is_ok()
    }

    pub fn result(&self) -> Option<&Value> {
        self.payload.as_ref().ok()
    }

    pub fn error(&self) -> Option<&ToolFailure> {
        self.payload.as_ref().err()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error().map(|failure| failure.kind)
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Provider key used, for completion tools only.
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.provider.as_str())
    }

    pub fn model(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.model.as_str())
    }
}

impl Serialize for InvocationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a> {
            id: Uuid,
            tool: &'a str,
            success: bool,
            #[serde(skip_serializing_if = "Option::is_none")]
            result: Option<&'a Value>,
            #[serde(skip_serializing_if = "Option::is_none")]
            error: Option<&'a ToolFailure>,
            elapsed_ms: f64,
            #[serde(skip_serializing_if = "Option::is_none")]
            provider: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            model: Option<&'a str>,
            finished_at: DateTime<Utc>,
        }

        Wire {
            id: self.id,
            tool: &self.tool,
            success: self.is_success(),
            result: self.result(),
            error: self.error(),
            elapsed_ms: self.elapsed.as_secs_f64() * 1000.0,
            provider: self.provider(),
            model: self.model(),
            finished_at: self.finished_at,
        }
        .serialize(serializer)
    }
}
