use crate::domain::outcome::ErrorKind;
use thiserror::Error;

/// Failures raised by a cluster collaborator.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("not connected to a cluster; set [cluster] in the config or OPENSHIFT_CLUSTER_URL")]
    NotConnected,

    #[error("missing argument '{argument}' for {operation}")]
    MissingArgument {
        operation: &'static str,
        argument: &'static str,
    },

    #[error("invalid {argument} '{value}' for {operation}: not a DNS-1123 name")]
    InvalidName {
        operation: &'static str,
        argument: &'static str,
        value: String,
    },

    #[error("cluster request failed: {source}")]
    Request {
        #[source]
        source: reqwest::Error,
    },

    #[error("cluster API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("cluster API returned an unexpected body: {reason}")]
    InvalidResponse { reason: String },
}

impl ClusterError {
    pub fn request(source: reqwest::Error) -> Self {
        Self::Request {
            source: source.without_url(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClusterError::InvalidName { .. } => ErrorKind::InvalidArguments,
            _ => ErrorKind::CollaboratorFailure,
        }
    }
}
