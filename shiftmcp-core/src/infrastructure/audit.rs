//! Append-only outcome log

use crate::domain::outcome::InvocationOutcome;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

/// Destination for finished invocation outcomes. Sinks are write-only.
#[async_trait]
pub trait OutcomeSink: Send + Sync {
    async fn record(&self, outcome: &InvocationOutcome) -> io::Result<()>;
}

/// Appends one JSON document per outcome to a file.
pub struct JsonLinesSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonLinesSink {
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl OutcomeSink for JsonLinesSink {
    async fn record(&self, outcome: &InvocationOutcome) -> io::Result<()> {
        let mut line = serde_json::to_vec(outcome)?;
        line.push(b'\n');

        // One write per line under the lock keeps concurrent records intact.
        let mut file = self.file.lock().await;
        file.write_all(&line).await?;
        file.flush().await
    }
}

/// Record an outcome, logging failures. The outcome itself is never affected.
pub(crate) async fn record_outcome(sink: &dyn OutcomeSink, outcome: &InvocationOutcome) {
    if let Err(err) = sink.record(outcome).await {
        warn!(
            tool = outcome.tool(),
            invocation = %outcome.id(),
            %err,
            "Failed to write outcome to audit log"
        );
    }
}
