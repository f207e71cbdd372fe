//! Where task records and transcripts come from: the live orchestration
//! API or a JSON snapshot of it.

use crate::error::AppError;
use crate::model::{Conversation, TaskRecord, TranscriptEntry};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

mod relevance;
mod snapshot;

pub use relevance::RelevanceClient;
pub use snapshot::{SCHEMA_VERSION, SnapshotSource};

pub trait TaskSource {
    /// Up to `max_results` tasks for the agent, newest first. A failure
    /// here aborts the run.
    fn list_tasks(&self, agent_id: &str, max_results: usize) -> Result<Vec<TaskRecord>, AppError>;
}

pub trait TranscriptSource {
    fn fetch_transcript(&self, transcript_id: &str) -> Result<Vec<TranscriptEntry>, AppError>;
}

#[derive(Debug, Deserialize)]
struct WireTask {
    knowledge_set: String,
    #[serde(default)]
    metadata: Option<WireMetadata>,
}

#[derive(Debug, Deserialize)]
struct WireMetadata {
    #[serde(default)]
    insert_date: Option<Value>,
    #[serde(default)]
    conversation: Option<Conversation>,
}

/// Decodes raw task rows, dropping (and logging) rows that lack an id or
/// have the wrong shape.
pub(crate) fn decode_tasks(rows: &[Value]) -> Vec<TaskRecord> {
    let mut tasks = Vec::with_capacity(rows.len());
    for row in rows {
        match WireTask::deserialize(row) {
            Ok(wire) if !wire.knowledge_set.trim().is_empty() => {
                let metadata = wire.metadata;
                let insert_date = metadata
                    .as_ref()
                    .and_then(|meta| meta.insert_date.as_ref())
                    .and_then(Value::as_str)
                    .map(str::to_string);
                tasks.push(TaskRecord {
                    id: wire.knowledge_set,
                    insert_date,
                    conversation: metadata.and_then(|meta| meta.conversation),
                });
            }
            Ok(_) => warn!("dropping task row with empty knowledge_set"),
            Err(err) => warn!(error = %err, "dropping undecodable task row"),
        }
    }
    tasks
}

pub(crate) fn decode_transcript(rows: &[Value]) -> Vec<TranscriptEntry> {
    rows.iter().map(TranscriptEntry::from_message_data).collect()
}
