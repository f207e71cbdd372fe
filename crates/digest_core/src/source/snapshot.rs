use crate::error::AppError;
use crate::model::{TaskRecord, TranscriptEntry};
use crate::source::{TaskSource, TranscriptSource, decode_tasks, decode_transcript};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
struct StoredSnapshot {
    schema_version: u32,
    #[serde(default)]
    agents: HashMap<String, Vec<Value>>,
    #[serde(default)]
    transcripts: HashMap<String, Vec<Value>>,
}

/// Tasks and transcripts captured to a JSON file in the API's wire shape.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    path: PathBuf,
    agents: HashMap<String, Vec<Value>>,
    transcripts: HashMap<String, Vec<Value>>,
}

impl SnapshotSource {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
        let stored: StoredSnapshot = serde_json::from_str(&content).map_err(|err| {
            AppError::invalid_data(format!("invalid snapshot {}: {}", path.display(), err))
        })?;

        if stored.schema_version != SCHEMA_VERSION {
            return Err(AppError::invalid_data("snapshot schema_version mismatch"));
        }

        Ok(Self {
            path: path.to_path_buf(),
            agents: stored.agents,
            transcripts: stored.transcripts,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskSource for SnapshotSource {
    fn list_tasks(&self, agent_id: &str, max_results: usize) -> Result<Vec<TaskRecord>, AppError> {
        let rows = self.agents.get(agent_id).ok_or_else(|| {
            AppError::invalid_data(format!(
                "agent {agent_id} not found in snapshot {}",
                self.path.display()
            ))
        })?;
        let mut tasks = decode_tasks(rows);
        tasks.truncate(max_results);
        Ok(tasks)
    }
}

impl TranscriptSource for SnapshotSource {
    fn fetch_transcript(&self, transcript_id: &str) -> Result<Vec<TranscriptEntry>, AppError> {
        Ok(self
            .transcripts
            .get(transcript_id)
            .map(|rows| decode_transcript(rows))
            .unwrap_or_default())
    }
}
