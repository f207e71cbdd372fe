use crate::model::{ActionDetail, ActionMetrics, TaskRecord, TranscriptEntry};
use crate::source::TranscriptSource;
use tracing::{error, warn};

const UNKNOWN_DATE: &str = "Unknown";

/// Result of scanning one task's transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Scanned { matches: usize },
    Skipped { reason: String },
}

/// Counts transcript entries whose action title equals `target` exactly.
pub fn scan_record(
    source: &dyn TranscriptSource,
    record: &TaskRecord,
    target: &str,
) -> ScanOutcome {
    if record.id.trim().is_empty() {
        return ScanOutcome::Skipped {
            reason: "task has no transcript id".to_string(),
        };
    }

    let transcript = fetch_transcript_or_empty(source, &record.id);
    let matches = transcript.iter().filter(|entry| entry.matches(target)).count();
    ScanOutcome::Scanned { matches }
}

/// A failed fetch reads as an empty transcript; it is never retried.
fn fetch_transcript_or_empty(
    source: &dyn TranscriptSource,
    transcript_id: &str,
) -> Vec<TranscriptEntry> {
    match source.fetch_transcript(transcript_id) {
        Ok(entries) => entries,
        Err(err) => {
            error!(task_id = %transcript_id, error = %err, "failed to read transcript");
            Vec::new()
        }
    }
}

pub fn count_actions(
    source: &dyn TranscriptSource,
    records: &[TaskRecord],
    target: &str,
) -> ActionMetrics {
    let mut metrics = ActionMetrics::empty(target);
    if records.is_empty() {
        return metrics;
    }

    for record in records {
        let matches = match scan_record(source, record, target) {
            ScanOutcome::Scanned { matches } => matches,
            ScanOutcome::Skipped { reason } => {
                warn!(task_id = %record.id, %reason, "skipping transcript scan");
                continue;
            }
        };

        metrics.total_conversations_checked += 1;
        if matches == 0 {
            continue;
        }

        metrics.target_action_count += matches;
        metrics.conversations_with_target_action += 1;
        metrics.conversation_details.push(ActionDetail {
            task_id: record.id.clone(),
            conversation_title: record.conversation_title().to_string(),
            action_count: matches,
            insert_date: record
                .insert_date
                .clone()
                .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
        });
    }

    metrics
}
