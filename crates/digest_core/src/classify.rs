use crate::model::{ConversationState, ErrorDetail, ErrorFlag, OutcomeMetrics, TaskRecord};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Errored(ErrorDetail),
    Successful,
    Unknown,
}

/// What happened to a single task during classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    NoConversation,
    Classified {
        state_label: String,
        state: ConversationState,
        verdict: Verdict,
    },
    Skipped {
        reason: String,
    },
}

pub fn classify_record(record: &TaskRecord) -> RecordOutcome {
    let Some(conversation) = record.conversation.as_ref() else {
        return RecordOutcome::NoConversation;
    };

    let state_label = match conversation.state_label() {
        Ok(label) => label,
        Err(reason) => return RecordOutcome::Skipped { reason },
    };
    let flag = match conversation.error_flag() {
        Ok(flag) => flag,
        Err(reason) => return RecordOutcome::Skipped { reason },
    };
    let state = ConversationState::from_label(&state_label);
    let label_errored = state_label.to_lowercase().contains("errored");

    if flag == ErrorFlag::NotErrored && label_errored {
        warn!(
            task_id = %record.id,
            state = %state_label,
            "has_errored is false but state reports an error; counting as errored"
        );
    }

    let verdict = if flag == ErrorFlag::Errored || label_errored {
        Verdict::Errored(ErrorDetail {
            task_id: record.id.clone(),
            title: record.conversation_title().to_string(),
            state: state_label.clone(),
            insert_date: record.insert_date.clone(),
        })
    } else if flag == ErrorFlag::NotErrored || state.is_healthy() {
        Verdict::Successful
    } else {
        Verdict::Unknown
    };

    RecordOutcome::Classified {
        state_label,
        state,
        verdict,
    }
}

/// Folds per-task classifications into one agent's outcome metrics.
pub fn classify_outcomes(records: &[TaskRecord]) -> OutcomeMetrics {
    let mut metrics = OutcomeMetrics {
        total_tasks: records.len(),
        ..OutcomeMetrics::default()
    };

    for record in records {
        match classify_record(record) {
            RecordOutcome::NoConversation => metrics.unknown_status_tasks += 1,
            RecordOutcome::Skipped { reason } => {
                warn!(task_id = %record.id, %reason, "could not classify task");
                metrics.unknown_status_tasks += 1;
            }
            RecordOutcome::Classified {
                state_label,
                state,
                verdict,
            } => {
                metrics.state_breakdown.record(state_label);
                match state {
                    ConversationState::Idle => metrics.idle_tasks += 1,
                    ConversationState::Running => metrics.running_tasks += 1,
                    ConversationState::Completed => metrics.completed_tasks += 1,
                    ConversationState::Errored | ConversationState::Other(_) => {}
                }
                match verdict {
                    Verdict::Errored(detail) => {
                        metrics.errored_tasks += 1;
                        metrics.error_details.push(detail);
                    }
                    Verdict::Successful => metrics.successful_tasks += 1,
                    Verdict::Unknown => metrics.unknown_status_tasks += 1,
                }
            }
        }
    }

    metrics
}
