mod metrics;
mod task;

pub use metrics::{ActionDetail, ActionMetrics, ErrorDetail, OutcomeMetrics, StateCounts};
pub use task::{
    Conversation, ConversationState, ErrorFlag, MISSING_STATE, NO_TITLE, TaskRecord,
    TranscriptEntry,
};
