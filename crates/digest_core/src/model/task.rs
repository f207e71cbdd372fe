use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Title used wherever a conversation has no usable title.
pub const NO_TITLE: &str = "No title";
/// State label recorded when a conversation carries no state at all.
pub const MISSING_STATE: &str = "None";

/// One task run by an agent, as retrieved from the orchestration service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    #[serde(default)]
    pub insert_date: Option<String>,
    #[serde(default)]
    pub conversation: Option<Conversation>,
}

impl TaskRecord {
    pub fn conversation_title(&self) -> &str {
        self.conversation
            .as_ref()
            .and_then(Conversation::title)
            .unwrap_or(NO_TITLE)
    }
}

/// Execution state attached to a task.
///
/// Fields are kept as raw JSON because upstream data is best-effort; the
/// typed accessors report a mismatch instead of failing the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default)]
    pub state: Option<Value>,
    #[serde(default)]
    pub has_errored: Option<Value>,
    #[serde(default)]
    pub title: Option<Value>,
}

impl Conversation {
    pub fn new(state: Option<&str>, has_errored: ErrorFlag, title: Option<&str>) -> Self {
        Self {
            state: state.map(|value| Value::String(value.to_string())),
            has_errored: match has_errored {
                ErrorFlag::Errored => Some(Value::Bool(true)),
                ErrorFlag::NotErrored => Some(Value::Bool(false)),
                ErrorFlag::Unset => None,
            },
            title: title.map(|value| Value::String(value.to_string())),
        }
    }

    /// The state label, or [`MISSING_STATE`] when absent or empty.
    pub fn state_label(&self) -> Result<String, String> {
        match &self.state {
            None | Some(Value::Null) => Ok(MISSING_STATE.to_string()),
            Some(Value::String(label)) if label.is_empty() => Ok(MISSING_STATE.to_string()),
            Some(Value::String(label)) => Ok(label.clone()),
            Some(Value::Number(number)) => Ok(number.to_string()),
            Some(Value::Bool(flag)) => Ok(flag.to_string()),
            Some(other) => Err(format!("state is not a label: {other}")),
        }
    }

    pub fn error_flag(&self) -> Result<ErrorFlag, String> {
        match &self.has_errored {
            None | Some(Value::Null) => Ok(ErrorFlag::Unset),
            Some(Value::Bool(true)) => Ok(ErrorFlag::Errored),
            Some(Value::Bool(false)) => Ok(ErrorFlag::NotErrored),
            Some(other) => Err(format!("has_errored is not a boolean: {other}")),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match &self.title {
            Some(Value::String(title)) if !title.is_empty() => Some(title.as_str()),
            _ => None,
        }
    }
}

/// The upstream "has errored" flag; unset is distinct from false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorFlag {
    Errored,
    NotErrored,
    Unset,
}

/// Known conversation states. The upstream vocabulary is open, so
/// anything unrecognised is carried verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    Running,
    Completed,
    Errored,
    Other(String),
}

impl ConversationState {
    /// Accepts both the bare label (`idle`) and the enum-qualified form
    /// (`State.idle`) seen in some upstream payloads.
    pub fn from_label(label: &str) -> Self {
        let bare = label.strip_prefix("State.").unwrap_or(label);
        match bare {
            "idle" => Self::Idle,
            "running" => Self::Running,
            "completed" => Self::Completed,
            "errored_pending_approval" | "errored-pending-approval" => Self::Errored,
            _ => Self::Other(label.to_string()),
        }
    }

    /// States that count as a healthy run when the error flag is unset.
    pub fn is_healthy(&self) -> bool {
        match self {
            Self::Idle | Self::Running | Self::Completed => true,
            Self::Errored => false,
            Self::Other(label) => {
                let bare = label.strip_prefix("State.").unwrap_or(label);
                bare == "starting_up"
            }
        }
    }
}

/// One message from a task transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    #[serde(default)]
    pub action_title: Option<String>,
}

impl TranscriptEntry {
    pub fn with_action(title: &str) -> Self {
        Self {
            action_title: Some(title.to_string()),
        }
    }

    /// Reads `message.chain_config.title` out of a raw transcript row.
    pub fn from_message_data(data: &Value) -> Self {
        let action_title = data
            .get("message")
            .and_then(|message| message.get("chain_config"))
            .and_then(|chain| chain.get("title"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Self { action_title }
    }

    pub fn matches(&self, target: &str) -> bool {
        self.action_title.as_deref() == Some(target)
    }
}
