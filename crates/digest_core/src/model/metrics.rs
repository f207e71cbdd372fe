use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub task_id: String,
    pub title: String,
    pub state: String,
    pub insert_date: Option<String>,
}

/// Outcome counts for one agent's tasks inside the window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeMetrics {
    pub total_tasks: usize,
    pub successful_tasks: usize,
    pub errored_tasks: usize,
    pub unknown_status_tasks: usize,
    pub idle_tasks: usize,
    pub running_tasks: usize,
    pub completed_tasks: usize,
    pub state_breakdown: StateCounts,
    pub error_details: Vec<ErrorDetail>,
}

impl OutcomeMetrics {
    pub fn success_rate(&self) -> f64 {
        percentage(self.successful_tasks, self.total_tasks)
    }

    pub fn error_rate(&self) -> f64 {
        percentage(self.errored_tasks, self.total_tasks)
    }

    /// Share of all tasks that ended in `state`.
    pub fn state_share(&self, state: &str) -> f64 {
        let count = self.state_breakdown.get(state).unwrap_or(0);
        percentage(count, self.total_tasks)
    }
}

/// State label histogram, kept in the order labels were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateCounts(Vec<(String, usize)>);

impl StateCounts {
    pub fn record(&mut self, label: String) {
        self.add(label, 1);
    }

    fn add(&mut self, label: String, count: usize) {
        match self.0.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, existing)) => *existing += count,
            None => self.0.push((label, count)),
        }
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.0
            .iter()
            .find(|(seen, _)| seen == label)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(label, count)| (label.as_str(), *count))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, usize)> for StateCounts {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        let mut counts = Self::default();
        for (label, count) in iter {
            counts.add(label, count);
        }
        counts
    }
}

impl Serialize for StateCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionDetail {
    pub task_id: String,
    pub conversation_title: String,
    pub action_count: usize,
    pub insert_date: String,
}

/// Occurrences of one labelled sub-action across a set of transcripts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionMetrics {
    pub total_conversations_checked: usize,
    pub conversations_with_target_action: usize,
    pub target_action_count: usize,
    pub target_title: String,
    pub conversation_details: Vec<ActionDetail>,
}

impl ActionMetrics {
    pub fn empty(target_title: &str) -> Self {
        Self {
            target_title: target_title.to_string(),
            ..Self::default()
        }
    }

    /// `None` when no conversation contained the action.
    pub fn average_per_conversation(&self) -> Option<f64> {
        if self.conversations_with_target_action == 0 {
            return None;
        }
        Some(self.target_action_count as f64 / self.conversations_with_target_action as f64)
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::{ActionMetrics, OutcomeMetrics, StateCounts};

    #[test]
    fn rates_are_zero_for_empty_metrics() {
        let metrics = OutcomeMetrics::default();
        assert_eq!(metrics.success_rate(), 0.0);
        assert_eq!(metrics.error_rate(), 0.0);
        assert_eq!(metrics.state_share("idle"), 0.0);
    }

    #[test]
    fn rates_use_total_as_denominator() {
        let metrics = OutcomeMetrics {
            total_tasks: 4,
            successful_tasks: 3,
            errored_tasks: 1,
            ..OutcomeMetrics::default()
        };
        assert_eq!(metrics.success_rate(), 75.0);
        assert_eq!(metrics.error_rate(), 25.0);
    }

    #[test]
    fn average_guards_zero_conversations() {
        let empty = ActionMetrics::empty("Send Outlook email");
        assert_eq!(empty.target_title, "Send Outlook email");
        assert_eq!(empty.average_per_conversation(), None);

        let metrics = ActionMetrics {
            conversations_with_target_action: 2,
            target_action_count: 5,
            ..ActionMetrics::empty("Send Outlook email")
        };
        assert_eq!(metrics.average_per_conversation(), Some(2.5));
    }

    #[test]
    fn state_counts_keep_first_seen_order() {
        let mut counts = StateCounts::default();
        for label in ["running", "idle", "running", "completed", "idle", "running"] {
            counts.record(label.to_string());
        }

        let seen: Vec<_> = counts.iter().collect();
        assert_eq!(seen, vec![("running", 3), ("idle", 2), ("completed", 1)]);
        assert_eq!(counts.get("idle"), Some(2));
        assert_eq!(counts.get("errored"), None);
        assert_eq!(serde_json::to_value(&counts).unwrap()["running"], 3);
    }
}
