use crate::model::{ActionMetrics, OutcomeMetrics};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSummary {
    pub name: String,
    pub total_tasks: usize,
    pub successful_tasks: usize,
    pub errored_tasks: usize,
    pub success_rate: f64,
    pub error_rate: f64,
    pub idle_tasks: usize,
    pub running_tasks: usize,
}

impl AgentSummary {
    pub fn from_metrics(name: &str, metrics: &OutcomeMetrics) -> Self {
        Self {
            name: name.to_string(),
            total_tasks: metrics.total_tasks,
            successful_tasks: metrics.successful_tasks,
            errored_tasks: metrics.errored_tasks,
            success_rate: metrics.success_rate(),
            error_rate: metrics.error_rate(),
            idle_tasks: metrics.idle_tasks,
            running_tasks: metrics.running_tasks,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ActionAverage {
    PerConversation(f64),
    NoActionsFound,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionSummary {
    pub label: String,
    pub total_actions: usize,
    pub conversations_checked: usize,
    pub conversations_with_action: usize,
    pub average: ActionAverage,
}

impl ActionSummary {
    pub fn from_metrics(metrics: &ActionMetrics) -> Self {
        let average = match metrics.average_per_conversation() {
            Some(value) => ActionAverage::PerConversation(value),
            None => ActionAverage::NoActionsFound,
        };
        Self {
            label: metrics.target_title.clone(),
            total_actions: metrics.target_action_count,
            conversations_checked: metrics.total_conversations_checked,
            conversations_with_action: metrics.conversations_with_target_action,
            average,
        }
    }
}

/// Both agents and both action counts, combined for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigestSummary {
    pub suburbs: AgentSummary,
    pub outreach: AgentSummary,
    pub total_errors: usize,
    pub idle_total: usize,
    pub running_total: usize,
    pub emails: ActionSummary,
    pub calls: ActionSummary,
}

pub fn summarize(
    suburbs: AgentSummary,
    outreach: AgentSummary,
    emails: &ActionMetrics,
    calls: &ActionMetrics,
) -> DigestSummary {
    DigestSummary {
        total_errors: suburbs.errored_tasks + outreach.errored_tasks,
        idle_total: suburbs.idle_tasks + outreach.idle_tasks,
        running_total: suburbs.running_tasks + outreach.running_tasks,
        suburbs,
        outreach,
        emails: ActionSummary::from_metrics(emails),
        calls: ActionSummary::from_metrics(calls),
    }
}
