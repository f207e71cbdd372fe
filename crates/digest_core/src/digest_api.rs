use crate::actions::count_actions;
use crate::classify::classify_outcomes;
use crate::config::Config;
use crate::error::AppError;
use crate::model::{ActionMetrics, OutcomeMetrics};
use crate::source::{RelevanceClient, SnapshotSource, TaskSource, TranscriptSource};
use crate::summary::{AgentSummary, DigestSummary, summarize};
use crate::window::filter_by_window_at;
use time::OffsetDateTime;
use tracing::info;

/// Everything one digest run produced.
#[derive(Debug, Clone)]
pub struct DigestRun {
    pub hours: u32,
    pub generated_at: OffsetDateTime,
    pub suburbs: OutcomeMetrics,
    pub outreach: OutcomeMetrics,
    pub emails: ActionMetrics,
    pub calls: ActionMetrics,
    pub summary: DigestSummary,
}

/// Runs the digest against the snapshot when one is configured, otherwise
/// against the live API.
pub fn run_digest(config: &Config, hours: u32) -> Result<DigestRun, AppError> {
    config.validate()?;
    let now = OffsetDateTime::now_utc();

    match config.snapshot_path.as_deref() {
        Some(path) => {
            let source = SnapshotSource::load(path)?;
            info!(path = %source.path().display(), "reading tasks from snapshot");
            run_digest_with_sources(config, &source, &source, hours, now)
        }
        None => {
            let client = RelevanceClient::from_config(config)?;
            run_digest_with_sources(config, &client, &client, hours, now)
        }
    }
}

pub fn run_digest_with_sources(
    config: &Config,
    tasks: &dyn TaskSource,
    transcripts: &dyn TranscriptSource,
    hours: u32,
    now: OffsetDateTime,
) -> Result<DigestRun, AppError> {
    let suburb_tasks = tasks.list_tasks(&config.suburb_agent_id, config.max_results)?;
    let outreach_tasks = tasks.list_tasks(&config.outreach_agent_id, config.max_results)?;
    info!(
        suburbs = suburb_tasks.len(),
        outreach = outreach_tasks.len(),
        "retrieved tasks"
    );

    let suburb_recent = filter_by_window_at(&suburb_tasks, hours, now);
    let outreach_recent = filter_by_window_at(&outreach_tasks, hours, now);
    info!(
        hours,
        suburbs = suburb_recent.len(),
        outreach = outreach_recent.len(),
        "filtered to window"
    );

    let suburbs = classify_outcomes(&suburb_recent);
    let outreach = classify_outcomes(&outreach_recent);
    let emails = count_actions(transcripts, &outreach_recent, &config.email_action_label);
    let calls = count_actions(transcripts, &outreach_recent, &config.call_action_label);

    let summary = summarize(
        AgentSummary::from_metrics(&config.suburb_agent_name, &suburbs),
        AgentSummary::from_metrics(&config.outreach_agent_name, &outreach),
        &emails,
        &calls,
    );

    Ok(DigestRun {
        hours,
        generated_at: now,
        suburbs,
        outreach,
        emails,
        calls,
        summary,
    })
}
