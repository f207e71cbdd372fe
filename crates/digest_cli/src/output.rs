use digest_core::digest_api::DigestRun;
use digest_core::model::{ActionMetrics, OutcomeMetrics};
use digest_core::summary::ActionAverage;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use time::format_description::well_known::Rfc3339;

const MAX_DETAILED_ERRORS: usize = 5;

#[derive(Tabled)]
struct StateRow {
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Tasks")]
    count: usize,
    #[tabled(rename = "Share")]
    share: String,
}

fn rule() -> String {
    "=".repeat(60)
}

fn agent_section(name: &str, metrics: &OutcomeMetrics, hours: u32) -> Vec<String> {
    let mut lines = vec![
        rule(),
        format!(
            "{} TASK SUCCESS AND ERROR ANALYSIS - LAST {hours} HOURS",
            name.to_uppercase()
        ),
        rule(),
        format!("Total tasks in last {hours} hours: {}", metrics.total_tasks),
        format!("Successful tasks: {}", metrics.successful_tasks),
        format!("Errored tasks: {}", metrics.errored_tasks),
        format!("Unknown status tasks: {}", metrics.unknown_status_tasks),
    ];

    if metrics.total_tasks > 0 {
        lines.push(String::new());
        lines.push(format!("Success rate: {:.1}%", metrics.success_rate()));
        lines.push(format!("Error rate: {:.1}%", metrics.error_rate()));
    }

    if !metrics.state_breakdown.is_empty() {
        let rows: Vec<StateRow> = metrics
            .state_breakdown
            .iter()
            .map(|(state, count)| StateRow {
                state: state.to_string(),
                count,
                share: format!("{:.1}%", metrics.state_share(state)),
            })
            .collect();
        lines.push(String::new());
        lines.push("Task states breakdown:".to_string());
        lines.push(Table::new(rows).with(Style::sharp()).to_string());
    }

    if metrics.errored_tasks > 0 {
        lines.push(String::new());
        lines.push("Error details:".to_string());
        for (index, detail) in metrics
            .error_details
            .iter()
            .take(MAX_DETAILED_ERRORS)
            .enumerate()
        {
            lines.push(format!("  {}. {}", index + 1, detail.title));
            lines.push(format!("     State: {}", detail.state));
            lines.push(format!(
                "     Date: {}",
                detail.insert_date.as_deref().unwrap_or("Unknown")
            ));
        }
        if metrics.error_details.len() > MAX_DETAILED_ERRORS {
            lines.push(format!(
                "  ... and {} more errors",
                metrics.error_details.len() - MAX_DETAILED_ERRORS
            ));
        }
    }

    lines
}

fn efficiency_lines(
    noun: &str,
    metrics: &ActionMetrics,
    average: ActionAverage,
    hours: u32,
) -> Vec<String> {
    let mut lines = vec![format!("📈 {} EFFICIENCY:", noun.to_uppercase())];
    match average {
        ActionAverage::PerConversation(value) => {
            lines.push(format!(
                "   Conversations with {noun}s: {}",
                metrics.conversations_with_target_action
            ));
            lines.push(format!("   Average {noun}s per conversation: {value:.1}"));
        }
        ActionAverage::NoActionsFound => {
            lines.push(format!("   No {noun} actions found in the last {hours} hours"));
        }
    }
    lines
}

/// Long-form console report with one section per agent and a summary.
pub fn render_detailed_report(run: &DigestRun) -> String {
    let summary = &run.summary;
    let hours = run.hours;
    let mut lines = agent_section(&summary.suburbs.name, &run.suburbs, hours);
    lines.push(String::new());
    lines.extend(agent_section(&summary.outreach.name, &run.outreach, hours));

    let suburbs = summary.suburbs.name.to_uppercase();
    let outreach = summary.outreach.name.to_uppercase();
    lines.push(String::new());
    lines.push(rule());
    lines.push(format!("{hours}-HOUR SUMMARY METRICS"));
    lines.push(rule());
    lines.push(format!("📊 {suburbs} PROCESSED: {}", summary.suburbs.successful_tasks));
    lines.push(format!("❌ {suburbs} WITH ERRORS: {}", summary.suburbs.errored_tasks));
    lines.push(format!(
        "✅ {outreach} SUCCESSFULLY PROCESSED: {}",
        summary.outreach.successful_tasks
    ));
    lines.push(format!("❌ {outreach} WITH ERRORS: {}", summary.outreach.errored_tasks));
    lines.push(format!(
        "📧 EMAILS SENT ({}): {}",
        summary.emails.label, summary.emails.total_actions
    ));
    lines.push(format!(
        "📞 CALLS MADE ({}): {}",
        summary.calls.label, summary.calls.total_actions
    ));
    if summary.suburbs.total_tasks > 0 {
        lines.push(format!(
            "📈 {suburbs} SUCCESS RATE: {:.1}%",
            summary.suburbs.success_rate
        ));
    }
    if summary.outreach.total_tasks > 0 {
        lines.push(format!(
            "📈 {outreach} SUCCESS RATE: {:.1}%",
            summary.outreach.success_rate
        ));
    }

    lines.push(String::new());
    lines.push(format!("⏳ {suburbs} TASKS CURRENTLY IDLE: {}", summary.suburbs.idle_tasks));
    lines.push(format!(
        "🏃 {suburbs} TASKS CURRENTLY RUNNING: {}",
        summary.suburbs.running_tasks
    ));
    lines.push(format!("⏳ {outreach} TASKS CURRENTLY IDLE: {}", summary.outreach.idle_tasks));
    lines.push(format!(
        "🏃 {outreach} TASKS CURRENTLY RUNNING: {}",
        summary.outreach.running_tasks
    ));

    lines.push(String::new());
    lines.extend(efficiency_lines("email", &run.emails, summary.emails.average, hours));
    lines.extend(efficiency_lines("call", &run.calls, summary.calls.average, hours));

    lines.join("\n")
}

pub fn render_json(run: &DigestRun) -> serde_json::Value {
    let generated_at = run.generated_at.format(&Rfc3339).ok();
    json!({
        "hours": run.hours,
        "generated_at": generated_at,
        "summary": &run.summary,
        "suburbs": &run.suburbs,
        "outreach": &run.outreach,
        "emails": &run.emails,
        "calls": &run.calls,
    })
}
