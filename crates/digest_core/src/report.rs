//! Plain-text renderings of a digest run, sized for a notes document.

use crate::digest_api::DigestRun;
use crate::model::ErrorDetail;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

const MAX_NOTE_ERRORS: usize = 2;
const MAX_TITLE_CHARS: usize = 50;

pub fn report_header(at: OffsetDateTime) -> String {
    let format = format_description!("[month]/[day]/[year] [hour]:[minute] UTC");
    let stamp = at
        .format(&format)
        .unwrap_or_else(|_| at.unix_timestamp().to_string());
    format!("📊 Daily Report - {stamp}")
}

pub fn summary_lines(run: &DigestRun) -> Vec<String> {
    let summary = &run.summary;
    let mut lines = vec![
        format!(
            "🏢 {}: {} processed ({:.0}% success)",
            summary.suburbs.name, summary.suburbs.successful_tasks, summary.suburbs.success_rate
        ),
        format!(
            "🏪 {}: {} processed ({:.0}% success)",
            summary.outreach.name, summary.outreach.successful_tasks, summary.outreach.success_rate
        ),
        format!(
            "📧 Communications: {} emails, {} calls",
            summary.emails.total_actions, summary.calls.total_actions
        ),
    ];

    if summary.total_errors > 0 {
        lines.push(format!(
            "⚠️ Errors: {} total ({} {}, {} {})",
            summary.total_errors,
            summary.suburbs.errored_tasks,
            summary.suburbs.name,
            summary.outreach.errored_tasks,
            summary.outreach.name
        ));
    }

    if summary.running_total > 0 {
        lines.push(format!(
            "🏃 Currently running: {} tasks",
            summary.running_total
        ));
    }

    lines
}

fn recent_error_lines(details: &[ErrorDetail]) -> Vec<String> {
    if details.is_empty() {
        return Vec::new();
    }

    let mut lines = vec!["⚠️ Recent Errors:".to_string()];
    for (index, detail) in details.iter().take(MAX_NOTE_ERRORS).enumerate() {
        lines.push(format!("   {}. {}", index + 1, truncate_title(&detail.title)));
    }
    if details.len() > MAX_NOTE_ERRORS {
        lines.push(format!("   ... and {} more", details.len() - MAX_NOTE_ERRORS));
    }
    lines
}

pub fn truncate_title(title: &str) -> String {
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title.to_string();
    }
    let kept: String = title.chars().take(MAX_TITLE_CHARS - 3).collect();
    format!("{kept}...")
}

/// The compact report appended to the notes document.
pub fn render_notes_report(run: &DigestRun) -> String {
    let mut lines = vec![report_header(run.generated_at), String::new()];
    lines.extend(summary_lines(run));

    let errors = recent_error_lines(&run.outreach.error_details);
    if !errors.is_empty() {
        lines.push(String::new());
        lines.extend(errors);
    }

    lines.push(String::new());
    lines.push("─".repeat(30));
    lines.push(String::new());
    lines.push(String::new());
    lines.join("\n")
}

/// Stands in for the report when the run could not complete.
pub fn render_error_report(message: &str, at: OffsetDateTime) -> String {
    let stamp = at
        .format(&Rfc3339)
        .unwrap_or_else(|_| at.unix_timestamp().to_string());
    format!(
        "ANALYTICS ERROR\nTimestamp: {stamp}\nError: {message}\n{}\n",
        "=".repeat(40)
    )
}
