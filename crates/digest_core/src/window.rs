use crate::model::TaskRecord;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{Duration, OffsetDateTime, PrimitiveDateTime};
use tracing::debug;

/// Tasks inserted within the trailing `hours`, measured from now (UTC).
pub fn filter_by_window(records: &[TaskRecord], hours: u32) -> Vec<TaskRecord> {
    filter_by_window_at(records, hours, OffsetDateTime::now_utc())
}

/// Keeps records whose insert date lies in `[now - hours, now]`, in input
/// order. Records without a parseable insert date or without a
/// conversation are dropped.
pub fn filter_by_window_at(
    records: &[TaskRecord],
    hours: u32,
    now: OffsetDateTime,
) -> Vec<TaskRecord> {
    let cutoff = window_start(now, hours);
    let mut recent = Vec::new();

    for record in records {
        if record.conversation.is_none() {
            debug!(task_id = %record.id, "dropping task without conversation");
            continue;
        }

        let Some(inserted) = record.insert_date.as_deref().and_then(parse_insert_date) else {
            debug!(task_id = %record.id, "dropping task without usable insert date");
            continue;
        };

        if inserted >= cutoff && inserted <= now {
            recent.push(record.clone());
        }
    }

    recent
}

/// `now - hours`, clamped to the earliest representable instant so very
/// wide windows keep everything instead of overflowing.
fn window_start(now: OffsetDateTime, hours: u32) -> OffsetDateTime {
    now.checked_sub(Duration::hours(i64::from(hours)))
        .unwrap_or_else(|| {
            debug!(hours, "window reaches past the earliest date; keeping all records");
            PrimitiveDateTime::MIN.assume_utc()
        })
}

/// Parses an ISO-8601 timestamp carrying an offset. A trailing `Z` reads as
/// UTC; timestamps without an offset are rejected.
pub fn parse_insert_date(raw: &str) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = match trimmed.strip_suffix('Z').or_else(|| trimmed.strip_suffix('z')) {
        Some(stem) => format!("{stem}+00:00"),
        None => trimmed.to_string(),
    };
    let normalized = if normalized.as_bytes().get(10) == Some(&b' ') {
        format!("{}T{}", &normalized[..10], &normalized[11..])
    } else {
        normalized
    };

    OffsetDateTime::parse(&normalized, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(&normalized, &Iso8601::DEFAULT))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::{filter_by_window_at, parse_insert_date, window_start};
    use crate::model::{Conversation, ErrorFlag, TaskRecord};
    use time::format_description::well_known::Rfc3339;
    use time::macros::datetime;
    use time::{Duration, OffsetDateTime, PrimitiveDateTime};

    fn record(id: &str, insert_date: Option<String>) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            insert_date,
            conversation: Some(Conversation::new(Some("idle"), ErrorFlag::Unset, None)),
        }
    }

    fn stamp(at: OffsetDateTime) -> Option<String> {
        Some(at.format(&Rfc3339).unwrap())
    }

    #[test]
    fn boundary_is_inclusive() {
        let now = datetime!(2025-06-02 12:00:00 UTC);
        let records = vec![
            record("edge", stamp(now - Duration::hours(24))),
            record("too-old", stamp(now - Duration::hours(24) - Duration::seconds(1))),
        ];

        let recent = filter_by_window_at(&records, 24, now);

        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, "edge");
    }

    #[test]
    fn oversized_window_keeps_everything() {
        let now = datetime!(2026-10-19 12:00:00 UTC);
        let records = vec![
            record("old", Some("1970-01-01T00:00:00Z".into())),
            record("recent", stamp(now - Duration::hours(1))),
        ];

        let recent = filter_by_window_at(&records, u32::MAX, now);

        assert_eq!(recent.len(), 2);
        assert_eq!(filter_by_window_at(&records, 200_000_000, now).len(), 2);
        assert!(window_start(now, u32::MAX) < datetime!(0001-01-01 00:00:00 UTC));
    }

    #[test]
    fn future_timestamps_are_outside_the_window() {
        let now = datetime!(2025-06-02 12:00:00 UTC);
        let records = vec![record("future", stamp(now + Duration::minutes(5)))];

        assert!(filter_by_window_at(&records, 24, now).is_empty());
    }

    #[test]
    fn preserves_input_order() {
        let now = datetime!(2025-06-02 12:00:00 UTC);
        let records = vec![
            record("b", stamp(now - Duration::hours(2))),
            record("a", stamp(now - Duration::hours(1))),
            record("c", stamp(now - Duration::hours(3))),
        ];

        let ids: Vec<_> = filter_by_window_at(&records, 24, now)
            .into_iter()
            .map(|task| task.id)
            .collect();

        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn drops_malformed_and_incomplete_records() {
        let now = datetime!(2025-06-02 12:00:00 UTC);
        let mut no_conversation = record("no-conv", stamp(now - Duration::hours(1)));
        no_conversation.conversation = None;
        let records = vec![
            record("missing", None),
            record("garbage", Some("yesterday-ish".into())),
            record("naive", Some("2025-06-02T11:00:00".into())),
            no_conversation,
            record("ok", Some("2025-06-02T11:00:00Z".into())),
        ];

        let recent = filter_by_window_at(&records, 24, now);

        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, "ok");
    }

    #[test]
    fn parses_common_iso_variants() {
        let expected = datetime!(2025-06-02 11:00:00 UTC);
        assert_eq!(parse_insert_date("2025-06-02T11:00:00Z"), Some(expected));
        assert_eq!(parse_insert_date("2025-06-02T11:00:00+00:00"), Some(expected));
        assert_eq!(parse_insert_date("2025-06-02 11:00:00+00:00"), Some(expected));
        assert_eq!(
            parse_insert_date("2025-06-02T13:00:00.250+02:00"),
            Some(expected + Duration::milliseconds(250))
        );
        assert_eq!(parse_insert_date(""), None);
    }
}
