use digest_core::error::AppError;
use digest_core::notes::{NoteSink, NoteUpdate};
use std::io::Write;
use tracing::info;

pub fn publish_note(
    sink: &dyn NoteSink,
    note_title: &str,
    report: &str,
) -> Result<NoteUpdate, AppError> {
    let update = sink.publish(report)?;
    match update {
        NoteUpdate::Appended => info!(note = %note_title, "appended report to note"),
        NoteUpdate::Created => info!(note = %note_title, "created note"),
        NoteUpdate::Skipped => info!("note update skipped"),
    }
    Ok(update)
}

/// Prints the rendered report, then runs `publish`. The report stays on
/// `out` even when publishing fails; the failure goes to `err` and the
/// returned exit code is 1.
pub fn deliver<O, E, P>(rendered: &str, publish: P, out: &mut O, err: &mut E) -> i32
where
    O: Write,
    E: Write,
    P: FnOnce() -> Result<NoteUpdate, AppError>,
{
    if writeln!(out, "{rendered}").and_then(|_| out.flush()).is_err() {
        return 1;
    }

    match publish() {
        Ok(_) => 0,
        Err(failure) => {
            let _ = writeln!(err, "ERROR: note update failed: {}", failure);
            1
        }
    }
}
