use crate::error::AppError;

mod applescript;

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "macos")]
pub use macos::AppleNotesSink;

const DISABLE_ENV_VAR: &str = "AGENT_DIGEST_DISABLE_NOTES";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteUpdate {
    Appended,
    Created,
    Skipped,
}

/// Somewhere a rendered report can be kept.
pub trait NoteSink {
    fn publish(&self, content: &str) -> Result<NoteUpdate, AppError>;
}

pub struct NoopSink;

impl NoteSink for NoopSink {
    fn publish(&self, _content: &str) -> Result<NoteUpdate, AppError> {
        Ok(NoteUpdate::Skipped)
    }
}

pub fn sink_from_env(folder: &str, title: &str) -> Result<Box<dyn NoteSink>, AppError> {
    if std::env::var(DISABLE_ENV_VAR).is_ok() {
        return Ok(Box::new(NoopSink));
    }

    match platform_sink(folder, title) {
        Ok(sink) => Ok(sink),
        Err(err) => match err {
            AppError::InvalidData(_) => Ok(Box::new(NoopSink)),
            other => Err(other),
        },
    }
}

#[cfg(target_os = "macos")]
pub fn platform_sink(folder: &str, title: &str) -> Result<Box<dyn NoteSink>, AppError> {
    Ok(Box::new(AppleNotesSink::new(folder, title)))
}

#[cfg(not(target_os = "macos"))]
pub fn platform_sink(_folder: &str, _title: &str) -> Result<Box<dyn NoteSink>, AppError> {
    Err(AppError::invalid_data(
        "notes are not supported on this platform",
    ))
}
