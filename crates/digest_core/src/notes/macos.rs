use crate::error::AppError;
use crate::notes::applescript::note_script;
use crate::notes::{NoteSink, NoteUpdate};
use std::process::Command;

/// Keeps reports in a note in the macOS Notes app, newest first.
pub struct AppleNotesSink {
    folder: String,
    title: String,
}

impl AppleNotesSink {
    pub fn new(folder: &str, title: &str) -> Self {
        Self {
            folder: folder.to_string(),
            title: title.to_string(),
        }
    }
}

impl NoteSink for AppleNotesSink {
    fn publish(&self, content: &str) -> Result<NoteUpdate, AppError> {
        let script = note_script(&self.folder, &self.title, content);
        let output = Command::new("osascript")
            .arg("-e")
            .arg(&script)
            .output()
            .map_err(|err| AppError::io(format!("failed to run osascript: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::sink(format!("AppleScript failed: {}", stderr.trim())));
        }

        match String::from_utf8_lossy(&output.stdout).trim() {
            "appended" => Ok(NoteUpdate::Appended),
            "created" => Ok(NoteUpdate::Created),
            other => Err(AppError::sink(format!("unexpected AppleScript result: {other}"))),
        }
    }
}
