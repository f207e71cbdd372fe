#![cfg_attr(not(target_os = "macos"), allow(dead_code))]

/// Escapes text for use inside an AppleScript string literal.
pub(crate) fn quote(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Joins report lines with AppleScript `return`s.
fn body_expression(content: &str) -> String {
    let lines: Vec<String> = content.lines().map(quote).collect();
    if lines.is_empty() {
        return quote("");
    }
    lines.join(" & return & ")
}

/// Prepends `content` to the first note in `folder` whose name contains
/// `title`, creating the folder and the note when missing. The script
/// returns `appended` or `created`.
pub(crate) fn note_script(folder: &str, title: &str, content: &str) -> String {
    format!(
        r#"tell application "Notes"
    set folderName to {folder}
    try
        set targetFolder to folder folderName
    on error
        set targetFolder to make new folder with properties {{name:folderName}}
    end try
    set newContent to {body}
    set existingNote to missing value
    repeat with aNote in (every note in targetFolder)
        if name of aNote contains {title} then
            set existingNote to aNote
            exit repeat
        end if
    end repeat
    if existingNote is not missing value then
        set body of existingNote to newContent & return & return & (body of existingNote)
        return "appended"
    else
        make new note in targetFolder with properties {{body:newContent}}
        return "created"
    end if
end tell"#,
        folder = quote(folder),
        title = quote(title),
        body = body_expression(content),
    )
}

#[cfg(test)]
mod tests {
    use super::{note_script, quote};

    #[test]
    fn quote_escapes_backslashes_and_quotes() {
        assert_eq!(quote(r#"say "hi" \o/"#), r#""say \"hi\" \\o/""#);
    }

    #[test]
    fn script_joins_lines_with_returns() {
        let script = note_script("Building", "Daily Report", "line one\nline \"two\"");

        assert!(script.contains(r#"set folderName to "Building""#));
        assert!(script.contains(r#"contains "Daily Report""#));
        assert!(script.contains(r#"set newContent to "line one" & return & "line \"two\"""#));
        assert!(script.contains("{name:folderName}"));
    }

    #[test]
    fn empty_content_still_produces_a_literal() {
        let script = note_script("Building", "Daily Report", "");
        assert!(script.contains(r#"set newContent to """#));
    }
}
