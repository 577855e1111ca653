use std::path::Path;

/// Extract filename from a file path
///
/// Returns the filename component of a path, or "Unknown" if it can't be extracted.
pub fn extract_filename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Title bar text: file name, a bullet when modified, then the app name.
pub fn window_title(display_name: &str, modified: bool) -> String {
    let marker = if modified { " \u{2022}" } else { "" };
    format!("{}{} - TermPad", display_name, marker)
}

/// Find next occurrence of search string in text
///
/// Returns the byte position of the match, or None if not found.
/// Searches from start_pos onwards.
pub fn find_in_text(text: &str, search: &str, start_pos: usize, case_sensitive: bool) -> Option<usize> {
    if search.is_empty() || start_pos >= text.len() || !text.is_char_boundary(start_pos) {
        return None;
    }

    if case_sensitive {
        return text[start_pos..].find(search).map(|pos| start_pos + pos);
    }

    // Lowercasing can change byte lengths, so only trust it for ASCII
    let haystack = text[start_pos..].to_ascii_lowercase();
    let needle = search.to_ascii_lowercase();
    haystack.find(&needle).map(|pos| start_pos + pos)
}

/// Like [`find_in_text`], but wraps around to the start of the text.
pub fn find_wrapping(text: &str, search: &str, start_pos: usize, case_sensitive: bool) -> Option<usize> {
    find_in_text(text, search, start_pos, case_sensitive)
        .or_else(|| find_in_text(text, search, 0, case_sensitive))
}

/// 1-based line and column of a byte offset. Columns count characters.
pub fn cursor_line_col(text: &str, byte_pos: usize) -> (usize, usize) {
    let mut pos = byte_pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    let before = &text[..pos];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let col = before[line_start..].chars().count() + 1;
    (line, col)
}

pub fn line_count(text: &str) -> usize {
    text.matches('\n').count() + 1
}

/// Status bar text, e.g. "Line 3/10, Column 5 • 120 characters".
pub fn status_line(text: &str, cursor_byte: usize) -> String {
    let (line, col) = cursor_line_col(text, cursor_byte);
    format!(
        "Line {}/{}, Column {} \u{2022} {} characters",
        line,
        line_count(text),
        col,
        text.chars().count()
    )
}

/// Gutter width in pixels wide enough for the largest line number.
pub fn line_number_width(line_count: usize) -> i32 {
    let digits = (line_count + 1).to_string().len() as i32;
    (digits * 8 + 16).max(40)
}
