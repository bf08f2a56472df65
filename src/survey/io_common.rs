use std::path::Path;

use survey_crunch::Cell;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Empty cells are unanswered questions.
pub fn to_cell(s: &str) -> Cell {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
