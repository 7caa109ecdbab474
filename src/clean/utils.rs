/// Trim whitespace and strip non-ASCII characters from a text cell.
/// Cells that end up empty are treated as missing.
pub fn clean_cell(raw: &str) -> Option<String> {
    let ascii: String = raw.chars().filter(char::is_ascii).collect();
    let cleaned = ascii.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Normalize a column name: trim, lowercase, spaces to underscores.
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}
