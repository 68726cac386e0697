use crate::errors::AppError;

/// Splits pasted text into trimmed identifier lines, normalizes t.me URLs
/// and `@` handles to bare usernames, and enforces the per-batch cap.
pub fn parse_id_list(input: &str, max: usize) -> Result<Vec<String>, AppError> {
    let ids: Vec<String> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(normalize_identifier)
        .collect();

    if ids.len() > max {
        return Err(AppError::bad_request(format!(
            "exceeds maximum limit of {max} identifiers"
        )));
    }
    Ok(ids)
}

fn normalize_identifier(raw: &str) -> String {
    let stripped = raw
        .strip_prefix("https://t.me/")
        .or_else(|| raw.strip_prefix("http://t.me/"))
        .or_else(|| raw.strip_prefix("t.me/"))
        .unwrap_or(raw);
    stripped
        .strip_prefix('@')
        .unwrap_or(stripped)
        .trim_end_matches('/')
        .to_string()
}
