//! Canonical form of filename stems used for comparison.

/// Normalize a filename stem for comparison.
///
/// Lowercases and trims, turns runs of underscores/whitespace into a single
/// hyphen, drops anything outside `[a-z0-9-]`, then collapses repeated hyphens.
pub fn normalize_stem(stem: &str) -> String {
    let lowered = stem.to_lowercase();
    let trimmed = lowered.trim_matches(is_space);

    // underscores and whitespace -> hyphen
    let mut unified = String::with_capacity(trimmed.len());
    let mut in_separator_run = false;
    for c in trimmed.chars() {
        if c == '_' || is_space(c) {
            if !in_separator_run {
                unified.push('-');
                in_separator_run = true;
            }
        } else {
            unified.push(c);
            in_separator_run = false;
        }
    }

    // strip and collapse in one pass; stripping happens first so hyphens
    // brought together by removed characters still collapse
    let mut normalized = String::with_capacity(unified.len());
    for c in unified
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
    {
        if c == '-' && normalized.ends_with('-') {
            continue;
        }
        normalized.push(c);
    }

    normalized
}

/// Unicode whitespace plus the ASCII information separators U+001C..=U+001F,
/// which `char::is_whitespace` leaves out
fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Filename without its final extension.
///
/// A name whose only dot is the leading one (`.hidden`) is all stem.
pub fn file_stem_of(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if file_name[..idx].trim_start_matches('.').is_empty() => file_name,
        Some(idx) => &file_name[..idx],
        None => file_name,
    }
}
