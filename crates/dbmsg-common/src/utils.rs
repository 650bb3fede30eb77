//! Shared string helpers.

/// Splits a comma-delimited list, trimming whitespace and dropping empty items.
pub fn comma_delimited_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Counts how many times `ch` appears in `input`.
pub fn count_matches(input: &str, ch: char) -> usize {
    input.chars().filter(|c| *c == ch).count()
}

/// Renders one locale part of a composed bundle name.
///
/// Blank parts are not treated as empty: a part is either empty or a real
/// value, and anything else must stay visible as a data problem.
pub fn name_part(part: &str) -> String {
    if part.is_empty() {
        String::new()
    } else {
        format!("_{part}")
    }
}
