//! Utility functions for the Lazy CSS generator

/// Characters that cannot appear bare in a class selector.
const SELECTOR_ESCAPES: &[char] = &[
    '/', '\\', '^', '$', '*', '+', '?', '.', '(', ')', '|', '[', ']', '{', '}', ',',
    '%', '#', ':', '!', '@', '&', '\'', '"', '=', '<', '>', '~', ';', '`',
];

/// Backslash-escape a raw class token so it can be used as a selector.
pub fn escape_class_name(class: &str) -> String {
    let mut escaped = String::with_capacity(class.len() + 8);
    for ch in class.chars() {
        if SELECTOR_ESCAPES.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Build a class selector (`.name`) from a raw token.
pub fn class_selector(class: &str) -> String {
    format!(".{}", escape_class_name(class))
}

/// Split on commas that are not nested inside `[]`, `{}` or `()`.
/// Each part is trimmed.
pub fn split_top_level(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;

    for (idx, ch) in input.char_indices() {
        match ch {
            '[' | '{' | '(' => depth += 1,
            ']' | '}' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(input[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(input[start..].trim());
    parts
}

/// Split a bracketed value list on every comma, trimming each part.
pub fn split_values(input: &str) -> Vec<&str> {
    input.split(',').map(str::trim).collect()
}

pub fn is_all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
