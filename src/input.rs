//! Parsing numbers typed by users
//!
//! Inputs arrive in mixed locales: `5,5` is five and a half, `15,087,472,000`
//! is fifteen billion, `1,234.56` mixes both.

/// Parse a user-entered decimal. `None` when nothing numeric remains.
///
/// A single comma is a thousands separator when a period is also present, or
/// when exactly three digits follow it (and it is not the first character);
/// otherwise it is the decimal separator. Several commas are always
/// thousands separators. Any other character is dropped.
pub fn parse_decimal_input(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let comma_count = trimmed.matches(',').count();
    let has_period = trimmed.contains('.');

    let normalized = match comma_count {
        0 => trimmed.to_string(),
        1 => {
            let comma_index = trimmed.find(',').unwrap_or(0);
            let digits_after = trimmed[comma_index + 1..].chars().filter(|c| c.is_ascii_digit()).count();

            if has_period || (digits_after == 3 && comma_index > 0) {
                trimmed.replace(',', "")
            } else {
                trimmed.replacen(',', ".", 1)
            }
        }
        _ => trimmed.replace(',', ""),
    };

    let cleaned: String = normalized.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    parse_leading_float(&cleaned)
}

// Longest valid prefix, so "1.2.3" reads as 1.2
fn parse_leading_float(s: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_period = false;
    for (i, c) in s.char_indices() {
        if c == '.' {
            if seen_period {
                break;
            }
            seen_period = true;
        }
        end = i + c.len_utf8();
    }

    let prefix = &s[..end];
    if !prefix.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}
