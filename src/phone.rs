//! Phone number formatting and validation
//!
//! Display formatting groups up to ten digits as `(AAA) BBB-CCCC` while the
//! user types. The canonical form sent to the carrier is `+1` followed by
//! exactly ten digits.

use crate::error::DispatchError;

#[cfg(test)]
mod proptests;

pub const NATIONAL_DIGITS: usize = 10;

fn digits_of(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Re-group the digits of `raw` for display, dropping anything past ten.
pub fn format_for_display(raw: &str) -> String {
    let digits: Vec<char> = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(NATIONAL_DIGITS)
        .collect();

    let group = |range: std::ops::Range<usize>| -> String {
        digits
            .iter()
            .skip(range.start)
            .take(range.end - range.start)
            .collect()
    };

    match digits.len() {
        0 => String::new(),
        1..=3 => group(0..3),
        4..=6 => format!("({}) {}", group(0..3), group(3..6)),
        _ => format!("({}) {}-{}", group(0..3), group(3..6), group(6..10)),
    }
}

/// `+1` plus the digits of `raw`, when exactly ten digits are present.
pub fn to_canonical(raw: &str) -> Option<String> {
    let digits = digits_of(raw);
    (digits.len() == NATIONAL_DIGITS).then(|| format!("+1{digits}"))
}

pub fn is_sendable(raw: &str) -> bool {
    to_canonical(raw).is_some()
}

/// Normalize a destination for the carrier API.
///
/// Numbers already written with a leading `+` pass through untouched, so
/// international numbers typed in full are not rewritten.
pub fn normalize_recipient(raw: &str) -> Result<String, DispatchError> {
    let digits = digits_of(raw);

    if digits.len() == NATIONAL_DIGITS {
        return Ok(format!("+1{digits}"));
    }
    if digits.len() == NATIONAL_DIGITS + 1 && digits.starts_with('1') {
        return Ok(format!("+{digits}"));
    }
    if raw.starts_with('+') {
        return Ok(raw.to_string());
    }

    Err(DispatchError::invalid_phone(
        "Invalid phone number format. Please use (XXX) XXX-XXXX format.",
    ))
}
