//! Property-based tests for phone formatting
//!
//! - Display grouping follows the length bracket of the digit count
//! - Re-formatting a formatted value is a fixed point
//! - Canonical form exists iff exactly ten digits are present

use super::{format_for_display, is_sendable, normalize_recipient, to_canonical};
use proptest::prelude::*;

fn strip(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

proptest! {
    #[test]
    fn display_matches_length_bracket(digits in "[0-9]{0,10}") {
        let formatted = format_for_display(&digits);
        let n = digits.len();
        let d: Vec<char> = digits.chars().collect();
        let part = |a: usize, b: usize| d[a..b].iter().collect::<String>();

        let expected = match n {
            0 => String::new(),
            1..=3 => digits.clone(),
            4..=6 => format!("({}) {}", part(0, 3), part(3, n)),
            _ => format!("({}) {}-{}", part(0, 3), part(3, 6), part(6, n)),
        };
        prop_assert_eq!(formatted, expected);
    }

    #[test]
    fn display_is_idempotent(raw in "[0-9()+ .-]{0,20}") {
        let once = format_for_display(&raw);
        let twice = format_for_display(&strip(&once));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn display_keeps_at_most_ten_digits(raw in "[0-9]{0,20}") {
        let kept = strip(&format_for_display(&raw));
        prop_assert!(kept.len() <= 10);
        prop_assert!(raw.starts_with(&kept));
    }

    #[test]
    fn canonical_iff_ten_digits(raw in "[0-9() -]{0,16}") {
        let digits = strip(&raw);
        match to_canonical(&raw) {
            Some(canonical) => {
                prop_assert_eq!(digits.len(), 10);
                prop_assert_eq!(canonical, format!("+1{digits}"));
            }
            None => prop_assert_ne!(digits.len(), 10),
        }
        prop_assert_eq!(is_sendable(&raw), digits.len() == 10);
    }

    #[test]
    fn sendable_numbers_always_normalize(digits in "[0-9]{10}") {
        let formatted = format_for_display(&digits);
        prop_assert_eq!(normalize_recipient(&formatted).ok(), to_canonical(&formatted));
    }
}
