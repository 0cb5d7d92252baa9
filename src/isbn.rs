//! ISBN validation, normalization and formatting
//!
//! Books are keyed by their canonical ISBN-13 digit string. Input may be
//! ISBN-10 or ISBN-13, with or without separators; everything is normalized
//! to ISBN-13 at the validation boundary.

use crate::error::{AppError, AppResult};

/// Strip separators and an optional "ISBN" prefix from raw input
fn clean(raw: &str) -> String {
    raw.trim()
        .trim_start_matches("ISBN")
        .chars()
        .filter(|c| *c != '-' && *c != ' ')
        .collect()
}

/// Check digit validation for a 10-character ISBN (last char may be 'X')
fn is_valid_isbn10(s: &str) -> bool {
    if s.len() != 10 {
        return false;
    }
    let mut sum: u32 = 0;
    for (i, c) in s.chars().enumerate() {
        let value = match c {
            '0'..='9' => c as u32 - '0' as u32,
            'X' | 'x' if i == 9 => 10,
            _ => return false,
        };
        sum += (10 - i as u32) * value;
    }
    sum % 11 == 0
}

/// Check digit validation for a 13-digit ISBN
fn is_valid_isbn13(s: &str) -> bool {
    if s.len() != 13 || !s.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let sum: u32 = s
        .chars()
        .enumerate()
        .map(|(i, c)| (c as u32 - '0' as u32) * if i % 2 == 0 { 1 } else { 3 })
        .sum();
    sum % 10 == 0
}

/// Compute the ISBN-13 check digit for the first 12 digits
fn isbn13_check_digit(first12: &str) -> char {
    let sum: u32 = first12
        .chars()
        .enumerate()
        .map(|(i, c)| (c as u32 - '0' as u32) * if i % 2 == 0 { 1 } else { 3 })
        .sum();
    let check = (10 - sum % 10) % 10;
    char::from_digit(check, 10).unwrap_or('0')
}

/// Normalize a raw ISBN-10 or ISBN-13 string to the canonical ISBN-13 digit
/// string. Idempotent on valid input.
pub fn to_isbn13(raw: &str) -> AppResult<String> {
    let cleaned = clean(raw);

    if is_valid_isbn13(&cleaned) {
        return Ok(cleaned);
    }

    if is_valid_isbn10(&cleaned) {
        let mut first12 = String::with_capacity(12);
        first12.push_str("978");
        first12.push_str(&cleaned[..9]);
        let check = isbn13_check_digit(&first12);
        first12.push(check);
        return Ok(first12);
    }

    Err(AppError::Validation(format!("Invalid ISBN: {}", raw)))
}

/// Publisher prefix length within registration group 0 (English),
/// per the standard range table.
fn group0_publisher_len(rest: &str) -> Option<usize> {
    let head: u32 = rest.get(..7)?.parse().ok()?;
    match head {
        0..=1999999 => Some(2),
        2000000..=6999999 => Some(3),
        7000000..=8499999 => Some(4),
        8500000..=8999999 => Some(5),
        9000000..=9499999 => Some(6),
        _ => Some(7),
    }
}

/// Hyphenate a canonical ISBN-13 for display, e.g. "9780000000002" ->
/// "978-0-00-000000-2". Falls back to the plain digit string when the
/// registration group is not covered by the built-in range table.
pub fn hyphenate(isbn13: &str) -> String {
    if isbn13.len() != 13 {
        return isbn13.to_string();
    }
    let (prefix, rest) = isbn13.split_at(3);
    // Single-digit registration groups only; longer groups fall through.
    let group = &rest[..1];
    let body = &rest[1..9];
    let check = &rest[9..];

    let publisher_len = match group {
        "0" => group0_publisher_len(body),
        _ => None,
    };

    match publisher_len {
        Some(len) => format!(
            "{}-{}-{}-{}-{}",
            prefix,
            group,
            &body[..len],
            &body[len..],
            check
        ),
        None => isbn13.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isbn10_normalizes_to_isbn13() {
        assert_eq!(to_isbn13("0000000000").unwrap(), "9780000000002");
    }

    #[test]
    fn isbn10_with_x_check_digit() {
        // 0-19-852663-6 is valid; 097522980X exercises the X digit
        assert_eq!(to_isbn13("097522980X").unwrap(), "9780975229804");
    }

    #[test]
    fn isbn13_passes_through() {
        assert_eq!(to_isbn13("9780000000002").unwrap(), "9780000000002");
    }

    #[test]
    fn separators_are_stripped() {
        assert_eq!(to_isbn13("978-0-00-000000-2").unwrap(), "9780000000002");
        assert_eq!(to_isbn13("0-00-000000-0").unwrap(), "9780000000002");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = to_isbn13("0000000000").unwrap();
        let twice = to_isbn13(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn bad_check_digit_is_rejected() {
        assert!(to_isbn13("9780000000001").is_err());
        assert!(to_isbn13("0000000001").is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(to_isbn13("").is_err());
        assert!(to_isbn13("not-an-isbn").is_err());
        assert!(to_isbn13("12345").is_err());
    }

    #[test]
    fn hyphenation_matches_group0_ranges() {
        assert_eq!(hyphenate("9780000000002"), "978-0-00-000000-2");
        assert_eq!(hyphenate("9780000000026"), "978-0-00-000002-6");
    }

    #[test]
    fn hyphenation_keeps_check_digit_as_last_component() {
        let formatted = hyphenate("9780000000002");
        let parts: Vec<&str> = formatted.split('-').collect();
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0], "978");
        assert_eq!(parts[4], "2");
        let digits: String = formatted.chars().filter(|c| c.is_ascii_digit()).collect();
        assert_eq!(digits, "9780000000002");
    }

    #[test]
    fn hyphenation_covers_wider_publisher_ranges() {
        assert_eq!(hyphenate("9780700000005"), "978-0-7000-0000-5");
    }

    #[test]
    fn hyphenation_falls_back_on_unknown_group() {
        assert_eq!(hyphenate("9791000000000"), "9791000000000");
    }
}
