//! # Validation Module
//!
//! Syntax checks for the raw operand strings held by an
//! [`Expression`](crate::Expression).
//!
//! ## What Counts as Valid
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Raw Operand Grammar                                   │
//! │                                                                         │
//! │   operand   := [ "-" ] digits [ "." digits ]                            │
//! │              | [ "-" ] "." digits                                       │
//! │   digits    := { "0".."9" }          (may be empty while typing)        │
//! │                                                                         │
//! │   VALID (in progress)        COMPLETE NUMBER       INVALID              │
//! │   ───────────────────        ───────────────       ───────              │
//! │   ""                         "12"                  "1.2.3"              │
//! │   "."                        "12." → 12            "1a"                 │
//! │   "12."                      ".5"  → 0.5           "1,5"                │
//! │   "-"                        "-3"                  "--3"                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The keypad never types `-`; it only appears when a negative result is
//! chained back in as the left operand.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::CANONICAL_SEPARATOR;

// =============================================================================
// Syntax
// =============================================================================

/// Checks whether `s` is a valid, possibly partial, decimal literal.
///
/// ## Example
/// ```rust
/// use calcfield_core::validation::is_valid_decimal_string;
///
/// assert!(is_valid_decimal_string(""));
/// assert!(is_valid_decimal_string(".5"));
/// assert!(is_valid_decimal_string("12."));
/// assert!(!is_valid_decimal_string("1.2.3"));
/// assert!(!is_valid_decimal_string("12a"));
/// ```
pub fn is_valid_decimal_string(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);
    let mut seen_separator = false;

    for c in body.chars() {
        if c == CANONICAL_SEPARATOR {
            if seen_separator {
                return false;
            }
            seen_separator = true;
        } else if !c.is_ascii_digit() {
            return false;
        }
    }

    true
}

/// Checks whether the operand already holds a decimal separator.
#[inline]
pub fn has_separator(s: &str) -> bool {
    s.contains(CANONICAL_SEPARATOR)
}

/// Checks whether the user is still typing zeros right after the separator
/// (`"12.0"`, `"12.00"`), which number formatting would collapse away.
pub fn has_zeroes_right_after_separator(s: &str) -> bool {
    let mut single = String::with_capacity(2);
    single.push(CANONICAL_SEPARATOR);
    single.push('0');
    let double = format!("{single}0");

    s.ends_with(&single) || s.ends_with(&double)
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a raw operand with the locale-neutral `.` convention.
///
/// ## Rules
/// - Must pass [`is_valid_decimal_string`]
/// - Must contain at least one digit (`""`, `"."` and `"-"` are not numbers)
/// - A trailing separator is ignored (`"12."` → 12)
/// - A leading separator reads as zero (`".5"` → 0.5)
/// - Values outside the decimal range yield `None`
///
/// ## Example
/// ```rust
/// use calcfield_core::validation::parse_decimal;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_decimal(".5"), Some(Decimal::new(5, 1)));
/// assert_eq!(parse_decimal("12."), Some(Decimal::new(12, 0)));
/// assert_eq!(parse_decimal("."), None);
/// ```
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    if !is_valid_decimal_string(s) || !s.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let (sign, body) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let body = body.strip_suffix(CANONICAL_SEPARATOR).unwrap_or(body);
    let lead = if body.starts_with(CANONICAL_SEPARATOR) { "0" } else { "" };

    Decimal::from_str(&format!("{sign}{lead}{body}")).ok()
}

/// Checks whether the operand is a finished number that may be formatted.
///
/// A bare or trailing separator parses but is still mid-edit.
pub fn is_complete_number(s: &str) -> bool {
    !s.ends_with(CANONICAL_SEPARATOR) && parse_decimal(s).is_some()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_valid_strings() {
        assert!(is_valid_decimal_string(""));
        assert!(is_valid_decimal_string("0"));
        assert!(is_valid_decimal_string("123"));
        assert!(is_valid_decimal_string("12.34"));
        assert!(is_valid_decimal_string(".5"));
        assert!(is_valid_decimal_string("."));
        assert!(is_valid_decimal_string("7."));
        assert!(is_valid_decimal_string("-3.5"));
    }

    #[test]
    fn test_invalid_strings() {
        assert!(!is_valid_decimal_string("1.2.3"));
        assert!(!is_valid_decimal_string(".."));
        assert!(!is_valid_decimal_string("1,5"));
        assert!(!is_valid_decimal_string("12a"));
        assert!(!is_valid_decimal_string(" 1"));
        assert!(!is_valid_decimal_string("--1"));
        assert!(!is_valid_decimal_string("1-"));
        assert!(!is_valid_decimal_string("١٢"));
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("123"), Some(dec!(123)));
        assert_eq!(parse_decimal("0.25"), Some(dec!(0.25)));
        assert_eq!(parse_decimal(".5"), Some(dec!(0.5)));
        assert_eq!(parse_decimal("12."), Some(dec!(12)));
        assert_eq!(parse_decimal("-.5"), Some(dec!(-0.5)));
        assert_eq!(parse_decimal("-17"), Some(dec!(-17)));
    }

    #[test]
    fn test_parse_decimal_rejects_incomplete() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("."), None);
        assert_eq!(parse_decimal("-"), None);
        assert_eq!(parse_decimal("-."), None);
        assert_eq!(parse_decimal("1.2.3"), None);
    }

    #[test]
    fn test_parse_decimal_out_of_range() {
        // 40 integer digits cannot fit in 96 bits
        let huge = "9".repeat(40);
        assert_eq!(parse_decimal(&huge), None);
    }

    #[test]
    fn test_zeroes_after_separator() {
        assert!(has_zeroes_right_after_separator("12.0"));
        assert!(has_zeroes_right_after_separator("12.00"));
        assert!(has_zeroes_right_after_separator(".0"));
        assert!(!has_zeroes_right_after_separator("12.10"));
        assert!(!has_zeroes_right_after_separator("100"));
        assert!(!has_zeroes_right_after_separator("12.05"));
    }

    #[test]
    fn test_complete_number() {
        assert!(is_complete_number("12"));
        assert!(is_complete_number(".5"));
        assert!(!is_complete_number("12."));
        assert!(!is_complete_number("."));
        assert!(!is_complete_number(""));
        assert!(has_separator("1.5"));
        assert!(!has_separator("15"));
    }
}
