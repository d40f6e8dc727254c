//! # Formatter
//!
//! Renders an [`Expression`] as display text. A pure function of the
//! expression and the injected [`LocaleSettings`].
//!
//! ## Rendering Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Expression                         Display (default locale)           │
//! │  ──────────                         ────────────────────────           │
//! │  Empty                              ""                                  │
//! │  Lhs("1234.5")                      "$1,234.5"                          │
//! │  Lhs("12.0")                        "12.0"        ← still typing zeros  │
//! │  Lhs("12.")                         "12."         ← still typing        │
//! │  LhsOperator("12", +)               "$12 + "                            │
//! │  LhsOperatorRhs("12", ×, "1.5")     "$12 × 1.5"   ← rhs stays raw       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Partial input never fails: anything that is not yet a complete number is
//! shown as typed, with only the decimal separator localized.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::{CurrencyPosition, LocaleSettings};
use crate::types::Expression;
use crate::validation::{
    has_zeroes_right_after_separator, is_complete_number, is_valid_decimal_string,
    parse_decimal,
};
use crate::CANONICAL_SEPARATOR;

/// Locale-aware expression renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formatter {
    locale: LocaleSettings,
}

impl Formatter {
    pub fn new(locale: LocaleSettings) -> Self {
        Formatter { locale }
    }

    pub fn locale(&self) -> &LocaleSettings {
        &self.locale
    }

    /// Renders the whole expression.
    pub fn format(&self, expression: &Expression) -> String {
        match expression {
            Expression::Empty => String::new(),
            Expression::Lhs(lhs) => self.render(lhs),
            Expression::LhsOperator(lhs, op) => {
                format!("{} {} ", self.render(lhs), op.glyph())
            }
            Expression::LhsOperatorRhs(lhs, op, rhs) => {
                format!("{} {} {}", self.render(lhs), op.glyph(), self.render_rhs(rhs))
            }
        }
    }

    /// Formats a finished number: grouping, currency glyph, and at most
    /// `max_fraction_digits` fraction digits (half-even, no padding zeros).
    ///
    /// ## Example
    /// ```rust
    /// use calcfield_core::{Formatter, LocaleSettings};
    /// use rust_decimal::Decimal;
    ///
    /// let formatter = Formatter::new(LocaleSettings::default());
    /// assert_eq!(formatter.format_number(Decimal::new(123456, 2)), "$1,234.56");
    ///
    /// let formatter = Formatter::new(LocaleSettings::euro());
    /// assert_eq!(formatter.format_number(Decimal::new(123456, 2)), "1.234,56 €");
    /// ```
    pub fn format_number(&self, value: Decimal) -> String {
        let rounded = value
            .round_dp_with_strategy(
                self.locale.max_fraction_digits,
                RoundingStrategy::MidpointNearestEven,
            )
            .normalize();

        let digits = rounded.abs().to_string();
        let (integer, fraction) = match digits.split_once(CANONICAL_SEPARATOR) {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (digits.as_str(), None),
        };

        let mut number = self.group(integer);
        if let Some(fraction) = fraction {
            number.push_str(&self.locale.decimal_separator);
            number.push_str(fraction);
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let symbol = &self.locale.currency_symbol;

        let text = if symbol.is_empty() {
            format!("{sign}{number}")
        } else {
            match self.locale.currency_position {
                CurrencyPosition::Prefix => format!("{sign}{symbol}{number}"),
                CurrencyPosition::Suffix => format!("{sign}{number} {symbol}"),
            }
        };

        // An empty or whitespace-padded glyph must not leave stray spaces
        text.trim().to_string()
    }

    /// Left operand: formatted when finished, raw while typing.
    fn render(&self, operand: &str) -> String {
        if !is_complete_number(operand) || has_zeroes_right_after_separator(operand) {
            return self.localize_separator(operand);
        }

        match parse_decimal(operand) {
            Some(value) => self.format_number(value),
            None => self.localize_separator(operand),
        }
    }

    /// Right operand: raw text, blank if malformed.
    fn render_rhs(&self, operand: &str) -> String {
        if is_valid_decimal_string(operand) {
            self.localize_separator(operand)
        } else {
            String::new()
        }
    }

    fn localize_separator(&self, operand: &str) -> String {
        operand.replace(CANONICAL_SEPARATOR, &self.locale.decimal_separator)
    }

    fn group(&self, integer: &str) -> String {
        if !self.locale.uses_grouping {
            return integer.to_string();
        }

        let separator = &self.locale.grouping_separator;
        let len = integer.len();
        let mut grouped = String::with_capacity(len + (len / 3) * separator.len());

        for (i, c) in integer.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                grouped.push_str(separator);
            }
            grouped.push(c);
        }

        grouped
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
