//! # Domain Types
//!
//! Core value types shared by every stage of the engine and by the host UI.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   InputEvent    │   │   Expression    │   │  InputResult    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Digit(0-9)     │──►│  Empty          │──►│  operand (op)   │       │
//! │  │  Separator      │   │  Lhs            │   │  num (rhs)      │       │
//! │  │  Operator(op)   │   │  LhsOperator    │   └─────────────────┘       │
//! │  │  Backspace      │   │  LhsOperatorRhs │                             │
//! │  │  Equals         │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │    Operator     │  Addition "+"  Subtraction "-"                     │
//! │  │                 │  Multiplication "×"  Division "÷"                  │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Raw Operands
//! Operand text inside an [`Expression`] is always raw: ASCII digits, at most
//! one canonical `.` separator and, for chained results, a leading `-`.
//! Grouping, currency glyphs and the locale separator only ever appear in the
//! formatter's output.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::validation::parse_decimal;

// =============================================================================
// Operator
// =============================================================================

/// One of the four binary operators on the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl Operator {
    /// All operators in keypad order.
    pub const ALL: [Operator; 4] = [
        Operator::Addition,
        Operator::Subtraction,
        Operator::Multiplication,
        Operator::Division,
    ];

    /// Returns the glyph shown between the operands.
    #[inline]
    pub const fn glyph(&self) -> &'static str {
        match self {
            Operator::Addition => "+",
            Operator::Subtraction => "-",
            Operator::Multiplication => "×",
            Operator::Division => "÷",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

// =============================================================================
// Input Event
// =============================================================================

/// A single keypad press, the vocabulary the reducer consumes.
///
/// `Digit` carries values `0..=9`; anything larger is ignored by the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    Digit(u8),
    Separator,
    Operator(Operator),
    Backspace,
    Equals,
}

// =============================================================================
// Input Result
// =============================================================================

/// The operator and right-hand operand of the pair that was just evaluated.
///
/// Hosts use it for "last operation performed" bookkeeping, separately from
/// the running display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InputResult {
    pub operand: Operator,
    #[ts(as = "String")]
    pub num: Decimal,
}

impl InputResult {
    #[inline]
    pub const fn new(operand: Operator, num: Decimal) -> Self {
        InputResult { operand, num }
    }
}

// =============================================================================
// Expression
// =============================================================================

/// The state of the single-operation entry buffer.
///
/// ## State Progression
/// ```text
/// Empty ──digit──► Lhs("1") ──op──► LhsOperator("1", +) ──digit──►
///       LhsOperatorRhs("1", +, "2") ──equals──► Lhs("3")
/// ```
///
/// Expressions are replaced, never mutated: every event or accepted value
/// push produces a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    #[default]
    Empty,
    Lhs(String),
    LhsOperator(String, Operator),
    LhsOperatorRhs(String, Operator, String),
}

impl Expression {
    /// Builds the expression shown for a value pushed by the host.
    ///
    /// `None` clears the field; a value becomes a plain left operand in its
    /// shortest canonical form (`12.50` → `"12.5"`).
    ///
    /// ## Example
    /// ```rust
    /// use calcfield_core::Expression;
    /// use rust_decimal::Decimal;
    ///
    /// let value = Decimal::new(1250, 2); // 12.50
    /// assert_eq!(Expression::with_value(Some(value)), Expression::Lhs("12.5".into()));
    /// assert_eq!(Expression::with_value(None), Expression::Empty);
    /// ```
    pub fn with_value(value: Option<Decimal>) -> Self {
        match value {
            Some(value) => Expression::Lhs(value.normalize().to_string()),
            None => Expression::Empty,
        }
    }

    /// Returns the raw left operand, if any.
    pub fn lhs(&self) -> Option<&str> {
        match self {
            Expression::Empty => None,
            Expression::Lhs(lhs)
            | Expression::LhsOperator(lhs, _)
            | Expression::LhsOperatorRhs(lhs, _, _) => Some(lhs),
        }
    }

    /// Returns the pending operator, if any.
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Expression::LhsOperator(_, op) | Expression::LhsOperatorRhs(_, op, _) => Some(*op),
            _ => None,
        }
    }

    /// The numeric content of the left operand, or `None` while it is not a
    /// complete number yet.
    ///
    /// This is the value bound to the host's decimal field.
    pub fn numeric_value(&self) -> Option<Decimal> {
        self.lhs().and_then(parse_decimal)
    }

    /// Checks if nothing has been entered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Expression::Empty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
