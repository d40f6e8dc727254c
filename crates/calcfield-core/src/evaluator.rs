//! # Evaluator
//!
//! Computes `lhs <op> rhs` for a complete pair.
//!
//! ## Evaluation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LhsOperatorRhs("12", +, "5")                                           │
//! │       │                                                                 │
//! │       ├──► announce InputResult { operand: +, num: 5 }   (always)       │
//! │       │                                                                 │
//! │       ├──► parse lhs, rhs ─── fails ──► result: None                    │
//! │       │                                                                 │
//! │       ├──► checked op ─────── ÷0 / overflow ──► result: None            │
//! │       │                                                                 │
//! │       └──► round(scale, half-even) ──► normalize ──► result: "17"       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The announcement fires even when the arithmetic then fails, with an
//! unparseable rhs reported as zero. Hosts that only want successful
//! operations should check [`Evaluation::result`].

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::types::{Expression, InputResult, Operator};
use crate::validation::parse_decimal;
use crate::DECIMAL_SCALE;

/// Outcome of evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Evaluation {
    /// The `(operator, rhs)` pair just evaluated; `None` unless the
    /// expression was a full pair.
    pub announcement: Option<InputResult>,

    /// Canonical string of the rounded result.
    pub result: Option<String>,
}

/// Fixed-scale decimal evaluator using banker's rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    scale: u32,
}

impl Evaluator {
    /// Creates an evaluator rounding to `scale` fractional digits.
    ///
    /// The scale must match the formatter's maximum fraction digits; both
    /// are read from [`LocaleSettings::max_fraction_digits`](crate::config::LocaleSettings).
    pub const fn new(scale: u32) -> Self {
        Evaluator { scale }
    }

    /// Returns the rounding scale.
    #[inline]
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// Evaluates a full pair; any other shape yields an empty [`Evaluation`].
    pub fn evaluate(&self, expression: &Expression) -> Evaluation {
        let Expression::LhsOperatorRhs(lhs, op, rhs) = expression else {
            return Evaluation::default();
        };

        let announcement = InputResult::new(*op, parse_decimal(rhs).unwrap_or(Decimal::ZERO));
        let result = self.compute(lhs, *op, rhs);

        Evaluation {
            announcement: Some(announcement),
            result,
        }
    }

    fn compute(&self, lhs: &str, op: Operator, rhs: &str) -> Option<String> {
        let lhs_value = parse_decimal(lhs)?;
        let rhs_value = parse_decimal(rhs)?;

        let raw = match op {
            Operator::Addition => lhs_value.checked_add(rhs_value),
            Operator::Subtraction => lhs_value.checked_sub(rhs_value),
            Operator::Multiplication => lhs_value.checked_mul(rhs_value),
            Operator::Division => lhs_value.checked_div(rhs_value),
        };

        let Some(raw) = raw else {
            debug!(%lhs, %rhs, operator = %op, "Evaluation has no finite result");
            return None;
        };

        let rounded = raw
            .round_dp_with_strategy(self.scale, RoundingStrategy::MidpointNearestEven)
            .normalize();
        Some(rounded.to_string())
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new(DECIMAL_SCALE)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
