//! # Reducer
//!
//! The transition function `(Expression, InputEvent) -> Expression`.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  State            digit/sep        operator          backspace  equals  │
//! │  ─────            ─────────        ────────          ─────────  ──────  │
//! │  Empty            Lhs(d)           LhsOp("0", op)    Empty      Empty   │
//! │  Lhs(t)           Lhs(t+d)         LhsOp(t, op)      Lhs(t-1)   -       │
//! │  LhsOp(t, o)      Rhs(t, o, d)     LhsOp(t, op)      Lhs(t)     -       │
//! │  Rhs(t, o, r)     Rhs(t, o, r+d)   eval → LhsOp      Rhs(r-1)   eval    │
//! │                                                                         │
//! │  eval ok:   operator → LhsOp(result, op)    equals → Lhs(result)        │
//! │  eval none: operator → LhsOp(t, op)         equals → LhsOp(t, o)        │
//! │  Lhs("") and Rhs(t, o, "") collapse to Empty / LhsOp(t, o)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Invalid digit or separator entries leave the state unchanged; the
//! reducer never fails.

use tracing::debug;

use crate::evaluator::Evaluator;
use crate::types::{Expression, InputEvent, InputResult, Operator};
use crate::validation::{has_separator, is_valid_decimal_string};
use crate::CANONICAL_SEPARATOR;

/// Left operand used when an operator is pressed on an empty field.
const IMPLICIT_LHS: &str = "0";

/// Outcome of one reduction step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    pub expression: Expression,

    /// Set when the step evaluated a pair.
    pub announcement: Option<InputResult>,
}

impl Reduction {
    fn to(expression: Expression) -> Self {
        Reduction {
            expression,
            announcement: None,
        }
    }
}

/// Applies keypad events to expressions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reducer {
    evaluator: Evaluator,
}

impl Reducer {
    pub const fn new(evaluator: Evaluator) -> Self {
        Reducer { evaluator }
    }

    pub const fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Computes the next expression for `event`.
    pub fn reduce(&self, expression: &Expression, event: InputEvent) -> Reduction {
        match event {
            InputEvent::Digit(d) if d > 9 => {
                debug!(digit = d, "Ignoring out-of-range digit");
                Reduction::to(expression.clone())
            }
            InputEvent::Digit(d) => Reduction::to(self.append(expression, char::from(b'0' + d))),
            InputEvent::Separator => Reduction::to(self.append_separator(expression)),
            InputEvent::Operator(op) => self.apply_operator(expression, op),
            InputEvent::Backspace => Reduction::to(Self::backspace(expression)),
            InputEvent::Equals => self.commit(expression),
        }
    }

    /// Convenience: folds a whole event sequence starting from `Empty`.
    pub fn reduce_all<I>(&self, events: I) -> Expression
    where
        I: IntoIterator<Item = InputEvent>,
    {
        events
            .into_iter()
            .fold(Expression::Empty, |expr, event| self.reduce(&expr, event).expression)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn append(&self, expression: &Expression, c: char) -> Expression {
        match expression {
            Expression::Empty => Expression::Lhs(c.to_string()),
            Expression::Lhs(lhs) => match extend(lhs, c) {
                Some(lhs) => Expression::Lhs(lhs),
                None => expression.clone(),
            },
            Expression::LhsOperator(lhs, op) => {
                Expression::LhsOperatorRhs(lhs.clone(), *op, c.to_string())
            }
            Expression::LhsOperatorRhs(lhs, op, rhs) => match extend(rhs, c) {
                Some(rhs) => Expression::LhsOperatorRhs(lhs.clone(), *op, rhs),
                None => expression.clone(),
            },
        }
    }

    fn append_separator(&self, expression: &Expression) -> Expression {
        let operand = match expression {
            Expression::Lhs(lhs) => Some(lhs),
            Expression::LhsOperatorRhs(_, _, rhs) => Some(rhs),
            Expression::Empty | Expression::LhsOperator(..) => None,
        };

        if operand.is_some_and(|s| has_separator(s)) {
            debug!(?expression, "Ignoring second decimal separator");
            return expression.clone();
        }

        self.append(expression, CANONICAL_SEPARATOR)
    }

    fn apply_operator(&self, expression: &Expression, op: Operator) -> Reduction {
        match expression {
            Expression::Empty => {
                Reduction::to(Expression::LhsOperator(IMPLICIT_LHS.to_string(), op))
            }
            Expression::Lhs(lhs) | Expression::LhsOperator(lhs, _) => {
                Reduction::to(Expression::LhsOperator(lhs.clone(), op))
            }
            Expression::LhsOperatorRhs(lhs, _, _) => {
                let evaluation = self.evaluator.evaluate(expression);
                let next_lhs = evaluation.result.unwrap_or_else(|| {
                    debug!(?expression, "Discarding unusable right operand");
                    lhs.clone()
                });

                Reduction {
                    expression: Expression::LhsOperator(next_lhs, op),
                    announcement: evaluation.announcement,
                }
            }
        }
    }

    fn backspace(expression: &Expression) -> Expression {
        match expression {
            Expression::Empty => Expression::Empty,
            Expression::Lhs(lhs) => {
                let lhs = drop_last(lhs);
                if lhs.is_empty() {
                    Expression::Empty
                } else {
                    Expression::Lhs(lhs)
                }
            }
            Expression::LhsOperator(lhs, _) => Expression::Lhs(lhs.clone()),
            Expression::LhsOperatorRhs(lhs, op, rhs) => {
                let rhs = drop_last(rhs);
                if rhs.is_empty() {
                    Expression::LhsOperator(lhs.clone(), *op)
                } else {
                    Expression::LhsOperatorRhs(lhs.clone(), *op, rhs)
                }
            }
        }
    }

    fn commit(&self, expression: &Expression) -> Reduction {
        let Expression::LhsOperatorRhs(lhs, op, _) = expression else {
            return Reduction::to(expression.clone());
        };

        let evaluation = self.evaluator.evaluate(expression);
        let next = match evaluation.result {
            Some(result) => Expression::Lhs(result),
            None => {
                debug!(?expression, "Commit produced no result, dropping right operand");
                Expression::LhsOperator(lhs.clone(), *op)
            }
        };

        Reduction {
            expression: next,
            announcement: evaluation.announcement,
        }
    }
}

/// Appends `c` if the result is still a valid operand.
fn extend(operand: &str, c: char) -> Option<String> {
    let mut candidate = String::with_capacity(operand.len() + 1);
    candidate.push_str(operand);
    candidate.push(c);

    if is_valid_decimal_string(&candidate) {
        Some(candidate)
    } else {
        debug!(%candidate, "Rejected invalid operand");
        None
    }
}

fn drop_last(operand: &str) -> String {
    let mut chars = operand.chars();
    chars.next_back();
    chars.as_str().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::types::InputEvent::{Backspace, Digit, Equals, Separator};

    const ADD: InputEvent = InputEvent::Operator(Operator::Addition);
    const SUB: InputEvent = InputEvent::Operator(Operator::Subtraction);
    const MUL: InputEvent = InputEvent::Operator(Operator::Multiplication);
    const DIV: InputEvent = InputEvent::Operator(Operator::Division);

    fn lhs(s: &str) -> Expression {
        Expression::Lhs(s.to_string())
    }

    fn lhs_op(s: &str, op: Operator) -> Expression {
        Expression::LhsOperator(s.to_string(), op)
    }

    fn pair(l: &str, op: Operator, r: &str) -> Expression {
        Expression::LhsOperatorRhs(l.to_string(), op, r.to_string())
    }

    #[test]
    fn test_digits_build_left_operand() {
        let reducer = Reducer::default();
        assert_eq!(reducer.reduce_all([Digit(1), Digit(2), Digit(3)]), lhs("123"));
        assert_eq!(
            reducer.reduce_all([Digit(1), Separator, Digit(5)]),
            lhs("1.5")
        );
    }

    #[test]
    fn test_empty_transitions() {
        let reducer = Reducer::default();
        let empty = Expression::Empty;
        assert_eq!(reducer.reduce(&empty, Digit(7)).expression, lhs("7"));
        assert_eq!(reducer.reduce(&empty, Separator).expression, lhs("."));
        assert_eq!(
            reducer.reduce(&empty, ADD).expression,
            lhs_op("0", Operator::Addition)
        );
        assert_eq!(reducer.reduce(&empty, Backspace).expression, Expression::Empty);
        assert_eq!(reducer.reduce(&empty, Equals).expression, Expression::Empty);
    }

    #[test]
    fn test_second_separator_ignored() {
        let reducer = Reducer::default();
        assert_eq!(
            reducer.reduce_all([Digit(1), Separator, Digit(2), Separator, Digit(3)]),
            lhs("1.23")
        );
        assert_eq!(
            reducer.reduce_all([Digit(1), ADD, Separator, Separator, Digit(5)]),
            pair("1", Operator::Addition, ".5")
        );
    }

    #[test]
    fn test_out_of_range_digit_ignored() {
        let reducer = Reducer::default();
        let reduction = reducer.reduce(&lhs("4"), Digit(12));
        assert_eq!(reduction.expression, lhs("4"));
        assert_eq!(reduction.announcement, None);
    }

    #[test]
    fn test_lhs_transitions() {
        let reducer = Reducer::default();
        assert_eq!(
            reducer.reduce(&lhs("12"), MUL).expression,
            lhs_op("12", Operator::Multiplication)
        );
        assert_eq!(reducer.reduce(&lhs("12"), Backspace).expression, lhs("1"));
        assert_eq!(reducer.reduce(&lhs("1"), Backspace).expression, Expression::Empty);
        assert_eq!(reducer.reduce(&lhs("12"), Equals).expression, lhs("12"));
    }

    #[test]
    fn test_lhs_operator_transitions() {
        let reducer = Reducer::default();
        let state = lhs_op("12", Operator::Addition);
        assert_eq!(
            reducer.reduce(&state, Digit(3)).expression,
            pair("12", Operator::Addition, "3")
        );
        assert_eq!(
            reducer.reduce(&state, Separator).expression,
            pair("12", Operator::Addition, ".")
        );

        // Operator replaced without evaluation
        let reduction = reducer.reduce(&state, DIV);
        assert_eq!(reduction.expression, lhs_op("12", Operator::Division));
        assert_eq!(reduction.announcement, None);

        assert_eq!(reducer.reduce(&state, Backspace).expression, lhs("12"));
        assert_eq!(reducer.reduce(&state, Equals).expression, state);
    }

    #[test]
    fn test_pair_transitions() {
        let reducer = Reducer::default();
        let state = pair("12", Operator::Addition, "5");
        assert_eq!(
            reducer.reduce(&state, Digit(0)).expression,
            pair("12", Operator::Addition, "50")
        );
        assert_eq!(
            reducer.reduce(&state, Separator).expression,
            pair("12", Operator::Addition, "5.")
        );
        assert_eq!(
            reducer.reduce(&state, Backspace).expression,
            lhs_op("12", Operator::Addition)
        );
        assert_eq!(
            reducer.reduce(&pair("12", Operator::Addition, "56"), Backspace).expression,
            pair("12", Operator::Addition, "5")
        );
    }

    #[test]
    fn test_addition_scenario() {
        let reducer = Reducer::default();
        let before = reducer.reduce_all([Digit(1), Digit(2), ADD, Digit(5)]);
        assert_eq!(before, pair("12", Operator::Addition, "5"));

        let reduction = reducer.reduce(&before, Equals);
        assert_eq!(reduction.expression, lhs("17"));
        assert_eq!(
            reduction.announcement,
            Some(InputResult::new(Operator::Addition, dec!(5)))
        );
    }

    #[test]
    fn test_operator_chains_result() {
        let reducer = Reducer::default();
        let state = reducer.reduce_all([Digit(8), SUB, Digit(3)]);

        let reduction = reducer.reduce(&state, MUL);
        assert_eq!(reduction.expression, lhs_op("5", Operator::Multiplication));
        assert_eq!(
            reduction.announcement,
            Some(InputResult::new(Operator::Subtraction, dec!(3)))
        );

        let state = reducer.reduce(&reduction.expression, Digit(2)).expression;
        assert_eq!(reducer.reduce(&state, Equals).expression, lhs("10"));
    }

    #[test]
    fn test_operator_discards_unusable_rhs() {
        let reducer = Reducer::default();
        let state = pair("9", Operator::Division, "0");
        let reduction = reducer.reduce(&state, ADD);
        assert_eq!(reduction.expression, lhs_op("9", Operator::Addition));
        assert!(reduction.announcement.is_some());

        let state = pair("9", Operator::Addition, ".");
        assert_eq!(
            reducer.reduce(&state, SUB).expression,
            lhs_op("9", Operator::Subtraction)
        );
    }

    #[test]
    fn test_division_by_zero_scenario() {
        let reducer = Reducer::default();
        let state = reducer.reduce_all([Digit(5), DIV, Digit(0)]);
        let reduction = reducer.reduce(&state, Equals);
        assert_eq!(reduction.expression, lhs_op("5", Operator::Division));
        assert_eq!(reduction.expression.numeric_value(), Some(dec!(5)));
    }

    #[test]
    fn test_equals_is_idempotent() {
        let reducer = Reducer::default();
        let state = reducer.reduce_all([Digit(1), Digit(2), ADD, Digit(5)]);
        let once = reducer.reduce(&state, Equals);
        let twice = reducer.reduce(&once.expression, Equals);
        assert_eq!(once.expression, twice.expression);
        assert_eq!(twice.announcement, None);
    }

    #[test]
    fn test_backspace_reaches_empty_once() {
        let reducer = Reducer::default();
        let mut state = reducer.reduce_all([Digit(4), Separator, Digit(2)]);
        let mut empties = 0;

        for _ in 0..6 {
            state = reducer.reduce(&state, Backspace).expression;
            if state.is_empty() {
                empties += 1;
            }
            assert_ne!(state, lhs(""));
        }

        assert_eq!(state, Expression::Empty);
        // Three characters: "4.2" → "4." → "4" → Empty, then stays Empty
        assert_eq!(empties, 4);
    }

    #[test]
    fn test_leading_zeros_stay_raw() {
        let reducer = Reducer::default();
        let formatter = crate::formatter::Formatter::default();

        let state = reducer.reduce_all([Digit(0), Digit(5)]);
        assert_eq!(state, lhs("05"));
        assert_eq!(state.numeric_value(), Some(dec!(5)));
        assert_eq!(formatter.format(&state), "$5");

        let state = reducer.reduce(&state, Digit(0)).expression;
        assert_eq!(state, lhs("050"));
        assert_eq!(formatter.format(&state), "$50");
    }

    #[test]
    fn test_negative_result_keeps_editing() {
        let reducer = Reducer::default();
        let state = reducer.reduce_all([Digit(2), SUB, Digit(5), Equals]);
        assert_eq!(state, lhs("-3"));
        assert_eq!(reducer.reduce(&state, Separator).expression, lhs("-3."));
        assert_eq!(reducer.reduce(&state, Digit(1)).expression, lhs("-31"));
    }

    #[test]
    fn test_rounded_chain() {
        let reducer = Reducer::default();
        let state = reducer.reduce_all([Digit(1), Digit(0), DIV, Digit(3), Equals]);
        assert_eq!(state, lhs("3.33"));
    }

    #[test]
    fn test_any_digit_sequence_stays_modeled() {
        let reducer = Reducer::default();
        let sequences: [&[InputEvent]; 4] = [
            &[Digit(0), Digit(0), Separator, Digit(0)],
            &[Separator, Digit(9), Digit(9), Digit(9)],
            &[Digit(9); 12],
            &[Digit(1), Separator, Separator, Digit(2)],
        ];

        for events in sequences {
            let state = reducer.reduce_all(events.iter().copied());
            match &state {
                Expression::Lhs(text) => assert!(is_valid_decimal_string(text)),
                other => panic!("unexpected state {other:?}"),
            }
        }
    }
}
