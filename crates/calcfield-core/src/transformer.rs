//! # Transformer
//!
//! Single owner of the authoritative [`Expression`]. Merges keystrokes and
//! host value pushes and produces the display text and decimal value.
//!
//! ## Arbitration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  keystroke ──► handle_key ──► Reducer ──► Expression ──┬──► text        │
//! │     │                                                  ├──► value       │
//! │     └──► last_key_at = now                             └──► InputResult │
//! │                                                                         │
//! │  host push ──► handle_value                                             │
//! │                   │                                                     │
//! │                   ├── now - last_key_at < window ──► dropped            │
//! │                   │                                                     │
//! │                   └── otherwise ──► Expression::with_value ──► text     │
//! │                                     (no value, no InputResult)          │
//! │                                                                         │
//! │  Timeline (window = 500 ms):                                            │
//! │   T          T+0.2s              T+0.6s                                 │
//! │   key "5"    push(5) dropped     push(8) accepted                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A keystroke updates the host's value; the host may echo that value back
//! as a push. The window keeps the echo from overwriting the expression the
//! user is still building. Accepted pushes are never re-emitted as values.

use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::binding::{NoOpBinding, ValueBinding};
use crate::config::KeypadConfig;
use crate::evaluator::Evaluator;
use crate::formatter::Formatter;
use crate::reducer::Reducer;
use crate::types::{Expression, InputEvent, InputResult};

/// Outputs of one keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOutput {
    /// Display text for the new expression.
    pub text: String,

    /// Numeric value of the left operand, for two-way binding.
    pub value: Option<Decimal>,

    /// The pair evaluated by this keystroke, if any.
    pub announcement: Option<InputResult>,
}

/// Stateful engine for one calculator field.
pub struct Transformer {
    reducer: Reducer,
    formatter: Formatter,
    debounce_window: Duration,
    binding: Arc<dyn ValueBinding>,
    expression: Expression,
    last_key_at: Option<Instant>,
}

impl Transformer {
    /// Creates a transformer with no host binding.
    pub fn new(config: &KeypadConfig) -> Self {
        Self::with_binding(config, Arc::new(NoOpBinding))
    }

    /// Creates a transformer that reports outputs to `binding`.
    ///
    /// The evaluator's rounding scale and the formatter's fraction digits
    /// both come from `config.locale.max_fraction_digits`.
    pub fn with_binding(config: &KeypadConfig, binding: Arc<dyn ValueBinding>) -> Self {
        Transformer {
            reducer: Reducer::new(Evaluator::new(config.scale())),
            formatter: Formatter::new(config.locale.clone()),
            debounce_window: config.debounce_window(),
            binding,
            expression: Expression::Empty,
            last_key_at: None,
        }
    }

    /// The current authoritative expression.
    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// Display text for the current expression.
    pub fn text(&self) -> String {
        self.formatter.format(&self.expression)
    }

    // =========================================================================
    // Keystrokes
    // =========================================================================

    /// Handles a keystroke at the current instant.
    pub fn handle_key(&mut self, event: InputEvent) -> KeyOutput {
        self.handle_key_at(event, Instant::now())
    }

    /// Handles a keystroke that happened at `now`.
    pub fn handle_key_at(&mut self, event: InputEvent, now: Instant) -> KeyOutput {
        self.last_key_at = Some(now);

        let reduction = self.reducer.reduce(&self.expression, event);
        self.expression = reduction.expression;

        let text = self.formatter.format(&self.expression);
        let value = self.expression.numeric_value();
        trace!(?event, expression = ?self.expression, %text, "Keystroke reduced");

        if let Some(result) = reduction.announcement {
            self.binding.set_input_result(result);
        }
        self.binding.set_decimal_value(value);

        KeyOutput {
            text,
            value,
            announcement: reduction.announcement,
        }
    }

    // =========================================================================
    // Host Pushes
    // =========================================================================

    /// Handles a host value push at the current instant.
    ///
    /// Returns the new display text, or `None` if the push was dropped.
    pub fn handle_value(&mut self, value: Option<Decimal>) -> Option<String> {
        self.handle_value_at(value, Instant::now())
    }

    /// Handles a host value push that arrived at `now`.
    pub fn handle_value_at(&mut self, value: Option<Decimal>, now: Instant) -> Option<String> {
        if !self.accepts_value_at(now) {
            debug!(?value, "Dropping host value pushed during keystroke debounce");
            return None;
        }

        self.expression = Expression::with_value(value);
        Some(self.formatter.format(&self.expression))
    }

    fn accepts_value_at(&self, now: Instant) -> bool {
        match self.last_key_at {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.debounce_window,
        }
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer")
            .field("expression", &self.expression)
            .field("last_key_at", &self.last_key_at)
            .field("debounce_window", &self.debounce_window)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::SharedBinding;
    use crate::config::LocaleSettings;
    use crate::types::Operator;
    use rust_decimal_macros::dec;

    use crate::types::InputEvent::{Backspace, Digit, Equals, Separator};

    const ADD: InputEvent = InputEvent::Operator(Operator::Addition);
    const DIV: InputEvent = InputEvent::Operator(Operator::Division);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_addition_scenario() {
        let binding = Arc::new(SharedBinding::new());
        let mut transformer = Transformer::with_binding(&KeypadConfig::default(), binding.clone());

        let mut last = None;
        for event in [Digit(1), Digit(2), ADD, Digit(5)] {
            let output = transformer.handle_key(event);
            assert_eq!(output.announcement, None);
            last = Some(output);
        }
        assert_eq!(last.map(|o| o.text), Some("$12 + 5".to_string()));

        let output = transformer.handle_key(Equals);
        assert_eq!(output.text, "$17");
        assert_eq!(output.value, Some(dec!(17)));
        assert_eq!(
            output.announcement,
            Some(InputResult::new(Operator::Addition, dec!(5)))
        );

        assert_eq!(transformer.expression(), &Expression::Lhs("17".into()));
        assert_eq!(binding.value(), Some(dec!(17)));
        assert_eq!(
            binding.input_result(),
            Some(InputResult::new(Operator::Addition, dec!(5)))
        );
    }

    #[test]
    fn test_value_follows_left_operand() {
        let mut transformer = Transformer::new(&KeypadConfig::default());
        assert_eq!(transformer.handle_key(Separator).value, None);
        assert_eq!(transformer.handle_key(Digit(5)).value, Some(dec!(0.5)));
        assert_eq!(transformer.handle_key(ADD).value, Some(dec!(0.5)));
        assert_eq!(transformer.handle_key(Digit(2)).value, Some(dec!(0.5)));
    }

    #[test]
    fn test_division_by_zero_keeps_left_operand() {
        let mut transformer = Transformer::new(&KeypadConfig::default());
        for event in [Digit(5), DIV, Digit(0)] {
            transformer.handle_key(event);
        }

        let output = transformer.handle_key(Equals);
        assert_eq!(
            transformer.expression(),
            &Expression::LhsOperator("5".into(), Operator::Division)
        );
        assert_eq!(output.text, "$5 ÷ ");
        assert_eq!(output.value, Some(dec!(5)));
    }

    #[test]
    fn test_debounce_scenario() {
        let mut transformer = Transformer::new(&KeypadConfig::default());
        let t0 = Instant::now();

        transformer.handle_key_at(Digit(3), t0);

        assert_eq!(transformer.handle_value_at(Some(dec!(99)), t0 + ms(200)), None);
        assert_eq!(transformer.expression(), &Expression::Lhs("3".into()));
        assert_eq!(transformer.text(), "$3");

        assert_eq!(
            transformer.handle_value_at(Some(dec!(99)), t0 + ms(600)),
            Some("$99".to_string())
        );
        assert_eq!(transformer.expression(), &Expression::Lhs("99".into()));
    }

    #[test]
    fn test_debounce_window_boundary() {
        let mut transformer = Transformer::new(&KeypadConfig::default());
        let t0 = Instant::now();
        transformer.handle_key_at(Digit(1), t0);

        assert_eq!(transformer.handle_value_at(Some(dec!(2)), t0 + ms(499)), None);
        assert!(transformer.handle_value_at(Some(dec!(2)), t0 + ms(500)).is_some());
    }

    #[test]
    fn test_push_before_any_keystroke_is_accepted() {
        let mut transformer = Transformer::new(&KeypadConfig::default());
        assert_eq!(
            transformer.handle_value(Some(dec!(1234.5))),
            Some("$1,234.5".to_string())
        );
        assert_eq!(transformer.handle_value(None), Some(String::new()));
        assert_eq!(transformer.expression(), &Expression::Empty);
    }

    #[test]
    fn test_accepted_push_is_not_reemitted() {
        let binding = Arc::new(SharedBinding::new());
        let mut transformer = Transformer::with_binding(&KeypadConfig::default(), binding.clone());
        let t0 = Instant::now();

        transformer.handle_key_at(Digit(4), t0);
        assert_eq!(binding.value(), Some(dec!(4)));

        transformer.handle_value_at(Some(dec!(250)), t0 + ms(1000));
        assert_eq!(binding.value(), Some(dec!(4)));
        assert_eq!(binding.input_result(), None);
    }

    #[test]
    fn test_typing_continues_from_pushed_value() {
        let mut transformer = Transformer::new(&KeypadConfig::default());
        transformer.handle_value(Some(dec!(12.5)));

        assert_eq!(transformer.handle_key(Digit(5)).text, "$12.55");
        assert_eq!(transformer.handle_key(Backspace).text, "$12.5");
    }

    #[test]
    fn test_clock_going_backwards_counts_as_recent() {
        let mut transformer = Transformer::new(&KeypadConfig::default());
        let t0 = Instant::now() + ms(1000);
        transformer.handle_key_at(Digit(1), t0);
        assert_eq!(transformer.handle_value_at(Some(dec!(7)), t0 - ms(1)), None);
    }

    #[test]
    fn test_fraction_digits_drive_evaluation_scale() {
        let config = KeypadConfig {
            locale: LocaleSettings {
                max_fraction_digits: 0,
                ..Default::default()
            },
            ..Default::default()
        };

        let mut transformer = Transformer::new(&config);
        for event in [Digit(5), DIV, Digit(2)] {
            transformer.handle_key(event);
        }
        let output = transformer.handle_key(Equals);
        assert_eq!(transformer.expression(), &Expression::Lhs("2".into()));
        assert_eq!(output.text, "$2");
        assert_eq!(output.value, Some(dec!(2)));

        let mut transformer = Transformer::new(&config);
        for event in [Digit(7), DIV, Digit(2), Equals] {
            transformer.handle_key(event);
        }
        assert_eq!(transformer.expression(), &Expression::Lhs("4".into()));
        assert_eq!(transformer.text(), "$4");
    }

    #[test]
    fn test_custom_debounce_and_locale() {
        let config = KeypadConfig {
            locale: LocaleSettings::euro(),
            input: crate::config::InputSettings {
                debounce_window_ms: 50,
            },
        };
        let mut transformer = Transformer::new(&config);
        let t0 = Instant::now();

        transformer.handle_key_at(Digit(1), t0);
        assert_eq!(
            transformer.handle_value_at(Some(dec!(1500.25)), t0 + ms(60)),
            Some("1.500,25 €".to_string())
        );
    }
}
