//! # Host Binding
//!
//! The capability a host implements to receive engine outputs: it holds a
//! numeric value and the last [`InputResult`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Transformer ──set_decimal_value(Option<Decimal>)──► host decimal field │
//! │              ──set_input_result(InputResult)───────► "last operation"   │
//! │                                                                         │
//! │  host decimal field ──(later, maybe echoed)──► Transformer::handle_value│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The echo path is why the transformer debounces host pushes.

use rust_decimal::Decimal;
use std::sync::{Mutex, PoisonError};

use crate::types::InputResult;

// =============================================================================
// Binding Trait
// =============================================================================

/// Receives keystroke-driven outputs from a [`Transformer`](crate::Transformer).
pub trait ValueBinding: Send + Sync {
    /// Called after every keystroke with the expression's numeric value.
    fn set_decimal_value(&self, value: Option<Decimal>);

    /// Called whenever a pair was evaluated.
    fn set_input_result(&self, result: InputResult);
}

/// Binding that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpBinding;

impl ValueBinding for NoOpBinding {
    fn set_decimal_value(&self, _value: Option<Decimal>) {}
    fn set_input_result(&self, _result: InputResult) {}
}

// =============================================================================
// Shared Binding
// =============================================================================

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct BindingState {
    value: Option<Decimal>,
    input_result: Option<InputResult>,
}

/// Binding that keeps the latest value and result for a host to read.
#[derive(Debug, Default)]
pub struct SharedBinding {
    state: Mutex<BindingState>,
}

impl SharedBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest decimal value reported by a keystroke.
    pub fn value(&self) -> Option<Decimal> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).value
    }

    /// Latest evaluated `(operator, rhs)` pair.
    pub fn input_result(&self) -> Option<InputResult> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .input_result
    }
}

impl ValueBinding for SharedBinding {
    fn set_decimal_value(&self, value: Option<Decimal>) {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).value = value;
    }

    fn set_input_result(&self, result: InputResult) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .input_result = Some(result);
    }
}
