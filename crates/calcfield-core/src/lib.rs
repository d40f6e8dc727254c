//! # calcfield-core: Expression Engine for Calculator Input Fields
//!
//! Turns a stream of keypad keystrokes into a live arithmetic expression
//! (`lhs`, `lhs op`, `lhs op rhs`), renders it as locale-aware currency
//! text, and keeps a bound decimal value in sync with the host.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     calcfield-core Architecture                         │
//! │                                                                         │
//! │   keypad ──Key──► InputEvent                                            │
//! │                      │                                                  │
//! │  ┌───────────────────▼─────────────────────────────────────────────┐   │
//! │  │                     Transformer (owns state)                     │   │
//! │  │                                                                  │   │
//! │  │   ┌───────────┐    ┌───────────┐    ┌───────────┐               │   │
//! │  │   │  Reducer  │───►│ Evaluator │    │ Formatter │──► text       │   │
//! │  │   │ state tbl │    │ checked Δ │    │  locale   │               │   │
//! │  │   └─────┬─────┘    └───────────┘    └─────▲─────┘               │   │
//! │  │         └──────────► Expression ──────────┘                      │   │
//! │  │                          │                                       │   │
//! │  │   host push ──debounce──►┤                                       │   │
//! │  └──────────────────────────┼───────────────────────────────────────┘   │
//! │                             ▼                                           │
//! │                ValueBinding (decimal value, InputResult)                │
//! │                                                                         │
//! │   Driver: the same Transformer behind tokio channels                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Operator, InputEvent, InputResult, Expression
//! - [`validation`] - Decimal-string predicates and parsing
//! - [`evaluator`] - Binary arithmetic on a finished pair
//! - [`reducer`] - Keystroke state machine
//! - [`formatter`] - Locale-aware display text
//! - [`transformer`] - Stateful engine with host-push debounce
//! - [`binding`] - Host capability receiving outputs
//! - [`driver`] - Async task wrapper around a transformer
//! - [`keypad`] - Key set and default layout
//! - [`config`] - Locale and input settings
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use calcfield_core::{InputEvent, KeypadConfig, Operator, Transformer};
//!
//! let mut field = Transformer::new(&KeypadConfig::default());
//! for event in [
//!     InputEvent::Digit(1),
//!     InputEvent::Digit(2),
//!     InputEvent::Operator(Operator::Addition),
//!     InputEvent::Digit(5),
//! ] {
//!     field.handle_key(event);
//! }
//!
//! let output = field.handle_key(InputEvent::Equals);
//! assert_eq!(output.text, "$17");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod binding;
pub mod config;
pub mod driver;
pub mod error;
pub mod evaluator;
pub mod formatter;
pub mod keypad;
pub mod reducer;
pub mod transformer;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use binding::{NoOpBinding, SharedBinding, ValueBinding};
pub use config::{CurrencyPosition, InputSettings, KeypadConfig, LocaleSettings};
pub use driver::{Driver, DriverHandle, DriverOutput};
pub use error::{CalcError, CalcResult, ConfigError, ConfigResult, DriverError, DriverResult};
pub use evaluator::{Evaluation, Evaluator};
pub use formatter::Formatter;
pub use keypad::Key;
pub use reducer::{Reducer, Reduction};
pub use transformer::{KeyOutput, Transformer};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Fraction digits kept by evaluation and shown by the formatter.
pub const DECIMAL_SCALE: u32 = 2;

/// Host pushes within this many milliseconds of a keystroke are dropped.
pub const DEBOUNCE_WINDOW_MS: u64 = 500;

/// Decimal separator used inside operand strings, whatever the locale.
pub const CANONICAL_SEPARATOR: char = '.';
