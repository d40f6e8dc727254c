//! # Error Types
//!
//! Error types for calcfield-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  CalcError            - What a host or the replay binary sees           │
//! │  ├── ConfigError      - Loading / validating keypad.toml               │
//! │  └── DriverError      - Talking to a stopped driver task               │
//! │                                                                         │
//! │  NOT errors (absorbed by the engine, never surfaced):                  │
//! │  • malformed digit entry        → event ignored                        │
//! │  • unparseable operand / ÷0     → evaluation yields no result          │
//! │  • debounced host value push    → push dropped                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A setting has an unusable value.
    #[error("Invalid keypad configuration: {0}")]
    InvalidConfig(String),

    /// Reading or writing the config file failed.
    #[error("Config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// =============================================================================
// Driver Error
// =============================================================================

/// Errors from a [`DriverHandle`](crate::driver::DriverHandle).
#[derive(Debug, Error)]
pub enum DriverError {
    /// The driver task has stopped and no longer accepts input.
    #[error("Driver channel closed: {0}")]
    ChannelClosed(&'static str),
}

// =============================================================================
// Top-Level Error
// =============================================================================

#[derive(Debug, Error)]
pub enum CalcError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    /// A replay token that is not a key or value push.
    #[error("Unknown input token: '{0}'")]
    UnknownToken(String),

    /// A command-line flag given without its value.
    #[error("Missing value for '{0}'")]
    MissingArgument(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

pub type ConfigResult<T> = Result<T, ConfigError>;

pub type DriverResult<T> = Result<T, DriverError>;

pub type CalcResult<T> = Result<T, CalcError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigError::InvalidConfig("decimal_separator must not be empty".into());
        assert_eq!(
            err.to_string(),
            "Invalid keypad configuration: decimal_separator must not be empty"
        );

        let err = DriverError::ChannelClosed("keys");
        assert_eq!(err.to_string(), "Driver channel closed: keys");
    }

    #[test]
    fn test_conversions_are_transparent() {
        let err: CalcError = ConfigError::InvalidConfig("bad".into()).into();
        assert!(matches!(err, CalcError::Config(_)));
        assert_eq!(err.to_string(), "Invalid keypad configuration: bad");

        let err: CalcError = DriverError::ChannelClosed("values").into();
        assert!(matches!(err, CalcError::Driver(_)));
    }

    #[test]
    fn test_missing_argument_message() {
        let err = CalcError::MissingArgument("--config".into());
        assert_eq!(err.to_string(), "Missing value for '--config'");
    }

    #[test]
    fn test_toml_error_converts() {
        let parse_err = toml::from_str::<crate::config::KeypadConfig>("[locale\n").unwrap_err();
        let err: ConfigError = parse_err.into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
