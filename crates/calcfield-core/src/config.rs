//! # Keypad Configuration
//!
//! Locale rules and input timing consumed by the engine.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CALCFIELD_DECIMAL_SEPARATOR=,                                      │
//! │     CALCFIELD_CURRENCY_SYMBOL=€                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/calcfield/keypad.toml (Linux)                            │
//! │     ~/Library/Application Support/dev.calcfield.calcfield/keypad.toml  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     "." separator, "," grouping, "$" prefix, 2 digits, 500 ms          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The host resolves the locale (separator, currency symbol); this module
//! only carries the resolved glyphs.
//!
//! ## Configuration File Format
//! ```toml
//! # keypad.toml
//! [locale]
//! decimal_separator = ","
//! grouping_separator = "."
//! uses_grouping = true
//! currency_symbol = "€"
//! currency_position = "suffix"
//! max_fraction_digits = 2
//!
//! [input]
//! debounce_window_ms = 500
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::{DEBOUNCE_WINDOW_MS, DECIMAL_SCALE};

/// Largest scale a 96-bit decimal can carry.
const MAX_SCALE: u32 = 28;

// =============================================================================
// Currency Position
// =============================================================================

/// Where the currency glyph sits relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyPosition {
    /// `$1,234.5`
    #[default]
    Prefix,

    /// `1.234,5 €`
    Suffix,
}

impl std::fmt::Display for CurrencyPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurrencyPosition::Prefix => write!(f, "prefix"),
            CurrencyPosition::Suffix => write!(f, "suffix"),
        }
    }
}

impl std::str::FromStr for CurrencyPosition {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prefix" | "before" => Ok(CurrencyPosition::Prefix),
            "suffix" | "after" => Ok(CurrencyPosition::Suffix),
            other => Err(ConfigError::InvalidConfig(format!(
                "Unknown currency position: '{}'. Valid options: prefix, suffix",
                other
            ))),
        }
    }
}

// =============================================================================
// Locale Settings
// =============================================================================

/// Resolved locale glyphs used by the formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleSettings {
    /// Decimal separator shown to the user.
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,

    /// Thousands grouping separator.
    #[serde(default = "default_grouping_separator")]
    pub grouping_separator: String,

    /// Whether to group the integer part at all.
    #[serde(default = "default_true")]
    pub uses_grouping: bool,

    /// Currency glyph; empty disables it.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    #[serde(default)]
    pub currency_position: CurrencyPosition,

    /// Maximum fraction digits shown, and the evaluator's rounding scale.
    #[serde(default = "default_max_fraction_digits")]
    pub max_fraction_digits: u32,
}

fn default_decimal_separator() -> String {
    ".".to_string()
}

fn default_grouping_separator() -> String {
    ",".to_string()
}

fn default_true() -> bool {
    true
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_max_fraction_digits() -> u32 {
    DECIMAL_SCALE
}

impl Default for LocaleSettings {
    fn default() -> Self {
        LocaleSettings {
            decimal_separator: default_decimal_separator(),
            grouping_separator: default_grouping_separator(),
            uses_grouping: true,
            currency_symbol: default_currency_symbol(),
            currency_position: CurrencyPosition::default(),
            max_fraction_digits: default_max_fraction_digits(),
        }
    }
}

impl LocaleSettings {
    /// Continental European style: `1.234,5 €`.
    pub fn euro() -> Self {
        LocaleSettings {
            decimal_separator: ",".to_string(),
            grouping_separator: ".".to_string(),
            currency_symbol: "€".to_string(),
            currency_position: CurrencyPosition::Suffix,
            ..Default::default()
        }
    }
}

// =============================================================================
// Input Settings
// =============================================================================

/// Timing rules for merging keystrokes with host value pushes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSettings {
    /// Minimum quiet time after a keystroke before a host push is accepted
    /// (milliseconds).
    #[serde(default = "default_debounce_window")]
    pub debounce_window_ms: u64,
}

fn default_debounce_window() -> u64 {
    DEBOUNCE_WINDOW_MS
}

impl Default for InputSettings {
    fn default() -> Self {
        InputSettings {
            debounce_window_ms: default_debounce_window(),
        }
    }
}

// =============================================================================
// Main Keypad Configuration
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeypadConfig {
    #[serde(default)]
    pub locale: LocaleSettings,

    #[serde(default)]
    pub input: InputSettings,
}

impl KeypadConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (keypad.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading keypad config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load keypad config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::InvalidConfig("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Keypad config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let locale = &self.locale;

        if locale.decimal_separator.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "decimal_separator must not be empty".into(),
            ));
        }

        if locale.decimal_separator.chars().any(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidConfig(format!(
                "decimal_separator must not contain digits, got: {}",
                locale.decimal_separator
            )));
        }

        if locale.uses_grouping {
            if locale.grouping_separator.is_empty() {
                return Err(ConfigError::InvalidConfig(
                    "grouping_separator must not be empty when grouping is enabled".into(),
                ));
            }
            if locale.grouping_separator == locale.decimal_separator {
                return Err(ConfigError::InvalidConfig(
                    "grouping_separator must differ from decimal_separator".into(),
                ));
            }
        }

        if locale.max_fraction_digits > MAX_SCALE {
            return Err(ConfigError::InvalidConfig(format!(
                "max_fraction_digits must be at most {}, got: {}",
                MAX_SCALE, locale.max_fraction_digits
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(separator) = std::env::var("CALCFIELD_DECIMAL_SEPARATOR") {
            debug!(separator = %separator, "Overriding decimal separator from environment");
            self.locale.decimal_separator = separator;
        }

        if let Ok(separator) = std::env::var("CALCFIELD_GROUPING_SEPARATOR") {
            self.locale.grouping_separator = separator;
        }

        if let Ok(grouping) = std::env::var("CALCFIELD_USES_GROUPING") {
            match grouping.parse::<bool>() {
                Ok(enabled) => self.locale.uses_grouping = enabled,
                Err(_) => warn!(value = %grouping, "Ignoring non-boolean CALCFIELD_USES_GROUPING"),
            }
        }

        if let Ok(symbol) = std::env::var("CALCFIELD_CURRENCY_SYMBOL") {
            debug!(symbol = %symbol, "Overriding currency symbol from environment");
            self.locale.currency_symbol = symbol;
        }

        if let Ok(position) = std::env::var("CALCFIELD_CURRENCY_POSITION") {
            match position.parse() {
                Ok(parsed) => self.locale.currency_position = parsed,
                Err(e) => warn!(error = %e, "Ignoring CALCFIELD_CURRENCY_POSITION"),
            }
        }

        if let Ok(digits) = std::env::var("CALCFIELD_MAX_FRACTION_DIGITS") {
            if let Ok(d) = digits.parse::<u32>() {
                self.locale.max_fraction_digits = d;
            }
        }

        if let Ok(window) = std::env::var("CALCFIELD_DEBOUNCE_MS") {
            if let Ok(ms) = window.parse::<u64>() {
                debug!(ms, "Overriding debounce window from environment");
                self.input.debounce_window_ms = ms;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "calcfield", "calcfield")
            .map(|dirs| dirs.config_dir().join("keypad.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the debounce window as a duration.
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.input.debounce_window_ms)
    }

    /// Returns the shared rounding / display scale.
    pub fn scale(&self) -> u32 {
        self.locale.max_fraction_digits
    }
}
