//! # Keystroke Replay
//!
//! Feeds a token sequence through a calculator field and prints what the
//! field would show after each step. Useful for checking locale settings
//! and reproducing reports without a UI.
//!
//! ## Usage
//! ```bash
//! # 12 + 5 =
//! cargo run -p calcfield-core --bin replay -- 1 2 + 5 =
//!
//! # Host push right after a keystroke (dropped), then after 600 ms (kept)
//! cargo run -p calcfield-core --bin replay -- 3 set:99 wait:600 set:99
//!
//! # Custom config file
//! cargo run -p calcfield-core --bin replay -- --config ./keypad.toml 1 2 3 4 . 5
//! ```
//!
//! ## Tokens
//! - Keys: `0`-`9`, `.`, `+`, `-`, `*`, `/`, `<` (backspace), `=`
//! - `set:<decimal>` / `set:none` - host value push
//! - `wait:<ms>` - advance the simulated clock
//!
//! Keys and pushes do not advance the clock on their own.

use rust_decimal::Decimal;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

use calcfield_core::{CalcError, CalcResult, Key, KeypadConfig, Transformer};

/// One parsed command-line token.
#[derive(Debug)]
enum Step {
    Key(Key),
    Push(Option<Decimal>),
    Wait(Duration),
}

impl FromStr for Step {
    type Err = CalcError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let unknown = || CalcError::UnknownToken(token.to_string());

        if let Some(value) = token.strip_prefix("set:") {
            if value.eq_ignore_ascii_case("none") {
                return Ok(Step::Push(None));
            }
            let value = Decimal::from_str(value).map_err(|_| unknown())?;
            return Ok(Step::Push(Some(value)));
        }

        if let Some(ms) = token.strip_prefix("wait:") {
            let ms: u64 = ms.parse().map_err(|_| unknown())?;
            return Ok(Step::Wait(Duration::from_millis(ms)));
        }

        token.parse::<Key>().map(Step::Key)
    }
}

/// Parsed command line.
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    config_path: Option<PathBuf>,
    tokens: Vec<String>,
    help: bool,
}

fn parse_args<I>(args: I) -> CalcResult<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            let path = args.next().ok_or(CalcError::MissingArgument(arg))?;
            parsed.config_path = Some(PathBuf::from(path));
        } else if arg == "--help" || arg == "-h" {
            parsed.help = true;
        } else {
            parsed.tokens.push(arg);
        }
    }

    Ok(parsed)
}

fn main() -> CalcResult<()> {
    init_tracing();

    let Args {
        config_path,
        tokens,
        help,
    } = parse_args(env::args().skip(1))?;

    if help {
        print_help();
        return Ok(());
    }

    // Reject the whole run before printing anything
    let steps = tokens
        .iter()
        .map(|token| token.parse::<Step>())
        .collect::<CalcResult<Vec<_>>>()?;

    let config = KeypadConfig::load(config_path)?;
    info!(
        decimal_separator = %config.locale.decimal_separator,
        currency_symbol = %config.locale.currency_symbol,
        debounce_ms = config.input.debounce_window_ms,
        "Replaying {} steps",
        steps.len()
    );

    let mut field = Transformer::new(&config);
    let start = Instant::now();
    let mut elapsed = Duration::ZERO;

    for (token, step) in tokens.iter().zip(steps) {
        let now = start + elapsed;

        match step {
            Step::Key(key) => {
                let output = field.handle_key_at(key.event(), now);
                let value = output
                    .value
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "none".to_string());
                match output.announcement {
                    Some(result) => println!(
                        "{token:>10}  {:<24} value={value} evaluated {} {}",
                        format!("{:?}", output.text),
                        result.operand,
                        result.num
                    ),
                    None => println!(
                        "{token:>10}  {:<24} value={value}",
                        format!("{:?}", output.text)
                    ),
                }
            }
            Step::Push(value) => match field.handle_value_at(value, now) {
                Some(text) => println!("{token:>10}  {:<24} (push accepted)", format!("{text:?}")),
                None => println!("{token:>10}  {:<24} (push dropped)", ""),
            },
            Step::Wait(duration) => {
                elapsed += duration;
                println!("{token:>10}  t = {} ms", elapsed.as_millis());
            }
        }
    }

    Ok(())
}

/// `RUST_LOG=debug` shows ignored keys and dropped pushes.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,calcfield_core=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_help() {
    println!("Replay keystrokes through a calculator field");
    println!();
    println!("Usage: replay [OPTIONS] [TOKENS]...");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>  Config file (default: platform config dir)");
    println!("  -h, --help           Show this help message");
    println!();
    println!("Tokens:");
    println!("  0-9 . + - * / < =    Keys (< is backspace, = is Done)");
    println!("  set:<decimal>        Host value push (set:none clears)");
    println!("  wait:<ms>            Advance the simulated clock");
}
