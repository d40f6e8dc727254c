//! # Driver
//!
//! Runs a [`Transformer`] as a background tokio task. Hosts talk to it
//! through a cloneable [`DriverHandle`] and read its outputs from the
//! receivers in [`DriverOutput`].
//!
//! ## Channels
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  DriverHandle                    Driver task                DriverOutput│
//! │  ────────────                    ───────────                ────────────│
//! │  send_key ───► key_rx ──┐                                               │
//! │                         ├──► select! ──► Transformer ──┬──► text_rx     │
//! │  push_value ─► push_rx ─┘                              ├──► value_rx    │
//! │                                                        └──► result_rx   │
//! │  shutdown ───► shutdown_rx ──► loop exits, outputs close                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One loop drains both inputs, so events are handled one at a time in the
//! order the loop picks them up. Order between the two input channels is
//! not guaranteed; order within one channel is.
//!
//! All channels hold at most [`CHANNEL_CAPACITY`] messages. A full text
//! channel pauses the driver until the host reads; a full value or result
//! channel drops the newest message instead.

use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::binding::ValueBinding;
use crate::config::KeypadConfig;
use crate::error::{DriverError, DriverResult};
use crate::transformer::Transformer;
use crate::types::{InputEvent, InputResult};

/// Capacity of every input and output channel.
pub const CHANNEL_CAPACITY: usize = 100;

// =============================================================================
// Driver Handle
// =============================================================================

/// Handle for feeding a running driver.
#[derive(Debug, Clone)]
pub struct DriverHandle {
    key_tx: mpsc::Sender<InputEvent>,
    push_tx: mpsc::Sender<Option<Decimal>>,
    shutdown_tx: mpsc::Sender<()>,
}

impl DriverHandle {
    /// Sends a keystroke.
    pub async fn send_key(&self, event: InputEvent) -> DriverResult<()> {
        self.key_tx
            .send(event)
            .await
            .map_err(|_| DriverError::ChannelClosed("keystroke"))
    }

    /// Sends a value pushed by the host.
    pub async fn push_value(&self, value: Option<Decimal>) -> DriverResult<()> {
        self.push_tx
            .send(value)
            .await
            .map_err(|_| DriverError::ChannelClosed("value push"))
    }

    /// Stops the driver. Output receivers close once the task exits.
    pub async fn shutdown(&self) -> DriverResult<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| DriverError::ChannelClosed("shutdown"))
    }
}

/// Receivers for everything a driver publishes.
#[derive(Debug)]
pub struct DriverOutput {
    /// Display text after every keystroke and every accepted push.
    pub text_rx: mpsc::Receiver<String>,

    /// Numeric value after every keystroke. Lossy when not drained.
    pub value_rx: mpsc::Receiver<Option<Decimal>>,

    /// Each evaluated `(operator, rhs)` pair. Lossy when not drained.
    pub result_rx: mpsc::Receiver<InputResult>,
}

// =============================================================================
// Channel Binding
// =============================================================================

/// Forwards transformer outputs into the driver's output channels.
struct ChannelBinding {
    value_tx: mpsc::Sender<Option<Decimal>>,
    result_tx: mpsc::Sender<InputResult>,
}

impl ValueBinding for ChannelBinding {
    fn set_decimal_value(&self, value: Option<Decimal>) {
        if let Err(mpsc::error::TrySendError::Full(value)) = self.value_tx.try_send(value) {
            trace!(?value, "Value channel full, dropping update");
        }
    }

    fn set_input_result(&self, result: InputResult) {
        if let Err(mpsc::error::TrySendError::Full(result)) = self.result_tx.try_send(result) {
            trace!(?result, "Result channel full, dropping update");
        }
    }
}

// =============================================================================
// Driver
// =============================================================================

/// Background task owning one calculator field.
///
/// ## Usage
/// ```rust,ignore
/// let (handle, mut output) = Driver::spawn(&KeypadConfig::default());
///
/// handle.send_key(InputEvent::Digit(4)).await?;
/// assert_eq!(output.text_rx.recv().await.as_deref(), Some("$4"));
///
/// handle.shutdown().await?;
/// ```
pub struct Driver {
    transformer: Transformer,
    key_rx: mpsc::Receiver<InputEvent>,
    push_rx: mpsc::Receiver<Option<Decimal>>,
    shutdown_rx: mpsc::Receiver<()>,
    text_tx: mpsc::Sender<String>,
}

impl Driver {
    /// Creates a driver for `config` and spawns its task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: &KeypadConfig) -> (DriverHandle, DriverOutput) {
        let (key_tx, key_rx) = mpsc::channel::<InputEvent>(CHANNEL_CAPACITY);
        let (push_tx, push_rx) = mpsc::channel::<Option<Decimal>>(CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

        let (text_tx, text_rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);
        let (value_tx, value_rx) = mpsc::channel::<Option<Decimal>>(CHANNEL_CAPACITY);
        let (result_tx, result_rx) = mpsc::channel::<InputResult>(CHANNEL_CAPACITY);

        let binding = Arc::new(ChannelBinding {
            value_tx,
            result_tx,
        });

        let driver = Driver {
            transformer: Transformer::with_binding(config, binding),
            key_rx,
            push_rx,
            shutdown_rx,
            text_tx,
        };

        tokio::spawn(driver.run());

        let handle = DriverHandle {
            key_tx,
            push_tx,
            shutdown_tx,
        };
        let output = DriverOutput {
            text_rx,
            value_rx,
            result_rx,
        };

        (handle, output)
    }

    /// Main loop.
    async fn run(mut self) {
        info!("Calculator field driver starting");

        loop {
            tokio::select! {
                Some(event) = self.key_rx.recv() => {
                    let output = self.transformer.handle_key(event);
                    // A dropped receiver only means nobody is listening
                    let _ = self.text_tx.send(output.text).await;
                }

                Some(value) = self.push_rx.recv() => {
                    if let Some(text) = self.transformer.handle_value(value) {
                        let _ = self.text_tx.send(text).await;
                    }
                }

                // Also fires when every handle has been dropped
                _ = self.shutdown_rx.recv() => {
                    debug!("Driver received shutdown");
                    break;
                }
            }
        }

        info!(expression = ?self.transformer.expression(), "Calculator field driver stopped");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
