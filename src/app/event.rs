//! Terminal event abstraction.
//!
//! Wraps crossterm events into a smaller enum and runs a background task that
//! forwards them over a channel so the main loop can also wait on page loads.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Bracketed paste (only delivered to the URL bar).
    Paste(String),
    Resize,
    Tick,
}

/// Spawn the terminal reader.  A `Tick` is sent whenever `tick_rate`
/// passes without input.
pub fn spawn_event_reader(tick_rate: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    // crossterm's poll/read block, so keep them off the runtime's workers.
    tokio::task::spawn_blocking(move || loop {
        let app_event = match event::poll(tick_rate) {
            Ok(true) => match event::read() {
                Ok(CtEvent::Key(k)) => AppEvent::Key(k),
                Ok(CtEvent::Mouse(m)) => AppEvent::Mouse(m),
                Ok(CtEvent::Paste(text)) => AppEvent::Paste(text),
                Ok(CtEvent::Resize(..)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    tracing::warn!("terminal read failed: {err}");
                    continue;
                }
            },
            Ok(false) => AppEvent::Tick,
            Err(err) => {
                tracing::warn!("terminal poll failed: {err}");
                break;
            }
        };
        if tx.send(app_event).is_err() {
            break; // receiver dropped
        }
    });

    rx
}
