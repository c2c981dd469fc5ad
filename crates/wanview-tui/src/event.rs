//! Event pump — terminal input plus the timing signals the dashboard
//! animations depend on.
//!
//! The pump owns the application's cadences: it ticks at 4 Hz and
//! numbers every tick, so downstream consumers derive the 500 ms lamp
//! blink (every 2nd tick) and the 5 s metric rotation (every 20th tick)
//! from the counter instead of the wall clock. Render frames arrive on
//! their own ~30 FPS interval.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Base animation cadence. Blink and rotation periods are multiples of
/// this, so everything stays phase-locked to one timer.
pub const TICK_INTERVAL: Duration = Duration::from_millis(250);
/// Render cadence (~30 FPS).
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Events produced by the pump.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse action occurred.
    Mouse(MouseEvent),
    /// Terminal was resized to (cols, rows).
    Resize(u16, u16),
    /// Numbered animation tick. The counter starts at 0 and increments
    /// every [`TICK_INTERVAL`].
    Tick(u64),
    /// Render frame.
    Render,
}

/// Map a raw crossterm event to a pump event. Key repeats and releases
/// are dropped so holding a key doesn't machine-gun actions.
fn map_terminal_event(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}

async fn pump(tx: mpsc::UnboundedSender<Event>, cancel: CancellationToken) {
    let mut terminal_events = EventStream::new();
    let mut tick_interval = tokio::time::interval(TICK_INTERVAL);
    let mut render_interval = tokio::time::interval(RENDER_INTERVAL);

    // Don't burst ticks if we fall behind
    tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    render_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut ticks: u64 = 0;

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,

            _ = tick_interval.tick() => {
                let event = Event::Tick(ticks);
                ticks = ticks.wrapping_add(1);
                event
            }

            _ = render_interval.tick() => Event::Render,

            Some(Ok(terminal_event)) = terminal_events.next() => {
                match map_terminal_event(terminal_event) {
                    Some(event) => event,
                    None => continue,
                }
            }
        };

        // If the receiver is dropped, stop.
        if tx.send(event).is_err() {
            break;
        }
    }
}

/// Handle to the background pump task.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// Spawn the pump.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(pump(tx, cancel.clone()));
        Self { rx, cancel }
    }

    /// Receive the next event. Returns `None` once the pump has
    /// stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Signal the pump to stop.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Default for EventReader {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    use super::*;

    #[test]
    fn key_press_maps_through_while_release_is_dropped() {
        let press = CrosstermEvent::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(matches!(map_terminal_event(press), Some(Event::Key(_))));

        let release = CrosstermEvent::Key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert!(map_terminal_event(release).is_none());

        let resize = CrosstermEvent::Resize(80, 24);
        assert!(matches!(
            map_terminal_event(resize),
            Some(Event::Resize(80, 24))
        ));
    }
}
