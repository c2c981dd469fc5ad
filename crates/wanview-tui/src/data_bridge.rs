//! Data bridge — connects [`Monitor`] watch channels to TUI actions.
//!
//! Runs as a background task: starts the monitor's sync loops, pushes
//! the current state so screens populate immediately, then forwards
//! every change as an [`Action`] through the TUI's action channel.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use wanview_core::Monitor;

use crate::action::Action;

pub async fn spawn_data_bridge(
    monitor: Monitor,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    monitor.start();

    let mut snapshot = monitor.snapshot();
    let mut last_update = monitor.last_update();
    let mut freshness = monitor.freshness();
    let mut brightness = monitor.brightness();
    let mut power = monitor.display_power();
    let mut source = monitor.bandwidth_source();
    let mut version = monitor.version();

    // Push current state so screens have data immediately (matters on
    // restart while the monitor handle is shared).
    if let Some(snap) = snapshot.borrow_and_update().clone() {
        let _ = action_tx.send(Action::SnapshotUpdated(snap));
    }
    let _ = action_tx.send(Action::LastUpdateChanged(*last_update.borrow_and_update()));
    let _ = action_tx.send(Action::FreshnessChanged(*freshness.borrow_and_update()));
    let _ = action_tx.send(Action::BrightnessChanged(*brightness.borrow_and_update()));
    let _ = action_tx.send(Action::DisplayPowerChanged(*power.borrow_and_update()));
    let _ = action_tx.send(Action::SourceChanged(*source.borrow_and_update()));
    if let Some(v) = version.borrow_and_update().clone() {
        let _ = action_tx.send(Action::VersionLoaded(v));
    }

    // Forward every change until cancelled.
    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = snapshot.changed() => {
                if let Some(snap) = snapshot.borrow_and_update().clone() {
                    let _ = action_tx.send(Action::SnapshotUpdated(snap));
                }
            }
            Ok(()) = last_update.changed() => {
                let _ = action_tx.send(Action::LastUpdateChanged(*last_update.borrow_and_update()));
            }
            Ok(()) = freshness.changed() => {
                let _ = action_tx.send(Action::FreshnessChanged(*freshness.borrow_and_update()));
            }
            Ok(()) = brightness.changed() => {
                let _ = action_tx.send(Action::BrightnessChanged(*brightness.borrow_and_update()));
            }
            Ok(()) = power.changed() => {
                let _ = action_tx.send(Action::DisplayPowerChanged(*power.borrow_and_update()));
            }
            Ok(()) = source.changed() => {
                let _ = action_tx.send(Action::SourceChanged(*source.borrow_and_update()));
            }
            Ok(()) = version.changed() => {
                if let Some(v) = version.borrow_and_update().clone() {
                    let _ = action_tx.send(Action::VersionLoaded(v));
                }
            }
        }
    }

    monitor.stop();
    debug!("data bridge shut down");
}
