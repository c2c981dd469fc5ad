//! Optimistic-update-then-reconcile control state.
//!
//! Brightness, display power, and the bandwidth source all follow the
//! same shape: a local value applied immediately on user action, a
//! periodic poll discovering the authoritative server state (which can
//! diverge because the physical dial/switch also drives it), and a
//! write that is never rolled back on failure — the next poll restores
//! consistency either way.

use tokio::sync::watch;

/// Shared state for one optimistically updated control.
///
/// `None` until the first successful poll. Local applies and remote
/// reconciles both go through the same `watch` channel, so every
/// consumer always reads the most recently applied value
/// (last-applied-wins, no sequencing token).
#[derive(Debug)]
pub struct OptimisticControl<T> {
    state: watch::Sender<Option<T>>,
}

impl<T: Clone + PartialEq + Send + Sync + 'static> OptimisticControl<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self { state }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.state.subscribe()
    }

    /// The most recently applied value, local or remote.
    pub fn current(&self) -> Option<T> {
        self.state.borrow().clone()
    }

    /// Apply a user-intended change before server confirmation.
    pub fn apply_local(&self, value: T) {
        self.state.send_modify(|s| *s = Some(value));
    }

    /// Apply server-confirmed state from a poll. Overwrites any
    /// optimistic value unconditionally — the server is authoritative,
    /// and a physical override must win over a stale local intent.
    pub fn apply_remote(&self, value: T) {
        // send_if_modified keeps subscribers quiet when nothing changed,
        // which matters at a 2 s poll cadence.
        self.state.send_if_modified(|s| {
            if s.as_ref() == Some(&value) {
                false
            } else {
                *s = Some(value);
                true
            }
        });
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Default for OptimisticControl<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unknown() {
        let control: OptimisticControl<u8> = OptimisticControl::new();
        assert_eq!(control.current(), None);
    }

    #[test]
    fn local_apply_is_visible_immediately() {
        let control = OptimisticControl::new();
        control.apply_local(7u8);
        assert_eq!(control.current(), Some(7));
    }

    #[test]
    fn remote_overwrites_optimistic_value() {
        let control = OptimisticControl::new();
        control.apply_local(7u8);
        // Physical dial moved server-side — poll result wins.
        control.apply_remote(12);
        assert_eq!(control.current(), Some(12));
    }

    #[tokio::test]
    async fn unchanged_remote_state_does_not_notify() {
        let control = OptimisticControl::new();
        let mut rx = control.subscribe();

        control.apply_remote(3u8);
        assert!(rx.has_changed().expect("channel open"));
        rx.borrow_and_update();

        control.apply_remote(3u8);
        assert!(!rx.has_changed().expect("channel open"));
    }
}
