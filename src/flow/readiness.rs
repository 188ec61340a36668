//! Readiness signal for the catalog store.
//!
//! A `tokio::sync::watch` channel holding the single current state.
//! Subscribers see the current value immediately and every change after
//! that; there is no history and no queue.

use tokio::sync::watch::{self, Receiver, Sender};

/// Bootstrap progress as seen by consumers.
///
/// Transitions only move forward: `Unset → NotReady → Ready`, or
/// `Unset → NotReady → Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Readiness {
    /// Bootstrap has not been requested yet.
    #[default]
    Unset,
    /// Bootstrap is running.
    NotReady,
    /// The seed transaction committed and the store can be queried.
    Ready,
    /// Bootstrap failed; the store will not become available.
    Failed(String),
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// True once no further transition can happen.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed(_))
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Unset => 0,
            Self::NotReady => 1,
            Self::Ready | Self::Failed(_) => 2,
        }
    }
}

/// Publishing side of the readiness signal.
#[derive(Debug)]
pub struct ReadinessSignal {
    sender: Sender<Readiness>,
}

impl ReadinessSignal {
    /// Create a signal starting at `Unset`.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Readiness::Unset);
        Self { sender }
    }

    /// Subscribe to readiness changes.
    ///
    /// The receiver's current value is the state at subscription time.
    pub fn subscribe(&self) -> Receiver<Readiness> {
        self.sender.subscribe()
    }

    /// Current state.
    pub fn current(&self) -> Readiness {
        self.sender.borrow().clone()
    }

    /// Move to `next` if it is a forward transition.
    ///
    /// Returns false (and leaves the state alone) for backward or repeated
    /// transitions.
    pub fn publish(&self, next: Readiness) -> bool {
        self.sender.send_if_modified(|current| {
            if next.rank() <= current.rank() {
                tracing::warn!(?current, ?next, "Ignoring non-forward readiness transition");
                return false;
            }
            tracing::debug!(from = ?current, to = ?next, "Readiness changed");
            *current = next;
            true
        })
    }
}

impl Default for ReadinessSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_sees_current_then_changes() {
        let signal = ReadinessSignal::new();
        signal.publish(Readiness::NotReady);

        let mut rx = signal.subscribe();
        assert_eq!(*rx.borrow_and_update(), Readiness::NotReady);

        signal.publish(Readiness::Ready);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Readiness::Ready);
    }

    #[test]
    fn test_transitions_are_forward_only() {
        let signal = ReadinessSignal::new();
        assert!(signal.publish(Readiness::NotReady));
        assert!(!signal.publish(Readiness::NotReady));
        assert!(signal.publish(Readiness::Ready));
        assert!(!signal.publish(Readiness::NotReady));
        assert!(!signal.publish(Readiness::Failed("late".into())));
        assert_eq!(signal.current(), Readiness::Ready);
    }

    #[test]
    fn test_settled_states() {
        assert!(!Readiness::Unset.is_settled());
        assert!(!Readiness::NotReady.is_settled());
        assert!(Readiness::Ready.is_settled());
        assert!(Readiness::Failed("boom".into()).is_settled());
        assert!(!Readiness::Failed("boom".into()).is_ready());
    }

    #[test]
    fn test_publish_without_subscribers() {
        let signal = ReadinessSignal::new();
        // No receivers - should not panic
        assert!(signal.publish(Readiness::NotReady));
        assert_eq!(signal.current(), Readiness::NotReady);
    }
}
