use crate::app::UiEvent;
use crate::render::ButtonKey;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedSender, WeakUnboundedSender};
use tokio::task::JoinHandle;
use tracing::trace;

/// How long a copy button shows its "Copied" label.
pub const CONFIRMATION_DELAY: Duration = Duration::from_millis(1100);

struct PendingRevert {
    generation: u64,
    handle: JoinHandle<()>,
}

/// One cancellable "revert label" action per copy button.
///
/// Timer tasks do not touch the surface. They post [`UiEvent::RevertLabel`]
/// back to the event loop, tagged with the generation they were scheduled
/// under, and only the latest generation for a button is honored.
///
/// Only a weak handle to the loop's channel is kept, so the loop can still
/// wind down once every input source has gone away.
pub struct ConfirmationTimers {
    delay: Duration,
    events: WeakUnboundedSender<UiEvent>,
    pending: HashMap<ButtonKey, PendingRevert>,
    next_generation: u64,
}

impl ConfirmationTimers {
    pub fn new(events: &UnboundedSender<UiEvent>) -> Self {
        Self::with_delay(events, CONFIRMATION_DELAY)
    }

    pub fn with_delay(events: &UnboundedSender<UiEvent>, delay: Duration) -> Self {
        Self {
            delay,
            events: events.downgrade(),
            pending: HashMap::new(),
            next_generation: 1,
        }
    }

    /// Schedules a revert for `button`, replacing any pending one. Returns
    /// `None` when the event loop is gone and no revert can be delivered.
    pub fn schedule(&mut self, button: ButtonKey) -> Option<u64> {
        let generation = self.next_generation;
        self.next_generation += 1;

        if let Some(previous) = self.pending.remove(&button) {
            trace!(card = %button.card_id, "Superseding pending label revert");
            previous.handle.abort();
        }

        let Some(events) = self.events.upgrade() else {
            trace!("Event loop closed; not scheduling label revert");
            return None;
        };
        let delay = self.delay;
        let key = button.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The loop may already be gone during shutdown.
            let _ = events.send(UiEvent::RevertLabel {
                button: key,
                generation,
            });
        });

        self.pending.insert(button, PendingRevert { generation, handle });
        Some(generation)
    }

    /// Consumes the pending revert if `generation` is still the latest one.
    pub fn take_if_current(&mut self, button: &ButtonKey, generation: u64) -> bool {
        match self.pending.get(button) {
            Some(pending) if pending.generation == generation => {
                self.pending.remove(button);
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self, button: &ButtonKey) -> bool {
        self.pending.contains_key(button)
    }

    /// Aborts every pending revert. Used when the cards they belong to are
    /// replaced.
    pub fn cancel_all(&mut self) {
        for (_, pending) in self.pending.drain() {
            pending.handle.abort();
        }
    }
}

impl Drop for ConfirmationTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::Instant;

    fn revert_of(event: UiEvent) -> (ButtonKey, u64) {
        match event {
            UiEvent::RevertLabel { button, generation } => (button, generation),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_revert_fires_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = ConfirmationTimers::new(&tx);
        let button = ButtonKey::copy_code("a");

        let started = Instant::now();
        let generation = timers.schedule(button.clone()).unwrap();
        let (fired, fired_generation) = revert_of(rx.recv().await.unwrap());

        assert!(started.elapsed() >= CONFIRMATION_DELAY);
        assert_eq!(fired, button);
        assert_eq!(fired_generation, generation);
        assert!(timers.take_if_current(&button, generation));
        assert!(!timers.is_pending(&button));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_replaces_pending_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = ConfirmationTimers::new(&tx);
        let button = ButtonKey::copy_link("a");

        let started = Instant::now();
        let first = timers.schedule(button.clone()).unwrap();
        tokio::time::advance(Duration::from_millis(600)).await;
        let second = timers.schedule(button.clone()).unwrap();
        assert_ne!(first, second);

        let (_, fired) = revert_of(rx.recv().await.unwrap());
        assert_eq!(fired, second);
        assert!(started.elapsed() >= Duration::from_millis(1700));
        assert!(!timers.take_if_current(&button, first));
        assert!(timers.take_if_current(&button, second));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_buttons_are_independent() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = ConfirmationTimers::new(&tx);
        let code = ButtonKey::copy_code("a");
        let link = ButtonKey::copy_link("a");

        timers.schedule(code.clone());
        timers.schedule(link.clone());
        assert!(timers.is_pending(&code));
        assert!(timers.is_pending(&link));

        let mut fired = vec![revert_of(rx.recv().await.unwrap()).0, revert_of(rx.recv().await.unwrap()).0];
        fired.sort_by_key(|b| b.affordance);
        assert_eq!(fired, vec![code, link]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_aborts_pending() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = ConfirmationTimers::new(&tx);
        let button = ButtonKey::copy_code("a");
        timers.schedule(button.clone());
        timers.cancel_all();
        assert!(!timers.is_pending(&button));

        tokio::time::sleep(CONFIRMATION_DELAY * 2).await;
        drop(timers);
        drop(tx);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_schedule_after_loop_closed() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut timers = ConfirmationTimers::new(&tx);
        drop(tx);

        let button = ButtonKey::copy_code("a");
        assert_eq!(timers.schedule(button.clone()), None);
        assert!(!timers.is_pending(&button));
    }
}
