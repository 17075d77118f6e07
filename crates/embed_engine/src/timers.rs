use std::collections::HashMap;
use std::time::Duration;

use embed_core::{Msg, TimerKey};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};

struct Pending {
    handle: AbortHandle,
    repeating: bool,
}

/// Runs timers as tokio tasks that post `Msg::TimerFired` back to the
/// orchestrator's queue. Must be used inside a tokio runtime.
pub struct TimerService {
    tx: UnboundedSender<Msg>,
    pending: HashMap<TimerKey, Pending>,
}

impl TimerService {
    pub fn new(tx: UnboundedSender<Msg>) -> Self {
        Self {
            tx,
            pending: HashMap::new(),
        }
    }

    pub fn schedule_once(&mut self, key: TimerKey, after: Duration) {
        self.cancel(key);
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = tx.send(Msg::TimerFired(key));
        });
        self.pending.insert(
            key,
            Pending {
                handle: task.abort_handle(),
                repeating: false,
            },
        );
    }

    /// First tick arrives one full period after scheduling.
    pub fn schedule_every(&mut self, key: TimerKey, every: Duration) {
        self.cancel(key);
        // tokio rejects a zero period.
        let every = every.max(Duration::from_millis(1));
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(Msg::TimerFired(key)).is_err() {
                    break;
                }
            }
        });
        self.pending.insert(
            key,
            Pending {
                handle: task.abort_handle(),
                repeating: true,
            },
        );
    }

    /// Returns false when the key was not pending (already delivered or
    /// never scheduled).
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        match self.pending.remove(&key) {
            Some(pending) => {
                pending.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Forgets a one-shot timer whose message reached the queue.
    pub fn delivered(&mut self, key: TimerKey) {
        if self
            .pending
            .get(&key)
            .is_some_and(|pending| !pending.repeating)
        {
            self.pending.remove(&key);
        }
    }

    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.pending.contains_key(&key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Drop for TimerService {
    fn drop(&mut self) {
        for pending in self.pending.values() {
            pending.handle.abort();
        }
    }
}
