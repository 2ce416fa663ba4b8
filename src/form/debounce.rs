use std::time::{Duration, Instant};

/// Window for field edits before they reach the owning section.
pub const EDIT_DEBOUNCE: Duration = Duration::from_millis(300);

struct Pending<K, V> {
    key: K,
    value: V,
    due: Instant,
}

/// Per-key debounce queue. A new value for a pending key replaces the old
/// one and restarts its window; keys are independent of each other.
pub struct Debouncer<K, V> {
    window: Duration,
    pending: Vec<Pending<K, V>>,
}

impl<K: PartialEq, V> Debouncer<K, V> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, key: K, value: V, now: Instant) {
        let due = now + self.window;
        match self.pending.iter_mut().find(|p| p.key == key) {
            Some(p) => {
                p.value = value;
                p.due = due;
            }
            None => self.pending.push(Pending { key, value, due }),
        }
    }

    /// Remove and return every entry whose window has elapsed, in the order
    /// their keys were first queued.
    pub fn drain_due(&mut self, now: Instant) -> Vec<(K, V)> {
        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.due <= now);
        self.pending = waiting;
        ready.into_iter().map(|p| (p.key, p.value)).collect()
    }

    pub fn drain_all(&mut self) -> Vec<(K, V)> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(|p| (p.key, p.value))
            .collect()
    }

    /// Drop entries matching `predicate` without delivering them.
    pub fn discard_where(&mut self, predicate: impl Fn(&K) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| !predicate(&p.key));
        before - self.pending.len()
    }

    pub fn cancel(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
