//! Deadline queue for "wait N ms, then do A" steps.
//!
//! Everything in the greeting runs inside one `requestAnimationFrame` callback,
//! so a delayed step is just an action tagged with the timestamp at which it
//! becomes due. Owners poll the queue with the current frame time. Dropping or
//! clearing the queue cancels whatever is still pending, which is how a game
//! that leaves the stage stops all of its continuations.

/// Ordered set of pending actions keyed by due time (ms, `performance.now()` clock).
#[derive(Debug, Clone)]
pub struct Timers<A> {
    pending: Vec<Pending<A>>,
    next_seq: u64,
}

#[derive(Debug, Clone)]
struct Pending<A> {
    due_ms: f64,
    seq: u64, // insertion order breaks ties between equal deadlines
    action: A,
}

impl<A> Default for Timers<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Timers<A> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }

    /// Queue `action` to fire on the first poll at or after `due_ms`.
    pub fn schedule(&mut self, due_ms: f64, action: A) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            due_ms,
            seq,
            action,
        });
    }

    /// Queue `action` to fire `delay_ms` after `now_ms`.
    pub fn after(&mut self, now_ms: f64, delay_ms: f64, action: A) {
        self.schedule(now_ms + delay_ms.max(0.0), action);
    }

    /// Remove the next due action, earliest deadline first.
    ///
    /// Polling one action at a time lets the caller react to it (and possibly
    /// clear or extend the queue) before the following one is considered.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<A> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= now_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;
        Some(self.pending.swap_remove(idx).action)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Earliest pending deadline, if any.
    pub fn next_due(&self) -> Option<f64> {
        self.pending.iter().map(|p| p.due_ms).min_by(f64::total_cmp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_order() {
        let mut t = Timers::new();
        t.schedule(300.0, "c");
        t.schedule(100.0, "a");
        t.schedule(200.0, "b");
        assert_eq!(t.pop_due(50.0), None);
        assert_eq!(t.pop_due(250.0), Some("a"));
        assert_eq!(t.pop_due(250.0), Some("b"));
        assert_eq!(t.pop_due(250.0), None);
        assert_eq!(t.pop_due(300.0), Some("c"));
        assert!(t.is_empty());
    }

    #[test]
    fn equal_deadlines_keep_insertion_order() {
        let mut t = Timers::new();
        t.after(0.0, 10.0, 1);
        t.after(0.0, 10.0, 2);
        t.after(0.0, 10.0, 3);
        let fired: Vec<i32> = std::iter::from_fn(|| t.pop_due(10.0)).collect();
        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn clear_cancels_pending() {
        let mut t = Timers::new();
        t.after(0.0, 500.0, ());
        assert_eq!(t.next_due(), Some(500.0));
        t.clear();
        assert_eq!(t.pop_due(10_000.0), None);
        assert_eq!(t.next_due(), None);
    }
}
