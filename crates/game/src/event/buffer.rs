use std::collections::VecDeque;
use std::sync::Mutex;

use super::types::GameEvent;

/// Thread-safe FIFO of deferred game events. Network callback threads
/// enqueue; the logical update thread drains the whole queue once per frame.
pub struct EventBuffer {
    events: Mutex<VecDeque<GameEvent>>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
        }
    }

    /// Append an event to the tail. Safe to call from any thread.
    pub fn enqueue(&self, event: GameEvent) {
        self.events.lock().unwrap().push_back(event);
    }

    /// Detach the entire queue contents as a snapshot, leaving the buffer
    /// empty. Events enqueued after the lock is taken are not part of the
    /// returned batch. An empty buffer yields an empty vec.
    pub fn pop_all(&self) -> Vec<GameEvent> {
        let mut events = self.events.lock().unwrap();
        events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl Default for EventBuffer {
    fn default() -> Self {
        Self::new()
    }
}
