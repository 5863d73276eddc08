use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::event::{EventBuffer, GameEvent};

use super::SessionSink;

/// The sink registered with the transport for a game session. Notifications
/// arriving before gameplay has loaded are refused; once `set_ready(true)`
/// every delivered event lands in the shared [`EventBuffer`].
pub struct EventRelay {
    ready: AtomicBool,
    buffer: Arc<EventBuffer>,
}

impl EventRelay {
    pub fn new(buffer: Arc<EventBuffer>) -> Self {
        Self {
            ready: AtomicBool::new(false),
            buffer,
        }
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

impl SessionSink for EventRelay {
    fn deliver(&self, event: GameEvent) {
        if !self.is_ready() {
            log::debug!("refusing event before gameplay is ready: {:?}", event);
            return;
        }
        self.buffer.enqueue(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_gates_on_ready() {
        let buffer = Arc::new(EventBuffer::new());
        let relay = EventRelay::new(Arc::clone(&buffer));

        relay.deliver(GameEvent::RotateMap);
        assert!(buffer.is_empty());

        relay.set_ready(true);
        relay.deliver(GameEvent::RotateMap);
        assert_eq!(buffer.len(), 1);

        relay.set_ready(false);
        relay.deliver(GameEvent::RotateMap);
        assert_eq!(buffer.len(), 1);
    }
}
