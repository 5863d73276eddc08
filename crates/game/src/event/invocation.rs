use std::collections::VecDeque;
use std::sync::Mutex;

/// A deferred callback: the target and its parameter, captured together.
pub type Invocation = Box<dyn FnOnce() + Send>;

/// Thread-safe queue of deferred callback invocations, drained one entry at
/// a time on the logical thread. Unlike [`super::EventBuffer`], the drain
/// loop re-checks `count()` on every iteration, so entries enqueued by an
/// invocation that is currently running are processed in the same frame.
/// That drain-to-empty behavior is intentional and relied upon by callers.
pub struct InvocationBuffer {
    queue: Mutex<VecDeque<Invocation>>,
}

impl InvocationBuffer {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Append an invocation. Safe to call from any thread.
    pub fn enqueue<F>(&self, target: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.queue.lock().unwrap().push_back(Box::new(target));
    }

    pub fn count(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// Dequeue and run exactly one pending invocation; no-op when empty.
    /// The entry runs outside the lock so it may enqueue further work
    /// without deadlocking.
    pub fn invoke_next(&self) {
        let next = self.queue.lock().unwrap().pop_front();
        if let Some(invocation) = next {
            invocation();
        }
    }

    /// Run pending invocations until the queue is empty, including entries
    /// enqueued mid-drain.
    pub fn drain(&self) {
        while self.count() > 0 {
            self.invoke_next();
        }
    }

    pub fn clear(&self) {
        self.queue.lock().unwrap().clear();
    }
}

impl Default for InvocationBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn drain_invokes_each_exactly_once() {
        let buffer = InvocationBuffer::new();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..8 {
            let counter = Arc::clone(&counter);
            buffer.enqueue(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        buffer.drain();

        assert_eq!(counter.load(Ordering::SeqCst), 8);
        assert_eq!(buffer.count(), 0);
    }

    #[test]
    fn invoke_next_on_empty_is_a_noop() {
        let buffer = InvocationBuffer::new();
        buffer.invoke_next();
        assert_eq!(buffer.count(), 0);
    }

    #[test]
    fn entries_enqueued_mid_drain_run_in_the_same_drain() {
        let buffer = Arc::new(InvocationBuffer::new());
        let order = Arc::new(Mutex::new(Vec::new()));

        {
            let buffer_inner = Arc::clone(&buffer);
            let order_outer = Arc::clone(&order);
            let order_inner = Arc::clone(&order);
            buffer.enqueue(move || {
                order_outer.lock().unwrap().push("first");
                buffer_inner.enqueue(move || {
                    order_inner.lock().unwrap().push("reentrant");
                });
            });
        }
        {
            let order = Arc::clone(&order);
            buffer.enqueue(move || {
                order.lock().unwrap().push("second");
            });
        }

        buffer.drain();

        assert_eq!(
            *order.lock().unwrap(),
            vec!["first", "second", "reentrant"]
        );
    }
}
