/*!
 * Event Streaming
 * Ordered event distribution from the office threads to one subscriber
 *
 * Design: multiple producers (TA, students), single consumer. Events are
 * published while the room lock is held wherever order matters, so the
 * channel order is the protocol order.
 */

use crate::monitoring::events::OfficeEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Event statistics for monitoring the observer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub events_published: u64,
    pub events_undelivered: u64,
}

/// Publishing handle shared by every office thread
#[derive(Clone)]
pub struct EventStream {
    sender: Option<flume::Sender<OfficeEvent>>,
    published: Arc<AtomicU64>,
    undelivered: Arc<AtomicU64>,
}

impl EventStream {
    /// Stream that only logs; nothing is retained
    pub fn discard() -> Self {
        Self {
            sender: None,
            published: Arc::new(AtomicU64::new(0)),
            undelivered: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Stream with an attached subscriber receiving every event in order
    pub fn channel() -> (Self, EventSubscriber) {
        let (sender, receiver) = flume::unbounded();
        let stream = Self {
            sender: Some(sender),
            published: Arc::new(AtomicU64::new(0)),
            undelivered: Arc::new(AtomicU64::new(0)),
        };
        (stream, EventSubscriber { receiver })
    }

    /// Log and forward an event. Never blocks.
    #[inline]
    pub fn publish(&self, event: OfficeEvent) {
        event.log();
        self.forward(event);
    }

    /// Forward an event to the subscriber without logging it
    ///
    /// For callers holding a lock: forward inside it to fix the order, then
    /// call `OfficeEvent::log` once the lock is released.
    #[inline]
    pub fn forward(&self, event: OfficeEvent) {
        self.published.fetch_add(1, Ordering::Relaxed);

        if let Some(sender) = &self.sender {
            if sender.send(event).is_err() {
                // Subscriber went away; the run itself is unaffected
                self.undelivered.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn stats(&self) -> StreamStats {
        StreamStats {
            events_published: self.published.load(Ordering::Relaxed),
            events_undelivered: self.undelivered.load(Ordering::Relaxed),
        }
    }
}

impl Default for EventStream {
    fn default() -> Self {
        Self::discard()
    }
}

impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("subscribed", &self.sender.is_some())
            .field("stats", &self.stats())
            .finish()
    }
}

/// Consumer handle for an event stream
pub struct EventSubscriber {
    receiver: flume::Receiver<OfficeEvent>,
}

impl EventSubscriber {
    /// Block for the next event; `None` once every publisher is gone
    pub fn next(&self) -> Option<OfficeEvent> {
        self.receiver.recv().ok()
    }

    /// Next event if one is already queued
    pub fn try_next(&self) -> Option<OfficeEvent> {
        self.receiver.try_recv().ok()
    }

    /// Everything queued right now
    pub fn drain(&self) -> Vec<OfficeEvent> {
        self.receiver.try_iter().collect()
    }
}
