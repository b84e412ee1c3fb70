//! Ordered hand-off of locally authored messages.
//!
//! The queue is the only thing shared between the input-producing task and
//! the session's writer: a bounded `mpsc` channel wrapped so the two ends
//! have the exact surface the session needs. Enqueue waits for capacity
//! rather than dropping; dequeue yields messages strictly in enqueue order.

use pairchat_core::Message;
use thiserror::Error;
use tokio::sync::mpsc;

/// Default capacity used by the client.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Enqueue failed because the consumer end is gone (session closed).
///
/// Carries the message back so the caller can report it.
#[derive(Debug, Error)]
#[error("outbound queue is closed")]
pub struct QueueClosed(pub Message);

/// Producer end, owned by the input source.
#[derive(Clone)]
pub struct OutboundProducer {
    tx: mpsc::Sender<Message>,
}

impl OutboundProducer {
    /// Append a message, waiting for capacity if the queue is full.
    ///
    /// Never drops silently; the only failure is a closed queue.
    pub async fn enqueue(&self, message: Message) -> Result<(), QueueClosed> {
        self.tx
            .send(message)
            .await
            .map_err(|mpsc::error::SendError(m)| QueueClosed(m))
    }

    /// Signal that no further messages will be enqueued.
    ///
    /// Consuming the producer drops the channel's send half, which wakes a
    /// blocked [`OutboundQueue::dequeue`] with `None` once drained.
    pub fn close(self) {}
}

/// Consumer end, owned by the session's writer.
pub struct OutboundQueue {
    rx: mpsc::Receiver<Message>,
}

impl OutboundQueue {
    /// Create a queue with the given capacity, returning both ends.
    #[must_use]
    pub fn bounded(capacity: usize) -> (OutboundProducer, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (OutboundProducer { tx }, Self { rx })
    }

    /// Wait for the next message; `None` once the queue is closed and drained.
    pub async fn dequeue(&mut self) -> Option<Message> {
        self.rx.recv().await
    }

    /// Take every message still buffered, without waiting.
    ///
    /// Used at session close to report queued-but-unsent messages.
    pub fn drain(&mut self) -> Vec<Message> {
        let mut remaining = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            remaining.push(message);
        }
        remaining
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pairchat_core::{DeviceId, Tag};

    fn msg(text: &str) -> Message {
        Message::new(Tag::new(1_600_000_000, DeviceId::new(2)).unwrap(), text)
    }

    #[tokio::test]
    async fn fifo_order_preserved() {
        let (producer, mut queue) = OutboundQueue::bounded(8);
        for text in ["A", "B", "C"] {
            producer.enqueue(msg(text)).await.unwrap();
        }
        assert_eq!(queue.dequeue().await.unwrap().text, "A");
        assert_eq!(queue.dequeue().await.unwrap().text, "B");
        assert_eq!(queue.dequeue().await.unwrap().text, "C");
    }

    #[tokio::test]
    async fn close_wakes_blocked_dequeue() {
        let (producer, mut queue) = OutboundQueue::bounded(8);
        let waiter = tokio::spawn(async move { queue.dequeue().await });
        producer.close();
        assert!(waiter.await.unwrap().is_none());
    }

    #[tokio::test]
    async fn dequeue_drains_before_reporting_closed() {
        let (producer, mut queue) = OutboundQueue::bounded(8);
        producer.enqueue(msg("last")).await.unwrap();
        producer.close();
        assert_eq!(queue.dequeue().await.unwrap().text, "last");
        assert!(queue.dequeue().await.is_none());
    }

    #[tokio::test]
    async fn enqueue_after_consumer_dropped_returns_message() {
        let (producer, queue) = OutboundQueue::bounded(8);
        drop(queue);
        let err = producer.enqueue(msg("lost")).await.unwrap_err();
        assert_eq!(err.0.text, "lost");
    }

    #[tokio::test]
    async fn enqueue_waits_for_capacity() {
        let (producer, mut queue) = OutboundQueue::bounded(1);
        producer.enqueue(msg("first")).await.unwrap();

        let p2 = producer.clone();
        let blocked = tokio::spawn(async move { p2.enqueue(msg("second")).await });

        // Make room; the blocked enqueue must complete rather than drop.
        assert_eq!(queue.dequeue().await.unwrap().text, "first");
        blocked.await.unwrap().unwrap();
        assert_eq!(queue.dequeue().await.unwrap().text, "second");
    }

    #[tokio::test]
    async fn drain_returns_buffered_messages() {
        let (producer, mut queue) = OutboundQueue::bounded(8);
        producer.enqueue(msg("one")).await.unwrap();
        producer.enqueue(msg("two")).await.unwrap();

        let remaining = queue.drain();
        assert_eq!(remaining.len(), 2);
        assert_eq!(remaining[0].text, "one");
        assert_eq!(remaining[1].text, "two");
        assert!(queue.drain().is_empty());
    }
}
