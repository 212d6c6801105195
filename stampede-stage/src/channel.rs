//! Bounded event channel between producers and workers

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Fixed capacity of the event channel of every run
pub const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// One unit of work: each event triggers exactly one sampling query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadEvent {
    pub producer: usize,
    pub sequence: u64,
}

/// Bounded FIFO shared by all producers and workers of a run
///
/// Producers block on a full channel; nothing is ever dropped. Workers share
/// the single receiver, so each event reaches exactly one worker.
pub struct EventChannel {
    sender: mpsc::Sender<LoadEvent>,
    receiver: EventReceiver,
}

/// Cloneable handle to the shared receiving side
#[derive(Clone)]
pub struct EventReceiver {
    inner: Arc<Mutex<mpsc::Receiver<LoadEvent>>>,
}

impl EventChannel {
    /// Channel holding up to `capacity` events, never fewer than one
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self {
            sender,
            receiver: EventReceiver {
                inner: Arc::new(Mutex::new(receiver)),
            },
        }
    }

    pub fn sender(&self) -> mpsc::Sender<LoadEvent> {
        self.sender.clone()
    }

    pub fn receiver(&self) -> EventReceiver {
        self.receiver.clone()
    }

    pub fn capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    /// Events sent but not yet received
    pub fn occupancy(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy() == 0
    }

    /// Refuse further sends; events already queued can still be received
    ///
    /// Takes the receiver lock, so it waits while a worker is parked in
    /// [`EventReceiver::recv`].
    pub async fn close(&self) {
        self.receiver.inner.lock().await.close();
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new(EVENT_CHANNEL_CAPACITY)
    }
}

impl EventReceiver {
    /// Next event, or `None` once the channel is closed and empty
    ///
    /// Cancel-safe: dropping the future before it completes loses no event.
    pub async fn recv(&self) -> Option<LoadEvent> {
        self.inner.lock().await.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn event(sequence: u64) -> LoadEvent {
        LoadEvent { producer: 0, sequence }
    }

    #[tokio::test]
    async fn occupancy_tracks_queued_events() {
        let channel = EventChannel::new(4);
        let sender = channel.sender();
        let receiver = channel.receiver();

        sender.send(event(1)).await.unwrap();
        sender.send(event(2)).await.unwrap();
        assert_eq!(channel.occupancy(), 2);

        assert_eq!(receiver.recv().await, Some(event(1)));
        assert_eq!(channel.occupancy(), 1);
        assert_eq!(receiver.recv().await, Some(event(2)));
        assert!(channel.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn full_channel_blocks_instead_of_dropping() {
        let channel = EventChannel::new(3);
        let sender = channel.sender();
        for sequence in 0..3 {
            sender.send(event(sequence)).await.unwrap();
        }
        assert_eq!(channel.occupancy(), channel.capacity());

        let blocked = tokio::time::timeout(Duration::from_secs(60), sender.send(event(3))).await;
        assert!(blocked.is_err());
        assert_eq!(channel.occupancy(), 3);

        let receiver = channel.receiver();
        assert_eq!(receiver.recv().await, Some(event(0)));
        sender.send(event(3)).await.unwrap();
        for sequence in 1..4 {
            assert_eq!(receiver.recv().await, Some(event(sequence)));
        }
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let channel = EventChannel::new(0);
        assert_eq!(channel.capacity(), 1);
        assert!(channel.is_empty());
    }

    #[tokio::test]
    async fn closed_channel_drains_then_ends() {
        let channel = EventChannel::new(2);
        let sender = channel.sender();
        sender.send(event(7)).await.unwrap();

        channel.close().await;
        assert!(sender.send(event(8)).await.is_err());

        let receiver = channel.receiver();
        assert_eq!(receiver.recv().await, Some(event(7)));
        assert_eq!(receiver.recv().await, None);
    }
}
