//! Delivery of recorded ticks to external consumers.
//!
//! A run can be given a [`ReadingSink`] that is called once per recorded
//! tick. Delivery is fire-and-forget: a sink must not block, and a failed
//! delivery is logged by the run and never stops it.

// Each subscriber receives its own copy of a tick
#![allow(clippy::disallowed_methods)]

use tokio::sync::broadcast;

use crate::series::RecordedTick;

/// Receives each tick as it is recorded.
pub trait ReadingSink {
    /// Hand a tick to the transport. Must return without waiting on
    /// consumers.
    fn publish(&self, tick: &RecordedTick) -> Result<(), SinkError>;
}

/// Errors a sink can report. None of them are fatal to a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// Nobody is listening; the tick was dropped.
    NoReceivers,
    /// The transport rejected the tick.
    Rejected(String),
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoReceivers => write!(f, "no receivers are subscribed"),
            Self::Rejected(reason) => write!(f, "tick rejected: {reason}"),
        }
    }
}

impl std::error::Error for SinkError {}

/// Publishes ticks on a tokio broadcast channel.
///
/// `send` on a broadcast channel never waits, so the simulation loop is not
/// slowed by consumers. A receiver that falls more than `capacity` ticks
/// behind sees `RecvError::Lagged` and skips ahead.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    sender: broadcast::Sender<RecordedTick>,
}

impl BroadcastSink {
    /// Create a sink and its first receiver.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, broadcast::Receiver<RecordedTick>) {
        let (sender, receiver) = broadcast::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Add another receiver. It only sees ticks published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RecordedTick> {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl ReadingSink for BroadcastSink {
    fn publish(&self, tick: &RecordedTick) -> Result<(), SinkError> {
        self.sender
            .send(tick.clone())
            .map(|_| ())
            .map_err(|_| SinkError::NoReceivers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use crate::time::SimTime;

    fn tick(time: u64) -> RecordedTick {
        RecordedTick {
            time: SimTime::from_millis(time),
            fired: vec!["motion".to_string()],
            snapshot: Snapshot::default(),
        }
    }

    #[test]
    fn test_broadcast_sink_delivers_in_order() {
        let (sink, mut rx) = BroadcastSink::new(16);
        sink.publish(&tick(100)).unwrap();
        sink.publish(&tick(200)).unwrap();

        assert_eq!(rx.try_recv().unwrap().time, SimTime::from_millis(100));
        assert_eq!(rx.try_recv().unwrap().time, SimTime::from_millis(200));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_broadcast_sink_without_receivers_reports_error() {
        let (sink, rx) = BroadcastSink::new(4);
        drop(rx);
        assert_eq!(sink.receiver_count(), 0);
        assert_eq!(sink.publish(&tick(100)), Err(SinkError::NoReceivers));
    }

    #[test]
    fn test_broadcast_sink_lagging_receiver() {
        let (sink, mut rx) = BroadcastSink::new(2);
        for t in 1..=5 {
            sink.publish(&tick(t * 100)).unwrap();
        }
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Lagged(3))
        ));
        assert_eq!(rx.try_recv().unwrap().time, SimTime::from_millis(400));
    }

    #[test]
    fn test_subscribe_sees_later_ticks_only() {
        let (sink, _rx) = BroadcastSink::new(8);
        sink.publish(&tick(100)).unwrap();
        let mut late = sink.subscribe();
        sink.publish(&tick(200)).unwrap();
        assert_eq!(late.try_recv().unwrap().time, SimTime::from_millis(200));
    }
}
