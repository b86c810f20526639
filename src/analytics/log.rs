//! Append-only event log.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::clock::Clock;
use super::stream::AnalyticsStream;

/// One timestamped stage transition.
///
/// Immutable once appended to an [`EventLog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// Where in the run it happened ("Intro", a step id, "Final").
    pub stage: String,
    /// What happened.
    pub label: String,
    /// Seconds since the previous event (or since the log was opened).
    pub elapsed_seconds: f64,
}

/// Ordered, append-only record of a session's stage transitions.
///
/// The log never writes to storage; `export` hands the sequence to whatever
/// sink the host uses. An optional live stream receives a copy of each event.
#[derive(Debug)]
pub struct EventLog {
    clock: Arc<dyn Clock>,
    events: Vec<AnalyticsEvent>,
    last_marker: DateTime<Utc>,
    stream_tx: Option<Sender<AnalyticsEvent>>,
    dropped: u64,
}

impl EventLog {
    /// Opens an empty log; the first event's elapsed time counts from now.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let last_marker = clock.now();
        Self {
            clock,
            events: Vec::new(),
            last_marker,
            stream_tx: None,
            dropped: 0,
        }
    }

    /// Appends an event and resets the elapsed-time marker.
    pub fn record(&mut self, stage: impl Into<String>, label: impl Into<String>) -> &AnalyticsEvent {
        let now = self.clock.now();
        let elapsed_seconds = (now - self.last_marker)
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        self.last_marker = now;

        let event = AnalyticsEvent {
            timestamp: now,
            stage: stage.into(),
            label: label.into(),
            elapsed_seconds,
        };
        self.publish(&event);
        self.events.push(event);
        &self.events[self.events.len() - 1]
    }

    fn publish(&mut self, event: &AnalyticsEvent) {
        let Some(tx) = &self.stream_tx else {
            return;
        };
        match tx.try_send(event.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                warn!(
                    target: "tradeoff::analytics",
                    dropped = self.dropped,
                    stage = %event.stage,
                    "analytics stream full; event kept in log only"
                );
            }
            Err(TrySendError::Disconnected(_)) => {
                self.stream_tx = None;
            }
        }
    }

    /// Opens a live stream of subsequently recorded events.
    ///
    /// Replaces any previous stream. Publishing never blocks: when the stream
    /// buffer is full the event is skipped for the stream and kept in the log.
    pub fn subscribe(&mut self, capacity: usize) -> AnalyticsStream {
        let (tx, rx) = bounded(capacity.max(1));
        self.stream_tx = Some(tx);
        AnalyticsStream::new(rx)
    }

    /// Events skipped by the live stream because its buffer was full.
    #[must_use]
    pub const fn dropped_from_stream(&self) -> u64 {
        self.dropped
    }

    /// The full ordered sequence.
    #[must_use]
    pub fn export(&self) -> Vec<AnalyticsEvent> {
        self.events.clone()
    }

    /// Borrowed view of the recorded events.
    #[must_use]
    pub fn events(&self) -> &[AnalyticsEvent] {
        &self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::clock::ManualClock;
    use chrono::Duration;

    #[test]
    fn elapsed_is_measured_from_previous_event() {
        let t0 = Utc::now();
        let clock = Arc::new(ManualClock::new(t0));
        let mut log = EventLog::new(clock.clone());

        clock.advance(Duration::seconds(3));
        log.record("Intro", "started");
        clock.advance(Duration::milliseconds(1500));
        log.record("d1", "chose optA");

        let events = log.export();
        assert_eq!(events.len(), 2);
        assert!((events[0].elapsed_seconds - 3.0).abs() < 1e-9);
        assert!((events[1].elapsed_seconds - 1.5).abs() < 1e-9);
        assert_eq!(events[1].timestamp, t0 + Duration::milliseconds(4500));
    }

    #[test]
    fn clock_going_backwards_yields_zero_elapsed() {
        let t0 = Utc::now();
        let clock = Arc::new(ManualClock::new(t0));
        let mut log = EventLog::new(clock.clone());
        clock.set(t0 - Duration::seconds(10));
        let event = log.record("Intro", "started");
        assert_eq!(event.elapsed_seconds, 0.0);
    }

    #[test]
    fn full_stream_drops_from_stream_only() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let mut log = EventLog::new(clock);
        let stream = log.subscribe(1);

        log.record("a", "1");
        log.record("b", "2");

        assert_eq!(log.len(), 2);
        assert_eq!(log.dropped_from_stream(), 1);
        let received = stream.drain();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].stage, "a");
    }

    #[test]
    fn dropped_stream_detaches_quietly() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let mut log = EventLog::new(clock);
        drop(log.subscribe(4));
        log.record("a", "1");
        log.record("b", "2");
        assert_eq!(log.len(), 2);
        assert_eq!(log.dropped_from_stream(), 0);
    }
}
