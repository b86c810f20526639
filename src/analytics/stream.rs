//! Receiving side of a session's live analytics feed.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};

use super::log::AnalyticsEvent;

/// Live feed of analytics events from one session.
///
/// The stream disconnects when the session (or its log) is dropped or a new
/// stream replaces it.
#[derive(Debug)]
pub struct AnalyticsStream {
    rx: Receiver<AnalyticsEvent>,
}

impl AnalyticsStream {
    pub(crate) const fn new(rx: Receiver<AnalyticsEvent>) -> Self {
        Self { rx }
    }

    /// Receive the next event, blocking. `None` once disconnected and empty.
    pub fn recv(&self) -> Option<AnalyticsEvent> {
        self.rx.recv().ok()
    }

    /// Receive the next event if one is buffered.
    pub fn try_recv(&self) -> Option<AnalyticsEvent> {
        self.rx.try_recv().ok()
    }

    /// Receive the next event, waiting at most `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<AnalyticsEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Take every buffered event without blocking.
    pub fn drain(&self) -> Vec<AnalyticsEvent> {
        self.rx.try_iter().collect()
    }

    /// Number of buffered events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// True when nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
