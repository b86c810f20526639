//! Session analytics: the timestamped event log and its live stream.

mod clock;
mod log;
mod stream;

pub use clock::{Clock, ManualClock, SystemClock};
pub use log::{AnalyticsEvent, EventLog};
pub use stream::AnalyticsStream;
