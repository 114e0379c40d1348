use evolution_types::{Clock, SystemClock};
use tokio::time::Instant;

/// Millisecond clock driven by tokio's timer.
///
/// Reads wall-clock time once at construction and advances with
/// [`tokio::time::Instant`] afterwards, so it follows `tokio::time::pause`
/// and `advance` in tests.
#[derive(Clone, Copy, Debug)]
pub struct TokioClock {
    origin: Instant,
    origin_ms: u64,
}

impl TokioClock {
    pub fn new() -> Self {
        Self::starting_at(SystemClock.now_ms())
    }

    pub fn starting_at(origin_ms: u64) -> Self {
        Self {
            origin: Instant::now(),
            origin_ms,
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> u64 {
        self.origin_ms + self.origin.elapsed().as_millis() as u64
    }
}
