use std::time::{Duration, Instant};

/// Default display granularity for the live elapsed clock
pub const DEFAULT_TICK_RATE_MS: u64 = 100;

/// Live elapsed-time clock for an attempt in progress.
///
/// The reported value only moves in whole `period` steps and never goes
/// backwards, so it trails wall-clock elapsed by less than one period.
/// Dropping the sampler is what stops it; nothing keeps running once the
/// owning session lets go of it.
#[derive(Debug, Clone)]
pub struct ElapsedSampler {
    started_at: Instant,
    period: Duration,
    sampled: Duration,
}

impl ElapsedSampler {
    pub fn start(started_at: Instant, period: Duration) -> Self {
        Self {
            started_at,
            period: period.max(Duration::from_millis(1)),
            sampled: Duration::ZERO,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Take a sample at `now`. Returns true if the displayed value moved.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.started_at);
        let steps = elapsed.as_nanos() / self.period.as_nanos();
        let quantized = self
            .period
            .checked_mul(u32::try_from(steps).unwrap_or(u32::MAX))
            .unwrap_or(elapsed);

        if quantized > self.sampled {
            self.sampled = quantized;
            true
        } else {
            false
        }
    }

    pub fn sampled(&self) -> Duration {
        self.sampled
    }
}
