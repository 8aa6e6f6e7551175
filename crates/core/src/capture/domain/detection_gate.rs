use std::time::{Duration, Instant};

/// Admission control for the external detector.
///
/// Admits at most one sample per `min_interval`, never while a sample is
/// in flight, never before the startup grace period has elapsed, and never
/// after shutdown. Admission marks the gate as sampling; the owner must
/// call [`release`](Self::release) on every completion path.
#[derive(Debug)]
pub struct DetectionGate {
    min_interval: Duration,
    opens_at: Instant,
    last_admitted: Option<Instant>,
    sampling: bool,
    live: bool,
}

impl DetectionGate {
    pub fn new(min_interval: Duration, startup_delay: Duration, started_at: Instant) -> Self {
        Self {
            min_interval,
            opens_at: started_at + startup_delay,
            last_admitted: None,
            sampling: false,
            live: true,
        }
    }

    pub fn try_admit(&mut self, now: Instant) -> bool {
        if !self.live || self.sampling || now < self.opens_at {
            return false;
        }
        if let Some(last) = self.last_admitted {
            if now.saturating_duration_since(last) < self.min_interval {
                return false;
            }
        }
        self.last_admitted = Some(now);
        self.sampling = true;
        true
    }

    /// Ends the in-flight sample. Safe to call when nothing is in flight.
    pub fn release(&mut self) {
        self.sampling = false;
    }

    /// Idempotent; the gate never admits again afterwards.
    pub fn shutdown(&mut self) {
        self.live = false;
        self.sampling = false;
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn is_sampling(&self) -> bool {
        self.sampling
    }
}
