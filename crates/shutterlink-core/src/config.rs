// ── Session tuning ──
//
// Timing knobs for the wait scheduler. Built by the CLI from the active
// profile; core never reads config files.

use std::time::Duration;

/// Default sleep between condition re-evaluations.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Default number of frames a live-view counter must advance past its
/// baseline before a new frame is considered available.
pub const DEFAULT_FRAME_SLACK: u64 = 2;

/// Timing configuration for a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Sleep between condition checks in `wait_for_*`.
    pub poll_interval: Duration,
    /// Frame-counter slack for `wait_for_liveview_frame`.
    pub frame_slack: u64,
    /// Sleep step used by `wait_until` while far from the deadline.
    pub coarse_step: Duration,
    /// Sleep step used by `wait_until` near the deadline.
    pub fine_step: Duration,
    /// Remaining time above which `coarse_step` is used.
    pub coarse_threshold: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            frame_slack: DEFAULT_FRAME_SLACK,
            coarse_step: Duration::from_secs(1),
            fine_step: Duration::from_millis(10),
            coarse_threshold: Duration::from_secs(2),
        }
    }
}

impl SessionConfig {
    /// Sleep step for a deadline wait with `remaining` time left.
    pub fn deadline_step(&self, remaining: Duration) -> Duration {
        if remaining > self.coarse_threshold {
            self.coarse_step
        } else {
            self.fine_step.min(remaining)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_step_switches_to_fine_near_deadline() {
        let config = SessionConfig::default();
        assert_eq!(config.deadline_step(Duration::from_secs(5)), Duration::from_secs(1));
        assert_eq!(
            config.deadline_step(Duration::from_secs(2)),
            Duration::from_millis(10)
        );
        assert_eq!(
            config.deadline_step(Duration::from_millis(4)),
            Duration::from_millis(4)
        );
    }
}
