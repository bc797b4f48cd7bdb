use std::time::Duration;

/// Paces the frame loop toward a target frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameGovernor {
    budget: Duration,
}

impl FrameGovernor {
    /// Creates a governor aiming for `fps` frames per second.
    ///
    /// A target of zero disables pacing.
    #[must_use]
    pub fn new(fps: u32) -> Self {
        let budget = if fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(1) / fps
        };
        Self { budget }
    }

    /// Time allotted to a single frame.
    #[must_use]
    pub const fn budget(&self) -> Duration {
        self.budget
    }

    /// How long to sleep after a frame that took `elapsed`.
    #[must_use]
    pub fn remaining(&self, elapsed: Duration) -> Duration {
        self.budget.saturating_sub(elapsed)
    }
}
