#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// The feed is still growing; keep issuing scroll steps.
    #[default]
    Scrolling,
    /// The bottom was reached; waiting out the grace interval to see whether
    /// a late page fetch grows the feed again.
    Settling,
    /// Repeated scrolling no longer grows the feed. Terminal.
    Converged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorState {
    phase: Phase,
    scroll_distance: u64,
    current_height: u64,
    scroll_height: u64,
}

impl MonitorState {
    pub fn new(scroll_distance: u64) -> Self {
        Self {
            phase: Phase::Scrolling,
            scroll_distance,
            current_height: 0,
            scroll_height: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Total distance scrolled so far.
    pub fn current_height(&self) -> u64 {
        self.current_height
    }

    /// Document height as of the most recent sample.
    pub fn scroll_height(&self) -> u64 {
        self.scroll_height
    }

    pub(crate) fn record_step(&mut self, sampled_height: u64) {
        self.current_height += self.scroll_distance;
        self.scroll_height = sampled_height;
    }

    pub(crate) fn record_settle_sample(&mut self, sampled_height: u64) {
        self.scroll_height = sampled_height;
    }

    pub(crate) fn reached_bottom(&self) -> bool {
        self.current_height >= self.scroll_height
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }
}
