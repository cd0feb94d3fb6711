#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Capture surface is ready; begin issuing scroll steps.
    CaptureStarted,
    /// One scroll step was issued, with the document height sampled after it.
    ScrollStepped { scroll_height: u64 },
    /// The settle grace interval elapsed, with the height sampled afterwards.
    SettleElapsed { scroll_height: u64 },
}
