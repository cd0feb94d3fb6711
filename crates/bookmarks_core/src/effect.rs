#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Scroll the capture surface down by one step and re-sample its height.
    IssueScrollStep,
    /// Wait out the settle grace interval, then re-sample the height.
    BeginSettle,
    /// Harvesting has converged. The worker may stop once the page queue has
    /// drained; the drain wait is sequenced by the driver, not here.
    BeginShutdown,
}
