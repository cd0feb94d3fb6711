use std::time::Duration;

use async_trait::async_trait;
use bookmarks_core::{update, Effect, MonitorState, Msg};
use engine_logging::{engine_info, engine_warn};
use thiserror::Error;

use crate::pipeline::{PipelineError, PipelineHandle};

/// A fatal condition reported by the capture collaborator, e.g. a non-success
/// status on the feed endpoint.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("capture source failed: {message}")]
pub struct SourceError {
    pub message: String,
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The scrollable surface the capture collaborator exposes to the monitor.
/// Captured pages reach the pipeline through the [`PageSink`] the surface
/// was constructed with, not through this trait.
///
/// [`PageSink`]: crate::pipeline::PageSink
#[async_trait]
pub trait ScrollSurface: Send {
    /// Scroll the feed down by `distance`.
    async fn scroll_by(&mut self, distance: u64) -> Result<(), SourceError>;

    /// Sample the current document height.
    async fn scroll_height(&mut self) -> Result<u64, SourceError>;
}

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub scroll_distance: u64,
    /// Pause between scroll steps, giving the feed time to react.
    pub step_delay: Duration,
    /// Grace interval after reaching the bottom, letting an in-flight page
    /// fetch arrive before the height is re-sampled.
    pub settle_interval: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            scroll_distance: 100,
            step_delay: Duration::from_millis(100),
            settle_interval: Duration::from_secs(4),
        }
    }
}

/// Drive the capture surface until the feed converges, then wait for the
/// page queue to drain. Returns early when the worker has stopped (a fatal
/// dispatch failure); the caller collects the error from the run report.
///
/// Note the upstream feed can falsely report its end under load; that case
/// is indistinguishable from genuine convergence here, and re-running the
/// harvest is the documented recovery path.
pub async fn drive_capture(
    surface: &mut dyn ScrollSurface,
    pipeline: &PipelineHandle,
    settings: &MonitorSettings,
) -> Result<(), PipelineError> {
    let (mut state, mut effects) =
        update(MonitorState::new(settings.scroll_distance), Msg::CaptureStarted);

    loop {
        // The monitor machine emits at most one effect per message.
        let Some(&effect) = effects.first() else {
            return Ok(());
        };

        if pipeline.worker_finished() {
            engine_warn!("download worker stopped early; halting capture");
            return Ok(());
        }

        match effect {
            Effect::IssueScrollStep => {
                surface.scroll_by(settings.scroll_distance).await?;
                tokio::time::sleep(settings.step_delay).await;
                let scroll_height = surface.scroll_height().await?;
                (state, effects) = update(state, Msg::ScrollStepped { scroll_height });
            }
            Effect::BeginSettle => {
                engine_info!("reached the bottom, waiting to see whether the feed grows");
                tokio::time::sleep(settings.settle_interval).await;
                let scroll_height = surface.scroll_height().await?;
                (state, effects) = update(state, Msg::SettleElapsed { scroll_height });
            }
            Effect::BeginShutdown => {
                engine_info!("feed converged; waiting for queued pages to drain");
                while !pipeline.queue_is_empty() && !pipeline.worker_finished() {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                }
                return Ok(());
            }
        }
    }
}
