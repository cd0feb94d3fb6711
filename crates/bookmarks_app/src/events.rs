use std::sync::mpsc::Receiver;
use std::thread;

use bookmarks_engine::{Disposition, PipelineEvent};
use engine_logging::{engine_info, engine_warn};

/// Drain pipeline events into log lines on a background thread. Events are
/// observability only; the thread ends when the worker hangs up.
pub fn spawn_event_logger(events: Receiver<PipelineEvent>) {
    thread::spawn(move || {
        while let Ok(event) = events.recv() {
            match event {
                PipelineEvent::PageProcessed { page, outcomes } => {
                    let downloaded = outcomes
                        .iter()
                        .filter(|outcome| outcome.disposition == Disposition::Downloaded)
                        .count();
                    let skipped = outcomes.len() - downloaded;
                    engine_info!("page {page}: {downloaded} downloaded, {skipped} already present");
                }
                PipelineEvent::Aborted { message } => {
                    engine_warn!("worker aborted: {message}");
                }
            }
        }
    });
}
