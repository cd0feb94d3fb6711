use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use engine_logging::{engine_error, engine_info, engine_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::decode::decode_page;
use crate::dispatch::{DispatchError, MediaDispatcher};
use crate::fetch::Fetcher;
use crate::materialize::Materializer;
use crate::monitor::SourceError;
use crate::persist::{ensure_output_dir, list_existing_filenames, PersistError};
use crate::resolve::resolve_media;
use crate::types::{
    DownloadOutcome, EntryContent, PipelineEvent, RawPage, RunCounters, RunReport, RunSummary,
};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("download worker panicked")]
    WorkerPanicked,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub output_dir: PathBuf,
    /// Idle sleep between dequeue attempts while the queue is empty.
    pub poll_interval: Duration,
}

impl PipelineConfig {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            poll_interval: Duration::from_millis(20),
        }
    }
}

/// Cloneable enqueue side of the page queue, handed to the capture source.
/// Pages are processed in submission order.
#[derive(Clone)]
pub struct PageSink {
    page_tx: Sender<RawPage>,
    depth: Arc<AtomicUsize>,
}

impl PageSink {
    pub fn submit(&self, page: RawPage) {
        self.depth.fetch_add(1, Ordering::SeqCst);
        // The worker only hangs up after it has stopped; a page captured
        // that late is intentionally discarded.
        if self.page_tx.send(page).is_err() {
            self.depth.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

/// Owner of the page queue and the single download worker.
///
/// The worker runs on its own thread with its own runtime (downloads stay
/// strictly sequential) and drains whatever is queued before honoring
/// cancellation, so a page enqueued before shutdown is never dropped.
pub struct PipelineHandle {
    sink: PageSink,
    events: Option<Receiver<PipelineEvent>>,
    cancel: CancellationToken,
    depth: Arc<AtomicUsize>,
    counters: Arc<RunCounters>,
    worker: Option<JoinHandle<Option<PipelineError>>>,
}

impl PipelineHandle {
    /// Prepare the output directory, snapshot the existing-file dedup set,
    /// and start the worker.
    pub fn new(
        config: PipelineConfig,
        fetcher: Arc<dyn Fetcher>,
        materializer: Arc<dyn Materializer>,
    ) -> Result<Self, PipelineError> {
        ensure_output_dir(&config.output_dir)?;
        let existing = list_existing_filenames(&config.output_dir)?;
        engine_info!(
            "found {} existing files in {}",
            existing.len(),
            config.output_dir.display()
        );

        let counters = Arc::new(RunCounters::default());
        let dispatcher = MediaDispatcher::new(
            config.output_dir.clone(),
            existing,
            fetcher,
            materializer,
            counters.clone(),
        );

        let (page_tx, page_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let depth = Arc::new(AtomicUsize::new(0));

        let worker = thread::spawn({
            let cancel = cancel.clone();
            let depth = depth.clone();
            let counters = counters.clone();
            let poll_interval = config.poll_interval;
            move || worker_loop(page_rx, event_tx, dispatcher, counters, depth, cancel, poll_interval)
        });

        Ok(Self {
            sink: PageSink { page_tx, depth: depth.clone() },
            events: Some(event_rx),
            cancel,
            depth,
            counters,
            worker: Some(worker),
        })
    }

    pub fn sink(&self) -> PageSink {
        self.sink.clone()
    }

    /// Take the event receiver. Events are observability only; nothing in
    /// the pipeline gates on them being consumed.
    pub fn take_events(&mut self) -> Option<Receiver<PipelineEvent>> {
        self.events.take()
    }

    /// True when every enqueued page has been fully processed.
    pub fn queue_is_empty(&self) -> bool {
        self.depth.load(Ordering::SeqCst) == 0
    }

    /// True once the worker has exited, normally or after a fatal error.
    pub fn worker_finished(&self) -> bool {
        self.worker.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Live counter snapshot; the authoritative read happens in [`finish`].
    ///
    /// [`finish`]: PipelineHandle::finish
    pub fn summary(&self) -> RunSummary {
        self.counters.summary()
    }

    /// Request cancellation, wait for the worker to drain the queue and
    /// exit, and collect the run report. The report always carries the
    /// summary, so partial progress survives an aborted run.
    pub fn finish(mut self) -> RunReport {
        self.cancel.cancel();
        let failure = match self.worker.take() {
            Some(worker) => match worker.join() {
                Ok(failure) => failure,
                Err(_) => Some(PipelineError::WorkerPanicked),
            },
            None => None,
        };
        RunReport {
            summary: self.counters.summary(),
            failure,
        }
    }
}

fn worker_loop(
    page_rx: Receiver<RawPage>,
    event_tx: Sender<PipelineEvent>,
    dispatcher: MediaDispatcher,
    counters: Arc<RunCounters>,
    depth: Arc<AtomicUsize>,
    cancel: CancellationToken,
    poll_interval: Duration,
) -> Option<PipelineError> {
    // The worker owns its runtime; each page is processed to completion
    // before the next dequeue, so downloads never overlap.
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let mut pages_done: u64 = 0;

    loop {
        match page_rx.try_recv() {
            Ok(page) => {
                let result = runtime.block_on(process_page(&page, &dispatcher));
                // Depth drops only after the page is fully processed, so an
                // empty queue implies nothing is in flight.
                depth.fetch_sub(1, Ordering::SeqCst);
                match result {
                    Ok(Some(outcomes)) => {
                        pages_done += 1;
                        counters.record_page();
                        engine_info!("downloaded page {pages_done}");
                        let _ = event_tx.send(PipelineEvent::PageProcessed {
                            page: pages_done,
                            outcomes,
                        });
                    }
                    Ok(None) => {}
                    Err(error) => {
                        engine_error!("aborting run: {error}");
                        let _ = event_tx.send(PipelineEvent::Aborted {
                            message: error.to_string(),
                        });
                        return Some(error);
                    }
                }
            }
            Err(TryRecvError::Empty) => {
                // Cancellation is only honored once the queue is drained.
                if cancel.is_cancelled() {
                    return None;
                }
                thread::sleep(poll_interval);
            }
            Err(TryRecvError::Disconnected) => return None,
        }
    }
}

/// Process one raw page: decode, then resolve and dispatch each tweet's
/// media sequentially in entry order. Returns `None` for a malformed page
/// (skipped, run continues); dispatch errors propagate and end the run.
async fn process_page(
    page: &RawPage,
    dispatcher: &MediaDispatcher,
) -> Result<Option<Vec<DownloadOutcome>>, PipelineError> {
    let entries = match decode_page(page) {
        Ok(entries) => entries,
        Err(error) => {
            // An upstream error page, not a normal empty page.
            engine_warn!("skipping malformed page: {error}");
            return Ok(None);
        }
    };

    let mut outcomes = Vec::new();
    for entry in entries {
        let EntryContent::Tweet(tweet) = entry.content else {
            continue;
        };
        if tweet.is_deleted {
            engine_info!("deleted tweet in timeline, skipping");
            continue;
        }
        for item in resolve_media(&tweet) {
            let outcome = dispatcher.dispatch(&item).await?;
            outcomes.push(outcome);
        }
    }
    Ok(Some(outcomes))
}
