//! Bookmarks engine: feed page decoding, media dispatch, and the
//! harvest-to-download pipeline.
mod decode;
mod dispatch;
mod fetch;
mod filename;
mod materialize;
mod model;
mod monitor;
mod persist;
mod pipeline;
mod resolve;
mod types;

pub use decode::{decode_page, SchemaError};
pub use dispatch::{DispatchError, MediaDispatcher};
pub use fetch::{FetchError, FetchSettings, Fetcher, ReqwestFetcher};
pub use filename::{already_downloaded, extension_from_url, materialize_template, media_file_name};
pub use materialize::{MaterializeError, Materializer, YtDlpMaterializer};
pub use monitor::{drive_capture, MonitorSettings, ScrollSurface, SourceError};
pub use persist::{ensure_output_dir, list_existing_filenames, AtomicMediaWriter, PersistError};
pub use pipeline::{PageSink, PipelineConfig, PipelineError, PipelineHandle};
pub use resolve::resolve_media;
pub use types::{
    DedupKey, Disposition, DownloadOutcome, EntryContent, MediaAttachment, MediaKind, MediaRef,
    PipelineEvent, RawPage, ResolvedMedia, RunCounters, RunReport, RunSummary, TimelineEntry,
    TweetRecord,
};
