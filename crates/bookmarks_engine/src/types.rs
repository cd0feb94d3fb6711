use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;

/// One raw feed API payload, captured for a single fetch of the timeline.
/// Identity is implicit in arrival order; the worker consumes and discards it.
#[derive(Debug, Clone)]
pub struct RawPage(Bytes);

impl RawPage {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self(payload.into())
    }

    pub fn payload(&self) -> &[u8] {
        &self.0
    }
}

/// One row of a decoded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub entry_id: String,
    pub content: EntryContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContent {
    /// Pagination cursor or other non-tweet row; skippable downstream.
    Cursor,
    Tweet(TweetRecord),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TweetRecord {
    pub rest_id: String,
    pub author_handle: String,
    pub media: Vec<MediaAttachment>,
    /// The upstream record exists but its payload is null: the tweet was
    /// removed after it was bookmarked.
    pub is_deleted: bool,
}

impl TweetRecord {
    pub fn deleted() -> Self {
        Self {
            is_deleted: true,
            ..Self::default()
        }
    }
}

/// A media entry as it appears in the tweet's extended-media block, before
/// the type tag has been interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAttachment {
    pub type_tag: String,
    /// Full-resolution image (or video thumbnail); also names the file
    /// extension for photo downloads.
    pub direct_url: String,
    /// Canonical link handed to the external materializer for non-photo kinds.
    pub canonical_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    AnimatedGif,
    Video,
    /// Unrecognized upstream type tag. Resolution tolerates it; dispatch
    /// treats it as a hard stop (schema drift must not skip silently).
    Unknown(String),
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Photo => write!(f, "photo"),
            MediaKind::AnimatedGif => write!(f, "animated_gif"),
            MediaKind::Video => write!(f, "video"),
            MediaKind::Unknown(tag) => write!(f, "unknown({tag})"),
        }
    }
}

/// One downloadable media item within a tweet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub kind: MediaKind,
    pub direct_url: String,
    pub canonical_url: String,
    /// Position within the tweet's media list; part of the dedup key since a
    /// tweet may carry several items.
    pub ordinal_index: usize,
}

/// `{authorHandle}-{restId}-{ordinalIndex}` — globally unique per media item
/// across a feed, stable across runs, and used as the filename prefix that
/// doubles as the on-disk dedup index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey(String);

impl DedupKey {
    pub fn new(author_handle: &str, rest_id: &str, ordinal_index: usize) -> Self {
        Self(format!("{author_handle}-{rest_id}-{ordinal_index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A media item paired with its computed dedup key, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    pub media: MediaRef,
    pub key: DedupKey,
}

/// Result of one dispatch attempt. Failures travel on the error path since
/// every dispatch error aborts the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub key: DedupKey,
    pub disposition: Disposition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Downloaded,
    SkippedExisting,
}

/// Observability events emitted by the worker; nothing gates on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    PageProcessed {
        /// 1-based count of pages completed so far.
        page: u64,
        /// Dispatch outcomes in entry order.
        outcomes: Vec<DownloadOutcome>,
    },
    Aborted {
        message: String,
    },
}

/// Run-scoped counters, owned by the pipeline invocation. Written by the
/// worker, read once for the final summary.
#[derive(Debug, Default)]
pub struct RunCounters {
    pages: AtomicU64,
    examined: AtomicU64,
    downloaded: AtomicU64,
}

impl RunCounters {
    pub fn record_page(&self) {
        self.pages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_examined(&self) {
        self.examined.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_downloaded(&self) {
        self.downloaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            pages_processed: self.pages.load(Ordering::Relaxed),
            media_examined: self.examined.load(Ordering::Relaxed),
            media_downloaded: self.downloaded.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub pages_processed: u64,
    pub media_examined: u64,
    pub media_downloaded: u64,
}

/// Final state of a finished run: the summary is always present so partial
/// progress is reported even when the run aborted.
#[derive(Debug)]
pub struct RunReport {
    pub summary: RunSummary,
    pub failure: Option<crate::pipeline::PipelineError>,
}
