use std::path::PathBuf;
use std::sync::Arc;

use engine_logging::engine_info;
use thiserror::Error;

use crate::fetch::{FetchError, Fetcher};
use crate::filename::{already_downloaded, extension_from_url, materialize_template, media_file_name};
use crate::materialize::{MaterializeError, Materializer};
use crate::persist::{AtomicMediaWriter, PersistError};
use crate::types::{DedupKey, Disposition, DownloadOutcome, MediaKind, ResolvedMedia, RunCounters};

/// All dispatch failures abort the run; each names the item's dedup key so
/// the operator can see exactly where the harvest stopped.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("download failed for {key}: {source}")]
    Fetch {
        key: DedupKey,
        #[source]
        source: FetchError,
    },
    #[error("could not derive a file extension for {key} from {url}")]
    MediaUrl { key: DedupKey, url: String },
    #[error("external tool failed for {key}: {source}")]
    Tool {
        key: DedupKey,
        #[source]
        source: MaterializeError,
    },
    #[error("unrecognized media kind \"{tag}\" for {key}: the feed schema has drifted")]
    UnsupportedMediaKind { key: DedupKey, tag: String },
    #[error("could not persist {key}: {source}")]
    Persist {
        key: DedupKey,
        #[source]
        source: PersistError,
    },
}

/// Performs single media downloads against the capability set, deduplicating
/// against the existing-file snapshot taken at worker start.
pub struct MediaDispatcher {
    fetcher: Arc<dyn Fetcher>,
    materializer: Arc<dyn Materializer>,
    out_dir: PathBuf,
    /// Snapshot of the output directory, never refreshed mid-run. Two pages
    /// in the same run carrying the same key therefore both download, and
    /// the second overwrites the first silently.
    existing: Vec<String>,
    writer: AtomicMediaWriter,
    counters: Arc<RunCounters>,
}

impl MediaDispatcher {
    pub fn new(
        out_dir: PathBuf,
        existing: Vec<String>,
        fetcher: Arc<dyn Fetcher>,
        materializer: Arc<dyn Materializer>,
        counters: Arc<RunCounters>,
    ) -> Self {
        let writer = AtomicMediaWriter::new(out_dir.clone());
        Self {
            fetcher,
            materializer,
            out_dir,
            existing,
            writer,
            counters,
        }
    }

    /// Download one resolved media item. Every call counts as an examined
    /// item; only fresh fetches count as downloaded.
    pub async fn dispatch(&self, item: &ResolvedMedia) -> Result<DownloadOutcome, DispatchError> {
        self.counters.record_examined();

        let key = &item.key;
        if already_downloaded(&self.existing, key) {
            engine_info!("already downloaded: {key}");
            return Ok(DownloadOutcome {
                key: key.clone(),
                disposition: Disposition::SkippedExisting,
            });
        }

        match &item.media.kind {
            MediaKind::Photo => {
                let extension =
                    extension_from_url(&item.media.direct_url).ok_or_else(|| {
                        DispatchError::MediaUrl {
                            key: key.clone(),
                            url: item.media.direct_url.clone(),
                        }
                    })?;
                let bytes = self
                    .fetcher
                    .fetch_bytes(&item.media.direct_url)
                    .await
                    .map_err(|source| DispatchError::Fetch {
                        key: key.clone(),
                        source,
                    })?;
                self.writer
                    .write(&media_file_name(key, &extension), &bytes)
                    .map_err(|source| DispatchError::Persist {
                        key: key.clone(),
                        source,
                    })?;
            }
            MediaKind::AnimatedGif | MediaKind::Video => {
                let template = materialize_template(&self.out_dir, key);
                self.materializer
                    .materialize(&item.media.canonical_url, &template)
                    .await
                    .map_err(|source| DispatchError::Tool {
                        key: key.clone(),
                        source,
                    })?;
            }
            MediaKind::Unknown(tag) => {
                return Err(DispatchError::UnsupportedMediaKind {
                    key: key.clone(),
                    tag: tag.clone(),
                });
            }
        }

        self.counters.record_downloaded();
        engine_info!("downloaded {} media {key}", item.media.kind);
        Ok(DownloadOutcome {
            key: key.clone(),
            disposition: Disposition::Downloaded,
        })
    }
}
