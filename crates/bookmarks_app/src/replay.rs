use std::fs;
use std::path::Path;

use async_trait::async_trait;
use bookmarks_engine::{PageSink, RawPage, ScrollSurface, SourceError};

/// Virtual height added to the reported document height per loaded page.
const PAGE_HEIGHT: u64 = 1200;

/// Capture source that replays previously captured feed payloads from a
/// directory, in filename order.
///
/// Reaching the virtual bottom "loads" the next page: the payload is
/// submitted to the pipeline and the reported height grows, mirroring how
/// the live feed reacts to scrolling. Once every page is loaded the height
/// stops growing and the monitor converges on its own.
pub struct ReplaySource {
    sink: PageSink,
    pages: Vec<RawPage>,
    emitted: usize,
    pos: u64,
    height: u64,
}

impl ReplaySource {
    pub fn from_dir(dir: &Path, sink: PageSink) -> Result<Self, SourceError> {
        let entries = fs::read_dir(dir)
            .map_err(|err| SourceError::new(format!("cannot read {}: {err}", dir.display())))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| SourceError::new(err.to_string()))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut pages = Vec::with_capacity(paths.len());
        for path in &paths {
            let payload = fs::read(path).map_err(|err| {
                SourceError::new(format!("cannot read {}: {err}", path.display()))
            })?;
            pages.push(RawPage::new(payload));
        }

        Ok(Self {
            sink,
            pages,
            emitted: 0,
            pos: 0,
            height: 0,
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[async_trait]
impl ScrollSurface for ReplaySource {
    async fn scroll_by(&mut self, distance: u64) -> Result<(), SourceError> {
        self.pos += distance;
        Ok(())
    }

    async fn scroll_height(&mut self) -> Result<u64, SourceError> {
        if self.pos >= self.height && self.emitted < self.pages.len() {
            self.sink.submit(self.pages[self.emitted].clone());
            self.emitted += 1;
            self.height += PAGE_HEIGHT;
        }
        Ok(self.height)
    }
}
