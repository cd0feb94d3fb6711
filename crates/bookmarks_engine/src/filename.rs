use std::path::{Path, PathBuf};

use url::Url;

use crate::types::DedupKey;

/// Filename for a directly fetched media item: `{key}.{ext}`.
pub fn media_file_name(key: &DedupKey, extension: &str) -> String {
    format!("{key}.{extension}")
}

/// Target path template for the external materializer. The `%(ext)s`
/// placeholder is substituted by the tool once it knows the container format.
pub fn materialize_template(out_dir: &Path, key: &DedupKey) -> PathBuf {
    out_dir.join(format!("{key}.%(ext)s"))
}

/// Extension of the trailing path segment of a direct media URL, without the
/// dot. Query strings and fragments are not part of the segment.
pub fn extension_from_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    let segment = parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .next_back()?;
    let (stem, extension) = segment.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }
    Some(extension.to_owned())
}

/// The snapshot dedup check: a key counts as already downloaded when any
/// existing filename contains it.
pub fn already_downloaded(existing: &[String], key: &DedupKey) -> bool {
    existing.iter().any(|name| name.contains(key.as_str()))
}
