use thiserror::Error;

use crate::model;
use crate::types::{EntryContent, MediaAttachment, RawPage, TimelineEntry, TweetRecord};

/// Entries whose item content carries this type tag hold tweet records;
/// anything else is a non-content row.
const TWEET_ITEM_TYPE: &str = "TimelineTweet";

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("page payload is not valid feed JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The container that should hold the timeline is absent. This is an
    /// upstream error page, not a normal empty page.
    #[error("timeline container missing from page payload")]
    MissingTimeline,
}

/// Decode one captured page into its timeline entries, in feed order.
///
/// Cursor rows and non-tweet item types decode to [`EntryContent::Cursor`];
/// a present-but-null tweet result decodes to a deleted [`TweetRecord`].
pub fn decode_page(page: &RawPage) -> Result<Vec<TimelineEntry>, SchemaError> {
    let response: model::FeedResponse = serde_json::from_slice(page.payload())?;
    let timeline = response
        .data
        .and_then(|data| data.bookmark_timeline)
        .and_then(|wrapper| wrapper.timeline)
        .ok_or(SchemaError::MissingTimeline)?;

    let mut entries = Vec::new();
    for instruction in timeline.instructions {
        for entry in instruction.entries {
            entries.push(TimelineEntry {
                entry_id: entry.entry_id,
                content: decode_content(entry.content),
            });
        }
    }
    Ok(entries)
}

fn decode_content(node: Option<model::EntryContentNode>) -> EntryContent {
    let Some(item) = node.and_then(|content| content.item_content) else {
        return EntryContent::Cursor;
    };
    if item.item_type.as_deref() != Some(TWEET_ITEM_TYPE) {
        return EntryContent::Cursor;
    }
    let Some(result) = item.tweet_results.and_then(|results| results.result) else {
        return EntryContent::Tweet(TweetRecord::deleted());
    };

    let media = result
        .legacy
        .extended_entities
        .map(|entities| entities.media)
        .unwrap_or_default()
        .into_iter()
        .map(|media| MediaAttachment {
            type_tag: media.media_type,
            direct_url: media.media_url_https,
            canonical_url: media.url,
        })
        .collect();

    EntryContent::Tweet(TweetRecord {
        rest_id: result.rest_id,
        author_handle: result.core.user_results.result.legacy.screen_name,
        media,
        is_deleted: false,
    })
}
