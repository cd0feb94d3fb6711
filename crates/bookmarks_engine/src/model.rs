//! Serde mirror of the feed API payload.
//!
//! Nodes the upstream may legitimately null out are `Option`; everything else
//! is required, so a drifted page fails to parse as a whole and surfaces as a
//! schema error instead of a half-decoded entry.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct FeedResponse {
    pub data: Option<ResponseData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseData {
    pub bookmark_timeline: Option<TimelineWrapper>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimelineWrapper {
    pub timeline: Option<Timeline>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Timeline {
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Instruction {
    #[serde(default)]
    pub entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Entry {
    #[serde(rename = "entryId")]
    pub entry_id: String,
    pub content: Option<EntryContentNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EntryContentNode {
    /// Null on cursor rows.
    #[serde(rename = "itemContent")]
    pub item_content: Option<ItemContent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemContent {
    #[serde(rename = "itemType")]
    pub item_type: Option<String>,
    pub tweet_results: Option<TweetResults>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TweetResults {
    /// Null when the tweet was deleted after being bookmarked.
    pub result: Option<TweetResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TweetResult {
    pub rest_id: String,
    pub core: TweetCore,
    pub legacy: TweetLegacy,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TweetCore {
    pub user_results: UserResults,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserResults {
    pub result: UserResult,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserResult {
    pub legacy: UserLegacy,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserLegacy {
    pub screen_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TweetLegacy {
    pub extended_entities: Option<ExtendedEntities>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExtendedEntities {
    #[serde(default)]
    pub media: Vec<Media>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Media {
    /// Full-res image or video thumbnail.
    pub media_url_https: String,
    /// Canonical short link.
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: String,
}
