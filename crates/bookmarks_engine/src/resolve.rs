use crate::types::{DedupKey, MediaKind, MediaRef, ResolvedMedia, TweetRecord};

/// Resolve one tweet's media attachments into downloadable items, preserving
/// source order. Ordinal indices are assigned by position and flow into the
/// dedup keys.
///
/// Unrecognized type tags resolve to [`MediaKind::Unknown`] rather than
/// failing here; the dispatcher turns them into a hard error so drifted
/// schemas cannot under-download silently.
pub fn resolve_media(tweet: &TweetRecord) -> Vec<ResolvedMedia> {
    tweet
        .media
        .iter()
        .enumerate()
        .map(|(ordinal_index, attachment)| {
            let kind = match attachment.type_tag.as_str() {
                "photo" => MediaKind::Photo,
                "animated_gif" => MediaKind::AnimatedGif,
                "video" => MediaKind::Video,
                other => MediaKind::Unknown(other.to_owned()),
            };
            ResolvedMedia {
                media: MediaRef {
                    kind,
                    direct_url: attachment.direct_url.clone(),
                    canonical_url: attachment.canonical_url.clone(),
                    ordinal_index,
                },
                key: DedupKey::new(&tweet.author_handle, &tweet.rest_id, ordinal_index),
            }
        })
        .collect()
}
