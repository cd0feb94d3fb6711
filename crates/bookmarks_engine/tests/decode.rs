use bookmarks_engine::{decode_page, EntryContent, RawPage, SchemaError};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn page_from(value: Value) -> RawPage {
    RawPage::new(serde_json::to_vec(&value).unwrap())
}

fn feed_page(entries: Vec<Value>) -> Value {
    json!({
        "data": {
            "bookmark_timeline": {
                "timeline": {
                    "instructions": [{ "entries": entries }]
                }
            }
        }
    })
}

fn tweet_entry(entry_id: &str, author: &str, rest_id: &str, media: Vec<Value>) -> Value {
    json!({
        "entryId": entry_id,
        "content": {
            "itemContent": {
                "itemType": "TimelineTweet",
                "tweet_results": {
                    "result": {
                        "rest_id": rest_id,
                        "core": {
                            "user_results": {
                                "result": { "legacy": { "screen_name": author } }
                            }
                        },
                        "legacy": {
                            "extended_entities": { "media": media }
                        }
                    }
                }
            }
        }
    })
}

fn photo(stem: &str) -> Value {
    json!({
        "media_url_https": format!("https://img.example/{stem}.jpg"),
        "url": format!("https://t.co/{stem}"),
        "type": "photo"
    })
}

#[test]
fn decodes_entries_in_feed_order_with_cursor_rows() {
    let page = page_from(feed_page(vec![
        tweet_entry("tweet-1", "alice", "100", vec![photo("a")]),
        json!({ "entryId": "cursor-bottom", "content": {} }),
        tweet_entry("tweet-2", "bob", "200", vec![]),
    ]));

    let entries = decode_page(&page).expect("decode ok");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].entry_id, "tweet-1");
    assert_eq!(entries[1].entry_id, "cursor-bottom");
    assert_eq!(entries[1].content, EntryContent::Cursor);
    assert_eq!(entries[2].entry_id, "tweet-2");

    let EntryContent::Tweet(first) = &entries[0].content else {
        panic!("expected a tweet record");
    };
    assert_eq!(first.author_handle, "alice");
    assert_eq!(first.rest_id, "100");
    assert_eq!(first.media.len(), 1);
    assert_eq!(first.media[0].type_tag, "photo");
    assert_eq!(first.media[0].direct_url, "https://img.example/a.jpg");
    assert_eq!(first.media[0].canonical_url, "https://t.co/a");
    assert!(!first.is_deleted);
}

#[test]
fn non_tweet_item_type_is_a_non_content_row() {
    let page = page_from(feed_page(vec![json!({
        "entryId": "who-to-follow",
        "content": {
            "itemContent": { "itemType": "TimelineUser" }
        }
    })]));

    let entries = decode_page(&page).expect("decode ok");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].content, EntryContent::Cursor);
}

#[test]
fn present_but_empty_tweet_result_is_a_deleted_record() {
    let page = page_from(feed_page(vec![json!({
        "entryId": "tweet-gone",
        "content": {
            "itemContent": {
                "itemType": "TimelineTweet",
                "tweet_results": { "result": null }
            }
        }
    })]));

    let entries = decode_page(&page).expect("decode ok");
    let EntryContent::Tweet(record) = &entries[0].content else {
        panic!("expected a tweet record");
    };
    assert!(record.is_deleted);
    assert!(record.media.is_empty());
}

#[test]
fn tweet_without_extended_entities_has_no_media() {
    let page = page_from(feed_page(vec![json!({
        "entryId": "tweet-plain",
        "content": {
            "itemContent": {
                "itemType": "TimelineTweet",
                "tweet_results": {
                    "result": {
                        "rest_id": "300",
                        "core": {
                            "user_results": {
                                "result": { "legacy": { "screen_name": "carol" } }
                            }
                        },
                        "legacy": {}
                    }
                }
            }
        }
    })]));

    let entries = decode_page(&page).expect("decode ok");
    let EntryContent::Tweet(record) = &entries[0].content else {
        panic!("expected a tweet record");
    };
    assert!(record.media.is_empty());
    assert!(!record.is_deleted);
}

#[test]
fn missing_timeline_container_is_a_schema_error() {
    // The data node exists but carries no timeline: an upstream error page.
    let page = page_from(json!({ "data": {} }));
    let err = decode_page(&page).unwrap_err();
    assert!(matches!(err, SchemaError::MissingTimeline));

    let page = page_from(json!({}));
    let err = decode_page(&page).unwrap_err();
    assert!(matches!(err, SchemaError::MissingTimeline));
}

#[test]
fn unparseable_payload_is_a_schema_error() {
    let page = RawPage::new(&b"<html>rate limited</html>"[..]);
    let err = decode_page(&page).unwrap_err();
    assert!(matches!(err, SchemaError::Json(_)));
}

#[test]
fn empty_timeline_decodes_to_no_entries() {
    let page = page_from(json!({
        "data": { "bookmark_timeline": { "timeline": { "instructions": [] } } }
    }));
    let entries = decode_page(&page).expect("decode ok");
    assert!(entries.is_empty());
}
