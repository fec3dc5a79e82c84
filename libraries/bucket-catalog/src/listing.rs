//! Decoding of `ListObjectsV2` (`ListBucketResult`) documents.

use crate::error::{CatalogError, Result};
use crate::types::{FileInfo, ListingPage};
use crate::AUDIO_EXTENSION;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

const ROOT_ELEMENT: &[u8] = b"ListBucketResult";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListBucketResult {
    #[serde(default)]
    contents: Vec<RawObject>,
    #[serde(default)]
    next_continuation_token: Option<String>,
    #[serde(default)]
    is_truncated: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawObject {
    key: String,
    #[serde(default)]
    last_modified: Option<String>,
    #[serde(default)]
    size: Option<String>,
}

/// Decode one listing page.
///
/// Objects whose key does not end in `.mp3` are dropped. A missing
/// `IsTruncated` counts as `false`, and an empty `NextContinuationToken`
/// counts as absent.
pub fn parse_listing(xml: &str, bucket_url: &str) -> Result<ListingPage> {
    check_root(xml)?;

    let document: ListBucketResult = quick_xml::de::from_str(xml)?;

    let entries = document
        .contents
        .into_iter()
        .filter(|object| object.key.ends_with(AUDIO_EXTENSION))
        .map(|object| {
            let size = object.size.and_then(|s| s.trim().parse::<u64>().ok());
            FileInfo::from_object(bucket_url, object.key, object.last_modified, size)
        })
        .collect();

    Ok(ListingPage {
        entries,
        next_continuation_token: document
            .next_continuation_token
            .filter(|token| !token.is_empty()),
        is_truncated: document.is_truncated.unwrap_or(false),
    })
}

/// The deserializer does not look at the root element name, so an error
/// document (`<Error>...</Error>`) would otherwise decode as an empty page.
fn check_root(xml: &str) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(element) | Event::Empty(element) => {
                return if element.local_name().as_ref() == ROOT_ELEMENT {
                    Ok(())
                } else {
                    Err(CatalogError::Parse(format!(
                        "unexpected root element <{}>",
                        String::from_utf8_lossy(element.name().as_ref())
                    )))
                };
            }
            Event::Eof => return Err(CatalogError::Parse("empty listing document".into())),
            _ => {}
        }
    }
}
