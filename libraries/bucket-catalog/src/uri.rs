//! Object key helpers: retrieval URIs and display names.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped in a key segment.
///
/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, which keeps `/` inside
/// keys escaped as `%2F`.
const KEY_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Build the retrieval URI of an object: `<bucket_url>/<encoded key>`.
pub fn object_uri(bucket_url: &str, key: &str) -> String {
    format!(
        "{}/{}",
        bucket_url.trim_end_matches('/'),
        utf8_percent_encode(key, KEY_SEGMENT)
    )
}

/// Recover the object key from a URI built by [`object_uri`].
///
/// Returns `None` if the URI does not live under `bucket_url` or the
/// decoded segment is not valid UTF-8.
pub fn decode_object_key(uri: &str, bucket_url: &str) -> Option<String> {
    let segment = uri
        .strip_prefix(bucket_url.trim_end_matches('/'))?
        .strip_prefix('/')?;
    percent_decode_str(segment)
        .decode_utf8()
        .ok()
        .map(|key| key.into_owned())
}

/// Display name of a key: everything after the last `/`.
pub fn file_name_of(key: &str) -> &str {
    key.rsplit_once('/').map_or(key, |(_, name)| name)
}
