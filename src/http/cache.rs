//! HTTP cache control module
//!
//! Provides `Last-Modified` handling, conditional request evaluation and
//! the `Cache-Control` policy for file responses.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Drop sub-second precision; HTTP dates only carry whole seconds.
pub fn truncate_to_seconds(time: SystemTime) -> SystemTime {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    UNIX_EPOCH + Duration::from_secs(secs)
}

/// Format as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    httpdate::fmt_http_date(time)
}

/// Check the client's `If-Modified-Since` against a second-truncated modification time
///
/// Returns true (304) only when the header parses as an HTTP-date and the file
/// is not newer than it. A malformed date never short-circuits.
pub fn is_not_modified(if_modified_since: Option<&str>, last_modified: SystemTime) -> bool {
    if_modified_since
        .and_then(|value| httpdate::parse_http_date(value.trim()).ok())
        .is_some_and(|since| last_modified <= since)
}

/// Cache-Control policy for file responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheControl {
    /// Cacheable for the given number of seconds
    MaxAge(u64),
    /// Cacheable, but must be revalidated
    NoCache,
    /// Never cache
    NoStore,
}

impl CacheControl {
    /// Policy for the `files.cache` / `files.max_age` settings
    pub fn for_files(cache_enabled: bool, max_age: i64) -> Self {
        if !cache_enabled {
            return Self::NoStore;
        }
        match u64::try_from(max_age) {
            Ok(secs) if secs > 0 => Self::MaxAge(secs),
            _ => Self::NoCache,
        }
    }

    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::MaxAge(max_age) => format!("max-age={max_age}"),
            Self::NoCache => "no-cache".to_string(),
            Self::NoStore => "no-store".to_string(),
        }
    }
}
