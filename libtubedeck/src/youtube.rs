//! YouTube URL helpers
//!
//! Only the `watch?v=<id>` form is understood. Short links (`youtu.be/<id>`)
//! and path-embedded ids (`/embed/<id>`, `/shorts/<id>`) are rejected.

use url::Url;

use crate::error::{Result, TubeDeckError};

/// Thumbnail quality used when no configuration is supplied
pub const DEFAULT_THUMBNAIL_QUALITY: &str = "mqdefault";

/// Extract the external video id from a watch URL
///
/// Reads the `v` query parameter.
///
/// # Errors
///
/// Returns `TubeDeckError::InvalidInput` if the URL does not parse or the `v`
/// parameter is missing or blank.
pub fn extract_video_id(url: &str) -> Result<String> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| TubeDeckError::InvalidInput(format!("Invalid video URL '{}': {}", url, e)))?;

    parsed
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            TubeDeckError::InvalidInput(format!(
                "Invalid video URL '{}': missing 'v' query parameter",
                url
            ))
        })
}

/// Thumbnail URL for a video id at the given quality (e.g. "mqdefault")
pub fn thumbnail_url(video_id: &str, quality: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/{quality}.jpg")
}
