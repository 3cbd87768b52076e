//! Core types for TubeDeck

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named, persisted collection of videos
///
/// The order of `videos` carries no meaning; queue order is defined by each
/// video's `position`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub videos: Vec<VideoItem>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Playlist {
    pub fn new(name: String, description: String) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            videos: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Videos ordered by ascending `position`
    ///
    /// The sort is stable, so videos sharing a position keep their stored order.
    pub fn sorted_videos(&self) -> Vec<VideoItem> {
        let mut videos = self.videos.clone();
        videos.sort_by_key(|v| v.position);
        videos
    }

    /// Position one past the highest position currently in use
    pub fn next_position(&self) -> i32 {
        self.videos
            .iter()
            .map(|v| v.position)
            .max()
            .map_or(0, |max| max.saturating_add(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoItem {
    pub id: Uuid,
    /// Identifier used by the embedded player backend
    pub youtube_id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub duration_secs: Option<i64>,
    pub added_at: i64,
    pub position: i32,
    pub playlist_id: Uuid,
}

impl VideoItem {
    pub fn new(playlist_id: Uuid, youtube_id: String, title: String, thumbnail_url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            youtube_id,
            title,
            thumbnail_url,
            duration_secs: None,
            added_at: chrono::Utc::now().timestamp(),
            position: 0,
            playlist_id,
        }
    }

    pub fn with_position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }
}
