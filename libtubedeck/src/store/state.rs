//! Application state
//!
//! Immutable snapshot types. All state transitions happen through the reducer
//! (see `reducer.rs`); the store replaces the whole snapshot on every dispatch.

use serde::Serialize;
use uuid::Uuid;

use crate::types::{Playlist, VideoItem};

/// Root application state
///
/// This is the single source of truth for the player feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TubeDeckState {
    /// Directory of persisted playlists
    pub playlists: PlaylistsState,

    /// Working queue of the selected playlist
    pub queue: QueueState,

    /// What the embedded player is doing
    pub player: PlayerState,
}

/// Directory of playlists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum PlaylistsState {
    Loading,
    /// Never empty; an empty directory is `Empty`
    Loaded(Vec<Playlist>),
    Empty,
    Error(String),
}

/// Playback queue of the selected playlist
///
/// `videos` is a snapshot copy, independent of both the directory and the
/// persisted order until explicitly saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueueState {
    pub selected_playlist_id: Option<Uuid>,
    pub videos: Vec<VideoItem>,
    /// Always `< videos.len()` when present
    pub current_index: Option<usize>,
}

/// Embedded player state
///
/// Every variant except `Empty` and `Error` names the video it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlayerState {
    Empty,
    Loading { video_id: String, autoplay: bool },
    Buffering { video_id: String },
    Playing { video_id: String },
    Paused { video_id: String },
    Error { message: String },
}

impl Default for TubeDeckState {
    fn default() -> Self {
        Self {
            playlists: PlaylistsState::Loading,
            queue: QueueState::default(),
            player: PlayerState::Empty,
        }
    }
}

impl TubeDeckState {
    /// Create new state with construction defaults
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlaylistsState {
    /// Build the directory state for a freshly loaded list
    pub fn from_items(items: Vec<Playlist>) -> Self {
        if items.is_empty() {
            PlaylistsState::Empty
        } else {
            PlaylistsState::Loaded(items)
        }
    }

    pub fn items(&self) -> &[Playlist] {
        match self {
            PlaylistsState::Loaded(items) => items,
            _ => &[],
        }
    }
}

impl QueueState {
    pub fn has_selection(&self) -> bool {
        self.selected_playlist_id.is_some()
    }

    pub fn has_video(&self) -> bool {
        self.current_index.is_some()
    }

    pub fn current_video(&self) -> Option<&VideoItem> {
        self.current_index.and_then(|i| self.videos.get(i))
    }

    pub fn is_selected(&self, playlist_id: Uuid) -> bool {
        self.selected_playlist_id == Some(playlist_id)
    }
}

impl PlayerState {
    /// The external video id this state concerns, if any
    pub fn video_id(&self) -> Option<&str> {
        match self {
            PlayerState::Loading { video_id, .. }
            | PlayerState::Buffering { video_id }
            | PlayerState::Playing { video_id }
            | PlayerState::Paused { video_id } => Some(video_id),
            PlayerState::Empty | PlayerState::Error { .. } => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PlayerState::Loading { .. })
    }
}
