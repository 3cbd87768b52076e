//! Actions for the reducer pattern
//!
//! All state transitions are triggered by actions: user intents, results of
//! repository loads, and callbacks from the embedded player.

use uuid::Uuid;

use crate::types::Playlist;

/// Actions that trigger state transitions
///
/// The reducer (see `reducer.rs`) applies an action to the state; the effect
/// runner (see `effects.rs`) performs the I/O it implies afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // === Lifecycle ===
    /// Load the playlist directory and select the first playlist
    Initialize,

    // === Load Results ===
    /// The playlist directory was fetched
    PlaylistsLoaded(Vec<Playlist>),

    /// A single playlist (with videos) was fetched
    PlaylistLoaded(Playlist),

    // === User Intents ===
    /// Create a playlist and select it
    CreatePlaylist {
        name: String,
        description: Option<String>,
    },

    /// Add a video by URL to a playlist and select it
    AddVideo {
        playlist_id: Uuid,
        url: String,
        title: String,
    },

    /// Change a playlist's name and description
    RenamePlaylist {
        playlist_id: Uuid,
        name: String,
        description: String,
    },

    /// Delete a playlist with its videos
    DeletePlaylist(Uuid),

    /// Remove one video from a playlist
    RemoveVideo {
        playlist_id: Uuid,
        video_id: Uuid,
    },

    /// Make a playlist the queue source
    SelectPlaylist(Uuid),

    /// Point the queue at a video and load it into the player
    SelectVideo {
        index: usize,
        autoplay: bool,
    },

    /// A queue entry was dragged from `old_index` to `new_index`
    SortChanged {
        old_index: usize,
        new_index: usize,
    },

    // === Player Callbacks ===
    /// The embedded player reported a numeric state code
    PlayerStateChanged {
        yt_state: i32,
        video_id: Option<String>,
    },

    /// The current video played to the end
    VideoEnded,

    // === Error Surface ===
    /// An effect could not complete
    OperationFailed(String),
}

impl Action {
    /// Short action name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Action::Initialize => "initialize",
            Action::PlaylistsLoaded(_) => "playlists_loaded",
            Action::PlaylistLoaded(_) => "playlist_loaded",
            Action::CreatePlaylist { .. } => "create_playlist",
            Action::AddVideo { .. } => "add_video",
            Action::RenamePlaylist { .. } => "rename_playlist",
            Action::DeletePlaylist(_) => "delete_playlist",
            Action::RemoveVideo { .. } => "remove_video",
            Action::SelectPlaylist(_) => "select_playlist",
            Action::SelectVideo { .. } => "select_video",
            Action::SortChanged { .. } => "sort_changed",
            Action::PlayerStateChanged { .. } => "player_state_changed",
            Action::VideoEnded => "video_ended",
            Action::OperationFailed(_) => "operation_failed",
        }
    }
}
