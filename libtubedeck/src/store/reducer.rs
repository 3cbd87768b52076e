//! Pure reducer function for state transitions
//!
//! The reducer is a pure function: `(State, Action) -> State`.
//!
//! It has NO side effects - it only computes new state values. Repository
//! calls and player commands happen in the effect runner (see `effects.rs`).

use uuid::Uuid;

use super::actions::Action;
use super::state::{PlayerState, PlaylistsState, QueueState, TubeDeckState};
use crate::player::codes;
use crate::types::VideoItem;

/// Pure reducer function
///
/// Takes current state and an action, returns new state. Total over the
/// action set: anything without a transition returns the state unchanged.
///
/// # Purity Guarantees
///
/// - No database calls
/// - No player commands
/// - No awaiting
/// - Deterministic (same inputs -> same output)
pub fn reduce(state: TubeDeckState, action: Action) -> TubeDeckState {
    match action {
        // === Lifecycle ===
        Action::Initialize => TubeDeckState {
            playlists: PlaylistsState::Loading,
            ..state
        },

        // === Load Results ===
        Action::PlaylistsLoaded(items) => TubeDeckState {
            playlists: PlaylistsState::from_items(items),
            ..state
        },

        Action::PlaylistLoaded(playlist) => TubeDeckState {
            queue: QueueState {
                selected_playlist_id: Some(playlist.id),
                videos: playlist.sorted_videos(),
                current_index: None,
            },
            ..state
        },

        // === Selection ===
        Action::SelectPlaylist(playlist_id) => TubeDeckState {
            // Clear stale queue/player before the new videos arrive
            queue: QueueState {
                selected_playlist_id: Some(playlist_id),
                videos: Vec::new(),
                current_index: None,
            },
            player: PlayerState::Empty,
            ..state
        },

        Action::SelectVideo { index, autoplay } => reduce_select_video(state, index, autoplay),

        Action::SortChanged { old_index, new_index } => {
            reduce_sort_changed(state, old_index, new_index)
        }

        // === Player Callbacks ===
        Action::PlayerStateChanged { yt_state, video_id } => {
            reduce_player_state_changed(state, yt_state, video_id)
        }

        // Advancing is an effect
        Action::VideoEnded => state,

        // === Collection Edits ===
        Action::DeletePlaylist(playlist_id) if state.queue.is_selected(playlist_id) => {
            TubeDeckState {
                queue: QueueState::default(),
                player: PlayerState::Empty,
                ..state
            }
        }
        Action::DeletePlaylist(_) => state,

        Action::RemoveVideo { playlist_id, video_id } => {
            reduce_remove_video(state, playlist_id, video_id)
        }

        // Handled purely as effects
        Action::CreatePlaylist { .. } | Action::AddVideo { .. } | Action::RenamePlaylist { .. } => {
            state
        }

        // === Error Surface ===
        Action::OperationFailed(message) => {
            let playlists = match state.playlists {
                PlaylistsState::Loading => PlaylistsState::Error(message.clone()),
                other => other,
            };
            TubeDeckState {
                playlists,
                player: PlayerState::Error { message },
                ..state
            }
        }
    }
}

fn reduce_select_video(state: TubeDeckState, index: usize, autoplay: bool) -> TubeDeckState {
    let Some(video) = state.queue.videos.get(index) else {
        return state;
    };

    let player = PlayerState::Loading {
        video_id: video.youtube_id.clone(),
        autoplay,
    };

    TubeDeckState {
        queue: QueueState {
            current_index: Some(index),
            ..state.queue
        },
        player,
        ..state
    }
}

/// Move one queue entry, keeping `current_index` on the same logical video
fn reduce_sort_changed(state: TubeDeckState, old_index: usize, new_index: usize) -> TubeDeckState {
    let len = state.queue.videos.len();
    if len == 0 || old_index == new_index || old_index >= len || new_index >= len {
        return state;
    }

    let mut videos = state.queue.videos.clone();
    let moved = videos.remove(old_index);
    videos.insert(new_index, moved);

    let current_index = state.queue.current_index.map(|ci| {
        if ci == old_index {
            new_index
        } else if old_index < ci && new_index >= ci {
            ci - 1
        } else if old_index > ci && new_index <= ci {
            ci + 1
        } else {
            ci
        }
    });

    renumber(&mut videos);

    TubeDeckState {
        queue: QueueState {
            videos,
            current_index,
            ..state.queue
        },
        ..state
    }
}

/// Reconcile a player callback against the video we expect it to concern
///
/// Callbacks arrive out of band and may describe a video that is no longer
/// active; those are dropped.
fn reduce_player_state_changed(
    state: TubeDeckState,
    yt_state: i32,
    video_id: Option<String>,
) -> TubeDeckState {
    let expected = state.player.video_id().map(str::to_string);
    let id = video_id.or_else(|| expected.clone());

    let id = match (state.player.is_loading(), id) {
        (true, Some(id)) => id,
        (true, None) => return state,
        (false, Some(id)) if expected.as_deref() == Some(id.as_str()) => id,
        _ => {
            tracing::debug!(yt_state, expected = ?expected, "dropping stale player event");
            return state;
        }
    };

    let player = match yt_state {
        codes::BUFFERING => PlayerState::Buffering { video_id: id },
        codes::PLAYING => PlayerState::Playing { video_id: id },
        // Paused, cued and ended all render as paused
        codes::PAUSED | codes::CUED | codes::ENDED => PlayerState::Paused { video_id: id },
        _ => return state,
    };

    TubeDeckState { player, ..state }
}

fn reduce_remove_video(state: TubeDeckState, playlist_id: Uuid, video_id: Uuid) -> TubeDeckState {
    if !state.queue.is_selected(playlist_id) {
        return state;
    }
    let Some(removed) = state.queue.videos.iter().position(|v| v.id == video_id) else {
        return state;
    };

    let mut videos = state.queue.videos.clone();
    videos.remove(removed);
    renumber(&mut videos);

    let (current_index, player) = match state.queue.current_index {
        Some(ci) if ci == removed => (None, PlayerState::Empty),
        Some(ci) if removed < ci => (Some(ci - 1), state.player),
        other => (other, state.player),
    };

    TubeDeckState {
        queue: QueueState {
            videos,
            current_index,
            ..state.queue
        },
        player,
        ..state
    }
}

/// Reassign every position to its 0-based index
fn renumber(videos: &mut [VideoItem]) {
    for (i, video) in videos.iter_mut().enumerate() {
        video.position = i as i32;
    }
}
