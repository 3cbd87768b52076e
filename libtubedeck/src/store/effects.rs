//! Effect runner
//!
//! Runs once per dispatched action, after the reducer has applied it and the
//! new snapshot was published. Effects read the post-transition state, talk to
//! the repository and the player, and may dispatch follow-up actions.
//!
//! Recoverable problems (unknown playlist, unusable URL) become an
//! `OperationFailed` dispatch. Repository and player errors propagate to the
//! caller of `dispatch`.

use uuid::Uuid;

use super::actions::Action;
use super::Store;
use crate::error::{Result, TubeDeckError};
use crate::types::{Playlist, VideoItem};
use crate::youtube;

pub(super) async fn run(store: &Store, action: Action) -> Result<()> {
    match action {
        Action::Initialize => {
            let playlists = store.repo().list_playlists().await?;
            let first = playlists.first().map(|p| p.id);
            store.dispatch(Action::PlaylistsLoaded(playlists)).await?;

            if let Some(id) = first {
                store.dispatch(Action::SelectPlaylist(id)).await?;
            }
            Ok(())
        }

        Action::SelectPlaylist(playlist_id) => {
            let Some(playlist) = store.repo().get_playlist(playlist_id).await? else {
                return fail(store, not_found(playlist_id)).await;
            };

            let has_videos = !playlist.videos.is_empty();
            store.dispatch(Action::PlaylistLoaded(playlist)).await?;

            if has_videos {
                store
                    .dispatch(Action::SelectVideo { index: 0, autoplay: false })
                    .await?;
            }
            Ok(())
        }

        Action::SelectVideo { index, autoplay } => {
            let state = store.state().await;
            if let Some(video) = state.queue.videos.get(index) {
                store.player().load_video(&video.youtube_id, autoplay).await?;
            }
            Ok(())
        }

        Action::SortChanged { .. } => {
            let state = store.state().await;
            if let Some(playlist_id) = state.queue.selected_playlist_id {
                store
                    .repo()
                    .update_video_positions(playlist_id, &state.queue.videos)
                    .await?;
                tracing::info!(%playlist_id, "saved queue order");
            }
            Ok(())
        }

        Action::VideoEnded => {
            let state = store.state().await;
            if let Some(current) = state.queue.current_index {
                if current + 1 < state.queue.videos.len() {
                    store
                        .dispatch(Action::SelectVideo { index: current + 1, autoplay: true })
                        .await?;
                }
            }
            Ok(())
        }

        Action::AddVideo { playlist_id, url, title } => {
            add_video(store, playlist_id, &url, title).await
        }

        Action::CreatePlaylist { name, description } => {
            let playlist = Playlist::new(name, description.unwrap_or_default());
            let playlist_id = playlist.id;
            store.repo().create_playlist(&playlist).await?;
            tracing::info!(%playlist_id, name = %playlist.name, "created playlist");

            reload_directory(store).await?;
            store.dispatch(Action::SelectPlaylist(playlist_id)).await
        }

        Action::RenamePlaylist { playlist_id, name, description } => {
            let Some(mut playlist) = store.repo().get_playlist(playlist_id).await? else {
                return fail(store, not_found(playlist_id)).await;
            };

            playlist.name = name;
            playlist.description = description;
            playlist.updated_at = chrono::Utc::now().timestamp();
            store.repo().update_playlist(&playlist).await?;
            tracing::info!(%playlist_id, "renamed playlist");

            reload_directory(store).await?;
            Ok(())
        }

        Action::DeletePlaylist(playlist_id) => {
            store.repo().delete_playlist(playlist_id).await?;
            tracing::info!(%playlist_id, "deleted playlist");

            let first = reload_directory(store).await?;
            if !store.state().await.queue.has_selection() {
                if let Some(id) = first {
                    store.dispatch(Action::SelectPlaylist(id)).await?;
                }
            }
            Ok(())
        }

        Action::RemoveVideo { playlist_id, video_id } => {
            store.repo().remove_video(playlist_id, video_id).await?;
            tracing::info!(%playlist_id, %video_id, "removed video");

            let state = store.state().await;
            if state.queue.is_selected(playlist_id) {
                store
                    .repo()
                    .update_video_positions(playlist_id, &state.queue.videos)
                    .await?;
            }

            reload_directory(store).await?;
            Ok(())
        }

        Action::OperationFailed(message) => {
            tracing::warn!(%message, "operation failed");
            Ok(())
        }

        Action::PlaylistsLoaded(_)
        | Action::PlaylistLoaded(_)
        | Action::PlayerStateChanged { .. } => Ok(()),
    }
}

async fn add_video(store: &Store, playlist_id: Uuid, url: &str, title: String) -> Result<()> {
    let youtube_id = match youtube::extract_video_id(url) {
        Ok(id) => id,
        Err(TubeDeckError::InvalidInput(message)) => return fail(store, message).await,
        Err(e) => return Err(e),
    };

    let Some(playlist) = store.repo().get_playlist(playlist_id).await? else {
        return fail(store, not_found(playlist_id)).await;
    };

    let title = if title.trim().is_empty() {
        youtube_id.clone()
    } else {
        title
    };
    let thumbnail = youtube::thumbnail_url(&youtube_id, store.thumbnail_quality());
    let video = VideoItem::new(playlist_id, youtube_id, title, thumbnail)
        .with_position(playlist.next_position());

    store.repo().add_video(playlist_id, &video).await?;
    tracing::info!(%playlist_id, youtube_id = %video.youtube_id, "added video");

    let Some(playlist) = store.repo().get_playlist(playlist_id).await? else {
        return fail(store, not_found(playlist_id)).await;
    };

    let index = playlist
        .sorted_videos()
        .iter()
        .position(|v| v.id == video.id);
    store.dispatch(Action::PlaylistLoaded(playlist)).await?;

    if let Some(index) = index {
        store
            .dispatch(Action::SelectVideo { index, autoplay: false })
            .await?;
    }
    Ok(())
}

/// Re-fetch the directory and publish it; returns the first playlist's id
async fn reload_directory(store: &Store) -> Result<Option<Uuid>> {
    let playlists = store.repo().list_playlists().await?;
    let first = playlists.first().map(|p| p.id);
    store.dispatch(Action::PlaylistsLoaded(playlists)).await?;
    Ok(first)
}

async fn fail(store: &Store, message: String) -> Result<()> {
    store.dispatch(Action::OperationFailed(message)).await
}

fn not_found(playlist_id: Uuid) -> String {
    format!("Playlist {} not found", playlist_id)
}
