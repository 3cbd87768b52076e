//! Playlist persistence abstraction
//!
//! The store talks to persistence only through [`PlaylistRepository`]. Two
//! implementations ship with the library: [`crate::db::Database`] (SQLite) and
//! [`MemoryRepository`], an in-process map used by tests and demos.
//!
//! # Examples
//!
//! ```no_run
//! use libtubedeck::repository::{MemoryRepository, PlaylistRepository};
//! use libtubedeck::Playlist;
//!
//! # async fn example() -> libtubedeck::Result<()> {
//! let repo = MemoryRepository::new();
//! let playlist = Playlist::new("Lo-fi".to_string(), String::new());
//! repo.create_playlist(&playlist).await?;
//!
//! let loaded = repo.get_playlist(playlist.id).await?;
//! assert!(loaded.is_some());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{DbError, Result};
use crate::types::{Playlist, VideoItem};

/// Persistence contract for playlists and their videos
///
/// Writes follow last-write-wins semantics. Operations addressing a missing
/// playlist or video are silent no-ops rather than errors.
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    /// All playlists with their videos
    ///
    /// Video order inside each playlist is unspecified; callers sort by
    /// `position`.
    async fn list_playlists(&self) -> Result<Vec<Playlist>>;

    /// A single playlist with its videos, or `None` if it does not exist
    async fn get_playlist(&self, id: Uuid) -> Result<Option<Playlist>>;

    /// Insert a new playlist together with any videos it already holds
    async fn create_playlist(&self, playlist: &Playlist) -> Result<()>;

    /// Update name, description and `updated_at`
    async fn update_playlist(&self, playlist: &Playlist) -> Result<()>;

    /// Delete a playlist and, by cascade, its videos
    async fn delete_playlist(&self, id: Uuid) -> Result<()>;

    /// Attach a video to a playlist
    ///
    /// The stored video's `playlist_id` is set to `playlist_id` regardless of
    /// the value carried by `video`.
    async fn add_video(&self, playlist_id: Uuid, video: &VideoItem) -> Result<()>;

    /// Detach and delete a video
    async fn remove_video(&self, playlist_id: Uuid, video_id: Uuid) -> Result<()>;

    /// Persist the `position` of each given video
    ///
    /// Videos not belonging to the playlist are ignored.
    async fn update_video_positions(&self, playlist_id: Uuid, videos: &[VideoItem]) -> Result<()>;
}

/// In-memory repository
///
/// Keeps playlists keyed by id; `list_playlists` returns them in creation
/// order. A repository built with [`MemoryRepository::failing`] rejects every
/// call, which lets tests exercise persistence failures.
#[derive(Default)]
pub struct MemoryRepository {
    playlists: Mutex<BTreeMap<u64, Playlist>>,
    next_key: Mutex<u64>,
    failure: Option<String>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with the given playlists, in order
    pub fn with_playlists(playlists: Vec<Playlist>) -> Self {
        let count = playlists.len() as u64;
        let map = playlists
            .into_iter()
            .enumerate()
            .map(|(i, p)| (i as u64, p))
            .collect();
        Self {
            playlists: Mutex::new(map),
            next_key: Mutex::new(count),
            failure: None,
        }
    }

    /// Repository whose every operation fails with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(DbError::IoError(std::io::Error::other(message.clone())).into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PlaylistRepository for MemoryRepository {
    async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        self.check()?;
        Ok(self.playlists.lock().await.values().cloned().collect())
    }

    async fn get_playlist(&self, id: Uuid) -> Result<Option<Playlist>> {
        self.check()?;
        Ok(self
            .playlists
            .lock()
            .await
            .values()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn create_playlist(&self, playlist: &Playlist) -> Result<()> {
        self.check()?;
        let mut next_key = self.next_key.lock().await;
        let mut playlists = self.playlists.lock().await;
        if playlists.values().any(|p| p.id == playlist.id) {
            let message = format!("playlist {} already exists", playlist.id);
            return Err(DbError::IoError(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                message,
            ))
            .into());
        }
        playlists.insert(*next_key, playlist.clone());
        *next_key += 1;
        Ok(())
    }

    async fn update_playlist(&self, playlist: &Playlist) -> Result<()> {
        self.check()?;
        let mut playlists = self.playlists.lock().await;
        if let Some(existing) = playlists.values_mut().find(|p| p.id == playlist.id) {
            existing.name = playlist.name.clone();
            existing.description = playlist.description.clone();
            existing.updated_at = playlist.updated_at;
        }
        Ok(())
    }

    async fn delete_playlist(&self, id: Uuid) -> Result<()> {
        self.check()?;
        self.playlists.lock().await.retain(|_, p| p.id != id);
        Ok(())
    }

    async fn add_video(&self, playlist_id: Uuid, video: &VideoItem) -> Result<()> {
        self.check()?;
        let mut playlists = self.playlists.lock().await;
        if let Some(playlist) = playlists.values_mut().find(|p| p.id == playlist_id) {
            let mut video = video.clone();
            video.playlist_id = playlist_id;
            playlist.videos.push(video);
        }
        Ok(())
    }

    async fn remove_video(&self, playlist_id: Uuid, video_id: Uuid) -> Result<()> {
        self.check()?;
        let mut playlists = self.playlists.lock().await;
        if let Some(playlist) = playlists.values_mut().find(|p| p.id == playlist_id) {
            playlist.videos.retain(|v| v.id != video_id);
        }
        Ok(())
    }

    async fn update_video_positions(&self, playlist_id: Uuid, videos: &[VideoItem]) -> Result<()> {
        self.check()?;
        let mut playlists = self.playlists.lock().await;
        if let Some(playlist) = playlists.values_mut().find(|p| p.id == playlist_id) {
            for update in videos {
                if let Some(existing) = playlist.videos.iter_mut().find(|v| v.id == update.id) {
                    existing.position = update.position;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist_with(name: &str, ids: &[&str]) -> Playlist {
        let mut playlist = Playlist::new(name.to_string(), String::new());
        let pid = playlist.id;
        playlist.videos = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                VideoItem::new(pid, id.to_string(), id.to_string(), String::new())
                    .with_position(i as i32)
            })
            .collect();
        playlist
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_id() {
        let repo = MemoryRepository::new();
        let playlist = playlist_with("once", &["a"]);
        repo.create_playlist(&playlist).await.unwrap();

        let err = repo.create_playlist(&playlist).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(repo.list_playlists().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_preserves_creation_order() {
        let repo = MemoryRepository::new();
        let first = playlist_with("first", &[]);
        let second = playlist_with("second", &[]);
        repo.create_playlist(&first).await.unwrap();
        repo.create_playlist(&second).await.unwrap();

        let names: Vec<_> = repo
            .list_playlists()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_add_video_sets_owner_and_ignores_missing_playlist() {
        let playlist = playlist_with("p", &[]);
        let repo = MemoryRepository::with_playlists(vec![playlist.clone()]);

        let stray = VideoItem::new(Uuid::new_v4(), "abc".to_string(), "t".to_string(), String::new());
        repo.add_video(playlist.id, &stray).await.unwrap();
        repo.add_video(Uuid::new_v4(), &stray).await.unwrap();

        let stored = repo.get_playlist(playlist.id).await.unwrap().unwrap();
        assert_eq!(stored.videos.len(), 1);
        assert_eq!(stored.videos[0].playlist_id, playlist.id);
    }

    #[tokio::test]
    async fn test_update_video_positions_only_touches_known_videos() {
        let playlist = playlist_with("p", &["a", "b"]);
        let repo = MemoryRepository::with_playlists(vec![playlist.clone()]);

        let mut reordered = playlist.videos.clone();
        reordered[0].position = 1;
        reordered[1].position = 0;
        reordered.push(VideoItem::new(playlist.id, "ghost".to_string(), String::new(), String::new()));
        repo.update_video_positions(playlist.id, &reordered).await.unwrap();

        let stored = repo.get_playlist(playlist.id).await.unwrap().unwrap();
        assert_eq!(stored.videos.len(), 2);
        let order: Vec<_> = stored.sorted_videos().into_iter().map(|v| v.youtube_id).collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_delete_and_remove_are_noops_when_absent() {
        let playlist = playlist_with("p", &["a"]);
        let repo = MemoryRepository::with_playlists(vec![playlist.clone()]);

        repo.delete_playlist(Uuid::new_v4()).await.unwrap();
        repo.remove_video(playlist.id, Uuid::new_v4()).await.unwrap();
        assert_eq!(repo.list_playlists().await.unwrap().len(), 1);

        repo.remove_video(playlist.id, playlist.videos[0].id).await.unwrap();
        repo.delete_playlist(playlist.id).await.unwrap();
        assert!(repo.list_playlists().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failing_repository_rejects_calls() {
        let repo = MemoryRepository::failing("disk full");
        let err = repo.list_playlists().await.unwrap_err();
        assert!(err.to_string().contains("disk full"));
    }
}
