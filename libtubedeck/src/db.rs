//! Database operations for TubeDeck
//!
//! SQLite-backed [`PlaylistRepository`]. Foreign keys are enforced, so
//! deleting a playlist cascades to its videos.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

use crate::error::{DbError, Result};
use crate::repository::PlaylistRepository;
use crate::types::{Playlist, VideoItem};

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection
    pub async fn new(db_path: &str) -> Result<Self> {
        // Expand path and create parent directories
        let expanded_path = shellexpand::tilde(db_path).to_string();
        let path = Path::new(&expanded_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(DbError::IoError)?;
        }

        // Forward slashes work on both Windows and Unix; mode=rwc creates the file
        let db_url = format!("sqlite://{}?mode=rwc", expanded_path.replace('\\', "/"));

        let pool = SqlitePool::connect(&db_url)
            .await
            .map_err(DbError::SqlxError)?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, running migrations on it
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(DbError::MigrationError)?;

        Ok(Self { pool })
    }

    async fn playlist_exists(&self, id: Uuid) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM playlists WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::SqlxError)?;
        Ok(row.is_some())
    }

    async fn videos_for(&self, playlist_id: Uuid) -> Result<Vec<VideoItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, playlist_id, youtube_id, title, thumbnail_url, duration_secs, added_at, position
            FROM video_items
            WHERE playlist_id = ?
            "#,
        )
        .bind(playlist_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        rows.iter().map(video_from_row).collect()
    }
}

#[async_trait]
impl PlaylistRepository for Database {
    async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM playlists
            ORDER BY created_at, rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        let mut playlists = rows
            .iter()
            .map(playlist_from_row)
            .collect::<Result<Vec<_>>>()?;

        let video_rows = sqlx::query(
            r#"
            SELECT id, playlist_id, youtube_id, title, thumbnail_url, duration_secs, added_at, position
            FROM video_items
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        let mut by_playlist: HashMap<Uuid, Vec<VideoItem>> = HashMap::new();
        for row in &video_rows {
            let video = video_from_row(row)?;
            by_playlist.entry(video.playlist_id).or_default().push(video);
        }

        for playlist in &mut playlists {
            playlist.videos = by_playlist.remove(&playlist.id).unwrap_or_default();
        }

        Ok(playlists)
    }

    async fn get_playlist(&self, id: Uuid) -> Result<Option<Playlist>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM playlists WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut playlist = playlist_from_row(&row)?;
        playlist.videos = self.videos_for(id).await?;
        Ok(Some(playlist))
    }

    async fn create_playlist(&self, playlist: &Playlist) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(DbError::SqlxError)?;

        sqlx::query(
            r#"
            INSERT INTO playlists (id, name, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(playlist.id.to_string())
        .bind(&playlist.name)
        .bind(&playlist.description)
        .bind(playlist.created_at)
        .bind(playlist.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(DbError::SqlxError)?;

        for video in &playlist.videos {
            insert_video(&mut tx, playlist.id, video).await?;
        }

        tx.commit().await.map_err(DbError::SqlxError)?;
        Ok(())
    }

    async fn update_playlist(&self, playlist: &Playlist) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE playlists SET name = ?, description = ?, updated_at = ? WHERE id = ?
            "#,
        )
        .bind(&playlist.name)
        .bind(&playlist.description)
        .bind(playlist.updated_at)
        .bind(playlist.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        Ok(())
    }

    async fn delete_playlist(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM playlists WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(DbError::SqlxError)?;

        Ok(())
    }

    async fn add_video(&self, playlist_id: Uuid, video: &VideoItem) -> Result<()> {
        if !self.playlist_exists(playlist_id).await? {
            tracing::debug!(%playlist_id, "add_video: playlist does not exist");
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(DbError::SqlxError)?;
        insert_video(&mut tx, playlist_id, video).await?;
        tx.commit().await.map_err(DbError::SqlxError)?;
        Ok(())
    }

    async fn remove_video(&self, playlist_id: Uuid, video_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM video_items WHERE id = ? AND playlist_id = ?")
            .bind(video_id.to_string())
            .bind(playlist_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(DbError::SqlxError)?;

        Ok(())
    }

    async fn update_video_positions(&self, playlist_id: Uuid, videos: &[VideoItem]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(DbError::SqlxError)?;

        for video in videos {
            sqlx::query("UPDATE video_items SET position = ? WHERE id = ? AND playlist_id = ?")
                .bind(video.position)
                .bind(video.id.to_string())
                .bind(playlist_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(DbError::SqlxError)?;
        }

        tx.commit().await.map_err(DbError::SqlxError)?;
        Ok(())
    }
}

async fn insert_video(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    playlist_id: Uuid,
    video: &VideoItem,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO video_items (id, playlist_id, youtube_id, title, thumbnail_url, duration_secs, added_at, position)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(video.id.to_string())
    .bind(playlist_id.to_string())
    .bind(&video.youtube_id)
    .bind(&video.title)
    .bind(&video.thumbnail_url)
    .bind(video.duration_secs)
    .bind(video.added_at)
    .bind(video.position)
    .execute(&mut **tx)
    .await
    .map_err(DbError::SqlxError)?;

    Ok(())
}

fn parse_id(row: &SqliteRow, column: &str) -> Result<Uuid> {
    let raw: String = row.get(column);
    Uuid::parse_str(&raw)
        .map_err(|e| DbError::Corrupt(format!("{} '{}': {}", column, raw, e)).into())
}

fn playlist_from_row(row: &SqliteRow) -> Result<Playlist> {
    Ok(Playlist {
        id: parse_id(row, "id")?,
        name: row.get("name"),
        description: row.get("description"),
        videos: Vec::new(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn video_from_row(row: &SqliteRow) -> Result<VideoItem> {
    Ok(VideoItem {
        id: parse_id(row, "id")?,
        youtube_id: row.get("youtube_id"),
        title: row.get("title"),
        thumbnail_url: row.get("thumbnail_url"),
        duration_secs: row.get("duration_secs"),
        added_at: row.get("added_at"),
        position: row.get("position"),
        playlist_id: parse_id(row, "playlist_id")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TubeDeckError;
    use tempfile::TempDir;

    async fn memory_db() -> Database {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        Database::from_pool(pool).await.unwrap()
    }

    fn playlist_with(name: &str, ids: &[&str]) -> Playlist {
        let mut playlist = Playlist::new(name.to_string(), format!("{} description", name));
        let pid = playlist.id;
        playlist.videos = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                VideoItem::new(pid, id.to_string(), id.to_uppercase(), String::new())
                    .with_position(i as i32)
            })
            .collect();
        playlist
    }

    #[tokio::test]
    async fn test_database_initialization_with_invalid_path() {
        #[cfg(unix)]
        let invalid_path = "/tmp/test\0invalid.db";

        #[cfg(windows)]
        let invalid_path = "C:\\invalid<>path\\test.db";

        let result = Database::new(invalid_path).await;
        assert!(matches!(result, Err(TubeDeckError::Database(_))));
    }

    #[tokio::test]
    async fn test_database_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("dir").join("playlists.db");

        let db = Database::new(db_path.to_str().unwrap()).await.unwrap();
        assert!(db_path.exists());
        assert!(db.list_playlists().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_and_get_playlist_with_videos() {
        let db = memory_db().await;
        let playlist = playlist_with("road trip", &["a", "b"]);
        db.create_playlist(&playlist).await.unwrap();

        let stored = db.get_playlist(playlist.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "road trip");
        assert_eq!(stored.description, "road trip description");
        assert_eq!(stored.sorted_videos(), playlist.sorted_videos());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_id() {
        let db = memory_db().await;
        let playlist = playlist_with("once", &[]);
        db.create_playlist(&playlist).await.unwrap();

        assert!(db.create_playlist(&playlist).await.is_err());
        assert_eq!(db.list_playlists().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_playlist() {
        let db = memory_db().await;
        assert!(db.get_playlist(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_groups_videos_by_playlist() {
        let db = memory_db().await;
        let first = playlist_with("first", &["a", "b"]);
        let second = playlist_with("second", &["c"]);
        db.create_playlist(&first).await.unwrap();
        db.create_playlist(&second).await.unwrap();

        let playlists = db.list_playlists().await.unwrap();
        assert_eq!(playlists.len(), 2);
        assert_eq!(playlists[0].id, first.id);
        assert_eq!(playlists[0].videos.len(), 2);
        assert_eq!(playlists[1].videos.len(), 1);
        assert_eq!(playlists[1].videos[0].playlist_id, second.id);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_videos() {
        let db = memory_db().await;
        let playlist = playlist_with("doomed", &["a", "b"]);
        db.create_playlist(&playlist).await.unwrap();

        db.delete_playlist(playlist.id).await.unwrap();
        assert!(db.get_playlist(playlist.id).await.unwrap().is_none());

        let orphans = sqlx::query("SELECT COUNT(*) AS n FROM video_items")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(orphans.get::<i64, _>("n"), 0);

        // Absent playlist is a no-op
        db.delete_playlist(playlist.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_add_video_to_missing_playlist_is_noop() {
        let db = memory_db().await;
        let video = VideoItem::new(Uuid::new_v4(), "a".to_string(), "A".to_string(), String::new());
        db.add_video(Uuid::new_v4(), &video).await.unwrap();

        let count = sqlx::query("SELECT COUNT(*) AS n FROM video_items")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(count.get::<i64, _>("n"), 0);
    }

    #[tokio::test]
    async fn test_add_video_assigns_playlist() {
        let db = memory_db().await;
        let playlist = playlist_with("p", &[]);
        db.create_playlist(&playlist).await.unwrap();

        let video = VideoItem::new(Uuid::new_v4(), "a".to_string(), "A".to_string(), String::new());
        db.add_video(playlist.id, &video).await.unwrap();

        let stored = db.get_playlist(playlist.id).await.unwrap().unwrap();
        assert_eq!(stored.videos.len(), 1);
        assert_eq!(stored.videos[0].id, video.id);
        assert_eq!(stored.videos[0].playlist_id, playlist.id);
    }

    #[tokio::test]
    async fn test_remove_video() {
        let db = memory_db().await;
        let playlist = playlist_with("p", &["a", "b"]);
        db.create_playlist(&playlist).await.unwrap();

        // Wrong playlist: no-op
        db.remove_video(Uuid::new_v4(), playlist.videos[0].id).await.unwrap();
        assert_eq!(db.get_playlist(playlist.id).await.unwrap().unwrap().videos.len(), 2);

        db.remove_video(playlist.id, playlist.videos[0].id).await.unwrap();
        let stored = db.get_playlist(playlist.id).await.unwrap().unwrap();
        assert_eq!(stored.videos.len(), 1);
        assert_eq!(stored.videos[0].youtube_id, "b");
    }

    #[tokio::test]
    async fn test_update_video_positions() {
        let db = memory_db().await;
        let playlist = playlist_with("p", &["a", "b", "c"]);
        db.create_playlist(&playlist).await.unwrap();

        let mut reordered = playlist.sorted_videos();
        reordered.rotate_left(1);
        for (i, video) in reordered.iter_mut().enumerate() {
            video.position = i as i32;
        }
        db.update_video_positions(playlist.id, &reordered).await.unwrap();

        let order: Vec<_> = db
            .get_playlist(playlist.id)
            .await
            .unwrap()
            .unwrap()
            .sorted_videos()
            .into_iter()
            .map(|v| v.youtube_id)
            .collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_update_playlist() {
        let db = memory_db().await;
        let mut playlist = playlist_with("old", &[]);
        db.create_playlist(&playlist).await.unwrap();

        playlist.name = "new".to_string();
        playlist.description = "fresh".to_string();
        playlist.updated_at += 10;
        db.update_playlist(&playlist).await.unwrap();

        let stored = db.get_playlist(playlist.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "new");
        assert_eq!(stored.description, "fresh");
        assert_eq!(stored.updated_at, playlist.updated_at);
        assert_eq!(stored.created_at, playlist.created_at);
    }

    #[tokio::test]
    async fn test_corrupt_id_is_reported() {
        let db = memory_db().await;
        sqlx::query(
            "INSERT INTO playlists (id, name, description, created_at, updated_at) VALUES ('nope', 'x', '', 0, 0)",
        )
        .execute(&db.pool)
        .await
        .unwrap();

        let err = db.list_playlists().await.unwrap_err();
        assert!(matches!(err, TubeDeckError::Database(DbError::Corrupt(_))));
    }
}
