//! Embedded player command sink
//!
//! The player is an external black box. The store sends it exactly one kind
//! of command, [`PlayerSink::load_video`]; the player reports back out of band
//! with numeric state codes (see [`codes`]) which enter the store as
//! `Action::PlayerStateChanged`.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{PlayerError, Result};

/// Numeric state codes reported by the embedded player
pub mod codes {
    pub const UNSTARTED: i32 = -1;
    pub const ENDED: i32 = 0;
    pub const PLAYING: i32 = 1;
    pub const PAUSED: i32 = 2;
    pub const BUFFERING: i32 = 3;
    pub const CUED: i32 = 5;
}

/// Outbound command surface of the embedded player
#[async_trait]
pub trait PlayerSink: Send + Sync {
    /// Load a video by its external id, starting playback if `autoplay`
    async fn load_video(&self, youtube_id: &str, autoplay: bool) -> Result<()>;
}

/// A `load_video` command as received by a [`RecordingPlayer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadCommand {
    pub youtube_id: String,
    pub autoplay: bool,
}

/// Player sink that records every command
///
/// Available in all builds so integration tests and demos can assert on the
/// exact command stream.
#[derive(Default)]
pub struct RecordingPlayer {
    commands: Mutex<Vec<LoadCommand>>,
    failure: Option<String>,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A player that rejects every command with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// All commands received so far, oldest first
    pub async fn commands(&self) -> Vec<LoadCommand> {
        self.commands.lock().await.clone()
    }
}

#[async_trait]
impl PlayerSink for RecordingPlayer {
    async fn load_video(&self, youtube_id: &str, autoplay: bool) -> Result<()> {
        if let Some(message) = &self.failure {
            return Err(PlayerError::Command(message.clone()).into());
        }
        self.commands.lock().await.push(LoadCommand {
            youtube_id: youtube_id.to_string(),
            autoplay,
        });
        Ok(())
    }
}

/// Player sink for headless use: each command becomes a tracing event
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingPlayer;

#[async_trait]
impl PlayerSink for LoggingPlayer {
    async fn load_video(&self, youtube_id: &str, autoplay: bool) -> Result<()> {
        tracing::info!(youtube_id, autoplay, "player: load video");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_player_keeps_order() {
        let player = RecordingPlayer::new();
        player.load_video("a", false).await.unwrap();
        player.load_video("b", true).await.unwrap();

        let commands = player.commands().await;
        assert_eq!(
            commands,
            vec![
                LoadCommand { youtube_id: "a".to_string(), autoplay: false },
                LoadCommand { youtube_id: "b".to_string(), autoplay: true },
            ]
        );
    }

    #[tokio::test]
    async fn test_failing_player() {
        let player = RecordingPlayer::failing("iframe gone");
        let err = player.load_video("a", false).await.unwrap_err();
        assert!(err.to_string().contains("iframe gone"));
        assert!(player.commands().await.is_empty());
    }

    #[tokio::test]
    async fn test_logging_player_accepts_commands() {
        assert!(LoggingPlayer.load_video("a", true).await.is_ok());
    }
}
