//! TubeDeck - playlist queue and embedded player state
//!
//! A single store owns the playlist directory, the play queue of the
//! selected playlist and the embedded player's lifecycle. Persistence sits
//! behind [`repository::PlaylistRepository`]; the player behind
//! [`player::PlayerSink`].

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod player;
pub mod repository;
pub mod store;
pub mod types;
pub mod youtube;

// Re-export commonly used types
pub use config::Config;
pub use db::Database;
pub use error::{Result, TubeDeckError};
pub use store::{Action, Store, TubeDeckState};
pub use types::{Playlist, VideoItem};
