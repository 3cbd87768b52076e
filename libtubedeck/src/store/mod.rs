//! Player store
//!
//! The unidirectional state machine behind the player feature:
//! - Actions: What can happen
//! - State: What is true right now
//! - Reducer: Pure function (State, Action) -> State
//! - Effects: I/O performed after a transition, possibly dispatching more actions
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use libtubedeck::player::RecordingPlayer;
//! use libtubedeck::repository::MemoryRepository;
//! use libtubedeck::store::{Action, Store};
//!
//! # async fn example() -> libtubedeck::Result<()> {
//! let store = Store::new(Arc::new(MemoryRepository::new()), Arc::new(RecordingPlayer::new()));
//! let mut snapshots = store.subscribe();
//!
//! store.dispatch(Action::Initialize).await?;
//! let state = store.state().await;
//! println!("{:?}", state.playlists);
//! # Ok(())
//! # }
//! ```

pub mod actions;
mod effects;
pub mod events;
pub mod reducer;
pub mod state;

pub use actions::Action;
pub use events::{StateBus, StateReceiver};
pub use reducer::reduce;
pub use state::{PlayerState, PlaylistsState, QueueState, TubeDeckState};

use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::PlayerConfig;
use crate::error::Result;
use crate::player::{codes, PlayerSink};
use crate::repository::PlaylistRepository;

/// Owner of the canonical state
///
/// All transitions go through [`Store::dispatch`]. The state cell is locked
/// only while reducing, assigning and publishing; effects run after the lock
/// is released, so effects may dispatch again.
pub struct Store {
    state: Mutex<TubeDeckState>,
    bus: StateBus,
    repo: Arc<dyn PlaylistRepository>,
    player: Arc<dyn PlayerSink>,
    thumbnail_quality: String,
}

impl Store {
    /// Create a store with default player settings
    pub fn new(repo: Arc<dyn PlaylistRepository>, player: Arc<dyn PlayerSink>) -> Self {
        Self::with_config(repo, player, &PlayerConfig::default())
    }

    pub fn with_config(
        repo: Arc<dyn PlaylistRepository>,
        player: Arc<dyn PlayerSink>,
        config: &PlayerConfig,
    ) -> Self {
        Self {
            state: Mutex::new(TubeDeckState::new()),
            bus: StateBus::default(),
            repo,
            player,
            thumbnail_quality: config.thumbnail_quality.clone(),
        }
    }

    /// A copy of the current snapshot
    pub async fn state(&self) -> TubeDeckState {
        self.state.lock().await.clone()
    }

    /// Receive every snapshot published after this call
    pub fn subscribe(&self) -> StateReceiver {
        self.bus.subscribe()
    }

    /// Submit an action
    ///
    /// Reduces, publishes the new snapshot, then runs the action's effects.
    /// The returned future completes once the whole chain of follow-up
    /// dispatches has settled.
    ///
    /// # Errors
    ///
    /// Repository and player failures raised by effects are returned as-is;
    /// the state is left as the last successful transition made it.
    pub fn dispatch(&self, action: Action) -> BoxFuture<'_, Result<()>> {
        async move {
            tracing::debug!(action = action.name(), "dispatch");

            {
                let mut state = self.state.lock().await;
                let current = std::mem::take(&mut *state);
                *state = reduce(current, action.clone());
                // Snapshot order must match reduce order
                self.bus.publish(state.clone());
            }

            effects::run(self, action).await
        }
        .boxed()
    }

    /// Entry point for state-change callbacks from the embedded player
    ///
    /// Dispatches `PlayerStateChanged`. An "ended" report that was accepted
    /// for the current queue entry also dispatches
    /// `VideoEnded`, advancing the queue.
    pub async fn report_player_state(&self, yt_state: i32, video_id: Option<String>) -> Result<()> {
        self.dispatch(Action::PlayerStateChanged {
            yt_state,
            video_id: video_id.clone(),
        })
        .await?;

        if yt_state != codes::ENDED {
            return Ok(());
        }

        let state = self.state().await;
        let ended = match &state.player {
            PlayerState::Paused { video_id: paused } => {
                video_id.as_deref().map_or(true, |id| id == paused.as_str())
                    && state
                        .queue
                        .current_video()
                        .is_some_and(|v| &v.youtube_id == paused)
            }
            _ => false,
        };

        if ended {
            self.dispatch(Action::VideoEnded).await?;
        } else {
            tracing::debug!(video_id = ?video_id, "ignoring end of inactive video");
        }
        Ok(())
    }

    pub(crate) fn repo(&self) -> &dyn PlaylistRepository {
        self.repo.as_ref()
    }

    pub(crate) fn player(&self) -> &dyn PlayerSink {
        self.player.as_ref()
    }

    pub(crate) fn thumbnail_quality(&self) -> &str {
        &self.thumbnail_quality
    }
}
