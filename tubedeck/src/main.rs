//! tubedeck - Manage playlists and drive the play queue from the terminal

use clap::{Parser, Subcommand};
use std::sync::Arc;
use uuid::Uuid;

use libtubedeck::logging::LoggingConfig;
use libtubedeck::player::LoggingPlayer;
use libtubedeck::store::{PlayerState, PlaylistsState};
use libtubedeck::{Action, Config, Database, Result, Store, TubeDeckError, TubeDeckState};

#[derive(Parser, Debug)]
#[command(name = "tubedeck")]
#[command(version, about = "Manage video playlists and their play queue")]
#[command(long_about = r#"Manage video playlists and their play queue.

Every command loads the playlist directory, applies its change and prints the
resulting state: the directory, the queue of the selected playlist and the
player.

EXAMPLES:
    tubedeck create "Lo-fi" --description "focus music"
    tubedeck add <PLAYLIST_ID> "https://www.youtube.com/watch?v=jfKfPfyJRdk" --title "lofi radio"
    tubedeck move <PLAYLIST_ID> 0 2
    tubedeck --format json show <PLAYLIST_ID> | jq '.queue.videos[].title'

EXIT CODES:
    0 - Success
    1 - Configuration, database or player error
    3 - Invalid command-line input (malformed id or index)
    4 - Operation failed (unknown playlist, unusable URL)
"#)]
struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "text", value_name = "FORMAT")]
    #[arg(value_parser = ["text", "json"])]
    format: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List playlists and the queue of the first one
    List,

    /// Select a playlist and show its queue
    Show {
        playlist_id: String,
    },

    /// Create a playlist and select it
    Create {
        name: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Add a video to a playlist by its watch URL
    Add {
        playlist_id: String,

        /// Watch URL carrying the video id in its `v` parameter
        url: String,

        /// Display title (defaults to the video id)
        #[arg(short, long, default_value = "")]
        title: String,
    },

    /// Move a queue entry from one index to another
    Move {
        playlist_id: String,
        from: String,
        to: String,
    },

    /// Rename a playlist
    Rename {
        playlist_id: String,
        name: String,

        /// New description (keeps the current one if omitted)
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a playlist and its videos
    Delete {
        playlist_id: String,
    },

    /// Remove a video from a playlist
    Remove {
        playlist_id: String,
        video_id: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    LoggingConfig::from_env().verbose(cli.verbose).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let actions = plan(&cli.command)?;

    let config = Config::load()?;
    let db = Database::new(&config.database.path).await?;
    let store = Store::with_config(Arc::new(db), Arc::new(LoggingPlayer), &config.player);

    store.dispatch(Action::Initialize).await?;
    for step in actions {
        let action = match step {
            Step::Dispatch(action) => action,
            Step::Rename { playlist_id, name, description: None } => {
                let description = store
                    .state()
                    .await
                    .playlists
                    .items()
                    .iter()
                    .find(|p| p.id == playlist_id)
                    .map(|p| p.description.clone())
                    .unwrap_or_default();
                Action::RenamePlaylist { playlist_id, name, description }
            }
            Step::Rename { playlist_id, name, description: Some(description) } => {
                Action::RenamePlaylist { playlist_id, name, description }
            }
        };

        store.dispatch(action).await?;
        if matches!(store.state().await.player, PlayerState::Error { .. }) {
            break;
        }
    }

    let state = store.state().await;
    print_state(&state, &cli.format)?;

    match state.player {
        PlayerState::Error { message } => Err(TubeDeckError::Operation(message)),
        _ => Ok(()),
    }
}

/// One unit of work run after `Initialize`
#[derive(Debug)]
enum Step {
    Dispatch(Action),
    /// Needs the loaded directory to fill in a missing description
    Rename {
        playlist_id: Uuid,
        name: String,
        description: Option<String>,
    },
}

/// Validate arguments and turn the command into store actions
fn plan(command: &Command) -> Result<Vec<Step>> {
    let steps = match command {
        Command::List => Vec::new(),
        Command::Show { playlist_id } => {
            vec![Step::Dispatch(Action::SelectPlaylist(parse_id(playlist_id)?))]
        }
        Command::Create { name, description } => vec![Step::Dispatch(Action::CreatePlaylist {
            name: name.clone(),
            description: description.clone(),
        })],
        Command::Add { playlist_id, url, title } => vec![Step::Dispatch(Action::AddVideo {
            playlist_id: parse_id(playlist_id)?,
            url: url.clone(),
            title: title.clone(),
        })],
        Command::Move { playlist_id, from, to } => {
            let id = parse_id(playlist_id)?;
            vec![
                Step::Dispatch(Action::SelectPlaylist(id)),
                Step::Dispatch(Action::SortChanged {
                    old_index: parse_index(from)?,
                    new_index: parse_index(to)?,
                }),
            ]
        }
        Command::Rename { playlist_id, name, description } => vec![Step::Rename {
            playlist_id: parse_id(playlist_id)?,
            name: name.clone(),
            description: description.clone(),
        }],
        Command::Delete { playlist_id } => {
            vec![Step::Dispatch(Action::DeletePlaylist(parse_id(playlist_id)?))]
        }
        Command::Remove { playlist_id, video_id } => {
            let id = parse_id(playlist_id)?;
            vec![
                Step::Dispatch(Action::SelectPlaylist(id)),
                Step::Dispatch(Action::RemoveVideo {
                    playlist_id: id,
                    video_id: parse_id(video_id)?,
                }),
            ]
        }
    };
    Ok(steps)
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|e| TubeDeckError::InvalidInput(format!("Invalid id '{}': {}", raw, e)))
}

fn parse_index(raw: &str) -> Result<usize> {
    raw.trim()
        .parse()
        .map_err(|_| TubeDeckError::InvalidInput(format!("Invalid queue index '{}'", raw)))
}

fn print_state(state: &TubeDeckState, format: &str) -> Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(state)?);
    } else {
        print!("{}", render_text(state));
    }
    Ok(())
}

fn render_text(state: &TubeDeckState) -> String {
    let mut out = String::new();

    match &state.playlists {
        PlaylistsState::Loading => out.push_str("Playlists: loading\n"),
        PlaylistsState::Empty => out.push_str("No playlists\n"),
        PlaylistsState::Error(message) => {
            out.push_str(&format!("Playlists unavailable: {}\n", message))
        }
        PlaylistsState::Loaded(playlists) => {
            out.push_str("Playlists:\n");
            for playlist in playlists {
                let marker = if state.queue.is_selected(playlist.id) { '*' } else { ' ' };
                out.push_str(&format!(
                    "{} {}  {} ({} videos)\n",
                    marker,
                    playlist.id,
                    playlist.name,
                    playlist.videos.len()
                ));
            }
        }
    }

    if state.queue.has_selection() {
        out.push_str("\nQueue:\n");
        if state.queue.videos.is_empty() {
            out.push_str("  (empty)\n");
        }
        for (index, video) in state.queue.videos.iter().enumerate() {
            let marker = if state.queue.current_index == Some(index) { '>' } else { ' ' };
            out.push_str(&format!(
                "{} {}. {} [{}]  {}\n",
                marker, index, video.title, video.youtube_id, video.id
            ));
        }
    }

    let player = match &state.player {
        PlayerState::Empty => "empty".to_string(),
        PlayerState::Loading { video_id, autoplay: true } => format!("loading {} (autoplay)", video_id),
        PlayerState::Loading { video_id, .. } => format!("loading {}", video_id),
        PlayerState::Buffering { video_id } => format!("buffering {}", video_id),
        PlayerState::Playing { video_id } => format!("playing {}", video_id),
        PlayerState::Paused { video_id } => format!("paused {}", video_id),
        PlayerState::Error { message } => format!("error: {}", message),
    };
    out.push_str(&format!("\nPlayer: {}\n", player));
    out
}
