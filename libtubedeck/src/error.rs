//! Error types for TubeDeck

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TubeDeckError>;

#[derive(Error, Debug)]
pub enum TubeDeckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Player error: {0}")]
    Player(#[from] PlayerError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl TubeDeckError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            TubeDeckError::InvalidInput(_) => 3,
            TubeDeckError::Operation(_) => 4,
            TubeDeckError::Config(_) => 1,
            TubeDeckError::Database(_) => 1,
            TubeDeckError::Player(_) => 1,
            TubeDeckError::Output(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database operation failed: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A stored row could not be mapped back into a domain value
    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

#[derive(Error, Debug, Clone)]
pub enum PlayerError {
    #[error("Player command failed: {0}")]
    Command(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_invalid_input() {
        let error = TubeDeckError::InvalidInput("not a uuid".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_operation_failed() {
        let error = TubeDeckError::Operation("Playlist not found".to_string());
        assert_eq!(error.exit_code(), 4);
    }

    #[test]
    fn test_exit_code_infrastructure_errors() {
        let db = TubeDeckError::Database(DbError::Corrupt("bad id".to_string()));
        assert_eq!(db.exit_code(), 1);

        let config = TubeDeckError::Config(ConfigError::MissingField("database.path".to_string()));
        assert_eq!(config.exit_code(), 1);

        let player = TubeDeckError::Player(PlayerError::Command("sink closed".to_string()));
        assert_eq!(player.exit_code(), 1);
    }

    #[test]
    fn test_error_message_formatting() {
        let error = TubeDeckError::InvalidInput("Index must be a number".to_string());
        assert_eq!(format!("{}", error), "Invalid input: Index must be a number");

        let error = TubeDeckError::Config(ConfigError::MissingField("config directory".to_string()));
        assert_eq!(
            format!("{}", error),
            "Configuration error: Missing required field: config directory"
        );

        let error = TubeDeckError::Database(DbError::Corrupt("playlist id 'x'".to_string()));
        assert_eq!(format!("{}", error), "Database error: Corrupt row: playlist id 'x'");
    }

    #[test]
    fn test_error_conversion_from_db_error() {
        let db_error = DbError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "test",
        ));
        let error: TubeDeckError = db_error.into();

        match error {
            TubeDeckError::Database(_) => {}
            _ => panic!("Expected TubeDeckError::Database"),
        }
    }

    #[test]
    fn test_error_conversion_from_player_error() {
        let error: TubeDeckError = PlayerError::Command("closed".to_string()).into();
        assert!(matches!(error, TubeDeckError::Player(_)));
        assert_eq!(format!("{}", error), "Player error: Player command failed: closed");
    }

    #[test]
    fn test_config_error_read_error_formatting() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let config_error = ConfigError::ReadError(io_error);
        assert!(format!("{}", config_error).contains("Failed to read config file"));
    }
}
