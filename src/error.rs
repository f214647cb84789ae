use std::io;
use thiserror::Error;

/// Custom error type for the reelroute pipeline
#[derive(Error, Debug)]
pub enum ReelError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input missing: {0}")]
    InputMissing(String),

    #[error("Conversion failed: {0}")]
    ConversionFailed(String),

    #[error("Metadata unavailable: {0}")]
    MetadataUnavailable(String),

    #[error("Library cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("Move failed: {0}")]
    MoveFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Library notification failed: {0}")]
    NotifyFailed(String),

    #[error("Media server error: {0}")]
    MediaServer(String),

    #[error("Download manager error: {0}")]
    DownloadManager(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for the reelroute pipeline
pub type Result<T> = std::result::Result<T, ReelError>;

impl ReelError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ReelError::Config(msg.into())
    }

    /// Create an input missing error (source file or external binary absent)
    pub fn input_missing<S: Into<String>>(msg: S) -> Self {
        ReelError::InputMissing(msg.into())
    }

    pub fn conversion_failed<S: Into<String>>(msg: S) -> Self {
        ReelError::ConversionFailed(msg.into())
    }

    pub fn metadata_unavailable<S: Into<String>>(msg: S) -> Self {
        ReelError::MetadataUnavailable(msg.into())
    }

    pub fn cache_unavailable<S: Into<String>>(msg: S) -> Self {
        ReelError::CacheUnavailable(msg.into())
    }

    pub fn move_failed<S: Into<String>>(msg: S) -> Self {
        ReelError::MoveFailed(msg.into())
    }

    pub fn upload_failed<S: Into<String>>(msg: S) -> Self {
        ReelError::UploadFailed(msg.into())
    }

    pub fn notify_failed<S: Into<String>>(msg: S) -> Self {
        ReelError::NotifyFailed(msg.into())
    }

    pub fn media_server<S: Into<String>>(msg: S) -> Self {
        ReelError::MediaServer(msg.into())
    }

    pub fn download_manager<S: Into<String>>(msg: S) -> Self {
        ReelError::DownloadManager(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ReelError::Other(msg.into())
    }

    /// Short kind label used in worker logs
    pub fn kind(&self) -> &'static str {
        match self {
            ReelError::Io(_) => "io",
            ReelError::Config(_) => "config",
            ReelError::Http(_) => "http",
            ReelError::Json(_) => "json",
            ReelError::InputMissing(_) => "input-missing",
            ReelError::ConversionFailed(_) => "conversion-failed",
            ReelError::MetadataUnavailable(_) => "metadata-unavailable",
            ReelError::CacheUnavailable(_) => "cache-unavailable",
            ReelError::MoveFailed(_) => "move-failed",
            ReelError::UploadFailed(_) => "upload-failed",
            ReelError::NotifyFailed(_) => "notify-failed",
            ReelError::MediaServer(_) => "media-server",
            ReelError::DownloadManager(_) => "download-manager",
            ReelError::Other(_) => "other",
        }
    }
}
