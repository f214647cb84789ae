// Core business logic module

pub mod classifier;
pub mod config;
pub mod converter;
pub mod download_manager;
pub mod library;
pub mod metadata;
pub mod pipeline;
pub mod relocate;
pub mod rotation;
pub mod transfer;
pub mod trigger;
pub mod upload;
pub mod work;
pub mod worker;

// Re-export commonly used items
pub use classifier::{ClassificationEngine, Destination, Route, RouteRoots};
pub use config::{Config, LibraryEntry};
pub use converter::{Converter, SickbeardConverter};
pub use download_manager::{DownloadManager, RadarrClient};
pub use library::{LibraryIndexCache, LibraryLookup, MediaServer, PlexServer};
pub use metadata::{MetadataAggregator, NormalizedMovieRecord};
pub use pipeline::{Collaborators, Pipeline};
pub use rotation::{RemoteClaim, RemoteRotation};
pub use transfer::{RcloneTransfer, Transfer};
pub use trigger::TriggerWatcher;
pub use upload::UploadDispatcher;
pub use work::{EpisodeEvent, MovieEvent, WorkItem};
pub use worker::{ItemHandler, WorkerPool};
