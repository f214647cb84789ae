//! Media server access and the locally cached view of its library.

pub mod cache;
pub mod paths;
pub mod server;

pub use cache::{first_run_since, LibraryIndexCache, LibraryLookup, RefreshSummary};
pub use paths::{select_library, to_local_path, to_server_path};
pub use server::{MediaServer, PlexServer, ServerMovie};
