//! Movie metadata: lookup sources and the normalized record they are merged into.

pub mod aggregator;
pub mod omdb;
pub mod record;
pub mod tmdb;

pub use aggregator::MetadataAggregator;
pub use omdb::{OmdbClient, OmdbRecord, SecondarySource};
pub use record::NormalizedMovieRecord;
pub use tmdb::{MovieDetails, NamedEntry, PrimarySource, SpokenLanguage, TmdbClient};
