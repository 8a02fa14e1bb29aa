pub mod config;
pub mod error;
pub mod pipeline;
pub mod spotify;
pub mod store;
pub mod transform;

pub use config::Config;
pub use error::{AppError, Result};
pub use pipeline::{PipelineRunner, RunOptions, RunReport};
pub use spotify::{Playlist, SpotifyClient, TrackDetail};
pub use store::{Dataset, LoadSet};
pub use transform::{clean_and_transform, PopularityTier, TieredTrack};
