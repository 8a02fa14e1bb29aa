use serde::{Deserialize, Serialize};

use crate::store::Dataset;
use crate::transform::{PopularityTier, TieredTrack};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub playlist_name: String,
    pub playlist_id: Option<String>,
    pub fetched_tracks: usize,
    pub unique_tracks: usize,
    pub hits: usize,
    pub popular: usize,
    pub unpopular: usize,
    pub dataset: Dataset,
    pub rows_loaded_sqlite: Option<usize>,
    pub rows_written_csv: Option<usize>,
    pub load_errors: Vec<String>,
}

impl RunReport {
    pub fn new(playlist_name: String, dataset: Dataset) -> Self {
        Self {
            playlist_name,
            playlist_id: None,
            fetched_tracks: 0,
            unique_tracks: 0,
            hits: 0,
            popular: 0,
            unpopular: 0,
            dataset,
            rows_loaded_sqlite: None,
            rows_written_csv: None,
            load_errors: Vec::new(),
        }
    }

    pub fn tally_tiers(&mut self, tracks: &[TieredTrack]) {
        self.unique_tracks = tracks.len();
        for track in tracks {
            match track.popularity_tier {
                PopularityTier::Hits => self.hits += 1,
                PopularityTier::Popular => self.popular += 1,
                PopularityTier::Unpopular => self.unpopular += 1,
            }
        }
    }

    pub fn playlist_found(&self) -> bool {
        self.playlist_id.is_some()
    }
}
