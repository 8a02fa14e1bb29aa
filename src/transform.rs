use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::spotify::TrackDetail;

/// Three-valued popularity classification over the 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopularityTier {
    Hits,
    Popular,
    Unpopular,
}

impl PopularityTier {
    /// Ordered cascade, first match wins: >= 80 is a hit, >= 60 is popular,
    /// everything else is unpopular. The ordering matters at the 80 and 60
    /// boundaries.
    pub fn for_score(popularity: u32) -> Self {
        if popularity >= 80 {
            PopularityTier::Hits
        } else if popularity >= 60 {
            PopularityTier::Popular
        } else {
            PopularityTier::Unpopular
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PopularityTier::Hits => "hits",
            PopularityTier::Popular => "popular",
            PopularityTier::Unpopular => "unpopular",
        }
    }
}

/// A track row with its derived tier attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieredTrack {
    #[serde(flatten)]
    pub detail: TrackDetail,
    pub popularity_tier: PopularityTier,
}

/// Removes exact-duplicate rows (all four fields equal, first occurrence
/// kept, order preserved) and assigns each survivor its popularity tier.
/// No other rows are added or removed.
pub fn clean_and_transform(rows: Vec<TrackDetail>) -> Vec<TieredTrack> {
    let mut seen: HashSet<TrackDetail> = HashSet::with_capacity(rows.len());
    let mut out = Vec::with_capacity(rows.len());

    for row in rows {
        if !seen.insert(row.clone()) {
            debug!("Dropping duplicate row: {}", row.track_name);
            continue;
        }
        let popularity_tier = PopularityTier::for_score(row.popularity);
        out.push(TieredTrack {
            detail: row,
            popularity_tier,
        });
    }

    out
}
