pub mod csv;
pub mod sqlite;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::spotify::TrackDetail;
use crate::transform::TieredTrack;

/// Which dataset a run persists. The cleaned set carries the derived
/// popularity_tier column; the raw set is the pre-transform fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Raw,
    Cleaned,
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dataset::Raw => write!(f, "raw"),
            Dataset::Cleaned => write!(f, "cleaned"),
        }
    }
}

/// The row set handed to the loaders, tagged with its provenance so both
/// destinations agree on the schema.
#[derive(Debug, Clone)]
pub enum LoadSet {
    Raw(Vec<TrackDetail>),
    Cleaned(Vec<TieredTrack>),
}

impl LoadSet {
    pub fn len(&self) -> usize {
        match self {
            LoadSet::Raw(rows) => rows.len(),
            LoadSet::Cleaned(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dataset(&self) -> Dataset {
        match self {
            LoadSet::Raw(_) => Dataset::Raw,
            LoadSet::Cleaned(_) => Dataset::Cleaned,
        }
    }

    pub fn has_tier_column(&self) -> bool {
        matches!(self, LoadSet::Cleaned(_))
    }
}
