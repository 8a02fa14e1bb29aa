use serde::{Deserialize, Serialize};

/// A playlist resolved by name search. Only the fields the pipeline
/// actually consumes; the API returns far more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackDetail {
    pub track_name: String,
    pub artist_name: String,
    pub album_name: String,
    pub popularity: u32,
}

#[cfg(test)]
impl TrackDetail {
    pub fn mock(name: &str, artist: &str, album: &str, popularity: u32) -> Self {
        Self {
            track_name: name.to_string(),
            artist_name: artist.to_string(),
            album_name: album.to_string(),
            popularity,
        }
    }
}
