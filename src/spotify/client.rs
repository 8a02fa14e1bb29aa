use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::spotify::models::{Playlist, TrackDetail};

const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";
const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[allow(dead_code)]
    token_type: String,
    #[allow(dead_code)]
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    playlists: PlaylistPage,
}

#[derive(Debug, Deserialize)]
struct PlaylistPage {
    // Spotify pads search item arrays with JSON nulls for unavailable
    // entries, hence the inner Option.
    items: Vec<Option<ApiPlaylist>>,
}

#[derive(Debug, Deserialize)]
struct ApiPlaylist {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistTracksResponse {
    tracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    items: Vec<TrackItem>,
}

#[derive(Debug, Deserialize)]
struct TrackItem {
    track: Option<TrackRef>,
}

#[derive(Debug, Deserialize)]
struct TrackRef {
    // Local and removed tracks carry a null id.
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TracksResponse {
    tracks: Vec<Option<ApiTrack>>,
}

#[derive(Debug, Deserialize)]
struct ApiTrack {
    name: String,
    artists: Vec<ApiArtist>,
    album: ApiAlbum,
    popularity: u32,
}

#[derive(Debug, Deserialize)]
struct ApiArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiAlbum {
    name: String,
}

pub struct SpotifyClient {
    http_client: Client,
    access_token: String,
}

impl SpotifyClient {
    /// Maximum number of ids the batch track endpoint accepts per request.
    pub const TRACKS_BATCH_LIMIT: usize = 50;

    /// Authenticates with the client-credentials grant and returns a ready
    /// client. The token is fetched once and never refreshed; a run is
    /// expected to finish well inside its lifetime.
    pub async fn new(config: &Config) -> Result<Self> {
        let http_client = Client::new();

        let response = http_client
            .post(SPOTIFY_TOKEN_URL)
            .basic_auth(&config.client_id, Some(&config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!(
                "Token request failed: {}",
                error_text
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("Failed to parse token response: {}", e)))?;

        info!("Authenticated with Spotify using client credentials");

        Ok(Self {
            http_client,
            access_token: token.access_token,
        })
    }

    /// Resolves a playlist by free-text name. Returns the first search
    /// result in API relevance order, or `None` when the search comes back
    /// empty — callers must handle the absent case before using the id.
    pub async fn search_playlist(&self, name: &str) -> Result<Option<Playlist>> {
        let url = format!(
            "{}/search?q={}&type=playlist&limit=1",
            SPOTIFY_API_BASE,
            urlencoding::encode(name)
        );

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Api(format!(
                "Playlist search failed ({}): {}",
                status, error_text
            )));
        }

        let search: SearchResponse = response.json().await?;

        let playlist = search.playlists.items.into_iter().flatten().next();
        match &playlist {
            Some(p) => debug!("Resolved playlist '{}' to id {}", p.name, p.id),
            None => warn!("No playlist found matching '{}'", name),
        }

        Ok(playlist.map(|p| Playlist {
            id: p.id,
            name: p.name,
        }))
    }

    /// Lists the track ids of a playlist. Requests only the id field per
    /// item to avoid over-fetching. Null entries (local or removed tracks)
    /// are skipped.
    pub async fn playlist_track_ids(&self, playlist_id: &str) -> Result<Vec<String>> {
        let url = format!(
            "{}/playlists/{}?market=US&fields=tracks.items(track.id)",
            SPOTIFY_API_BASE, playlist_id
        );

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Api(format!(
                "Playlist track listing failed ({}): {}",
                status, error_text
            )));
        }

        let listing: PlaylistTracksResponse = response.json().await?;

        let mut ids = Vec::new();
        for item in listing.tracks.items {
            match item.track.and_then(|t| t.id) {
                Some(id) => ids.push(id),
                None => debug!("Skipping track without id (local or removed)"),
            }
        }

        info!("Playlist {} lists {} track ids", playlist_id, ids.len());
        Ok(ids)
    }

    /// Fetches metadata for a single batch of track ids. Callers must keep
    /// the batch within [`Self::TRACKS_BATCH_LIMIT`] and chunk longer id
    /// lists across calls.
    pub async fn track_details_batch(&self, ids: &[String]) -> Result<Vec<TrackDetail>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/tracks?market=US&ids={}",
            SPOTIFY_API_BASE,
            ids.join(",")
        );

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Api(format!(
                "Track detail fetch failed ({}): {}",
                status, error_text
            )));
        }

        let details: TracksResponse = response.json().await?;

        Ok(details
            .tracks
            .into_iter()
            .flatten()
            .map(|t| TrackDetail {
                track_name: t.name,
                artist_name: t
                    .artists
                    .first()
                    .map(|a| a.name.clone())
                    .unwrap_or_default(),
                album_name: t.album.name,
                popularity: t.popularity,
            })
            .collect())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_picks_first_non_null_item() {
        let body = r#"{
            "playlists": {
                "items": [
                    null,
                    {"id": "37i9dQZF1DX5Ejj0EkURtP", "name": "best songs 2023", "owner": {"id": "spotify"}},
                    {"id": "other", "name": "best songs 2023 vol 2"}
                ]
            }
        }"#;

        let search: SearchResponse = serde_json::from_str(body).unwrap();
        let first = search.playlists.items.into_iter().flatten().next().unwrap();

        assert_eq!(first.id, "37i9dQZF1DX5Ejj0EkURtP");
        assert_eq!(first.name, "best songs 2023");
    }

    #[test]
    fn test_search_response_empty_items() {
        let body = r#"{"playlists": {"items": []}}"#;

        let search: SearchResponse = serde_json::from_str(body).unwrap();
        assert!(search.playlists.items.into_iter().flatten().next().is_none());
    }

    #[test]
    fn test_playlist_listing_skips_null_tracks() {
        let body = r#"{
            "tracks": {
                "items": [
                    {"track": {"id": "abc"}},
                    {"track": null},
                    {"track": {"id": null}},
                    {"track": {"id": "def"}}
                ]
            }
        }"#;

        let listing: PlaylistTracksResponse = serde_json::from_str(body).unwrap();
        let ids: Vec<String> = listing
            .tracks
            .items
            .into_iter()
            .filter_map(|item| item.track.and_then(|t| t.id))
            .collect();

        assert_eq!(ids, vec!["abc", "def"]);
    }

    #[test]
    fn test_tracks_response_maps_first_artist() {
        let body = r#"{
            "tracks": [
                {
                    "name": "Rewrite The Stars",
                    "artists": [{"name": "James Arthur"}, {"name": "Anne-Marie"}],
                    "album": {"name": "The Greatest Showman: Reimagined (Deluxe)"},
                    "popularity": 72,
                    "duration_ms": 217000
                },
                null
            ]
        }"#;

        let details: TracksResponse = serde_json::from_str(body).unwrap();
        let tracks: Vec<ApiTrack> = details.tracks.into_iter().flatten().collect();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].artists[0].name, "James Arthur");
        assert_eq!(tracks[0].popularity, 72);
    }

    #[test]
    fn test_batch_chunk_sizing() {
        let ids: Vec<String> = (0..120).map(|i| format!("id{}", i)).collect();
        let chunks: Vec<_> = ids.chunks(SpotifyClient::TRACKS_BATCH_LIMIT).collect();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 50);
        assert_eq!(chunks[2].len(), 20);
    }
}
