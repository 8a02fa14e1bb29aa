use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        // Older deployments used the unprefixed names.
        let client_id = std::env::var("SPOTIFY_CLIENT_ID")
            .or_else(|_| std::env::var("CLIENT_ID"))
            .map_err(|_| AppError::Config("SPOTIFY_CLIENT_ID not set".into()))?;

        let client_secret = std::env::var("SPOTIFY_CLIENT_SECRET")
            .or_else(|_| std::env::var("CLIENT_SECRET"))
            .map_err(|_| AppError::Config("SPOTIFY_CLIENT_SECRET not set".into()))?;

        Ok(Self {
            client_id,
            client_secret,
        })
    }

    pub fn get_missing_config(&self) -> Vec<String> {
        let mut missing = Vec::new();

        if self.client_id.is_empty() {
            missing.push("SPOTIFY_CLIENT_ID".to_string());
        }
        if self.client_secret.is_empty() {
            missing.push("SPOTIFY_CLIENT_SECRET".to_string());
        }

        missing
    }

    pub fn validate(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}
