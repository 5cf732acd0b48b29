use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::EngineSettings;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Ratings table (`userId,movieId,rating[,timestamp]`)
    #[serde(default = "default_ratings_path")]
    pub ratings_path: String,

    /// Movie catalog table (`movieId,title[,genres]`)
    #[serde(default = "default_movies_path")]
    pub movies_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Minimum rating for a user to count as having liked a movie
    #[serde(default = "default_like_threshold")]
    pub like_threshold: f32,

    /// Maximum number of recommendations returned per request
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Number of hash functions per user signature
    #[serde(default = "default_hash_functions")]
    pub hash_functions: usize,

    /// Seed for the signature hash coefficients
    #[serde(default = "default_signature_seed")]
    pub signature_seed: u64,

    /// Minimum fuzzy ratio (0-100) for a catalog title to match a query
    #[serde(default = "default_match_threshold")]
    pub match_threshold: u8,

    /// Run the stdin prompt loop instead of the HTTP server
    #[serde(default)]
    pub interactive: bool,
}

fn default_ratings_path() -> String {
    "ratings.csv".to_string()
}

fn default_movies_path() -> String {
    "movies.csv".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_like_threshold() -> f32 {
    4.0
}

fn default_top_n() -> usize {
    10
}

fn default_hash_functions() -> usize {
    10
}

fn default_signature_seed() -> u64 {
    5
}

fn default_match_threshold() -> u8 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ratings_path: default_ratings_path(),
            movies_path: default_movies_path(),
            host: default_host(),
            port: default_port(),
            like_threshold: default_like_threshold(),
            top_n: default_top_n(),
            hash_functions: default_hash_functions(),
            signature_seed: default_signature_seed(),
            match_threshold: default_match_threshold(),
            interactive: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.settings()?;
        Ok(config)
    }

    /// Engine tuning derived from this configuration
    pub fn settings(&self) -> AppResult<EngineSettings> {
        if self.top_n == 0 {
            return Err(AppError::InvalidInput("TOP_N must be positive".to_string()));
        }
        if self.hash_functions == 0 {
            return Err(AppError::InvalidInput(
                "HASH_FUNCTIONS must be positive".to_string(),
            ));
        }
        if self.match_threshold > 100 {
            return Err(AppError::InvalidInput(
                "MATCH_THRESHOLD must be between 0 and 100".to_string(),
            ));
        }

        Ok(EngineSettings {
            like_threshold: self.like_threshold,
            top_n: self.top_n,
            hash_functions: self.hash_functions,
            signature_seed: self.signature_seed,
            match_threshold: self.match_threshold,
        })
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
