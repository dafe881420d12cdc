//! Application configuration management

use std::env;

use anyhow::{Context, Result};

/// Favorite genre reported for users who never picked one
pub const DEFAULT_FAVORITE_GENRE: &str = "Genre1";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (for generating URLs)
    pub host: Option<String>,

    /// Server port
    pub port: u16,

    /// SQLite database URL (`sqlite://path/to.db` or `sqlite::memory:`)
    pub database_url: String,

    /// Pool size for a file-backed database
    pub database_max_connections: u32,

    /// JWT secret for signing and verifying tokens
    pub jwt_secret: String,

    /// Token lifetime in seconds; `None` issues tokens without an expiry
    pub token_lifetime_secs: Option<i64>,

    /// Bcrypt cost factor
    pub bcrypt_cost: u32,

    /// Genre reported by `me` when the user has none stored
    pub default_favorite_genre: String,

    /// Capacity of the book event broadcast channel
    pub event_bus_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            // In production, this should be set explicitly
            let secret = format!("dev-secret-{}", uuid::Uuid::new_v4().simple());
            tracing::warn!("JWT_SECRET not set, using a random development secret");
            secret
        });

        Ok(Self {
            host: lookup("HOST"),

            port: lookup("PORT")
                .unwrap_or_else(|| "4000".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://./data/bookshelf.db".to_string()),

            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .map(|v| v.parse::<u32>())
                .transpose()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?
                .unwrap_or(10),

            jwt_secret: jwt_secret.trim().to_string(),

            token_lifetime_secs: lookup("TOKEN_LIFETIME_SECS")
                .map(|v| v.parse::<i64>())
                .transpose()
                .context("Invalid TOKEN_LIFETIME_SECS")?,

            bcrypt_cost: lookup("BCRYPT_COST")
                .map(|v| v.parse::<u32>())
                .transpose()
                .context("Invalid BCRYPT_COST")?
                .unwrap_or(bcrypt::DEFAULT_COST),

            default_favorite_genre: lookup("DEFAULT_FAVORITE_GENRE")
                .unwrap_or_else(|| DEFAULT_FAVORITE_GENRE.to_string()),

            event_bus_capacity: lookup("EVENT_BUS_CAPACITY")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("Invalid EVENT_BUS_CAPACITY")?
                .unwrap_or(256),
        })
    }
}
