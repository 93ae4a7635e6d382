//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    pub secret: String,
    /// TTL in seconds for the dashboard report cache.
    #[serde(default = "ServerConfig::default_dashboard_cache_ttl_secs")]
    pub dashboard_cache_ttl_secs: u64,
}

impl ServerConfig {
    fn default_dashboard_cache_ttl_secs() -> u64 {
        60
    }
}
