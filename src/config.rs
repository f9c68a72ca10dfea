// Pokémon Battle - Configuration
// Upstream endpoints and credentials, from flags or the environment.

use clap::Args;

pub const DEFAULT_POKEAPI_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_TCG_URL: &str = "https://api.pokemontcg.io/v2";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Where the proxies find their collaborators
#[derive(Debug, Clone, Args)]
pub struct UpstreamConfig {
    /// Base URL of the Pokémon data API
    #[arg(long, env = "POKEAPI_URL", default_value = DEFAULT_POKEAPI_URL)]
    pub pokeapi_url: String,

    /// Base URL of the trading-card API
    #[arg(long, env = "POKEMON_TCG_URL", default_value = DEFAULT_TCG_URL)]
    pub tcg_url: String,

    /// API key for the trading-card API (not validated; a missing key shows up as N/A prices)
    #[arg(long, env = "POKEMON_TCG_API_KEY", hide_env_values = true)]
    pub tcg_api_key: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            pokeapi_url: DEFAULT_POKEAPI_URL.to_string(),
            tcg_url: DEFAULT_TCG_URL.to_string(),
            tcg_api_key: None,
        }
    }
}

/// Join a base URL and a path without doubling slashes
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://a/v2/", "/pokemon"), "http://a/v2/pokemon");
        assert_eq!(join_url("http://a/v2", "pokemon"), "http://a/v2/pokemon");
    }

    #[test]
    fn test_defaults() {
        let config = UpstreamConfig::default();
        assert_eq!(config.pokeapi_url, DEFAULT_POKEAPI_URL);
        assert!(config.tcg_api_key.is_none());
    }
}
