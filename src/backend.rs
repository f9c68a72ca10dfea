// Pokémon Battle - Backend Client
// The comparator's view of this system's own HTTP endpoints.

use crate::config::join_url;
use crate::models::{ErrorBody, PokedexEntry, PokemonRecord, PriceQuote, PriceResponse};
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Shown when the name proxy rejects a lookup without saying why
pub const LOOKUP_FAILED: &str = "Could not find one of the Pokémon. Please check the names.";

#[async_trait]
pub trait BattleBackend: Send + Sync {
    /// Name proxy; any failure carries a user-facing message
    async fn pokemon(&self, name: &str) -> Result<PokemonRecord>;

    /// Price proxy; never fails
    async fn price(&self, name: &str) -> PriceQuote;
}

/// Talks to a running `battle-server`
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, route: &str, name: &str) -> String {
        join_url(&self.base_url, &format!("{}/{}", route, urlencoding::encode(name)))
    }

    async fn fetch_price(&self, url: &str) -> reqwest::Result<PriceResponse> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        response.json::<PriceResponse>().await
    }

    /// Listing proxy
    pub async fn pokedex(&self) -> Result<Vec<PokedexEntry>> {
        let response = self
            .client
            .get(join_url(&self.base_url, "pokedex"))
            .send()
            .await
            .context("Failed to reach the battle server")?;

        if !response.status().is_success() {
            bail!("Pokédex request failed with status {}", response.status());
        }

        response
            .json::<Vec<PokedexEntry>>()
            .await
            .context("Pokédex response could not be decoded")
    }
}

#[async_trait]
impl BattleBackend for HttpBackend {
    async fn pokemon(&self, name: &str) -> Result<PokemonRecord> {
        let url = self.endpoint("pokemon", name);
        debug!(%url, "requesting pokemon");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach the battle server")?;

        if !response.status().is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| LOOKUP_FAILED.to_string());
            return Err(anyhow!(message));
        }

        response
            .json::<PokemonRecord>()
            .await
            .context("Pokémon response could not be decoded")
    }

    async fn price(&self, name: &str) -> PriceQuote {
        let url = self.endpoint("cardprice", name);

        match self.fetch_price(&url).await {
            Ok(body) => body.price,
            Err(e) => {
                warn!(%url, error = %e, "price request failed");
                PriceQuote::not_available()
            }
        }
    }
}
