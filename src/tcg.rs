// Pokémon Battle - Card Price Provider Client
// Searches trading-card listings by exact name and picks a market price.

use crate::config::join_url;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Card listing search keyed by exact Pokémon name
#[async_trait]
pub trait CardPriceSource: Send + Sync {
    async fn search_cards(&self, name: &str) -> Result<CardSearch>;
}

// ============================================================================
// Provider payloads
// ============================================================================

/// Listings stay raw; only the first one is ever decoded
#[derive(Debug, Default, Deserialize)]
pub struct CardSearch {
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Card {
    #[serde(default)]
    pub tcgplayer: Option<TcgPlayer>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TcgPlayer {
    #[serde(default)]
    pub prices: Option<PriceTiers>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTiers {
    pub holofoil: Option<PriceTier>,
    pub unlimited_holofoil: Option<PriceTier>,
    pub normal: Option<PriceTier>,
    pub reverse_holofoil: Option<PriceTier>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PriceTier {
    pub market: Option<f64>,
}

impl PriceTiers {
    /// First tier present, in holofoil -> unlimited holofoil -> normal -> reverse holofoil order
    pub fn preferred(&self) -> Option<&PriceTier> {
        self.holofoil
            .as_ref()
            .or(self.unlimited_holofoil.as_ref())
            .or(self.normal.as_ref())
            .or(self.reverse_holofoil.as_ref())
    }
}

impl CardSearch {
    /// First listing, if present and well formed
    pub fn first_card(&self) -> Option<Card> {
        let first = self.data.first()?;
        match Card::deserialize(first) {
            Ok(card) => Some(card),
            Err(e) => {
                debug!(error = %e, "first card listing could not be decoded");
                None
            }
        }
    }

    /// Market value of the first listing's preferred price tier.
    /// A preferred tier without a market value does not fall through to the next tier.
    pub fn market_price(&self) -> Option<f64> {
        self.first_card()?
            .tcgplayer
            .as_ref()?
            .prices
            .as_ref()?
            .preferred()?
            .market
    }
}

// ============================================================================
// HTTP client
// ============================================================================

#[derive(Clone)]
pub struct TcgClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl TcgClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl CardPriceSource for TcgClient {
    async fn search_cards(&self, name: &str) -> Result<CardSearch> {
        let url = join_url(&self.base_url, "cards");
        let query = format!("name:\"{}\"", name);
        debug!(%url, %query, "searching card listings");

        let mut request = self.client.get(&url).query(&[("q", query.as_str())]);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let response = request.send().await.context("card search request failed")?;

        if !response.status().is_success() {
            bail!("card search failed with status {}", response.status());
        }

        response
            .json::<CardSearch>()
            .await
            .context("card search payload could not be decoded")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn search(value: serde_json::Value) -> CardSearch {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_holofoil_wins_over_normal() {
        let result = search(json!({
            "data": [{ "tcgplayer": { "prices": {
                "normal": { "market": 1.25 },
                "holofoil": { "market": 9.99 }
            }}}]
        }));
        assert_eq!(result.market_price(), Some(9.99));
    }

    #[test]
    fn test_priority_order() {
        let result = search(json!({
            "data": [{ "tcgplayer": { "prices": {
                "reverseHolofoil": { "market": 4.0 },
                "unlimitedHolofoil": { "market": 3.0 }
            }}}]
        }));
        assert_eq!(result.market_price(), Some(3.0));

        let result = search(json!({
            "data": [{ "tcgplayer": { "prices": {
                "reverseHolofoil": { "market": 4.0 }
            }}}]
        }));
        assert_eq!(result.market_price(), Some(4.0));
    }

    #[test]
    fn test_only_first_listing_is_used() {
        let result = search(json!({
            "data": [
                { "tcgplayer": { "prices": {} } },
                { "tcgplayer": { "prices": { "normal": { "market": 2.0 } } } }
            ]
        }));
        assert_eq!(result.market_price(), None);
    }

    #[test]
    fn test_malformed_later_listing_is_ignored() {
        let result = search(json!({
            "data": [
                { "tcgplayer": { "prices": { "holofoil": { "market": 9.99 } } } },
                { "tcgplayer": { "prices": { "normal": { "market": "oops" } } } }
            ]
        }));
        assert_eq!(result.market_price(), Some(9.99));
    }

    #[test]
    fn test_malformed_first_listing_has_no_price() {
        let result = search(json!({
            "data": [
                { "tcgplayer": { "prices": { "holofoil": { "market": "oops" } } } },
                { "tcgplayer": { "prices": { "normal": { "market": 2.0 } } } }
            ]
        }));
        assert_eq!(result.market_price(), None);
    }

    #[test]
    fn test_preferred_tier_without_market_does_not_fall_through() {
        let result = search(json!({
            "data": [{ "tcgplayer": { "prices": {
                "holofoil": { "low": 1.0 },
                "normal": { "market": 2.0 }
            }}}]
        }));
        assert_eq!(result.market_price(), None);
    }

    #[test]
    fn test_missing_blocks() {
        assert_eq!(search(json!({ "data": [] })).market_price(), None);
        assert_eq!(search(json!({})).market_price(), None);
        assert_eq!(search(json!({ "data": [{}] })).market_price(), None);
        assert_eq!(search(json!({ "data": [{ "tcgplayer": {} }] })).market_price(), None);
    }

    #[tokio::test]
    async fn test_search_sends_exact_name_query_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cards"))
            .and(query_param("q", "name:\"pikachu\""))
            .and(header("X-Api-Key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "tcgplayer": { "prices": { "normal": { "market": 0.42 } } } }]
            })))
            .mount(&server)
            .await;

        let client = TcgClient::new(reqwest::Client::new(), server.uri(), Some("secret".to_string()));
        let result = client.search_cards("pikachu").await.unwrap();
        assert_eq!(result.market_price(), Some(0.42));
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cards"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = TcgClient::new(reqwest::Client::new(), server.uri(), None);
        assert!(client.search_cards("pikachu").await.is_err());
    }
}
