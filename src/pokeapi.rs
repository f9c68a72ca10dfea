// Pokémon Battle - Pokémon Data Provider Client
// Talks to the PokeAPI-style REST service and reshapes its payloads.

use crate::config::join_url;
use crate::error::ProxyError;
use crate::models::{AbilitySlot, PokedexEntry, PokemonRecord, StatEntry, TypeSlot};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

/// Catalog size requested from the provider in one call
pub const POKEDEX_LIMIT: u32 = 1302;

/// Read-only access to Pokémon data keyed by lowercase name
#[async_trait]
pub trait PokemonDataSource: Send + Sync {
    async fn fetch_pokemon(&self, name: &str) -> Result<PokemonRecord, ProxyError>;

    async fn fetch_pokedex(&self, limit: u32) -> Result<Vec<PokedexEntry>, ProxyError>;
}

// ============================================================================
// Provider payloads (only the fields we keep)
// ============================================================================

#[derive(Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Deserialize)]
struct RawSprites {
    front_default: Option<String>,
}

#[derive(Deserialize)]
struct RawTypeSlot {
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Deserialize)]
struct RawAbilitySlot {
    ability: NamedResource,
    #[serde(default)]
    is_hidden: bool,
}

#[derive(Deserialize)]
struct RawStat {
    stat: NamedResource,
    base_stat: u32,
}

#[derive(Deserialize)]
struct RawPokemon {
    name: String,
    id: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    weight: u32,
    sprites: RawSprites,
    types: Vec<RawTypeSlot>,
    abilities: Vec<RawAbilitySlot>,
    stats: Vec<RawStat>,
}

#[derive(Deserialize)]
struct RawPokedexPage {
    results: Vec<PokedexEntry>,
}

impl From<RawPokemon> for PokemonRecord {
    fn from(raw: RawPokemon) -> Self {
        Self {
            name: raw.name,
            id: raw.id,
            image_url: raw.sprites.front_default.unwrap_or_default(),
            height: raw.height,
            weight: raw.weight,
            types: raw
                .types
                .into_iter()
                .map(|t| TypeSlot { type_name: t.kind.name })
                .collect(),
            abilities: raw
                .abilities
                .into_iter()
                .map(|a| AbilitySlot {
                    ability_name: a.ability.name,
                    is_hidden: a.is_hidden,
                })
                .collect(),
            stats: raw
                .stats
                .into_iter()
                .map(|s| StatEntry {
                    stat_name: s.stat.name,
                    base_value: s.base_stat,
                })
                .collect(),
        }
    }
}

// ============================================================================
// HTTP client
// ============================================================================

#[derive(Clone)]
pub struct PokeApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PokemonDataSource for PokeApiClient {
    async fn fetch_pokemon(&self, name: &str) -> Result<PokemonRecord, ProxyError> {
        let url = join_url(
            &self.base_url,
            &format!("pokemon/{}", urlencoding::encode(name)),
        );
        debug!(%url, "fetching pokemon");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(error = %e, "pokemon request failed");
            ProxyError::upstream()
        })?;

        if !response.status().is_success() {
            debug!(status = %response.status(), name, "provider rejected lookup");
            return Err(ProxyError::not_found());
        }

        let raw = response.json::<RawPokemon>().await.map_err(|e| {
            warn!(error = %e, "pokemon payload could not be decoded");
            ProxyError::upstream()
        })?;

        Ok(raw.into())
    }

    async fn fetch_pokedex(&self, limit: u32) -> Result<Vec<PokedexEntry>, ProxyError> {
        let url = join_url(&self.base_url, "pokemon");

        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "pokedex request failed");
                ProxyError::upstream()
            })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "pokedex request rejected");
            return Err(ProxyError::upstream());
        }

        let page = response.json::<RawPokedexPage>().await.map_err(|e| {
            warn!(error = %e, "pokedex payload could not be decoded");
            ProxyError::upstream()
        })?;

        Ok(page.results)
    }
}
