// Pokémon Battle - Proxies
// Input handling and error policy in front of the two upstream providers.

use crate::error::ProxyError;
use crate::models::{PokedexEntry, PokemonRecord, PriceQuote};
use crate::pokeapi::{PokemonDataSource, POKEDEX_LIMIT};
use crate::tcg::CardPriceSource;
use tracing::{debug, warn};

/// Resolve a single Pokémon by name (case-insensitive).
pub async fn lookup_pokemon(
    source: &dyn PokemonDataSource,
    name: &str,
) -> Result<PokemonRecord, ProxyError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ProxyError::missing_name());
    }

    let name = name.to_lowercase();
    let result = source.fetch_pokemon(&name).await;
    match &result {
        Ok(record) => debug!(name = %record.name, id = record.id, "resolved pokemon"),
        Err(e) => debug!(%name, error = %e, "pokemon lookup failed"),
    }
    result
}

/// Best-effort market price. Every failure becomes `"N/A"`.
pub async fn quote_price(source: &dyn CardPriceSource, name: &str) -> PriceQuote {
    let name = name.trim();
    if name.is_empty() {
        return PriceQuote::not_available();
    }

    match source.search_cards(name).await {
        Ok(search) => search
            .market_price()
            .map(PriceQuote::from_market)
            .unwrap_or_else(PriceQuote::not_available),
        Err(e) => {
            warn!(%name, error = %e, "price lookup failed");
            PriceQuote::not_available()
        }
    }
}

/// Full Pokédex catalog, in provider order.
pub async fn list_pokedex(source: &dyn PokemonDataSource) -> Result<Vec<PokedexEntry>, ProxyError> {
    let entries = source.fetch_pokedex(POKEDEX_LIMIT).await?;
    debug!(count = entries.len(), "fetched pokedex");
    Ok(entries)
}
