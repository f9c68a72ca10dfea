// Pokémon Battle - Core Library
// Exposes all modules for use in the TUI client, the API server, and tests

pub mod backend;
pub mod compare;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod pokeapi;
pub mod proxy;
pub mod tcg;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use backend::{BattleBackend, HttpBackend};
pub use compare::{
    stat_lines, tally, Battle, Comparator, ComparisonResult, ComparisonState, PriceSlot, Side,
    StatLine, StatOutcome, Ticket,
};
pub use config::UpstreamConfig;
pub use error::ProxyError;
pub use models::{AbilitySlot, PokedexEntry, PokemonRecord, PriceQuote, StatEntry, TypeSlot};
pub use pokeapi::{PokeApiClient, PokemonDataSource, POKEDEX_LIMIT};
pub use proxy::{list_pokedex, lookup_pokemon, quote_price};
pub use tcg::{CardPriceSource, CardSearch, TcgClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
