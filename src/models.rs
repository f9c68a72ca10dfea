// Pokémon Battle - Data Model
// Compact records handed out by the proxies and consumed by the comparator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single Pokémon as returned by `GET /pokemon/:name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonRecord {
    pub name: String,
    pub id: u32,
    pub image_url: String,
    /// Decimetres
    #[serde(default)]
    pub height: u32,
    /// Hectograms
    #[serde(default)]
    pub weight: u32,
    pub types: Vec<TypeSlot>,
    pub abilities: Vec<AbilitySlot>,
    pub stats: Vec<StatEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSlot {
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilitySlot {
    pub ability_name: String,
    pub is_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatEntry {
    pub stat_name: String,
    pub base_value: u32,
}

impl StatEntry {
    /// Display label, e.g. `special-attack` -> `special attack`
    pub fn label(&self) -> String {
        self.stat_name.replace('-', " ")
    }
}

/// One row of the Pokédex catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokedexEntry {
    pub name: String,
    pub url: String,
}

/// Market price display text: `"$12.34"` or `"N/A"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceQuote(String);

impl PriceQuote {
    pub const NOT_AVAILABLE: &'static str = "N/A";

    pub fn not_available() -> Self {
        PriceQuote(Self::NOT_AVAILABLE.to_string())
    }

    /// Format a market value with exactly two decimals.
    /// Zero, negative and non-finite values have no meaningful price.
    pub fn from_market(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            PriceQuote(format!("${:.2}", value))
        } else {
            Self::not_available()
        }
    }

    pub fn is_available(&self) -> bool {
        self.0 != Self::NOT_AVAILABLE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PriceQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `GET /cardprice/:name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceResponse {
    pub price: PriceQuote,
}

/// Error body shared by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_formatting() {
        assert_eq!(PriceQuote::from_market(12.0).as_str(), "$12.00");
        assert_eq!(PriceQuote::from_market(3.456).as_str(), "$3.46");
        assert_eq!(PriceQuote::from_market(0.5).as_str(), "$0.50");
    }

    #[test]
    fn test_price_without_value() {
        assert_eq!(PriceQuote::from_market(0.0), PriceQuote::not_available());
        assert_eq!(PriceQuote::from_market(-4.0), PriceQuote::not_available());
        assert_eq!(PriceQuote::from_market(f64::NAN), PriceQuote::not_available());
        assert!(!PriceQuote::not_available().is_available());
    }

    #[test]
    fn test_record_uses_camel_case_keys() {
        let record = PokemonRecord {
            name: "pikachu".to_string(),
            id: 25,
            image_url: "https://img/25.png".to_string(),
            height: 4,
            weight: 60,
            types: vec![TypeSlot { type_name: "electric".to_string() }],
            abilities: vec![AbilitySlot {
                ability_name: "lightning-rod".to_string(),
                is_hidden: true,
            }],
            stats: vec![StatEntry {
                stat_name: "hp".to_string(),
                base_value: 35,
            }],
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["imageUrl"], "https://img/25.png");
        assert_eq!(value["types"][0]["typeName"], "electric");
        assert_eq!(value["abilities"][0]["isHidden"], true);
        assert_eq!(value["stats"][0]["baseValue"], 35);
    }

    #[test]
    fn test_price_response_is_plain_string() {
        let body = PriceResponse { price: PriceQuote::from_market(1.0) };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "price": "$1.00" }));
    }

    #[test]
    fn test_stat_label() {
        let stat = StatEntry { stat_name: "special-defense".to_string(), base_value: 50 };
        assert_eq!(stat.label(), "special defense");
    }
}
