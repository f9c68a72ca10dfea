// Pokémon Battle - REST API
// Axum routes for the name, price and listing proxies.

use crate::error::ProxyError;
use crate::models::{ErrorBody, PriceQuote, PriceResponse};
use crate::pokeapi::PokemonDataSource;
use crate::proxy::{list_pokedex, lookup_pokemon, quote_price};
use crate::tcg::CardPriceSource;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pokemon: Arc<dyn PokemonDataSource>,
    pub cards: Arc<dyn CardPriceSource>,
}

impl AppState {
    pub fn new(pokemon: Arc<dyn PokemonDataSource>, cards: Arc<dyn CardPriceSource>) -> Self {
        Self { pokemon, cards }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /health - Health check
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
    })
}

/// GET /pokemon/:name - Compact record for one Pokémon
async fn get_pokemon(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ProxyError> {
    let record = lookup_pokemon(state.pokemon.as_ref(), &name).await?;
    Ok(Json(record))
}

/// GET /pokemon - No name in the path
async fn missing_pokemon_name() -> ProxyError {
    ProxyError::missing_name()
}

/// GET /cardprice/:name - Best-effort market price, always 200
async fn get_card_price(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<PriceResponse> {
    let price = quote_price(state.cards.as_ref(), &name).await;
    Json(PriceResponse { price })
}

/// GET /cardprice - No name, no price
async fn missing_card_name() -> Json<PriceResponse> {
    Json(PriceResponse {
        price: PriceQuote::not_available(),
    })
}

/// GET /pokedex - Full catalog of names
async fn get_pokedex(State(state): State<AppState>) -> Result<impl IntoResponse, ProxyError> {
    let entries = list_pokedex(state.pokemon.as_ref()).await?;
    Ok(Json(entries))
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/pokemon", get(missing_pokemon_name))
        .route("/pokemon/", get(missing_pokemon_name))
        .route("/pokemon/:name", get(get_pokemon))
        .route("/cardprice", get(missing_card_name))
        .route("/cardprice/", get(missing_card_name))
        .route("/cardprice/:name", get(get_card_price))
        .route("/pokedex", get(get_pokedex))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PokedexEntry, PokemonRecord};
    use crate::proxy::tests::{record, StubCards, StubDex};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(dex: StubDex, cards: StubCards) -> Router {
        router(AppState::new(Arc::new(dex), Arc::new(cards)))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_pokemon_found() {
        let dex = StubDex::with(vec![record("pikachu", 25, [35, 55, 40, 50, 50, 90])]);
        let (status, body) = get_json(app(dex, StubCards(None)), "/pokemon/Pikachu").await;

        assert_eq!(status, StatusCode::OK);
        let record: PokemonRecord = serde_json::from_value(body).unwrap();
        assert_eq!(record.name, "pikachu");
        assert_eq!(record.stats.len(), 6);
    }

    #[tokio::test]
    async fn test_pokemon_missing_name() {
        for uri in ["/pokemon/", "/pokemon", "/pokemon/%20"] {
            let (status, body) = get_json(app(StubDex::default(), StubCards(None)), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "uri {}", uri);
            assert_eq!(body["error"], crate::error::MISSING_NAME);
        }
    }

    #[tokio::test]
    async fn test_pokemon_not_found() {
        let (status, body) = get_json(app(StubDex::default(), StubCards(None)), "/pokemon/missingno").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], crate::error::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_card_price_is_always_ok() {
        let (status, body) = get_json(app(StubDex::default(), StubCards(None)), "/cardprice/pikachu").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "price": "N/A" }));

        let (status, body) = get_json(app(StubDex::default(), StubCards(None)), "/cardprice/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "price": "N/A" }));
    }

    #[tokio::test]
    async fn test_card_price_found() {
        let cards = StubCards(Some(json!({
            "data": [{ "tcgplayer": { "prices": { "holofoil": { "market": 250.0 } } } }]
        })));
        let (status, body) = get_json(app(StubDex::default(), cards), "/cardprice/charizard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "price": "$250.00" }));
    }

    #[tokio::test]
    async fn test_pokedex() {
        let dex = StubDex {
            catalog: Some(vec![PokedexEntry {
                name: "bulbasaur".to_string(),
                url: "https://p/1/".to_string(),
            }]),
            ..Default::default()
        };
        let (status, body) = get_json(app(dex, StubCards(None)), "/pokedex").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{ "name": "bulbasaur", "url": "https://p/1/" }]));
    }

    #[tokio::test]
    async fn test_pokedex_upstream_failure() {
        let (status, body) = get_json(app(StubDex::default(), StubCards(None)), "/pokedex").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], crate::error::UPSTREAM_FAILED);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app(StubDex::default(), StubCards(None)), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
