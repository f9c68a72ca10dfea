// Pokémon Battle - Web Server
// Serves the name, price and listing proxies over HTTP

use anyhow::{Context, Result};
use clap::Parser;
use pokemon_battle::server::{router, AppState};
use pokemon_battle::{logging, PokeApiClient, TcgClient, UpstreamConfig};
use std::sync::Arc;
use tracing::{info, warn};

/// battle-server - proxies Pokémon data and card prices
#[derive(Parser)]
#[command(name = "battle-server")]
#[command(version)]
struct ServerArgs {
    /// Address to listen on
    #[arg(short, long, env = "BATTLE_BIND", default_value = "0.0.0.0:3000")]
    bind: String,

    #[command(flatten)]
    upstream: UpstreamConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("info,tower_http=debug");
    let args = ServerArgs::parse();

    println!("🌐 Pokémon Battle - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if args.upstream.tcg_api_key.is_none() {
        warn!("POKEMON_TCG_API_KEY is not set; card prices will likely show N/A");
    }

    let client = reqwest::Client::new();
    let state = AppState::new(
        Arc::new(PokeApiClient::new(client.clone(), args.upstream.pokeapi_url.clone())),
        Arc::new(TcgClient::new(
            client,
            args.upstream.tcg_url.clone(),
            args.upstream.tcg_api_key.clone(),
        )),
    );
    info!(pokeapi = %args.upstream.pokeapi_url, tcg = %args.upstream.tcg_url, "upstreams configured");

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", args.bind))?;

    println!("\n🚀 Server running on http://{}", args.bind);
    println!("   API: http://{}/pokemon/pikachu", args.bind);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Server exited with an error")?;

    Ok(())
}
