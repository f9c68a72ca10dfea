// Pokémon Battle - Logging
// tracing subscriber setup shared by both binaries.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// A global subscriber can only be set once; later calls keep the first one.
fn report(installed: Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>) {
    if let Err(e) = installed {
        debug!(error = %e, "tracing subscriber already installed, keeping it");
    }
}

/// Log to stderr. `RUST_LOG` wins over `default_directive`.
pub fn init(default_directive: &str) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter(default_directive))
        .with_target(false)
        .try_init();
    report(installed);
}

/// Log to a file, appending. Used where stderr belongs to the terminal UI.
pub fn init_file(path: &Path, default_directive: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter(default_directive))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    report(installed);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_init_keeps_first_subscriber() {
        init("warn");
        init("debug");

        let path = std::env::temp_dir().join(format!("pokemon-battle-log-{}.log", std::process::id()));
        assert!(init_file(&path, "info").is_ok());
        let _ = std::fs::remove_file(&path);
    }
}
