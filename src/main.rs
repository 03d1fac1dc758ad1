use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use marquee::app::{App, AppEvent};
use marquee::catalog::{build_http_client, TmdbClient};
use marquee::config::{Config, TOKEN_ENV_VAR};
use marquee::keybindings::KeybindingRegistry;
use marquee::theme::ThemeVariant;
use marquee::ui;

#[derive(Parser, Debug)]
#[command(name = "marquee", about = "Browse and search the TMDB movie catalog")]
struct Args {
    /// Start with a title search instead of popular movies
    #[arg(long, value_name = "TEXT")]
    query: Option<String>,

    /// Config file (default: ~/.config/marquee/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Theme override: dark or light
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never mix with the alternate screen buffer
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            tracing::warn!("HOME not set, using default configuration");
            Config::default()
        }
    };

    let Some(token) = config.resolve_token(std::env::var(TOKEN_ENV_VAR).ok()) else {
        eprintln!("Error: no TMDB API token configured.");
        eprintln!();
        eprintln!("Set the {} environment variable:", TOKEN_ENV_VAR);
        eprintln!("  export {}=<your read access token>", TOKEN_ENV_VAR);
        eprintln!();
        eprintln!("or add `api_token = \"...\"` to your config file.");
        std::process::exit(1);
    };

    let theme_name = args.theme.as_deref().unwrap_or(&config.theme);
    let theme_variant = ThemeVariant::from_str_name(theme_name).unwrap_or_else(|| {
        tracing::warn!(theme = %theme_name, "Unknown theme, falling back to dark");
        ThemeVariant::Dark
    });

    let mut keybindings = KeybindingRegistry::new();
    for warning in keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!("{}", warning);
    }

    let http = build_http_client(config.request_timeout()).context("Failed to build HTTP client")?;
    let catalog = Arc::new(
        TmdbClient::new(http, &config.api_base_url, token)
            .context("Invalid catalog base URL in config")?,
    );

    let mut app = App::new(theme_variant, keybindings, config.image_base_url.clone());

    // A blank --query falls back to popular movies.
    let initial = args
        .query
        .as_deref()
        .and_then(|q| app.controller.submit_search(q))
        .unwrap_or_else(|| app.controller.start());

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, catalog, initial, event_tx, event_rx).await?;

    Ok(())
}
