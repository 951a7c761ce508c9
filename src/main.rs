// Entrypoint for the CLI application.
// - Sets up logging and configuration, builds the API client and hands it
//   to the menu loop.

use anyhow::Context;
use rbxstats_fetcher::{api::ApiClient, config, logging, snapshot::SnapshotDir, ui::main_menu};

fn main() -> anyhow::Result<()> {
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable: {:#}", err);
    }

    let cfg = config::load_or_init().context("Failed to load configuration")?;
    if cfg.api_key.is_empty() {
        println!(
            "No API key configured; set {} or edit {}.",
            config::ENV_API_KEY,
            config::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "config.toml".into())
        );
    }

    let api = ApiClient::new(&cfg.base_url, &cfg.api_key, &cfg.headers())
        .context("Failed to build API client")?;
    let snapshot = SnapshotDir::create(&cfg.output_root, &chrono::Local::now())
        .context("Failed to create snapshot folder")?;

    // Blocks until the user picks Exit.
    main_menu(&api, &cfg, snapshot)?;
    Ok(())
}
