//! The `oxvocab play` command and the interactive menu.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{BufReader, Stdin};

use oxvocab_core::model::CefrLevel;
use oxvocab_core::scores::GameMode;
use oxvocab_providers::load_config_from;

use crate::context::{open_selector, DataPaths};
use crate::game::Game;

async fn build_game(config: Option<PathBuf>) -> Result<Game<BufReader<Stdin>, std::io::Stdout>> {
    let config = load_config_from(config.as_deref())?;
    let paths = DataPaths::from(&config);
    std::fs::create_dir_all(paths.dir())
        .with_context(|| format!("failed to create {}", paths.dir().display()))?;

    let selector = open_selector(&config, &paths)?;
    if !config.provider_config()?.has_credentials() {
        anyhow::bail!(
            "no API key for provider '{}'; set GROQ_API_KEY or edit the config file",
            config.default_provider
        );
    }
    let translator = config
        .build_translator()
        .context("translations are unavailable; run `oxvocab check` for details")?;
    tracing::info!(
        provider = translator.provider_name(),
        model = translator.model(),
        "translator ready"
    );

    Ok(Game::new(
        selector,
        Arc::new(translator),
        paths,
        BufReader::new(tokio::io::stdin()),
        std::io::stdout(),
    )
    .with_target_language(config.target_language))
}

/// Run the main menu.
pub async fn menu(config: Option<PathBuf>) -> Result<()> {
    build_game(config).await?.main_menu().await
}

/// Start a single game straight away.
pub async fn execute(
    level: Option<CefrLevel>,
    adventure: bool,
    config: Option<PathBuf>,
) -> Result<()> {
    let mut game = build_game(config).await?;
    let (mode, level) = if adventure {
        (GameMode::Adventure, None)
    } else {
        (GameMode::Custom, level)
    };
    let session = game.play(mode, level).await?;
    println!(
        "Final score: {}",
        session.final_score.unwrap_or(session.words_correct)
    );
    Ok(())
}
