use anyhow::{Context, Result};
use clap::Parser;
use hangterm::cli::{Cli, Commands};
use hangterm::core::audio::sink_from_config;
use hangterm::core::config::Config;
use hangterm::core::engine::Engine;
use hangterm::games::hangman::{HangmanGame, WordBank};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use tracing::info;

fn init_logging(path: &Path) -> Result<()> {
    // The TUI owns stdout, so logs go to a file (RUST_LOG controls the level)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    let words = match &cli.word {
        Some(word) => WordBank::from_words([word]),
        None => WordBank::resolve(config.game.words.as_deref())?,
    };

    if let Some(Commands::Words) = cli.command {
        for word in words.iter() {
            println!("{}", word);
        }
        println!("{} words", words.len());
        return Ok(());
    }

    let rng = match config.game.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let game = HangmanGame::new(words, rng, sink_from_config(&config.sound))?.with_fps(config.game.fps);

    let terminal = ratatui::init();
    let result = Engine::new(game).run(terminal).await;
    ratatui::restore();

    let game = result?;
    let tally = game.tally();
    info!("Session over: {} won, {} lost", tally.won, tally.lost);
    Ok(())
}
