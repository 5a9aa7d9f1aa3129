use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::Config;

#[derive(Debug, Parser)]
#[command(name = "hangterm")]
#[command(about = "Guess the hidden word one letter at a time before the hangman is drawn")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ./hangterm.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Word list, one word per line
    #[arg(short, long, value_name = "FILE")]
    pub words: Option<PathBuf>,

    /// Play with this secret word every round
    #[arg(long, conflicts_with = "words")]
    pub word: Option<String>,

    /// Seed for word selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Frames per second
    #[arg(long)]
    pub fps: Option<u32>,

    /// Disable audio cues
    #[arg(long)]
    pub no_sound: bool,

    /// Ring the terminal bell instead of playing sound files
    #[arg(long)]
    pub bell: bool,

    /// Where to write logs (the terminal is taken by the game)
    #[arg(long, value_name = "FILE", default_value = "hangterm.log")]
    pub log_file: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the loaded word list and exit
    Words,
}

impl Cli {
    /// Command line flags win over the config file
    pub fn apply(&self, config: &mut Config) {
        if let Some(words) = &self.words {
            config.game.words = Some(words.clone());
        }
        if let Some(seed) = self.seed {
            config.game.seed = Some(seed);
        }
        if let Some(fps) = self.fps {
            config.game.fps = fps;
        }
        if self.no_sound {
            config.sound.enabled = false;
        }
        if self.bell {
            config.sound.bell = true;
        }
    }
}
