/// Hangman game module
pub mod game;
pub mod input;
pub mod renderer;
pub mod words;

pub use game::{GuessOutcome, GuessResult, HangmanGame, Phase, RoundError, RoundState, Snapshot, Tally, Transition};
pub use input::InputEvent;
pub use renderer::HangmanRenderer;
pub use words::WordBank;
