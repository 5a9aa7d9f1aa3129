/// Core game interface driven by the engine loop
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use std::time::Duration;

/// What the engine should do after handling an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Main game trait: input in, frames out. The engine owns the game and
/// calls into it from a single task.
pub trait Game {
    /// Handle one key event
    fn handle_key(&mut self, key: KeyEvent) -> Result<Control>;

    /// Draw the current state. Must not change game state.
    fn render(&self, frame: &mut Frame);

    /// Time between frames
    fn frame_period(&self) -> Duration {
        Duration::from_millis(16)
    }
}

/// Renderer trait for drawing a game using Ratatui
pub trait GameRenderer<G> {
    fn render(frame: &mut Frame, game: &G);
}
