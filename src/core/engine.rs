use crate::core::game::{Control, Game};
use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

pub struct Engine<G: Game> {
    game: G,
}

impl<G: Game> Engine<G> {
    pub fn new(game: G) -> Self {
        Self { game }
    }

    /// Drain pending terminal events without blocking
    pub fn pump_input(&mut self) -> Result<Control> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                debug!("Key event: {:?}", key.code);
                if self.game.handle_key(key)? == Control::Quit {
                    return Ok(Control::Quit);
                }
            }
        }
        Ok(Control::Continue)
    }

    /// One frame per tick: draw, then handle whatever input arrived.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<G> {
        let mut frames = tokio::time::interval(self.game.frame_period().max(Duration::from_micros(1)));
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!("Engine started ({:?} per frame)", self.game.frame_period());

        loop {
            frames.tick().await;

            terminal.draw(|f| self.game.render(f))?;

            if self.pump_input()? == Control::Quit {
                break;
            }
        }

        info!("Engine stopped");
        Ok(self.game)
    }
}
