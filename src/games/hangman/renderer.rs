/// Hangman renderer - draws a snapshot of the round, never mutates it
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use super::game::{HangmanGame, Phase, Snapshot, Tally, MAX_ATTEMPTS};
use crate::core::audio::AudioSink;
use crate::core::game::GameRenderer;

/// Gallows drawings, one per wrong guess taken.
const STAGES: [&str; MAX_ATTEMPTS as usize + 1] = [
    "  +---+\n  |   |\n      |\n      |\n      |\n      |\n=========",
    "  +---+\n  |   |\n  O   |\n      |\n      |\n      |\n=========",
    "  +---+\n  |   |\n  O   |\n  |   |\n      |\n      |\n=========",
    "  +---+\n  |   |\n  O   |\n /|   |\n      |\n      |\n=========",
    "  +---+\n  |   |\n  O   |\n /|\\  |\n      |\n      |\n=========",
    "  +---+\n  |   |\n  O   |\n /|\\  |\n /    |\n      |\n=========",
    "  +---+\n  |   |\n  O   |\n /|\\  |\n / \\  |\n      |\n=========",
];

#[derive(Debug)]
pub struct HangmanRenderer;

impl<A: AudioSink> GameRenderer<HangmanGame<A>> for HangmanRenderer {
    fn render(frame: &mut Frame, game: &HangmanGame<A>) {
        draw_snapshot(frame, &game.round().snapshot(), game.tally());
    }
}

pub fn draw_snapshot(frame: &mut Frame, snapshot: &Snapshot, tally: Tally) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(9),    // Gallows + word
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    let header = Paragraph::new("HANGMAN")
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(15), Constraint::Min(0)])
        .split(chunks[1]);

    let stage = STAGES[snapshot.hangman_stage_index.min(STAGES.len() - 1)];
    let gallows = Paragraph::new(stage)
        .block(Block::default().borders(Borders::ALL))
        .style(stage_style(snapshot.phase));
    frame.render_widget(gallows, body[0]);

    let status = Paragraph::new(status_lines(snapshot))
        .block(Block::default().borders(Borders::ALL).title(" Round "));
    frame.render_widget(status, body[1]);

    let footer = Paragraph::new(format!(
        "Won: {}  Lost: {}   [A-Z] Guess  [R] Restart  [Esc] Quit",
        tally.won, tally.lost
    ))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[2]);
}

fn stage_style(phase: Phase) -> Style {
    match phase {
        Phase::Playing => Style::default(),
        Phase::Won => Style::default().fg(Color::Green),
        Phase::Lost => Style::default().fg(Color::Red),
    }
}

fn status_lines(snapshot: &Snapshot) -> Vec<Line<'static>> {
    let guessed = snapshot
        .guessed_sorted
        .iter()
        .map(char::to_string)
        .collect::<Vec<_>>()
        .join(" ");

    let mut lines = vec![
        Line::from(Span::styled(
            snapshot.display_word.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Guessed: {}", guessed)),
        Line::from(format!(
            "Attempts left: {} {}",
            snapshot.attempts_left,
            "❤".repeat(usize::from(snapshot.attempts_left))
        )),
        Line::from(""),
    ];

    match snapshot.phase {
        Phase::Playing => {}
        Phase::Won => {
            lines.push(Line::from(Span::styled(
                "YOU WON!",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )));
        }
        Phase::Lost => {
            let word = snapshot.revealed_word.clone().unwrap_or_default();
            lines.push(Line::from(Span::styled(
                format!("WORD: {}", word),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
        }
    }

    if snapshot.phase != Phase::Playing {
        lines.push(Line::from("Press R to restart"));
    }

    lines
}
