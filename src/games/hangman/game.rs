use std::collections::BTreeSet;
use std::time::Duration;

use crossterm::event::KeyEvent;
use rand::rngs::StdRng;
use rand::Rng;
use ratatui::Frame;
use thiserror::Error;
use tracing::{debug, info};

use super::input::InputEvent;
use super::renderer::HangmanRenderer;
use super::words::WordBank;
use crate::core::audio::{AudioSink, Cue};
use crate::core::game::{Control, Game, GameRenderer};

/// Wrong guesses tolerated per round; also the last hangman stage.
pub const MAX_ATTEMPTS: u8 = 6;

/// Shown in place of letters that have not been guessed yet.
pub const PLACEHOLDER: char = '_';

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RoundError {
    #[error("the word bank is empty, no secret word can be chosen")]
    EmptyWordBank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Wrong,
    Correct,
    NoOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    JustWon,
    JustLost,
}

/// What a single guess did. Consumers react to this once; it is never
/// recomputed from state, so redraws cannot replay it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuessResult {
    pub outcome: GuessOutcome,
    pub transition: Transition,
}

impl GuessResult {
    pub const NO_OP: Self = Self {
        outcome: GuessOutcome::NoOp,
        transition: Transition::None,
    };
}

/// Read-only view handed to the renderer every frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub display_word: String,
    pub guessed_sorted: Vec<char>,
    pub attempts_left: u8,
    pub hangman_stage_index: usize,
    pub phase: Phase,
    /// Only filled in once the round is lost.
    pub revealed_word: Option<String>,
}

/// State of one round: the secret word, the letters tried so far and the
/// wrong guesses still available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    secret_word: Vec<char>,
    guessed: BTreeSet<char>,
    attempts_left: u8,
    phase: Phase,
}

impl RoundState {
    /// Start a fresh round with a word drawn from `words`.
    pub fn new<R: Rng + ?Sized>(words: &WordBank, rng: &mut R) -> Result<Self, RoundError> {
        let word = words.choose(rng)?;
        Ok(Self::start(word))
    }

    fn start(word: &str) -> Self {
        let mut round = Self {
            secret_word: word.to_uppercase().chars().collect(),
            guessed: BTreeSet::new(),
            attempts_left: MAX_ATTEMPTS,
            phase: Phase::Playing,
        };
        round.update_phase();
        round
    }

    /// Replace the whole round with a new one. On error the current round
    /// is left untouched.
    pub fn reset<R: Rng + ?Sized>(&mut self, words: &WordBank, rng: &mut R) -> Result<(), RoundError> {
        *self = Self::new(words, rng)?;
        Ok(())
    }

    pub fn guess_letter(&mut self, letter: char) -> GuessResult {
        if self.phase != Phase::Playing || !letter.is_alphabetic() {
            return GuessResult::NO_OP;
        }

        // Letters like 'ß' uppercase to more than one char and can't be a single guess
        let mut upper = letter.to_uppercase();
        let (Some(letter), None) = (upper.next(), upper.next()) else {
            return GuessResult::NO_OP;
        };

        if !self.guessed.insert(letter) {
            return GuessResult::NO_OP;
        }

        let outcome = if self.secret_word.contains(&letter) {
            GuessOutcome::Correct
        } else {
            self.attempts_left = self.attempts_left.saturating_sub(1);
            GuessOutcome::Wrong
        };

        let before = self.phase;
        self.update_phase();

        let transition = match (before, self.phase) {
            (Phase::Playing, Phase::Won) => Transition::JustWon,
            (Phase::Playing, Phase::Lost) => Transition::JustLost,
            _ => Transition::None,
        };

        GuessResult { outcome, transition }
    }

    // A complete word wins even if the counter also hit zero.
    fn update_phase(&mut self) {
        self.phase = if self.secret_word.iter().all(|c| self.guessed.contains(c)) {
            Phase::Won
        } else if self.attempts_left == 0 {
            Phase::Lost
        } else {
            Phase::Playing
        };
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn attempts_left(&self) -> u8 {
        self.attempts_left
    }

    pub fn secret_word(&self) -> String {
        self.secret_word.iter().collect()
    }

    pub fn is_guessed(&self, letter: char) -> bool {
        self.guessed.contains(&letter)
    }

    /// Word progress, one slot per letter separated by spaces, e.g. `C _ T`.
    pub fn display_word(&self) -> String {
        self.secret_word
            .iter()
            .map(|c| {
                if self.guessed.contains(c) {
                    c.to_string()
                } else {
                    PLACEHOLDER.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn guessed_sorted(&self) -> Vec<char> {
        self.guessed.iter().copied().collect()
    }

    /// 0 is the empty gallows, `MAX_ATTEMPTS` the full drawing.
    pub fn hangman_stage_index(&self) -> usize {
        usize::from(MAX_ATTEMPTS - self.attempts_left)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            display_word: self.display_word(),
            guessed_sorted: self.guessed_sorted(),
            attempts_left: self.attempts_left,
            hangman_stage_index: self.hangman_stage_index(),
            phase: self.phase,
            revealed_word: (self.phase == Phase::Lost).then(|| self.secret_word()),
        }
    }
}

impl GuessResult {
    /// Cues this guess should trigger, in play order. A losing wrong guess
    /// gets both the click and the losing cue.
    pub fn cues(&self) -> Vec<Cue> {
        let mut cues = Vec::new();
        if self.outcome == GuessOutcome::Wrong {
            cues.push(Cue::Click);
        }
        match self.transition {
            Transition::JustWon => cues.push(Cue::Win),
            Transition::JustLost => cues.push(Cue::Lose),
            Transition::None => {}
        }
        cues
    }
}

/// Rounds finished this session. Kept in memory only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub won: u32,
    pub lost: u32,
}

/// The playable game: one round at a time, the words to draw from and the
/// sink that turns guess results into sounds.
pub struct HangmanGame<A: AudioSink = Box<dyn AudioSink>> {
    round: RoundState,
    words: WordBank,
    rng: StdRng,
    audio: A,
    tally: Tally,
    frame_period: Duration,
}

impl<A: AudioSink> HangmanGame<A> {
    pub fn new(words: WordBank, mut rng: StdRng, audio: A) -> Result<Self, RoundError> {
        let round = RoundState::new(&words, &mut rng)?;
        info!("New round: {} letters", round.secret_word.len());
        Ok(Self {
            round,
            words,
            rng,
            audio,
            tally: Tally::default(),
            frame_period: Duration::from_millis(16),
        })
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.frame_period = Duration::from_micros((1_000_000 / u64::from(fps.max(1))).max(1));
        self
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Route one input event to the round. Letters only count while
    /// playing; restart only once the round is over.
    pub fn dispatch(&mut self, event: InputEvent) -> Result<Control, RoundError> {
        match event {
            InputEvent::LetterPressed(letter) if self.round.phase() == Phase::Playing => {
                let result = self.round.guess_letter(letter);
                debug!("Guess {:?}: {:?}", letter, result);

                for cue in result.cues() {
                    self.audio.play(cue);
                }

                match result.transition {
                    Transition::JustWon => {
                        self.tally.won += 1;
                        info!("Round won with {} attempts left", self.round.attempts_left());
                    }
                    Transition::JustLost => {
                        self.tally.lost += 1;
                        info!("Round lost, word was {}", self.round.secret_word());
                    }
                    Transition::None => {}
                }
            }
            InputEvent::RestartRequested if self.round.phase() != Phase::Playing => {
                self.round.reset(&self.words, &mut self.rng)?;
                info!("New round: {} letters", self.round.secret_word.len());
            }
            InputEvent::QuitRequested => return Ok(Control::Quit),
            _ => {}
        }
        Ok(Control::Continue)
    }
}

impl<A: AudioSink> Game for HangmanGame<A> {
    fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<Control> {
        match InputEvent::from_key(key, self.round.phase()) {
            Some(event) => Ok(self.dispatch(event)?),
            None => Ok(Control::Continue),
        }
    }

    fn render(&self, frame: &mut Frame) {
        HangmanRenderer::render(frame, self);
    }

    fn frame_period(&self) -> Duration {
        self.frame_period
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use crate::core::audio::RecordingSink;
    use rand::SeedableRng;

    fn round_with(word: &str) -> RoundState {
        let words = WordBank::from_words([word]);
        RoundState::new(&words, &mut StdRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn test_cat_scenario() {
        let mut round = round_with("cat");
        assert_eq!(round.secret_word(), "CAT");
        assert_eq!(round.display_word(), "_ _ _");

        let result = round.guess_letter('Z');
        assert_eq!(result.outcome, GuessOutcome::Wrong);
        assert_eq!(result.transition, Transition::None);
        assert_eq!(round.attempts_left(), 5);

        round.guess_letter('C');
        assert_eq!(round.display_word(), "C _ _");
        round.guess_letter('A');
        assert_eq!(round.display_word(), "C A _");

        let result = round.guess_letter('T');
        assert_eq!(round.display_word(), "C A T");
        assert_eq!(round.phase(), Phase::Won);
        assert_eq!(result.outcome, GuessOutcome::Correct);
        assert_eq!(result.transition, Transition::JustWon);
        assert_eq!(round.attempts_left(), 5);
    }

    #[test]
    fn test_dog_scenario() {
        let mut round = round_with("DOG");
        let mut last = GuessResult::NO_OP;
        for c in ['X', 'Y', 'Z', 'W', 'V', 'U'] {
            last = round.guess_letter(c);
            assert_eq!(last.outcome, GuessOutcome::Wrong);
        }
        assert_eq!(round.attempts_left(), 0);
        assert_eq!(round.phase(), Phase::Lost);
        assert_eq!(last.transition, Transition::JustLost);
        assert_eq!(round.hangman_stage_index(), 6);

        let frozen = round.clone();
        assert_eq!(round.guess_letter('D'), GuessResult::NO_OP);
        assert_eq!(round, frozen);
    }

    #[test]
    fn test_any_guess_order_wins() {
        let orders = [
            ['R', 'U', 'S', 'T'],
            ['T', 'S', 'U', 'R'],
            ['S', 'R', 'T', 'U'],
            ['U', 'T', 'R', 'S'],
        ];
        for order in orders {
            let mut round = round_with("rust");
            round.guess_letter('Q');
            let mut last = GuessResult::NO_OP;
            for c in order {
                last = round.guess_letter(c);
            }
            assert_eq!(round.phase(), Phase::Won);
            assert_eq!(last.transition, Transition::JustWon);
            assert_eq!(round.attempts_left(), MAX_ATTEMPTS - 1);
        }
    }

    #[test]
    fn test_repeated_letters_need_one_guess() {
        let mut round = round_with("LEVEL");
        round.guess_letter('l');
        assert_eq!(round.display_word(), "L _ _ _ L");
        round.guess_letter('e');
        round.guess_letter('v');
        assert_eq!(round.phase(), Phase::Won);
    }

    #[test]
    fn test_same_letter_twice_is_noop() {
        let mut round = round_with("DOG");
        round.guess_letter('x');
        let after_first = round.clone();
        assert_eq!(round.guess_letter('X'), GuessResult::NO_OP);
        assert_eq!(round, after_first);

        round.guess_letter('d');
        let after_first = round.clone();
        assert_eq!(round.guess_letter('D').outcome, GuessOutcome::NoOp);
        assert_eq!(round, after_first);
    }

    #[test]
    fn test_non_letters_are_ignored() {
        let mut round = round_with("DOG");
        let before = round.clone();
        for c in ['1', ' ', '-', '?'] {
            assert_eq!(round.guess_letter(c), GuessResult::NO_OP);
        }
        assert_eq!(round, before);
    }

    #[test]
    fn test_multi_char_uppercase_is_ignored() {
        let mut round = round_with("STRASSE");
        let before = round.clone();
        assert_eq!(round.guess_letter('ß'), GuessResult::NO_OP);
        assert_eq!(round, before);
        assert!(!round.is_guessed('S'));
    }

    #[test]
    fn test_guesses_after_win_are_ignored() {
        let mut round = round_with("A");
        assert_eq!(round.guess_letter('a').transition, Transition::JustWon);
        let frozen = round.clone();
        assert_eq!(round.guess_letter('B'), GuessResult::NO_OP);
        assert_eq!(round, frozen);
    }

    #[test]
    fn test_display_word_keeps_length() {
        let mut round = round_with("BANANA");
        round.guess_letter('N');
        let display = round.display_word();
        let slots: Vec<&str> = display.split(' ').collect();
        assert_eq!(slots.len(), 6);
        for (slot, actual) in slots.iter().zip("BANANA".chars()) {
            assert!(*slot == "_" || *slot == actual.to_string());
        }
    }

    #[test]
    fn test_guessed_sorted() {
        let mut round = round_with("DOG");
        for c in ['z', 'd', 'm', 'a'] {
            round.guess_letter(c);
        }
        assert_eq!(round.guessed_sorted(), vec!['A', 'D', 'M', 'Z']);
    }

    #[test]
    fn test_stage_tracks_attempts() {
        let mut round = round_with("DOG");
        assert_eq!(round.hangman_stage_index(), 0);
        round.guess_letter('Q');
        round.guess_letter('W');
        assert_eq!(round.hangman_stage_index(), 2);
        round.guess_letter('O');
        assert_eq!(round.hangman_stage_index(), 2);
    }

    #[test]
    fn test_reset_starts_clean_round() {
        let words = WordBank::from_words(["cat", "dog", "owl"]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut round = RoundState::new(&words, &mut rng).unwrap();
        for c in ['Q', 'X', 'Z', 'J', 'K', 'V'] {
            round.guess_letter(c);
        }

        round.reset(&words, &mut rng).unwrap();
        assert_eq!(round.phase(), Phase::Playing);
        assert_eq!(round.attempts_left(), MAX_ATTEMPTS);
        assert!(round.guessed_sorted().is_empty());
        assert!(words.iter().any(|w| w == round.secret_word()));
    }

    #[test]
    fn test_reset_with_empty_bank_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty = WordBank::from_words(Vec::<String>::new());
        assert_eq!(RoundState::new(&empty, &mut rng), Err(RoundError::EmptyWordBank));

        let mut round = round_with("DOG");
        round.guess_letter('D');
        let before = round.clone();
        assert_eq!(round.reset(&empty, &mut rng), Err(RoundError::EmptyWordBank));
        assert_eq!(round, before);
    }

    #[test]
    fn test_snapshot_reveals_word_only_when_lost() {
        let mut round = round_with("DOG");
        round.guess_letter('D');
        let snapshot = round.snapshot();
        assert_eq!(snapshot.display_word, "D _ _");
        assert_eq!(snapshot.phase, Phase::Playing);
        assert_eq!(snapshot.revealed_word, None);

        for c in ['A', 'B', 'C', 'E', 'F', 'H'] {
            round.guess_letter(c);
        }
        let snapshot = round.snapshot();
        assert_eq!(snapshot.phase, Phase::Lost);
        assert_eq!(snapshot.attempts_left, 0);
        assert_eq!(snapshot.hangman_stage_index, 6);
        assert_eq!(snapshot.revealed_word.as_deref(), Some("DOG"));
    }

    fn game_with(words: &[&str]) -> HangmanGame<RecordingSink> {
        let words = WordBank::from_words(words.iter().copied());
        HangmanGame::new(words, StdRng::seed_from_u64(5), RecordingSink::default()).unwrap()
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_cues_per_result() {
        let wrong = GuessResult { outcome: GuessOutcome::Wrong, transition: Transition::None };
        let lost = GuessResult { outcome: GuessOutcome::Wrong, transition: Transition::JustLost };
        let won = GuessResult { outcome: GuessOutcome::Correct, transition: Transition::JustWon };
        let correct = GuessResult { outcome: GuessOutcome::Correct, transition: Transition::None };
        assert_eq!(wrong.cues(), vec![Cue::Click]);
        assert_eq!(lost.cues(), vec![Cue::Click, Cue::Lose]);
        assert_eq!(won.cues(), vec![Cue::Win]);
        assert!(correct.cues().is_empty());
        assert!(GuessResult::NO_OP.cues().is_empty());
    }

    #[test]
    fn test_game_rejects_empty_bank() {
        let words = WordBank::from_words(Vec::<String>::new());
        let result = HangmanGame::new(words, StdRng::seed_from_u64(5), RecordingSink::default());
        assert!(matches!(result, Err(RoundError::EmptyWordBank)));
    }

    #[test]
    fn test_win_plays_each_cue_once() {
        let mut game = game_with(&["cat"]);
        for c in ['z', 'c', 'a', 't'] {
            game.handle_key(key(c)).unwrap();
        }
        assert_eq!(game.round().phase(), Phase::Won);
        assert_eq!(game.audio().cues(), &[Cue::Click, Cue::Win]);
        assert_eq!(game.tally(), Tally { won: 1, lost: 0 });

        // Letters after the win go nowhere
        game.handle_key(key('q')).unwrap();
        assert_eq!(game.audio().cues(), &[Cue::Click, Cue::Win]);
        assert_eq!(game.tally().won, 1);
    }

    #[test]
    fn test_loss_then_restart() {
        let mut game = game_with(&["dog"]);
        for c in ['x', 'y', 'z', 'w', 'v', 'u'] {
            game.handle_key(key(c)).unwrap();
        }
        assert_eq!(game.round().phase(), Phase::Lost);
        assert_eq!(game.tally(), Tally { won: 0, lost: 1 });
        assert_eq!(game.audio().cues().last(), Some(&Cue::Lose));
        assert_eq!(game.audio().cues().len(), 7);

        assert_eq!(game.handle_key(key('r')).unwrap(), Control::Continue);
        assert_eq!(game.round().phase(), Phase::Playing);
        assert_eq!(game.round().attempts_left(), MAX_ATTEMPTS);
        assert!(game.round().guessed_sorted().is_empty());
        assert_eq!(game.round().secret_word(), "DOG");
    }

    #[test]
    fn test_r_is_a_guess_while_playing() {
        let mut game = game_with(&["rust"]);
        game.handle_key(key('r')).unwrap();
        assert!(game.round().is_guessed('R'));
        assert_eq!(game.round().display_word(), "R _ _ _");
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let mut game = game_with(&["dog"]);
        game.handle_key(key('d')).unwrap();
        let before = game.round().clone();
        game.dispatch(InputEvent::RestartRequested).unwrap();
        assert_eq!(game.round(), &before);
    }

    #[test]
    fn test_quit() {
        let mut game = game_with(&["dog"]);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(game.handle_key(esc).unwrap(), Control::Quit);
    }

    #[test]
    fn test_fps_sets_frame_period() {
        let game = game_with(&["dog"]).with_fps(50);
        assert_eq!(game.frame_period(), Duration::from_millis(20));
        let game = game_with(&["dog"]).with_fps(0);
        assert_eq!(game.frame_period(), Duration::from_secs(1));
        let game = game_with(&["dog"]).with_fps(u32::MAX);
        assert_eq!(game.frame_period(), Duration::from_micros(1));
    }
}
