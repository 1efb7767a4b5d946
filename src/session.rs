//! The per-round state machine.
//!
//! A [`GameSession`] is a plain value: every operation takes the session and,
//! where needed, a random source, and touches nothing else. Recording results
//! and talking to the presentation layer happen one level up in
//! [`crate::game_state::Game`].
//!
//! # State Machine
//! - `InProgress` → `Won` once every letter of the secret word is guessed
//! - `InProgress` → `Lost` once `MAX_WRONG` wrong guesses have been made
//! - `Won` and `Lost` are terminal; a new round means a new session

use crate::stats::StatsError;
use crate::wordbank::{self, Difficulty, Language};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

pub const MAX_WRONG: u8 = 6;
pub const HINTS_PER_ROUND: u8 = 3;
pub const HIDDEN_LETTER: char = '_';

#[derive(Debug, Error)]
pub enum GameError {
    #[error("'{0}' is not a valid word: use letters A-Z only")]
    InvalidWord(String),
    #[error("'{0}' is not a letter")]
    InvalidLetter(char),
    #[error("no round in progress, start a new game first")]
    GameNotActive,
    #[error("you have no hints remaining")]
    NoHintsRemaining,
    #[error("you've already guessed all the letters")]
    NoUnguessedLetters,
    #[error(transparent)]
    Stats(#[from] StatsError),
}

impl GameError {
    /// Only a failure to persist statistics should end the program.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Stats(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    InProgress,
    Won,
    Lost,
}

impl RoundStatus {
    pub fn is_concluded(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuessOutcome {
    Correct,
    Wrong,
    /// The letter had already been guessed; nothing changed.
    NoOp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordSource {
    Bank {
        language: Language,
        difficulty: Difficulty,
    },
    Custom,
}

/// Result of applying one letter to a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuessReport {
    pub letter: char,
    pub outcome: GuessOutcome,
    pub status: RoundStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    secret_word: String,
    guessed_letters: BTreeSet<char>,
    wrong_count: u8,
    hints_remaining: u8,
    status: RoundStatus,
    source: WordSource,
}

fn is_valid_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
}

impl GameSession {
    /// Start a round, either with the player's own word or with a random pick
    /// from the word bank for `language`/`difficulty`.
    pub fn start<R: Rng + ?Sized>(
        language: &str,
        difficulty: &str,
        custom_word: Option<&str>,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        match custom_word {
            Some(word) => Self::with_word(word),
            None => {
                let (language, difficulty) = wordbank::resolve(language, difficulty);
                let candidates = wordbank::words_for(language, difficulty);
                // Word bank entries are never empty.
                let word = candidates[rng.random_range(0..candidates.len())];
                Ok(Self::new(
                    word.to_ascii_uppercase(),
                    WordSource::Bank {
                        language,
                        difficulty,
                    },
                ))
            }
        }
    }

    /// Start a round with a player-supplied word. Every character must be a
    /// letter, surrounding whitespace included.
    pub fn with_word(word: &str) -> Result<Self, GameError> {
        if !is_valid_word(word) {
            return Err(GameError::InvalidWord(word.to_string()));
        }
        Ok(Self::new(word.to_ascii_uppercase(), WordSource::Custom))
    }

    fn new(secret_word: String, source: WordSource) -> Self {
        Self {
            secret_word,
            guessed_letters: BTreeSet::new(),
            wrong_count: 0,
            hints_remaining: HINTS_PER_ROUND,
            status: RoundStatus::InProgress,
            source,
        }
    }

    pub fn secret_word(&self) -> &str {
        &self.secret_word
    }

    pub fn guessed_letters(&self) -> &BTreeSet<char> {
        &self.guessed_letters
    }

    pub fn wrong_count(&self) -> u8 {
        self.wrong_count
    }

    pub fn max_wrong(&self) -> u8 {
        MAX_WRONG
    }

    pub fn hints_remaining(&self) -> u8 {
        self.hints_remaining
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn source(&self) -> WordSource {
        self.source
    }

    /// The word with every unguessed letter replaced by `_`. Once the round is
    /// over the whole word is shown.
    pub fn masked_word(&self) -> String {
        if self.status.is_concluded() {
            return self.secret_word.clone();
        }
        self.secret_word
            .chars()
            .map(|c| {
                if self.guessed_letters.contains(&c) {
                    c
                } else {
                    HIDDEN_LETTER
                }
            })
            .collect()
    }

    /// Distinct letters of the word not guessed yet, in alphabetical order.
    pub fn unguessed_letters(&self) -> Vec<char> {
        self.secret_word
            .chars()
            .filter(|c| !self.guessed_letters.contains(c))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn is_word_complete(&self) -> bool {
        self.secret_word
            .chars()
            .all(|c| self.guessed_letters.contains(&c))
    }

    pub fn guess_letter(&mut self, letter: char) -> Result<GuessReport, GameError> {
        if self.status.is_concluded() {
            return Err(GameError::GameNotActive);
        }
        if !letter.is_ascii_alphabetic() {
            return Err(GameError::InvalidLetter(letter));
        }
        let letter = letter.to_ascii_uppercase();

        if !self.guessed_letters.insert(letter) {
            return Ok(GuessReport {
                letter,
                outcome: GuessOutcome::NoOp,
                status: self.status,
            });
        }

        let outcome = if self.secret_word.contains(letter) {
            GuessOutcome::Correct
        } else {
            self.wrong_count += 1;
            GuessOutcome::Wrong
        };

        // Win is checked before loss.
        self.status = if self.is_word_complete() {
            RoundStatus::Won
        } else if self.wrong_count >= MAX_WRONG {
            RoundStatus::Lost
        } else {
            RoundStatus::InProgress
        };

        Ok(GuessReport {
            letter,
            outcome,
            status: self.status,
        })
    }

    /// Spend a hint to reveal one random unguessed letter.
    pub fn use_hint<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<GuessReport, GameError> {
        if self.status.is_concluded() {
            return Err(GameError::GameNotActive);
        }
        if self.hints_remaining == 0 {
            return Err(GameError::NoHintsRemaining);
        }
        let unguessed = self.unguessed_letters();
        let Some(&letter) = unguessed.choose(rng) else {
            return Err(GameError::NoUnguessedLetters);
        };

        self.hints_remaining -= 1;
        self.guess_letter(letter)
    }
}
