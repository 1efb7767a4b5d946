use crate::game_state::{Announcer, Cue, GameInterface, RoundConclusion, Snapshot, UserAction};
use crate::session::{GameError, GuessOutcome, GuessReport, RoundStatus, WordSource};
use crate::debug_log;
use crate::stats::Statistics;
use crate::wordbank;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Hangman: guess the hidden word one letter at a time
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Word bank language (English, Spanish, French, German)
    #[arg(short, long, default_value = "English")]
    pub language: String,

    /// Word bank difficulty (Easy, Medium, Hard)
    #[arg(short, long, default_value = "Medium")]
    pub difficulty: String,

    /// Play the first round with this word instead of a random one
    #[arg(short, long)]
    pub word: Option<String>,

    /// Path to the statistics file
    #[arg(long, value_name = "PATH")]
    pub stats: Option<PathBuf>,

    /// Keep statistics in memory only
    #[arg(long, conflicts_with = "stats")]
    pub no_save: bool,

    /// Use the full-screen terminal interface
    #[arg(long)]
    pub tui: bool,

    /// Ring the terminal bell on wrong guesses and losses
    #[arg(long)]
    pub bell: bool,

    /// Write log output to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// List the available languages and difficulties, then exit
    #[arg(long)]
    pub list: bool,

    /// Seed for the random source, for reproducible rounds
    #[arg(long)]
    pub seed: Option<u64>,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

const GALLOWS_TOP: [&str; 2] = ["  +---+", "  |   |"];
const GALLOWS_BASE: [&str; 2] = ["      |", "========="];

/// The hangman figure for a given number of wrong guesses.
pub fn gallows(wrong_count: u8) -> [&'static str; 7] {
    let head = if wrong_count >= 1 { "  O   |" } else { "      |" };
    let body = match wrong_count {
        0 | 1 => "      |",
        2 => "  |   |",
        3 => " /|   |",
        _ => " /|\\  |",
    };
    let legs = match wrong_count {
        0..=4 => "      |",
        5 => " /    |",
        _ => " / \\  |",
    };
    [
        GALLOWS_TOP[0],
        GALLOWS_TOP[1],
        head,
        body,
        legs,
        GALLOWS_BASE[0],
        GALLOWS_BASE[1],
    ]
}

/// `HELLO` -> `H E L L O`
pub fn spaced(word: &str) -> String {
    word.chars()
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn describe_source(source: WordSource) -> String {
    match source {
        WordSource::Bank {
            language,
            difficulty,
        } => format!("Difficulty: {difficulty} | Language: {language}"),
        WordSource::Custom => "Custom word".to_string(),
    }
}

pub fn parse_action(input: &str) -> Option<UserAction> {
    let input = input.trim();
    let lower = input.to_lowercase();
    match lower.as_str() {
        "exit" | "quit" => return Some(UserAction::Exit),
        "hint" | "?" => return Some(UserAction::Hint),
        "new" | "next" => return Some(UserAction::NewRound),
        "stats" => return Some(UserAction::Statistics),
        _ => {}
    }
    if let Some(word) = lower.strip_prefix("word ") {
        return Some(UserAction::CustomWord(word.trim().to_string()));
    }
    let words: Vec<&str> = lower.split_whitespace().collect();
    let (language, difficulty) = match words.as_slice() {
        ["lang" | "language", name] => (Some(*name), None),
        ["level" | "difficulty", name] => (None, Some(*name)),
        ["new", language, level] => (Some(*language), Some(*level)),
        _ => (None, None),
    };
    if language.is_some() || difficulty.is_some() {
        return Some(UserAction::NewRoundWith {
            language: language.map(str::to_string),
            difficulty: difficulty.map(str::to_string),
        });
    }
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(UserAction::Guess(c)),
        _ => None,
    }
}

pub fn read_action<R: BufRead>(reader: &mut R) -> Option<UserAction> {
    print!(
        "\nGuess a letter (or 'hint', 'new [LANG LEVEL]', 'lang <LANG>', 'level <LEVEL>', \
         'word <WORD>', 'stats', 'exit'): "
    );
    if let Err(e) = io::stdout().flush() {
        debug_log!("Prompt flush error: {}", e);
    }
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) | Err(_) => return Some(UserAction::Exit),
        Ok(_) => {}
    }
    let action = parse_action(&input);
    if action.is_none() {
        println!("Invalid input. Type a single letter or a command.");
    }
    action
}

pub fn display_snapshot(snapshot: &Snapshot) {
    println!();
    for line in gallows(snapshot.wrong_count) {
        println!("{line}");
    }
    println!();
    println!("Word: {}", spaced(&snapshot.masked_word));
    if snapshot.guessed_letters.is_empty() {
        println!("Game started! {}", describe_source(snapshot.source));
    } else {
        let guessed: Vec<String> = snapshot.guessed_letters.iter().map(char::to_string).collect();
        println!("Guessed: {}", guessed.join(", "));
    }
    println!(
        "Wrong Guesses: {}/{}  Hints Remaining: {}",
        snapshot.wrong_count, snapshot.max_wrong, snapshot.hints_remaining
    );
}

pub fn display_outcome(report: &GuessReport, via_hint: bool) {
    let letter = report.letter;
    match report.outcome {
        GuessOutcome::Correct if via_hint => {
            println!("Hint used. The letter '{letter}' is in the word.");
        }
        GuessOutcome::Correct => println!("✓ Great! '{letter}' is in the word!"),
        GuessOutcome::Wrong => println!("✗ Sorry, '{letter}' is not in the word."),
        GuessOutcome::NoOp => println!("You already guessed '{letter}'."),
    }
}

pub fn display_conclusion(conclusion: &RoundConclusion) {
    let headline = match conclusion.status {
        RoundStatus::Won => "🎉 YOU WIN!",
        RoundStatus::Lost => "💀 GAME OVER!",
        RoundStatus::InProgress => return,
    };
    println!("{headline} The word was: {}", spaced(&conclusion.word));
    println!(
        "Games Won: {}  Games Lost: {}",
        conclusion.statistics.games_won, conclusion.statistics.games_lost
    );
    println!("Type 'new' to play again or 'exit' to quit.");
}

pub fn display_statistics(stats: &Statistics) {
    println!("🏆 LEADERBOARD 🏆");
    println!("Total Games Played: {}", stats.total_games);
    println!("Games Won: {}", stats.games_won);
    println!("Games Lost: {}", stats.games_lost);
    println!("Win Rate: {:.1}%", stats.win_rate());
}

pub fn display_error(error: &GameError) {
    println!("! {error}");
}

pub fn display_exit_message() {
    println!("Goodbye!");
}

pub fn display_word_bank() {
    println!("Languages: {}", wordbank::languages().collect::<Vec<_>>().join(", "));
    println!(
        "Difficulties: {}",
        wordbank::difficulties().collect::<Vec<_>>().join(", ")
    );
}

/// CLI implementation of the `GameInterface` trait.
/// Wraps a `BufRead` reader so tests can script the player's input.
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn read_action(&mut self) -> Option<UserAction> {
        read_action(&mut self.reader)
    }

    fn display_snapshot(&mut self, snapshot: &Snapshot) {
        display_snapshot(snapshot);
    }

    fn display_outcome(&mut self, report: &GuessReport, via_hint: bool) {
        display_outcome(report, via_hint);
    }

    fn display_conclusion(&mut self, conclusion: &RoundConclusion) {
        display_conclusion(conclusion);
    }

    fn display_statistics(&mut self, stats: &Statistics) {
        display_statistics(stats);
    }

    fn display_error(&mut self, error: &GameError) {
        display_error(error);
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }
}

/// Rings BEL on wrong guesses and lost rounds.
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl TerminalBell<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> Announcer for TerminalBell<W> {
    fn announce(&mut self, cue: Cue) -> io::Result<()> {
        if matches!(cue, Cue::Wrong | Cue::Lost) {
            self.out.write_all(b"\x07")?;
            self.out.flush()?;
        }
        Ok(())
    }
}
