//! TUI (Terminal User Interface) module for Hangman
//!
//! This module provides an interactive terminal interface using Ratatui.
//!
//! # Keys
//! - `A`-`Z`: guess a letter
//! - `Tab`: use a hint
//! - `Enter`: start a new round with the selected language and difficulty
//! - `F2`: refresh the statistics panel
//! - `F3` / `F4`: cycle the language / difficulty for the next round
//! - `F5`: type a custom word (`Enter` starts the round, `Esc` cancels)
//! - `Esc`: quit

use crate::cli::{describe_source, gallows, spaced};
use crate::game_state::{GameInterface, RoundConclusion, RoundSettings, Snapshot, UserAction};
use crate::session::{GameError, GuessOutcome, GuessReport, RoundStatus};
use crate::stats::Statistics;
use crate::wordbank::{self, Difficulty, Language};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);
const FIGURE_STYLE: Style = Style::new().fg(Color::Red);

/// Choices for the next round, made from the keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RoundSetup {
    language: Language,
    difficulty: Difficulty,
    /// `Some` while the player is typing a custom word.
    custom_word: Option<String>,
}

impl RoundSetup {
    fn new(settings: &RoundSettings) -> Self {
        let (language, difficulty) = wordbank::resolve(&settings.language, &settings.difficulty);
        Self {
            language,
            difficulty,
            custom_word: None,
        }
    }

    fn is_entering_word(&self) -> bool {
        self.custom_word.is_some()
    }

    /// Map a key press to an action. `Err` carries a message for the player.
    fn handle_key(&mut self, code: KeyCode) -> Result<Option<UserAction>, String> {
        if let Some(word) = self.custom_word.as_mut() {
            return match code {
                KeyCode::Esc => {
                    self.custom_word = None;
                    Ok(None)
                }
                KeyCode::Enter => Ok(self.custom_word.take().map(UserAction::CustomWord)),
                KeyCode::Backspace => {
                    word.pop();
                    Ok(None)
                }
                KeyCode::Char(c) if c.is_ascii_alphabetic() => {
                    word.push(c.to_ascii_uppercase());
                    Ok(None)
                }
                KeyCode::Char(c) => Err(format!("Only letters are allowed! ('{c}' is not a letter)")),
                _ => Ok(None),
            };
        }

        match code {
            KeyCode::Esc => Ok(Some(UserAction::Exit)),
            KeyCode::Enter => Ok(Some(UserAction::NewRoundWith {
                language: Some(self.language.as_str().to_string()),
                difficulty: Some(self.difficulty.as_str().to_string()),
            })),
            KeyCode::Tab => Ok(Some(UserAction::Hint)),
            KeyCode::F(2) => Ok(Some(UserAction::Statistics)),
            KeyCode::F(3) => {
                self.language = self.language.next();
                Ok(None)
            }
            KeyCode::F(4) => {
                self.difficulty = self.difficulty.next();
                Ok(None)
            }
            KeyCode::F(5) => {
                self.custom_word = Some(String::new());
                Ok(None)
            }
            KeyCode::Char(c) if c.is_ascii_alphabetic() => Ok(Some(UserAction::Guess(c))),
            KeyCode::Char(c) => Err(format!("Only letters are allowed! ('{c}' is not a letter)")),
            _ => Ok(None),
        }
    }

    fn describe(&self) -> String {
        match &self.custom_word {
            // Masked so a second player can set the word.
            Some(word) => format!(
                "Custom word: {} (ENTER to start, ESC to cancel)",
                "*".repeat(word.len())
            ),
            None => format!(
                "Next round: {} / {} (F3 language, F4 difficulty, ENTER to start)",
                self.language, self.difficulty
            ),
        }
    }
}

/// Context for rendering the UI.
struct RenderContext<'a> {
    snapshot: Option<&'a Snapshot>,
    statistics: &'a Statistics,
    message: &'a str,
    message_style: Style,
    error_message: &'a str,
    status: &'a str,
    entering_word: bool,
}

/// Main TUI interface component.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    snapshot: Option<Snapshot>,
    statistics: Statistics,
    message: String,
    message_style: Style,
    error_message: String,
    status: String,
    setup: RoundSetup,
}

impl TuiInterface {
    pub fn new(statistics: Statistics, settings: &RoundSettings) -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete");

        Ok(Self {
            terminal,
            snapshot: None,
            statistics,
            message: String::new(),
            message_style: MESSAGE_STYLE,
            error_message: String::new(),
            status: "Ready to start".to_string(),
            setup: RoundSetup::new(settings),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            snapshot: self.snapshot.as_ref(),
            statistics: &self.statistics,
            message: &self.message,
            message_style: self.message_style,
            error_message: &self.error_message,
            status: &self.status,
            entering_word: self.setup.is_entering_word(),
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn set_message(&mut self, message: String, style: Style) {
        self.message = message;
        self.message_style = style;
    }

    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Title
                Constraint::Length(11), // Figure + word
                Constraint::Min(6),     // Info panel
                Constraint::Length(3),  // Status line
                Constraint::Length(3),  // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0]);
        Self::render_board(f, chunks[1], ctx.snapshot, ctx.statistics);
        Self::render_info(f, chunks[2], ctx);
        Self::render_status(f, chunks[3], ctx.status);
        Self::render_instructions(f, chunks[4], ctx.snapshot, ctx.entering_word);
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("HANGMAN")
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_board(f: &mut Frame, area: Rect, snapshot: Option<&Snapshot>, stats: &Statistics) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(15), // Gallows
                Constraint::Min(20),    // Word
                Constraint::Length(24), // Leaderboard
            ])
            .split(area);

        let wrong = snapshot.map_or(0, |s| s.wrong_count);
        let figure: Vec<Line> = gallows(wrong)
            .into_iter()
            .map(|row| Line::from(Span::styled(row, FIGURE_STYLE)))
            .collect();
        f.render_widget(
            Paragraph::new(figure).block(Block::default().borders(Borders::ALL)),
            columns[0],
        );

        let mut lines = Vec::new();
        if let Some(snapshot) = snapshot {
            let word_style = match snapshot.status {
                RoundStatus::InProgress => Style::default().add_modifier(Modifier::BOLD),
                RoundStatus::Won => SUCCESS_STYLE,
                RoundStatus::Lost => ERROR_STYLE.add_modifier(Modifier::BOLD),
            };
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                spaced(&snapshot.masked_word),
                word_style,
            )));
            lines.push(Line::from(""));
            let guessed: Vec<String> =
                snapshot.guessed_letters.iter().map(char::to_string).collect();
            lines.push(Line::from(format!("Guessed: {}", guessed.join(", "))));
            lines.push(Line::from(format!(
                "Wrong Guesses: {}/{}",
                snapshot.wrong_count, snapshot.max_wrong
            )));
            lines.push(Line::from(format!(
                "Hints Remaining: {}",
                snapshot.hints_remaining
            )));
            lines.push(Line::from(Span::styled(
                describe_source(snapshot.source),
                INFO_STYLE,
            )));
        }
        f.render_widget(
            Paragraph::new(lines).block(Block::default().title("Word").borders(Borders::ALL)),
            columns[1],
        );

        let leaderboard = vec![
            Line::from(format!("Played: {}", stats.total_games)),
            Line::from(format!("Won:    {}", stats.games_won)),
            Line::from(format!("Lost:   {}", stats.games_lost)),
            Line::from(format!("Win rate: {:.1}%", stats.win_rate())),
        ];
        f.render_widget(
            Paragraph::new(leaderboard)
                .block(Block::default().title("Leaderboard").borders(Borders::ALL)),
            columns[2],
        );
    }

    fn render_info(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let mut lines = Vec::new();
        if !ctx.message.is_empty() {
            lines.push(Line::from(Span::styled(ctx.message, ctx.message_style)));
        }
        if !ctx.error_message.is_empty() {
            lines.push(Line::from(Span::styled(ctx.error_message, ERROR_STYLE)));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_instructions(
        f: &mut Frame,
        area: Rect,
        snapshot: Option<&Snapshot>,
        entering_word: bool,
    ) {
        let in_progress = snapshot.is_some_and(|s| !s.status.is_concluded());
        let text = if entering_word {
            "A-Z: Type word | BACKSPACE: Delete | ENTER: Start round | ESC: Cancel"
        } else if in_progress {
            "A-Z: Guess | TAB: Hint | ENTER: New round | F2: Stats | F3/F4: Language/Level | F5: Custom word | ESC: Quit"
        } else {
            "ENTER: New round | F2: Stats | F3/F4: Language/Level | F5: Custom word | ESC: Quit"
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn handle_input(&mut self) -> Result<Option<UserAction>, io::Error> {
        if !event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => {
                // Only process Press events, ignore Release and Repeat to avoid double input
                if key.kind != event::KeyEventKind::Press {
                    return Ok(None);
                }
                debug_log!("handle_input() - Key event: {:?}", key.code);
                Ok(self.handle_key(key))
            }
            other => {
                debug_log!("handle_input() - Ignoring event: {:?}", other);
                Ok(None)
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<UserAction> {
        if Self::has_modifier_keys(&key) {
            return None;
        }
        self.error_message.clear();
        let before = self.setup.clone();
        let action = match self.setup.handle_key(key.code) {
            Ok(action) => action,
            Err(message) => {
                self.error_message = message;
                None
            }
        };
        if self.setup != before {
            self.status = self.setup.describe();
        }
        action
    }

    fn has_modifier_keys(key: &KeyEvent) -> bool {
        key.modifiers.contains(event::KeyModifiers::ALT)
            || key.modifiers.contains(event::KeyModifiers::CONTROL)
    }
}

impl GameInterface for TuiInterface {
    fn read_action(&mut self) -> Option<UserAction> {
        loop {
            if self.draw().is_err() {
                info_log!("read_action() - Draw failed, returning Exit");
                return Some(UserAction::Exit);
            }

            match self.handle_input() {
                Ok(Some(action)) => {
                    info_log!("read_action() - Action received: {:?}", action);
                    return Some(action);
                }
                Ok(None) => {}
                Err(_e) => {
                    info_log!("read_action() - Error handling input, returning Exit");
                    return Some(UserAction::Exit);
                }
            }
        }
    }

    fn display_snapshot(&mut self, snapshot: &Snapshot) {
        if snapshot.guessed_letters.is_empty() {
            self.set_message(
                format!("Game started! {}", describe_source(snapshot.source)),
                MESSAGE_STYLE,
            );
            self.status = "New round - guess a letter".to_string();
        }
        self.snapshot = Some(snapshot.clone());
        self.draw_or_log();
    }

    fn display_outcome(&mut self, report: &GuessReport, via_hint: bool) {
        let letter = report.letter;
        let (message, style) = match report.outcome {
            GuessOutcome::Correct if via_hint => (
                format!("Hint used. The letter '{letter}' is in the word."),
                INFO_STYLE,
            ),
            GuessOutcome::Correct => (
                format!("✓ Great! '{letter}' is in the word!"),
                SUCCESS_STYLE,
            ),
            GuessOutcome::Wrong => (
                format!("✗ Sorry, '{letter}' is not in the word."),
                ERROR_STYLE,
            ),
            GuessOutcome::NoOp => (format!("You already guessed '{letter}'."), MESSAGE_STYLE),
        };
        self.set_message(message, style);
        self.status = "Round in progress".to_string();
    }

    fn display_conclusion(&mut self, conclusion: &RoundConclusion) {
        self.statistics = conclusion.statistics;
        let word = spaced(&conclusion.word);
        let (message, style) = match conclusion.status {
            RoundStatus::Won => (format!("🎉 YOU WIN! The word was: {word}"), SUCCESS_STYLE),
            RoundStatus::Lost => (format!("💀 GAME OVER! The word was: {word}"), ERROR_STYLE),
            RoundStatus::InProgress => return,
        };
        self.set_message(message, style);
        self.status = "Round over - press ENTER for a new round".to_string();
        self.draw_or_log();
    }

    fn display_statistics(&mut self, stats: &Statistics) {
        self.statistics = *stats;
        self.status = format!(
            "Total Games Played: {} | Win Rate: {:.1}%",
            stats.total_games,
            stats.win_rate()
        );
        self.draw_or_log();
    }

    fn display_error(&mut self, error: &GameError) {
        self.error_message = error.to_string();
        self.draw_or_log();
    }

    fn display_exit_message(&mut self) {
        self.set_message("Exiting...".to_string(), MESSAGE_STYLE);
        self.status = "Exiting application...".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
