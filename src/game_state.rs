use crate::session::{GameError, GameSession, GuessOutcome, GuessReport, RoundStatus, WordSource};
use crate::stats::{Statistics, StatsStore};
use crate::wordbank;
use rand::Rng;
use serde::Serialize;
use std::io;

/// What the player asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserAction {
    Guess(char),
    Hint,
    NewRound,
    /// Start a bank round after switching language and/or difficulty. `None`
    /// keeps the current choice.
    NewRoundWith {
        language: Option<String>,
        difficulty: Option<String>,
    },
    CustomWord(String),
    Statistics,
    Exit,
}

/// Read-only view of the current round, enough to draw it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub masked_word: String,
    pub guessed_letters: Vec<char>,
    pub wrong_count: u8,
    pub max_wrong: u8,
    pub hints_remaining: u8,
    pub status: RoundStatus,
    pub source: WordSource,
}

impl From<&GameSession> for Snapshot {
    fn from(session: &GameSession) -> Self {
        Self {
            masked_word: session.masked_word(),
            guessed_letters: session.guessed_letters().iter().copied().collect(),
            wrong_count: session.wrong_count(),
            max_wrong: session.max_wrong(),
            hints_remaining: session.hints_remaining(),
            status: session.status(),
            source: session.source(),
        }
    }
}

/// Emitted once, on the guess that ends a round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundConclusion {
    pub status: RoundStatus,
    pub word: String,
    pub statistics: Statistics,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    pub guess: GuessReport,
    pub via_hint: bool,
    pub snapshot: Snapshot,
    pub conclusion: Option<RoundConclusion>,
}

/// Sound notifications for state changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    RoundStarted,
    Correct,
    Wrong,
    Hint,
    Won,
    Lost,
}

/// Optional audio capability. Failures never reach the game.
pub trait Announcer {
    fn announce(&mut self, cue: Cue) -> io::Result<()>;
}

/// Trait for game interface implementations (CLI, TUI, etc.)
pub trait GameInterface {
    /// `None` means the input was not understood; the loop just asks again.
    fn read_action(&mut self) -> Option<UserAction>;
    fn display_snapshot(&mut self, snapshot: &Snapshot);
    fn display_outcome(&mut self, report: &GuessReport, via_hint: bool);
    fn display_conclusion(&mut self, conclusion: &RoundConclusion);
    fn display_statistics(&mut self, stats: &Statistics);
    fn display_error(&mut self, error: &GameError);
    fn display_exit_message(&mut self);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundSettings {
    pub language: String,
    pub difficulty: String,
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
            difficulty: "Medium".to_string(),
        }
    }
}

impl RoundSettings {
    /// Copy with the given names swapped in, normalized to the word bank's
    /// spelling. Unknown names fall back the same way word lookups do.
    pub fn updated(&self, language: Option<&str>, difficulty: Option<&str>) -> Self {
        let (language, difficulty) = wordbank::resolve(
            language.unwrap_or(&self.language),
            difficulty.unwrap_or(&self.difficulty),
        );
        Self {
            language: language.as_str().to_string(),
            difficulty: difficulty.as_str().to_string(),
        }
    }
}

/// Binds the current round to a statistics store and a random source.
pub struct Game<S: StatsStore, R: Rng> {
    session: Option<GameSession>,
    stats: S,
    rng: R,
    settings: RoundSettings,
    announcer: Option<Box<dyn Announcer>>,
}

impl<S: StatsStore, R: Rng> Game<S, R> {
    pub fn new(stats: S, rng: R, settings: RoundSettings) -> Self {
        Self {
            session: None,
            stats,
            rng,
            settings,
            announcer: None,
        }
    }

    #[must_use]
    pub fn with_announcer(mut self, announcer: Box<dyn Announcer>) -> Self {
        self.announcer = Some(announcer);
        self
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn settings(&self) -> &RoundSettings {
        &self.settings
    }

    pub fn statistics(&self) -> Statistics {
        self.stats.statistics()
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.session.as_ref().map(Snapshot::from)
    }

    /// Replace the current round with a fresh one using the configured
    /// language and difficulty. A rejected custom word leaves the current
    /// round untouched.
    pub fn start_round(&mut self, custom_word: Option<&str>) -> Result<Snapshot, GameError> {
        let session = GameSession::start(
            &self.settings.language,
            &self.settings.difficulty,
            custom_word,
            &mut self.rng,
        )?;
        match session.source() {
            WordSource::Bank {
                language,
                difficulty,
            } => log::info!("New round: {language} / {difficulty}"),
            WordSource::Custom => log::info!("New round with a custom word"),
        }
        log::debug!("Secret word has {} letters", session.secret_word().len());

        let snapshot = Snapshot::from(&session);
        self.session = Some(session);
        self.cue(Cue::RoundStarted);
        Ok(snapshot)
    }

    /// Same as [`Game::start_round`] but also changes the configured settings.
    pub fn start_round_with(
        &mut self,
        settings: RoundSettings,
        custom_word: Option<&str>,
    ) -> Result<Snapshot, GameError> {
        let previous = std::mem::replace(&mut self.settings, settings);
        self.start_round(custom_word).inspect_err(|_| {
            self.settings = previous;
        })
    }

    pub fn guess_letter(&mut self, letter: char) -> Result<TurnReport, GameError> {
        let session = self.session.as_mut().ok_or(GameError::GameNotActive)?;
        let report = session.guess_letter(letter)?;
        log::debug!("Guess {} -> {:?}", report.letter, report.outcome);
        self.finish_turn(report, false)
    }

    pub fn use_hint(&mut self) -> Result<TurnReport, GameError> {
        let session = self.session.as_mut().ok_or(GameError::GameNotActive)?;
        let report = session.use_hint(&mut self.rng)?;
        log::debug!(
            "Hint revealed {} ({} left)",
            report.letter,
            session.hints_remaining()
        );
        self.cue(Cue::Hint);
        self.finish_turn(report, true)
    }

    fn finish_turn(&mut self, guess: GuessReport, via_hint: bool) -> Result<TurnReport, GameError> {
        let Some(session) = self.session.as_ref() else {
            return Err(GameError::GameNotActive);
        };
        let snapshot = Snapshot::from(session);
        let word = session.secret_word().to_string();

        match guess.outcome {
            GuessOutcome::Correct => self.cue(Cue::Correct),
            GuessOutcome::Wrong => self.cue(Cue::Wrong),
            GuessOutcome::NoOp => {}
        }

        // Sessions reject guesses once concluded, so a concluded status here
        // means this guess made the transition.
        let conclusion = match guess.status {
            RoundStatus::InProgress => None,
            status => {
                let won = status == RoundStatus::Won;
                let statistics = self.stats.record_result(won)?;
                log::info!("Round {}: {word}", if won { "won" } else { "lost" });
                self.cue(if won { Cue::Won } else { Cue::Lost });
                Some(RoundConclusion {
                    status,
                    word,
                    statistics,
                })
            }
        };

        Ok(TurnReport {
            guess,
            via_hint,
            snapshot,
            conclusion,
        })
    }

    fn cue(&mut self, cue: Cue) {
        if let Some(announcer) = self.announcer.as_mut()
            && let Err(e) = announcer.announce(cue)
        {
            log::debug!("Dropping {cue:?} cue: {e}");
        }
    }
}

fn display_turn<I: GameInterface + ?Sized>(interface: &mut I, turn: &TurnReport) {
    interface.display_outcome(&turn.guess, turn.via_hint);
    interface.display_snapshot(&turn.snapshot);
    if let Some(conclusion) = &turn.conclusion {
        interface.display_conclusion(conclusion);
    }
}

/// Drive rounds until the player exits.
///
/// Recoverable errors are shown to the player; only a statistics failure ends
/// the loop early.
pub fn game_loop<S, R, I>(
    game: &mut Game<S, R>,
    interface: &mut I,
    first_word: Option<&str>,
) -> Result<(), GameError>
where
    S: StatsStore,
    R: Rng,
    I: GameInterface + ?Sized,
{
    let first = match game.start_round(first_word) {
        Err(e) if !e.is_fatal() && first_word.is_some() => {
            interface.display_error(&e);
            game.start_round(None)
        }
        other => other,
    }?;
    interface.display_snapshot(&first);

    loop {
        let Some(action) = interface.read_action() else {
            continue;
        };

        let result = match action {
            UserAction::Exit => {
                interface.display_exit_message();
                return Ok(());
            }
            UserAction::Guess(letter) => game
                .guess_letter(letter)
                .map(|turn| display_turn(interface, &turn)),
            UserAction::Hint => game.use_hint().map(|turn| display_turn(interface, &turn)),
            UserAction::NewRound => game
                .start_round(None)
                .map(|snapshot| interface.display_snapshot(&snapshot)),
            UserAction::NewRoundWith {
                language,
                difficulty,
            } => {
                let settings = game
                    .settings()
                    .updated(language.as_deref(), difficulty.as_deref());
                game.start_round_with(settings, None)
                    .map(|snapshot| interface.display_snapshot(&snapshot))
            }
            UserAction::CustomWord(word) => game
                .start_round(Some(&word))
                .map(|snapshot| interface.display_snapshot(&snapshot)),
            UserAction::Statistics => {
                interface.display_statistics(&game.statistics());
                Ok(())
            }
        };

        if let Err(e) = result {
            if e.is_fatal() {
                log::error!("Stopping: {e}");
                return Err(e);
            }
            interface.display_error(&e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{HINTS_PER_ROUND, MAX_WRONG};
    use crate::stats::{MemoryStats, StatsError};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    fn game() -> Game<MemoryStats, StdRng> {
        Game::new(
            MemoryStats::default(),
            StdRng::seed_from_u64(1),
            RoundSettings::default(),
        )
    }

    struct BrokenStore;

    impl StatsStore for BrokenStore {
        fn statistics(&self) -> Statistics {
            Statistics::default()
        }

        fn record_result(&mut self, _won: bool) -> Result<Statistics, StatsError> {
            Err(StatsError::Io(io::Error::other("read-only filesystem")))
        }
    }

    struct Recorder(Rc<RefCell<Vec<Cue>>>);

    impl Announcer for Recorder {
        fn announce(&mut self, cue: Cue) -> io::Result<()> {
            self.0.borrow_mut().push(cue);
            Ok(())
        }
    }

    struct Broken;

    impl Announcer for Broken {
        fn announce(&mut self, _cue: Cue) -> io::Result<()> {
            Err(io::Error::other("no audio device"))
        }
    }

    #[derive(Default)]
    struct Scripted {
        actions: VecDeque<Option<UserAction>>,
        snapshots: Vec<Snapshot>,
        outcomes: Vec<(GuessOutcome, bool)>,
        conclusions: Vec<RoundConclusion>,
        errors: Vec<String>,
        stats_shown: usize,
        exited: bool,
    }

    impl Scripted {
        fn new(actions: Vec<Option<UserAction>>) -> Self {
            Self {
                actions: actions.into(),
                ..Self::default()
            }
        }
    }

    impl GameInterface for Scripted {
        fn read_action(&mut self) -> Option<UserAction> {
            self.actions.pop_front().unwrap_or(Some(UserAction::Exit))
        }

        fn display_snapshot(&mut self, snapshot: &Snapshot) {
            self.snapshots.push(snapshot.clone());
        }

        fn display_outcome(&mut self, report: &GuessReport, via_hint: bool) {
            self.outcomes.push((report.outcome, via_hint));
        }

        fn display_conclusion(&mut self, conclusion: &RoundConclusion) {
            self.conclusions.push(conclusion.clone());
        }

        fn display_statistics(&mut self, _stats: &Statistics) {
            self.stats_shown += 1;
        }

        fn display_error(&mut self, error: &GameError) {
            self.errors.push(error.to_string());
        }

        fn display_exit_message(&mut self) {
            self.exited = true;
        }
    }

    #[test]
    fn test_operations_before_first_round() {
        let mut game = game();
        assert!(matches!(game.guess_letter('A'), Err(GameError::GameNotActive)));
        assert!(matches!(game.use_hint(), Err(GameError::GameNotActive)));
        assert!(game.snapshot().is_none());
    }

    #[test]
    fn test_win_recorded_once() {
        let mut game = game();
        game.start_round(Some("cat")).unwrap();
        assert!(game.guess_letter('C').unwrap().conclusion.is_none());
        assert!(game.guess_letter('A').unwrap().conclusion.is_none());
        let turn = game.guess_letter('T').unwrap();

        let conclusion = turn.conclusion.unwrap();
        assert_eq!(conclusion.status, RoundStatus::Won);
        assert_eq!(conclusion.word, "CAT");
        assert_eq!(
            conclusion.statistics,
            Statistics {
                games_won: 1,
                games_lost: 0,
                total_games: 1
            }
        );
        assert!(matches!(game.guess_letter('Z'), Err(GameError::GameNotActive)));
        assert_eq!(game.statistics().total_games, 1);
    }

    #[test]
    fn test_loss_recorded_once() {
        let mut game = game();
        game.start_round(Some("dog")).unwrap();
        let mut conclusions = 0;
        for c in ['X', 'Y', 'Z', 'Q', 'W', 'V'] {
            let turn = game.guess_letter(c).unwrap();
            conclusions += usize::from(turn.conclusion.is_some());
        }
        assert_eq!(conclusions, 1);
        let stats = game.statistics();
        assert_eq!((stats.games_won, stats.games_lost, stats.total_games), (0, 1, 1));
        assert_eq!(game.snapshot().unwrap().wrong_count, MAX_WRONG);
    }

    #[test]
    fn test_repeat_guess_leaves_statistics_alone() {
        let mut game = game();
        game.start_round(Some("dog")).unwrap();
        game.guess_letter('X').unwrap();
        let turn = game.guess_letter('x').unwrap();
        assert_eq!(turn.guess.outcome, GuessOutcome::NoOp);
        assert_eq!(turn.snapshot.wrong_count, 1);
        assert_eq!(game.statistics().total_games, 0);
    }

    #[test]
    fn test_hints_can_win_the_round() {
        let mut game = game();
        game.start_round(Some("cat")).unwrap();
        let turns: Vec<_> = (0..3).map(|_| game.use_hint().unwrap()).collect();

        assert!(turns.iter().all(|t| t.via_hint));
        assert!(turns[..2].iter().all(|t| t.conclusion.is_none()));
        assert_eq!(turns[2].snapshot.hints_remaining, 0);
        assert_eq!(turns[2].snapshot.masked_word, "CAT");
        assert_eq!(
            turns[2].conclusion.as_ref().map(|c| c.status),
            Some(RoundStatus::Won)
        );
    }

    #[test]
    fn test_invalid_custom_word_keeps_current_round() {
        let mut game = game();
        game.start_round(Some("hello")).unwrap();
        game.guess_letter('L').unwrap();

        assert!(matches!(
            game.start_round(Some("hi5")),
            Err(GameError::InvalidWord(_))
        ));
        let snapshot = game.snapshot().unwrap();
        assert_eq!(snapshot.masked_word, "__LL_");
        assert_eq!(game.session().unwrap().secret_word(), "HELLO");
    }

    #[test]
    fn test_new_round_resets_state() {
        let mut game = game();
        game.start_round(Some("hello")).unwrap();
        game.guess_letter('Z').unwrap();
        game.use_hint().unwrap();

        let snapshot = game.start_round(None).unwrap();
        assert_eq!(snapshot.wrong_count, 0);
        assert_eq!(snapshot.hints_remaining, HINTS_PER_ROUND);
        assert!(snapshot.guessed_letters.is_empty());
        assert_eq!(snapshot.status, RoundStatus::InProgress);
    }

    #[test]
    fn test_start_round_with_new_settings() {
        let mut game = game();
        let settings = RoundSettings {
            language: "German".to_string(),
            difficulty: "Easy".to_string(),
        };
        let snapshot = game.start_round_with(settings.clone(), None).unwrap();
        assert!(matches!(
            snapshot.source,
            WordSource::Bank {
                language: crate::wordbank::Language::German,
                difficulty: crate::wordbank::Difficulty::Easy
            }
        ));
        assert_eq!(game.settings(), &settings);

        let rejected = RoundSettings::default();
        assert!(game.start_round_with(rejected, Some("x y")).is_err());
        assert_eq!(game.settings(), &settings);
    }

    #[test]
    fn test_settings_update_keeps_unnamed_fields() {
        let current = RoundSettings {
            language: "French".to_string(),
            difficulty: "Hard".to_string(),
        };
        let german = current.updated(Some("german"), None);
        assert_eq!(german.language, "German");
        assert_eq!(german.difficulty, "Hard");

        let easy = current.updated(None, Some("EASY"));
        assert_eq!((easy.language.as_str(), easy.difficulty.as_str()), ("French", "Easy"));

        let unknown = current.updated(Some("Klingon"), Some("Nightmare"));
        assert_eq!(unknown, RoundSettings::default());
    }

    #[test]
    fn test_game_loop_switches_settings_between_rounds() {
        let mut game = game();
        let mut ui = Scripted::new(vec![
            Some(UserAction::NewRoundWith {
                language: Some("spanish".to_string()),
                difficulty: Some("hard".to_string()),
            }),
            Some(UserAction::NewRoundWith {
                language: None,
                difficulty: Some("easy".to_string()),
            }),
        ]);

        game_loop(&mut game, &mut ui, Some("cat")).unwrap();

        let sources: Vec<_> = ui.snapshots.iter().map(|s| s.source).collect();
        assert_eq!(
            sources,
            vec![
                WordSource::Custom,
                WordSource::Bank {
                    language: wordbank::Language::Spanish,
                    difficulty: wordbank::Difficulty::Hard
                },
                WordSource::Bank {
                    language: wordbank::Language::Spanish,
                    difficulty: wordbank::Difficulty::Easy
                },
            ]
        );
        assert_eq!(game.settings().language, "Spanish");
        assert_eq!(game.settings().difficulty, "Easy");
        assert!(ui.errors.is_empty());
    }

    #[test]
    fn test_stats_failure_propagates() {
        let mut game = Game::new(BrokenStore, StdRng::seed_from_u64(1), RoundSettings::default());
        game.start_round(Some("a")).unwrap();
        let err = game.guess_letter('A').unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(game.session().unwrap().status(), RoundStatus::Won);
    }

    #[test]
    fn test_cues_follow_state_changes() {
        let cues = Rc::new(RefCell::new(Vec::new()));
        let mut game = game().with_announcer(Box::new(Recorder(Rc::clone(&cues))));
        game.start_round(Some("ab")).unwrap();
        game.guess_letter('Z').unwrap();
        game.guess_letter('Z').unwrap();
        game.guess_letter('A').unwrap();
        game.use_hint().unwrap();

        assert_eq!(
            *cues.borrow(),
            vec![
                Cue::RoundStarted,
                Cue::Wrong,
                Cue::Correct,
                Cue::Hint,
                Cue::Correct,
                Cue::Won
            ]
        );
    }

    #[test]
    fn test_broken_announcer_changes_nothing() {
        let mut quiet = game();
        let mut noisy = game().with_announcer(Box::new(Broken));
        for game in [&mut quiet, &mut noisy] {
            game.start_round(Some("dog")).unwrap();
            game.guess_letter('D').unwrap();
            game.guess_letter('X').unwrap();
            game.use_hint().unwrap();
        }
        assert_eq!(quiet.snapshot(), noisy.snapshot());
        assert_eq!(quiet.session(), noisy.session());
    }

    #[test]
    fn test_game_loop_full_round() {
        let mut game = game();
        let mut ui = Scripted::new(vec![
            Some(UserAction::Guess('c')),
            None,
            Some(UserAction::Guess('c')),
            Some(UserAction::Guess('z')),
            Some(UserAction::Guess('a')),
            Some(UserAction::Hint),
            Some(UserAction::Statistics),
            Some(UserAction::Exit),
        ]);

        game_loop(&mut game, &mut ui, Some("cat")).unwrap();

        assert!(ui.exited);
        assert_eq!(ui.stats_shown, 1);
        assert_eq!(
            ui.outcomes,
            vec![
                (GuessOutcome::Correct, false),
                (GuessOutcome::NoOp, false),
                (GuessOutcome::Wrong, false),
                (GuessOutcome::Correct, false),
                (GuessOutcome::Correct, true),
            ]
        );
        // One snapshot for the start plus one per turn.
        assert_eq!(ui.snapshots.len(), 6);
        assert_eq!(ui.conclusions.len(), 1);
        assert_eq!(ui.conclusions[0].word, "CAT");
        assert_eq!(game.statistics().games_won, 1);
    }

    #[test]
    fn test_game_loop_reports_recoverable_errors() {
        let mut game = game();
        let mut ui = Scripted::new(vec![
            Some(UserAction::Guess('1')),
            Some(UserAction::CustomWord("hi5".to_string())),
            Some(UserAction::Guess('a')),
            Some(UserAction::Guess('b')),
            Some(UserAction::Exit),
        ]);

        game_loop(&mut game, &mut ui, Some("a")).unwrap();

        assert_eq!(ui.errors.len(), 3);
        assert!(ui.errors[2].contains("no round in progress"));
        assert_eq!(game.statistics().games_won, 1);
    }

    #[test]
    fn test_game_loop_falls_back_when_first_word_invalid() {
        let mut game = game();
        let mut ui = Scripted::new(vec![Some(UserAction::Exit)]);

        game_loop(&mut game, &mut ui, Some("not valid")).unwrap();

        assert_eq!(ui.errors.len(), 1);
        assert_eq!(ui.snapshots.len(), 1);
        assert!(matches!(ui.snapshots[0].source, WordSource::Bank { .. }));
    }

    #[test]
    fn test_game_loop_stops_on_stats_failure() {
        let mut game = Game::new(BrokenStore, StdRng::seed_from_u64(1), RoundSettings::default());
        let mut ui = Scripted::new(vec![
            Some(UserAction::Guess('a')),
            Some(UserAction::Guess('b')),
        ]);

        let result = game_loop(&mut game, &mut ui, Some("a"));

        assert!(matches!(result, Err(GameError::Stats(_))));
        assert!(!ui.exited);
        assert_eq!(ui.actions.len(), 1);
    }
}
