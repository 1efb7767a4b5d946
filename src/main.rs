use hangman::cli::{CliInterface, TerminalBell, display_word_bank, parse_cli};
use hangman::game_state::{Game, GameInterface, RoundSettings, game_loop};
use hangman::logging::init_logging;
use hangman::stats::{MemoryStats, StatsFile, StatsStore, default_stats_path};
use hangman::tui::TuiInterface;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = parse_cli();

    if let Err(e) = init_logging(cli.log_file.as_deref()) {
        eprintln!("Failed to open log file: {e}");
        return ExitCode::FAILURE;
    }

    if cli.list {
        display_word_bank();
        return ExitCode::SUCCESS;
    }

    let result = if cli.no_save {
        run(&cli, MemoryStats::default())
    } else {
        let path = cli.stats.clone().unwrap_or_else(default_stats_path);
        match StatsFile::load(&path) {
            Ok(store) => {
                log::info!("Using statistics file {}", store.path().display());
                run(&cli, store)
            }
            Err(e) => {
                eprintln!("Failed to load statistics from '{}': {e}", path.display());
                return ExitCode::FAILURE;
            }
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run<S: StatsStore>(cli: &hangman::cli::Cli, stats: S) -> Result<(), Box<dyn std::error::Error>> {
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let settings = RoundSettings {
        language: cli.language.clone(),
        difficulty: cli.difficulty.clone(),
    };
    let mut game = Game::new(stats, rng, settings);
    if cli.bell {
        game = game.with_announcer(Box::new(TerminalBell::stderr()));
    }

    let mut interface: Box<dyn GameInterface> = if cli.tui {
        Box::new(TuiInterface::new(game.statistics(), game.settings())?)
    } else {
        Box::new(CliInterface::new(io::stdin().lock()))
    };

    game_loop(&mut game, interface.as_mut(), cli.word.as_deref())?;
    Ok(())
}
