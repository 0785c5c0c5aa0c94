//! The `timedquiz take` command.

use std::path::PathBuf;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;

use timedquiz_bank::config::{create_source, load_config_from};
use timedquiz_core::bank::load_from;
use timedquiz_core::engine::{ExamEngine, ExamInput, ExamOutcome};
use timedquiz_report::{write_report, ExportFormat};

use crate::terminal::{Palette, TerminalPresenter};

pub struct TakeArgs {
    pub count: Option<usize>,
    pub bank: Option<String>,
    pub time_limit: Option<u32>,
    pub export: Option<PathBuf>,
    pub no_review: bool,
    pub seed: Option<u64>,
    pub config: Option<PathBuf>,
}

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Exam(ExamInput),
    Quit,
}

fn parse_input(line: &str) -> Option<Command> {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "" | "n" | "next" => Some(Command::Exam(ExamInput::Advance)),
        "r" | "restart" => Some(Command::Exam(ExamInput::Restart)),
        "q" | "quit" => Some(Command::Quit),
        number => match number.parse::<usize>() {
            Ok(n) if n >= 1 => Some(Command::Exam(ExamInput::Answer(n - 1))),
            _ => None,
        },
    }
}

/// Forward stdin lines to the engine until EOF or `q`.
///
/// A plain thread rather than a runtime task, so a blocked read never holds up
/// shutdown.
fn spawn_stdin_reader() -> mpsc::Receiver<ExamInput> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            match parse_input(&line) {
                Some(Command::Exam(input)) => {
                    if tx.blocking_send(input).is_err() {
                        break;
                    }
                }
                Some(Command::Quit) => break,
                None => eprintln!("Unrecognized input: {}", line.trim()),
            }
        }
    });
    rx
}

/// Wait for a restart request after a finished exam.
async fn wait_for_restart(inputs: &mut mpsc::Receiver<ExamInput>) -> bool {
    while let Some(input) = inputs.recv().await {
        if input == ExamInput::Restart {
            return true;
        }
    }
    false
}

pub async fn execute(args: TakeArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;
    let location = args.bank.unwrap_or_else(|| config.bank.clone());
    let count = args.count.unwrap_or(config.question_count);

    let mut settings = config.exam_settings();
    if let Some(limit) = args.time_limit {
        anyhow::ensure!(limit >= 1, "time limit must be at least 1 second");
        settings.time_limit = limit;
    }
    if let Some(path) = &args.export {
        ExportFormat::from_path(path)?;
    }

    let source = create_source(&location)?;
    tracing::debug!(bank = %location, count, "starting exam session");
    let presenter = TerminalPresenter::new(
        Palette::for_theme(config.dark_mode),
        !args.no_review,
        settings.auto_advance_after_answer,
    );
    let engine = ExamEngine::new(settings);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut inputs = spawn_stdin_reader();

    loop {
        let bank = load_from(&*source).await?;
        presenter.render_intro(count, engine.settings().time_limit);
        let session = engine.start(&bank, count, &mut rng, &presenter)?;

        match engine.run(session, &presenter, &mut inputs).await {
            ExamOutcome::Finished(report) => {
                if let Some(path) = &args.export {
                    write_report(&report, path)?;
                    println!("Report written to {}", path.display());
                }
                println!("\nType r to take another exam, or q to quit.");
                if !wait_for_restart(&mut inputs).await {
                    break;
                }
            }
            ExamOutcome::Restarted { .. } => {
                println!("\nRestarting...");
            }
            ExamOutcome::Closed { answered } => {
                println!("\nExam abandoned after {answered} answer(s).");
                break;
            }
        }
    }

    Ok(())
}
