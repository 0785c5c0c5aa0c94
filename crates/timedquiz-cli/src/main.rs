//! timedquiz CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod terminal;

#[derive(Parser)]
#[command(name = "timedquiz", version, about = "Timed multiple-choice exams in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take an exam
    Take {
        /// Number of questions to draw
        #[arg(long, short = 'n')]
        count: Option<usize>,

        /// Question bank: file path or http(s) URL
        #[arg(long)]
        bank: Option<String>,

        /// Seconds allowed per question
        #[arg(long)]
        time_limit: Option<u32>,

        /// Write the result to a .json or .html file
        #[arg(long)]
        export: Option<PathBuf>,

        /// Hide the per-question review
        #[arg(long)]
        no_review: bool,

        /// Seed for a reproducible question order
        #[arg(long)]
        seed: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a question bank
    Validate {
        /// Question bank: file path or http(s) URL
        #[arg(long)]
        bank: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show or change the color theme
    Theme {
        /// Switch between dark and light
        #[arg(long, conflicts_with_all = ["dark", "light"])]
        toggle: bool,

        /// Use the dark palette
        #[arg(long, conflicts_with = "light")]
        dark: bool,

        /// Use the light palette
        #[arg(long)]
        light: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and sample question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("timedquiz=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            count,
            bank,
            time_limit,
            export,
            no_review,
            seed,
            config,
        } => {
            commands::take::execute(commands::take::TakeArgs {
                count,
                bank,
                time_limit,
                export,
                no_review,
                seed,
                config,
            })
            .await
        }
        Commands::Validate { bank, config } => commands::validate::execute(bank, config).await,
        Commands::Theme {
            toggle,
            dark,
            light,
            config,
        } => {
            let choice = if toggle {
                commands::theme::ThemeChoice::Toggle
            } else if dark {
                commands::theme::ThemeChoice::Dark
            } else if light {
                commands::theme::ThemeChoice::Light
            } else {
                commands::theme::ThemeChoice::Show
            };
            commands::theme::execute(choice, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
