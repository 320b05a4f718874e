//! ctf-reflex CLI - run, replay and benchmark reflex capture agents.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use ctf_reflex::agents::describe_roles;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// ctf-reflex - reflex decision agents for capture the flag
#[derive(Parser, Debug)]
#[command(name = "ctf-reflex")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single match
    Run {
        #[command(flatten)]
        setup: cli::MatchArgs,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Save recording to file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Print the final board
        #[arg(long)]
        show: bool,

        /// Suppress the match banner
        #[arg(short, long)]
        quiet: bool,
    },

    /// Replay a recorded match
    Replay {
        /// Recording file (.json)
        #[arg(required = true)]
        recording: PathBuf,

        /// Output format: ascii or status
        #[arg(short, long, default_value = "ascii")]
        format: cli::ReplayFormat,

        /// Show the state at this turn (default: final turn)
        #[arg(short, long)]
        turn: Option<u32>,

        /// Print every turn up to the target
        #[arg(long)]
        all: bool,

        /// Color the ASCII board
        #[arg(long)]
        color: bool,
    },

    /// Run many matches in parallel and aggregate statistics
    Tournament {
        #[command(flatten)]
        setup: cli::MatchArgs,

        /// Number of games to run (default: 100)
        #[arg(short, long, default_value = "100")]
        games: u64,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Validate a layout file
    Validate {
        /// Layout file to validate
        #[arg(required = true)]
        layout: PathBuf,
    },

    /// List the registered roles
    Roles,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Commands::Run {
            setup,
            seed,
            format,
            save,
            show,
            quiet,
        } => cli::run::execute(&setup, seed, format, save.as_deref(), show, quiet),

        Commands::Replay {
            recording,
            format,
            turn,
            all,
            color,
        } => cli::replay::execute(&recording, format, turn, all, color),

        Commands::Tournament {
            setup,
            games,
            seed,
            threads,
            format,
            progress,
        } => cli::tournament::execute(&setup, games, seed, threads, format, progress),

        Commands::Validate { layout } => cli::validate::execute(&layout),

        Commands::Roles => {
            for (name, description) in describe_roles() {
                println!("{name:<16} {description}");
            }
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
