//! CLI frontend for the Castaway text-adventure engine.

mod commands;
mod terminal;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use cw_fiction::EngineConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "castaway",
    about = "Castaway: play and inspect narrative text adventures",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a story interactively
    Play {
        /// Story content file
        #[arg(short, long, default_value = "story.json")]
        content: PathBuf,

        /// RNG seed for combat and random events
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Code accepted by passcode locks
        #[arg(long)]
        passcode: Option<String>,

        /// Percent chance that looking around shows a random event
        #[arg(long)]
        event_chance: Option<u32>,

        /// Resume from a save file
        #[arg(short, long)]
        load: Option<PathBuf>,
    },

    /// Validate a content file and report problems
    Check {
        /// Story content file
        #[arg(short, long, default_value = "story.json")]
        content: PathBuf,
    },

    /// List scenes, items, or characters
    List {
        /// What to list: scenes, items, characters (default: all)
        kind: Option<String>,

        /// Story content file
        #[arg(short, long, default_value = "story.json")]
        content: PathBuf,
    },

    /// Show details of a scene, item, or character
    Show {
        /// Name or id (case-insensitive)
        name: String,

        /// Story content file
        #[arg(short, long, default_value = "story.json")]
        content: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Play {
            content,
            seed,
            passcode,
            event_chance,
            load,
        } => {
            let mut config = EngineConfig::default().with_seed(seed);
            if let Some(code) = passcode {
                config = config.with_passcode(code);
            }
            if let Some(chance) = event_chance {
                config = config.with_random_event_chance(chance);
            }
            commands::play::run(&content, config, load.as_deref())
        }
        Commands::Check { content } => commands::check::run(&content),
        Commands::List { kind, content } => commands::list::run(&content, kind.as_deref()),
        Commands::Show { name, content } => commands::show::run(&content, &name),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
