//! CLI harness for Brett Bot: roll statistics and Brettventures.

mod commands;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use bb_adventure::{Clock, SystemClock};
use bb_store::JsonStore;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::Context;

#[derive(Parser)]
#[command(
    name = "brettbot",
    about = "Brett Bot: roll stats and Brettventures from the terminal",
    version,
    propagate_version = true
)]
struct Cli {
    /// JSON file holding stats and characters
    #[arg(
        short,
        long,
        global = true,
        env = "STATS_FILE",
        default_value = "stats.json"
    )]
    file: PathBuf,

    /// Treat this Unix timestamp as the current time
    #[arg(long, global = true, hide = true)]
    now: Option<i64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Brettventures: characters, stamina, training
    Adventure {
        #[command(subcommand)]
        action: commands::adventure::Action,
    },

    /// Ask Brett: pick one of the given outcomes and record it
    Roll {
        /// User id to record the roll for
        #[arg(short, long)]
        user: String,

        /// RNG seed for a reproducible pick
        #[arg(short, long)]
        seed: Option<u64>,

        /// Possible outcomes
        #[arg(required = true)]
        outcomes: Vec<String>,
    },

    /// Roll statistics, leaderboard, resets
    Stats {
        #[command(subcommand)]
        action: commands::stats::Action,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let ctx = Context {
        store: Arc::new(JsonStore::new(cli.file)),
        now: cli.now.unwrap_or_else(|| SystemClock.now()),
    };
    debug!(file = %ctx.store.path().display(), now = ctx.now, "starting");

    let result = match cli.command {
        Commands::Adventure { action } => commands::adventure::run(&ctx, action),
        Commands::Roll {
            user,
            seed,
            outcomes,
        } => commands::roll::run(&ctx, &user, seed, &outcomes),
        Commands::Stats { action } => commands::stats::run(&ctx, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
