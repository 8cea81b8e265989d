use clap::Subcommand;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use bb_store::StoreError;

use super::{Context, plural};

const MILESTONES: [u64; 7] = [10, 25, 50, 100, 250, 500, 1000];

#[derive(Subcommand)]
pub enum Action {
    /// Show one user's roll breakdown and streak
    Show {
        /// User id
        user: String,
    },

    /// Show totals across all users
    Global,

    /// Users with the most rolls
    Leaderboard {
        /// How many rows to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Print one user's stats as JSON
    Export {
        /// User id
        user: String,
    },

    /// Clear all roll stats (characters are kept unless --all)
    Reset {
        /// Replace the whole file, characters included
        #[arg(long)]
        all: bool,
    },

    /// Clear one user's roll stats
    ResetMine {
        /// User id
        user: String,
    },
}

pub fn run(ctx: &Context, action: Action) -> Result<(), String> {
    match action {
        Action::Show { user } => show(ctx, &user),
        Action::Global => global(ctx),
        Action::Leaderboard { limit } => leaderboard(ctx, limit),
        Action::Export { user } => {
            let doc = ctx.store.load();
            let stats = doc
                .user_stats(&user)
                .ok_or_else(|| format!("no stats to export for {user}"))?;
            let json = serde_json::to_string_pretty(stats)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
            Ok(())
        }
        Action::Reset { all } => {
            if all {
                ctx.store.reset().map_err(|e| e.to_string())?;
                println!("  Everything has been reset.");
            } else {
                ctx.store
                    .update(|doc| -> Result<(), StoreError> {
                        doc.reset_stats();
                        Ok(())
                    })
                    .map_err(|e| e.to_string())?;
                println!("  All Brett stats have been reset.");
            }
            Ok(())
        }
        Action::ResetMine { user } => {
            ctx.store
                .update(|doc| -> Result<bool, StoreError> { Ok(doc.reset_user_stats(&user)) })
                .map_err(|e| e.to_string())?;
            println!("  Brett stats for {user} have been reset.");
            Ok(())
        }
    }
}

fn show(ctx: &Context, user: &str) -> Result<(), String> {
    let doc = ctx.store.load();
    let stats = doc
        .user_stats(user)
        .ok_or_else(|| format!("{user} has no Brett stats yet"))?;

    println!(
        "{} | {} roll{}",
        user.bold(),
        stats.total,
        plural(stats.total)
    );
    for (name, count) in &stats.outcomes {
        println!("  - {name}: {count} ({:.1}%)", stats.share(name));
    }
    if let Some((name, count)) = stats.most_rolled() {
        println!("  Most rolled: {name} x {count}");
    }
    if stats.streak_days > 1 {
        println!("  Streak: {} days", stats.streak_days);
    }
    if let Some(next) = MILESTONES.iter().find(|m| stats.total < **m) {
        println!(
            "  Next milestone: {next} rolls (need {} more)",
            next - stats.total
        );
    }
    Ok(())
}

fn global(ctx: &Context) -> Result<(), String> {
    let doc = ctx.store.load();
    let g = &doc.global;

    println!(
        "{} | {} total roll{}",
        "Global Brett Stats".bold(),
        g.total,
        plural(g.total)
    );
    if g.outcomes.is_empty() {
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Outcome", "Count", "Share"]);
    for (name, count) in &g.outcomes {
        let share = if g.total == 0 {
            0.0
        } else {
            100.0 * *count as f64 / g.total as f64
        };
        table.add_row(vec![name.clone(), count.to_string(), format!("{share:.1}%")]);
    }
    println!("{table}");
    Ok(())
}

fn leaderboard(ctx: &Context, limit: usize) -> Result<(), String> {
    let doc = ctx.store.load();
    let rows = doc.leaderboard(limit);
    if rows.is_empty() {
        println!("  No rolls yet. Time to `brettbot roll`!");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "User", "Rolls"]);
    for (rank, (user, total)) in rows.iter().enumerate() {
        table.add_row(vec![
            (rank + 1).to_string(),
            user.to_string(),
            total.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
