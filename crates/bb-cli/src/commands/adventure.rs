use clap::Subcommand;
use colored::Colorize;

use bb_adventure::{Encounter, TrainStat};
use bb_store::PlayerRecord;

use super::{Context, format_bar, format_countdown, format_eta};

#[derive(Subcommand)]
pub enum Action {
    /// Create your character (does nothing if it already exists)
    Start {
        /// User id
        #[arg(short, long)]
        user: String,

        /// Display name (default: the user id)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Show a character sheet
    Stats {
        /// User id
        #[arg(short, long)]
        user: String,
    },

    /// Spend stamina
    Spend {
        /// User id
        #[arg(short, long)]
        user: String,

        /// Stamina to spend
        #[arg(default_value = "1")]
        amount: u32,
    },

    /// Show when the next stamina point arrives
    Eta {
        /// User id
        #[arg(short, long)]
        user: String,
    },

    /// Spend stamina exploring and apply what was found
    Explore {
        /// User id
        #[arg(short, long)]
        user: String,

        /// XP found
        #[arg(long, default_value_t = 0)]
        xp: u32,

        /// Gold found
        #[arg(long, default_value_t = 0)]
        gold: u64,

        /// HP change (negative for damage)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        hp: i32,

        /// POW change
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        pow: i32,

        /// SMT change
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        smt: i32,
    },

    /// Spend stamina to raise POW or SMT
    Train {
        /// User id
        #[arg(short, long)]
        user: String,

        /// pow or smt (default: alternates by level)
        stat: Option<String>,
    },

    /// Grant experience points
    Xp {
        /// User id
        #[arg(short, long)]
        user: String,

        /// XP to add
        amount: u32,
    },
}

const NO_CHARACTER: &str = "no character yet. Use `adventure start`.";

pub fn run(ctx: &Context, action: Action) -> Result<(), String> {
    let adv = ctx.adventure();

    match action {
        Action::Start { user, name } => {
            let name = name.unwrap_or_else(|| user.clone());
            let p = adv
                .get_or_create_player(&user, &name)
                .map_err(|e| e.to_string())?;
            println!(
                "Welcome to {}, {}! Type `adventure stats`.",
                "Brettventures".bold(),
                p.name
            );
        }
        Action::Stats { user } => {
            let (p, eta) = adv
                .get_player_with_eta(&user)
                .map_err(|e| e.to_string())?
                .ok_or(NO_CHARACTER)?;
            print_sheet(&p, eta, adv.config().xp_to_next(p.level));
        }
        Action::Spend { user, amount } => {
            let p = adv
                .spend_stamina(&user, amount)
                .map_err(|e| e.to_string())?;
            println!("Spent {amount} stamina. STA {}/{}", p.stamina, p.stamina_max);
        }
        Action::Eta { user } => {
            let (p, eta) = adv
                .get_player_with_eta(&user)
                .map_err(|e| e.to_string())?
                .ok_or(NO_CHARACTER)?;
            match eta {
                None => println!("Your stamina is full: {}/{}.", p.stamina, p.stamina_max),
                Some(secs) => println!(
                    "Stamina regenerates over time.\nCurrent: {}/{} | Next +1 in {}",
                    p.stamina,
                    p.stamina_max,
                    format_countdown(secs)
                ),
            }
        }
        Action::Explore {
            user,
            xp,
            gold,
            hp,
            pow,
            smt,
        } => {
            let encounter = Encounter {
                xp,
                gold,
                hp_delta: hp,
                pow,
                smt,
            };
            let up = adv.explore(&user, encounter).map_err(|e| e.to_string())?;
            let p = &up.player;
            println!("{}", explore_summary(&encounter));
            println!(
                "Lv {} | HP {}/{} | STA {}/{}",
                p.level, p.hp, p.hp_max, p.stamina, p.stamina_max
            );
            if up.levels_gained > 0 {
                println!("{} Now level {}.", "Level up!".green().bold(), p.level);
            }
        }
        Action::Train { user, stat } => {
            let stat = stat
                .as_deref()
                .map(str::parse::<TrainStat>)
                .transpose()
                .map_err(|e| e.to_string())?;
            let (stat, p) = adv.train(&user, stat).map_err(|e| e.to_string())?;
            let value = match stat {
                TrainStat::Pow => p.pow,
                TrainStat::Smt => p.smt,
            };
            println!(
                "You train {} and feel stronger. {stat} {value} | STA {}/{}",
                stat.to_string().bold(),
                p.stamina,
                p.stamina_max
            );
        }
        Action::Xp { user, amount } => {
            let up = adv.add_xp(&user, amount).map_err(|e| e.to_string())?;
            println!(
                "+{amount} XP. XP {}/{}",
                up.player.xp,
                adv.config().xp_to_next(up.player.level)
            );
            if up.levels_gained > 0 {
                println!(
                    "{} Now level {}.",
                    "Level up!".green().bold(),
                    up.player.level
                );
            }
        }
    }

    Ok(())
}

fn explore_summary(e: &Encounter) -> String {
    let mut parts = Vec::new();
    if e.xp != 0 {
        parts.push(format!("XP +{}", e.xp));
    }
    if e.gold != 0 {
        parts.push(format!("Gold +{}", e.gold));
    }
    for (label, delta) in [("HP", e.hp_delta), ("POW", e.pow), ("SMT", e.smt)] {
        if delta != 0 {
            parts.push(format!("{label} {delta:+}"));
        }
    }
    if parts.is_empty() {
        "Nothing much happens, but the air smells like adventure.".to_string()
    } else {
        format!("You explore. {}", parts.join(" | "))
    }
}

fn print_sheet(p: &PlayerRecord, eta: Option<i64>, xp_to_next: u32) {
    println!("{} | Lv {}", p.name.bold(), p.level);
    println!(
        "  HP       {:>3}/{:<3} {}",
        p.hp,
        p.hp_max,
        format_bar(i64::from(p.hp), i64::from(p.hp_max), 12)
    );
    println!(
        "  Stamina  {:>3}/{:<3} {}",
        p.stamina,
        p.stamina_max,
        format_bar(i64::from(p.stamina), i64::from(p.stamina_max), 12)
    );
    println!(
        "  POW {} | SMT {} | LCK {} | Gold {}",
        p.pow, p.smt, p.luck, p.gold
    );
    println!(
        "  XP: {}/{} | STA: {}/{} ({})",
        p.xp,
        xp_to_next,
        p.stamina,
        p.stamina_max,
        format_eta(eta)
    );
}
