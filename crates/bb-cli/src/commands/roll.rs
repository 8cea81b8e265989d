use colored::Colorize;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use bb_store::StoreError;

use super::{Context, plural};

pub fn run(
    ctx: &Context,
    user: &str,
    seed: Option<u64>,
    outcomes: &[String],
) -> Result<(), String> {
    if outcomes.is_empty() {
        return Err("give at least one outcome".into());
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let outcome = &outcomes[rng.random_range(0..outcomes.len())];
    let today = ctx.today()?;

    let total = ctx
        .store
        .update(|doc| -> Result<u64, StoreError> {
            Ok(doc.record_roll(user, outcome, today).total)
        })
        .map_err(|e| e.to_string())?;

    println!("Brett says: {}", outcome.bold());
    println!("  {total} roll{} recorded for {user}", plural(total));
    Ok(())
}
