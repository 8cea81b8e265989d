//! Integration tests for the bb CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const T: i64 = 1_700_000_000;
const HOUR: i64 = 3600;

/// Command pinned to `now`, with a clean environment and a local stats file.
fn at(dir: &TempDir, now: i64) -> Command {
    let mut cmd = Command::cargo_bin("brettbot").unwrap();
    cmd.current_dir(dir.path())
        .env("NO_COLOR", "1")
        .env("BV_STAMINA_REGEN_SECS", HOUR.to_string())
        .env_remove("BV_STAMINA_MAX")
        .env_remove("BV_STAMINA_START")
        .env_remove("STATS_FILE")
        .env_remove("RUST_LOG")
        .args(["--file", "stats.json", "--now", &now.to_string()]);
    cmd
}

fn brettbot(dir: &TempDir) -> Command {
    at(dir, T)
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).expect("valid JSON")
}

// ---------------------------------------------------------------------------
// roll + stats
// ---------------------------------------------------------------------------

#[test]
fn roll_records_outcome() {
    let dir = TempDir::new().unwrap();
    brettbot(&dir)
        .args(["roll", "--user", "42", "--seed", "7", "Nah"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Brett says: Nah")
                .and(predicate::str::contains("1 roll recorded")),
        );

    let json = read_json(&dir.path().join("stats.json"));
    assert_eq!(json["global"]["total"], 1);
    assert_eq!(json["users"]["42"]["outcomes"]["Nah"], 1);
    assert_eq!(json["users"]["42"]["last_roll_date"], "2023-11-14");
}

#[test]
fn roll_picks_from_outcomes() {
    let dir = TempDir::new().unwrap();
    brettbot(&dir)
        .args(["roll", "-u", "1", "-s", "3", "You Betcha", "Could Be"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("You Betcha").or(predicate::str::contains("Could Be")),
        );
}

#[test]
fn roll_requires_outcomes() {
    let dir = TempDir::new().unwrap();
    brettbot(&dir)
        .args(["roll", "--user", "1"])
        .assert()
        .failure();
    assert!(!dir.path().join("stats.json").exists());
}

#[test]
fn stats_show_breakdown_and_streak() {
    let dir = TempDir::new().unwrap();
    for day in 0..3 {
        at(&dir, T + day * 24 * HOUR)
            .args(["roll", "--user", "42", "Nah"])
            .assert()
            .success();
    }

    brettbot(&dir)
        .args(["stats", "show", "42"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("3 rolls")
                .and(predicate::str::contains("Nah: 3 (100.0%)"))
                .and(predicate::str::contains("Streak: 3 days"))
                .and(predicate::str::contains("need 7 more")),
        );
}

#[test]
fn stats_show_unknown_user_fails() {
    let dir = TempDir::new().unwrap();
    brettbot(&dir)
        .args(["stats", "show", "404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no Brett stats yet"));
}

#[test]
fn leaderboard_orders_by_total() {
    let dir = TempDir::new().unwrap();
    for user in ["alice", "bob", "bob"] {
        brettbot(&dir)
            .args(["roll", "--user", user, "Nah"])
            .assert()
            .success();
    }

    let output = brettbot(&dir)
        .args(["stats", "leaderboard"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    let bob = text.find("bob").expect("bob listed");
    let alice = text.find("alice").expect("alice listed");
    assert!(bob < alice);
}

#[test]
fn leaderboard_empty() {
    let dir = TempDir::new().unwrap();
    brettbot(&dir)
        .args(["stats", "leaderboard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No rolls yet"));
}

#[test]
fn global_stats_table() {
    let dir = TempDir::new().unwrap();
    brettbot(&dir)
        .args(["roll", "--user", "1", "Could Be"])
        .assert()
        .success();
    brettbot(&dir)
        .args(["stats", "global"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("1 total roll").and(predicate::str::contains("Could Be")),
        );
}

#[test]
fn export_prints_json() {
    let dir = TempDir::new().unwrap();
    brettbot(&dir)
        .args(["roll", "--user", "9", "Nah"])
        .assert()
        .success();

    let output = brettbot(&dir)
        .args(["stats", "export", "9"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON output");
    assert_eq!(json["total"], 1);
    assert_eq!(json["streak_days"], 1);
}

#[test]
fn reset_mine_only_touches_one_user() {
    let dir = TempDir::new().unwrap();
    for user in ["1", "2"] {
        brettbot(&dir)
            .args(["roll", "--user", user, "Nah"])
            .assert()
            .success();
    }
    brettbot(&dir)
        .args(["stats", "reset-mine", "1"])
        .assert()
        .success();

    let json = read_json(&dir.path().join("stats.json"));
    assert_eq!(json["users"]["1"]["total"], 0);
    assert_eq!(json["users"]["2"]["total"], 1);
    assert_eq!(json["global"]["total"], 2);
}

#[test]
fn reset_keeps_characters_unless_all() {
    let dir = TempDir::new().unwrap();
    brettbot(&dir)
        .args(["roll", "--user", "1", "Nah"])
        .assert()
        .success();
    brettbot(&dir)
        .args(["adventure", "start", "--user", "1"])
        .assert()
        .success();

    brettbot(&dir).args(["stats", "reset"]).assert().success();
    let json = read_json(&dir.path().join("stats.json"));
    assert_eq!(json["global"]["total"], 0);
    assert!(json["players"]["1"].is_object());

    brettbot(&dir)
        .args(["stats", "reset", "--all"])
        .assert()
        .success();
    let json = read_json(&dir.path().join("stats.json"));
    assert!(json["players"].as_object().unwrap().is_empty());
}

#[test]
fn corrupt_file_is_backed_up_and_replaced() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("stats.json"), "{{{ nope").unwrap();

    brettbot(&dir)
        .args(["roll", "--user", "1", "Nah"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("stats.json.corrupt")).unwrap(),
        "{{{ nope"
    );
    let json = read_json(&dir.path().join("stats.json"));
    assert_eq!(json["global"]["total"], 1);
}

// ---------------------------------------------------------------------------
// adventure
// ---------------------------------------------------------------------------

#[test]
fn adventure_start_and_stats() {
    let dir = TempDir::new().unwrap();
    brettbot(&dir)
        .args(["adventure", "start", "--user", "7", "--name", "Brett"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome to Brettventures, Brett!"));

    brettbot(&dir)
        .args(["adventure", "stats", "--user", "7"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Brett | Lv 1")
                .and(predicate::str::contains("XP: 0/10"))
                .and(predicate::str::contains("STA: 5/5 (Full)")),
        );
}

#[test]
fn adventure_stats_without_character_fails() {
    let dir = TempDir::new().unwrap();
    brettbot(&dir)
        .args(["adventure", "stats", "--user", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("adventure start"));
}

#[test]
fn adventure_stamina_regenerates_over_time() {
    let dir = TempDir::new().unwrap();
    brettbot(&dir)
        .args(["adventure", "start", "--user", "7"])
        .assert()
        .success();
    brettbot(&dir)
        .args(["adventure", "spend", "--user", "7", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("STA 2/5"));

    at(&dir, T + 1800)
        .args(["adventure", "eta", "--user", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current: 2/5 | Next +1 in 0h 30m 00s"));

    at(&dir, T + HOUR)
        .args(["adventure", "stats", "--user", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("STA: 3/5 (+1 in 1h 00m)"));

    at(&dir, T + 3 * HOUR)
        .args(["adventure", "eta", "--user", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Your stamina is full: 5/5."));
}

#[test]
fn adventure_overspend_fails_and_keeps_file() {
    let dir = TempDir::new().unwrap();
    brettbot(&dir)
        .args(["adventure", "start", "--user", "7"])
        .assert()
        .success();
    let before = fs::read(dir.path().join("stats.json")).unwrap();

    brettbot(&dir)
        .args(["adventure", "spend", "--user", "7", "6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not enough stamina: need 6, have 5"));

    assert_eq!(fs::read(dir.path().join("stats.json")).unwrap(), before);
}

#[test]
fn adventure_train_and_xp() {
    let dir = TempDir::new().unwrap();
    brettbot(&dir)
        .args(["adventure", "start", "--user", "7"])
        .assert()
        .success();

    brettbot(&dir)
        .args(["adventure", "train", "--user", "7", "smt"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("SMT 1").and(predicate::str::contains("STA 3/5")),
        );

    brettbot(&dir)
        .args(["adventure", "train", "--user", "7", "luck"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown stat"));

    brettbot(&dir)
        .args(["adventure", "xp", "--user", "7", "12"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Level up!").and(predicate::str::contains("Now level 2.")),
        );
}

#[test]
fn adventure_unknown_user_spend_fails() {
    let dir = TempDir::new().unwrap();
    brettbot(&dir)
        .args(["adventure", "spend", "--user", "404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no character for user 404"));
}

#[test]
fn adventure_explore_applies_encounter() {
    let dir = TempDir::new().unwrap();
    brettbot(&dir)
        .args(["adventure", "start", "--user", "7"])
        .assert()
        .success();

    brettbot(&dir)
        .args(["adventure", "explore", "--user", "7", "--gold", "4", "--hp=-50"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Gold +4")
                .and(predicate::str::contains("HP -50"))
                .and(predicate::str::contains("HP 1/10"))
                .and(predicate::str::contains("STA 4/5")),
        );

    let json = read_json(&dir.path().join("stats.json"));
    assert_eq!(json["players"]["7"]["gold"], 4);
    assert_eq!(json["players"]["7"]["hp"], 1);

    brettbot(&dir)
        .args(["adventure", "explore", "--user", "7", "--xp", "10"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Now level 2.").and(predicate::str::contains("HP 11/11")),
        );
}

#[test]
fn adventure_explore_needs_stamina() {
    let dir = TempDir::new().unwrap();
    brettbot(&dir)
        .args(["adventure", "start", "--user", "7"])
        .assert()
        .success();
    brettbot(&dir)
        .args(["adventure", "spend", "--user", "7", "5"])
        .assert()
        .success();
    let before = fs::read(dir.path().join("stats.json")).unwrap();

    brettbot(&dir)
        .args(["adventure", "explore", "--user", "7", "--gold", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not enough stamina: need 1, have 0"));
    assert_eq!(fs::read(dir.path().join("stats.json")).unwrap(), before);
}
