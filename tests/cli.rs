#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cli(store: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("secret-santa-cli").unwrap();
    cmd.env("SANTA_BCRYPT_COST", "4")
        .env("SANTA_OUTBOX", store.with_file_name("outbox"))
        .arg("--store")
        .arg(store);
    cmd
}

#[test]
fn group_people_and_draw() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("santa.json");

    let out = cli(&store)
        .args(["create-group", "--name", "Famille", "--password", "secret1", "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("invite code"))
        .get_output()
        .stdout
        .clone();
    let line = String::from_utf8(out).unwrap();
    let group_id = line.split_whitespace().nth(1).unwrap().to_string();

    for name in ["Alice", "Bob"] {
        cli(&store)
            .args(["add-person", "--group", &group_id, "--name", name])
            .assert()
            .success();
    }

    cli(&store)
        .args(["draw", "--group", &group_id, "--year", "2025"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 3 people"));

    cli(&store)
        .args(["add-person", "--group", &group_id, "--name", "Chloé"])
        .assert()
        .success();

    cli(&store)
        .args(["draw", "--group", &group_id, "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 assignment(s) created"));

    cli(&store)
        .args(["draw", "--group", &group_id, "--year", "2025"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exist"));

    let csv = dir.path().join("pairs.csv");
    cli(&store)
        .args(["assignments", "--group", &group_id, "--year", "2025", "--out-csv"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("→"));
    let exported = std::fs::read_to_string(&csv).unwrap();
    assert!(exported.starts_with("giver,receiver,year"));
    assert_eq!(exported.lines().count(), 4);
}

fn first_field(stdout: &[u8], skip: usize) -> String {
    String::from_utf8(stdout.to_vec())
        .unwrap()
        .split_whitespace()
        .nth(skip)
        .unwrap()
        .to_string()
}

#[test]
fn wishlist_magic_link_and_export() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("santa.json");
    let outbox = dir.path().join("outbox");

    let out = cli(&store)
        .args(["create-group", "--name", "Bureau", "--password", "secret1", "--year", "2025"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let group_id = first_field(&out, 1);

    let out = cli(&store)
        .args(["add-person", "--group", &group_id, "--name", "Alice", "--email", "alice@example.com"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let alice = first_field(&out, 0);

    cli(&store)
        .args(["set-wishlist", "--person", &alice])
        .args(["--item", "Livre|https://example.com/livre"])
        .args(["--item", "Thé vert|https://example.com/the"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 item(s) saved"));

    cli(&store)
        .args(["set-wishlist", "--person", &alice, "--item", "pas de lien"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("title|link"));

    cli(&store)
        .args(["set-wishlist", "--person", &alice, "--item", "Livre|pas-une-url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("valid URL"));

    // même message, inscrit ou non
    cli(&store)
        .args(["magic-link", "--group", &group_id, "--email", "nobody@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("If this email is registered"));
    assert!(!outbox.exists());

    cli(&store)
        .args(["magic-link", "--group", &group_id, "--email", "Alice@Example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("If this email is registered"));
    let mails: Vec<_> = std::fs::read_dir(&outbox).unwrap().collect();
    assert_eq!(mails.len(), 1);
    let mail = std::fs::read_to_string(mails[0].as_ref().unwrap().path()).unwrap();
    let token = mail
        .lines()
        .find_map(|l| l.split_once("/auth/verify?token="))
        .map(|(_, t)| t.trim().to_string())
        .unwrap();

    cli(&store)
        .args(["verify-link", "--token", &token])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"magic-link\""))
        .stdout(predicate::str::contains(alice.as_str()));

    cli(&store)
        .args(["verify-link", "--token", "v1.abc.def"])
        .assert()
        .failure();

    let json = dir.path().join("export.json");
    cli(&store)
        .args(["export", "--out-json"])
        .arg(&json)
        .assert()
        .success();
    let exported = std::fs::read_to_string(&json).unwrap();
    assert!(exported.contains("Thé vert"));
    assert!(exported.contains("alice@example.com"));
}

#[test]
fn currency_only_budget_keeps_amount() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("santa.json");
    let out = cli(&store)
        .args(["create-group", "--name", "Amis", "--password", "secret1"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let group_id = first_field(&out, 1);

    cli(&store)
        .args(["set-budget", "--group", &group_id, "--amount", "30", "--currency", "EUR"])
        .assert()
        .success();
    cli(&store)
        .args(["set-budget", "--group", &group_id, "--currency", "GBP"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Some(30.0) GBP"));
    cli(&store)
        .args(["show-group", "--group", &group_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("budget 30.00 GBP"));
}

#[test]
fn unknown_invite_code_fails() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("santa.json");
    cli(&store)
        .args(["join", "--code", "??????"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid invite code"));
}
