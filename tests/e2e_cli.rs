use assert_cmd::assert::OutputAssertExt;

use cli_helpers::{base_cmd, login, portfolio_json, position, run_cmd, run_cmd_json};
use predicates::prelude::*;
use tempfile::TempDir;

fn setup_temp_home() -> TempDir {
    TempDir::new().expect("failed to create temp home")
}

#[test]
fn stocks_list_without_login_no_color_when_piped() {
    let home = setup_temp_home();

    base_cmd(&home)
        .args(["stocks", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AAPL"))
        .stdout(predicate::str::contains("Apple Inc."))
        .stdout(predicate::str::contains("$178.72"))
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn stock_show_unknown_symbol_fails() {
    let home = setup_temp_home();

    base_cmd(&home)
        .args(["stocks", "show", "ZZZZ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("stock with symbol ZZZZ not found"));
}

#[test]
fn portfolio_requires_login() {
    let home = setup_temp_home();

    base_cmd(&home)
        .args(["portfolio", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn login_rejects_wrong_password() {
    let home = setup_temp_home();

    base_cmd(&home)
        .args(["login", "john@example.com", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid email or password"));
}

#[test]
fn demo_user_sees_seeded_portfolio_sorted_by_value() {
    let home = setup_temp_home();
    login(&home, "john@example.com").unwrap();

    base_cmd(&home)
        .args(["portfolio", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MSFT"))
        .stdout(predicate::str::contains("$1,907.65"))
        .stdout(predicate::str::contains("\u{001b}[").not());

    let portfolio = portfolio_json(&home).unwrap();
    let symbols: Vec<&str> = portfolio["positions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["symbol"].as_str().unwrap())
        .collect();
    assert_eq!(symbols, vec!["MSFT", "AAPL", "GOOGL"]);
    assert_eq!(portfolio["total_value"], "4836.05");
    assert_eq!(portfolio["total_cost"], "4061.35");
}

#[test]
fn buy_then_sell_updates_positions() {
    let home = setup_temp_home();
    login(&home, "jane@example.com").unwrap();

    let tx = run_cmd_json(&home, &["buy", "tsla", "3", "--price", "200"]).unwrap();
    assert_eq!(tx["symbol"], "TSLA");
    assert_eq!(tx["transaction_type"], "buy");
    assert_eq!(tx["total"], "600");

    run_cmd(&home, &["sell", "TSLA", "1", "--price", "250"]).unwrap();

    let portfolio = portfolio_json(&home).unwrap();
    let tsla = position(&portfolio, "TSLA").expect("TSLA position");
    assert_eq!(tsla["quantity"], 2);
    assert_eq!(tsla["buy_value"], "600");
    assert_eq!(tsla["sell_value"], "250");
    assert_eq!(tsla["current_price"], "215.49");

    run_cmd(&home, &["sell", "TSLA", "2"]).unwrap();
    let portfolio = portfolio_json(&home).unwrap();
    assert!(position(&portfolio, "TSLA").is_none());
}

#[test]
fn oversell_is_rejected_and_not_recorded() {
    let home = setup_temp_home();
    login(&home, "john@example.com").unwrap();

    base_cmd(&home)
        .args(["sell", "AAPL", "11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("don't own enough AAPL shares to sell 11"));

    base_cmd(&home)
        .args(["buy", "AAPL", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid quantity 0"));

    let txs = run_cmd_json(&home, &["transactions", "list", "--symbol", "aapl"]).unwrap();
    assert_eq!(txs.as_array().unwrap().len(), 1);
}

#[test]
fn signup_starts_with_empty_portfolio() {
    let home = setup_temp_home();
    run_cmd(&home, &["signup", "Ana Lima", "ana@example.com", "s3cret"]).unwrap();

    base_cmd(&home)
        .args(["portfolio", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("You don't own any stocks yet."));

    let me = run_cmd_json(&home, &["whoami"]).unwrap();
    assert_eq!(me["id"], 3);
    assert_eq!(me["email"], "ana@example.com");

    base_cmd(&home)
        .args(["signup", "Other", "ana@example.com", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("User with this email already exists"));
}

#[test]
fn logout_forgets_session() {
    let home = setup_temp_home();
    login(&home, "john@example.com").unwrap();
    run_cmd(&home, &["logout"]).unwrap();

    base_cmd(&home)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

#[test]
fn summary_shows_recent_activity() {
    let home = setup_temp_home();
    login(&home, "john@example.com").unwrap();

    let summary = run_cmd_json(&home, &["portfolio", "summary"]).unwrap();
    assert_eq!(summary["total_invested"], "4061.35");
    assert_eq!(summary["symbols_traded"], 3);
    assert_eq!(summary["recent"][0]["symbol"], "GOOGL");
}

#[test]
fn memory_storage_forgets_trades_between_runs() {
    let home = setup_temp_home();
    let config = home.path().join("memory.toml");
    std::fs::write(&config, "storage = \"memory\"\n").unwrap();
    let config = config.to_str().unwrap();

    run_cmd(&home, &["--config", config, "login", "jane@example.com", "password123"]).unwrap();
    run_cmd(&home, &["--config", config, "buy", "JPM", "1"]).unwrap();

    let portfolio = run_cmd_json(&home, &["--config", config, "portfolio", "show"]).unwrap();
    assert!(portfolio["positions"].as_array().unwrap().is_empty());
}
