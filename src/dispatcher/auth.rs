use anyhow::{Context, Result};
use colored::Colorize;
use investo::app::App;
use investo::auth::Session;

use crate::cli::formatters;

fn save_and_report(app: &App, session: &Session, verb: &str, json_output: bool) -> Result<()> {
    app.session.save(session).context("Failed to save session")?;

    if json_output {
        println!("{}", formatters::format_json(&session.user));
    } else {
        print!(
            "{} {} as {}",
            "✓".green().bold(),
            verb,
            formatters::format_user(&session.user)
        );
    }
    Ok(())
}

pub async fn dispatch_login(
    app: &App,
    email: &str,
    password: &str,
    json_output: bool,
) -> Result<()> {
    let session = app.auth.login(email, password).await?;
    save_and_report(app, &session, "Logged in", json_output)
}

pub async fn dispatch_signup(
    app: &App,
    name: &str,
    email: &str,
    password: &str,
    json_output: bool,
) -> Result<()> {
    let session = app.auth.signup(name, email, password).await?;
    save_and_report(app, &session, "Signed up", json_output)
}

pub async fn dispatch_whoami(app: &App, json_output: bool) -> Result<()> {
    let user = super::optional_user(app).await?;

    match (user, json_output) {
        (user, true) => println!("{}", formatters::format_json(&user)),
        (Some(user), false) => print!("{}", formatters::format_user(&user)),
        (None, false) => println!("{} Not logged in", "ℹ".blue().bold()),
    }
    Ok(())
}

pub fn dispatch_logout(app: &App, json_output: bool) -> Result<()> {
    app.session.clear()?;
    tracing::info!("Session cleared");

    if json_output {
        println!("{}", formatters::format_json(&serde_json::json!({ "logged_out": true })));
    } else {
        println!("{} Logged out", "✓".green().bold());
    }
    Ok(())
}
