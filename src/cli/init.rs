//! Init command implementation

use colored::Colorize;
use dialoguer::{Confirm, Input, Password, theme::ColorfulTheme};

use crate::cli::args::GlobalOptions;
use crate::config::Config;
use crate::error::Result;

/// Run the init command
///
/// Prompts for the three backend URLs and credentials, starting from the
/// existing config (or the defaults) and CLI/env overrides.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Welcome to Cybrty!".bold().green());
    println!("Let's set up your Cybrty configuration.\n");

    let mut config = Config::load_at(opts.config_ref()).unwrap_or_default();
    opts.apply(&mut config);

    let theme = ColorfulTheme::default();

    config.api_url = Input::with_theme(&theme)
        .with_prompt("Platform API URL")
        .default(config.api_url.clone())
        .interact_text()?;

    config.scanner_url = Input::with_theme(&theme)
        .with_prompt("Scanner API URL")
        .default(config.scanner_url.clone())
        .interact_text()?;

    config.results_url = Input::with_theme(&theme)
        .with_prompt("Results API URL")
        .default(config.results_url.clone())
        .interact_text()?;

    let keep_token = config.auth_token.is_some()
        && Confirm::with_theme(&theme)
            .with_prompt("Keep the existing session token?")
            .default(true)
            .interact()?;

    if !keep_token {
        let token: String = Password::with_theme(&theme)
            .with_prompt("Session token (leave empty to skip)")
            .allow_empty_password(true)
            .interact()?;
        config.auth_token = (!token.is_empty()).then_some(token);
    }

    let api_key: String = Password::with_theme(&theme)
        .with_prompt("API key (leave empty to keep current)")
        .allow_empty_password(true)
        .interact()?;
    if !api_key.is_empty() {
        config.api_key = Some(api_key);
    }

    config.validate()?;
    config.save_at(opts.config_ref())?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );

    if config.auth_token.is_some() && config.is_token_expired() {
        println!("{} The session token has already expired", "⚠".yellow());
    }

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Check backend connectivity", "cybrty status".cyan());
    println!("  {} - List open incidents", "cybrty incident list".cyan());
    println!(
        "  {} - Run a penetration test",
        "cybrty scan launch <target>".cyan()
    );

    Ok(())
}
