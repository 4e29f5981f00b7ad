//! Status command implementation

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::cli::CommandContext;
use crate::config::Config;
use crate::error::Result;
use crate::scan::ScanApi;

/// Run the status command to display configuration and backend status
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "Cybrty Configuration Status".bold());

    let ctx = match CommandContext::new(opts) {
        Ok(ctx) => ctx,
        Err(e) => {
            println!("{} Configuration not usable: {}", "✗".red(), e);
            println!();
            println!(
                "Run {} to create a configuration file.",
                "cybrty init".cyan()
            );
            println!();
            return Ok(());
        }
    };

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!("Config file: {}", config_path.display().to_string().cyan());
    println!();

    let config = &ctx.config;
    match config.auth_token {
        Some(_) if config.is_token_expired() => {
            println!("{} Session token expired", "⚠".yellow());
            println!("  → Run 'cybrty init' to sign in again");
        }
        Some(_) => match config.token_expires_at() {
            Some(expires) => {
                let remaining = expires.signed_duration_since(chrono::Utc::now());
                println!(
                    "{} Session token valid (expires in {}h {}m)",
                    "✓".green(),
                    remaining.num_hours(),
                    remaining.num_minutes() % 60
                );
            }
            None => println!("{} Session token configured", "✓".green()),
        },
        None => {
            println!("{} No session token configured", "○".dimmed());
            println!("  → Run 'cybrty init' to add one");
        }
    }

    if config.api_key.is_some() {
        println!("{} API key configured", "✓".green());
    }

    println!();
    println!("Platform API: {}", config.api_url.cyan());

    let (scanner_up, results_up) =
        tokio::join!(ctx.scans.scanner_health(), ctx.scans.results_health());
    print_health("Scanner API", &config.scanner_url, scanner_up);
    print_health("Results API", &config.results_url, results_up);
    println!();

    Ok(())
}

fn print_health(name: &str, url: &str, healthy: bool) {
    if healthy {
        println!("{} {}: {} (reachable)", "✓".green(), name, url.cyan());
    } else {
        println!("{} {}: {} (unreachable)", "✗".red(), name, url.cyan());
    }
}
