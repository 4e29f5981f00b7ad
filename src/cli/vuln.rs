//! Vulnerability commands

use colored::Colorize;
use log::debug;

use crate::cli::args::GlobalOptions;
use crate::cli::incident::severity_label;
use crate::cli::{CommandContext, OutputFormat, PaginationArgs, VulnFilterArgs};
use crate::client::VulnerabilityService;
use crate::client::models::Vulnerability;
use crate::error::Result;
use crate::models::VulnDisplay;
use crate::models::display::common::{format_timestamp, or_dash};
use crate::output::{Formattable, json::format_json};

/// Run the vuln list command
pub async fn list(
    opts: &GlobalOptions,
    filters: &VulnFilterArgs,
    pagination: &PaginationArgs,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let filter = filters.to_filter(pagination);

    let page = VulnerabilityService::new(&ctx.api).list(&filter).await?;
    debug!("Fetched {} of {} vulnerabilities", page.data.len(), page.total);

    let display: Vec<VulnDisplay> = page.data.iter().map(VulnDisplay::from).collect();
    display.print(ctx.format)
}

/// Run the vuln get command
pub async fn get(opts: &GlobalOptions, id: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let vuln = VulnerabilityService::new(&ctx.api).get(id).await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&vuln)?),
        OutputFormat::Table => vec![VulnDisplay::from(&vuln)].print(ctx.format)?,
        OutputFormat::Pretty => println!("{}", format_pretty(&vuln)),
    }
    Ok(())
}

/// Run the vuln patch command
pub async fn patch(opts: &GlobalOptions, id: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let vuln = VulnerabilityService::new(&ctx.api).patch(id).await?;

    if ctx.format == OutputFormat::Json {
        println!("{}", format_json(&vuln)?);
    } else {
        println!(
            "{} Vulnerability {} is now {}",
            "✓".green(),
            vuln.id.bold(),
            vuln.status
        );
    }
    Ok(())
}

fn format_pretty(vuln: &Vulnerability) -> String {
    let yes_no = |b: bool| if b { "yes" } else { "no" };

    let mut lines = vec![
        format!(
            "{} {}  {}",
            or_dash(Some(&vuln.cve_id)).bold(),
            severity_label(vuln.severity),
            vuln.title.bold()
        ),
        format!(
            "ID: {} | CVSS: {:.1} | Risk: {:.1} | Status: {}",
            vuln.id, vuln.cvss_score, vuln.risk_score, vuln.status
        ),
        format!(
            "Vendor: {} | Product: {} | Discovered: {}",
            or_dash(Some(&vuln.vendor)),
            or_dash(Some(&vuln.product)),
            format_timestamp(&vuln.discovered_date)
        ),
        format!(
            "Exploit available: {} | Patch available: {}",
            yes_no(vuln.exploit_available),
            yes_no(vuln.patch_available)
        ),
    ];
    if !vuln.description.is_empty() {
        lines.push(String::new());
        lines.push(vuln.description.clone());
    }
    if !vuln.affected_assets.is_empty() {
        lines.push(String::new());
        lines.push("Affected assets:".bold().to_string());
        for asset in &vuln.affected_assets {
            lines.push(format!("  {} {}", "•".dimmed(), asset.name));
        }
    }
    lines.join("\n")
}
