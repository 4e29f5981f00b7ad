//! Asset commands

use colored::Colorize;
use log::debug;

use crate::cli::args::GlobalOptions;
use crate::cli::incident::severity_label;
use crate::cli::{AssetFilterArgs, CommandContext, OutputFormat, PaginationArgs};
use crate::client::AssetService;
use crate::client::models::Asset;
use crate::error::Result;
use crate::models::AssetDisplay;
use crate::models::display::common::{format_timestamp, join_or_dash, or_dash};
use crate::output::{Formattable, json::format_json};

/// Run the asset list command
pub async fn list(
    opts: &GlobalOptions,
    filters: &AssetFilterArgs,
    pagination: &PaginationArgs,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let filter = filters.to_filter(pagination);

    let page = AssetService::new(&ctx.api).list(&filter).await?;
    debug!("Fetched {} of {} assets", page.data.len(), page.total);

    let display: Vec<AssetDisplay> = page.data.iter().map(AssetDisplay::from).collect();
    display.print(ctx.format)
}

/// Run the asset get command
pub async fn get(opts: &GlobalOptions, id: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let asset = AssetService::new(&ctx.api).get(id).await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&asset)?),
        OutputFormat::Table => vec![AssetDisplay::from(&asset)].print(ctx.format)?,
        OutputFormat::Pretty => println!("{}", format_pretty(&asset)),
    }
    Ok(())
}

/// Run the asset scan command
pub async fn scan(opts: &GlobalOptions, id: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let started = AssetService::new(&ctx.api).scan(id).await?;

    if ctx.format == OutputFormat::Json {
        println!("{}", format_json(&started)?);
    } else {
        println!(
            "{} Scan {} started for asset {}",
            "✓".green(),
            started.scan_id.bold(),
            id
        );
        println!(
            "  → Run '{}' to follow it",
            format!("cybrty scan watch {}", started.scan_id).cyan()
        );
    }
    Ok(())
}

fn format_pretty(asset: &Asset) -> String {
    let mut lines = vec![
        format!(
            "{} {}  {}",
            asset.id.bold(),
            severity_label(asset.criticality),
            asset.name.bold()
        ),
        format!(
            "Type: {} | OS: {} | Status: {}",
            or_dash(Some(&asset.asset_type)),
            or_dash(Some(&asset.operating_system)),
            asset.status
        ),
        format!(
            "Hostname: {} | IPs: {}",
            or_dash(Some(&asset.hostname)),
            join_or_dash(&asset.ip_addresses)
        ),
        format!(
            "Owner: {} | Location: {}",
            or_dash(Some(&asset.owner)),
            or_dash(Some(&asset.location))
        ),
    ];
    if let Some(seen) = &asset.last_seen {
        lines.push(format!("Last seen: {}", format_timestamp(seen)));
    }
    if !asset.tags.is_empty() {
        lines.push(format!("Tags: {}", asset.tags.join(", ")));
    }
    lines.join("\n")
}
