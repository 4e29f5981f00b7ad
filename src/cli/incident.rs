//! Incident management commands

use colored::Colorize;
use log::debug;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, ListFilterArgs, OutputFormat, PaginationArgs};
use crate::client::IncidentService;
use crate::client::models::{Incident, Severity};
use crate::error::Result;
use crate::models::IncidentDisplay;
use crate::models::display::common::{format_timestamp, join_or_dash, or_dash};
use crate::output::{Formattable, json::format_json};

/// Run the incident list command
pub async fn list(
    opts: &GlobalOptions,
    filters: &ListFilterArgs,
    pagination: &PaginationArgs,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let filter = filters.to_filter(pagination);

    debug!("Fetching incidents with {:?}", filter);
    let page = IncidentService::new(&ctx.api).list(&filter).await?;
    debug!(
        "Fetched {} of {} incidents (page {}/{})",
        page.data.len(),
        page.total,
        page.page,
        page.total_pages
    );

    let display: Vec<IncidentDisplay> = page.data.iter().map(IncidentDisplay::from).collect();
    display.print(ctx.format)?;

    if ctx.format == OutputFormat::Pretty && page.has_more() {
        println!(
            "\n{}",
            format!(
                "Page {} of {}. Use --page {} for more.",
                page.page,
                page.total_pages,
                page.page + 1
            )
            .dimmed()
        );
    }

    Ok(())
}

/// Run the incident get command
pub async fn get(opts: &GlobalOptions, id: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let incident = IncidentService::new(&ctx.api).get(id).await?;
    show(&incident, ctx.format)
}

/// Run the incident assign command
pub async fn assign(opts: &GlobalOptions, id: &str, assignee: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let incident = IncidentService::new(&ctx.api).assign(id, assignee).await?;

    if ctx.format == OutputFormat::Json {
        println!("{}", format_json(&incident)?);
    } else {
        println!(
            "{} Incident {} assigned to {}",
            "✓".green(),
            incident.id.bold(),
            assignee.cyan()
        );
    }
    Ok(())
}

/// Run the incident close command
pub async fn close(opts: &GlobalOptions, id: &str, resolution: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let incident = IncidentService::new(&ctx.api).close(id, resolution).await?;

    if ctx.format == OutputFormat::Json {
        println!("{}", format_json(&incident)?);
    } else {
        println!(
            "{} Incident {} is now {}",
            "✓".green(),
            incident.id.bold(),
            incident.status
        );
    }
    Ok(())
}

fn show(incident: &Incident, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", format_json(incident)?),
        OutputFormat::Table => vec![IncidentDisplay::from(incident)].print(format)?,
        OutputFormat::Pretty => println!("{}", format_pretty(incident)),
    }
    Ok(())
}

/// Colored severity label
pub fn severity_label(severity: Severity) -> String {
    let label = severity.as_str().to_uppercase();
    match severity {
        Severity::Critical => label.red().bold().to_string(),
        Severity::High => label.red().to_string(),
        Severity::Medium => label.yellow().to_string(),
        Severity::Low => label.blue().to_string(),
        Severity::Unknown => label.dimmed().to_string(),
    }
}

fn format_pretty(incident: &Incident) -> String {
    let mut lines = vec![
        format!(
            "{} {}  {}",
            incident.id.bold(),
            severity_label(incident.severity),
            incident.title.bold()
        ),
        format!(
            "Status: {} | Priority: {:.1} | Assignee: {}",
            incident.status,
            incident.priority_score,
            or_dash(incident.assigned_to.as_deref())
        ),
        format!(
            "Created: {} | Updated: {}",
            format_timestamp(&incident.created_at),
            format_timestamp(&incident.updated_at)
        ),
    ];

    if let Some(closed) = &incident.closed_at {
        lines.push(format!("Closed: {}", format_timestamp(closed)));
    }
    if !incident.tags.is_empty() {
        lines.push(format!("Tags: {}", join_or_dash(&incident.tags)));
    }
    if !incident.description.is_empty() {
        lines.push(String::new());
        lines.push(incident.description.clone());
    }
    if !incident.affected_assets.is_empty() {
        lines.push(String::new());
        lines.push("Affected assets:".bold().to_string());
        for asset in &incident.affected_assets {
            lines.push(format!(
                "  {} {} ({})",
                "•".dimmed(),
                asset.name,
                asset.criticality
            ));
        }
    }

    lines.join("\n")
}
