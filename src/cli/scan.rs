//! Scan commands
//!
//! `launch` and `watch` drive a [`ScanOrchestrator`], showing its progress
//! line in a spinner. Ctrl-C while waiting asks the scanner to cancel.

use std::pin::Pin;
use std::time::Duration;

use colored::Colorize;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat, TargetArgs};
use crate::client::models::{RemoteScanStatus, ScanResults};
use crate::error::{Error, Result, ScanError};
use crate::models::{FindingDisplay, ScanDisplay, ScanStatusDisplay, format_severity_counts};
use crate::models::display::common::format_timestamp;
use crate::output::table::{format_table, format_table_or};
use crate::output::{Formattable, json::format_json};
use crate::scan::{ScanApi, ScanOrchestrator, ScanPhase, ScanState};

/// Run the scan launch command
pub async fn launch(opts: &GlobalOptions, target: &TargetArgs, detach: bool) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let orchestrator = ctx.orchestrator();
    let target = target.to_target();

    debug!("Launching scan of {:?}", target.targets);

    if detach {
        let spinner = spinner(ctx.format);
        let progress = follow_progress(orchestrator.subscribe(), spinner.clone());
        let launched = orchestrator.launch(&target).await;
        progress.abort();
        spinner.finish_and_clear();

        let scan_id = launched?;
        if ctx.format == OutputFormat::Json {
            println!("{}", format_json(&orchestrator.state().status)?);
        } else {
            println!("{} Scan {} launched", "✓".green(), scan_id.bold());
            println!(
                "  → Run '{}' to follow it",
                format!("cybrty scan watch {}", scan_id).cyan()
            );
        }
        return Ok(());
    }

    let outcome = supervise(&orchestrator, ctx.format, orchestrator.run(&target)).await;
    report(&orchestrator, outcome, ctx.format)
}

/// Run the scan watch command
pub async fn watch(opts: &GlobalOptions, scan_id: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let orchestrator = ctx.orchestrator();
    orchestrator.attach(scan_id)?;

    // A scan that already finished needs no polling
    if let Some(status) = orchestrator.check_status().await {
        match status.status {
            RemoteScanStatus::Completed => {
                let results = orchestrator.fetch_results(scan_id).await?;
                return show_results(&results, ctx.format);
            }
            RemoteScanStatus::Failed => {
                let message = status.message.unwrap_or_else(|| "Scan failed".to_string());
                return Err(ScanError::Failed(message).into());
            }
            _ => {}
        }
    }

    let outcome = supervise(&orchestrator, ctx.format, orchestrator.poll()).await;
    report(&orchestrator, outcome, ctx.format)
}

/// Run the scan status command
pub async fn status(opts: &GlobalOptions, scan_id: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let status = ctx.scans.scan_status(scan_id).await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&status)?),
        _ => vec![ScanStatusDisplay::new(scan_id, &status)].print(ctx.format)?,
    }
    Ok(())
}

/// Run the scan results command.
///
/// Results for several scans are fetched concurrently; the ones that
/// succeed are shown even when others fail.
pub async fn results(opts: &GlobalOptions, scan_ids: &[String], refresh: bool) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let api = ctx.scans.as_ref();

    let fetched = join_all(scan_ids.iter().map(|id| async move {
        let outcome = if refresh {
            api.refresh_results(id).await
        } else {
            api.scan_results(id).await
        };
        (id.as_str(), outcome)
    }))
    .await;

    let mut found = Vec::new();
    let mut failed = 0;
    for (id, outcome) in fetched {
        match outcome {
            Ok(results) => found.push(results),
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {}", "✗".red(), id, e);
            }
        }
    }

    match found.as_slice() {
        [] => {}
        [single] => show_results(single, ctx.format)?,
        many => match ctx.format {
            OutputFormat::Json => println!("{}", format_json(many)?),
            _ => many
                .iter()
                .map(ScanDisplay::from)
                .collect::<Vec<_>>()
                .print(ctx.format)?,
        },
    }

    if failed > 0 {
        return Err(Error::Other(format!(
            "{} of {} scans could not be fetched",
            failed,
            scan_ids.len()
        )));
    }
    Ok(())
}

/// Run the scan list command
pub async fn list(opts: &GlobalOptions, company: Option<&str>, limit: Option<usize>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let orchestrator = ctx.orchestrator();

    let mut results = orchestrator.fetch_all_results(company).await?;

    if let Some(limit) = limit {
        results.truncate(limit);
    }

    let display: Vec<ScanDisplay> = results.iter().map(ScanDisplay::from).collect();
    match ctx.format {
        OutputFormat::Json => display.print(ctx.format),
        _ => {
            println!("{}", format_table_or(&display, "No scan results found."));
            Ok(())
        }
    }
}

/// Run the scan cancel command
pub async fn cancel(opts: &GlobalOptions, scan_id: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    if ctx.scans.cancel_scan(scan_id).await {
        println!("{} Scan {} cancelled", "✓".green(), scan_id.bold());
        Ok(())
    } else {
        Err(Error::Other(format!(
            "Scanner did not accept cancellation of scan {}",
            scan_id
        )))
    }
}

/// Drive `work` with a progress spinner; Ctrl-C cancels the running scan.
async fn supervise<F>(
    orchestrator: &ScanOrchestrator,
    format: OutputFormat,
    work: F,
) -> Result<ScanResults>
where
    F: Future<Output = Result<ScanResults>>,
{
    supervise_until(orchestrator, format, work, interrupted()).await
}

async fn supervise_until<F, I>(
    orchestrator: &ScanOrchestrator,
    format: OutputFormat,
    work: F,
    interrupt: I,
) -> Result<ScanResults>
where
    F: Future<Output = Result<ScanResults>>,
    I: Future<Output = ()>,
{
    let spinner = spinner(format);
    let progress = follow_progress(orchestrator.subscribe(), spinner.clone());
    let mut work = std::pin::pin!(work);

    let outcome = tokio::select! {
        outcome = &mut work => outcome,
        _ = interrupt => {
            // There is nothing to cancel until the scanner has assigned an id
            let mut rx = orchestrator.subscribe();
            let launched = async move {
                let _ = rx
                    .wait_for(|s| !matches!(s.phase, ScanPhase::Idle | ScanPhase::Launching))
                    .await;
            };
            tokio::select! {
                outcome = &mut work => outcome,
                _ = launched => cancel_and_finish(orchestrator, work).await,
            }
        }
    };

    progress.abort();
    spinner.finish_and_clear();
    outcome
}

async fn cancel_and_finish<F>(
    orchestrator: &ScanOrchestrator,
    work: Pin<&mut F>,
) -> Result<ScanResults>
where
    F: Future<Output = Result<ScanResults>>,
{
    let state = orchestrator.state();
    if state.phase != ScanPhase::Running {
        return work.await;
    }

    if orchestrator.cancel().await {
        // Polling observes the cancellation and winds down
        work.await
    } else {
        Err(Error::Other(format!(
            "Failed to cancel scan {}; it may still be running",
            state.scan_id.unwrap_or_default()
        )))
    }
}

/// Print the outcome of a supervised scan
fn report(
    orchestrator: &ScanOrchestrator,
    outcome: Result<ScanResults>,
    format: OutputFormat,
) -> Result<()> {
    match outcome {
        Ok(results) => show_results(&results, format),
        Err(Error::Scan(ScanError::Cancelled)) => {
            let state = orchestrator.state();
            println!(
                "{} {} ({})",
                "⚠".yellow(),
                state.progress,
                state.scan_id.unwrap_or_default()
            );
            Ok(())
        }
        Err(e) => Err(e),
    }
}

async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

fn spinner(format: OutputFormat) -> ProgressBar {
    if format == OutputFormat::Json {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Mirror the orchestrator's progress line into the spinner
fn follow_progress(mut rx: watch::Receiver<ScanState>, spinner: ProgressBar) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let progress = rx.borrow_and_update().progress.clone();
            spinner.set_message(progress);
            if rx.changed().await.is_err() {
                break;
            }
        }
    })
}

fn show_results(results: &ScanResults, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", format_json(results)?),
        OutputFormat::Table => vec![ScanDisplay::from(results)].print(format)?,
        OutputFormat::Pretty => println!("{}", format_pretty(results)),
    }
    Ok(())
}

fn format_pretty(results: &ScanResults) -> String {
    let mut lines = vec![format!(
        "Scan {}: {}",
        results.scan_id.bold(),
        results.status
    )];

    if let Some(completed) = &results.completed_at {
        lines.push(format!("Completed: {}", format_timestamp(completed)));
    }
    if let Some(url) = &results.report_url {
        lines.push(format!("Report: {}", url.cyan()));
    }

    let Some(findings) = &results.results else {
        lines.push("No findings reported yet.".dimmed().to_string());
        return lines.join("\n");
    };

    let summary = &findings.summary;
    lines.push(format!(
        "Vulnerabilities: {} ({}) | Duration: {} | Coverage: {}",
        summary.total_vulnerabilities,
        format_severity_counts(summary),
        summary.scan_duration,
        summary.coverage
    ));

    if !findings.vulnerabilities.is_empty() {
        let rows: Vec<FindingDisplay> = findings
            .vulnerabilities
            .iter()
            .map(FindingDisplay::from)
            .collect();
        lines.push(String::new());
        lines.push(format_table(&rows));
    }

    if let Some(compliance) = &findings.compliance_status {
        lines.push(String::new());
        lines.push("Compliance:".bold().to_string());
        for framework in compliance {
            lines.push(format!("  {}: {:.1}%", framework.framework, framework.score));
        }
    }

    lines.join("\n")
}
