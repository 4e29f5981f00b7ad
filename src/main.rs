//! Cybrty CLI - security operations from the terminal

use clap::Parser;

use cybrty::cli::args::GlobalOptions;
use cybrty::cli::{
    AlertCommands, AssetCommands, Cli, Commands, IncidentCommands, ScanCommands, VulnCommands,
};
use cybrty::error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG still wins over --debug
    let default_filter = if cli.debug { "cybrty=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init => cybrty::cli::init::run(&opts).await,
        Commands::Status => cybrty::cli::status::run(&opts).await,
        Commands::Version => {
            println!("cybrty version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Scan(scan_cmd) => match scan_cmd {
            ScanCommands::Launch { target, detach } => {
                cybrty::cli::scan::launch(&opts, &target, detach).await
            }
            ScanCommands::Watch { scan_id } => cybrty::cli::scan::watch(&opts, &scan_id).await,
            ScanCommands::Status { scan_id } => cybrty::cli::scan::status(&opts, &scan_id).await,
            ScanCommands::Results { scan_ids, refresh } => {
                cybrty::cli::scan::results(&opts, &scan_ids, refresh).await
            }
            ScanCommands::List { company, limit } => {
                cybrty::cli::scan::list(&opts, company.as_deref(), limit).await
            }
            ScanCommands::Cancel { scan_id } => cybrty::cli::scan::cancel(&opts, &scan_id).await,
        },
        Commands::Incident(incident_cmd) => match incident_cmd {
            IncidentCommands::List {
                filters,
                pagination,
            } => cybrty::cli::incident::list(&opts, &filters, &pagination).await,
            IncidentCommands::Get { id } => cybrty::cli::incident::get(&opts, &id).await,
            IncidentCommands::Assign { id, assignee } => {
                cybrty::cli::incident::assign(&opts, &id, &assignee).await
            }
            IncidentCommands::Close { id, resolution } => {
                cybrty::cli::incident::close(&opts, &id, &resolution).await
            }
        },
        Commands::Asset(asset_cmd) => match asset_cmd {
            AssetCommands::List {
                filters,
                pagination,
            } => cybrty::cli::asset::list(&opts, &filters, &pagination).await,
            AssetCommands::Get { id } => cybrty::cli::asset::get(&opts, &id).await,
            AssetCommands::Scan { id } => cybrty::cli::asset::scan(&opts, &id).await,
        },
        Commands::Vuln(vuln_cmd) => match vuln_cmd {
            VulnCommands::List {
                filters,
                pagination,
            } => cybrty::cli::vuln::list(&opts, &filters, &pagination).await,
            VulnCommands::Get { id } => cybrty::cli::vuln::get(&opts, &id).await,
            VulnCommands::Patch { id } => cybrty::cli::vuln::patch(&opts, &id).await,
        },
        Commands::Alert(alert_cmd) => match alert_cmd {
            AlertCommands::List {
                filters,
                pagination,
            } => cybrty::cli::alert::list(&opts, &filters, &pagination).await,
        },
        Commands::Completion { shell } => cybrty::cli::completions::run(shell),
    }
}
