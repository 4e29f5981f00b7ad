//! Alert commands

use log::debug;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, ListFilterArgs, PaginationArgs};
use crate::client::AlertService;
use crate::error::Result;
use crate::models::AlertDisplay;
use crate::output::Formattable;

/// Run the alert list command
pub async fn list(
    opts: &GlobalOptions,
    filters: &ListFilterArgs,
    pagination: &PaginationArgs,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let filter = filters.to_filter(pagination);

    let page = AlertService::new(&ctx.api).list(&filter).await?;
    debug!("Fetched {} of {} alerts", page.data.len(), page.total);

    let display: Vec<AlertDisplay> = page.data.iter().map(AlertDisplay::from).collect();
    display.print(ctx.format)
}
