//! Pagination argument types for CLI commands

use clap::Args;

use crate::client::models::PageParams;

/// Shared pagination arguments for list commands.
///
/// Flatten this into any command that supports pagination:
/// ```ignore
/// List {
///     #[command(flatten)]
///     pagination: PaginationArgs,
/// }
/// ```
#[derive(Args, Debug, Default, Clone)]
pub struct PaginationArgs {
    /// Maximum results to return
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Page number (1-indexed)
    #[arg(long, short = 'p')]
    pub page: Option<usize>,
}

impl PaginationArgs {
    /// Convert CLI args to API page params. Unset values are left to the
    /// server's defaults.
    pub fn to_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_params() {
        let args = PaginationArgs {
            limit: Some(25),
            page: None,
        };
        assert_eq!(
            args.to_params(),
            PageParams {
                page: None,
                limit: Some(25)
            }
        );
        assert_eq!(PaginationArgs::default().to_params(), PageParams::default());
    }
}
