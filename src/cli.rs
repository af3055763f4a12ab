use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// consign-admin: marketplace administration from the terminal.
#[derive(Parser, Debug)]
#[command(name = "consign-admin", version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Admin API base URL (overrides CONSIGN_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token (overrides CONSIGN_API_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Rows per page (overrides CONSIGN_PAGE_SIZE)
    #[arg(long, global = true)]
    pub page_size: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Browse a collection in an interactive table
    Browse(BrowseArgs),

    /// Print one page of a collection
    List(ListArgs),

    /// Print a single record
    Show(ShowArgs),

    /// Approve a pending withdrawal
    ApproveWithdrawal(IdArgs),

    /// Reject a pending withdrawal
    RejectWithdrawal(ReasonArgs),

    /// Approve a requested refund
    ApproveRefund(IdArgs),

    /// Reject a requested refund
    RejectRefund(ReasonArgs),

    /// Suspend a shop
    SuspendShop(IdArgs),

    /// Reactivate a suspended shop
    ReactivateShop(IdArgs),

    /// Cancel an auction
    CancelAuction(ReasonArgs),
}

/// Admin collections.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Accounts,
    Shops,
    Auctions,
    Consignments,
    Orders,
    Transactions,
    Withdrawals,
    Refunds,
}

/// Arguments for the `browse` subcommand.
#[derive(Parser, Debug)]
pub struct BrowseArgs {
    pub resource: ResourceKind,

    /// Write logs here; the terminal is owned by the table while browsing
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Arguments for the `list` subcommand.
#[derive(Parser, Debug)]
pub struct ListArgs {
    pub resource: ResourceKind,

    /// 1-based page number
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Column key to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Filter as name=value (repeatable)
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Output records as the server sent them, one JSON object per line
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `show` subcommand.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    pub resource: ResourceKind,

    pub id: u64,

    /// Output the record as the server sent it, as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct IdArgs {
    pub id: u64,
}

#[derive(Parser, Debug)]
pub struct ReasonArgs {
    pub id: u64,

    /// Reason recorded with the action
    #[arg(long)]
    pub reason: String,
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {raw:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing filter name in {raw:?}"));
    }
    Ok((name.to_string(), value.to_string()))
}
