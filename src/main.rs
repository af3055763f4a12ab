mod actions;
mod browse;
mod cli;
mod error;
mod notify;
mod output;
mod table;

use std::collections::BTreeMap;
use std::io;
use std::sync::Mutex;

use clap::Parser;
use cli::{Cli, Command, ListArgs, ResourceKind, ShowArgs};
use consign::{
    Consign, ConsignConfig, ConsignError, FilterValue, PageRequest, QueryState, Resource,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::actions::Action;
use crate::error::AdminError;
use crate::notify::LogNotifier;

/// Run `$body` with `$r` bound to the record type of `$kind`.
macro_rules! with_resource {
    ($kind:expr, $r:ident => $body:expr) => {
        match $kind {
            ResourceKind::Accounts => {
                type $r = consign::Account;
                $body
            }
            ResourceKind::Shops => {
                type $r = consign::Shop;
                $body
            }
            ResourceKind::Auctions => {
                type $r = consign::Auction;
                $body
            }
            ResourceKind::Consignments => {
                type $r = consign::Consignment;
                $body
            }
            ResourceKind::Orders => {
                type $r = consign::Order;
                $body
            }
            ResourceKind::Transactions => {
                type $r = consign::Transaction;
                $body
            }
            ResourceKind::Withdrawals => {
                type $r = consign::Withdrawal;
                $body
            }
            ResourceKind::Refunds => {
                type $r = consign::Refund;
                $body
            }
        }
    };
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv(); // load .env if present

    // Initialize tracing
    if let Err(e) = init_tracing(&cli) {
        eprintln!("consign-admin: {e}");
        std::process::exit(1);
    }

    // Shared cancellation token + signal handlers.
    let cancel = setup_signal_handlers();

    let browsing = matches!(cli.command, Command::Browse(_));
    if let Err(e) = run(cli, cancel).await {
        tracing::error!(error = %e, "fatal error");
        if browsing {
            // Logs went to the file (or nowhere) while the table was up.
            eprintln!("consign-admin: {e}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, cancel: CancellationToken) -> Result<(), AdminError> {
    let config = load_config(&cli)?;
    let consign = Consign::new(config)?;

    match cli.command {
        Command::Browse(args) => {
            with_resource!(args.resource, R => browse::run_browse::<R>(consign, cancel).await)
        }

        Command::List(args) => with_resource!(args.resource, R => list::<R>(&consign, &args).await),

        Command::Show(args) => with_resource!(args.resource, R => show::<R>(&consign, &args).await),

        Command::ApproveWithdrawal(args) => {
            act(&consign, Action::ApproveWithdrawal, args.id, "").await
        }
        Command::RejectWithdrawal(args) => {
            act(&consign, Action::RejectWithdrawal, args.id, &args.reason).await
        }
        Command::ApproveRefund(args) => act(&consign, Action::ApproveRefund, args.id, "").await,
        Command::RejectRefund(args) => {
            act(&consign, Action::RejectRefund, args.id, &args.reason).await
        }
        Command::SuspendShop(args) => act(&consign, Action::SuspendShop, args.id, "").await,
        Command::ReactivateShop(args) => act(&consign, Action::ReactivateShop, args.id, "").await,
        Command::CancelAuction(args) => {
            act(&consign, Action::CancelAuction, args.id, &args.reason).await
        }
    }
}

// ---------------------------------------------------------------------------
// One-shot commands
// ---------------------------------------------------------------------------

async fn list<R: Resource>(consign: &Consign, args: &ListArgs) -> Result<(), AdminError> {
    let mut query = QueryState::new(consign.config.default_page_size)?;
    if let Some(key) = &args.sort {
        query.set_sort(key.clone(), args.desc);
    }
    for (name, value) in group_filters::<R>(&args.filters)? {
        query.set_filter(name, value);
    }
    // Page last: sort and filter changes reset it.
    query.go_to_page(args.page, u32::MAX);

    let request = PageRequest::from_query(query.query());
    info!(resource = R::NAME, page = %request.page_number, "listing");

    let summary = if args.json {
        let page = consign.http().fetch_raw_page::<R>(&request).await?;
        output::write_json_lines(&page.items, &mut io::stdout().lock())?;
        output::page_summary(request.page_number, &page)
    } else {
        let page = consign.http().fetch_page::<R>(&request).await?;
        output::write_page(&page, &mut io::stdout().lock())?;
        output::page_summary(request.page_number, &page)
    };
    eprintln!("{summary}");
    Ok(())
}

async fn show<R: Resource>(consign: &Consign, args: &ShowArgs) -> Result<(), AdminError> {
    if args.json {
        let record = consign.http().get_raw_record::<R>(args.id).await?;
        output::write_json(&record, &mut io::stdout().lock())?;
    } else {
        let record: R = consign.get(args.id).await?;
        output::write_detail(&record, &mut io::stdout().lock())?;
    }
    Ok(())
}

async fn act(consign: &Consign, action: Action, id: u64, reason: &str) -> Result<(), AdminError> {
    if !actions::run_action(consign, action, id, reason, &mut LogNotifier).await {
        std::process::exit(1);
    }
    Ok(())
}

/// Repeated `--filter name=...` flags become a list value. Names the
/// collection does not filter on are rejected.
fn group_filters<R: Resource>(
    pairs: &[(String, String)],
) -> Result<BTreeMap<String, FilterValue>, ConsignError> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in pairs {
        if !R::FILTERS.contains(&name.as_str()) {
            return Err(ConsignError::Validation(format!(
                "unknown filter `{name}` for {} (expected one of: {})",
                R::NAME,
                R::FILTERS.join(", ")
            )));
        }
        grouped.entry(name.clone()).or_default().push(value.clone());
    }
    Ok(grouped
        .into_iter()
        .map(|(name, mut values)| {
            let value = if values.len() == 1 {
                FilterValue::Text(values.remove(0))
            } else {
                FilterValue::List(values)
            };
            (name, value)
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

/// Command-line flags take precedence over `CONSIGN_*` variables.
fn load_config(cli: &Cli) -> Result<ConsignConfig, AdminError> {
    let overrides = [
        ("CONSIGN_API_URL", cli.api_url.clone()),
        ("CONSIGN_API_TOKEN", cli.token.clone()),
        ("CONSIGN_PAGE_SIZE", cli.page_size.map(|n| n.to_string())),
    ];
    let config = ConsignConfig::from_lookup(|key| {
        overrides
            .iter()
            .find(|(name, _)| *name == key)
            .and_then(|(_, value)| value.clone())
            .or_else(|| std::env::var(key).ok())
    })?;
    Ok(config)
}

/// Log to stderr, except while the table owns the terminal: then to
/// `--log-file` or nowhere. `RUST_LOG` overrides `--log-level`.
fn init_tracing(cli: &Cli) -> Result<(), AdminError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match &cli.command {
        Command::Browse(args) => match &args.log_file {
            Some(path) => {
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)?;
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .init();
            }
            None => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .init(),
        },
        _ => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(io::stderr)
            .init(),
    }
    Ok(())
}

/// Register SIGINT and SIGTERM handlers that trigger the returned token.
fn setup_signal_handlers() -> CancellationToken {
    let cancel = CancellationToken::new();

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("received SIGINT, shutting down");
        cancel_clone.cancel();
    });

    #[cfg(unix)]
    {
        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            let mut sig =
                match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(sig) => sig,
                    Err(e) => {
                        warn!(error = %e, "failed to register SIGTERM handler");
                        return;
                    }
                };
            sig.recv().await;
            info!("received SIGTERM, shutting down");
            cancel_clone.cancel();
        });
    }

    cancel
}
