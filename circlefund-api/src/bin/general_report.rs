//! One-shot general report export without the HTTP server.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use circlefund_api::config::ApiConfig;
use circlefund_api::helpers::logging::init_tracing;
use circlefund_api::helpers::AuthContext;
use circlefund_api::integrations::UpstreamClient;
use circlefund_api::jobs::{RefreshOutcome, ReportManager, ReportTimings};
use clap::Parser;
use reports::{export_csv, render_view, RankMode, ViewFilter};
use shared_types::{SortKey, SortOrder};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Export the community general report as CSV", long_about = None)]
struct Args {
    /// Config file to use instead of the per-user default
    #[arg(long)]
    config: Option<PathBuf>,

    /// Case-insensitive match on name, email or phone
    #[arg(long, default_value = "")]
    search: String,

    #[arg(long, value_parser = parse_sort_key)]
    sort_by: Option<SortKey>,

    #[arg(long, value_parser = parse_sort_order, default_value = "desc")]
    sort_order: SortOrder,

    /// Maximum rows; 0 means all
    #[arg(long)]
    limit: Option<usize>,

    /// Directory the dated CSV file is written to
    #[arg(long, default_value = ".")]
    output: PathBuf,

    /// Print the CSV instead of writing a file
    #[arg(long)]
    stdout: bool,
}

fn parse_sort_key(value: &str) -> Result<SortKey, String> {
    match value {
        "name" => Ok(SortKey::Name),
        "total_contributed" => Ok(SortKey::TotalContributed),
        "contribution_count" => Ok(SortKey::ContributionCount),
        "goals_joined" => Ok(SortKey::GoalsJoined),
        other => Err(format!("unknown sort key: {}", other)),
    }
}

fn parse_sort_order(value: &str) -> Result<SortOrder, String> {
    match value {
        "asc" => Ok(SortOrder::Ascending),
        "desc" => Ok(SortOrder::Descending),
        other => Err(format!("unknown sort order: {}", other)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(None);

    let (config, config_path) = match &args.config {
        Some(path) => ApiConfig::load_from(path),
        None => ApiConfig::load(),
    }
    .context("Failed to load config")?;

    let Some((email, password)) = config.credentials() else {
        bail!(
            "No credentials configured; set [credentials] email and password in {}",
            config_path.display()
        );
    };

    let upstream = UpstreamClient::new(&config.upstream)?;
    let manager = ReportManager::new(Arc::new(upstream), ReportTimings::from(&config.upstream));

    let snapshot = match manager.refresh(Some(AuthContext::new(email, password))).await? {
        RefreshOutcome::Completed(snapshot) => snapshot,
        other => bail!("Report refresh did not complete: {:?}", other),
    };

    for source in &snapshot.degraded_sources {
        tracing::warn!("{:?} were unavailable; related columns may be empty", source);
    }

    let mode = match args.sort_by {
        Some(key) => RankMode::user(key, args.sort_order),
        None => RankMode::Default,
    };
    let view = render_view(&snapshot.members, mode, &ViewFilter::new(args.search, args.limit));
    let export = export_csv(&view.rows, Utc::now().date_naive())?;

    if args.stdout {
        print!("{}", export.content);
        return Ok(());
    }

    let path = args.output.join(&export.filename);
    std::fs::write(&path, export.content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Wrote {} members to {}", view.rows.len(), path.display());
    Ok(())
}
