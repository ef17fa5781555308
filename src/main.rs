mod args;
mod config;
mod error;
mod loader;
mod mapper;
mod model;
mod query;
mod report;
mod table;
mod views;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use args::{Args, ViewArg};
use loader::load_all;
use query::{rank, MatchMode, Query, SortKey};
use report::{build_ranked_table, build_summary_table, JsonChartRenderer, TextChartRenderer};
use table::build_table;
use views::{latency_vs_load, outcome_vs_load, ChartRenderer};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatling_stats_rs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    if !args.base_dir.exists() {
        return Err(anyhow!("base directory not found: {}", args.base_dir.display()));
    }
    let sort_key: SortKey = args.sort_by.parse()?;

    let t_load = Instant::now();
    let reports = load_all(&args.base_dir, &args.run_prefix)
        .with_context(|| format!("loading reports from {}", args.base_dir.display()))?;
    tracing::debug!(elapsed = ?t_load.elapsed(), "load");
    if reports.is_empty() {
        return Err(anyhow!(
            "no reports found under {} (expected {}-*/{})",
            args.base_dir.display(),
            args.run_prefix,
            config::STATS_FILE_RELATIVE
        ));
    }

    if args.view == ViewArg::Summary {
        build_summary_table(&reports).printstd();
        return Ok(());
    }

    let t_build = Instant::now();
    let table = build_table(&reports);
    if table.dropped_count() > 0 {
        eprintln!("{} row(s) dropped for missing metrics", table.dropped_count());
    }
    if table.is_empty() {
        tracing::warn!(runs = reports.len(), "no request rows survived table building");
    }

    let match_mode = match args.ignore_case {
        true => MatchMode::IgnoreCase,
        false => MatchMode::CaseSensitive,
    };
    let query = Query::new(args.filter.as_str())
        .sort_by(sort_key)
        .match_mode(match_mode);
    let ranked = rank(&table, &query);
    tracing::debug!(
        elapsed = ?t_build.elapsed(),
        rows = ranked.len(),
        sort_by = sort_key.name(),
        "build/rank"
    );

    let chart = match args.view {
        ViewArg::Latency => latency_vs_load(&ranked),
        ViewArg::Outcome => outcome_vs_load(&ranked),
        ViewArg::Table | ViewArg::Summary => {
            build_ranked_table(&ranked).printstd();
            return Ok(());
        }
    };
    match args.json {
        true => JsonChartRenderer::new(std::io::stdout().lock()).render(&chart)?,
        false => TextChartRenderer.render(&chart)?,
    }

    Ok(())
}
