use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    /// Filtered, ranked request table
    Table,
    /// Mean response time against total requests
    Latency,
    /// OK/KO counts against total requests
    Outcome,
    /// Whole-run aggregates per report
    Summary,
}

#[derive(Parser, Debug)]
#[command(about = "Compare Gatling simulation reports across runs")]
pub struct Args {
    /// Directory containing <run-prefix>-*/js/stats.json run directories
    #[arg(short = 'b', long = "base-dir")]
    pub base_dir: PathBuf,

    /// Run-name prefix, e.g. `checkoutsimulation`
    #[arg(short = 'p', long = "run-prefix")]
    pub run_prefix: String,

    /// Keep only requests whose name contains this substring
    #[arg(short = 'f', long = "filter", default_value = "")]
    pub filter: String,

    /// Ascending sort key: total, ok, ko, mean or name
    #[arg(short = 's', long = "sort-by", default_value = "total")]
    pub sort_by: String,

    /// Match the filter case-insensitively
    #[arg(short = 'i', long = "ignore-case")]
    pub ignore_case: bool,

    #[arg(short = 'v', long = "view", value_enum, default_value_t = ViewArg::Table)]
    pub view: ViewArg,

    /// Emit chart instructions as JSON instead of text tables
    #[arg(long = "json")]
    pub json: bool,
}
