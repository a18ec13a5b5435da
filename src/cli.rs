use std::num::NonZeroUsize;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "resgen", version, about)]
pub struct Args {
    /// Path to resgen.toml (overrides RESGEN_CONFIG and ./resgen.toml)
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    /// Manifest file or glob; repeatable, replaces resgen.manifests
    #[arg(long = "manifest", value_name = "PATH")]
    pub manifests: Vec<String>,

    /// Output directory (overrides resgen.out_dir)
    #[arg(long)]
    pub out_dir: Option<std::path::PathBuf>,

    /// Maximum resources per shard, for every kind
    #[arg(long)]
    pub max_per_shard: Option<NonZeroUsize>,

    /// Path generated code imports ResourceHandle from
    #[arg(long)]
    pub crate_path: Option<String>,

    /// Compare with the files on disk instead of writing; fails when stale
    #[arg(long, default_value_t = false, conflicts_with = "dry_run")]
    pub check: bool,

    /// Render everything but write nothing
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Print a report of the generated layout
    #[arg(long, value_enum, default_value_t = ReportMode::Off)]
    pub report: ReportMode,

    /// Write the report to a file instead of stdout
    #[arg(long)]
    pub report_out: Option<std::path::PathBuf>,

    /// Only log warnings and errors
    #[arg(long, short, default_value_t = false)]
    pub quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportMode {
    Off,
    Summary,
    Full,
}
