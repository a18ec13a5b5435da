use anyhow::{bail, Context as _, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use resgen::cli::{Args, ReportMode};
use resgen::{manifest, report};

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut ctx = resgen::ContextEnv::new()?;
    let cfg = match ctx.locate_config(args.config.as_ref())? {
        Some(path) => {
            info!(config = %path.display(), "loading config");
            Some(resgen::Config::load_from_path(&path)?)
        }
        None => None,
    };

    let overrides = resgen::Overrides {
        manifests: args.manifests.clone(),
        out_dir: args.out_dir.clone(),
        max_per_shard: args.max_per_shard,
        crate_path: args.crate_path.clone(),
    };
    let settings = resgen::Settings::build(&ctx, cfg.as_ref(), &overrides)?;

    let manifests = manifest::expand_patterns(&settings.manifests)?;
    if manifests.is_empty() {
        bail!("manifest patterns matched no files: {:?}", settings.manifests);
    }
    let entries = manifest::load_all(&manifests)?;

    let generation = resgen::generate(entries, &settings.options)
        .context("generation aborted; nothing was written")?;

    if args.report != ReportMode::Off {
        let text = report::build_report(&generation, &settings.out_dir, args.report);
        match &args.report_out {
            Some(path) => std::fs::write(path, &text)
                .with_context(|| format!("failed to write report {}", path.display()))?,
            None => print!("{text}"),
        }
    }

    if args.check {
        let status = resgen::check(&generation.units, &settings.out_dir)?;
        if !status.is_up_to_date() {
            eprint!("{}", report::check_summary(&status));
            bail!(
                "generated sources in {} are out of date; rerun resgen",
                settings.out_dir.display()
            );
        }
        info!(out_dir = %settings.out_dir.display(), "generated sources are up to date");
        return Ok(());
    }

    if args.dry_run {
        info!(files = generation.units.len(), "dry run; nothing written");
        return Ok(());
    }

    resgen::publish(&generation.units, &settings.out_dir)?;
    Ok(())
}
