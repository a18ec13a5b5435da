use std::fmt::Write as _;
use std::path::Path;

use crate::{cli::ReportMode, generate::Generation, output::CheckReport};

pub fn build_report(generation: &Generation, out_dir: &Path, mode: ReportMode) -> String {
    match mode {
        ReportMode::Off => String::new(),
        ReportMode::Summary => summary(generation, out_dir),
        ReportMode::Full => full(generation, out_dir),
    }
}

fn summary(generation: &Generation, out_dir: &Path) -> String {
    let mut out = String::new();

    out.push_str("resgen report (summary)\n");
    out.push_str("=======================\n");
    let _ = writeln!(out, "out_dir: {}", out_dir.display());
    let _ = writeln!(
        out,
        "keys: {}  shards: {}  files: {}",
        generation.registry.len(),
        generation.registry.shards().len(),
        generation.units.len()
    );

    out.push_str("\nkinds\n");
    for kind in generation.registry.kinds() {
        let sizes: Vec<usize> = generation.registry.shards_of(kind).map(|s| s.len()).collect();
        let _ = writeln!(
            out,
            "  {kind}: keys={} shards={} largest={}",
            sizes.iter().sum::<usize>(),
            sizes.len(),
            sizes.iter().max().copied().unwrap_or(0)
        );
    }

    out
}

fn full(generation: &Generation, out_dir: &Path) -> String {
    let mut out = summary(generation, out_dir);

    out.push_str("\nshards\n");
    for shard in generation.registry.shards() {
        let resources = shard.resources();
        let (first, last) = match (resources.first(), resources.last()) {
            (Some(f), Some(l)) => (f.key.suffix(), l.key.suffix()),
            _ => ("-", "-"),
        };
        let _ = writeln!(
            out,
            "  - {} ({}/{}) {first} .. {last}",
            shard.name(),
            shard.len(),
            shard.capacity()
        );
    }

    out.push_str("\nfiles\n");
    for unit in &generation.units {
        let _ = writeln!(out, "  - {} ({} bytes)", unit.path.display(), unit.contents.len());
    }

    out
}

/// Human-readable list of what `--check` found out of date.
pub fn check_summary(report: &CheckReport) -> String {
    let mut out = String::new();
    for (label, paths) in [
        ("changed", &report.changed),
        ("missing", &report.missing),
        ("stale", &report.stale),
    ] {
        for p in paths {
            let _ = writeln!(out, "  {label}: {}", p.display());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;
    use std::path::PathBuf;

    use super::*;
    use crate::generate::{generate, GenerateOptions};
    use crate::model::{ResourceKey, ResourceKind};
    use crate::plan::ResourceEntry;

    fn sample() -> Generation {
        let entries = ["icon_6", "icon_60", "icon_600"]
            .iter()
            .map(|n| {
                ResourceEntry::new(
                    ResourceKey::new(ResourceKind::Drawable, *n).unwrap(),
                    format!("drawable/{n}.xml"),
                )
            })
            .collect();
        let opts = GenerateOptions {
            max_per_shard: NonZeroUsize::new(2).unwrap(),
            ..GenerateOptions::default()
        };
        generate(entries, &opts).unwrap()
    }

    #[test]
    fn summary_counts_keys_and_shards() {
        let text = build_report(&sample(), Path::new("src/res"), ReportMode::Summary);
        assert!(text.contains("keys: 3  shards: 2  files: 5"), "{text}");
        assert!(text.contains("  drawable: keys=3 shards=2 largest=2"), "{text}");
    }

    #[test]
    fn full_report_lists_shard_ranges() {
        let text = build_report(&sample(), Path::new("src/res"), ReportMode::Full);
        assert!(text.contains("  - drawable_0 (2/2) icon_6 .. icon_60"), "{text}");
        assert!(text.contains("  - drawable_1 (1/2) icon_600 .. icon_600"), "{text}");
        assert!(text.contains("shards/drawable_1.rs"), "{text}");
    }

    #[test]
    fn off_is_empty() {
        assert!(build_report(&sample(), Path::new("x"), ReportMode::Off).is_empty());
    }

    #[test]
    fn check_summary_labels_each_path() {
        let report = CheckReport {
            changed: vec![PathBuf::from("mod.rs")],
            missing: vec![],
            stale: vec![PathBuf::from("shards/drawable_9.rs")],
        };
        assert_eq!(
            check_summary(&report),
            "  changed: mod.rs\n  stale: shards/drawable_9.rs\n"
        );
    }
}
