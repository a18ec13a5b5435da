//! One generation pass: entries in, rendered source units out.

use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroUsize;

use tracing::{info, info_span, warn};

use crate::{
    emit::{EmitSettings, Emitter},
    error::Result,
    model::ResourceKind,
    output::SourceUnit,
    plan::{plan, ResourceEntry},
    registry::Registry,
    shard::{assign_shards, ShardLayout, DEFAULT_MAX_PER_SHARD},
    templates::TemplateSet,
};

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub emit: EmitSettings,
    pub max_per_shard: NonZeroUsize,
    /// Per-kind layout overrides; kinds without one use their name as the
    /// shard prefix and `max_per_shard`.
    pub layouts: BTreeMap<ResourceKind, ShardLayout>,
    pub disabled: BTreeSet<ResourceKind>,
    pub templates: TemplateSet,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            emit: EmitSettings::default(),
            max_per_shard: DEFAULT_MAX_PER_SHARD,
            layouts: BTreeMap::new(),
            disabled: BTreeSet::new(),
            templates: TemplateSet::builtin(),
        }
    }
}

impl GenerateOptions {
    pub fn layout(&self, kind: ResourceKind) -> ShardLayout {
        self.layouts
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| ShardLayout::new(kind.as_str(), self.max_per_shard))
    }
}

/// Everything a run produced, before anything touches disk.
#[derive(Debug, Clone)]
pub struct Generation {
    pub registry: Registry,
    pub units: Vec<SourceUnit>,
}

/// Plans, shards, indexes and renders. Fails before producing any unit if
/// the input violates a uniqueness or ordering invariant.
pub fn generate(entries: Vec<ResourceEntry>, opts: &GenerateOptions) -> Result<Generation> {
    let _span = info_span!("generate", entries = entries.len()).entered();

    let plan = plan(entries)?;

    let mut shards = Vec::new();
    for (kind, resources) in plan.into_kinds() {
        if opts.disabled.contains(&kind) {
            warn!(kind = %kind, skipped = resources.len(), "kind disabled in config");
            continue;
        }
        shards.extend(assign_shards(resources, &opts.layout(kind))?);
    }

    let registry = Registry::build(shards)?;
    let emitter = Emitter::new(&opts.templates, opts.emit.clone())?;
    let units = emitter.emit_all(&registry)?;

    info!(
        keys = registry.len(),
        shards = registry.shards().len(),
        units = units.len(),
        "generated resource registry"
    );
    Ok(Generation { registry, units })
}
