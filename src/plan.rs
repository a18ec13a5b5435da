//! Groups scanned entries into one sorted, deduplicated resource list per kind.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, error, warn};

use crate::error::{GenError, Result};
use crate::model::{ResourceKey, ResourceKind};

/// One scanned file as it arrives from a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    pub key: ResourceKey,
    pub qualifiers: Vec<String>,
    pub path: String,
}

impl ResourceEntry {
    pub fn new(key: ResourceKey, path: impl Into<String>) -> Self {
        Self {
            key,
            qualifiers: Vec::new(),
            path: path.into(),
        }
    }

    pub fn with_qualifiers<I, S>(mut self, qualifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.qualifiers = qualifiers.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedItem {
    pub qualifiers: Vec<String>,
    pub path: String,
}

/// A key with every variant that backs it, in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedResource {
    pub key: ResourceKey,
    pub items: Vec<PlannedItem>,
}

/// Per-kind resource lists, each sorted by suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePlan {
    kinds: BTreeMap<ResourceKind, Vec<PlannedResource>>,
}

impl ResourcePlan {
    pub fn kinds(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        self.kinds.keys().copied()
    }

    pub fn resources(&self, kind: ResourceKind) -> &[PlannedResource] {
        self.kinds.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.kinds.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn into_kinds(self) -> impl Iterator<Item = (ResourceKind, Vec<PlannedResource>)> {
        self.kinds.into_iter()
    }
}

/// Builds the plan, rejecting any key that has two items with the same
/// qualifier set. Item order within a key is preserved, and a qualifier
/// repeated inside one entry is kept once, at its first position.
pub fn plan(entries: Vec<ResourceEntry>) -> Result<ResourcePlan> {
    let total = entries.len();
    let mut grouped: BTreeMap<ResourceKey, Vec<PlannedItem>> = BTreeMap::new();
    let mut duplicates: BTreeSet<String> = BTreeSet::new();

    for mut entry in entries {
        let listed = entry.qualifiers.len();
        let mut seen = BTreeSet::new();
        entry.qualifiers.retain(|q| seen.insert(q.clone()));
        if entry.qualifiers.len() != listed {
            warn!(key = %entry.key, path = %entry.path, "dropped repeated qualifiers");
        }

        let items = grouped.entry(entry.key.clone()).or_default();

        let wanted = qualifier_set(&entry.qualifiers);
        if let Some(existing) = items.iter().find(|i| qualifier_set(&i.qualifiers) == wanted) {
            error!(
                key = %entry.key,
                qualifiers = ?entry.qualifiers,
                first = %existing.path,
                second = %entry.path,
                "duplicate resource variant"
            );
            duplicates.insert(entry.key.to_string());
            continue;
        }

        items.push(PlannedItem {
            qualifiers: entry.qualifiers,
            path: entry.path,
        });
    }

    if !duplicates.is_empty() {
        return Err(GenError::DuplicateKey {
            keys: duplicates.into_iter().collect(),
        });
    }

    let mut kinds: BTreeMap<ResourceKind, Vec<PlannedResource>> = BTreeMap::new();
    for (key, items) in grouped {
        kinds
            .entry(key.kind())
            .or_default()
            .push(PlannedResource { key, items });
    }

    debug!(
        entries = total,
        keys = kinds.values().map(Vec::len).sum::<usize>(),
        "planned resources"
    );
    Ok(ResourcePlan { kinds })
}

fn qualifier_set(qualifiers: &[String]) -> BTreeSet<&str> {
    qualifiers.iter().map(String::as_str).collect()
}
