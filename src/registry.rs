//! Shard storage plus the key index that addresses it.
//!
//! The registry owns every [`Shard`] by value. An [`Accessor`] is only a
//! shard id and an offset, so the packing policy can change without
//! touching how keys are looked up.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::{GenError, Result};
use crate::model::{ResourceKey, ResourceKind};
use crate::plan::PlannedResource;
use crate::shard::Shard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShardId(usize);

impl ShardId {
    pub fn get(self) -> usize {
        self.0
    }
}

/// Where a key's handle lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accessor {
    pub shard: ShardId,
    pub offset: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    shards: Vec<Shard>,
    accessors: BTreeMap<ResourceKey, Accessor>,
}

impl Registry {
    /// Indexes every resource of every shard. A key found in two places is
    /// a [`GenError::DuplicateKey`].
    pub fn build(shards: Vec<Shard>) -> Result<Self> {
        let mut accessors: BTreeMap<ResourceKey, Accessor> = BTreeMap::new();
        let mut duplicates: BTreeSet<String> = BTreeSet::new();
        let mut names: BTreeSet<&str> = BTreeSet::new();

        for (id, shard) in shards.iter().enumerate() {
            if !names.insert(shard.name()) {
                return Err(GenError::DuplicateShardName {
                    name: shard.name().to_string(),
                });
            }
            for (offset, resource) in shard.resources().iter().enumerate() {
                let accessor = Accessor {
                    shard: ShardId(id),
                    offset,
                };
                if accessors.insert(resource.key.clone(), accessor).is_some() {
                    duplicates.insert(resource.key.to_string());
                }
            }
        }

        if !duplicates.is_empty() {
            return Err(GenError::DuplicateKey {
                keys: duplicates.into_iter().collect(),
            });
        }

        debug!(shards = shards.len(), keys = accessors.len(), "built registry");
        Ok(Self { shards, accessors })
    }

    pub fn shards(&self) -> &[Shard] {
        &self.shards
    }

    pub fn shard(&self, id: ShardId) -> &Shard {
        &self.shards[id.0]
    }

    /// Shards of one kind, in index order.
    pub fn shards_of(&self, kind: ResourceKind) -> impl Iterator<Item = &Shard> + '_ {
        self.shards.iter().filter(move |s| s.kind() == kind)
    }

    /// Kinds that have at least one resource, in declaration order.
    pub fn kinds(&self) -> Vec<ResourceKind> {
        let set: BTreeSet<ResourceKind> = self.shards.iter().map(Shard::kind).collect();
        set.into_iter().collect()
    }

    pub fn accessor(&self, key: &ResourceKey) -> Option<Accessor> {
        self.accessors.get(key).copied()
    }

    /// Every accessor, ordered by key.
    pub fn accessors(&self) -> impl Iterator<Item = (&ResourceKey, &Accessor)> + '_ {
        self.accessors.iter()
    }

    /// Accessors of one kind, ordered by suffix.
    pub fn accessors_of(
        &self,
        kind: ResourceKind,
    ) -> impl Iterator<Item = (&ResourceKey, &Accessor)> + '_ {
        self.accessors.iter().filter(move |(k, _)| k.kind() == kind)
    }

    pub fn owning_shard(&self, key: &ResourceKey) -> Option<&Shard> {
        self.accessor(key).map(|a| self.shard(a.shard))
    }

    pub fn resolve(&self, key: &ResourceKey) -> Option<&PlannedResource> {
        let accessor = self.accessor(key)?;
        self.shard(accessor.shard).resources().get(accessor.offset)
    }

    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }
}
