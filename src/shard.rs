//! Packs a sorted resource list into bounded shards.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use tracing::debug;

use crate::error::{GenError, Result};
use crate::model::ResourceKind;
use crate::plan::PlannedResource;

/// Default number of resources per shard file.
pub const DEFAULT_MAX_PER_SHARD: NonZeroUsize = match NonZeroUsize::new(500) {
    Some(n) => n,
    None => unreachable!(),
};

/// Naming and size policy for one kind's shards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardLayout {
    pub prefix: String,
    pub max_per_shard: NonZeroUsize,
}

impl ShardLayout {
    pub fn new(prefix: impl Into<String>, max_per_shard: NonZeroUsize) -> Self {
        Self {
            prefix: prefix.into(),
            max_per_shard,
        }
    }

    pub fn for_kind(kind: ResourceKind) -> Self {
        Self::new(kind.as_str(), DEFAULT_MAX_PER_SHARD)
    }

    pub fn shard_name(&self, index: usize) -> String {
        format!("{}_{}", self.prefix, index)
    }
}

/// A bounded partition of one kind's resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    kind: ResourceKind,
    index: usize,
    name: String,
    capacity: NonZeroUsize,
    resources: Vec<PlannedResource>,
}

impl Shard {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Module name, `<prefix>_<index>`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    pub fn resources(&self) -> &[PlannedResource] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn is_overfull(&self) -> bool {
        self.resources.len() > self.capacity.get()
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        kind: ResourceKind,
        index: usize,
        name: &str,
        capacity: NonZeroUsize,
        resources: Vec<PlannedResource>,
    ) -> Self {
        Self {
            kind,
            index,
            name: name.to_string(),
            capacity,
            resources,
        }
    }
}

/// Fills shards in input order, `layout.max_per_shard` resources each
/// except possibly the last.
///
/// The input must be one kind, sorted by suffix and free of duplicates.
/// All repeated keys are reported together.
pub fn assign_shards(resources: Vec<PlannedResource>, layout: &ShardLayout) -> Result<Vec<Shard>> {
    let Some(first) = resources.first() else {
        return Ok(Vec::new());
    };
    let kind = first.key.kind();

    let mut duplicates: BTreeSet<String> = BTreeSet::new();
    for pair in resources.windows(2) {
        let (prev, next) = (&pair[0].key, &pair[1].key);
        if next.kind() != kind {
            return Err(GenError::MixedKinds {
                expected: kind,
                found: next.to_string(),
            });
        }
        match prev.suffix().cmp(next.suffix()) {
            std::cmp::Ordering::Less => {}
            std::cmp::Ordering::Equal => {
                duplicates.insert(next.to_string());
            }
            std::cmp::Ordering::Greater => {
                return Err(GenError::UnsortedKeys {
                    previous: prev.to_string(),
                    next: next.to_string(),
                });
            }
        }
    }
    if !duplicates.is_empty() {
        return Err(GenError::DuplicateKey {
            keys: duplicates.into_iter().collect(),
        });
    }

    let max = layout.max_per_shard.get();
    let total = resources.len();
    let mut shards: Vec<Shard> = Vec::with_capacity(total.div_ceil(max));
    let mut iter = resources.into_iter().peekable();

    while iter.peek().is_some() {
        let index = shards.len();
        let chunk: Vec<PlannedResource> = iter.by_ref().take(max).collect();
        shards.push(Shard {
            kind,
            index,
            name: layout.shard_name(index),
            capacity: layout.max_per_shard,
            resources: chunk,
        });
    }

    debug!(
        kind = %kind,
        resources = total,
        shards = shards.len(),
        max_per_shard = max,
        "assigned shards"
    );
    Ok(shards)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::ResourceKey;
    use crate::plan::PlannedItem;

    fn resource(kind: ResourceKind, name: &str) -> PlannedResource {
        PlannedResource {
            key: ResourceKey::new(kind, name).unwrap(),
            items: vec![PlannedItem {
                qualifiers: Vec::new(),
                path: format!("{kind}/{name}.xml"),
            }],
        }
    }

    fn drawables(names: &[&str]) -> Vec<PlannedResource> {
        names
            .iter()
            .map(|n| resource(ResourceKind::Drawable, n))
            .collect()
    }

    fn layout(max: usize) -> ShardLayout {
        ShardLayout::new("drawable", NonZeroUsize::new(max).unwrap())
    }

    fn membership(shards: &[Shard]) -> Vec<(String, Vec<String>)> {
        shards
            .iter()
            .map(|s| {
                (
                    s.name().to_string(),
                    s.resources()
                        .iter()
                        .map(|r| r.key.suffix().to_string())
                        .collect(),
                )
            })
            .collect()
    }

    #[test]
    fn splits_three_keys_into_two_shards() {
        let shards =
            assign_shards(drawables(&["icon_6", "icon_60", "icon_600"]), &layout(2)).unwrap();
        assert_eq!(
            membership(&shards),
            vec![
                ("drawable_0".to_string(), vec!["icon_6".to_string(), "icon_60".to_string()]),
                ("drawable_1".to_string(), vec!["icon_600".to_string()]),
            ]
        );
    }

    #[test]
    fn every_shard_but_the_last_is_full() {
        let names: Vec<String> = (0..23).map(|i| format!("icon_{i:03}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let shards = assign_shards(drawables(&refs), &layout(5)).unwrap();

        assert_eq!(shards.len(), 5);
        for shard in &shards[..shards.len() - 1] {
            assert_eq!(shard.len(), 5);
        }
        assert_eq!(shards.last().unwrap().len(), 3);
        assert_eq!(shards.iter().map(Shard::len).sum::<usize>(), 23);
        assert!(shards.iter().all(|s| !s.is_overfull()));
        assert_eq!(
            shards.iter().map(Shard::index).collect::<Vec<_>>(),
            [0, 1, 2, 3, 4]
        );
    }

    #[test]
    fn assignment_is_deterministic() {
        let input = drawables(&["a", "b", "c", "d", "e"]);
        let first = assign_shards(input.clone(), &layout(2)).unwrap();
        let second = assign_shards(input, &layout(2)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn exact_multiple_has_no_empty_tail() {
        let shards = assign_shards(drawables(&["a", "b", "c", "d"]), &layout(2)).unwrap();
        assert_eq!(shards.len(), 2);
        assert!(shards.iter().all(|s| s.len() == 2));
    }

    #[test]
    fn empty_input_gives_no_shards() {
        assert!(assign_shards(Vec::new(), &layout(3)).unwrap().is_empty());
    }

    #[test]
    fn repeated_key_is_rejected() {
        let err =
            assign_shards(drawables(&["icon_6", "icon_6", "icon_60"]), &layout(2)).unwrap_err();
        match err {
            GenError::DuplicateKey { keys } => assert_eq!(keys, ["drawable:icon_6"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unsorted_input_is_rejected() {
        let err = assign_shards(drawables(&["icon_60", "icon_6"]), &layout(2)).unwrap_err();
        assert!(matches!(err, GenError::UnsortedKeys { .. }));
    }

    #[test]
    fn mixed_kinds_are_rejected() {
        let mut input = drawables(&["a"]);
        input.push(resource(ResourceKind::String, "b"));
        let err = assign_shards(input, &layout(2)).unwrap_err();
        assert!(matches!(err, GenError::MixedKinds { .. }));
    }
}
