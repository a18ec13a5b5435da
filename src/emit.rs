use std::path::PathBuf;

use minijinja::Environment;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::{
    error::{GenError, Result},
    model::{ResourceKey, ResourceKind},
    output::SourceUnit,
    registry::Registry,
    shard::Shard,
    templates::{self, TemplateSet},
};

/// First line of every generated file. Publishing only ever replaces a
/// directory whose `mod.rs` starts with it.
pub const GENERATED_MARKER: &str = "// @generated by resgen. Do not edit.";

pub const ROOT_FILE: &str = "mod.rs";
pub const SHARDS_DIR: &str = "shards";

/// Visibility of the accessor modules and functions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Pub,
    Crate,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Pub => "pub",
            Visibility::Crate => "pub(crate)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitSettings {
    /// Path generated code imports the handle types from.
    pub crate_path: String,
    pub visibility: Visibility,
}

impl Default for EmitSettings {
    fn default() -> Self {
        Self {
            crate_path: "resgen".to_string(),
            visibility: Visibility::Pub,
        }
    }
}

pub struct Emitter<'t> {
    env: Environment<'t>,
    settings: EmitSettings,
}

impl<'t> Emitter<'t> {
    pub fn new(templates: &'t TemplateSet, settings: EmitSettings) -> Result<Self> {
        Ok(Self {
            env: templates.environment()?,
            settings,
        })
    }

    /// One `static` handle per resource, items in scan order.
    pub fn emit_shard(&self, shard: &Shard) -> Result<SourceUnit> {
        if shard.is_overfull() {
            return Err(GenError::ShardOverflow {
                shard: shard.name().to_string(),
                len: shard.len(),
                capacity: shard.capacity().get(),
            });
        }

        let resources: Vec<serde_json::Value> = shard
            .resources()
            .iter()
            .map(|r| {
                json!({
                    "ident": r.key.ident(),
                    "key": r.key.to_string(),
                    "items": r.items.iter().map(|i| json!({
                        "qualifiers": i.qualifiers,
                        "path": i.path,
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();

        let text = self.render(
            templates::SHARD,
            json!({
                "header": GENERATED_MARKER,
                "crate_path": self.settings.crate_path,
                "kind_variant": shard.kind().variant_name(),
                "resources": resources,
            }),
        )?;

        Ok(SourceUnit::new(
            PathBuf::from(SHARDS_DIR).join(format!("{}.rs", shard.name())),
            text,
        ))
    }

    /// The public function for `key`, forwarding into `owning`.
    pub fn emit_accessor(&self, key: &ResourceKey, owning: &Shard) -> Result<String> {
        if !owning.resources().iter().any(|r| &r.key == key) {
            return Err(GenError::InvalidKey {
                key: key.to_string(),
                reason: "accessor target is not in the owning shard",
            });
        }

        let text = self.render(
            templates::ACCESSOR,
            json!({
                "key": key.to_string(),
                "ident": key.ident(),
                "shard": owning.name(),
                "visibility": self.settings.visibility.as_str(),
            }),
        )?;
        Ok(text.trim_end().to_string())
    }

    /// The accessor module for one kind, in suffix order.
    pub fn emit_kind(&self, kind: ResourceKind, registry: &Registry) -> Result<SourceUnit> {
        let accessors = registry
            .accessors_of(kind)
            .map(|(key, accessor)| self.emit_accessor(key, registry.shard(accessor.shard)))
            .collect::<Result<Vec<_>>>()?;

        let text = self.render(
            templates::KIND,
            json!({
                "header": GENERATED_MARKER,
                "kind": kind.as_str(),
                "crate_path": self.settings.crate_path,
                "accessors": accessors,
            }),
        )?;
        Ok(SourceUnit::new(format!("{}.rs", kind.as_str()), text))
    }

    pub fn emit_shards_mod(&self, registry: &Registry) -> Result<SourceUnit> {
        let shards: Vec<&str> = registry.shards().iter().map(Shard::name).collect();
        let text = self.render(
            templates::SHARDS_MOD,
            json!({
                "header": GENERATED_MARKER,
                "shards": shards,
            }),
        )?;
        Ok(SourceUnit::new(PathBuf::from(SHARDS_DIR).join(ROOT_FILE), text))
    }

    pub fn emit_root(&self, registry: &Registry) -> Result<SourceUnit> {
        let kinds: Vec<&str> = registry.kinds().into_iter().map(ResourceKind::as_str).collect();
        let text = self.render(
            templates::ROOT,
            json!({
                "header": GENERATED_MARKER,
                "visibility": self.settings.visibility.as_str(),
                "kinds": kinds,
            }),
        )?;
        Ok(SourceUnit::new(ROOT_FILE, text))
    }

    /// Every unit for the registry: root, accessor modules, shard index,
    /// then shards.
    pub fn emit_all(&self, registry: &Registry) -> Result<Vec<SourceUnit>> {
        let mut units = Vec::with_capacity(registry.shards().len() + 6);
        units.push(self.emit_root(registry)?);
        for kind in registry.kinds() {
            units.push(self.emit_kind(kind, registry)?);
        }
        units.push(self.emit_shards_mod(registry)?);
        for shard in registry.shards() {
            units.push(self.emit_shard(shard)?);
        }
        debug!(units = units.len(), "rendered source units");
        Ok(units)
    }

    fn render(&self, name: &str, ctx: serde_json::Value) -> Result<String> {
        let tpl = self.env.get_template(name)?;
        Ok(tpl.render(ctx)?)
    }
}
