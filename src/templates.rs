use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use minijinja::{Environment, UndefinedBehavior};
use tracing::{debug, info};

use crate::error::{GenError, Result};

pub const ROOT: &str = "root.rs";
pub const SHARDS_MOD: &str = "shards_mod.rs";
pub const SHARD: &str = "shard.rs";
pub const ACCESSOR: &str = "accessor.rs";
pub const KIND: &str = "kind.rs";

const BUILTIN: [(&str, &str); 5] = [
    (ROOT, include_str!("../assets/templates/root.rs.jinja")),
    (SHARDS_MOD, include_str!("../assets/templates/shards_mod.rs.jinja")),
    (SHARD, include_str!("../assets/templates/shard.rs.jinja")),
    (ACCESSOR, include_str!("../assets/templates/accessor.rs.jinja")),
    (KIND, include_str!("../assets/templates/kind.rs.jinja")),
];

/// The five templates every run renders, built-in or overridden.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    sources: BTreeMap<&'static str, String>,
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateSet {
    pub fn builtin() -> Self {
        Self {
            sources: BUILTIN
                .iter()
                .map(|(name, src)| (*name, (*src).to_string()))
                .collect(),
        }
    }

    /// Replaces any template that has a `<name>.jinja` file in `dir`.
    /// Templates without an override keep the built-in source.
    pub fn with_overrides(mut self, dir: &Path) -> Result<Self> {
        for (name, source) in self.sources.iter_mut() {
            let path = dir.join(format!("{name}.jinja"));
            if !path.is_file() {
                continue;
            }
            *source = fs::read_to_string(&path).map_err(|e| GenError::io(&path, e))?;
            info!(template = *name, path = %path.display(), "using template override");
        }
        Ok(self)
    }

    pub fn source(&self, name: &str) -> Option<&str> {
        self.sources.get(name).map(String::as_str)
    }

    /// Compiles every template into a fresh environment.
    pub fn environment(&self) -> Result<Environment<'_>> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        // Rust string literal with escapes, e.g. "drawable/icon_6.xml".
        env.add_filter("rust_str", |s: String| -> String { format!("{s:?}") });

        for (name, source) in &self.sources {
            env.add_template(name, source)?;
        }
        debug!(templates = self.sources.len(), "compiled templates");
        Ok(env)
    }
}
