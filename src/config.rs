use anyhow::{bail, Context as _, Result};
use regex::Regex;
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use crate::{
    context::ContextEnv,
    emit::{EmitSettings, Visibility},
    generate::GenerateOptions,
    model::ResourceKind,
    resolve::Resolver,
    shard::{ShardLayout, DEFAULT_MAX_PER_SHARD},
    templates::TemplateSet,
};

pub const SCHEMA_VERSION: u32 = 1;

static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid ident regex"));
static CRATE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(::)?[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("valid crate path regex")
});

#[derive(Debug, Deserialize)]
pub struct Config {
    pub resgen: ResgenMeta,

    #[serde(default)]
    pub kinds: BTreeMap<String, KindConfig>,
}

impl Config {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(text)?;
        if cfg.resgen.schema_version != SCHEMA_VERSION {
            bail!(
                "unsupported schema_version {} (expected {SCHEMA_VERSION})",
                cfg.resgen.schema_version
            );
        }
        Ok(cfg)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResgenMeta {
    pub schema_version: u32,

    /// Glob patterns, token-expanded.
    #[serde(default)]
    pub manifests: Vec<String>,

    #[serde(default)]
    pub out_dir: Option<String>,

    #[serde(default = "default_max_per_shard")]
    pub max_per_shard: NonZeroUsize,

    #[serde(default = "default_crate_path")]
    pub crate_path: String,

    #[serde(default)]
    pub visibility: Visibility,

    #[serde(default)]
    pub templates_dir: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KindConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub shard_prefix: Option<String>,

    #[serde(default)]
    pub max_per_shard: Option<NonZeroUsize>,
}

fn default_max_per_shard() -> NonZeroUsize {
    DEFAULT_MAX_PER_SHARD
}

fn default_crate_path() -> String {
    "resgen".to_string()
}

fn default_true() -> bool {
    true
}

/// Values given on the command line; each one beats the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub manifests: Vec<String>,
    pub out_dir: Option<PathBuf>,
    pub max_per_shard: Option<NonZeroUsize>,
    pub crate_path: Option<String>,
}

/// Fully resolved inputs for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub manifests: Vec<String>,
    pub out_dir: PathBuf,
    pub options: GenerateOptions,
}

impl Settings {
    pub fn build(ctx: &ContextEnv, cfg: Option<&Config>, overrides: &Overrides) -> Result<Self> {
        let r = Resolver::new(ctx);
        let meta = cfg.map(|c| &c.resgen);

        let manifests = if !overrides.manifests.is_empty() {
            overrides
                .manifests
                .iter()
                .map(|m| ctx.absolute(Path::new(m)).to_string_lossy().to_string())
                .collect()
        } else {
            let mut out = Vec::new();
            for raw in meta.map(|m| m.manifests.as_slice()).unwrap_or(&[]) {
                let resolved = r
                    .resolve(raw)
                    .with_context(|| format!("failed to resolve resgen.manifests entry: {raw}"))?;
                out.push(anchor(ctx.config_dir(), &resolved).to_string_lossy().to_string());
            }
            out
        };
        if manifests.is_empty() {
            bail!("no manifests given: set resgen.manifests or pass --manifest");
        }

        let out_dir = match (&overrides.out_dir, meta.and_then(|m| m.out_dir.as_deref())) {
            (Some(p), _) => ctx.absolute(p),
            (None, Some(raw)) => {
                let resolved = r
                    .resolve(raw)
                    .with_context(|| format!("failed to resolve resgen.out_dir: {raw}"))?;
                anchor(ctx.config_dir(), &resolved)
            }
            (None, None) => bail!("no output directory: set resgen.out_dir or pass --out-dir"),
        };

        let max_per_shard = overrides
            .max_per_shard
            .or(meta.map(|m| m.max_per_shard))
            .unwrap_or(DEFAULT_MAX_PER_SHARD);

        let crate_path = overrides
            .crate_path
            .clone()
            .or_else(|| meta.map(|m| m.crate_path.clone()))
            .unwrap_or_else(default_crate_path);
        if !CRATE_PATH_RE.is_match(&crate_path) {
            bail!(
                "invalid crate_path '{crate_path}': \
                 expected a Rust path like 'resgen' or 'crate::res'"
            );
        }

        let templates = match meta.and_then(|m| m.templates_dir.as_deref()) {
            Some(raw) => {
                let resolved = r
                    .resolve(raw)
                    .with_context(|| format!("failed to resolve resgen.templates_dir: {raw}"))?;
                let dir = anchor(ctx.config_dir(), &resolved);
                if !dir.is_dir() {
                    bail!("templates_dir does not exist: {}", dir.display());
                }
                TemplateSet::builtin().with_overrides(&dir)?
            }
            None => TemplateSet::builtin(),
        };

        let mut options = GenerateOptions {
            emit: EmitSettings {
                crate_path,
                visibility: meta.map(|m| m.visibility).unwrap_or_default(),
            },
            max_per_shard,
            templates,
            ..GenerateOptions::default()
        };

        for (name, kc) in cfg.map(|c| &c.kinds).into_iter().flatten() {
            let Some(kind) = ResourceKind::parse(name) else {
                bail!("kinds.{name}: unknown resource kind");
            };
            if !kc.enabled {
                options.disabled.insert(kind);
            }

            let prefix = kc.shard_prefix.clone().unwrap_or_else(|| kind.as_str().to_string());
            if !IDENT_RE.is_match(&prefix) {
                bail!("kinds.{name}.shard_prefix '{prefix}' is not a valid module name");
            }
            // the CLI bound applies to every kind
            let max = overrides
                .max_per_shard
                .or(kc.max_per_shard)
                .unwrap_or(max_per_shard);
            options.layouts.insert(kind, ShardLayout::new(prefix, max));
        }

        Ok(Self {
            manifests,
            out_dir,
            options,
        })
    }
}

/// Relative config paths are taken from the config file's directory.
fn anchor(base: &Path, p: &str) -> PathBuf {
    let p = Path::new(p);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}
