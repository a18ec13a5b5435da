use anyhow::{bail, Context as _, Result};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub const CONFIG_ENV: &str = "RESGEN_CONFIG";
pub const CONFIG_FILE: &str = "resgen.toml";

/// Process environment a run resolves paths against.
#[derive(Debug, Clone)]
pub struct ContextEnv {
    vars: BTreeMap<String, String>,
    cwd: PathBuf,
    home: Option<PathBuf>,
    config_path: Option<PathBuf>,
}

impl ContextEnv {
    pub fn new() -> Result<Self> {
        let vars: BTreeMap<String, String> = std::env::vars().collect();
        let cwd = std::env::current_dir().context("could not determine current directory")?;
        let home = dirs::home_dir();
        Ok(Self::from_parts(vars, cwd, home))
    }

    pub fn from_parts(vars: BTreeMap<String, String>, cwd: PathBuf, home: Option<PathBuf>) -> Self {
        Self {
            vars,
            cwd,
            home,
            config_path: None,
        }
    }

    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    // ---------- public getters ----------

    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Directory of the located config, or the working directory when
    /// running from flags alone.
    pub fn config_dir(&self) -> &Path {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(self.cwd.as_path())
    }

    /// Config path precedence:
    /// 1) CLI --config (must exist)
    /// 2) RESGEN_CONFIG (must exist)
    /// 3) ./resgen.toml (optional)
    pub fn locate_config(&mut self, cli_config: Option<&PathBuf>) -> Result<Option<PathBuf>> {
        if let Some(p) = cli_config {
            let p = self.absolute(p);
            if !p.is_file() {
                bail!("--config was provided but file does not exist: {}", p.display());
            }
            self.config_path = Some(p.clone());
            return Ok(Some(p));
        }

        if let Some(raw) = self.var(CONFIG_ENV) {
            let p = self.absolute(Path::new(raw));
            if !p.is_file() {
                bail!("{CONFIG_ENV} is set but file does not exist: {}", p.display());
            }
            self.config_path = Some(p.clone());
            return Ok(Some(p));
        }

        let p = self.cwd.join(CONFIG_FILE);
        if p.is_file() {
            self.config_path = Some(p.clone());
            return Ok(Some(p));
        }

        Ok(None)
    }

    /// Joins relative paths onto the working directory.
    pub fn absolute(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.cwd.join(p)
        }
    }
}
