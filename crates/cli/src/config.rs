use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tally_nlp::PatternTables;

/// `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite file; defaults to `tally.db` in the platform data directory.
    pub database_path: Option<PathBuf>,
    /// TOML file with `income`, `expense` and `[[categories]]` keyword lists.
    pub keywords_path: Option<PathBuf>,
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "tally", "Tally").context("no home directory to keep tally data in")
}

fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

/// An explicit path must exist; the default one may be absent.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = default_config_path()?;
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(cfg)
}

impl Config {
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(p) => Ok(p.clone()),
            None => {
                let dir = project_dirs()?.data_dir().to_path_buf();
                fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
                Ok(dir.join("tally.db"))
            }
        }
    }

    pub fn pattern_tables(&self) -> Result<Arc<PatternTables>> {
        let Some(path) = &self.keywords_path else {
            return Ok(PatternTables::builtin());
        };
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let tables = PatternTables::from_toml(&s)
            .with_context(|| format!("load keywords from {}", path.display()))?;
        Ok(Arc::new(tables))
    }
}
