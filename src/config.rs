use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::validator::{ExistingFileValidator, Validators};
use crate::{sglog_debug, Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Annotate generated scripts with debug comments.
    #[serde(default)]
    pub debug_comments: bool,
    /// Require paths named by tasks to exist at generation time.
    #[serde(default)]
    pub check_paths_exist: bool,
    pub output_dir: Option<String>,
}

impl Config {
    pub fn scriptgen_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or(Error::NoHomeDir)?
            .join(".scriptgen"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::scriptgen_dir()?.join("scriptgen.toml"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::scriptgen_dir()?.join("scriptgen.log"))
    }

    /// Where `generate` writes scripts when no explicit output is given.
    /// `None` means standard output.
    pub fn output_dir(&self) -> Option<PathBuf> {
        self.output_dir.as_deref().map(expand_tilde)
    }

    pub fn validators(&self) -> Validators {
        if self.check_paths_exist {
            Validators::with_paths(Arc::new(ExistingFileValidator))
        } else {
            Validators::default()
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        sglog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            sglog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(path)?)?;
        sglog_debug!(
            "Config loaded: debug_comments={}, check_paths_exist={}, output_dir={:?}",
            config.debug_comments,
            config.check_paths_exist,
            config.output_dir
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        Self::ensure_dirs()?;
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        fs::write(path, toml::to_string_pretty(self)?)?;
        sglog_debug!("Config saved to {}", path.display());
        Ok(())
    }

    pub fn ensure_dirs() -> Result<()> {
        let dir = Self::scriptgen_dir()?;
        if !dir.exists() {
            sglog_debug!("Creating scriptgen directory: {}", dir.display());
            fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
