use crate::fileio::{AtomicFileWriter, WriteOptions, DEFAULT_TMP_TAG};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "REGSYNC_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub writer: WriterConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WriterConfig {
    pub tmp_tag: String,
    pub sync_data: bool,
    pub replace_equal: bool,
    pub create_dirs: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_change_percent: Option<u32>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            tmp_tag: DEFAULT_TMP_TAG.to_string(),
            sync_data: true,
            replace_equal: true,
            create_dirs: false,
            max_change_percent: None,
        }
    }
}

impl WriterConfig {
    pub fn to_options(&self) -> WriteOptions {
        WriteOptions {
            tmp_tag: self.tmp_tag.clone(),
            sync_data: self.sync_data,
            replace_equal: self.replace_equal,
            create_dirs: self.create_dirs,
            max_change_percent: self.max_change_percent,
        }
    }
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let home =
            home::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        Ok(home.join(".regsync"))
    }

    /// `$REGSYNC_CONFIG` if set, otherwise `~/.regsync/config.toml`.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        let writer = AtomicFileWriter::new(WriteOptions {
            create_dirs: true,
            ..WriteOptions::default()
        });
        writer
            .write_bytes(path, content.as_bytes())
            .with_context(|| format!("Failed to save config to {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let tag = &self.writer.tmp_tag;
        if tag.is_empty() || tag.contains(['/', '\\']) {
            anyhow::bail!("writer.tmp_tag must be a non-empty name without separators");
        }
        Ok(())
    }
}
