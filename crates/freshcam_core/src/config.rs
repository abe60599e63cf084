//! User configuration stored as `freshcam.toml`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "freshcam.toml";

/// Where and how to reach the classification service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: String,
    /// Ask for nutrition facts and environmental impact.
    pub include_nutrition: bool,
    /// Ask for recipes, shelf life and storage tips.
    pub include_recipes: bool,
    /// Per-request timeout; 0 leaves the transport default in place.
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            include_nutrition: true,
            include_recipes: false,
            timeout_secs: 30,
        }
    }
}

impl EndpointConfig {
    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url.trim_end_matches('/'))
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Folder the desktop camera picks photos from.
    pub photos_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreshcamConfig {
    pub endpoint: EndpointConfig,
    pub camera: CameraConfig,
}

impl FreshcamConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        let cfg: Self = toml::from_str(&raw)
            .with_context(|| format!("invalid config {}", path.display()))?;
        if cfg.endpoint.base_url.trim().is_empty() {
            anyhow::bail!("endpoint.base_url must not be empty in {}", path.display());
        }
        Ok(cfg)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self).context("cannot serialize config")?;
        fs::write(path, raw).with_context(|| format!("cannot write config {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() -> Result<()> {
        let dir = tempdir()?;
        let cfg = FreshcamConfig::load(dir.path().join(CONFIG_FILE_NAME))?;
        assert_eq!(cfg, FreshcamConfig::default());
        assert_eq!(cfg.endpoint.timeout(), Some(Duration::from_secs(30)));
        Ok(())
    }

    #[test]
    fn partial_file_fills_in_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "[endpoint]\nbase_url = \"https://fruit.example/api/\"\ntimeout_secs = 0\n",
        )?;
        let cfg = FreshcamConfig::load(&path)?;
        assert_eq!(cfg.endpoint.predict_url(), "https://fruit.example/api/predict");
        assert!(cfg.endpoint.include_nutrition);
        assert_eq!(cfg.endpoint.timeout(), None);
        assert_eq!(cfg.camera.photos_dir, None);
        Ok(())
    }

    #[test]
    fn save_then_load_keeps_settings() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut cfg = FreshcamConfig::default();
        cfg.endpoint.include_recipes = true;
        cfg.camera.photos_dir = Some(dir.path().to_path_buf());
        cfg.save(&path)?;
        assert_eq!(FreshcamConfig::load(&path)?, cfg);
        Ok(())
    }

    #[test]
    fn empty_base_url_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[endpoint]\nbase_url = \"  \"\n")?;
        let err = FreshcamConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("base_url"));
        Ok(())
    }
}
