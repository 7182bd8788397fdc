use crate::reference::{MinResolution, Orientation};
use crate::utils::{APP_DIR, get_cache_dir, get_config_dir};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, read_to_string, write};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct WallpaperConfig {
    #[serde(default = "default_save_folder")]
    pub save_folder: PathBuf,
    #[serde(default = "default_min_width")]
    pub min_width: u32,
    #[serde(default = "default_min_height")]
    pub min_height: u32,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub spotlight_dir: Option<PathBuf>,
    #[serde(default = "default_bing_market")]
    pub bing_market: String,
    #[serde(default)]
    pub proxy: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub notify: bool,
}

fn default_save_folder() -> PathBuf {
    dirs::picture_dir()
        .map(|dir| dir.join(APP_DIR))
        .or_else(|| get_cache_dir().ok().map(|dir| dir.join("images")))
        .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR))
}

fn default_min_width() -> u32 {
    1920
}

fn default_min_height() -> u32 {
    1080
}

fn default_bing_market() -> String {
    "en-US".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for WallpaperConfig {
    fn default() -> Self {
        Self {
            save_folder: default_save_folder(),
            min_width: default_min_width(),
            min_height: default_min_height(),
            orientation: Orientation::default(),
            spotlight_dir: None,
            bing_market: default_bing_market(),
            proxy: None,
            timeout_secs: default_timeout_secs(),
            notify: false,
        }
    }
}

impl WallpaperConfig {
    pub fn load_or_default() -> Result<Self> {
        let config_path = get_config_dir()?.join(CONFIG_FILE);
        Self::load_from(&config_path)
    }

    /// Loads `path`, writing it back so newly added fields show up on disk.
    /// A missing file is created with defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = read_to_string(path)?;
            serde_json::from_str(&content).map_err(|e| {
                Error::Config(format!("{}: {}", path.display(), e))
            })?
        } else {
            tracing::info!("creating default config at {}", path.display());
            Self::default()
        };

        config.save_to(path)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }
        let content =
            serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        write(path, content)?;
        Ok(())
    }

    pub fn min_resolution(&self) -> MinResolution {
        MinResolution::new(self.min_width, self.min_height)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
