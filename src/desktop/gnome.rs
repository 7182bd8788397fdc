use super::{WallpaperManager, run_command};
use crate::utils::command_exists;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

const PICTURE_URI: &str = "/org/gnome/desktop/background/picture-uri";
const PICTURE_URI_DARK: &str = "/org/gnome/desktop/background/picture-uri-dark";
const PICTURE_OPTIONS: &str = "/org/gnome/desktop/background/picture-options";

pub struct GnomeManager;

impl GnomeManager {
    pub fn new() -> Result<Self> {
        if !command_exists("dconf") {
            return Err(Error::Os("dconf command not found. Please install dconf.".to_string()));
        }
        Ok(Self)
    }

    pub fn is_available() -> bool {
        std::env::var("GNOME_DESKTOP_SESSION_ID").is_ok() && command_exists("dconf")
    }

    fn write(key: &str, value: &str) -> Result<()> {
        run_command(
            Command::new("dconf").args(["write", key, value]),
            &format!("dconf write {}", key),
        )?;
        Ok(())
    }
}

/// dconf wants GVariant syntax, so the URI is single quoted.
fn picture_uri(path: &Path) -> String {
    format!("'file://{}'", path.display().to_string().replace('\'', "\\'"))
}

impl WallpaperManager for GnomeManager {
    fn name(&self) -> &'static str {
        "gnome"
    }

    fn set_wallpaper(&self, path: &Path) -> Result<()> {
        let uri = picture_uri(path);
        Self::write(PICTURE_URI, &uri)?;
        Self::write(PICTURE_URI_DARK, &uri)?;
        Self::write(PICTURE_OPTIONS, "'zoom'")
    }

    fn get_wallpaper(&self) -> Result<Option<PathBuf>> {
        let value = run_command(Command::new("dconf").args(["read", PICTURE_URI]), "dconf read")?;
        let value = value.trim().trim_matches('\'');
        Ok(value
            .strip_prefix("file://")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from))
    }
}
