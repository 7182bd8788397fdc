use super::WallpaperManager;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Desktop background through `SystemParametersInfo`.
pub struct WindowsManager;

impl WindowsManager {
    pub fn new() -> Self {
        Self
    }
}

impl WallpaperManager for WindowsManager {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn set_wallpaper(&self, path: &Path) -> Result<()> {
        let path_str = path
            .to_str()
            .ok_or_else(|| Error::Os(format!("{} is not valid UTF-8", path.display())))?;
        // canonicalize() yields a verbatim `\\?\` path the API does not accept.
        let path_str = path_str.strip_prefix(r"\\?\").unwrap_or(path_str);

        wallpaper::set_from_path(path_str).map_err(|e| Error::Os(e.to_string()))?;
        wallpaper::set_mode(wallpaper::Mode::Crop).map_err(|e| Error::Os(e.to_string()))
    }

    fn get_wallpaper(&self) -> Result<Option<PathBuf>> {
        let current = wallpaper::get().map_err(|e| Error::Os(e.to_string()))?;
        Ok((!current.is_empty()).then(|| PathBuf::from(current)))
    }
}
