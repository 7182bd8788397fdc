use super::{WallpaperManager, run_command};
use crate::Result;
use crate::utils::command_exists;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Plain X11 window managers, through feh.
pub struct X11Manager;

impl X11Manager {
    pub fn new() -> Self {
        Self
    }

    pub fn is_available() -> bool {
        std::env::var("DISPLAY").is_ok() && command_exists("feh")
    }
}

impl WallpaperManager for X11Manager {
    fn name(&self) -> &'static str {
        "feh"
    }

    fn set_wallpaper(&self, path: &Path) -> Result<()> {
        run_command(
            Command::new("feh").arg("--bg-fill").arg(path),
            "feh --bg-fill",
        )?;
        Ok(())
    }

    fn get_wallpaper(&self) -> Result<Option<PathBuf>> {
        let Some(fehbg) = dirs::home_dir().map(|home| home.join(".fehbg")) else {
            return Ok(None);
        };
        match std::fs::read_to_string(fehbg) {
            Ok(script) => Ok(parse_fehbg(&script)),
            Err(_) => Ok(None),
        }
    }
}

/// Last single-quoted argument of the `feh` line in `~/.fehbg`.
fn parse_fehbg(script: &str) -> Option<PathBuf> {
    let line = script.lines().find(|line| line.trim_start().starts_with("feh "))?;
    let end = line.rfind('\'')?;
    let start = line[..end].rfind('\'')?;
    Some(PathBuf::from(&line[start + 1..end]))
}
