use crate::utils::send_notification;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

#[cfg(not(windows))]
pub mod gnome;
#[cfg(not(windows))]
pub mod hyprland;
#[cfg(not(windows))]
pub mod plasma;
#[cfg(windows)]
pub mod windows;
#[cfg(not(windows))]
pub mod x11;

pub trait WallpaperManager {
    fn name(&self) -> &'static str;
    fn set_wallpaper(&self, path: &Path) -> Result<()>;
    fn get_wallpaper(&self) -> Result<Option<PathBuf>>;

    fn notify(&self, title: &str, message: &str, image: Option<&Path>) -> Result<()> {
        send_notification(title, message, image)
    }
}

/// Applies `path` as wallpaper and returns the absolute path handed to the
/// backend. Nonexistent files are rejected before the backend is touched.
pub fn apply_wallpaper(manager: &dyn WallpaperManager, path: &Path) -> Result<PathBuf> {
    if !path.is_file() {
        return Err(Error::Os(format!(
            "{} does not exist or is not a file",
            path.display()
        )));
    }
    let absolute = path
        .canonicalize()
        .map_err(|e| Error::Os(format!("cannot resolve {}: {}", path.display(), e)))?;

    tracing::debug!("setting wallpaper via {}: {}", manager.name(), absolute.display());
    manager.set_wallpaper(&absolute)?;
    Ok(absolute)
}

/// Runs `cmd`, turning a failed spawn or a non-zero exit into [`Error::Os`].
pub(crate) fn run_command(cmd: &mut Command, what: &str) -> Result<String> {
    let output = cmd
        .output()
        .map_err(|e| Error::Os(format!("{}: {}", what, e)))?;

    if !output.status.success() {
        return Err(Error::Os(format!(
            "{} failed: {}",
            what,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(windows)]
pub fn get_wallpaper_manager() -> Result<Box<dyn WallpaperManager>> {
    Ok(Box::new(windows::WindowsManager::new()))
}

#[cfg(not(windows))]
pub fn get_wallpaper_manager() -> Result<Box<dyn WallpaperManager>> {
    let desktop = std::env::var("XDG_CURRENT_DESKTOP").unwrap_or_default();
    let desktop = desktop.to_lowercase();

    for name in desktop.split(':') {
        match name {
            "hyprland" => return Ok(Box::new(hyprland::HyprlandManager::new()?)),
            "kde" | "plasma" => return Ok(Box::new(plasma::PlasmaManager::new()?)),
            "gnome" | "unity" | "budgie" => return Ok(Box::new(gnome::GnomeManager::new()?)),
            _ => {}
        }
    }

    if hyprland::HyprlandManager::is_available() {
        Ok(Box::new(hyprland::HyprlandManager::new()?))
    } else if plasma::PlasmaManager::is_available() {
        Ok(Box::new(plasma::PlasmaManager::new()?))
    } else if gnome::GnomeManager::is_available() {
        Ok(Box::new(gnome::GnomeManager::new()?))
    } else if x11::X11Manager::is_available() {
        Ok(Box::new(x11::X11Manager::new()))
    } else {
        Err(Error::Os(
            "No supported desktop environment found".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingManager {
        applied: RefCell<Vec<PathBuf>>,
        reject: bool,
    }

    impl WallpaperManager for RecordingManager {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn set_wallpaper(&self, path: &Path) -> Result<()> {
            if self.reject {
                return Err(Error::Os("rejected".to_string()));
            }
            self.applied.borrow_mut().push(path.to_path_buf());
            Ok(())
        }

        fn get_wallpaper(&self) -> Result<Option<PathBuf>> {
            Ok(self.applied.borrow().last().cloned())
        }
    }

    #[test]
    fn nonexistent_path_is_os_error() {
        let manager = RecordingManager::default();
        let result = apply_wallpaper(&manager, Path::new("/definitely/not/here.jpg"));

        assert!(matches!(result, Err(Error::Os(_))));
        assert!(manager.applied.borrow().is_empty());
    }

    #[test]
    fn directory_is_os_error() {
        let dir = tempfile::tempdir().unwrap();
        let manager = RecordingManager::default();

        assert!(matches!(
            apply_wallpaper(&manager, dir.path()),
            Err(Error::Os(_))
        ));
        assert!(manager.applied.borrow().is_empty());
    }

    #[test]
    fn existing_file_is_applied_as_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("wall.jpg");
        std::fs::write(&file, b"jpeg").unwrap();

        let manager = RecordingManager::default();
        let applied = apply_wallpaper(&manager, &file).unwrap();

        assert!(applied.is_absolute());
        assert_eq!(manager.get_wallpaper().unwrap(), Some(applied));
    }

    #[test]
    fn backend_rejection_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("wall.jpg");
        std::fs::write(&file, b"jpeg").unwrap();

        let manager = RecordingManager { reject: true, ..Default::default() };
        assert!(matches!(apply_wallpaper(&manager, &file), Err(Error::Os(_))));
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_is_os_error() {
        assert!(matches!(
            run_command(&mut Command::new("false"), "false"),
            Err(Error::Os(_))
        ));
        assert!(matches!(
            run_command(&mut Command::new("potd-wallpaper-no-such-binary"), "missing"),
            Err(Error::Os(_))
        ));
        assert_eq!(run_command(Command::new("echo").arg("hi"), "echo").unwrap(), "hi\n");
    }
}
