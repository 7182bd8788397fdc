use super::{WallpaperManager, run_command};
use crate::utils::command_exists;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

const PLASMA_SERVICE: [&str; 3] = [
    "org.kde.plasmashell",
    "/PlasmaShell",
    "org.kde.PlasmaShell.evaluateScript",
];

pub struct PlasmaManager {
    qdbus: &'static str,
}

impl PlasmaManager {
    pub fn new() -> Result<Self> {
        let qdbus = ["qdbus6", "qdbus", "qdbus-qt5"]
            .into_iter()
            .find(|cmd| command_exists(cmd))
            .ok_or_else(|| Error::Os("QDBus command not found. Please install qdbus.".to_string()))?;
        Ok(Self { qdbus })
    }

    pub fn is_available() -> bool {
        std::env::var("KDE_SESSION_VERSION").is_ok()
    }

    fn evaluate(&self, script: &str) -> Result<String> {
        run_command(
            Command::new(self.qdbus).args(PLASMA_SERVICE).arg(script),
            "plasmashell evaluateScript",
        )
    }
}

fn set_script(path: &Path) -> String {
    let path_str = path.to_string_lossy().replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        r#"
        var allDesktops = desktops();
        for (var i = 0; i < allDesktops.length; i++) {{
            var d = allDesktops[i];
            d.wallpaperPlugin = "org.kde.image";
            d.currentConfigGroup = Array("Wallpaper", "org.kde.image", "General");
            d.writeConfig("Image", "file://{}");
        }}
        "#,
        path_str
    )
}

impl WallpaperManager for PlasmaManager {
    fn name(&self) -> &'static str {
        "plasma"
    }

    fn set_wallpaper(&self, path: &Path) -> Result<()> {
        self.evaluate(&set_script(path))?;
        Ok(())
    }

    fn get_wallpaper(&self) -> Result<Option<PathBuf>> {
        let script = r#"
            var allDesktops = desktops();
            if (allDesktops.length > 0) {
                var d = allDesktops[0];
                d.currentConfigGroup = Array("Wallpaper", "org.kde.image", "General");
                print(d.readConfig("Image"));
            }
        "#;

        let result = self.evaluate(script)?;
        let result = result.trim();

        if result.is_empty() || result == "undefined" {
            return Ok(None);
        }

        let path_str = result.strip_prefix("file://").unwrap_or(result);
        Ok(Some(PathBuf::from(path_str)))
    }

    fn notify(&self, title: &str, message: &str, image: Option<&Path>) -> Result<()> {
        if command_exists("kdialog") {
            let mut cmd = Command::new("kdialog");
            cmd.args(["--title", title, "--passivepopup", message, "5"]);
            if run_command(&mut cmd, "kdialog").is_ok() {
                return Ok(());
            }
        }
        crate::utils::send_notification(title, message, image)
    }
}
