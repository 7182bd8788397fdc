use super::{WallpaperManager, run_command};
use crate::utils::command_exists;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

struct WallpaperTools {
    has_hyprpaper: bool,
    has_swww: bool,
    has_swaybg: bool,
}

impl WallpaperTools {
    fn detect() -> Result<Self> {
        let tools = Self {
            has_hyprpaper: command_exists("hyprpaper"),
            has_swww: command_exists("swww"),
            has_swaybg: command_exists("swaybg"),
        };

        if !tools.has_hyprpaper && !tools.has_swww && !tools.has_swaybg {
            return Err(Error::Os(
                "No supported wallpaper tool found. Please install one of hyprpaper, swww, or swaybg.".to_string(),
            ));
        }
        Ok(tools)
    }
}

pub struct HyprlandManager {
    tools: WallpaperTools,
}

impl HyprlandManager {
    pub fn new() -> Result<Self> {
        Ok(Self {
            tools: WallpaperTools::detect()?,
        })
    }

    pub fn is_available() -> bool {
        std::env::var("HYPRLAND_INSTANCE_SIGNATURE").is_ok()
    }
}

impl WallpaperManager for HyprlandManager {
    fn name(&self) -> &'static str {
        "hyprland"
    }

    fn set_wallpaper(&self, path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy().into_owned();
        let path_str = path_str.as_str();

        if self.tools.has_hyprpaper {
            let target = format!(",{}", path_str);
            let preloaded = run_command(
                Command::new("hyprctl").args(["hyprpaper", "preload", path_str]),
                "hyprctl hyprpaper preload",
            );
            let applied = preloaded.and_then(|_| {
                run_command(
                    Command::new("hyprctl").args(["hyprpaper", "wallpaper", target.as_str()]),
                    "hyprctl hyprpaper wallpaper",
                )
            });
            match applied {
                Ok(_) => return Ok(()),
                Err(e) => tracing::warn!("{}", e),
            }
        }

        if self.tools.has_swww {
            match run_command(
                Command::new("swww").args(["img", path_str, "-t", "grow"]),
                "swww img",
            ) {
                Ok(_) => return Ok(()),
                Err(e) => tracing::warn!("{}", e),
            }
        }

        if self.tools.has_swaybg {
            match Command::new("swaybg").args(["-i", path_str, "-m", "fill"]).spawn() {
                Ok(_) => return Ok(()),
                Err(e) => tracing::warn!("swaybg failed to start: {}", e),
            }
        }

        Err(Error::Os(
            "Failed to set wallpaper with hyprpaper, swww or swaybg".to_string(),
        ))
    }

    fn get_wallpaper(&self) -> Result<Option<PathBuf>> {
        if self.tools.has_swww {
            let stdout = run_command(Command::new("swww").arg("query"), "swww query")?;
            return Ok(parse_swww_query(&stdout));
        }

        if self.tools.has_hyprpaper {
            let stdout = run_command(
                Command::new("hyprctl").args(["hyprpaper", "listactive"]),
                "hyprctl hyprpaper listactive",
            )?;
            return Ok(stdout
                .lines()
                .find_map(|line| line.split_once(" = "))
                .map(|(_, path)| PathBuf::from(path.trim())));
        }

        Ok(None)
    }
}

fn parse_swww_query(stdout: &str) -> Option<PathBuf> {
    stdout.lines().find_map(|line| {
        let idx = line.find("image: ")?;
        let path = line[idx + 7..].trim();
        (!path.is_empty()).then(|| PathBuf::from(path))
    })
}
