use crate::source::Source;
use crate::{Error, Result};
use chrono::Local;
use reqwest::Url;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const APP_DIR: &str = "potd-wallpaper";

pub fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

pub fn get_cache_dir() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| Error::Config("Could not find cache directory".to_string()))?;

    if !cache_dir.exists() {
        create_dir_all(&cache_dir)?;
    }
    Ok(cache_dir)
}

pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .or_else(|| {
            std::env::var("HOME").ok().map(|home| {
                PathBuf::from(home).join(".config")
            })
        })
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| Error::Config(
            "Could not find config directory. Please set HOME or XDG_CONFIG_HOME environment variable.".to_string()
        ))?;

    if !config_dir.exists() {
        create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Extension of the file a URL points at. Bing keeps the file name in the
/// `id` query parameter, so that is the fallback.
pub fn extension_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;

    parsed
        .path_segments()
        .and_then(|segs| segs.last())
        .and_then(file_extension)
        .or_else(|| {
            parsed
                .query_pairs()
                .find(|(key, _)| key == "id")
                .and_then(|(_, id)| file_extension(&id))
        })
}

fn file_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_lowercase();
    (ext.len() <= 4 && ext.chars().all(|c| c.is_ascii_alphanumeric())).then_some(ext)
}

/// `<YYYYmmddHHMMSS>-<source>.<ext>`
pub fn generated_image_name(source: Source, extension: &str) -> String {
    format!(
        "{}-{}.{}",
        Local::now().format("%Y%m%d%H%M%S"),
        source.name(),
        extension
    )
}

pub fn ensure_dir(folder: &Path) -> Result<()> {
    if !folder.exists() {
        create_dir_all(folder)?;
    }
    Ok(())
}

#[cfg(feature = "notify")]
pub fn send_notification(title: &str, message: &str, image: Option<&Path>) -> Result<()> {
    let mut notification = notify_rust::Notification::new();
    notification.summary(title).body(message);

    if let Some(image_path) = image {
        notification.image_path(image_path.to_string_lossy().as_ref());
    }

    notification
        .show()
        .map_err(|e| Error::Os(e.to_string()))?;
    Ok(())
}

#[cfg(not(feature = "notify"))]
pub fn send_notification(_title: &str, _message: &str, _image: Option<&Path>) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_ignores_query_and_case() {
        assert_eq!(
            extension_from_url("https://www.bing.com/th?id=OHR.Fox_EN-US123_1920x1080.jpg").as_deref(),
            Some("jpg")
        );
        assert_eq!(
            extension_from_url("https://example.org/a/b/Photo.PNG?w=500.0#top").as_deref(),
            Some("png")
        );
        assert_eq!(extension_from_url("https://example.org/a/b/photo"), None);
        assert_eq!(extension_from_url("https://example.org/v1.2/photo"), None);
        assert_eq!(extension_from_url("https://example.org/a.jpg/"), None);
        assert_eq!(extension_from_url("/relative/only.jpg"), None);
    }

    #[test]
    fn generated_name_carries_source_and_extension() {
        let name = generated_image_name(Source::Wikimedia, "png");
        assert!(name.ends_with("-wikimedia.png"), "{}", name);
        assert_eq!(name.split('-').next().unwrap().len(), 14);
    }
}
