use super::{FetchContext, Fetcher};
use crate::reference::{ImageReference, inspect_image};
use crate::source::Source;
use crate::utils::{ensure_dir, generated_image_name};
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const ASSETS_DIR: &str =
    "Packages/Microsoft.Windows.ContentDeliveryManager_cw5n1h2txyewy/LocalState/Assets";

/// Where Windows keeps the Spotlight lock screen images it has downloaded.
pub fn default_assets_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(ASSETS_DIR))
}

pub struct SpotlightFetcher<'a> {
    ctx: &'a FetchContext,
}

impl<'a> SpotlightFetcher<'a> {
    pub fn new(ctx: &'a FetchContext) -> Self {
        Self { ctx }
    }

    fn assets_dir(&self) -> Result<PathBuf> {
        self.ctx
            .spotlight_dir
            .clone()
            .or_else(default_assets_dir)
            .ok_or_else(|| Error::NotFound("Spotlight asset folder is unknown".to_string()))
    }

    /// Newest asset that decodes as an image, meets the minimum resolution
    /// and has the configured orientation.
    fn latest_asset(&self, dir: &Path) -> Result<(PathBuf, &'static str, (u32, u32))> {
        let entries = fs::read_dir(dir).map_err(|e| {
            Error::NotFound(format!("cannot read {}: {}", dir.display(), e))
        })?;

        let mut assets: Vec<(SystemTime, PathBuf)> = entries
            .filter_map(|e| e.ok())
            .filter_map(|entry| {
                let meta = entry.metadata().ok()?;
                meta.is_file()
                    .then(|| (meta.modified().unwrap_or(SystemTime::UNIX_EPOCH), entry.path()))
            })
            .collect();
        assets.sort_by(|a, b| b.0.cmp(&a.0));

        for (_, path) in assets {
            let Some(info) = inspect_image(&path) else {
                tracing::debug!("skipping {}: not an image", path.display());
                continue;
            };
            if !self.ctx.min_resolution.allows(info.dimensions) {
                tracing::debug!(
                    "skipping {}: {}x{} is below the minimum",
                    path.display(),
                    info.dimensions.0,
                    info.dimensions.1
                );
                continue;
            }
            if !self.ctx.orientation.allows(info.dimensions) {
                tracing::debug!("skipping {}: wrong orientation", path.display());
                continue;
            }
            return Ok((path, info.extension(), info.dimensions));
        }

        Err(Error::NotFound(format!(
            "no image of at least {}x{} in {}",
            self.ctx.min_resolution.width,
            self.ctx.min_resolution.height,
            dir.display()
        )))
    }

    /// An earlier copy of `asset` in the save folder, if one exists.
    fn existing_copy(&self, asset: &Path, extension: &str) -> Result<Option<PathBuf>> {
        let suffix = format!("-{}.{}", Source::Spotlight.name(), extension);
        let len = fs::metadata(asset)?.len();
        let mut contents = None;

        for entry in fs::read_dir(&self.ctx.save_folder)?.filter_map(|e| e.ok()) {
            let path = entry.path();
            let named_like_copy = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(&suffix));
            let same_len = entry.metadata().is_ok_and(|m| m.is_file() && m.len() == len);
            if !named_like_copy || !same_len {
                continue;
            }

            if contents.is_none() {
                contents = Some(fs::read(asset)?);
            }
            if fs::read(&path).ok() == contents {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }
}

impl Fetcher for SpotlightFetcher<'_> {
    fn source(&self) -> Source {
        Source::Spotlight
    }

    fn fetch(&self) -> Result<ImageReference> {
        let dir = self.assets_dir()?;
        tracing::debug!("scanning Spotlight assets in {}", dir.display());

        let (asset, extension, dimensions) = self.latest_asset(&dir)?;

        // Assets have no extension, which some wallpaper APIs refuse.
        ensure_dir(&self.ctx.save_folder)?;
        if let Some(copy) = self.existing_copy(&asset, extension)? {
            tracing::info!("{} is already saved as {}", asset.display(), copy.display());
            return Ok(ImageReference::local(copy, Source::Spotlight, dimensions));
        }

        let target = self
            .ctx
            .save_folder
            .join(generated_image_name(Source::Spotlight, extension));
        fs::copy(&asset, &target)?;
        tracing::info!("copied {} to {}", asset.display(), target.display());

        Ok(ImageReference::local(target, Source::Spotlight, dimensions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetchers::test_context;
    use crate::reference::{MinResolution, Orientation};
    use image::RgbImage;
    use std::fs::File;
    use std::time::Duration;

    fn write_asset(dir: &Path, name: &str, width: u32, height: u32, age_secs: u64) -> PathBuf {
        let tmp = dir.join(format!("{}.png", name));
        RgbImage::new(width, height).save(&tmp).unwrap();
        let path = dir.join(name);
        fs::rename(&tmp, &path).unwrap();

        let mtime = SystemTime::now() - Duration::from_secs(age_secs);
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
        path
    }

    #[test]
    fn only_small_images_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let assets = dir.path().join("assets");
        fs::create_dir(&assets).unwrap();
        write_asset(&assets, "thumb1", 16, 8, 10);
        write_asset(&assets, "thumb2", 63, 32, 20);

        let ctx = test_context(dir.path().join("out"), assets);
        let result = SpotlightFetcher::new(&ctx).fetch();
        assert!(matches!(result, Err(Error::NotFound(_))), "{:?}", result);
    }

    #[test]
    fn missing_folder_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path().join("out"), dir.path().join("nope"));
        assert!(matches!(
            SpotlightFetcher::new(&ctx).fetch(),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn newest_qualifying_image_wins() {
        let dir = tempfile::tempdir().unwrap();
        let assets = dir.path().join("assets");
        fs::create_dir(&assets).unwrap();
        write_asset(&assets, "old_big", 128, 64, 3600);
        write_asset(&assets, "new_big", 96, 48, 60);
        write_asset(&assets, "newest_small", 16, 8, 1);
        write_asset(&assets, "newest_portrait", 64, 128, 1);
        fs::write(assets.join("garbage"), b"not an image").unwrap();

        let out = dir.path().join("out");
        let ctx = test_context(out.clone(), assets);
        let image = SpotlightFetcher::new(&ctx).fetch().unwrap();

        assert_eq!(image.source, Source::Spotlight);
        assert_eq!(image.dimensions, Some((96, 48)));
        assert!(image.path.starts_with(&out));
        assert_eq!(image.path.extension().and_then(|e| e.to_str()), Some("png"));
        assert!(image.path.exists());
    }

    #[test]
    fn portrait_asset_meets_landscape_minimum() {
        let dir = tempfile::tempdir().unwrap();
        let assets = dir.path().join("assets");
        fs::create_dir(&assets).unwrap();
        write_asset(&assets, "tall", 1080, 1920, 10);

        let mut ctx = test_context(dir.path().join("out"), assets);
        ctx.min_resolution = MinResolution::new(1920, 1080);
        ctx.orientation = Orientation::Portrait;

        let image = SpotlightFetcher::new(&ctx).fetch().unwrap();
        assert_eq!(image.dimensions, Some((1080, 1920)));
    }

    #[test]
    fn repeated_fetch_reuses_identical_copy() {
        let dir = tempfile::tempdir().unwrap();
        let assets = dir.path().join("assets");
        fs::create_dir(&assets).unwrap();
        write_asset(&assets, "today", 96, 48, 10);

        let out = dir.path().join("out");
        let ctx = test_context(out.clone(), assets.clone());
        let first = SpotlightFetcher::new(&ctx).fetch().unwrap();
        let second = SpotlightFetcher::new(&ctx).fetch().unwrap();

        assert_eq!(first.path, second.path);
        assert_eq!(fs::read_dir(&out).unwrap().count(), 1);

        // Copies are named by the second.
        std::thread::sleep(Duration::from_millis(1100));

        // A different asset with the same size still gets its own copy.
        let mut other = RgbImage::new(96, 48);
        other.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        other.save(assets.join("tomorrow.png")).unwrap();
        fs::rename(assets.join("tomorrow.png"), assets.join("tomorrow")).unwrap();

        let third = SpotlightFetcher::new(&ctx).fetch().unwrap();
        assert_ne!(third.path, first.path);
        assert_eq!(fs::read_dir(&out).unwrap().count(), 2);
    }
}
