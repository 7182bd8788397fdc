use crate::config::WallpaperConfig;
use crate::http::HttpClient;
use crate::reference::{ImageReference, MinResolution, Orientation, inspect_image};
use crate::source::Source;
use crate::utils::{ensure_dir, extension_from_url, generated_image_name};
use crate::{Error, Result};
use std::fs;
use std::path::PathBuf;

pub mod bing;
pub mod flickr;
pub mod geographic;
pub mod spotlight;
pub mod wikimedia;

/// Resolves one [`Source`] to an image file on disk.
pub trait Fetcher {
    fn source(&self) -> Source;
    fn fetch(&self) -> Result<ImageReference>;
}

/// Everything a fetcher needs from the outside world.
pub struct FetchContext {
    pub http: HttpClient,
    pub save_folder: PathBuf,
    pub min_resolution: MinResolution,
    pub orientation: Orientation,
    pub spotlight_dir: Option<PathBuf>,
    pub bing_market: String,
}

impl FetchContext {
    /// `proxy` overrides the configured proxy.
    pub fn from_config(config: &WallpaperConfig, proxy: Option<&str>) -> Result<Self> {
        let proxy = proxy.or(config.proxy.as_deref());
        Ok(Self {
            http: HttpClient::new(proxy, config.timeout())?,
            save_folder: config.save_folder.clone(),
            min_resolution: config.min_resolution(),
            orientation: config.orientation,
            spotlight_dir: config.spotlight_dir.clone(),
            bing_market: config.bing_market.clone(),
        })
    }

    /// Downloads `url` into the save folder under a generated name. Bodies
    /// that are not JPEG or PNG are deleted again and reported as
    /// [`Error::Parse`].
    pub fn download(&self, url: &str, source: Source) -> Result<ImageReference> {
        ensure_dir(&self.save_folder)?;

        let extension = extension_from_url(url).unwrap_or_else(|| "jpg".to_string());
        let mut path = self.save_folder.join(generated_image_name(source, &extension));
        let size = self.http.download(url, &path)?;

        let Some(info) = inspect_image(&path) else {
            if let Err(e) = fs::remove_file(&path) {
                tracing::warn!("could not remove {}: {}", path.display(), e);
            }
            return Err(Error::Parse(format!("{} did not return a JPEG/PNG image", url)));
        };

        if info.extension() != extension {
            let renamed = path.with_extension(info.extension());
            fs::rename(&path, &renamed)?;
            path = renamed;
        }
        tracing::info!("saved {} bytes from {} to {}", size, source, path.display());

        Ok(ImageReference::remote(path, url.to_string(), source, info.dimensions))
    }
}

pub fn get_fetcher<'a>(source: Source, ctx: &'a FetchContext) -> Result<Box<dyn Fetcher + 'a>> {
    match source {
        Source::Spotlight => Ok(Box::new(spotlight::SpotlightFetcher::new(ctx))),
        Source::Bing => Ok(Box::new(bing::BingFetcher::new(ctx, false))),
        Source::BingArchive => Ok(Box::new(bing::BingFetcher::new(ctx, true))),
        Source::Flickr => Ok(Box::new(flickr::FlickrFetcher::new(ctx))),
        Source::Wikimedia => Ok(Box::new(wikimedia::WikimediaFetcher::new(ctx))),
        Source::NationalGeographic => Ok(Box::new(geographic::GeographicFetcher::new(ctx, false))),
        Source::NationalGeographicArchive => {
            Ok(Box::new(geographic::GeographicFetcher::new(ctx, true)))
        }
        Source::Random => Err(Error::InvalidArguments(
            "random must be resolved to a concrete source before fetching".to_string(),
        )),
    }
}

#[cfg(test)]
pub(crate) fn test_context(save_folder: PathBuf, spotlight_dir: PathBuf) -> FetchContext {
    FetchContext {
        http: HttpClient::direct(std::time::Duration::from_secs(5)).unwrap(),
        save_folder,
        min_resolution: MinResolution::new(64, 32),
        orientation: Orientation::Landscape,
        spotlight_dir: Some(spotlight_dir),
        bing_market: "en-US".to_string(),
    }
}
