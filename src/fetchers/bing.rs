use super::{FetchContext, Fetcher};
use crate::reference::ImageReference;
use crate::source::Source;
use crate::{Error, Result};
use rand::seq::IndexedRandom;
use reqwest::Url;
use serde::Deserialize;

const BING_HOST: &str = "https://www.bing.com";
/// The archive endpoint serves at most this many images per request.
const ARCHIVE_SIZE: usize = 8;

#[derive(Debug, Deserialize)]
struct BingResponse {
    images: Vec<BingImage>,
}

#[derive(Debug, Deserialize)]
struct BingImage {
    url: String,
    #[serde(default)]
    title: Option<String>,
}

pub struct BingFetcher<'a> {
    ctx: &'a FetchContext,
    archive: bool,
}

impl<'a> BingFetcher<'a> {
    pub fn new(ctx: &'a FetchContext, archive: bool) -> Self {
        Self { ctx, archive }
    }

    fn endpoint(&self) -> String {
        let count = if self.archive { ARCHIVE_SIZE } else { 1 };
        format!(
            "{}/HPImageArchive.aspx?format=js&idx=0&n={}&mkt={}",
            BING_HOST, count, self.ctx.bing_market
        )
    }
}

/// Absolute image URLs listed in an `HPImageArchive` JSON response, newest
/// first.
pub fn parse_image_urls(body: &str) -> Result<Vec<String>> {
    let response: BingResponse = serde_json::from_str(body)
        .map_err(|e| Error::Parse(format!("Bing image archive: {}", e)))?;

    let urls: Vec<String> = response
        .images
        .iter()
        .filter_map(|image| {
            let path = image.url.split('&').next().unwrap_or_default();
            if path.is_empty() {
                return None;
            }
            if let Some(title) = &image.title {
                tracing::debug!("Bing image: {}", title);
            }
            Url::parse(BING_HOST)
                .and_then(|host| host.join(path))
                .map(String::from)
                .ok()
        })
        .collect();

    if urls.is_empty() {
        return Err(Error::Parse("Bing image archive listed no images".to_string()));
    }
    Ok(urls)
}

impl Fetcher for BingFetcher<'_> {
    fn source(&self) -> Source {
        if self.archive {
            Source::BingArchive
        } else {
            Source::Bing
        }
    }

    fn fetch(&self) -> Result<ImageReference> {
        let body = self.ctx.http.get_text(&self.endpoint())?;
        let urls = parse_image_urls(&body)?;

        let url = if self.archive {
            urls.choose(&mut rand::rng())
        } else {
            urls.first()
        }
        .ok_or_else(|| Error::Parse("Bing image archive listed no images".to_string()))?;

        tracing::info!("Bing image URL: {}", url);
        self.ctx.download(url, self.source())
    }
}
