use super::{FetchContext, Fetcher};
use crate::reference::ImageReference;
use crate::source::Source;
use crate::{Error, Result};
use regex::Regex;
use reqwest::Url;

const GALLERY_URL: &str = "https://www.flickr.com/photos/peter-levi/";

pub struct FlickrFetcher<'a> {
    ctx: &'a FetchContext,
}

impl<'a> FlickrFetcher<'a> {
    pub fn new(ctx: &'a FetchContext) -> Self {
        Self { ctx }
    }
}

fn regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Parse(e.to_string()))
}

/// Id of the newest photo on the gallery page. Photo tiles reference
/// `<id>_<secret>.jpg` from an inline `url(...)` style.
pub fn parse_photo_id(body: &str) -> Result<String> {
    let re = regex(r"([0-9]{10,})_[0-9a-f]+(?:_[a-z0-9])?\.jpg\)")?;
    re.captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| Error::Parse("no photo found on the Flickr gallery page".to_string()))
}

/// The large (`_h`) image URL of `photo_id` on its sizes page.
pub fn parse_large_image_url(body: &str, photo_id: &str) -> Result<String> {
    let re = regex(&format!(
        r#"(?:https?:)?//[^"'\s()]*{}[^"'\s()]*_h\.jpg"#,
        regex::escape(photo_id)
    ))?;
    let found = re
        .find(body)
        .map(|m| m.as_str())
        .ok_or_else(|| Error::Parse(format!("no large image for Flickr photo {}", photo_id)))?;

    Url::parse(GALLERY_URL)
        .and_then(|base| base.join(found))
        .map(String::from)
        .map_err(|e| Error::Parse(format!("Flickr image URL {:?}: {}", found, e)))
}

impl Fetcher for FlickrFetcher<'_> {
    fn source(&self) -> Source {
        Source::Flickr
    }

    fn fetch(&self) -> Result<ImageReference> {
        let gallery = self.ctx.http.get_text(GALLERY_URL)?;
        let photo_id = parse_photo_id(&gallery)?;
        tracing::debug!("newest Flickr photo id: {}", photo_id);

        let sizes = self
            .ctx
            .http
            .get_text(&format!("{}{}/sizes/h/", GALLERY_URL, photo_id))?;
        let url = parse_large_image_url(&sizes, &photo_id)?;

        tracing::info!("Flickr image URL: {}", url);
        self.ctx.download(&url, Source::Flickr)
    }
}
