use super::{FetchContext, Fetcher};
use crate::reference::ImageReference;
use crate::source::Source;
use crate::{Error, Result};
use regex::Regex;
use reqwest::Url;

const MAIN_PAGE_URL: &str = "https://commons.wikimedia.org/wiki/Main_Page";
const TARGET_WIDTH: u32 = 1920;

pub struct WikimediaFetcher<'a> {
    ctx: &'a FetchContext,
}

impl<'a> WikimediaFetcher<'a> {
    pub fn new(ctx: &'a FetchContext) -> Self {
        Self { ctx }
    }
}

/// URL of the picture of the day thumbnail, scaled up to [`TARGET_WIDTH`].
pub fn parse_potd_url(body: &str) -> Result<String> {
    let potd = Regex::new(r#"(?s)mainpage-potd.*?<img[^>]*?\ssrc="([^"]+)""#)
        .map_err(|e| Error::Parse(e.to_string()))?;
    let src = potd
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| Error::Parse("no picture of the day on the Commons main page".to_string()))?;

    let src = src.replace("&amp;", "&");
    let absolute = Url::parse(MAIN_PAGE_URL)
        .and_then(|base| base.join(&src))
        .map_err(|e| Error::Parse(format!("picture of the day src {:?}: {}", src, e)))?;

    let width = Regex::new(r"/[0-9]+px-").map_err(|e| Error::Parse(e.to_string()))?;
    Ok(width
        .replace(absolute.as_str(), format!("/{}px-", TARGET_WIDTH).as_str())
        .into_owned())
}

impl Fetcher for WikimediaFetcher<'_> {
    fn source(&self) -> Source {
        Source::Wikimedia
    }

    fn fetch(&self) -> Result<ImageReference> {
        let body = self.ctx.http.get_text(MAIN_PAGE_URL)?;
        let url = parse_potd_url(&body)?;

        tracing::info!("Wikimedia image URL: {}", url);
        self.ctx.download(&url, Source::Wikimedia)
    }
}
