use super::{FetchContext, Fetcher};
use crate::reference::ImageReference;
use crate::source::Source;
use crate::{Error, Result};
use chrono::{Datelike, Local, Months, NaiveDate};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Deserialize;

const GALLERY_BASE: &str =
    "https://www.nationalgeographic.com/photography/photo-of-the-day/_jcr_content/.gallery";
const ARCHIVE_MONTHS: u32 = 12;

#[derive(Debug, Deserialize)]
struct Gallery {
    items: Vec<GalleryItem>,
}

#[derive(Debug, Deserialize)]
struct GalleryItem {
    #[serde(default)]
    image: Option<GalleryImage>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GalleryImage {
    uri: String,
    #[serde(default)]
    title: Option<String>,
}

impl GalleryItem {
    fn image_url(&self) -> Option<&str> {
        self.image
            .as_ref()
            .map(|image| image.uri.as_str())
            .or(self.url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

pub struct GeographicFetcher<'a> {
    ctx: &'a FetchContext,
    archive: bool,
}

impl<'a> GeographicFetcher<'a> {
    pub fn new(ctx: &'a FetchContext, archive: bool) -> Self {
        Self { ctx, archive }
    }
}

pub fn today_gallery_url() -> String {
    format!("{}.json", GALLERY_BASE)
}

pub fn monthly_gallery_url(month: NaiveDate) -> String {
    format!("{}.{}.json", GALLERY_BASE, month.format("%Y-%m"))
}

/// A month between one and [`ARCHIVE_MONTHS`] months before `today`.
pub fn random_archive_month<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> NaiveDate {
    let back = rng.random_range(1..=ARCHIVE_MONTHS);
    today
        .with_day(1)
        .and_then(|first| first.checked_sub_months(Months::new(back)))
        .unwrap_or(today)
}

/// Image URLs of a gallery response, in gallery order.
pub fn parse_gallery(body: &str) -> Result<Vec<String>> {
    let gallery: Gallery = serde_json::from_str(body)
        .map_err(|e| Error::Parse(format!("National Geographic gallery: {}", e)))?;

    let urls: Vec<String> = gallery
        .items
        .iter()
        .filter_map(|item| {
            if let Some(title) = item.image.as_ref().and_then(|i| i.title.as_deref()) {
                tracing::debug!("National Geographic image: {}", title);
            }
            item.image_url().map(str::to_string)
        })
        .collect();

    if urls.is_empty() {
        return Err(Error::Parse(
            "National Geographic gallery has no images".to_string(),
        ));
    }
    Ok(urls)
}

impl Fetcher for GeographicFetcher<'_> {
    fn source(&self) -> Source {
        if self.archive {
            Source::NationalGeographicArchive
        } else {
            Source::NationalGeographic
        }
    }

    fn fetch(&self) -> Result<ImageReference> {
        let mut rng = rand::rng();
        let endpoint = if self.archive {
            monthly_gallery_url(random_archive_month(Local::now().date_naive(), &mut rng))
        } else {
            today_gallery_url()
        };

        let body = self.ctx.http.get_text(&endpoint)?;
        let urls = parse_gallery(&body)?;
        let url = if self.archive {
            urls.choose(&mut rng)
        } else {
            urls.first()
        }
        .ok_or_else(|| Error::Parse("National Geographic gallery has no images".to_string()))?;

        tracing::info!("National Geographic image URL: {}", url);
        self.ctx.download(url, self.source())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_item_image_uri() {
        let body = r#"{
            "galleryTitle": "Photo of the Day",
            "items": [
                {"image": {"uri": "https://i.natgeofe.com/n/aaa/pod-1.jpg", "title": "Dunes"}},
                {"image": {"uri": "https://i.natgeofe.com/n/bbb/pod-2.jpg"}}
            ]
        }"#;
        assert_eq!(
            parse_gallery(body).unwrap(),
            vec![
                "https://i.natgeofe.com/n/aaa/pod-1.jpg",
                "https://i.natgeofe.com/n/bbb/pod-2.jpg"
            ]
        );
    }

    #[test]
    fn items_without_images_are_skipped() {
        let body = r#"{"items": [{"caption": "video"}, {"url": "https://i.natgeofe.com/x.jpg"}]}"#;
        assert_eq!(parse_gallery(body).unwrap(), vec!["https://i.natgeofe.com/x.jpg"]);
    }

    #[test]
    fn malformed_gallery_is_parse_error() {
        assert!(matches!(parse_gallery("not json"), Err(Error::Parse(_))));
        assert!(matches!(parse_gallery(r#"{"items": []}"#), Err(Error::Parse(_))));
        assert!(matches!(parse_gallery(r#"{"items": [{}]}"#), Err(Error::Parse(_))));
        assert!(matches!(parse_gallery(r#"{"items": {"a": 1}}"#), Err(Error::Parse(_))));
    }

    #[test]
    fn archive_month_is_in_the_past_year() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        let mut rng = rand::rng();
        for _ in 0..100 {
            let month = random_archive_month(today, &mut rng);
            assert_eq!(month.day(), 1);
            assert!(month < NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
            assert!(month >= NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        }
    }

    #[test]
    fn monthly_url_format() {
        let month = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
        assert!(monthly_gallery_url(month).ends_with(".gallery.2025-11.json"));
        assert!(today_gallery_url().ends_with("_jcr_content/.gallery.json"));
    }
}
