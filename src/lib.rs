pub mod config;
pub mod desktop;
pub mod fetchers;
pub mod http;
pub mod reference;
pub mod source;
pub mod utils;

pub use config::WallpaperConfig;
pub use desktop::{WallpaperManager, apply_wallpaper};
pub use fetchers::{FetchContext, Fetcher, get_fetcher};
pub use reference::{ImageReference, MinResolution, Orientation};
pub use source::{Source, SourceFlags};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("No image found: {0}")]
    NotFound(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Unexpected response: {0}")]
    Parse(String),
    #[error("Wallpaper could not be set: {0}")]
    Os(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
