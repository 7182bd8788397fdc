use anyhow::Context;
use clap::{CommandFactory, Parser};
use std::fs::OpenOptions;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use potd_wallpaper::{
    FetchContext, SourceFlags, WallpaperConfig, apply_wallpaper, desktop::get_wallpaper_manager,
    get_fetcher, utils::get_cache_dir,
};

#[derive(Parser)]
#[command(name = "potd-wallpaper")]
#[command(
    about = "Load and show nice background images. Fetches a picture of the day and sets it as your desktop wallpaper.",
    disable_version_flag = true
)]
pub struct Args {
    #[arg(short, long, help = "Set Bing Image Of The Day as wallpaper")]
    bing: bool,
    #[arg(short, long, help = "Set the latest Microsoft Spotlight image as wallpaper [default]")]
    spotlight: bool,
    #[arg(short, long, help = "Set the latest image of Peter Levi's Flickr collection as wallpaper")]
    flickr: bool,
    #[arg(short, long, help = "Set Wikimedia Picture Of The Day as wallpaper")]
    wikimedia: bool,
    #[arg(short, long, help = "Set wallpaper from a random source")]
    random: bool,
    #[arg(short = 'a', long = "bingarchive", help = "Set a random image of Bing's recent archive as wallpaper")]
    bing_archive: bool,
    #[arg(short = 'g', long = "geographicarchive", help = "Set a random image of the National Geographic archive as wallpaper")]
    geographic_archive: bool,
    #[arg(short, long, help = "Set National Geographic Photo Of The Day as wallpaper")]
    national: bool,
    #[arg(short, long, value_name = "URL", help = "Route HTTP requests through this proxy")]
    proxy: Option<String>,
    #[arg(short, long, help = "Show license and version information")]
    info: bool,
    #[arg(short, long, help = "Show version")]
    version: bool,
    #[arg(short, long, help = "Write debug output to a log file")]
    debug: bool,
}

impl Args {
    fn source_flags(&self) -> SourceFlags {
        SourceFlags {
            spotlight: self.spotlight,
            bing: self.bing,
            bing_archive: self.bing_archive,
            flickr: self.flickr,
            wikimedia: self.wikimedia,
            national_geographic: self.national,
            national_geographic_archive: self.geographic_archive,
            random: self.random,
        }
    }
}

fn init_logging(debug: bool) -> anyhow::Result<()> {
    if debug {
        let log_path = get_cache_dir()?.join("potd-wallpaper.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Could not open log file {}", log_path.display()))?;

        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("potd_wallpaper=debug,info"))
            .with_ansi(false)
            .with_writer(Arc::new(file))
            .init();
        println!("Writing debug log to {}", log_path.display());
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn print_info() -> anyhow::Result<()> {
    Args::command().print_help()?;
    println!();
    println!("DESCRIPTION\n\n    {}\n", env!("CARGO_PKG_DESCRIPTION"));
    println!("VERSION\n\n    {}\n", env!("CARGO_PKG_VERSION"));
    println!("LICENSE\n\n    {}", env!("CARGO_PKG_LICENSE"));
    Ok(())
}

fn run(args: Args) -> anyhow::Result<()> {
    if args.info {
        return print_info();
    }
    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_logging(args.debug)?;
    tracing::debug!("starting {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let source = args.source_flags().resolve()?;
    tracing::info!("selected source: {}", source);

    let config = WallpaperConfig::load_or_default().context("Could not load configuration")?;
    let ctx = FetchContext::from_config(&config, args.proxy.as_deref())?;
    let manager = get_wallpaper_manager()?;

    if let Ok(Some(previous)) = manager.get_wallpaper() {
        tracing::debug!("previous wallpaper: {}", previous.display());
    }

    if source.is_remote() {
        println!("Downloading image from {}...", source);
    } else {
        println!("Looking for the latest {} image...", source);
    }
    let image = get_fetcher(source, &ctx)?
        .fetch()
        .with_context(|| format!("Could not fetch an image from {}", source))?;
    if let Some(url) = &image.url {
        tracing::info!("downloaded {}", url);
    }
    if let Some((width, height)) = image.dimensions {
        tracing::debug!("image is {}x{}", width, height);
    }

    let applied = apply_wallpaper(manager.as_ref(), &image.path)?;
    println!("Wallpaper set to {}", applied.display());

    if config.notify
        && let Err(e) = manager.notify(
            "Picture of the day",
            &format!("New wallpaper from {}", source),
            Some(applied.as_path()),
        )
    {
        tracing::warn!("Could not send notification: {}", e);
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("exiting with failure: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use potd_wallpaper::{Error, Source};

    fn resolve(argv: &[&str]) -> potd_wallpaper::Result<Source> {
        let args = Args::try_parse_from(std::iter::once("potd-wallpaper").chain(argv.iter().copied()))
            .unwrap();
        args.source_flags().resolve()
    }

    #[test]
    fn short_flags_select_their_source() {
        let cases = [
            ("-s", Source::Spotlight),
            ("-b", Source::Bing),
            ("-a", Source::BingArchive),
            ("-f", Source::Flickr),
            ("-w", Source::Wikimedia),
            ("-n", Source::NationalGeographic),
            ("-g", Source::NationalGeographicArchive),
        ];
        for (flag, source) in cases {
            assert_eq!(resolve(&[flag]).unwrap(), source, "{}", flag);
        }
    }

    #[test]
    fn long_flags_select_their_source() {
        assert_eq!(resolve(&["--bingarchive"]).unwrap(), Source::BingArchive);
        assert_eq!(resolve(&["--geographicarchive"]).unwrap(), Source::NationalGeographicArchive);
        assert_eq!(resolve(&["--national"]).unwrap(), Source::NationalGeographic);
        assert_eq!(resolve(&["--wikimedia"]).unwrap(), Source::Wikimedia);
    }

    #[test]
    fn no_flag_means_spotlight() {
        assert_eq!(resolve(&[]).unwrap(), Source::Spotlight);
        assert_eq!(resolve(&["-d", "-p", "http://proxy:8080"]).unwrap(), Source::Spotlight);
    }

    #[test]
    fn random_picks_a_concrete_source() {
        let source = resolve(&["-r"]).unwrap();
        assert!(Source::CONCRETE.contains(&source));
    }

    #[test]
    fn two_sources_are_rejected() {
        assert!(matches!(resolve(&["-b", "-f"]), Err(Error::InvalidArguments(_))));
        assert!(matches!(resolve(&["-r", "-s"]), Err(Error::InvalidArguments(_))));
    }

    #[test]
    fn proxy_needs_a_value() {
        assert!(Args::try_parse_from(["potd-wallpaper", "-p"]).is_err());
        let args = Args::try_parse_from(["potd-wallpaper", "--proxy", "socks5://127.0.0.1:1080"]).unwrap();
        assert_eq!(args.proxy.as_deref(), Some("socks5://127.0.0.1:1080"));
    }
}
