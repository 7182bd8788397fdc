use crate::{Error, Result};
use rand::Rng;
use rand::seq::IndexedRandom;
use std::fmt;

/// A provider of a daily image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Spotlight,
    Bing,
    BingArchive,
    Flickr,
    Wikimedia,
    NationalGeographic,
    NationalGeographicArchive,
    Random,
}

impl Source {
    /// Every source that can actually be fetched.
    pub const CONCRETE: [Source; 7] = [
        Source::Spotlight,
        Source::Bing,
        Source::BingArchive,
        Source::Flickr,
        Source::Wikimedia,
        Source::NationalGeographic,
        Source::NationalGeographicArchive,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Source::Spotlight => "spotlight",
            Source::Bing => "bing",
            Source::BingArchive => "bing-archive",
            Source::Flickr => "flickr",
            Source::Wikimedia => "wikimedia",
            Source::NationalGeographic => "national-geographic",
            Source::NationalGeographicArchive => "national-geographic-archive",
            Source::Random => "random",
        }
    }

    pub fn is_remote(&self) -> bool {
        !matches!(self, Source::Spotlight | Source::Random)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The mutually exclusive source selection flags of a single invocation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SourceFlags {
    pub spotlight: bool,
    pub bing: bool,
    pub bing_archive: bool,
    pub flickr: bool,
    pub wikimedia: bool,
    pub national_geographic: bool,
    pub national_geographic_archive: bool,
    pub random: bool,
}

impl SourceFlags {
    fn selected(&self) -> Vec<Source> {
        [
            (self.spotlight, Source::Spotlight),
            (self.bing, Source::Bing),
            (self.bing_archive, Source::BingArchive),
            (self.flickr, Source::Flickr),
            (self.wikimedia, Source::Wikimedia),
            (self.national_geographic, Source::NationalGeographic),
            (self.national_geographic_archive, Source::NationalGeographicArchive),
            (self.random, Source::Random),
        ]
        .into_iter()
        .filter_map(|(set, source)| set.then_some(source))
        .collect()
    }

    pub fn resolve(&self) -> Result<Source> {
        self.resolve_with(&mut rand::rng())
    }

    /// Resolves the flags to exactly one concrete source. `random` is drawn
    /// from `rng` here and never returned as such.
    pub fn resolve_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Source> {
        let selected = self.selected();

        let source = match selected.as_slice() {
            [] => Source::Spotlight,
            [single] => *single,
            many => {
                let names: Vec<&str> = many.iter().map(Source::name).collect();
                return Err(Error::InvalidArguments(format!(
                    "only one image source may be given, got: {}",
                    names.join(", ")
                )));
            }
        };

        if source == Source::Random {
            let picked = *Source::CONCRETE
                .choose(rng)
                .ok_or_else(|| Error::InvalidArguments("no sources available".to_string()))?;
            tracing::debug!("random source resolved to {}", picked);
            return Ok(picked);
        }

        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flag_defaults_to_spotlight() {
        assert_eq!(SourceFlags::default().resolve().unwrap(), Source::Spotlight);
    }

    #[test]
    fn single_flag_selects_its_source() {
        let cases = [
            (SourceFlags { spotlight: true, ..Default::default() }, Source::Spotlight),
            (SourceFlags { bing: true, ..Default::default() }, Source::Bing),
            (SourceFlags { bing_archive: true, ..Default::default() }, Source::BingArchive),
            (SourceFlags { flickr: true, ..Default::default() }, Source::Flickr),
            (SourceFlags { wikimedia: true, ..Default::default() }, Source::Wikimedia),
            (
                SourceFlags { national_geographic: true, ..Default::default() },
                Source::NationalGeographic,
            ),
            (
                SourceFlags { national_geographic_archive: true, ..Default::default() },
                Source::NationalGeographicArchive,
            ),
        ];

        for (flags, expected) in cases {
            assert_eq!(flags.resolve().unwrap(), expected, "{:?}", flags);
        }
    }

    #[test]
    fn random_never_resolves_to_random() {
        let flags = SourceFlags { random: true, ..Default::default() };
        let mut rng = rand::rng();
        for _ in 0..200 {
            let source = flags.resolve_with(&mut rng).unwrap();
            assert_ne!(source, Source::Random);
            assert!(Source::CONCRETE.contains(&source));
        }
    }

    #[test]
    fn multiple_flags_are_rejected() {
        let flags = SourceFlags { bing: true, flickr: true, ..Default::default() };
        match flags.resolve() {
            Err(Error::InvalidArguments(msg)) => {
                assert!(msg.contains("bing"));
                assert!(msg.contains("flickr"));
            }
            other => panic!("expected InvalidArguments, got {:?}", other),
        }
    }

    #[test]
    fn only_random_and_spotlight_are_not_remote() {
        assert!(!Source::Spotlight.is_remote());
        assert!(!Source::Random.is_remote());
        assert!(Source::CONCRETE.iter().filter(|s| s.is_remote()).count() == 6);
    }
}
