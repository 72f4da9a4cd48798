//! Media - Media Reference Resolution
//!
//! Catalog items carry opaque media strings. A string starting with `@`
//! names a still image (the rest is the image locator); anything else is a
//! video locator played looped, muted and auto-playing.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::IMAGE_MARKER;

/// A resolved media reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MediaRef {
    /// Still image at the given locator
    Image(String),
    /// Looping, muted, auto-playing video at the given locator
    Video(String),
}

impl MediaRef {
    /// Resolve a raw reference string
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(IMAGE_MARKER) {
            Some(locator) => MediaRef::Image(locator.to_string()),
            None => MediaRef::Video(raw.to_string()),
        }
    }

    /// Locator without the image marker
    pub fn locator(&self) -> &str {
        match self {
            MediaRef::Image(locator) | MediaRef::Video(locator) => locator,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, MediaRef::Image(_))
    }

    pub fn is_video(&self) -> bool {
        matches!(self, MediaRef::Video(_))
    }

    /// Playback flags for the view layer
    pub fn playback(&self) -> Playback {
        match self {
            MediaRef::Image(_) => Playback::Still,
            MediaRef::Video(_) => Playback::Video {
                looping: true,
                muted: true,
                autoplay: true,
            },
        }
    }
}

/// How a media reference is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Still,
    Video {
        looping: bool,
        muted: bool,
        autoplay: bool,
    },
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaRef::Image(locator) => write!(f, "{IMAGE_MARKER}{locator}"),
            MediaRef::Video(locator) => f.write_str(locator),
        }
    }
}

impl From<&str> for MediaRef {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl Serialize for MediaRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MediaRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_means_still_image() {
        let media = MediaRef::parse("@foo.png");
        assert_eq!(media, MediaRef::Image("foo.png".to_string()));
        assert_eq!(media.locator(), "foo.png");
        assert_eq!(media.playback(), Playback::Still);
    }

    #[test]
    fn plain_locator_means_looping_muted_video() {
        let media = MediaRef::parse("/bar.mp4");
        assert_eq!(media, MediaRef::Video("/bar.mp4".to_string()));
        assert_eq!(
            media.playback(),
            Playback::Video {
                looping: true,
                muted: true,
                autoplay: true,
            }
        );
    }

    #[test]
    fn only_leading_marker_counts() {
        assert!(MediaRef::parse("clips/@night.mp4").is_video());
        assert_eq!(MediaRef::parse("@@x.png").locator(), "@x.png");
    }

    #[test]
    fn display_restores_wire_form() {
        assert_eq!(MediaRef::parse("@gauge.png").to_string(), "@gauge.png");
        assert_eq!(MediaRef::parse("/vehicles.mp4").to_string(), "/vehicles.mp4");
    }
}
