//! Types for representing camera and screen resolutions.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, Context};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Resolution (`width x height`) of a camera frame or display.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    /// 1080p resolution: `1920x1080`
    pub const RES_1080P: Self = Self {
        width: 1920,
        height: 1080,
    };

    /// VGA resolution: `640x480`
    ///
    /// The default capture resolution of most webcams, and the one the pointer control defaults
    /// are tuned for.
    pub const RES_VGA: Self = Self {
        width: 640,
        height: 480,
    };

    /// Creates a new [`Resolution`] of `width x height`.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the width of this [`Resolution`].
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of this [`Resolution`].
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Parses resolutions written as `WIDTHxHEIGHT`, eg. `1920x1080`.
impl FromStr for Resolution {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split('x')
            .map(str::trim)
            .collect_tuple()
            .ok_or_else(|| anyhow!("invalid resolution '{s}', expected WIDTHxHEIGHT"))?;
        let width = w
            .parse()
            .with_context(|| format!("invalid width in resolution '{s}'"))?;
        let height = h
            .parse()
            .with_context(|| format!("invalid height in resolution '{s}'"))?;
        Ok(Self { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            "1920x1080".parse::<Resolution>().unwrap(),
            Resolution::RES_1080P
        );
        assert_eq!(
            " 640 x 480 ".parse::<Resolution>().unwrap(),
            Resolution::RES_VGA
        );
        assert!("1920".parse::<Resolution>().is_err());
        assert!("1920x1080x3".parse::<Resolution>().is_err());
        assert!("axb".parse::<Resolution>().is_err());
        assert!("-1x5".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Resolution::new(1280, 720).to_string(), "1280x720");
        assert_eq!(format!("{:?}", Resolution::RES_VGA), "640x480");
    }

    #[test]
    fn test_empty() {
        assert!(Resolution::new(0, 10).is_empty());
        assert!(Resolution::new(10, 0).is_empty());
        assert!(!Resolution::RES_VGA.is_empty());
    }
}
