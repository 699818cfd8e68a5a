use std::fmt;

use dashmap::DashSet;
use thiserror::Error;

use crate::imaging::{Gravity, ResizeOptions};

/// Why a tier's components could not be turned into [`ResizeOptions`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("size must look like {{width}}x{{height}}, got {0:?}")]
    MalformedSize(String),
    #[error("invalid {axis} {value:?}: expected a positive integer")]
    InvalidDimension { axis: &'static str, value: String },
    #[error("{axis} {value} exceeds the maximum of {max}")]
    DimensionTooLarge {
        axis: &'static str,
        value: u32,
        max: u32,
    },
    #[error("unknown gravity {0:?}")]
    UnknownGravity(String),
}

/// One requested combination of size and gravity, keyed as
/// `"{width}x{height}/{gravity}/"`.
///
/// The key is built from the raw request segments, so a tier exists (and can
/// be registered) even when its components do not parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResizeTier {
    size: String,
    gravity: String,
    key: String,
}

impl ResizeTier {
    /// Build a tier from the `{width}x{height}` and gravity path segments.
    pub fn new(size: impl Into<String>, gravity: impl Into<String>) -> Self {
        let size = size.into();
        let gravity = gravity.into();
        let key = format!("{size}/{gravity}/");
        Self { size, gravity, key }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key of the thumbnail rendered from `path` at this tier.
    pub fn thumbnail_key(&self, path: &str) -> String {
        format!("{}{path}", self.key)
    }

    /// Parse the tier, rejecting either side above `max_dimension` pixels.
    pub fn options(&self, max_dimension: u32) -> Result<ResizeOptions, ParamError> {
        let (width, height) = self
            .size
            .split_once('x')
            .ok_or_else(|| ParamError::MalformedSize(self.size.clone()))?;

        let width = parse_dimension("width", width, max_dimension)?;
        let height = parse_dimension("height", height, max_dimension)?;
        let gravity = self
            .gravity
            .parse::<Gravity>()
            .map_err(|_| ParamError::UnknownGravity(self.gravity.clone()))?;

        Ok(ResizeOptions {
            width,
            height,
            gravity,
        })
    }
}

impl fmt::Display for ResizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

fn parse_dimension(axis: &'static str, value: &str, max: u32) -> Result<u32, ParamError> {
    match value.parse::<u32>() {
        Ok(n) if n > max => Err(ParamError::DimensionTooLarge { axis, value: n, max }),
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParamError::InvalidDimension {
            axis,
            value: value.to_string(),
        }),
    }
}

/// Set of tier keys observed so far; consulted when an original is deleted.
#[derive(Default)]
pub struct TierRegistry {
    tiers: DashSet<String>,
}

impl TierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, tier: &ResizeTier) {
        self.tiers.insert(tier.key().to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.tiers.contains(key)
    }

    /// Snapshot of every tier key seen so far, in no particular order.
    pub fn enumerate(&self) -> Vec<String> {
        self.tiers.iter().map(|t| t.clone()).collect()
    }
}
