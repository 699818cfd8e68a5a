//! Image transform capability: resizing and type sniffing.
//!
//! The pipeline only talks to [`ImageTransformer`]; [`RustTransformer`] is the
//! production implementation built on the `image` crate.

mod rust_backend;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use rust_backend::RustTransformer;

/// MIME type reported when the buffer is not a recognised image.
pub const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("unsupported image data: {0}")]
    Unsupported(String),
    #[error("requested {width}x{height} render exceeds the pixel budget")]
    TooLarge { width: u32, height: u32 },
    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Which part of the source survives when the aspect ratio has to be cropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gravity {
    Center,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Gravity {
    pub const ALL: [Gravity; 9] = [
        Gravity::Center,
        Gravity::North,
        Gravity::NorthEast,
        Gravity::East,
        Gravity::SouthEast,
        Gravity::South,
        Gravity::SouthWest,
        Gravity::West,
        Gravity::NorthWest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Gravity::Center => "center",
            Gravity::North => "north",
            Gravity::NorthEast => "northeast",
            Gravity::East => "east",
            Gravity::SouthEast => "southeast",
            Gravity::South => "south",
            Gravity::SouthWest => "southwest",
            Gravity::West => "west",
            Gravity::NorthWest => "northwest",
        }
    }

    /// Top-left corner of a `crop_w` x `crop_h` window anchored inside a
    /// `width` x `height` image.
    pub fn anchor(self, width: u32, height: u32, crop_w: u32, crop_h: u32) -> (u32, u32) {
        let max_x = width.saturating_sub(crop_w);
        let max_y = height.saturating_sub(crop_h);
        let (mid_x, mid_y) = (max_x / 2, max_y / 2);
        match self {
            Gravity::Center => (mid_x, mid_y),
            Gravity::North => (mid_x, 0),
            Gravity::NorthEast => (max_x, 0),
            Gravity::East => (max_x, mid_y),
            Gravity::SouthEast => (max_x, max_y),
            Gravity::South => (mid_x, max_y),
            Gravity::SouthWest => (0, max_y),
            Gravity::West => (0, mid_y),
            Gravity::NorthWest => (0, 0),
        }
    }
}

impl FromStr for Gravity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gravity::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("unknown gravity: {s}"))
    }
}

impl fmt::Display for Gravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target box for a thumbnail render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeOptions {
    pub width: u32,
    pub height: u32,
    pub gravity: Gravity,
}

/// Pixel work the resolution pipeline delegates.
///
/// Both operations are synchronous and may be CPU heavy; async callers run
/// them on the blocking pool.
pub trait ImageTransformer: Send + Sync {
    /// Render `source` to exactly `options.width` x `options.height`.
    fn resize(&self, source: &[u8], options: &ResizeOptions) -> Result<Vec<u8>, TransformError>;

    /// Sniff the MIME type of `buf`, falling back to [`FALLBACK_MIME`].
    fn determine_type(&self, buf: &[u8]) -> &'static str;
}
