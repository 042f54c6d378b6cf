//! The seams between the core and its backends
//!
//! - [`TextMeasure`] - a font resolved at one pixel size that can measure text
//! - [`GlyphProvider`] - hands out fonts for a requested pixel size
//! - [`CodeEncoder`] - turns a payload into a square code bitmap
//! - [`Exporter`] - turns a finished label into file bytes

use crate::{
    error::Result,
    types::{BitmapData, RenderedLabel, TextExtent},
};

/// A font bound to one pixel size
pub trait TextMeasure {
    /// The size this font actually renders at.
    ///
    /// Fallback fonts may not honor the size they were requested at.
    fn pixel_size(&self) -> u32;

    /// Ink bounding box of `text` set on a single line.
    fn measure(&self, text: &str) -> TextExtent;
}

/// Resolves fonts by pixel size
///
/// Resolution never fails: when no preferred font is available the provider
/// returns a built-in fallback, possibly at an approximate size.
pub trait GlyphProvider {
    type Font: TextMeasure;

    fn resolve_font(&self, pixel_size: u32) -> Self::Font;
}

impl<P: GlyphProvider + ?Sized> GlyphProvider for &P {
    type Font = P::Font;

    fn resolve_font(&self, pixel_size: u32) -> Self::Font {
        (**self).resolve_font(pixel_size)
    }
}

/// Encodes a payload into a scannable square bitmap
pub trait CodeEncoder: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns an RGBA bitmap exactly `side_px` wide and tall.
    fn encode(&self, payload: &str, side_px: u32) -> Result<BitmapData>;
}

/// Where labels become files
pub trait Exporter: Send + Sync {
    fn name(&self) -> &'static str;

    fn export(&self, label: &RenderedLabel) -> Result<Vec<u8>>;

    fn extension(&self) -> &'static str;

    fn mime_type(&self) -> &'static str;
}
