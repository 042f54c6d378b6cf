//! Text fitting: the largest font that fits a box
//!
//! The search walks sizes downward one pixel at a time and stops at the
//! first size whose measured ink box fits both dimensions. A linear walk is
//! used on purpose: hinting can make metrics non-monotonic, and every
//! accepted size has then been checked against both width and height.
//!
//! Labels are single-line. Text that still overflows at the floor size is
//! drawn at the floor size anyway; there is no wrapping or truncation.

use crate::{
    traits::{GlyphProvider, TextMeasure},
    types::TextExtent,
};

/// Smallest pixel size the fitter will go down to by default.
pub const DEFAULT_FLOOR_PX: u32 = 8;

/// A font chosen for exactly one (text, box) pair
#[derive(Debug, Clone)]
pub struct FittedFont<F> {
    pub font: F,
    /// The size the search settled on
    pub pixel_size: u32,
    /// Measured extent of the text at that size
    pub extent: TextExtent,
    /// True when even the floor size did not fit
    pub overflows: bool,
}

/// Finds the largest size in `floor_px..=start_px` at which `text` fits
/// `max_width` × `max_height`.
///
/// Sizes are tried in strictly descending order, each at most once, so the
/// search takes at most `start_px - floor_px + 1` steps. A `start_px` below
/// the floor is raised to the floor. `text` must not be blank; blank slots
/// are skipped by the caller.
pub fn fit_text<P>(
    provider: &P,
    text: &str,
    max_width: u32,
    max_height: u32,
    start_px: u32,
    floor_px: u32,
) -> FittedFont<P::Font>
where
    P: GlyphProvider + ?Sized,
{
    let floor_px = floor_px.max(1);
    let mut size = start_px.max(floor_px);

    loop {
        let font = provider.resolve_font(size);
        let extent = font.measure(text);
        let fits = extent.fits(max_width, max_height);

        if fits || size == floor_px {
            if !fits {
                log::debug!(
                    "fit: {:?} overflows {}x{} even at floor {}px ({:.1}x{:.1})",
                    text,
                    max_width,
                    max_height,
                    size,
                    extent.width,
                    extent.height
                );
            }
            return FittedFont {
                font,
                pixel_size: size,
                extent,
                overflows: !fits,
            };
        }

        size -= 1;
    }
}
