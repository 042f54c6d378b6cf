//! Physical lengths to device pixels
//!
//! All conversions round half away from zero (`f64::round`). The rounding
//! mode matters: it fixes the final canvas size, and with it whether a
//! printed label matches its nominal physical size.

/// Centimeters per inch.
pub const CM_PER_INCH: f64 = 2.54;

/// Typographic points per inch.
pub const PT_PER_INCH: f64 = 72.0;

/// Converts a length in centimeters to pixels at `dpi`.
///
/// `round(length_cm / 2.54 * dpi)`. Negative or non-finite lengths yield 0.
pub fn cm_to_px(length_cm: f32, dpi: u32) -> u32 {
    round_px(length_cm as f64 / CM_PER_INCH * dpi as f64)
}

/// Converts a point size to pixels at `dpi`.
///
/// `round(size_pt * dpi / 72)`. Negative or non-finite sizes yield 0.
pub fn pt_to_px(size_pt: f32, dpi: u32) -> u32 {
    round_px(size_pt as f64 * dpi as f64 / PT_PER_INCH)
}

/// Pixel density in pixels per meter, as PNG's `pHYs` chunk wants it.
pub fn px_per_meter(dpi: u32) -> u32 {
    round_px(dpi as f64 / (CM_PER_INCH / 100.0))
}

/// Fraction of a pixel extent, rounded the same way as the converters.
pub(crate) fn frac_px(extent: u32, frac: f64) -> u32 {
    round_px(extent as f64 * frac)
}

fn round_px(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.round().min(u32::MAX as f64) as u32
}
