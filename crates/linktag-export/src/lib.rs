//! Turning finished labels into files
//!
//! PNG is the only output format. Every file declares its pixel density in
//! a `pHYs` chunk so that printing at 100 % reproduces the physical size.

use std::{
    fs,
    path::{Path, PathBuf},
};

use linktag_core::{
    error::{ExportError, Result},
    traits::Exporter,
    types::{BitmapData, BitmapFormat, RenderedLabel},
    units::px_per_meter,
};

/// Encodes `bitmap` as an 8-bit PNG with `dpi` recorded in `pHYs`.
pub fn encode_png(bitmap: &BitmapData, dpi: u32) -> Result<Vec<u8>> {
    let expected = bitmap.expected_len();
    if bitmap.data.len() < expected {
        return Err(ExportError::EncodingFailed(format!(
            "Buffer too small: expected {} bytes for {}x{} {:?}, got {}",
            expected,
            bitmap.width,
            bitmap.height,
            bitmap.format,
            bitmap.data.len()
        ))
        .into());
    }
    if bitmap.width == 0 || bitmap.height == 0 {
        return Err(ExportError::EncodingFailed(format!(
            "cannot encode an empty {}x{} image",
            bitmap.width, bitmap.height
        ))
        .into());
    }

    let color = match bitmap.format {
        BitmapFormat::Rgba8 => png::ColorType::Rgba,
        BitmapFormat::Rgb8 => png::ColorType::Rgb,
        BitmapFormat::Gray8 => png::ColorType::Grayscale,
    };

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, bitmap.width, bitmap.height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        if dpi > 0 {
            let ppm = px_per_meter(dpi);
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));
        }
        let mut writer = encoder
            .write_header()
            .map_err(|err| ExportError::EncodingFailed(format!("PNG encoder error: {err}")))?;
        writer
            .write_image_data(&bitmap.data[..expected])
            .map_err(|err| ExportError::EncodingFailed(format!("PNG write error: {err}")))?;
    }
    Ok(png_data)
}

/// PNG exporter for rendered labels
#[derive(Debug, Clone, Copy, Default)]
pub struct PngExporter;

impl PngExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for PngExporter {
    fn name(&self) -> &'static str {
        "png"
    }

    fn export(&self, label: &RenderedLabel) -> Result<Vec<u8>> {
        encode_png(&label.bitmap, label.dpi)
    }

    fn extension(&self) -> &'static str {
        "png"
    }

    fn mime_type(&self) -> &'static str {
        "image/png"
    }
}

/// Writes `label` as `<dir>/<file_stem>.png` and returns the path.
pub fn write_label(label: &RenderedLabel, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{}.png", label.file_stem));
    write_label_to(label, &path)?;
    Ok(path)
}

/// Writes `label` as PNG to exactly `path`.
pub fn write_label_to(label: &RenderedLabel, path: &Path) -> Result<()> {
    let bytes = PngExporter.export(label)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            ExportError::WriteFailed(format!("cannot create {}: {e}", parent.display()))
        })?;
    }
    fs::write(path, &bytes)
        .map_err(|e| ExportError::WriteFailed(format!("{}: {e}", path.display())))?;
    log::debug!("export: wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
