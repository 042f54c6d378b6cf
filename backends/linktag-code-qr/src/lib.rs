//! QR backend - payload in, square bitmap out
//!
//! The symbol itself comes from the `qrcode` crate. This backend only adds
//! the quiet zone, colors the modules and scales the result to the exact
//! side the layout asked for, sampling nearest-neighbor so module edges
//! stay hard.

use linktag_core::{
    error::{LabelError, Result},
    traits::CodeEncoder,
    types::{BitmapData, BitmapFormat},
    Color,
};
use qrcode::{EcLevel, QrCode};

/// Error correction, as users name it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCorrection {
    Low,
    Medium,
    Quartile,
    High,
}

impl ErrorCorrection {
    fn ec_level(self) -> EcLevel {
        match self {
            Self::Low => EcLevel::L,
            Self::Medium => EcLevel::M,
            Self::Quartile => EcLevel::Q,
            Self::High => EcLevel::H,
        }
    }
}

/// QR encoder with label-friendly defaults
#[derive(Debug, Clone)]
pub struct QrEncoder {
    pub error_correction: ErrorCorrection,
    /// Light modules around the symbol, per side
    pub quiet_zone: u32,
    pub dark: Color,
    pub light: Color,
}

impl QrEncoder {
    /// Medium error correction, two-module quiet zone, grey on white.
    pub fn new() -> Self {
        Self {
            error_correction: ErrorCorrection::Medium,
            quiet_zone: 2,
            dark: Color::CODE_DARK,
            light: Color::white(),
        }
    }

    pub fn error_correction(mut self, level: ErrorCorrection) -> Self {
        self.error_correction = level;
        self
    }

    pub fn quiet_zone(mut self, modules: u32) -> Self {
        self.quiet_zone = modules;
        self
    }

    pub fn colors(mut self, dark: Color, light: Color) -> Self {
        self.dark = dark;
        self.light = light;
        self
    }

    /// Module grid including the quiet zone, row-major, `true` = dark.
    fn modules(&self, payload: &str) -> Result<(u32, Vec<bool>)> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), self.error_correction.ec_level())
            .map_err(|e| LabelError::Code(format!("QR encode error: {e}")))?;
        let symbol = code.width() as u32;
        let colors = code.to_colors();
        let grid = symbol + 2 * self.quiet_zone;

        let mut modules = vec![false; (grid * grid) as usize];
        for (i, color) in colors.iter().enumerate() {
            if *color == qrcode::Color::Dark {
                let x = i as u32 % symbol + self.quiet_zone;
                let y = i as u32 / symbol + self.quiet_zone;
                modules[(y * grid + x) as usize] = true;
            }
        }
        Ok((grid, modules))
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeEncoder for QrEncoder {
    fn name(&self) -> &'static str {
        "qr"
    }

    fn encode(&self, payload: &str, side_px: u32) -> Result<BitmapData> {
        let (grid, modules) = self.modules(payload)?;
        if side_px < grid {
            log::warn!(
                "QR: {} modules squeezed into {}px; the code will not scan",
                grid,
                side_px
            );
        }

        let side = side_px as usize;
        let mut data = Vec::with_capacity(side * side * 4);
        for py in 0..side_px {
            let my = (py as u64 * grid as u64 / side_px as u64) as u32;
            for px in 0..side_px {
                let mx = (px as u64 * grid as u64 / side_px as u64) as u32;
                let c = if modules[(my * grid + mx) as usize] {
                    self.dark
                } else {
                    self.light
                };
                data.extend_from_slice(&[c.r, c.g, c.b, c.a]);
            }
        }

        log::debug!("QR: {} modules → {}px for {} payload bytes", grid, side_px, payload.len());

        Ok(BitmapData {
            width: side_px,
            height: side_px,
            format: BitmapFormat::Rgba8,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(bitmap: &BitmapData, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * bitmap.width + x) * 4) as usize;
        [bitmap.data[i], bitmap.data[i + 1], bitmap.data[i + 2], bitmap.data[i + 3]]
    }

    #[test]
    fn test_encoder_name() {
        assert_eq!(QrEncoder::new().name(), "qr");
    }

    #[test]
    fn test_output_is_exact_square() {
        let encoder = QrEncoder::new();
        for side in [21, 100, 237, 355, 711] {
            let bitmap = encoder.encode("2L3/D12-43/AE12-43/48P", side).unwrap();
            assert_eq!((bitmap.width, bitmap.height), (side, side));
            assert_eq!(bitmap.data.len(), bitmap.expected_len());
        }
    }

    #[test]
    fn test_quiet_zone_is_light_and_finder_is_dark() {
        let encoder = QrEncoder::new();
        let (grid, _) = encoder.modules("2L3").unwrap();
        // 10 px per module
        let side = grid * 10;
        let bitmap = encoder.encode("2L3", side).unwrap();
        let white = [255, 255, 255, 255];
        let dark = [0x4a, 0x4a, 0x4a, 255];
        assert_eq!(pixel(&bitmap, 0, 0), white);
        assert_eq!(pixel(&bitmap, 15, 15), white);
        // top-left finder pattern starts right after the quiet zone
        assert_eq!(pixel(&bitmap, 25, 25), dark);
    }

    #[test]
    fn test_multiline_payload_encodes() {
        let bitmap = QrEncoder::new().encode("rack D12\nunit 43", 120).unwrap();
        assert_eq!(bitmap.width, 120);
    }

    #[test]
    fn test_oversized_payload_is_an_error() {
        let payload = "x".repeat(8000);
        let err = QrEncoder::new().encode(&payload, 300).unwrap_err();
        assert!(matches!(err, LabelError::Code(_)));
    }

    #[test]
    fn test_custom_colors() {
        let encoder = QrEncoder::new()
            .quiet_zone(0)
            .colors(Color::rgb(0, 0, 0), Color::rgba(0, 0, 0, 0));
        let (grid, _) = encoder.modules("A").unwrap();
        let bitmap = encoder.encode("A", grid).unwrap();
        // finder corner is dark without a quiet zone
        assert_eq!(pixel(&bitmap, 0, 0), [0, 0, 0, 255]);
    }
}
