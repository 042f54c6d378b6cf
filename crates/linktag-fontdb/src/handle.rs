//! Fonts resolved at a pixel size

use std::sync::Arc;

use embedded_graphics::mono_font::{ascii::FONT_10X20, MonoFont};
use kurbo::{BezPath, Rect, Shape};
use linktag_core::{traits::TextMeasure, types::TextExtent};
use skrifa::{
    instance::{LocationRef, Size},
    outline::{DrawSettings, OutlinePen},
    GlyphId, MetadataProvider,
};

use crate::Font;

/// Bitmap face used when no outline font could be loaded. Exists at one size only.
pub static BUILTIN_FONT: MonoFont<'static> = FONT_10X20;

/// A font at one pixel size
#[derive(Clone)]
pub enum FontHandle {
    /// Scalable outline font at `size` pixels per em
    Outline { font: Arc<Font>, size: u32 },
    /// Built-in bitmap font; its size is fixed
    Builtin { font: &'static MonoFont<'static> },
}

/// A laid-out single line of outline text
///
/// Coordinates are y-down with the origin on the baseline at the pen start.
#[derive(Debug, Clone)]
pub struct TextOutline {
    pub path: BezPath,
    /// Ink bounds of `path`; zero-sized when nothing has ink
    pub bounds: Rect,
}

impl FontHandle {
    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin { .. })
    }

    /// Lays `text` out on one line and collects the glyph outlines.
    ///
    /// Returns `None` for built-in fonts, which have no outlines.
    pub fn outline(&self, text: &str) -> Option<TextOutline> {
        let Self::Outline { font, size } = self else {
            return None;
        };
        let font_ref = font.font_ref()?;
        let size = Size::new(*size as f32);
        let location = LocationRef::default();
        let charmap = font_ref.charmap();
        let metrics = font_ref.glyph_metrics(size, location);
        let outlines = font_ref.outline_glyphs();

        let mut path = BezPath::new();
        let mut pen_x = 0.0f32;
        for ch in text.chars() {
            let glyph_id = charmap.map(ch).unwrap_or(GlyphId::new(0));
            if let Some(glyph) = outlines.get(glyph_id) {
                let mut pen = PathPen {
                    path: &mut path,
                    offset_x: pen_x as f64,
                };
                if glyph
                    .draw(DrawSettings::unhinted(size, location), &mut pen)
                    .is_err()
                {
                    log::debug!("outline for {:?} (glyph {}) could not be drawn", ch, glyph_id.to_u32());
                }
            }
            pen_x += metrics.advance_width(glyph_id).unwrap_or(0.0);
        }

        let bounds = if path.elements().is_empty() {
            Rect::ZERO
        } else {
            path.bounding_box()
        };
        Some(TextOutline { path, bounds })
    }

    /// Character-cell box of `text` in the built-in font.
    fn builtin_extent(font: &MonoFont<'_>, text: &str) -> TextExtent {
        let count = text.chars().count() as u32;
        if count == 0 {
            return TextExtent::default();
        }
        let width = count * font.character_size.width + (count - 1) * font.character_spacing;
        TextExtent::new(width as f32, font.character_size.height as f32)
    }
}

impl TextMeasure for FontHandle {
    fn pixel_size(&self) -> u32 {
        match self {
            Self::Outline { size, .. } => *size,
            Self::Builtin { font } => font.character_size.height,
        }
    }

    fn measure(&self, text: &str) -> TextExtent {
        match self {
            Self::Outline { .. } => self
                .outline(text)
                .map(|outline| {
                    TextExtent::new(outline.bounds.width() as f32, outline.bounds.height() as f32)
                })
                .unwrap_or_default(),
            Self::Builtin { font } => Self::builtin_extent(font, text),
        }
    }
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outline { font, size } => write!(f, "Outline({}, {}px)", font.name(), size),
            Self::Builtin { font } => write!(
                f,
                "Builtin({}x{})",
                font.character_size.width, font.character_size.height
            ),
        }
    }
}

/// Bridge between skrifa's outline commands and kurbo's path format
///
/// Flips y so the path is y-down and shifts by the pen position.
struct PathPen<'a> {
    path: &'a mut BezPath,
    offset_x: f64,
}

impl PathPen<'_> {
    fn point(&self, x: f32, y: f32) -> (f64, f64) {
        (x as f64 + self.offset_x, -(y as f64))
    }
}

impl OutlinePen for PathPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let (c, p) = (self.point(cx0, cy0), self.point(x, y));
        self.path.quad_to(c, p);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let (c0, c1, p) = (self.point(cx0, cy0), self.point(cx1, cy1), self.point(x, y));
        self.path.curve_to(c0, c1, p);
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}
