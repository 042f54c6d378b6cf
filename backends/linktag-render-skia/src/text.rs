//! Drawing fitted text onto the canvas

use embedded_graphics::{
    geometry::{OriginDimensions, Point},
    mono_font::MonoTextStyle,
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, Drawable},
    text::{Baseline, Text},
    Pixel,
};
use linktag_core::{
    error::{RenderError, Result},
    traits::TextMeasure,
    Color,
};
use linktag_fontdb::FontHandle;
use tiny_skia::{FillRule, Paint, Pixmap, Rect, Transform};

use crate::{kurbo_to_skia, solid_paint};

/// A font that can put a single line of text on a pixmap
pub trait PaintText {
    /// Draws `text` so its box is centered on `center`.
    fn paint_text(
        &self,
        text: &str,
        center: (f32, f32),
        ink: Color,
        canvas: &mut Pixmap,
    ) -> Result<()>;
}

impl PaintText for FontHandle {
    fn paint_text(
        &self,
        text: &str,
        center: (f32, f32),
        ink: Color,
        canvas: &mut Pixmap,
    ) -> Result<()> {
        match self {
            FontHandle::Outline { font, .. } => {
                let outline = self.outline(text).ok_or_else(|| {
                    RenderError::BackendError(format!("font {} has no readable outlines", font.name()))
                })?;
                let b = outline.bounds;
                if b.width() <= 0.0 || b.height() <= 0.0 {
                    return Ok(());
                }
                let Some(path) = kurbo_to_skia(outline.path.elements().iter().copied()) else {
                    return Ok(());
                };
                // ink box centered, not the advance box
                let tx = center.0 - ((b.x0 + b.x1) / 2.0) as f32;
                let ty = center.1 - ((b.y0 + b.y1) / 2.0) as f32;
                canvas.fill_path(
                    &path,
                    &solid_paint(ink),
                    FillRule::Winding,
                    Transform::from_translate(tx, ty),
                    None,
                );
                Ok(())
            },
            FontHandle::Builtin { font } => {
                let extent = self.measure(text);
                let origin = Point::new(
                    (center.0 - extent.width / 2.0).round() as i32,
                    (center.1 - extent.height / 2.0).round() as i32,
                );
                let style = MonoTextStyle::new(*font, BinaryColor::On);
                let mut target = PixmapTarget::new(canvas, ink);
                if let Err(never) =
                    Text::with_baseline(text, origin, style, Baseline::Top).draw(&mut target)
                {
                    match never {}
                }
                Ok(())
            },
        }
    }
}

/// embedded-graphics view of a pixmap that paints lit pixels in one color
struct PixmapTarget<'a> {
    canvas: &'a mut Pixmap,
    paint: Paint<'static>,
}

impl<'a> PixmapTarget<'a> {
    fn new(canvas: &'a mut Pixmap, ink: Color) -> Self {
        let mut paint = solid_paint(ink);
        paint.anti_alias = false;
        Self { canvas, paint }
    }
}

impl OriginDimensions for PixmapTarget<'_> {
    fn size(&self) -> embedded_graphics::geometry::Size {
        embedded_graphics::geometry::Size::new(self.canvas.width(), self.canvas.height())
    }
}

impl DrawTarget for PixmapTarget<'_> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (w, h) = (self.canvas.width() as i32, self.canvas.height() as i32);
        for Pixel(point, color) in pixels {
            if color.is_off() || point.x < 0 || point.y < 0 || point.x >= w || point.y >= h {
                continue;
            }
            if let Some(rect) = Rect::from_xywh(point.x as f32, point.y as f32, 1.0, 1.0) {
                self.canvas
                    .fill_rect(rect, &self.paint, Transform::identity(), None);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linktag_fontdb::BUILTIN_FONT;

    fn count_ink(canvas: &Pixmap) -> usize {
        canvas
            .pixels()
            .iter()
            .filter(|p| p.red() == 0 && p.green() == 0 && p.blue() == 0 && p.alpha() == 255)
            .count()
    }

    #[test]
    fn test_builtin_text_lands_inside_its_box() {
        let mut canvas = Pixmap::new(200, 60).unwrap();
        canvas.fill(tiny_skia::Color::WHITE);
        let font = FontHandle::Builtin {
            font: &BUILTIN_FONT,
        };
        font.paint_text("2L3", (100.0, 30.0), Color::rgb(0, 0, 0), &mut canvas)
            .unwrap();

        let extent = font.measure("2L3");
        let (x0, y0) = (100 - (extent.width / 2.0) as u32, 30 - (extent.height / 2.0) as u32);
        let (x1, y1) = (x0 + extent.width as u32, y0 + extent.height as u32);
        let mut inside = 0;
        for (i, p) in canvas.pixels().iter().enumerate() {
            if p.red() != 0 {
                continue;
            }
            let (x, y) = (i as u32 % 200, i as u32 / 200);
            assert!(x >= x0 && x <= x1 && y >= y0 && y <= y1, "ink at {x},{y}");
            inside += 1;
        }
        assert!(inside > 0);
    }

    #[test]
    fn test_builtin_text_clips_at_canvas_edge() {
        let mut canvas = Pixmap::new(10, 10).unwrap();
        canvas.fill(tiny_skia::Color::WHITE);
        let font = FontHandle::Builtin {
            font: &BUILTIN_FONT,
        };
        font.paint_text("WWWW", (0.0, 0.0), Color::rgb(0, 0, 0), &mut canvas)
            .unwrap();
        assert!(count_ink(&canvas) <= 100);
    }

    #[test]
    fn test_empty_text_draws_nothing() {
        let mut canvas = Pixmap::new(20, 20).unwrap();
        canvas.fill(tiny_skia::Color::WHITE);
        let font = FontHandle::Builtin {
            font: &BUILTIN_FONT,
        };
        font.paint_text("", (10.0, 10.0), Color::rgb(0, 0, 0), &mut canvas)
            .unwrap();
        assert_eq!(count_ink(&canvas), 0);
    }
}
