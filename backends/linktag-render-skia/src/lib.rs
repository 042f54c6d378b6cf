//! Skia compositor - paints a layout plan with tiny-skia
//!
//! Paint order is fixed: opaque background, optional outer border, the code
//! bitmap (alpha-blended), then every slot in order as a rounded rectangle
//! with its text centered on top. Blank slots get the placeholder fill and
//! no text at all.
//!
//! The compositor keeps no state between calls; one instance can serve any
//! number of threads.

use kurbo::{PathEl, RoundedRect, Shape};
use linktag_core::{
    error::{LabelError, RenderError, Result},
    layout::{LayoutPlan, SlotRect},
    types::{BitmapData, BitmapFormat},
    Color,
};
use tiny_skia::{
    FillRule, IntSize, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

mod text;

pub use text::PaintText;
pub use tiny_skia;

/// Largest canvas side we agree to allocate
const MAX_CANVAS_SIDE: u32 = 32_768;

/// Outer frame drawn along the canvas edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub color: Color,
    pub width_px: u32,
}

/// Colors that are not per-slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub background: Color,
    /// Text color, dark against slot fills
    pub ink: Color,
    /// Fill for slots without text
    pub placeholder: Color,
    pub border: Option<Border>,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Color::white(),
            ink: Color::INK,
            placeholder: Color::PLACEHOLDER,
            border: None,
        }
    }
}

/// Text to draw in a slot and the font fitted for it
#[derive(Debug, Clone, Copy)]
pub struct TextPaint<'a, F> {
    pub text: &'a str,
    pub font: &'a F,
}

/// What to paint in one slot
#[derive(Debug, Clone, Copy)]
pub struct SlotPaint<'a, F> {
    pub fill: Color,
    /// `None` for a blank slot
    pub text: Option<TextPaint<'a, F>>,
}

impl<'a, F> SlotPaint<'a, F> {
    pub fn blank(fill: Color) -> Self {
        Self { fill, text: None }
    }

    pub fn with_text(fill: Color, text: &'a str, font: &'a F) -> Self {
        Self {
            fill,
            text: Some(TextPaint { text, font }),
        }
    }
}

/// tiny-skia powered label compositor
#[derive(Debug, Clone, Copy, Default)]
pub struct SkiaCompositor;

impl SkiaCompositor {
    pub fn new() -> Self {
        Self
    }

    pub fn name(&self) -> &'static str {
        "skia"
    }

    /// Paints `plan` and returns an opaque RGB8 canvas.
    pub fn render<F: PaintText>(
        &self,
        plan: &LayoutPlan,
        code: &BitmapData,
        slots: &[SlotPaint<'_, F>],
        style: &RenderStyle,
    ) -> Result<BitmapData> {
        let (width, height) = (plan.canvas_width, plan.canvas_height);
        if width == 0 || height == 0 || width > MAX_CANVAS_SIDE || height > MAX_CANVAS_SIDE {
            return Err(RenderError::InvalidDimensions { width, height }.into());
        }
        if slots.len() != plan.slots.len() {
            return Err(LabelError::SlotCountMismatch {
                expected: plan.slots.len(),
                actual: slots.len(),
            });
        }

        let mut canvas = Pixmap::new(width, height).ok_or(RenderError::PixmapCreationFailed)?;

        // Background is always opaque
        let bg = style.background;
        canvas.fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, 255));

        if let Some(border) = style.border {
            draw_border(&mut canvas, border);
        }

        draw_code(&mut canvas, plan, code)?;

        for (rect, slot) in plan.slots.iter().zip(slots) {
            match &slot.text {
                Some(text) => {
                    fill_rounded(&mut canvas, rect, slot.fill);
                    let center = (
                        (rect.x0 + rect.x1) as f32 / 2.0,
                        (rect.y0 + rect.y1) as f32 / 2.0,
                    );
                    text.font.paint_text(text.text, center, style.ink, &mut canvas)?;
                },
                None => fill_rounded(&mut canvas, rect, style.placeholder),
            }
        }

        log::debug!(
            "skia: composited {}x{} canvas with {} slot(s)",
            width,
            height,
            slots.len()
        );

        Ok(to_rgb8(&canvas))
    }
}

/// Paint with anti-aliasing in a solid color
pub(crate) fn solid_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint {
        anti_alias: true,
        ..Default::default()
    };
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint
}

fn draw_border(canvas: &mut Pixmap, border: Border) {
    if border.width_px == 0 {
        return;
    }
    let half = border.width_px as f32 / 2.0;
    let Some(rect) = Rect::from_ltrb(
        half,
        half,
        canvas.width() as f32 - half,
        canvas.height() as f32 - half,
    ) else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    let stroke = Stroke {
        width: border.width_px as f32,
        ..Default::default()
    };
    canvas.stroke_path(
        &path,
        &solid_paint(border.color),
        &stroke,
        Transform::identity(),
        None,
    );
}

fn draw_code(canvas: &mut Pixmap, plan: &LayoutPlan, code: &BitmapData) -> Result<()> {
    let side = plan.code.side;
    if code.width != side || code.height != side {
        return Err(RenderError::CodeSizeMismatch {
            expected: side,
            width: code.width,
            height: code.height,
        }
        .into());
    }
    if side == 0 {
        return Ok(());
    }
    let code_pixmap = premultiplied_pixmap(code)?;
    canvas.draw_pixmap(
        plan.code.x as i32,
        plan.code.y as i32,
        code_pixmap.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
    Ok(())
}

/// Straight RGBA (or gray) bitmap into a premultiplied pixmap
fn premultiplied_pixmap(bitmap: &BitmapData) -> Result<Pixmap> {
    if bitmap.data.len() < bitmap.expected_len() {
        return Err(RenderError::BackendError(format!(
            "code bitmap buffer too small: {} < {}",
            bitmap.data.len(),
            bitmap.expected_len()
        ))
        .into());
    }
    let mut data = Vec::with_capacity(bitmap.width as usize * bitmap.height as usize * 4);
    match bitmap.format {
        BitmapFormat::Rgba8 => {
            for px in bitmap.data.chunks_exact(4) {
                let a = px[3] as u32;
                let scale = |c: u8| ((c as u32 * a + 127) / 255) as u8;
                data.extend_from_slice(&[scale(px[0]), scale(px[1]), scale(px[2]), a as u8]);
            }
        },
        BitmapFormat::Rgb8 => {
            for px in bitmap.data.chunks_exact(3) {
                data.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
        },
        BitmapFormat::Gray8 => {
            for &g in &bitmap.data {
                data.extend_from_slice(&[g, g, g, 255]);
            }
        },
    }
    let size = IntSize::from_wh(bitmap.width, bitmap.height).ok_or(
        RenderError::InvalidDimensions {
            width: bitmap.width,
            height: bitmap.height,
        },
    )?;
    Pixmap::from_vec(data, size).ok_or_else(|| RenderError::PixmapCreationFailed.into())
}

fn fill_rounded(canvas: &mut Pixmap, rect: &SlotRect, color: Color) {
    let (w, h) = (rect.width() as f64, rect.height() as f64);
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let radius = (rect.radius as f64).min(w / 2.0).min(h / 2.0);
    let shape = RoundedRect::new(
        rect.x0 as f64,
        rect.y0 as f64,
        rect.x1 as f64,
        rect.y1 as f64,
        radius,
    );
    if let Some(path) = kurbo_to_skia(shape.path_elements(0.1)) {
        canvas.fill_path(
            &path,
            &solid_paint(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }
}

/// Translate kurbo's path format into tiny-skia's native format
pub(crate) fn kurbo_to_skia(elements: impl IntoIterator<Item = PathEl>) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for element in elements {
        match element {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(ctrl, end) => {
                builder.quad_to(ctrl.x as f32, ctrl.y as f32, end.x as f32, end.y as f32)
            },
            PathEl::CurveTo(c1, c2, end) => builder.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                end.x as f32,
                end.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

/// Drop alpha from an opaque premultiplied canvas
fn to_rgb8(canvas: &Pixmap) -> BitmapData {
    let mut data = Vec::with_capacity(canvas.width() as usize * canvas.height() as usize * 3);
    for px in canvas.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue()]);
    }
    BitmapData {
        width: canvas.width(),
        height: canvas.height(),
        format: BitmapFormat::Rgb8,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linktag_core::{compute_layout, LabelTemplate};
    use std::cell::Cell;

    /// Records paint calls instead of drawing glyphs
    #[derive(Default)]
    struct CountingText {
        calls: Cell<usize>,
    }

    impl PaintText for CountingText {
        fn paint_text(
            &self,
            _text: &str,
            _center: (f32, f32),
            _ink: Color,
            _canvas: &mut Pixmap,
        ) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            Ok(())
        }
    }

    fn rgb_at(bitmap: &BitmapData, x: u32, y: u32) -> [u8; 3] {
        let i = ((y * bitmap.width + x) * 3) as usize;
        [bitmap.data[i], bitmap.data[i + 1], bitmap.data[i + 2]]
    }

    fn solid_code(side: u32, color: Color) -> BitmapData {
        BitmapData {
            width: side,
            height: side,
            format: BitmapFormat::Rgba8,
            data: [color.r, color.g, color.b, color.a].repeat((side * side) as usize),
        }
    }

    #[test]
    fn test_paints_background_code_and_slots() {
        let plan = compute_layout(&LabelTemplate::code_with_stack(3).unwrap(), 150).unwrap();
        let code = solid_code(plan.code.side, Color::rgb(0, 0, 0));
        let font = CountingText::default();
        let slots = [
            SlotPaint::with_text(Color::SLOT, "2L3.1", &font),
            SlotPaint::blank(Color::SLOT),
            SlotPaint::with_text(Color::rgb(0, 0, 255), "2L3.3", &font),
        ];
        let out = SkiaCompositor::new()
            .render(&plan, &code, &slots, &RenderStyle::default())
            .unwrap();

        assert_eq!((out.width, out.height), (plan.canvas_width, plan.canvas_height));
        assert_eq!(out.format, BitmapFormat::Rgb8);
        assert_eq!(out.data.len(), out.expected_len());

        // corner is background
        assert_eq!(rgb_at(&out, 0, 0), [255, 255, 255]);
        // code center is code color
        let c = plan.code;
        assert_eq!(rgb_at(&out, c.x + c.side / 2, c.y + c.side / 2), [0, 0, 0]);

        let center = |r: &SlotRect| ((r.x0 + r.x1) / 2, (r.y0 + r.y1) / 2);
        let (x, y) = center(&plan.slots[0]);
        assert_eq!(rgb_at(&out, x, y), [0xef, 0x2f, 0x68]);
        let (x, y) = center(&plan.slots[1]);
        assert_eq!(rgb_at(&out, x, y), [0xd9, 0xd9, 0xd9]);
        let (x, y) = center(&plan.slots[2]);
        assert_eq!(rgb_at(&out, x, y), [0, 0, 255]);

        // blank slot issued no text call
        assert_eq!(font.calls.get(), 2);
    }

    #[test]
    fn test_transparent_code_pixels_show_background() {
        let plan = compute_layout(&LabelTemplate::code_with_bar(), 150).unwrap();
        let code = solid_code(plan.code.side, Color::rgba(0, 0, 0, 0));
        let font = CountingText::default();
        let slots: [SlotPaint<'_, CountingText>; 1] = [SlotPaint::blank(Color::SLOT)];
        let out = SkiaCompositor::new()
            .render(&plan, &code, &slots, &RenderStyle::default())
            .unwrap();
        let c = plan.code;
        assert_eq!(rgb_at(&out, c.x + 1, c.y + 1), [255, 255, 255]);
        assert_eq!(font.calls.get(), 0);
    }

    #[test]
    fn test_border_is_drawn_along_edges() {
        let plan = compute_layout(&LabelTemplate::code_with_bar(), 150).unwrap();
        let code = solid_code(plan.code.side, Color::white());
        let style = RenderStyle {
            border: Some(Border {
                color: Color::rgb(255, 0, 0),
                width_px: 4,
            }),
            ..Default::default()
        };
        let slots: [SlotPaint<'_, CountingText>; 1] = [SlotPaint::blank(Color::SLOT)];
        let out = SkiaCompositor::new().render(&plan, &code, &slots, &style).unwrap();
        assert_eq!(rgb_at(&out, 1, out.height / 2), [255, 0, 0]);
        assert_eq!(rgb_at(&out, out.width - 2, out.height / 2), [255, 0, 0]);
    }

    #[test]
    fn test_code_size_mismatch_rejected() {
        let plan = compute_layout(&LabelTemplate::code_with_bar(), 150).unwrap();
        let code = solid_code(plan.code.side + 1, Color::rgb(0, 0, 0));
        let slots: [SlotPaint<'_, CountingText>; 1] = [SlotPaint::blank(Color::SLOT)];
        let err = SkiaCompositor::new()
            .render(&plan, &code, &slots, &RenderStyle::default())
            .unwrap_err();
        assert!(matches!(
            err,
            LabelError::RenderingFailed(RenderError::CodeSizeMismatch { .. })
        ));
    }

    #[test]
    fn test_slot_list_must_match_plan() {
        let plan = compute_layout(&LabelTemplate::code_with_stack(3).unwrap(), 150).unwrap();
        let code = solid_code(plan.code.side, Color::rgb(0, 0, 0));
        let slots: [SlotPaint<'_, CountingText>; 2] =
            [SlotPaint::blank(Color::SLOT), SlotPaint::blank(Color::SLOT)];
        let err = SkiaCompositor::new()
            .render(&plan, &code, &slots, &RenderStyle::default())
            .unwrap_err();
        assert!(matches!(err, LabelError::SlotCountMismatch { expected: 3, actual: 2 }));
    }

    #[test]
    fn test_background_forced_opaque() {
        let plan = compute_layout(&LabelTemplate::code_with_bar(), 150).unwrap();
        let code = solid_code(plan.code.side, Color::white());
        let style = RenderStyle {
            background: Color::rgba(10, 20, 30, 0),
            ..Default::default()
        };
        let slots: [SlotPaint<'_, CountingText>; 1] = [SlotPaint::blank(Color::SLOT)];
        let out = SkiaCompositor::new().render(&plan, &code, &slots, &style).unwrap();
        assert_eq!(rgb_at(&out, 0, 0), [10, 20, 30]);
    }

    #[test]
    fn test_premultiply_rounds_to_nearest() {
        let bitmap = BitmapData {
            width: 2,
            height: 1,
            format: BitmapFormat::Rgba8,
            data: vec![1, 3, 255, 128, 200, 10, 0, 255],
        };
        let pixmap = premultiplied_pixmap(&bitmap).unwrap();
        let half = pixmap.pixels()[0];
        // 1 * 128 / 255 = 0.50, 3 * 128 / 255 = 1.51
        assert_eq!((half.red(), half.green(), half.blue(), half.alpha()), (1, 2, 128, 128));
        let opaque = pixmap.pixels()[1];
        assert_eq!((opaque.red(), opaque.green(), opaque.blue()), (200, 10, 0));
    }
}
