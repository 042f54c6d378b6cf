//! linktag - printable labels for cables and patch links
//!
//! A label is a scannable code symbol next to one or more rounded,
//! color-coded identifier slots. [`LabelRenderer`] runs one render call
//! through its stages:
//!
//! 1. Validate the request against the template
//! 2. Compute the layout plan at the requested dpi
//! 3. Encode the code payload at the planned side
//! 4. Fit each non-blank slot's text into its box
//! 5. Composite everything onto an opaque canvas
//!
//! # Example
//!
//! ```no_run
//! use linktag::prelude::*;
//!
//! let renderer = LabelRenderer::with_defaults();
//! let request = RenderRequest::new(300, 18.0, "2L3/D12-43/AE12-43/48P")
//!     .slot("2L3.1", Color::SLOT);
//! let label = renderer.render(&LabelTemplate::code_with_bar(), &request)?;
//! assert_eq!((label.bitmap.width, label.bitmap.height), (295, 413));
//! # Ok::<(), linktag::error::LabelError>(())
//! ```

use linktag_core::{
    compute_layout,
    error::{LabelError, Result},
    fit::{fit_text, FittedFont, DEFAULT_FLOOR_PX},
    traits::{CodeEncoder, GlyphProvider},
    types::RenderedLabel,
    units::pt_to_px,
    LabelTemplate, RenderRequest,
};
use linktag_render_skia::{PaintText, SkiaCompositor, SlotPaint};

pub use linktag_code_qr as code_qr;
pub use linktag_core::{error, fit, layout, link, template, traits, types, units, Color};
pub use linktag_export as export;
pub use linktag_fontdb as fontdb;
pub use linktag_render_skia as render;
pub use linktag_render_skia::{Border, RenderStyle};

use linktag_code_qr::QrEncoder;
use linktag_fontdb::FontResolver;

/// Common imports for typical usage
pub mod prelude {
    pub use crate::{LabelRenderer, LabelRendererBuilder};
    pub use linktag_core::{
        error::{LabelError, Result},
        link::LinkId,
        types::RenderedLabel,
        Color, LabelTemplate, RenderRequest, SlotSpec,
    };
    pub use linktag_render_skia::{Border, RenderStyle};
}

/// Renders labels with a glyph provider and a code encoder
///
/// Holds no per-call state: `render` may be called concurrently from
/// several threads when `P` and `E` are `Sync`.
#[derive(Debug)]
pub struct LabelRenderer<P, E> {
    provider: P,
    encoder: E,
    compositor: SkiaCompositor,
    style: RenderStyle,
    floor_px: u32,
}

impl LabelRenderer<FontResolver, QrEncoder> {
    /// System fonts, QR codes with the default look.
    pub fn with_defaults() -> Self {
        Self {
            provider: FontResolver::system_default(),
            encoder: QrEncoder::new(),
            compositor: SkiaCompositor::new(),
            style: RenderStyle::default(),
            floor_px: DEFAULT_FLOOR_PX,
        }
    }
}

impl<P, E> LabelRenderer<P, E>
where
    P: GlyphProvider,
    P::Font: PaintText,
    E: CodeEncoder,
{
    pub fn builder() -> LabelRendererBuilder<P, E> {
        LabelRendererBuilder::new()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Renders one label.
    ///
    /// Requests whose slot list does not match the template are rejected
    /// before anything is encoded or drawn.
    pub fn render(
        &self,
        template: &LabelTemplate,
        request: &RenderRequest,
    ) -> Result<RenderedLabel> {
        request.validate(template)?;

        let plan = compute_layout(template, request.dpi)?;

        let code = self.encoder.encode(&request.code_payload, plan.code.side)?;
        log::debug!(
            "code: {} encoded {} payload bytes",
            self.encoder.name(),
            request.code_payload.len()
        );

        let start_px = pt_to_px(request.base_font_size_pt, request.dpi);
        let fitted: Vec<Option<FittedFont<P::Font>>> = request
            .slots
            .iter()
            .zip(&plan.slots)
            .map(|(slot, rect)| {
                slot.label().map(|text| {
                    let area = rect.text_box();
                    let fit = fit_text(
                        &self.provider,
                        text,
                        area.width,
                        area.height,
                        start_px,
                        self.floor_px,
                    );
                    log::debug!(
                        "fit: {:?} -> {}px in {}x{}",
                        text,
                        fit.pixel_size,
                        area.width,
                        area.height
                    );
                    fit
                })
            })
            .collect();

        let paints: Vec<SlotPaint<'_, P::Font>> = request
            .slots
            .iter()
            .zip(&fitted)
            .map(|(slot, fit)| match (slot.label(), fit) {
                (Some(text), Some(fit)) => SlotPaint::with_text(slot.fill, text, &fit.font),
                _ => SlotPaint::blank(slot.fill),
            })
            .collect();

        let bitmap = self.compositor.render(&plan, &code, &paints, &self.style)?;
        let label = RenderedLabel {
            bitmap,
            dpi: request.dpi,
            file_stem: request.file_stem(),
        };

        log::info!(
            "rendered {} label {:?}: {}x{} px at {} dpi",
            template.family.name(),
            label.file_stem,
            label.bitmap.width,
            label.bitmap.height,
            label.dpi
        );
        Ok(label)
    }
}

/// Builder for [`LabelRenderer`]
#[derive(Debug)]
pub struct LabelRendererBuilder<P, E> {
    provider: Option<P>,
    encoder: Option<E>,
    style: RenderStyle,
    floor_px: u32,
}

impl<P, E> LabelRendererBuilder<P, E> {
    pub fn new() -> Self {
        Self {
            provider: None,
            encoder: None,
            style: RenderStyle::default(),
            floor_px: DEFAULT_FLOOR_PX,
        }
    }

    /// Where fonts come from
    pub fn provider(mut self, provider: P) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Who draws the code symbol
    pub fn encoder(mut self, encoder: E) -> Self {
        self.encoder = Some(encoder);
        self
    }

    pub fn style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    /// Smallest text size the fitter may choose
    pub fn floor_px(mut self, floor_px: u32) -> Self {
        self.floor_px = floor_px;
        self
    }

    pub fn build(self) -> Result<LabelRenderer<P, E>> {
        let provider = self
            .provider
            .ok_or_else(|| LabelError::ConfigError("No glyph provider configured".into()))?;
        let encoder = self
            .encoder
            .ok_or_else(|| LabelError::ConfigError("No code encoder configured".into()))?;
        if self.floor_px == 0 {
            return Err(LabelError::ConfigError("floor size must be at least 1px".into()));
        }
        Ok(LabelRenderer {
            provider,
            encoder,
            compositor: SkiaCompositor::new(),
            style: self.style,
            floor_px: self.floor_px,
        })
    }
}

impl<P, E> Default for LabelRendererBuilder<P, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linktag_fontdb::FontResolver;

    #[test]
    fn test_builder_requires_provider_and_encoder() {
        let err = LabelRendererBuilder::<FontResolver, QrEncoder>::new()
            .encoder(QrEncoder::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, LabelError::ConfigError(_)));

        let err = LabelRendererBuilder::<FontResolver, QrEncoder>::new()
            .provider(FontResolver::builtin())
            .build()
            .unwrap_err();
        assert!(matches!(err, LabelError::ConfigError(_)));
    }

    #[test]
    fn test_builder_rejects_zero_floor() {
        let err = LabelRenderer::builder()
            .provider(FontResolver::builtin())
            .encoder(QrEncoder::new())
            .floor_px(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, LabelError::ConfigError(_)));
    }

    #[test]
    fn test_builtin_render_has_reference_size() {
        let renderer = LabelRenderer::builder()
            .provider(FontResolver::builtin())
            .encoder(QrEncoder::new())
            .build()
            .unwrap();
        let request = RenderRequest::new(300, 18.0, "2L3").slot("2L3.1", Color::SLOT);
        let label = renderer
            .render(&LabelTemplate::code_with_bar(), &request)
            .unwrap();
        assert_eq!((label.bitmap.width, label.bitmap.height), (295, 413));
        assert_eq!(label.file_stem, "2L3.1");
    }
}
