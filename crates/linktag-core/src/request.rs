//! What the caller asks to print

use crate::{
    error::{LabelError, Result},
    template::LabelTemplate,
    Color,
};

/// File stem used when no slot carries text.
pub const FALLBACK_FILE_STEM: &str = "label";

/// One identifier slot: its text and its fill color
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSpec {
    pub text: String,
    pub fill: Color,
}

impl SlotSpec {
    pub fn new(text: impl Into<String>, fill: Color) -> Self {
        Self {
            text: text.into(),
            fill,
        }
    }

    /// An unconfigured slot, drawn with the placeholder fill and no text.
    pub fn blank() -> Self {
        Self::new("", Color::PLACEHOLDER)
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// The text as it will be drawn, or `None` for a blank slot.
    pub fn label(&self) -> Option<&str> {
        let text = self.text.trim();
        (!text.is_empty()).then_some(text)
    }
}

/// One render call's input
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub dpi: u32,
    pub base_font_size_pt: f32,
    pub code_payload: String,
    pub slots: Vec<SlotSpec>,
}

impl RenderRequest {
    pub fn new(dpi: u32, base_font_size_pt: f32, code_payload: impl Into<String>) -> Self {
        Self {
            dpi,
            base_font_size_pt,
            code_payload: code_payload.into(),
            slots: Vec::new(),
        }
    }

    pub fn slot(mut self, text: impl Into<String>, fill: Color) -> Self {
        self.slots.push(SlotSpec::new(text, fill));
        self
    }

    pub fn slots(mut self, slots: impl IntoIterator<Item = SlotSpec>) -> Self {
        self.slots.extend(slots);
        self
    }

    /// Rejects requests the template cannot honor.
    ///
    /// A slot list of the wrong length is refused outright rather than
    /// truncated or padded.
    pub fn validate(&self, template: &LabelTemplate) -> Result<()> {
        template.check()?;
        if self.dpi == 0 {
            return Err(LabelError::InvalidRequest("dpi must be positive".into()));
        }
        if !(self.base_font_size_pt.is_finite() && self.base_font_size_pt > 0.0) {
            return Err(LabelError::InvalidRequest(format!(
                "font size must be a positive number, got {}",
                self.base_font_size_pt
            )));
        }
        if self.slots.len() != template.slot_count {
            return Err(LabelError::SlotCountMismatch {
                expected: template.slot_count,
                actual: self.slots.len(),
            });
        }
        Ok(())
    }

    /// File stem from the first non-blank slot, or [`FALLBACK_FILE_STEM`].
    pub fn file_stem(&self) -> String {
        self.slots
            .iter()
            .find_map(SlotSpec::label)
            .map(sanitize_file_stem)
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| FALLBACK_FILE_STEM.to_string())
    }
}

/// Replaces anything outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_file_stem(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
