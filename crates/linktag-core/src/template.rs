//! Label form factors
//!
//! A template fixes the physical size of a label and how many identifier
//! slots it carries. Two families exist: a portrait label with the code on
//! top of a single pill-shaped bar, and a landscape label with the code on
//! the left of a stack of slots.

use crate::error::{LabelError, LayoutError, Result};

/// Largest slot count any template supports.
///
/// Stacked layouts always size their rows against this many slots so that a
/// label with fewer slots keeps the same per-slot height.
pub const REFERENCE_SLOTS: usize = 6;

/// Print densities offered to users.
pub const SUPPORTED_DPI: [u32; 4] = [150, 200, 300, 600];

/// Which layout rules apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateFamily {
    /// Portrait: code square above one rounded bar
    CodeWithBar,
    /// Landscape: code square flush left, slots stacked on the right
    CodeWithStack,
}

impl TemplateFamily {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CodeWithBar => "code-with-bar",
            Self::CodeWithStack => "code-with-stack",
        }
    }

    /// Inclusive range of slot counts the family can lay out.
    pub fn slot_range(&self) -> (usize, usize) {
        match self {
            Self::CodeWithBar => (1, 1),
            Self::CodeWithStack => (1, REFERENCE_SLOTS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// A physical label form factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelTemplate {
    pub family: TemplateFamily,
    pub width_cm: f32,
    pub height_cm: f32,
    pub slot_count: usize,
}

impl LabelTemplate {
    /// 2.5 × 3.5 cm portrait label with a single bar.
    pub const fn code_with_bar() -> Self {
        Self {
            family: TemplateFamily::CodeWithBar,
            width_cm: 2.5,
            height_cm: 3.5,
            slot_count: 1,
        }
    }

    /// 5.0 × 3.5 cm landscape label with `slots` stacked identifiers.
    pub fn code_with_stack(slots: usize) -> Result<Self> {
        let template = Self {
            family: TemplateFamily::CodeWithStack,
            width_cm: 5.0,
            height_cm: 3.5,
            slot_count: slots,
        };
        template.check()?;
        Ok(template)
    }

    /// Named presets, in display order.
    pub fn presets() -> Vec<(&'static str, LabelTemplate)> {
        let stacked = |slots| Self {
            family: TemplateFamily::CodeWithStack,
            width_cm: 5.0,
            height_cm: 3.5,
            slot_count: slots,
        };
        vec![
            ("bar", Self::code_with_bar()),
            ("stack-3", stacked(3)),
            ("stack-6", stacked(6)),
        ]
    }

    /// Looks up a preset by name.
    ///
    /// `stack-N` is accepted for any N the stacked family supports.
    pub fn by_name(name: &str) -> Result<Self> {
        let key = name.trim().to_ascii_lowercase();
        if let Some((_, template)) = Self::presets().into_iter().find(|(n, _)| *n == key) {
            return Ok(template);
        }
        if let Some(count) = key.strip_prefix("stack-") {
            let slots = count
                .parse::<usize>()
                .map_err(|_| LabelError::UnknownTemplate(name.to_string()))?;
            return Self::code_with_stack(slots);
        }
        Err(LabelError::UnknownTemplate(name.to_string()))
    }

    pub fn orientation(&self) -> Orientation {
        if self.height_cm >= self.width_cm {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    /// Verifies the slot count against the family's supported range.
    pub fn check(&self) -> Result<()> {
        let (min, max) = self.family.slot_range();
        if self.slot_count < min || self.slot_count > max {
            return Err(LayoutError::UnsupportedSlotCount {
                family: self.family.name(),
                count: self.slot_count,
                min,
                max,
            }
            .into());
        }
        if !(self.width_cm > 0.0 && self.height_cm > 0.0) {
            return Err(LayoutError::Degenerate(format!(
                "physical size {}x{} cm",
                self.width_cm, self.height_cm
            ))
            .into());
        }
        Ok(())
    }
}
