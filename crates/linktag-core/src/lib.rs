//! Linktag Core: from a label template to pixel geometry
//!
//! This crate holds everything about a label that can be decided without
//! touching a font file or a pixel buffer: physical units, templates, the
//! render request, the layout engine and the text fitter.
//!
//! ## How a label is built
//!
//! 1. **Units** - centimeters and points become pixels at the print density
//! 2. **Layout** - the template turns into a [`LayoutPlan`]: canvas size,
//!    code square and slot rectangles
//! 3. **Fitting** - every non-blank slot gets the largest font that fits its
//!    text box ([`fit::fit_text`])
//! 4. **Compositing** and **Export** - done by backend crates through the
//!    traits in [`traits`]
//!
//! ```rust
//! use linktag_core::{layout::compute_layout, LabelTemplate};
//!
//! let plan = compute_layout(&LabelTemplate::code_with_bar(), 300)?;
//! assert_eq!((plan.canvas_width, plan.canvas_height), (295, 413));
//! # Ok::<(), linktag_core::LabelError>(())
//! ```

pub mod error;
pub mod fit;
pub mod layout;
pub mod link;
pub mod request;
pub mod template;
pub mod traits;
pub mod units;

pub use error::{LabelError, Result};
pub use fit::{fit_text, FittedFont, DEFAULT_FLOOR_PX};
pub use layout::{compute_layout, CodeRect, LayoutPlan, SlotRect};
pub use request::{RenderRequest, SlotSpec};
pub use template::{LabelTemplate, Orientation, TemplateFamily, REFERENCE_SLOTS, SUPPORTED_DPI};
pub use traits::{CodeEncoder, Exporter, GlyphProvider, TextMeasure};

/// The data structures passed between stages
pub mod types {
    /// Ink bounding box of a measured string, in pixels
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct TextExtent {
        pub width: f32,
        pub height: f32,
    }

    impl TextExtent {
        pub const fn new(width: f32, height: f32) -> Self {
            Self { width, height }
        }

        /// Whether the extent fits a box of `max_width` × `max_height`.
        pub fn fits(&self, max_width: u32, max_height: u32) -> bool {
            self.width <= max_width as f32 && self.height <= max_height as f32
        }
    }

    /// Raw pixel data
    #[derive(Debug, Clone, PartialEq)]
    pub struct BitmapData {
        pub width: u32,
        pub height: u32,
        pub format: BitmapFormat,
        pub data: Vec<u8>,
    }

    impl BitmapData {
        /// Byte length the buffer must have for its size and format.
        pub fn expected_len(&self) -> usize {
            self.width as usize * self.height as usize * self.format.bytes_per_pixel()
        }
    }

    /// How pixels are arranged in the bitmap
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum BitmapFormat {
        Rgba8,
        Rgb8,
        Gray8,
    }

    impl BitmapFormat {
        pub const fn bytes_per_pixel(&self) -> usize {
            match self {
                Self::Rgba8 => 4,
                Self::Rgb8 => 3,
                Self::Gray8 => 1,
            }
        }
    }

    /// A finished label: opaque pixels plus their declared density
    #[derive(Debug, Clone)]
    pub struct RenderedLabel {
        pub bitmap: BitmapData,
        pub dpi: u32,
        /// Suggested file name without extension
        pub file_stem: String,
    }
}

/// Simple RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Dark ink used for slot text.
    pub const INK: Color = Color::rgb(0x11, 0x11, 0x11);
    /// Neutral fill for slots without text.
    pub const PLACEHOLDER: Color = Color::rgb(0xd9, 0xd9, 0xd9);
    /// Default slot fill.
    pub const SLOT: Color = Color::rgb(0xef, 0x2f, 0x68);
    /// Dark modules of the code symbol.
    pub const CODE_DARK: Color = Color::rgb(0x4a, 0x4a, 0x4a);
    /// Outer border stroke.
    pub const BORDER: Color = Color::rgb(0x1f, 0x1f, 0x1f);

    /// Parses `RRGGBB` or `RRGGBBAA`, with or without a leading `#`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || LabelError::InvalidColor(hex.to_string());
        if !digits.is_ascii() || !(digits.len() == 6 || digits.len() == 8) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}
