//! Where label fonts come from
//!
//! A [`FontResolver`] holds an ordered list of font candidates. Candidates
//! are read once, when the resolver is built; the ones that parse are kept in
//! order, and the first of them answers every size request. When none parse,
//! the resolver falls back to a built-in bitmap font that only exists at one
//! size. That is a degradation, never an error: callers always get a font.
//!
//! ```rust
//! use linktag_core::traits::{GlyphProvider, TextMeasure};
//! use linktag_fontdb::FontResolver;
//!
//! let resolver = FontResolver::builtin();
//! let font = resolver.resolve_font(48);
//! // the built-in face ignores the requested size
//! assert_eq!(font.pixel_size(), 20);
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use linktag_core::traits::GlyphProvider;
use read_fonts::{FontRef as ReadFontRef, TableProvider};
use thiserror::Error;

mod handle;

pub use handle::{FontHandle, TextOutline, BUILTIN_FONT};

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid font data in {0}")]
    InvalidData(String),
}

/// Where a candidate font lives
#[derive(Clone)]
pub enum FontSource {
    Path(PathBuf),
    Bytes { name: String, data: Arc<[u8]> },
}

impl FontSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn bytes(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes {
            name: name.into(),
            data: data.into(),
        }
    }

    fn load(&self) -> Result<Font, FontLoadError> {
        match self {
            Self::Path(path) => Font::from_file(path),
            Self::Bytes { name, data } => Font::from_data(name.clone(), data.to_vec()),
        }
    }
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Bytes { name, .. } => write!(f, "<memory:{name}>"),
        }
    }
}

impl fmt::Debug for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FontSource({self})")
    }
}

/// Candidates tried by [`FontResolver::system_default`], in order.
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "DejaVuSans.ttf",
    "arial.ttf",
];

/// A parsed outline font kept in memory
pub struct Font {
    name: String,
    data: Vec<u8>,
    face_index: u32,
    units_per_em: u16,
}

impl Font {
    /// Reads and validates a font file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FontLoadError> {
        let path = path.as_ref();
        let data =
            fs::read(path).map_err(|_| FontLoadError::FileNotFound(path.display().to_string()))?;
        Self::from_data(path.display().to_string(), data)
    }

    /// Validates raw font bytes
    pub fn from_data(name: impl Into<String>, data: Vec<u8>) -> Result<Self, FontLoadError> {
        let name = name.into();
        let units_per_em = {
            let font_ref =
                ReadFontRef::from_index(&data, 0).map_err(|_| FontLoadError::InvalidData(name.clone()))?;
            font_ref
                .head()
                .map(|head| head.units_per_em())
                .map_err(|_| FontLoadError::InvalidData(name.clone()))?
        };

        Ok(Font {
            name,
            data,
            face_index: 0,
            units_per_em,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Parsed view for skrifa; validated on construction
    pub(crate) fn font_ref(&self) -> Option<skrifa::FontRef<'_>> {
        skrifa::FontRef::from_index(&self.data, self.face_index).ok()
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("name", &self.name)
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

/// Ordered font fallback
#[derive(Debug, Clone, Default)]
pub struct FontResolver {
    fonts: Vec<Arc<Font>>,
    rejected: Vec<String>,
}

impl FontResolver {
    /// Loads every candidate in order, keeping the ones that parse.
    pub fn new(candidates: impl IntoIterator<Item = FontSource>) -> Self {
        let mut resolver = Self::default();
        for source in candidates {
            resolver.push(&source);
        }
        if resolver.fonts.is_empty() {
            log::warn!("no font candidate could be loaded, using the built-in bitmap font");
        }
        resolver
    }

    /// The usual system font locations.
    pub fn system_default() -> Self {
        Self::new(SYSTEM_FONT_CANDIDATES.iter().map(|path| FontSource::path(*path)))
    }

    /// A preferred font ahead of the system list.
    pub fn with_preferred(preferred: FontSource) -> Self {
        Self::new(
            std::iter::once(preferred)
                .chain(SYSTEM_FONT_CANDIDATES.iter().map(|path| FontSource::path(*path))),
        )
    }

    /// No candidates: always answers with the built-in font.
    pub fn builtin() -> Self {
        Self::default()
    }

    fn push(&mut self, source: &FontSource) {
        match source.load() {
            Ok(font) => {
                log::debug!("font candidate {} loaded (upem {})", source, font.units_per_em());
                self.fonts.push(Arc::new(font));
            },
            Err(e) => {
                log::debug!("font candidate skipped: {}", e);
                self.rejected.push(source.to_string());
            },
        }
    }

    /// Fonts that loaded, in preference order.
    pub fn fonts(&self) -> &[Arc<Font>] {
        &self.fonts
    }

    /// Candidates that failed to load.
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    /// Whether requests will be answered by the built-in font.
    pub fn is_builtin(&self) -> bool {
        self.fonts.is_empty()
    }
}

impl GlyphProvider for FontResolver {
    type Font = FontHandle;

    fn resolve_font(&self, pixel_size: u32) -> FontHandle {
        match self.fonts.first() {
            Some(font) => FontHandle::Outline {
                font: Arc::clone(font),
                size: pixel_size.max(1),
            },
            None => FontHandle::Builtin {
                font: &BUILTIN_FONT,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linktag_core::traits::TextMeasure;

    #[test]
    fn test_garbage_bytes_rejected() {
        let result = Font::from_data("zeros", vec![0; 100]);
        assert!(matches!(result, Err(FontLoadError::InvalidData(_))));
    }

    #[test]
    fn test_missing_file_rejected() {
        let result = Font::from_file("/nonexistent/linktag/none.ttf");
        assert!(matches!(result, Err(FontLoadError::FileNotFound(_))));
    }

    #[test]
    fn test_all_candidates_failing_falls_back_to_builtin() {
        let resolver = FontResolver::new([
            FontSource::path("/nonexistent/a.ttf"),
            FontSource::bytes("junk", vec![1u8, 2, 3]),
        ]);
        assert!(resolver.is_builtin());
        assert_eq!(resolver.rejected().len(), 2);

        let font = resolver.resolve_font(64);
        assert!(matches!(font, FontHandle::Builtin { .. }));
        assert_eq!(font.pixel_size(), BUILTIN_FONT.character_size.height);
    }

    #[test]
    fn test_source_display() {
        assert_eq!(FontSource::path("/x/y.ttf").to_string(), "/x/y.ttf");
        assert_eq!(FontSource::bytes("mem", vec![0u8]).to_string(), "<memory:mem>");
    }
}
