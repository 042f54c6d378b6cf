//! Error types for linktag

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LabelError>;

/// Main error type for linktag
#[derive(Debug, Error)]
pub enum LabelError {
    #[error("Slot count mismatch: template expects {expected} slots, request has {actual}")]
    SlotCountMismatch { expected: usize, actual: usize },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Code generation failed: {0}")]
    Code(String),

    #[error("Rendering failed: {0}")]
    RenderingFailed(#[from] RenderError),

    #[error("Export failed: {0}")]
    ExportFailed(#[from] ExportError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Template and geometry errors
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Unsupported slot count {count} for {family} (allowed {min}..={max})")]
    UnsupportedSlotCount {
        family: &'static str,
        count: usize,
        min: usize,
        max: usize,
    },

    #[error("Invalid dpi: {0}")]
    InvalidDpi(u32),

    #[error("Degenerate geometry: {0}")]
    Degenerate(String),
}

/// Compositing errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Code bitmap does not match its slot: expected {expected}px, got {width}x{height}")]
    CodeSizeMismatch {
        expected: u32,
        width: u32,
        height: u32,
    },

    #[error("Pixmap creation failed")]
    PixmapCreationFailed,

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),
}
