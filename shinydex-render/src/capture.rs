//! Rasterization of a snapshot document into a pixel buffer.

use std::sync::{Arc, OnceLock};

use resvg::usvg;
use tracing::{debug, info};

use crate::buffer::RenderBuffer;
use crate::error::RenderError;
use crate::snapshot::SnapshotDocument;
use crate::svg;

/// Fill color behind the captured document.
pub const DEFAULT_BACKGROUND: [u8; 3] = [0x1a, 0x1a, 0x1a];

/// Largest edge a capture may have, in pixels.
pub const MAX_DIMENSION: u32 = 16_384;

/// One capture job: the frozen document and what to paint behind it.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    pub document: SnapshotDocument,
    pub background: [u8; 3],
}

impl CaptureRequest {
    pub fn new(document: SnapshotDocument) -> Self {
        Self {
            document,
            background: DEFAULT_BACKGROUND,
        }
    }

    pub fn width(&self) -> u32 {
        self.document.width.ceil().max(0.0) as u32
    }

    /// Full scroll height of the document, not just the visible viewport.
    pub fn height(&self) -> u32 {
        self.document.height.ceil().max(0.0) as u32
    }
}

/// A backend that turns a snapshot document into pixels.
pub trait Capture: Send + Sync {
    fn capture(&self, request: &CaptureRequest) -> Result<RenderBuffer, RenderError>;
}

fn system_fonts() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            info!("Loaded {} font faces for snapshot capture", db.len());
            Arc::new(db)
        })
        .clone()
}

/// Serializes the document to SVG and rasterizes it with resvg.
#[derive(Clone, Default)]
pub struct SvgCapture {
    /// `None` uses the system fonts, scanned on first capture.
    fontdb: Option<Arc<usvg::fontdb::Database>>,
}

impl SvgCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend with an explicit font set.
    pub fn with_fonts(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self {
            fontdb: Some(fontdb),
        }
    }
}

impl Capture for SvgCapture {
    fn capture(&self, request: &CaptureRequest) -> Result<RenderBuffer, RenderError> {
        let (width, height) = (request.width(), request.height());
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RenderError::InvalidDimensions { width, height });
        }

        let images = svg::embed_images(&request.document.image_paths());
        let markup = svg::to_svg(&request.document, &images, request.background);

        let options = usvg::Options {
            fontdb: self.fontdb.clone().unwrap_or_else(system_fonts),
            ..usvg::Options::default()
        };
        let tree =
            usvg::Tree::from_str(&markup, &options).map_err(|e| RenderError::Svg(e.to_string()))?;

        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or(RenderError::InvalidDimensions { width, height })?;
        let [r, g, b] = request.background;
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, 255));
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        debug!("Captured snapshot {width}x{height}");
        // Opaque background, so premultiplied and straight alpha coincide.
        Ok(RenderBuffer {
            width,
            height,
            pixels: pixmap.take(),
        })
    }
}
