pub mod buffer;
pub mod capture;
pub mod error;
pub mod export;
pub mod layout;
pub mod patch;
pub mod snapshot;
pub mod svg;
pub mod view;

pub use buffer::RenderBuffer;
pub use capture::{Capture, CaptureRequest, SvgCapture};
pub use error::RenderError;
pub use export::{export_png, snapshot_file_name, unique_path, ExportMetadata};
pub use layout::{DocumentLayout, LayoutMetrics, Rect};
pub use patch::{diff, TilePatch};
pub use snapshot::{
    BarStyle, Display, ExportSession, Loading, OptionsBar, Placement, SnapshotDocument, StatsBar,
    Surface, TriggerControl,
};
pub use view::{RegionView, TileView, ViewModel};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
