use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use resvg::usvg;
use shinydex_core::{compute_stats, AssetRoots, Catalog, CatalogRegion, Config, StateMap};
use shinydex_render::{
    export_png, Capture, CaptureRequest, ExportMetadata, ExportSession, LayoutMetrics, OptionsBar,
    RenderBuffer, RenderError, SnapshotDocument, StatsBar, Surface, SvgCapture, TriggerControl,
    ViewModel,
};

fn write_tile(path: &Path, rgb: [u8; 3]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = png::Encoder::new(file, 2, 2);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().unwrap();
    let [r, g, b] = rgb;
    writer.write_image_data(&[r, g, b, 255].repeat(4)).unwrap();
}

struct Fixture {
    dir: std::path::PathBuf,
    catalog: Catalog,
    state: StateMap,
    assets: AssetRoots,
}

impl Fixture {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        let assets = AssetRoots::new(&dir, "shiny", "normal");
        for id in ["001", "002", "003"] {
            write_tile(&assets.image_path(id, true), [255, 0, 0]);
            write_tile(&assets.image_path(id, false), [0, 0, 255]);
        }
        let catalog = Catalog::new(vec![CatalogRegion {
            name: "Kanto".into(),
            items: vec!["001".into(), "002".into(), "003".into()],
        }]);
        let mut state = StateMap::new();
        state.set("001", 1);
        state.set("002", 4);
        Self {
            dir,
            catalog,
            state,
            assets,
        }
    }

    fn view(&self) -> ViewModel {
        ViewModel::build(&self.catalog, &self.state, Config::default(), &self.assets)
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

fn surface(view: &ViewModel) -> Surface {
    let mut surface = Surface::new(640.0, 120.0);
    surface.scroll_offset = 30.0;
    surface.stats_bar = Some(StatsBar::default());
    surface.options_bar = Some(OptionsBar::default());
    surface.trigger = Some(TriggerControl::new("Save as image"));
    surface.sync_images(view);
    surface
}

fn capture_backend() -> SvgCapture {
    SvgCapture::with_fonts(Arc::new(usvg::fontdb::Database::new()))
}

fn pixel_at(buffer: &RenderBuffer, x: f32, y: f32) -> [u8; 4] {
    buffer.pixel(x as u32, y as u32).expect("pixel inside buffer")
}

#[test]
fn end_to_end_snapshot_export() {
    let fixture = Fixture::new("shinydex_it_export");
    let view = fixture.view();
    let stats = compute_stats(&fixture.catalog, &fixture.state);
    let metrics = LayoutMetrics::default();
    let mut surface = surface(&view);
    let before = surface.clone();

    let session = ExportSession::begin(&mut surface, &view, &metrics, "Generating…");
    let document = SnapshotDocument::from_surface(&view, &stats, &surface, &metrics);
    let layout = session.layout().clone();
    let request = CaptureRequest::new(document);
    let result = capture_backend().capture(&request);
    session.restore(&mut surface);
    assert_eq!(surface, before, "surface restored after capture");

    let buffer = result.expect("capture should succeed");
    assert_eq!(buffer.width, 640);
    assert_eq!(buffer.height, layout.height.ceil() as u32);
    assert!(buffer.height > 120, "full document, not just the viewport");

    let tiles = &layout.cards[0].tiles;
    let centre = |i: usize| (tiles[i].x + tiles[i].width / 2.0, tiles[i].y + tiles[i].height / 2.0);

    let (x, y) = centre(1);
    let [r, g, b, a] = pixel_at(&buffer, x, y);
    assert_eq!(a, 255);
    assert!(r > 200 && g < 40 && b < 40, "obtained tile shows the shiny image");

    let (x, y) = centre(0);
    let [r, g, b, _] = pixel_at(&buffer, x, y);
    assert!(r.abs_diff(g) <= 3 && g.abs_diff(b) <= 3, "single count is desaturated");

    let (x, y) = centre(2);
    let [r, _, b, _] = pixel_at(&buffer, x, y);
    assert!(b > 200 && r < 40, "missing tile shows the normal image");

    let meta = ExportMetadata::new(
        &stats,
        chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        buffer.width,
        buffer.height,
    );
    let path = fixture.dir.join("out.png");
    export_png(&buffer, &path, &meta).expect("export should succeed");
    let mut header = [0u8; 8];
    std::fs::File::open(&path)
        .unwrap()
        .read_exact(&mut header)
        .unwrap();
    assert_eq!(&header, b"\x89PNG\r\n\x1a\n");
}

struct FailingCapture;

impl Capture for FailingCapture {
    fn capture(&self, _request: &CaptureRequest) -> Result<RenderBuffer, RenderError> {
        Err(RenderError::Capture("rasterizer crashed".into()))
    }
}

#[test]
fn failed_capture_still_restores_surface() {
    let fixture = Fixture::new("shinydex_it_failure");
    let view = fixture.view();
    let stats = compute_stats(&fixture.catalog, &fixture.state);
    let metrics = LayoutMetrics::default();
    let mut surface = surface(&view);
    let before = surface.clone();

    let backend: Box<dyn Capture> = Box::new(FailingCapture);
    let session = ExportSession::begin(&mut surface, &view, &metrics, "Generating…");
    let request = CaptureRequest::new(SnapshotDocument::from_surface(
        &view, &stats, &surface, &metrics,
    ));
    let result = backend.capture(&request);
    session.restore(&mut surface);

    assert!(matches!(result, Err(RenderError::Capture(_))));
    assert_eq!(surface, before);
    assert_eq!(surface.trigger.as_ref().unwrap().label, "Save as image");
    assert!(surface.trigger.as_ref().unwrap().enabled);
}

#[test]
fn capture_is_deterministic() {
    let fixture = Fixture::new("shinydex_it_determinism");
    let view = fixture.view();
    let stats = compute_stats(&fixture.catalog, &fixture.state);
    let metrics = LayoutMetrics::default();
    let mut surface = surface(&view);

    let session = ExportSession::begin(&mut surface, &view, &metrics, "busy");
    let request = CaptureRequest::new(SnapshotDocument::from_surface(
        &view, &stats, &surface, &metrics,
    ));
    session.restore(&mut surface);

    let backend = capture_backend();
    let a = backend.capture(&request).expect("first capture");
    let b = backend.capture(&request).expect("second capture");
    assert_eq!(a.pixels, b.pixels, "captures must be deterministic");
}
