//! Serialization of a [`SnapshotDocument`] to a standalone SVG document.
//!
//! Tile images are inlined as base64 data URIs so the result has no
//! external references.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use base64::Engine;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::layout::Rect;
use crate::snapshot::{SnapshotCard, SnapshotDocument, SnapshotStatsBar, SnapshotTile};

const FONT_FAMILY: &str = "sans-serif";
const CARD_FILL: &str = "#262626";
const TILE_FILL: &str = "#333333";
const OBTAINED_STROKE: &str = "#f5c518";
const BADGE_FILL: &str = "#e53935";
const TEXT_FILL: &str = "#ffffff";
const MUTED_TEXT_FILL: &str = "#b0b0b0";

/// Read every image in `paths` in parallel and encode it as a data URI.
///
/// Unreadable files are logged and left out; their tiles render as empty
/// placeholders.
pub fn embed_images(paths: &[PathBuf]) -> HashMap<PathBuf, String> {
    let embedded: HashMap<PathBuf, String> = paths
        .par_iter()
        .filter_map(|path| match std::fs::read(path) {
            Ok(bytes) => Some((path.clone(), data_uri(path, &bytes))),
            Err(e) => {
                warn!("Skipping image {}: {e}", path.display());
                None
            }
        })
        .collect();
    debug!("Embedded {}/{} tile images", embedded.len(), paths.len());
    embedded
}

fn data_uri(path: &Path, bytes: &[u8]) -> String {
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    };
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{encoded}")
}

/// Escape text for use in XML character data and attribute values.
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn hex(color: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Serialize `doc` over a `background` fill. Images are looked up in
/// `images` (see [`embed_images`]).
pub fn to_svg(
    doc: &SnapshotDocument,
    images: &HashMap<PathBuf, String>,
    background: [u8; 3],
) -> String {
    let mut svg = String::with_capacity(4096 + images.values().map(String::len).sum::<usize>());
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = doc.width,
        h = doc.height,
    );
    svg.push_str(concat!(
        "<defs>",
        r#"<filter id="desaturate"><feColorMatrix type="saturate" values="0"/></filter>"#,
        r#"<filter id="soften"><feGaussianBlur stdDeviation="2"/></filter>"#,
        "</defs>",
    ));
    let _ = write!(
        svg,
        r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
        doc.width,
        doc.height,
        hex(background)
    );

    if let Some(bar) = &doc.options_bar {
        write_options_bar(&mut svg, bar);
    }
    for card in &doc.cards {
        write_card(&mut svg, card, doc, images);
    }
    if let Some(bar) = &doc.stats_bar {
        write_stats_bar(&mut svg, bar);
    }

    svg.push_str("</svg>");
    svg
}

fn write_options_bar(svg: &mut String, rect: &Rect) {
    let _ = write!(
        svg,
        r##"<rect x="{}" y="{}" width="{}" height="{}" fill="#202020"/>"##,
        rect.x, rect.y, rect.width, rect.height
    );
    let _ = write!(
        svg,
        r#"<text x="{}" y="{}" font-family="{FONT_FAMILY}" font-size="14" fill="{MUTED_TEXT_FILL}">ShinyDex</text>"#,
        rect.x + 16.0,
        rect.y + rect.height / 2.0 + 5.0,
    );
}

fn write_card(
    svg: &mut String,
    card: &SnapshotCard,
    doc: &SnapshotDocument,
    images: &HashMap<PathBuf, String>,
) {
    let r = card.rect;
    let _ = write!(
        svg,
        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{CARD_FILL}"/>"#,
        r.x, r.y, r.width, r.height, doc.metrics.corner_radius
    );

    let h = card.header;
    let baseline = h.y + h.height / 2.0 + 6.0;
    let _ = write!(
        svg,
        r#"<text x="{}" y="{baseline}" font-family="{FONT_FAMILY}" font-size="18" font-weight="bold" fill="{TEXT_FILL}">{}</text>"#,
        h.x,
        xml_escape(&card.title),
    );
    let _ = write!(
        svg,
        r#"<text x="{}" y="{baseline}" text-anchor="end" font-family="{FONT_FAMILY}" font-size="15" fill="{MUTED_TEXT_FILL}">{}</text>"#,
        h.right(),
        xml_escape(&card.progress),
    );

    for tile in &card.tiles {
        write_tile(svg, tile, doc, images);
    }
}

fn write_tile(
    svg: &mut String,
    tile: &SnapshotTile,
    doc: &SnapshotDocument,
    images: &HashMap<PathBuf, String>,
) {
    let t = tile.rect;
    let radius = doc.metrics.corner_radius / 2.0;
    let _ = write!(
        svg,
        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{radius}" fill="{TILE_FILL}"/>"#,
        t.x, t.y, t.width, t.height
    );

    if let Some(uri) = tile.image.as_ref().and_then(|p| images.get(p)) {
        let filter = if tile.desaturated {
            r#" filter="url(#desaturate)""#
        } else {
            ""
        };
        let _ = write!(
            svg,
            r#"<image x="{}" y="{}" width="{}" height="{}" href="{uri}"{filter}/>"#,
            t.x, t.y, t.width, t.height
        );
    }

    if tile.obtained {
        let _ = write!(
            svg,
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{radius}" fill="none" stroke="{OBTAINED_STROKE}" stroke-width="2"/>"#,
            t.x + 1.0,
            t.y + 1.0,
            t.width - 2.0,
            t.height - 2.0
        );
    }

    if let Some(count) = tile.badge {
        let br = doc.metrics.badge_radius;
        let cx = t.right() - br;
        let cy = t.y + br;
        let _ = write!(
            svg,
            r#"<circle cx="{cx}" cy="{cy}" r="{br}" fill="{BADGE_FILL}"/>"#
        );
        let _ = write!(
            svg,
            r#"<text x="{cx}" y="{}" text-anchor="middle" font-family="{FONT_FAMILY}" font-size="12" font-weight="bold" fill="{TEXT_FILL}">{count}</text>"#,
            cy + 4.0
        );
    }
}

fn write_stats_bar(svg: &mut String, bar: &SnapshotStatsBar) {
    let r = bar.rect;
    let filter = if bar.blur {
        r#" filter="url(#soften)""#
    } else {
        ""
    };
    let _ = write!(
        svg,
        r##"<rect x="{}" y="{}" width="{}" height="{}" fill="#141414" fill-opacity="0.92"{filter}/>"##,
        r.x, r.y, r.width, r.height
    );

    if bar.entries.is_empty() {
        return;
    }
    let slot = r.width / bar.entries.len() as f32;
    let baseline = r.y + r.height / 2.0 + 6.0;
    for (i, text) in bar.entries.iter().enumerate() {
        let cx = r.x + slot * (i as f32 + 0.5);
        let _ = write!(
            svg,
            r#"<text x="{cx}" y="{baseline}" text-anchor="middle" font-family="{FONT_FAMILY}" font-size="16" fill="{TEXT_FILL}">{}</text>"#,
            xml_escape(text),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutMetrics;

    fn document(tile: SnapshotTile) -> SnapshotDocument {
        SnapshotDocument {
            width: 200.0,
            height: 300.0,
            metrics: LayoutMetrics::default(),
            options_bar: None,
            cards: vec![SnapshotCard {
                rect: Rect::new(16.0, 16.0, 168.0, 200.0),
                header: Rect::new(28.0, 28.0, 144.0, 36.0),
                title: "Kanto & <Johto>".into(),
                progress: "1 / 1".into(),
                tiles: vec![tile],
            }],
            stats_bar: Some(SnapshotStatsBar {
                rect: Rect::new(0.0, 248.0, 200.0, 52.0),
                blur: false,
                entries: vec!["Total: 1 / 1".into()],
            }),
        }
    }

    fn tile(image: Option<PathBuf>, desaturated: bool) -> SnapshotTile {
        SnapshotTile {
            rect: Rect::new(28.0, 64.0, 88.0, 88.0),
            image,
            badge: Some(2),
            obtained: true,
            desaturated,
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            xml_escape(r#"a<b>&"c'"#),
            "a&lt;b&gt;&amp;&quot;c&apos;"
        );
        assert_eq!(xml_escape("plain"), "plain");
    }

    #[test]
    fn svg_contains_text_badge_and_background() {
        let svg = to_svg(&document(tile(None, false)), &HashMap::new(), [0x1a, 0x1a, 0x1a]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r##"fill="#1a1a1a""##));
        assert!(svg.contains("Kanto &amp; &lt;Johto&gt;"));
        assert!(svg.contains(">2</text>"));
        assert!(svg.contains("Total: 1 / 1"));
        assert!(!svg.contains("<image"), "unloaded image is not embedded");
    }

    #[test]
    fn desaturated_image_uses_filter() {
        let path = PathBuf::from("shiny/tile_001.png");
        let mut images = HashMap::new();
        images.insert(path.clone(), "data:image/png;base64,AAAA".to_string());

        let svg = to_svg(&document(tile(Some(path.clone()), true)), &images, [0, 0, 0]);
        assert!(svg.contains(r#"href="data:image/png;base64,AAAA" filter="url(#desaturate)""#));

        let svg = to_svg(&document(tile(Some(path), false)), &images, [0, 0, 0]);
        assert!(svg.contains(r#"href="data:image/png;base64,AAAA"/>"#));
    }

    #[test]
    fn embed_skips_missing_files() {
        let dir = std::env::temp_dir().join("shinydex_test_embed");
        let _ = std::fs::create_dir_all(&dir);
        let present = dir.join("tile_001.png");
        std::fs::write(&present, [1u8, 2, 3]).expect("write fixture");
        let missing = dir.join("tile_999.png");

        let images = embed_images(&[present.clone(), missing.clone()]);
        assert_eq!(images.len(), 1);
        assert_eq!(images[&present], "data:image/png;base64,AQID");
        assert!(!images.contains_key(&missing));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
