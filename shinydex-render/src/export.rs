//! PNG export of a captured snapshot, with progress metadata in tEXt chunks.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use shinydex_core::Stats;
use tracing::debug;

use crate::buffer::RenderBuffer;
use crate::error::RenderError;

/// Progress figures embedded in an exported PNG.
#[derive(Debug, Clone)]
pub struct ExportMetadata {
    pub obtained: usize,
    pub total: usize,
    pub percentage: u32,
    pub shiny_count: u64,
    pub date: NaiveDate,
    pub width: u32,
    pub height: u32,
}

impl ExportMetadata {
    pub fn new(stats: &Stats, date: NaiveDate, width: u32, height: u32) -> Self {
        Self {
            obtained: stats.obtained,
            total: stats.total,
            percentage: stats.percentage,
            shiny_count: stats.sum_of_counts,
            date,
            width,
            height,
        }
    }
}

/// Write `buffer` to `path` as an RGBA PNG carrying `metadata`.
pub fn export_png(
    buffer: &RenderBuffer,
    path: &Path,
    metadata: &ExportMetadata,
) -> Result<(), RenderError> {
    let file = std::fs::File::create(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), "ShinyDex".to_string())?;
    encoder.add_text_chunk("Description".to_string(), build_description(metadata))?;
    for (key, value) in build_metadata_pairs(metadata) {
        encoder.add_text_chunk(key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.pixels)?;
    png_writer.finish()?;

    debug!(
        "Exported PNG {}x{} to {}",
        buffer.width,
        buffer.height,
        path.display()
    );
    Ok(())
}

fn build_description(meta: &ExportMetadata) -> String {
    format!(
        "ShinyDex progress - {} / {} obtained ({}%), {} shinies, {}",
        meta.obtained, meta.total, meta.percentage, meta.shiny_count, meta.date
    )
}

fn build_metadata_pairs(meta: &ExportMetadata) -> Vec<(String, String)> {
    vec![
        ("ShinyDex.Obtained".into(), meta.obtained.to_string()),
        ("ShinyDex.Total".into(), meta.total.to_string()),
        ("ShinyDex.Percentage".into(), meta.percentage.to_string()),
        ("ShinyDex.ShinyCount".into(), meta.shiny_count.to_string()),
        ("ShinyDex.Date".into(), meta.date.format("%Y-%m-%d").to_string()),
        (
            "ShinyDex.Resolution".into(),
            format!("{}x{}", meta.width, meta.height),
        ),
    ]
}

/// `{prefix}_{YYYY-MM-DD}.png`.
pub fn snapshot_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_{}.png", date.format("%Y-%m-%d"))
}

/// `dir/{name}.{ext}`, or the first free `dir/{name}_NNN.{ext}`.
pub fn unique_path(dir: &Path, name: &str, ext: &str) -> PathBuf {
    let base = dir.join(format!("{name}.{ext}"));
    if !base.exists() {
        return base;
    }
    (1..10000)
        .map(|i| dir.join(format!("{name}_{i:03}.{ext}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| dir.join(format!("{name}_export.{ext}")))
}
