//! Tile image textures, decoded on first use and cached per path.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use eframe::egui;
use tracing::{debug, warn};

/// Cache key: the image file and whether it is shown desaturated.
type Key = (PathBuf, bool);

#[derive(Default)]
pub(crate) struct TextureCache {
    textures: HashMap<Key, egui::TextureHandle>,
    /// Paths that failed to load; never retried.
    failed: HashSet<PathBuf>,
}

impl TextureCache {
    pub(crate) fn get(
        &mut self,
        ctx: &egui::Context,
        path: &Path,
        desaturated: bool,
    ) -> Option<&egui::TextureHandle> {
        if self.failed.contains(path) {
            return None;
        }
        let key = (path.to_path_buf(), desaturated);
        if !self.textures.contains_key(&key) {
            match decode(path, desaturated) {
                Some(image) => {
                    let name = format!("tile_{}_{desaturated}", path.display());
                    let handle = ctx.load_texture(name, image, egui::TextureOptions::LINEAR);
                    self.textures.insert(key.clone(), handle);
                }
                None => {
                    self.failed.insert(path.to_path_buf());
                    return None;
                }
            }
        }
        self.textures.get(&key)
    }

    pub(crate) fn len(&self) -> usize {
        self.textures.len()
    }
}

fn decode(path: &Path, desaturated: bool) -> Option<egui::ColorImage> {
    let image = match image::open(path) {
        Ok(img) => img,
        Err(e) => {
            warn!("Tile image {} unavailable: {e}", path.display());
            return None;
        }
    };
    let image = if desaturated {
        image::DynamicImage::ImageLumaA8(image.to_luma_alpha8())
    } else {
        image
    };
    let rgba = image.to_rgba8();
    let (w, h) = rgba.dimensions();
    debug!("Decoded {} ({w}x{h})", path.display());
    Some(egui::ColorImage::from_rgba_unmultiplied(
        [w as usize, h as usize],
        rgba.as_raw(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, rgba: [u8; 4]) {
        image::RgbaImage::from_pixel(2, 2, image::Rgba(rgba))
            .save(path)
            .expect("write tile");
    }

    #[test]
    fn missing_file_decodes_to_none() {
        let path = std::env::temp_dir().join("shinydex_test_no_such_tile.png");
        assert!(decode(&path, false).is_none());
    }

    #[test]
    fn desaturated_decode_is_grey() {
        let dir = std::env::temp_dir().join("shinydex_test_decode_grey");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("tile_001.png");
        write_png(&path, [220, 40, 40, 255]);

        let colour = decode(&path, false).expect("decode");
        assert_eq!(colour.size, [2, 2]);
        assert_eq!(colour.pixels[0], egui::Color32::from_rgb(220, 40, 40));

        let grey = decode(&path, true).expect("decode");
        let px = grey.pixels[0];
        assert_eq!(px.r(), px.g());
        assert_eq!(px.g(), px.b());
        assert_eq!(px.a(), 255);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn failed_path_is_not_retried() {
        let dir = std::env::temp_dir().join("shinydex_test_texture_memo");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("create dir");
        let path = dir.join("tile_025.png");
        let ctx = egui::Context::default();
        let mut cache = TextureCache::default();

        assert!(cache.get(&ctx, &path, false).is_none());
        write_png(&path, [0, 0, 255, 255]);
        assert!(cache.get(&ctx, &path, false).is_none());
        assert!(cache.get(&ctx, &path, true).is_none());
        assert_eq!(cache.len(), 0);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn variants_are_cached_separately() {
        let dir = std::env::temp_dir().join("shinydex_test_texture_variants");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("tile_004.png");
        write_png(&path, [0, 200, 0, 255]);
        let ctx = egui::Context::default();
        let mut cache = TextureCache::default();

        assert!(cache.get(&ctx, &path, false).is_some());
        assert!(cache.get(&ctx, &path, false).is_some());
        assert!(cache.get(&ctx, &path, true).is_some());
        assert_eq!(cache.len(), 2);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
