//! Deterministic tile image paths.

use std::path::{Path, PathBuf};

/// The two fixed folders holding the obtained and not-obtained tile images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoots {
    pub obtained: PathBuf,
    pub normal: PathBuf,
}

impl AssetRoots {
    pub fn new(base: &Path, obtained_folder: &str, normal_folder: &str) -> Self {
        Self {
            obtained: base.join(obtained_folder),
            normal: base.join(normal_folder),
        }
    }

    /// Image for `id` in the given obtained state. The file may not exist; a
    /// missing image is simply not drawn.
    pub fn image_path(&self, id: &str, obtained: bool) -> PathBuf {
        let folder = if obtained { &self.obtained } else { &self.normal };
        folder.join(tile_file_name(id))
    }
}

/// `tile_<id>.png`, with purely numeric ids zero-padded to three digits.
pub fn tile_file_name(id: &str) -> String {
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        format!("tile_{id:0>3}.png")
    } else {
        format!("tile_{id}.png")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_numeric_ids() {
        assert_eq!(tile_file_name("1"), "tile_001.png");
        assert_eq!(tile_file_name("025"), "tile_025.png");
        assert_eq!(tile_file_name("1025"), "tile_1025.png");
        assert_eq!(tile_file_name("150-mega"), "tile_150-mega.png");
    }

    #[test]
    fn obtained_state_selects_folder() {
        let roots = AssetRoots::new(Path::new("assets"), "shiny", "normal");
        assert_eq!(
            roots.image_path("7", true),
            Path::new("assets").join("shiny").join("tile_007.png")
        );
        assert_eq!(
            roots.image_path("7", false),
            Path::new("assets").join("normal").join("tile_007.png")
        );
    }
}
