//! Incremental tile updates without rebuilding the surrounding structure.

use shinydex_core::Config;
use tracing::debug;

use crate::view::{TileView, ViewModel};

/// Replacement content for the tile at `(region, index)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePatch {
    pub region: usize,
    pub index: usize,
    pub tile: TileView,
}

/// Tiles that differ between two views built from the same catalog.
///
/// Regions or tiles present in only one of the two are ignored; structure
/// never changes after the first build.
pub fn diff(old: &ViewModel, new: &ViewModel) -> Vec<TilePatch> {
    old.regions
        .iter()
        .zip(&new.regions)
        .enumerate()
        .flat_map(|(r, (before, after))| {
            before
                .tiles
                .iter()
                .zip(&after.tiles)
                .enumerate()
                .filter(|(_, (a, b))| a != b)
                .map(move |(i, (_, b))| TilePatch {
                    region: r,
                    index: i,
                    tile: b.clone(),
                })
        })
        .collect()
}

impl ViewModel {
    /// Write each patch into its slot. Out-of-range patches are skipped.
    pub fn apply(&mut self, patches: &[TilePatch]) {
        for patch in patches {
            if let Some(slot) = self
                .regions
                .get_mut(patch.region)
                .and_then(|r| r.tiles.get_mut(patch.index))
            {
                *slot = patch.tile.clone();
            }
        }
    }

    /// Bring every tile showing `id` in line with `count`. Returns the
    /// patches that were applied; tiles already up to date produce none.
    pub fn refresh_item(&mut self, id: &str, count: u32, config: Config) -> Vec<TilePatch> {
        let fresh = TileView::new(id, count, config, self.assets());
        let patches: Vec<TilePatch> = self
            .positions_of(id)
            .filter(|&(r, i)| self.tile(r, i) != Some(&fresh))
            .map(|(region, index)| TilePatch {
                region,
                index,
                tile: fresh.clone(),
            })
            .collect();
        self.apply(&patches);
        debug!("Refreshed {id} -> {count} ({} tiles)", patches.len());
        patches
    }
}
