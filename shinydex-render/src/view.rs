//! Pure view model: what every region card and tile shows for a given state.

use std::path::PathBuf;

use shinydex_core::{AssetRoots, Catalog, Config, RegionStats, StateMap};

/// Everything needed to draw one tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileView {
    pub id: String,
    pub count: u32,
    /// Obtained or normal variant, depending on `count`.
    pub image: PathBuf,
    /// Count shown on the corner badge; only present when `count > 0`.
    pub badge: Option<u32>,
    /// Count is exactly 1 and single counts are configured to desaturate.
    pub desaturated: bool,
}

impl TileView {
    pub fn new(id: &str, count: u32, config: Config, assets: &AssetRoots) -> Self {
        let obtained = count > 0;
        Self {
            id: id.to_string(),
            count,
            image: assets.image_path(id, obtained),
            badge: obtained.then_some(count),
            desaturated: count == 1 && config.desaturate_on_single_count,
        }
    }

    pub fn obtained(&self) -> bool {
        self.count > 0
    }
}

/// A region card: header with live progress, then the tile grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionView {
    pub name: String,
    pub progress: RegionStats,
    pub tiles: Vec<TileView>,
}

/// The materialized grid for the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub regions: Vec<RegionView>,
    assets: AssetRoots,
}

impl ViewModel {
    /// Full render pass, regions and tiles in catalog order.
    pub fn build(catalog: &Catalog, state: &StateMap, config: Config, assets: &AssetRoots) -> Self {
        let regions = catalog
            .regions()
            .iter()
            .map(|region| RegionView {
                name: region.name.clone(),
                progress: RegionStats::of(&region.items, state),
                tiles: region
                    .items
                    .iter()
                    .map(|id| TileView::new(id, state.get(id), config, assets))
                    .collect(),
            })
            .collect();
        Self {
            regions,
            assets: assets.clone(),
        }
    }

    pub fn assets(&self) -> &AssetRoots {
        &self.assets
    }

    pub fn tile(&self, region: usize, index: usize) -> Option<&TileView> {
        self.regions.get(region)?.tiles.get(index)
    }

    pub fn tile_count(&self) -> usize {
        self.regions.iter().map(|r| r.tiles.len()).sum()
    }

    /// Positions `(region, index)` of every tile showing `id`.
    pub fn positions_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.regions.iter().enumerate().flat_map(move |(r, region)| {
            region
                .tiles
                .iter()
                .enumerate()
                .filter(move |(_, tile)| tile.id == id)
                .map(move |(i, _)| (r, i))
        })
    }

    /// Recompute each region's `(obtained, total)` header.
    pub fn refresh_progress(&mut self, state: &StateMap) {
        for region in &mut self.regions {
            region.progress = RegionStats {
                obtained: region.tiles.iter().filter(|t| state.get(&t.id) > 0).count(),
                total: region.tiles.len(),
            };
        }
    }

    /// Recompute the desaturation flag of every tile after a config change.
    pub fn refresh_visuals(&mut self, config: Config) {
        for tile in self.regions.iter_mut().flat_map(|r| r.tiles.iter_mut()) {
            tile.desaturated = tile.count == 1 && config.desaturate_on_single_count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shinydex_core::CatalogRegion;
    use std::path::Path;

    fn assets() -> AssetRoots {
        AssetRoots::new(Path::new("assets"), "shiny", "normal")
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            CatalogRegion {
                name: "Zone A".into(),
                items: vec!["001".into(), "002".into(), "003".into()],
            },
            CatalogRegion {
                name: "Zone B".into(),
                items: vec!["002".into()],
            },
        ])
    }

    #[test]
    fn tile_reflects_count() {
        let config = Config::default();
        let empty = TileView::new("001", 0, config, &assets());
        assert!(!empty.obtained());
        assert_eq!(empty.badge, None);
        assert!(!empty.desaturated);
        assert!(empty.image.ends_with("normal/tile_001.png"));

        let single = TileView::new("001", 1, config, &assets());
        assert_eq!(single.badge, Some(1));
        assert!(single.desaturated);
        assert!(single.image.ends_with("shiny/tile_001.png"));

        let many = TileView::new("001", 3, config, &assets());
        assert_eq!(many.badge, Some(3));
        assert!(!many.desaturated);

        let off = Config {
            desaturate_on_single_count: false,
        };
        assert!(!TileView::new("001", 1, off, &assets()).desaturated);
    }

    #[test]
    fn build_follows_catalog_order() {
        let mut state = StateMap::new();
        state.set("002", 2);
        let vm = ViewModel::build(&catalog(), &state, Config::default(), &assets());

        assert_eq!(vm.regions.len(), 2);
        assert_eq!(vm.regions[0].name, "Zone A");
        assert_eq!(vm.regions[0].progress, RegionStats { obtained: 1, total: 3 });
        let ids: Vec<_> = vm.regions[0].tiles.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["001", "002", "003"]);
        assert_eq!(vm.regions[1].tiles[0].badge, Some(2));
        assert_eq!(vm.tile_count(), 4);
    }

    #[test]
    fn positions_cover_repeated_ids() {
        let vm = ViewModel::build(&catalog(), &StateMap::new(), Config::default(), &assets());
        let positions: Vec<_> = vm.positions_of("002").collect();
        assert_eq!(positions, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn refresh_visuals_follows_config() {
        let mut state = StateMap::new();
        state.set("001", 1);
        let mut vm = ViewModel::build(&catalog(), &state, Config::default(), &assets());
        assert!(vm.regions[0].tiles[0].desaturated);

        vm.refresh_visuals(Config {
            desaturate_on_single_count: false,
        });
        assert!(!vm.regions[0].tiles[0].desaturated);
    }
}
