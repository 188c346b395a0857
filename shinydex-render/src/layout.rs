//! Document geometry shared by the live grid and the snapshot capture.

use crate::view::ViewModel;

/// Axis-aligned rectangle in document pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Whether any part of `self` lies within the vertical band
    /// `[top, top + height)`.
    pub fn intersects_band(&self, top: f32, height: f32) -> bool {
        self.y < top + height && self.bottom() > top
    }
}

/// Fixed sizes of the page chrome, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub tile_size: f32,
    pub tile_gap: f32,
    pub page_padding: f32,
    pub card_padding: f32,
    pub card_gap: f32,
    pub header_height: f32,
    pub options_bar_height: f32,
    pub stats_bar_height: f32,
    pub badge_radius: f32,
    pub corner_radius: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            tile_size: 88.0,
            tile_gap: 8.0,
            page_padding: 16.0,
            card_padding: 12.0,
            card_gap: 16.0,
            header_height: 36.0,
            options_bar_height: 44.0,
            stats_bar_height: 52.0,
            badge_radius: 11.0,
            corner_radius: 8.0,
        }
    }
}

impl LayoutMetrics {
    /// Metrics with a custom tile size, everything else default.
    pub fn with_tile_size(tile_size: f32) -> Self {
        Self {
            tile_size: tile_size.max(16.0),
            ..Self::default()
        }
    }

    /// Tiles per grid row for a document of `width`. Always at least one.
    pub fn columns(&self, width: f32) -> usize {
        let inner = width - 2.0 * (self.page_padding + self.card_padding);
        let per_tile = self.tile_size + self.tile_gap;
        (((inner + self.tile_gap) / per_tile).floor() as usize).max(1)
    }

    /// Height of the tile grid for `tiles` tiles over `columns` columns.
    pub fn grid_height(&self, tiles: usize, columns: usize) -> f32 {
        if tiles == 0 {
            return 0.0;
        }
        let rows = tiles.div_ceil(columns.max(1));
        rows as f32 * self.tile_size + (rows - 1) as f32 * self.tile_gap
    }
}

/// One region card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub rect: Rect,
    pub header: Rect,
    /// One rect per tile, in the region's item order.
    pub tiles: Vec<Rect>,
}

/// Placement of every element of the page for a given width.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub width: f32,
    /// Full scrollable height, including the space reserved for the stats bar.
    pub height: f32,
    pub columns: usize,
    pub options_bar: Option<Rect>,
    pub cards: Vec<CardLayout>,
}

impl DocumentLayout {
    pub fn compute(view: &ViewModel, width: f32, metrics: &LayoutMetrics, options_bar: bool) -> Self {
        let columns = metrics.columns(width);
        let mut y = 0.0;

        let options_bar = options_bar.then(|| {
            let rect = Rect::new(0.0, 0.0, width, metrics.options_bar_height);
            y = rect.bottom();
            rect
        });
        y += metrics.page_padding;

        let card_x = metrics.page_padding;
        let card_w = (width - 2.0 * metrics.page_padding).max(0.0);
        let mut cards = Vec::with_capacity(view.regions.len());
        for region in &view.regions {
            let header = Rect::new(
                card_x + metrics.card_padding,
                y + metrics.card_padding,
                (card_w - 2.0 * metrics.card_padding).max(0.0),
                metrics.header_height,
            );
            let grid_top = header.bottom();
            let tiles = (0..region.tiles.len())
                .map(|i| {
                    let row = i / columns;
                    let col = i % columns;
                    Rect::new(
                        header.x + col as f32 * (metrics.tile_size + metrics.tile_gap),
                        grid_top + row as f32 * (metrics.tile_size + metrics.tile_gap),
                        metrics.tile_size,
                        metrics.tile_size,
                    )
                })
                .collect();
            let card_h = metrics.card_padding * 2.0
                + metrics.header_height
                + metrics.grid_height(region.tiles.len(), columns);
            cards.push(CardLayout {
                rect: Rect::new(card_x, y, card_w, card_h),
                header,
                tiles,
            });
            y += card_h + metrics.card_gap;
        }
        if !cards.is_empty() {
            y -= metrics.card_gap;
        }

        let height = y + metrics.page_padding + metrics.stats_bar_height;
        Self {
            width,
            height,
            columns,
            options_bar,
            cards,
        }
    }

    /// Top edge of a stats bar pinned to the very bottom of the document.
    pub fn stats_bar_top(&self, metrics: &LayoutMetrics) -> f32 {
        self.height - metrics.stats_bar_height
    }
}
