//! Completion statistics derived from the catalog and the collection state.

use crate::catalog::Catalog;
use crate::state::StateMap;

/// Progress within one region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionStats {
    /// Items in the region with a count above zero.
    pub obtained: usize,
    pub total: usize,
}

/// Global and per-region completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    /// One entry per catalog region, in catalog order.
    pub regions: Vec<RegionStats>,
    pub obtained: usize,
    pub total: usize,
    /// `round(100 * obtained / total)`, 0 for an empty catalog.
    pub percentage: u32,
    /// Sum of every stored count. An item with count 3 adds 1 to `obtained`
    /// and 3 here.
    pub sum_of_counts: u64,
}

impl Stats {
    pub fn progress_label(&self) -> String {
        format!("{} / {}", self.obtained, self.total)
    }

    pub fn percentage_label(&self) -> String {
        format!("{}%", self.percentage)
    }

    /// The stats bar entries, left to right.
    pub fn summary_lines(&self) -> [String; 3] {
        [
            format!("Total: {}", self.progress_label()),
            format!("Shiny count: {}", self.sum_of_counts),
            self.percentage_label(),
        ]
    }
}

impl RegionStats {
    pub fn of(items: &[String], state: &StateMap) -> Self {
        Self {
            obtained: items.iter().filter(|id| state.get(id) > 0).count(),
            total: items.len(),
        }
    }

    pub fn label(&self) -> String {
        format!("{} / {}", self.obtained, self.total)
    }
}

/// Single pass over the catalog regions.
pub fn compute_stats(catalog: &Catalog, state: &StateMap) -> Stats {
    let regions: Vec<RegionStats> = catalog
        .regions()
        .iter()
        .map(|region| RegionStats::of(&region.items, state))
        .collect();

    let obtained = regions.iter().map(|r| r.obtained).sum();
    let total = regions.iter().map(|r| r.total).sum();
    let percentage = percentage(obtained, total);

    Stats {
        regions,
        obtained,
        total,
        percentage,
        sum_of_counts: state.total_count(),
    }
}

fn percentage(obtained: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * obtained as f64 / total as f64).round() as u32
}
