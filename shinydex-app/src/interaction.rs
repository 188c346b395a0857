//! Gesture handling for the grid: tile toggles, the badge count editor, and
//! the desaturation toggle. Everything here is UI-agnostic so it can be
//! driven from egui or from tests.

use shinydex_core::{parse_count, AssetRoots, KeyValueStore, Stats, Tracker};
use shinydex_render::ViewModel;
use tracing::debug;

use crate::ui::UiAction;

/// The inline numeric editor replacing a tile's badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    pub region: usize,
    pub index: usize,
    pub id: String,
    pub text: String,
    /// Set when the editor opens; cleared once the input has taken focus.
    pub wants_focus: bool,
}

/// Tracker plus the derived view model and stats, kept in sync after every
/// gesture.
pub struct Checklist<S: KeyValueStore> {
    tracker: Tracker<S>,
    view: ViewModel,
    stats: Stats,
    editor: Option<Editor>,
}

impl<S: KeyValueStore> Checklist<S> {
    pub fn new(tracker: Tracker<S>, assets: &AssetRoots) -> Self {
        let view = ViewModel::build(tracker.catalog(), tracker.state(), tracker.config(), assets);
        let stats = tracker.stats();
        Self {
            tracker,
            view,
            stats,
            editor: None,
        }
    }

    pub fn tracker(&self) -> &Tracker<S> {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut Tracker<S> {
        &mut self.tracker
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn editor(&self) -> Option<&Editor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut Editor> {
        self.editor.as_mut()
    }

    fn editing(&self, region: usize, index: usize) -> bool {
        self.editor
            .as_ref()
            .is_some_and(|e| e.region == region && e.index == index)
    }

    /// Tap on a tile body. Ignored while that tile is being edited; any other
    /// open editor is committed first.
    pub fn tap_tile(&mut self, region: usize, index: usize) {
        if self.editing(region, index) {
            return;
        }
        let Some(id) = self.view.tile(region, index).map(|t| t.id.clone()) else {
            return;
        };
        self.commit_editor();
        let count = self.tracker.toggle(&id);
        self.refresh(&id, count);
    }

    /// Tap on a badge: open the editor for that tile, committing any other.
    pub fn tap_badge(&mut self, region: usize, index: usize) {
        if self.editing(region, index) {
            return;
        }
        let Some(id) = self.view.tile(region, index).map(|t| t.id.clone()) else {
            return;
        };
        // The editor being closed may hold the same id at another position.
        self.commit_editor();
        let count = self.tracker.count(&id);
        debug!("Editing {id}");
        self.editor = Some(Editor {
            region,
            index,
            id,
            text: if count == 0 {
                String::new()
            } else {
                count.to_string()
            },
            wants_focus: true,
        });
    }

    /// Store the edited count, close the editor, refresh.
    pub fn commit_editor(&mut self) {
        let Some(editor) = self.editor.take() else {
            return;
        };
        let count = self.tracker.set_count(&editor.id, parse_count(&editor.text));
        self.refresh(&editor.id, count);
    }

    /// Commit only if the open editor belongs to `(region, index)`. A focus
    /// loss reported for a tile whose editor was already replaced is stale.
    pub fn commit_editor_at(&mut self, region: usize, index: usize) {
        if self.editing(region, index) {
            self.commit_editor();
        }
    }

    /// Close the editor without touching state.
    pub fn cancel_editor(&mut self) {
        if let Some(editor) = self.editor.take() {
            debug!("Cancelled edit of {}", editor.id);
        }
    }

    pub fn set_desaturate(&mut self, value: bool) {
        self.tracker.set_desaturate(value);
        self.view.refresh_visuals(self.tracker.config());
    }

    /// Apply one collected gesture. Actions that do not concern the
    /// checklist are ignored.
    pub(crate) fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::TapTile(r, i) => self.tap_tile(r, i),
            UiAction::TapBadge(r, i) => self.tap_badge(r, i),
            UiAction::CommitEdit(r, i) => self.commit_editor_at(r, i),
            UiAction::CancelEdit => self.cancel_editor(),
            UiAction::SetDesaturate(value) => self.set_desaturate(value),
            UiAction::Export | UiAction::ToggleHelp => {}
        }
    }

    fn refresh(&mut self, id: &str, count: u32) {
        self.view.refresh_item(id, count, self.tracker.config());
        self.view.refresh_progress(self.tracker.state());
        self.stats = self.tracker.stats();
    }
}
