/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Per-level panel state: rows, selection, cursor, loading and
//! visibility, plus the drop targets registered on its rows.
//!
//! A panel never decides *when* to fetch; that is the cascade's job
//! (see [`crate::browser`]). It only guarantees that its own state
//! stays internally consistent: the selection is always a subset of
//! the current rows and the cursor always points at a valid row.

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::HashSet;

use crate::cursor::Cursor;
use crate::level::Level;
use crate::level::RowId;

/// One row as listed by the data service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: RowId,
    /// Display cells, left to right.
    pub cells: Vec<String>,
    /// The user may manage this row (only meaningful for experiments).
    pub access_mg: bool,
    /// The row is currently in the trash.
    pub trash: bool,
}

impl Row {
    pub fn new(id: RowId, cells: Vec<String>) -> Self {
        Self {
            id,
            cells,
            access_mg: false,
            trash: false,
        }
    }

    pub fn with_access_mg(mut self, access_mg: bool) -> Self {
        self.access_mg = access_mg;
        self
    }

    pub fn with_trash(mut self, trash: bool) -> Self {
        self.trash = trash;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Panel {
    level: Level,
    rows: Vec<Row>,
    selected: BTreeSet<RowId>,
    cursor: Cursor,
    loading: bool,
    visible: bool,
    /// Identifies the most recently issued fetch. Completions carrying
    /// any other value are stale.
    generation: u64,
    /// Registered drop targets and whether each currently accepts a
    /// drop. Rebuilt wholesale whenever the rows are replaced.
    drop_targets: HashMap<RowId, bool>,
}

impl Panel {
    /// A fresh, empty panel. Only the root panel starts visible.
    pub fn new(level: Level) -> Self {
        Self {
            level,
            rows: Vec::new(),
            selected: BTreeSet::new(),
            cursor: Cursor::new(0),
            loading: false,
            visible: level.parent().is_none(),
            generation: 0,
            drop_targets: HashMap::new(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_row(&self) -> Option<&Row> {
        self.rows.get(self.cursor.pos())
    }

    // Loading lifecycle.

    /// Start a new fetch, superseding any in flight. Returns the
    /// generation the fetch must carry.
    pub fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    /// Whether a completion tagged with `generation` may still be
    /// applied.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Discard any in-flight fetch without touching content. Returns
    /// whether a fetch was actually in flight.
    pub fn invalidate(&mut self) -> bool {
        let was_loading = self.loading;
        self.generation += 1;
        self.loading = false;
        was_loading
    }

    /// Hide the panel and discard any in-flight fetch. Returns whether
    /// a fetch was in flight.
    pub fn collapse(&mut self) -> bool {
        self.visible = false;
        self.invalidate()
    }

    /// Current fetch succeeded and the panel has been repopulated.
    pub fn finish_fetch(&mut self) {
        self.loading = false;
        self.visible = true;
    }

    /// Current fetch failed; content stays as it was.
    pub fn fail_fetch(&mut self) {
        self.loading = false;
    }

    // Population.

    /// Replace all rows and re-derive the selection from the ids that
    /// were selected before.
    pub fn populate(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.synchronize_selections();
    }

    /// Intersect the selection with the current rows, then put the
    /// cursor on the first surviving selected row (or clamp it).
    pub fn synchronize_selections(&mut self) {
        let present: HashSet<RowId> = self.rows.iter().map(|row| row.id).collect();
        self.selected.retain(|id| present.contains(id));
        self.cursor.update_len(self.rows.len());
        if let Some(pos) = self
            .rows
            .iter()
            .position(|row| self.selected.contains(&row.id))
        {
            self.cursor.set_pos(pos);
        }
    }

    /// Remove rows in place (no re-fetch). Returns whether the
    /// selection changed as a result.
    pub fn remove_rows(&mut self, ids: &HashSet<RowId>) -> bool {
        self.rows.retain(|row| !ids.contains(&row.id));
        self.drop_targets.retain(|id, _| !ids.contains(id));
        let before = self.selected.len();
        self.selected.retain(|id| !ids.contains(id));
        self.cursor.update_len(self.rows.len());
        self.selected.len() != before
    }

    /// Zebra stripe for the row at `index`; recomputed from position
    /// alone so removals restripe automatically.
    pub fn is_striped(index: usize) -> bool {
        index % 2 == 1
    }

    /// Clear the trash marker on one row. Returns whether it was set.
    pub fn clear_trash_marker(&mut self, id: RowId) -> bool {
        match self.rows.iter_mut().find(|row| row.id == id) {
            Some(row) if row.trash => {
                row.trash = false;
                true
            }
            _ => false,
        }
    }

    // Selection.

    pub fn is_selected(&self, id: RowId) -> bool {
        self.selected.contains(&id)
    }

    pub fn selection_len(&self) -> usize {
        self.selected.len()
    }

    /// Selected rows in display order.
    pub fn selected_rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.rows
            .iter()
            .filter(|row| self.selected.contains(&row.id))
    }

    pub fn selected_ids(&self) -> Vec<RowId> {
        self.selected_rows().map(|row| row.id).collect()
    }

    /// The selected row, if exactly one is selected.
    pub fn single_selection(&self) -> Option<&Row> {
        if self.selected.len() != 1 {
            return None;
        }
        self.selected_rows().next()
    }

    /// Make `id` the only selected row. Returns whether the selection
    /// changed.
    pub fn select_only(&mut self, id: RowId) -> bool {
        let Some(pos) = self.rows.iter().position(|row| row.id == id) else {
            return false;
        };
        self.cursor.set_pos(pos);
        if self.selected.len() == 1 && self.selected.contains(&id) {
            return false;
        }
        self.selected.clear();
        self.selected.insert(id);
        true
    }

    /// Add or remove `id` from the selection.
    pub fn toggle(&mut self, id: RowId) -> bool {
        let Some(pos) = self.rows.iter().position(|row| row.id == id) else {
            return false;
        };
        self.cursor.set_pos(pos);
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    /// Move the cursor by `delta` and select the row it lands on.
    /// Returns whether the selection changed.
    pub fn change_row(&mut self, delta: isize) -> bool {
        self.cursor.step(delta);
        match self.cursor_row().map(|row| row.id) {
            Some(id) => self.select_only(id),
            None => false,
        }
    }

    /// Move the cursor to the first row without changing the selection.
    pub fn cursor_home(&mut self) {
        self.cursor.home();
    }

    // Drop targets.

    /// Register every current row as a drop target, initially
    /// disabled.
    pub fn register_drop_targets(&mut self) {
        self.drop_targets = self.rows.iter().map(|row| (row.id, false)).collect();
    }

    /// Enable or disable a registered target. Unregistered ids are
    /// ignored.
    pub fn set_drop_enabled(&mut self, id: RowId, enabled: bool) {
        if let Some(slot) = self.drop_targets.get_mut(&id) {
            *slot = enabled;
        }
    }

    pub fn disable_all_drops(&mut self) {
        for enabled in self.drop_targets.values_mut() {
            *enabled = false;
        }
    }

    pub fn accepts_drop(&self, id: RowId) -> bool {
        self.drop_targets.get(&id).copied().unwrap_or(false)
    }

    /// Move the cursor to the next row after it, wrapping, that
    /// accepts a drop. The selection is unchanged.
    pub fn cursor_to_next_drop_target(&mut self) -> Option<RowId> {
        let len = self.rows.len();
        let start = self.cursor.pos();
        let index = (1..=len)
            .map(|offset| (start + offset) % len)
            .find(|&index| self.accepts_drop(self.rows[index].id))?;
        self.cursor.set_pos(index);
        Some(self.rows[index].id)
    }
}
