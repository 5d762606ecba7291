/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Selection-driven fetch and collapse propagation.
//!
//! A level's children are fetched only when it has exactly one
//! selected row; otherwise every strictly lower panel collapses. Child
//! fetches are issued from the parent's successful completion, so the
//! cascade runs depth first.

use super::Browser;
use crate::effect::Effect;
use crate::level::Level;
use crate::level::RowId;

impl Browser {
    /// Full reload starting at Experiments. Lower panels keep their
    /// content until the cascade reaches them.
    pub fn reload(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.start_fetch(Level::Experiment, None, &mut effects);
        effects
    }

    /// Propagate `level`'s current selection into its child panel.
    pub fn cascade_from(&mut self, level: Level) -> Vec<Effect> {
        let mut effects = Vec::new();
        let Some(child) = level.child() else {
            return effects;
        };
        match self.panel(level).single_selection().map(|row| row.id.id) {
            Some(parent) => self.start_fetch(child, Some(parent), &mut effects),
            None => self.collapse_from(child, &mut effects),
        }
        effects
    }

    fn start_fetch(&mut self, level: Level, parent: Option<u64>, effects: &mut Vec<Effect>) {
        let generation = self.panel_mut(level).begin_fetch();
        for descendant in level.descendants() {
            if self.panel_mut(descendant).invalidate() {
                effects.push(Effect::Cancel { level: descendant });
            }
        }
        tracing::debug!(%level, ?parent, generation, "fetching");
        effects.push(Effect::Fetch {
            level,
            parent,
            generation,
        });
    }

    /// Hide `level` and everything below it.
    fn collapse_from(&mut self, level: Level, effects: &mut Vec<Effect>) {
        for hidden in level.and_descendants() {
            if self.panel_mut(hidden).collapse() {
                effects.push(Effect::Cancel { level: hidden });
            }
        }
        if level == Level::Session {
            self.panel_mut(Level::Experiment).disable_all_drops();
        }
    }

    /// Make `id` the only selected row in its panel.
    pub fn select_only(&mut self, id: RowId) -> Vec<Effect> {
        if !self.panel(id.level).is_visible() {
            return Vec::new();
        }
        let changed = self.panel_mut(id.level).select_only(id);
        self.after_selection(id.level, changed)
    }

    /// Add `id` to, or remove it from, its panel's selection.
    pub fn toggle_selection(&mut self, id: RowId) -> Vec<Effect> {
        if !self.panel(id.level).is_visible() {
            return Vec::new();
        }
        let changed = self.panel_mut(id.level).toggle(id);
        self.after_selection(id.level, changed)
    }

    pub fn clear_selection(&mut self, level: Level) -> Vec<Effect> {
        if !self.panel(level).is_visible() {
            return Vec::new();
        }
        let changed = self.panel_mut(level).clear_selection();
        self.after_selection(level, changed)
    }

    pub(super) fn after_selection(&mut self, level: Level, changed: bool) -> Vec<Effect> {
        if changed {
            self.cascade_from(level)
        } else {
            Vec::new()
        }
    }
}
