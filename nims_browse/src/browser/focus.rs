/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use super::Browser;
use crate::effect::Effect;
use crate::level::Level;

/// Directional keys. They are always consumed by the browser, even
/// when they have no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Up,
    Down,
    Left,
    Right,
}

impl Browser {
    /// Focus `level` and put its cursor on the first row. Selection is
    /// left alone. Returns whether focus moved.
    pub fn set_focus(&mut self, level: Level) -> bool {
        if self.focus == Some(level) {
            return false;
        }
        self.focus = Some(level);
        self.panel_mut(level).cursor_home();
        true
    }

    pub fn on_arrow(&mut self, arrow: Arrow) -> Vec<Effect> {
        let Some(focused) = self.focus else {
            return Vec::new();
        };
        match arrow {
            Arrow::Up | Arrow::Down => {
                let delta = if arrow == Arrow::Up { -1 } else { 1 };
                if !self.panel(focused).is_visible() {
                    return Vec::new();
                }
                let changed = self.panel_mut(focused).change_row(delta);
                self.after_selection(focused, changed)
            }
            Arrow::Left => {
                if let Some(parent) = focused.parent() {
                    self.set_focus(parent);
                }
                Vec::new()
            }
            Arrow::Right => {
                if let Some(child) = focused.child() {
                    self.set_focus(child);
                }
                Vec::new()
            }
        }
    }
}
