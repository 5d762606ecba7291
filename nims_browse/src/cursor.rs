/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

/// Row cursor over a panel's rows.
///
/// Invariant: `pos < len`, or `pos == 0` when the panel is empty.
/// Movement methods report whether the position changed so callers
/// can skip redundant selection work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    pos: usize,
    len: usize,
}

impl Cursor {
    pub fn new(len: usize) -> Self {
        Self { pos: 0, len }
    }

    /// Move by `delta` rows, stopping at either end.
    pub fn step(&mut self, delta: isize) -> bool {
        if self.len == 0 {
            return false;
        }
        let last = self.len - 1;
        let new_pos = if delta.is_negative() {
            self.pos.saturating_sub(delta.unsigned_abs())
        } else {
            self.pos.saturating_add(delta as usize).min(last)
        };
        self.set(new_pos)
    }

    /// Jump to the first row.
    pub fn home(&mut self) -> bool {
        self.set(0)
    }

    /// Place the cursor directly, clamping to the valid range.
    pub fn set_pos(&mut self, pos: usize) {
        self.set(pos.min(self.len.saturating_sub(1)));
    }

    /// Record a new row count after the rows were replaced or
    /// trimmed, clamping the position.
    pub fn update_len(&mut self, len: usize) {
        self.len = len;
        self.pos = self.pos.min(len.saturating_sub(1));
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn set(&mut self, pos: usize) -> bool {
        let changed = self.pos != pos;
        self.pos = pos;
        changed
    }
}
