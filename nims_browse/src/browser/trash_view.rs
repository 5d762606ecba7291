/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use super::Browser;
use crate::effect::Effect;
use crate::effect::Mutation;
use crate::level::Level;
use crate::service::TrashView;

impl Browser {
    /// Ask the server to switch to `view`. The displayed mode changes
    /// only once the server confirms.
    pub fn request_trash_view(&mut self, view: TrashView) -> Vec<Effect> {
        if view == self.trash_view {
            return Vec::new();
        }
        match self.submit(Mutation::SetTrashView(view), &Level::ALL) {
            Some(effect) => {
                self.pending_view = Some(view);
                vec![effect]
            }
            None => Vec::new(),
        }
    }

    pub fn toggle_trash_view(&mut self) -> Vec<Effect> {
        self.request_trash_view(self.trash_view.toggled())
    }

    pub(super) fn finish_trash_view(&mut self, view: TrashView) -> Vec<Effect> {
        self.trash_view = view;
        self.pending_view = None;
        self.notifications.info(format!("showing {} rows", view));
        self.reload()
    }
}
