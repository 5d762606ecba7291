/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Drag and drop handlers.
//!
//! A drag is a set of rows picked up from the focused panel. Dropping
//! it resolves to one of three mutations depending on the target:
//!
//! | target              | rows accepted | locks                |
//! |---------------------|---------------|----------------------|
//! | an Experiment row   | Sessions only | Experiments, Sessions|
//! | the trash           | any level     | all panels           |
//! | the export target   | any level     | none                 |

use std::collections::HashSet;
use std::fmt;

use super::Browser;
use crate::effect::Effect;
use crate::effect::Mutation;
use crate::effect::MutationReply;
use crate::id_dict::IdDictionary;
use crate::level::Level;
use crate::level::RowId;
use crate::service::TransferOutcome;

/// Rows picked up and not yet dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drag {
    pub source: Level,
    pub rows: Vec<RowId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Experiment(RowId),
    Trash,
    Download,
}

impl fmt::Display for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropTarget::Experiment(id) => write!(f, "{}", id),
            DropTarget::Trash => f.write_str("trash"),
            DropTarget::Download => f.write_str("export"),
        }
    }
}

impl Browser {
    /// Pick up the focused panel's selected rows, or the row under the
    /// cursor when nothing is selected. Returns whether a drag started.
    pub fn begin_drag(&mut self) -> bool {
        let Some(level) = self.focus else {
            return false;
        };
        let panel = self.panel(level);
        if !panel.is_visible() {
            return false;
        }
        let mut rows = panel.selected_ids();
        if rows.is_empty() {
            rows.extend(panel.cursor_row().map(|row| row.id));
        }
        if rows.is_empty() {
            return false;
        }
        tracing::debug!(source = %level, rows = rows.len(), "drag started");
        self.drag = Some(Drag {
            source: level,
            rows,
        });
        true
    }

    /// Focus Experiments and put its cursor on the next experiment that
    /// accepts the carried sessions.
    pub fn aim_drop(&mut self) -> Option<RowId> {
        if self.drag.as_ref()?.source != Level::Session {
            return None;
        }
        self.set_focus(Level::Experiment);
        self.panel_mut(Level::Experiment).cursor_to_next_drop_target()
    }

    pub fn cancel_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    /// Drop the current drag on `target`. The drag ends either way.
    pub fn drop_on(&mut self, target: DropTarget) -> Vec<Effect> {
        let Some(drag) = self.drag.take() else {
            self.notifications.warn("nothing picked up");
            return Vec::new();
        };
        self.complete_drop(&drag.rows, target)
    }

    /// Handle `rows` landing on `target`.
    pub fn complete_drop(&mut self, rows: &[RowId], target: DropTarget) -> Vec<Effect> {
        if rows.is_empty() {
            self.notifications.warn(format!("nothing to drop on {}", target));
            return Vec::new();
        }
        let effect = match target {
            DropTarget::Download => {
                let ids = IdDictionary::from_rows(rows);
                if !self.options.download_enabled {
                    self.notifications
                        .info(format!("export is disabled; would export {}", ids));
                    return Vec::new();
                }
                self.submit(Mutation::Download(ids), &[])
            }
            DropTarget::Trash => {
                let ids = IdDictionary::from_rows(rows);
                self.submit(Mutation::Trash(ids), &Level::ALL)
            }
            DropTarget::Experiment(experiment) => {
                if rows.iter().any(|row| row.level != Level::Session) {
                    self.notifications
                        .warn(format!("only sessions can be moved onto {}", experiment));
                    return Vec::new();
                }
                if !self.panel(Level::Experiment).accepts_drop(experiment) {
                    self.notifications
                        .warn(format!("{} does not accept sessions", experiment));
                    return Vec::new();
                }
                let mut sessions: Vec<u64> = Vec::with_capacity(rows.len());
                for row in rows {
                    if !sessions.contains(&row.id) {
                        sessions.push(row.id);
                    }
                }
                self.submit(
                    Mutation::Transfer {
                        sessions,
                        experiment: experiment.id,
                    },
                    &[Level::Experiment, Level::Session],
                )
            }
        };
        effect.into_iter().collect()
    }

    /// Reconcile panels after the server moved `sessions` under
    /// `experiment`.
    ///
    /// The moved rows are dropped in place only while the Sessions
    /// listing seen at submit time is still the one on screen. If it was
    /// relisted meanwhile, that listing may predate the move, so the
    /// Sessions panel is listed again instead.
    pub(super) fn finish_transfer(
        &mut self,
        sessions: &[u64],
        experiment: u64,
        reply: MutationReply,
        listed: Option<u64>,
    ) -> Vec<Effect> {
        let target = RowId::new(Level::Experiment, experiment);
        if let MutationReply::Transferred(TransferOutcome { untrashed: true }) = reply {
            self.panel_mut(Level::Experiment).clear_trash_marker(target);
        }
        self.notifications
            .info(format!("moved {} session(s) to {}", sessions.len(), target));

        let panel = self.panel(Level::Session);
        let unchanged = listed.is_some_and(|generation| {
            panel.is_current(generation) && !panel.is_loading()
        });
        if !unchanged {
            tracing::debug!(%target, "sessions relisted during transfer");
            if self.panel(Level::Experiment).is_loading() {
                return Vec::new();
            }
            return self.cascade_from(Level::Experiment);
        }

        let moved: HashSet<RowId> = sessions
            .iter()
            .map(|id| RowId::new(Level::Session, *id))
            .collect();
        let selection_changed = self.panel_mut(Level::Session).remove_rows(&moved);
        // Re-cascade only if removing the rows changed the Sessions
        // selection, which covers more than a lone selected row moving.
        self.after_selection(Level::Session, selection_changed)
    }
}
