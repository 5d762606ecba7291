/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The browser state machine.
//!
//! [`Browser`] owns the four panels, keyboard focus, the trash-view
//! mode, an in-progress drag and the set of pending mutations. It never
//! performs I/O: every operation returns the [`Effect`]s it wants run,
//! and results come back through [`Browser::apply`]. All state changes
//! therefore happen on one thread, in the order the caller delivers
//! inputs and completions.
//!
//! ## Invariants
//!
//! - A panel below Experiments is visible only while its parent has
//!   exactly one selected row and its last fetch for that row
//!   succeeded.
//! - A fetch completion is applied only if it carries the panel's
//!   current generation. Anything else is stale and dropped.
//! - A pending mutation holds locks on the panels it will touch; a
//!   second mutation needing any of them is rejected, not queued.
//! - Failures never change rows, selection or trash-view; they only
//!   produce a notification.
//!
//! The logic is split by concern: [`cascade`] (fetch and collapse
//! propagation), [`drop`] (drag and drop handlers), [`focus`]
//! (keyboard navigation) and [`trash_view`] (the view toggle).

mod cascade;
mod drop;
mod focus;
mod trash_view;

#[cfg(test)]
mod testing;

use std::collections::HashMap;

pub use self::drop::Drag;
pub use self::drop::DropTarget;
pub use self::focus::Arrow;
use crate::effect::Completion;
use crate::effect::Effect;
use crate::effect::Mutation;
use crate::effect::MutationReply;
use crate::level::Level;
use crate::level::RowId;
use crate::notify::Notifications;
use crate::panel::Panel;
use crate::panel::Row;
use crate::service::DataService;
use crate::service::ServiceError;
use crate::service::TrashView;

/// Behaviour switches supplied by configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrowserOptions {
    /// Export drops call the service instead of only reporting what
    /// would have been exported.
    pub download_enabled: bool,
}

#[derive(Debug)]
struct PendingMutation {
    mutation: Mutation,
    locks: Vec<Level>,
    /// Generation of the settled Sessions listing at submit time, if
    /// it was settled. A transfer only edits that listing in place.
    sessions_listing: Option<u64>,
}

#[derive(Debug)]
pub struct Browser {
    panels: [Panel; 4],
    focus: Option<Level>,
    trash_view: TrashView,
    pending_view: Option<TrashView>,
    options: BrowserOptions,
    drag: Option<Drag>,
    pending: HashMap<u64, PendingMutation>,
    next_ticket: u64,
    notifications: Notifications,
}

impl Browser {
    pub fn new(trash_view: TrashView, options: BrowserOptions) -> Self {
        Self {
            panels: Level::ALL.map(Panel::new),
            focus: None,
            trash_view,
            pending_view: None,
            options,
            drag: None,
            pending: HashMap::new(),
            next_ticket: 1,
            notifications: Notifications::default(),
        }
    }

    /// Build a browser after reading the persisted trash-view mode.
    /// The read completes before any fetch is issued; if it fails the
    /// browser starts in [`TrashView::Active`] with a notification.
    pub async fn bootstrap(service: &dyn DataService, options: BrowserOptions) -> Self {
        match service.trash_view().await {
            Ok(view) => Self::new(view, options),
            Err(error) => {
                let mut browser = Self::new(TrashView::Active, options);
                browser.notifications.error(format!(
                    "reading trash view failed, showing active rows: {}",
                    error
                ));
                browser
            }
        }
    }

    pub fn panel(&self, level: Level) -> &Panel {
        &self.panels[level.index()]
    }

    fn panel_mut(&mut self, level: Level) -> &mut Panel {
        &mut self.panels[level.index()]
    }

    pub fn focus(&self) -> Option<Level> {
        self.focus
    }

    /// The confirmed trash-view mode.
    pub fn trash_view(&self) -> TrashView {
        self.trash_view
    }

    /// A requested mode still waiting for the server.
    pub fn pending_trash_view(&self) -> Option<TrashView> {
        self.pending_view
    }

    pub fn options(&self) -> BrowserOptions {
        self.options
    }

    pub fn drag(&self) -> Option<&Drag> {
        self.drag.as_ref()
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    pub fn is_locked(&self, level: Level) -> bool {
        self.pending
            .values()
            .any(|pending| pending.locks.contains(&level))
    }

    pub fn pending_mutations(&self) -> usize {
        self.pending.len()
    }

    /// No fetch is loading and no mutation is pending.
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.panels.iter().all(|panel| !panel.is_loading())
    }

    /// Feed the result of an effect back in.
    pub fn apply(&mut self, completion: Completion) -> Vec<Effect> {
        match completion {
            Completion::Fetched {
                level,
                generation,
                result,
            } => self.apply_fetch(level, generation, result),
            Completion::Mutated { ticket, result } => self.apply_mutation(ticket, result),
        }
    }

    fn apply_fetch(
        &mut self,
        level: Level,
        generation: u64,
        result: Result<Vec<Row>, ServiceError>,
    ) -> Vec<Effect> {
        let panel = self.panel_mut(level);
        if !panel.is_current(generation) {
            tracing::debug!(
                %level,
                generation,
                current = panel.generation(),
                "discarding stale fetch"
            );
            return Vec::new();
        }
        match result {
            Ok(rows) => {
                tracing::debug!(%level, generation, rows = rows.len(), "fetched");
                panel.populate(rows);
                if level == Level::Experiment {
                    panel.register_drop_targets();
                }
                panel.finish_fetch();
                if level == Level::Session {
                    self.update_drop_targets();
                }
                self.cascade_from(level)
            }
            Err(error) => {
                panel.fail_fetch();
                self.notifications
                    .error(format!("loading {} failed: {}", level.title(), error));
                Vec::new()
            }
        }
    }

    fn apply_mutation(
        &mut self,
        ticket: u64,
        result: Result<MutationReply, ServiceError>,
    ) -> Vec<Effect> {
        let Some(pending) = self.pending.remove(&ticket) else {
            tracing::debug!(ticket, "completion for unknown mutation");
            return Vec::new();
        };
        match (pending.mutation, result) {
            (Mutation::Transfer { sessions, experiment }, Ok(reply)) => {
                self.finish_transfer(&sessions, experiment, reply, pending.sessions_listing)
            }
            (Mutation::Trash(ids), Ok(_)) => {
                let destination = match self.trash_view {
                    TrashView::Active => "trash",
                    TrashView::Trash => "active rows",
                };
                self.notifications
                    .info(format!("moved {} to {}", ids, destination));
                self.reload()
            }
            (Mutation::SetTrashView(view), Ok(_)) => self.finish_trash_view(view),
            (Mutation::Download(ids), Ok(_)) => {
                self.notifications
                    .info(format!("export requested for {}", ids));
                Vec::new()
            }
            (mutation, Err(error)) => {
                if let Mutation::SetTrashView(_) = mutation {
                    self.pending_view = None;
                }
                self.notifications
                    .error(format!("{} failed: {}", mutation.describe(), error));
                Vec::new()
            }
        }
    }

    /// Register a mutation unless one of `locks` is already held.
    fn submit(&mut self, mutation: Mutation, locks: &[Level]) -> Option<Effect> {
        if let Some(busy) = locks.iter().copied().find(|level| self.is_locked(*level)) {
            self.notifications.warn(format!(
                "{} rejected: {} has a change in progress",
                mutation.describe(),
                busy.title()
            ));
            return None;
        }
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        tracing::info!(ticket, mutation = mutation.describe(), "submitting");
        let sessions = self.panel(Level::Session);
        let sessions_listing = (!sessions.is_loading()).then(|| sessions.generation());
        self.pending.insert(
            ticket,
            PendingMutation {
                mutation: mutation.clone(),
                locks: locks.to_vec(),
                sessions_listing,
            },
        );
        Some(Effect::Mutate { ticket, mutation })
    }

    /// Recompute which Experiment rows accept a Session drop: the other
    /// managed experiments, and only when the selected one is managed.
    fn update_drop_targets(&mut self) {
        let experiments = self.panel_mut(Level::Experiment);
        experiments.disable_all_drops();
        let Some(selected) = experiments.single_selection() else {
            return;
        };
        if !selected.access_mg {
            return;
        }
        let selected = selected.id;
        let targets: Vec<RowId> = experiments
            .rows()
            .iter()
            .filter(|row| row.access_mg && row.id != selected)
            .map(|row| row.id)
            .collect();
        for id in targets {
            experiments.set_drop_enabled(id, true);
        }
    }
}
