/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! In-memory [`DataService`] for tests.
//!
//! [`FakeDataService`] serves canned listings keyed by `(level,
//! parent)`, records every call, can be told to fail any operation,
//! and can hold list calls for a level until the test releases them.
//! Transfers and trash requests are applied to the canned listings so
//! a reload after a mutation observes its effect.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::id_dict::IdDictionary;
use crate::level::Level;
use crate::level::RowId;
use crate::panel::Row;
use crate::service::DataService;
use crate::service::ServiceError;
use crate::service::TransferOutcome;
use crate::service::TrashView;

/// A call observed by the fake, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List { level: Level, parent: Option<u64> },
    Transfer { sessions: Vec<u64>, experiment: u64 },
    Trash(IdDictionary),
    GetTrashView,
    SetTrashView(TrashView),
    Download(IdDictionary),
}

/// Operations that failure injection can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List(Level),
    Transfer,
    Trash,
    GetTrashView,
    SetTrashView,
    Download,
}

#[derive(Default)]
struct State {
    listings: HashMap<(Level, Option<u64>), Vec<Row>>,
    calls: Vec<Call>,
    failures: HashMap<Op, ServiceError>,
    trash_view: TrashView,
    transfer_outcome: TransferOutcome,
    holds: HashMap<Level, Arc<Semaphore>>,
}

#[derive(Default)]
pub struct FakeDataService {
    state: Mutex<State>,
}

/// Shorthand for a row at `level` with one display cell.
pub fn row(level: Level, id: u64) -> Row {
    Row::new(RowId::new(level, id), vec![format!("{}_{}", level.key(), id)])
}

impl FakeDataService {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Serve `rows` when listing `level` under `parent`.
    pub fn with_listing(self, level: Level, parent: Option<u64>, rows: Vec<Row>) -> Self {
        self.set_listing(level, parent, rows);
        self
    }

    pub fn with_trash_view(self, view: TrashView) -> Self {
        self.state().trash_view = view;
        self
    }

    pub fn set_listing(&self, level: Level, parent: Option<u64>, rows: Vec<Row>) {
        self.state().listings.insert((level, parent), rows);
    }

    /// Make every subsequent `op` fail with `error` until cleared.
    pub fn fail(&self, op: Op, error: ServiceError) {
        self.state().failures.insert(op, error);
    }

    pub fn succeed(&self, op: Op) {
        self.state().failures.remove(&op);
    }

    pub fn set_transfer_outcome(&self, outcome: TransferOutcome) {
        self.state().transfer_outcome = outcome;
    }

    pub fn current_trash_view(&self) -> TrashView {
        self.state().trash_view
    }

    /// Block list calls for `level` until [`Self::release`] is called.
    /// The call is still recorded when it arrives.
    pub fn hold(&self, level: Level) {
        self.state()
            .holds
            .insert(level, Arc::new(Semaphore::new(0)));
    }

    /// Let one held list call for `level` proceed.
    pub fn release(&self, level: Level) {
        if let Some(gate) = self.state().holds.get(&level) {
            gate.add_permits(1);
        }
    }

    /// Stop holding `level` and let every waiting call through.
    pub fn unhold(&self, level: Level) {
        if let Some(gate) = self.state().holds.remove(&level) {
            gate.add_permits(Semaphore::MAX_PERMITS / 2);
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// List calls only, as `(level, parent)`.
    pub fn list_calls(&self) -> Vec<(Level, Option<u64>)> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::List { level, parent } => Some((*level, *parent)),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    fn record(&self, call: Call, op: Op) -> Result<(), ServiceError> {
        let mut state = self.state();
        state.calls.push(call);
        match state.failures.get(&op) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DataService for FakeDataService {
    async fn list(&self, level: Level, parent: Option<u64>) -> Result<Vec<Row>, ServiceError> {
        let gate = {
            let mut state = self.state();
            state.calls.push(Call::List { level, parent });
            state.holds.get(&level).cloned()
        };
        if let Some(gate) = gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| ServiceError::Transport(e.to_string()))?;
            permit.forget();
        }
        let state = self.state();
        if let Some(error) = state.failures.get(&Op::List(level)) {
            return Err(error.clone());
        }
        Ok(state
            .listings
            .get(&(level, parent))
            .cloned()
            .unwrap_or_default())
    }

    async fn transfer_sessions(
        &self,
        sessions: &[u64],
        experiment: u64,
    ) -> Result<TransferOutcome, ServiceError> {
        self.record(
            Call::Transfer {
                sessions: sessions.to_vec(),
                experiment,
            },
            Op::Transfer,
        )?;
        let mut state = self.state();
        let mut moved = Vec::new();
        for ((level, _), rows) in state.listings.iter_mut() {
            if *level == Level::Session {
                rows.retain(|row| {
                    let keep = !sessions.contains(&row.id.id);
                    if !keep {
                        moved.push(row.clone());
                    }
                    keep
                });
            }
        }
        state
            .listings
            .entry((Level::Session, Some(experiment)))
            .or_default()
            .extend(moved);
        Ok(state.transfer_outcome)
    }

    async fn trash(&self, ids: &IdDictionary) -> Result<(), ServiceError> {
        self.record(Call::Trash(ids.clone()), Op::Trash)?;
        let mut state = self.state();
        for ((level, _), rows) in state.listings.iter_mut() {
            let doomed = ids.ids(*level);
            rows.retain(|row| !doomed.contains(&row.id.id));
        }
        Ok(())
    }

    async fn trash_view(&self) -> Result<TrashView, ServiceError> {
        self.record(Call::GetTrashView, Op::GetTrashView)?;
        Ok(self.state().trash_view)
    }

    async fn set_trash_view(&self, view: TrashView) -> Result<(), ServiceError> {
        self.record(Call::SetTrashView(view), Op::SetTrashView)?;
        self.state().trash_view = view;
        Ok(())
    }

    async fn download(&self, ids: &IdDictionary) -> Result<(), ServiceError> {
        self.record(Call::Download(ids.clone()), Op::Download)
    }
}
