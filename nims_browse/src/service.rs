/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The remote data service as seen by the browser.
//!
//! [`DataService`] is the seam between the state machine and the
//! network: the dispatcher drives it, [`crate::http::HttpDataService`]
//! implements it over HTTP, and [`crate::test_utils::FakeDataService`]
//! implements it in memory.

use std::fmt;

use async_trait::async_trait;

use crate::id_dict::IdDictionary;
use crate::level::Level;
use crate::panel::Row;

/// Why a service call did not succeed.
///
/// Every variant is terminal for the operation that produced it: the
/// browser reports it and leaves panel state untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    /// The server answered with `success: false`.
    #[error("rejected by server")]
    Rejected,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Which rows the server lists: live ones or trashed ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TrashView {
    #[default]
    Active,
    Trash,
}

impl TrashView {
    /// Wire flag (`0` = active, `1` = trash).
    pub fn flag(self) -> u8 {
        match self {
            TrashView::Active => 0,
            TrashView::Trash => 1,
        }
    }

    pub fn from_flag(flag: u64) -> Option<TrashView> {
        match flag {
            0 => Some(TrashView::Active),
            1 => Some(TrashView::Trash),
            _ => None,
        }
    }

    pub fn toggled(self) -> TrashView {
        match self {
            TrashView::Active => TrashView::Trash,
            TrashView::Trash => TrashView::Active,
        }
    }
}

impl fmt::Display for TrashView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrashView::Active => f.write_str("active"),
            TrashView::Trash => f.write_str("trash"),
        }
    }
}

/// Server reply to a successful session transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferOutcome {
    /// The target experiment was in the trash and no longer is.
    pub untrashed: bool,
}

#[async_trait]
pub trait DataService: Send + Sync + 'static {
    /// List rows at `level`. `parent` is the numeric id of the single
    /// selected parent row, and `None` only for experiments.
    async fn list(&self, level: Level, parent: Option<u64>) -> Result<Vec<Row>, ServiceError>;

    /// Move sessions under another experiment.
    async fn transfer_sessions(
        &self,
        sessions: &[u64],
        experiment: u64,
    ) -> Result<TransferOutcome, ServiceError>;

    /// Send rows at any level to the trash (or back, in trash view).
    async fn trash(&self, ids: &IdDictionary) -> Result<(), ServiceError>;

    /// Read the persisted trash-view mode.
    async fn trash_view(&self) -> Result<TrashView, ServiceError>;

    /// Persist a new trash-view mode.
    async fn set_trash_view(&self, view: TrashView) -> Result<(), ServiceError>;

    /// Request an export of the given rows.
    async fn download(&self, ids: &IdDictionary) -> Result<(), ServiceError>;
}
