/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use crate::id_dict::IdDictionary;
use crate::level::Level;
use crate::panel::Row;
use crate::service::ServiceError;
use crate::service::TransferOutcome;
use crate::service::TrashView;

/// Work the browser asks the outside world to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// List rows for `level` under `parent`, tagged with the panel
    /// generation current when it was issued.
    Fetch {
        level: Level,
        parent: Option<u64>,
        generation: u64,
    },
    /// The in-flight fetch for `level` is no longer wanted.
    Cancel { level: Level },
    /// Run a mutation; its completion is matched back by `ticket`.
    Mutate { ticket: u64, mutation: Mutation },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Transfer { sessions: Vec<u64>, experiment: u64 },
    Trash(IdDictionary),
    SetTrashView(TrashView),
    Download(IdDictionary),
}

impl Mutation {
    pub fn describe(&self) -> &'static str {
        match self {
            Mutation::Transfer { .. } => "transfer",
            Mutation::Trash(_) => "trash",
            Mutation::SetTrashView(_) => "set-trash-view",
            Mutation::Download(_) => "download",
        }
    }
}

/// Successful mutation payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationReply {
    Transferred(TransferOutcome),
    Done,
}

/// Result of an effect, fed back into the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Fetched {
        level: Level,
        generation: u64,
        result: Result<Vec<Row>, ServiceError>,
    },
    Mutated {
        ticket: u64,
        result: Result<MutationReply, ServiceError>,
    },
}
