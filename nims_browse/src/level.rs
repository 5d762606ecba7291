/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Hierarchy levels and level-tagged row identifiers.
//!
//! The wire encodes a row identity as `"<key>_<id>"` (e.g. `exp_12`).
//! That string is parsed exactly once, at the response boundary, into
//! a [`RowId`]; everything past the boundary works with the tagged
//! pair.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// One tier of the Experiment → Session → Epoch → Dataset hierarchy.
///
/// Variants are declared parent-first so the derived `Ord` is the
/// parent→child order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize
)]
pub enum Level {
    Experiment,
    Session,
    Epoch,
    Dataset,
}

impl Level {
    /// All levels, parent first.
    pub const ALL: [Level; 4] = [
        Level::Experiment,
        Level::Session,
        Level::Epoch,
        Level::Dataset,
    ];

    /// Position in [`Level::ALL`].
    pub fn index(self) -> usize {
        match self {
            Level::Experiment => 0,
            Level::Session => 1,
            Level::Epoch => 2,
            Level::Dataset => 3,
        }
    }

    /// Short key used in composite row ids and mutation requests.
    pub fn key(self) -> &'static str {
        match self {
            Level::Experiment => "exp",
            Level::Session => "sess",
            Level::Epoch => "epoch",
            Level::Dataset => "dataset",
        }
    }

    pub fn from_key(key: &str) -> Option<Level> {
        Level::ALL.into_iter().find(|level| level.key() == key)
    }

    /// Name of the `list_query` parameter that lists rows of this
    /// level (`exp_list`, `sess_list`, ...).
    pub fn list_param(self) -> &'static str {
        match self {
            Level::Experiment => "exp_list",
            Level::Session => "sess_list",
            Level::Epoch => "epoch_list",
            Level::Dataset => "dataset_list",
        }
    }

    /// Plural panel title.
    pub fn title(self) -> &'static str {
        match self {
            Level::Experiment => "Experiments",
            Level::Session => "Sessions",
            Level::Epoch => "Epochs",
            Level::Dataset => "Datasets",
        }
    }

    pub fn parent(self) -> Option<Level> {
        match self {
            Level::Experiment => None,
            Level::Session => Some(Level::Experiment),
            Level::Epoch => Some(Level::Session),
            Level::Dataset => Some(Level::Epoch),
        }
    }

    pub fn child(self) -> Option<Level> {
        match self {
            Level::Experiment => Some(Level::Session),
            Level::Session => Some(Level::Epoch),
            Level::Epoch => Some(Level::Dataset),
            Level::Dataset => None,
        }
    }

    /// Strict descendants, nearest first.
    pub fn descendants(self) -> impl Iterator<Item = Level> {
        std::iter::successors(self.child(), |level| level.child())
    }

    /// This level followed by its strict descendants.
    pub fn and_descendants(self) -> impl Iterator<Item = Level> {
        std::iter::successors(Some(self), |level| level.child())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A row identity: the level it lives at plus its numeric id.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize
)]
pub struct RowId {
    pub level: Level,
    pub id: u64,
}

impl RowId {
    pub fn new(level: Level, id: u64) -> Self {
        Self { level, id }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.level.key(), self.id)
    }
}

/// Failure to parse a composite `"<key>_<id>"` row key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseRowIdError {
    #[error("row key {0:?} has no '_' separator")]
    MissingSeparator(String),
    #[error("row key {0:?} names an unknown level")]
    UnknownLevel(String),
    #[error("row key {0:?} has a non-numeric id")]
    BadId(String),
}

impl FromStr for RowId {
    type Err = ParseRowIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, id) = s
            .split_once('_')
            .ok_or_else(|| ParseRowIdError::MissingSeparator(s.to_string()))?;
        let level =
            Level::from_key(key).ok_or_else(|| ParseRowIdError::UnknownLevel(s.to_string()))?;
        let id = id
            .parse::<u64>()
            .map_err(|_| ParseRowIdError::BadId(s.to_string()))?;
        Ok(RowId { level, id })
    }
}
