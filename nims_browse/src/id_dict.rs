/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde::ser::SerializeMap;

use crate::level::Level;
use crate::level::RowId;

/// Row ids grouped by level.
///
/// Each level's list keeps first-seen order and holds no duplicates.
/// Levels with no ids are absent rather than empty, so they are
/// omitted from mutation requests entirely.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdDictionary {
    groups: BTreeMap<Level, Vec<u64>>,
}

impl IdDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group `rows` by level.
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a RowId>,
    {
        rows.into_iter().copied().collect()
    }

    /// Add one id. Returns false if it was already present.
    pub fn insert(&mut self, row: RowId) -> bool {
        let ids = self.groups.entry(row.level).or_default();
        if ids.contains(&row.id) {
            return false;
        }
        ids.push(row.id);
        true
    }

    /// Ids recorded for `level`, in insertion order.
    pub fn ids(&self, level: Level) -> &[u64] {
        self.groups.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Levels that have at least one id, parent first.
    pub fn levels(&self) -> impl Iterator<Item = Level> + '_ {
        self.groups.keys().copied()
    }

    /// Flatten back into tagged ids, parent level first.
    pub fn row_ids(&self) -> impl Iterator<Item = RowId> + '_ {
        self.groups
            .iter()
            .flat_map(|(level, ids)| ids.iter().map(|id| RowId::new(*level, *id)))
    }

    /// Total number of ids across all levels.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Encode as repeated form fields keyed by level (`exp=1&exp=2&sess=9`).
    pub fn form_pairs(&self) -> Vec<(&'static str, String)> {
        self.row_ids()
            .map(|row| (row.level.key(), row.id.to_string()))
            .collect()
    }
}

impl FromIterator<RowId> for IdDictionary {
    fn from_iter<T: IntoIterator<Item = RowId>>(iter: T) -> Self {
        let mut dict = IdDictionary::new();
        for row in iter {
            dict.insert(row);
        }
        dict
    }
}

impl Serialize for IdDictionary {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (level, ids) in &self.groups {
            map.serialize_entry(level.key(), ids)?;
        }
        map.end()
    }
}

impl fmt::Display for IdDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(empty)");
        }
        for (i, (level, ids)) in self.groups.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {:?}", level.key(), ids)?;
        }
        Ok(())
    }
}
