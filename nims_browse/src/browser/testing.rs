/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Synchronous fixtures for browser unit tests: a static hierarchy and
//! a pump that answers fetches from it in issue order.

use std::collections::HashMap;
use std::collections::VecDeque;

use super::Browser;
use super::BrowserOptions;
use crate::effect::Completion;
use crate::effect::Effect;
use crate::level::Level;
use crate::level::RowId;
use crate::panel::Row;
use crate::service::TrashView;
use crate::test_utils::row;

pub fn exp_id(id: u64) -> RowId {
    RowId::new(Level::Experiment, id)
}

pub fn sess_id(id: u64) -> RowId {
    RowId::new(Level::Session, id)
}

pub fn epoch_id(id: u64) -> RowId {
    RowId::new(Level::Epoch, id)
}

pub fn dataset_id(id: u64) -> RowId {
    RowId::new(Level::Dataset, id)
}

pub fn ids(browser: &Browser, level: Level) -> Vec<u64> {
    browser
        .panel(level)
        .rows()
        .iter()
        .map(|row| row.id.id)
        .collect()
}

/// Generation of the first fetch in `effects`.
pub fn fetch_generation(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Fetch { generation, .. } => Some(*generation),
            _ => None,
        })
        .expect("no fetch issued")
}

pub struct World {
    listings: HashMap<(Level, Option<u64>), Vec<Row>>,
}

impl World {
    /// `exp_1` (managed), `exp_2` (unmanaged), `exp_3` (managed,
    /// trashed); `exp_1` holds `sess_7` and `sess_8`; `sess_7` holds
    /// `epoch_40`, which holds `dataset_400` and `dataset_401`.
    pub fn standard() -> Self {
        Self::with_sessions(vec![row(Level::Session, 7), row(Level::Session, 8)])
    }

    /// As [`World::standard`] but `exp_1` holds only `sess_7`.
    pub fn single_session() -> Self {
        Self::with_sessions(vec![row(Level::Session, 7)])
    }

    fn with_sessions(sessions: Vec<Row>) -> Self {
        let mut listings = HashMap::new();
        listings.insert(
            (Level::Experiment, None),
            vec![
                row(Level::Experiment, 1).with_access_mg(true),
                row(Level::Experiment, 2),
                row(Level::Experiment, 3)
                    .with_access_mg(true)
                    .with_trash(true),
            ],
        );
        listings.insert((Level::Session, Some(1)), sessions);
        listings.insert((Level::Session, Some(3)), vec![row(Level::Session, 30)]);
        listings.insert((Level::Epoch, Some(7)), vec![row(Level::Epoch, 40)]);
        listings.insert(
            (Level::Dataset, Some(40)),
            vec![row(Level::Dataset, 400), row(Level::Dataset, 401)],
        );
        Self { listings }
    }

    /// Answer every fetch reachable from `effects`, in order. Returns
    /// the mutations left for the caller; cancels are dropped.
    pub fn pump(&self, browser: &mut Browser, effects: Vec<Effect>) -> Vec<Effect> {
        let mut queue: VecDeque<Effect> = effects.into();
        let mut rest = Vec::new();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Fetch {
                    level,
                    parent,
                    generation,
                } => {
                    let rows = self
                        .listings
                        .get(&(level, parent))
                        .cloned()
                        .unwrap_or_default();
                    queue.extend(browser.apply(Completion::Fetched {
                        level,
                        generation,
                        result: Ok(rows),
                    }));
                }
                Effect::Cancel { .. } => {}
                mutate @ Effect::Mutate { .. } => rest.push(mutate),
            }
        }
        rest
    }

    pub fn reloaded_with(&self, options: BrowserOptions) -> Browser {
        let mut browser = Browser::new(TrashView::Active, options);
        let effects = browser.reload();
        self.pump(&mut browser, effects);
        browser
    }

    pub fn reloaded(&self) -> Browser {
        self.reloaded_with(BrowserOptions::default())
    }

    /// Reloaded, then `exp_1`, `sess_7` and `epoch_40` selected so all
    /// four panels are visible.
    pub fn fully_loaded(&self) -> Browser {
        let mut browser = self.reloaded();
        for id in [exp_id(1), sess_id(7), epoch_id(40)] {
            let effects = browser.select_only(id);
            self.pump(&mut browser, effects);
        }
        assert!(browser.panel(Level::Dataset).is_visible());
        browser
    }
}
