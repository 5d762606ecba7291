/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Runs [`Effect`]s against a [`DataService`].
//!
//! Each effect becomes one tokio task whose result is sent back as a
//! [`Completion`] on an unbounded channel. At most one fetch task per
//! level is alive: a new fetch, or an explicit [`Effect::Cancel`],
//! aborts the previous one. Mutation tasks are never aborted.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::effect::Completion;
use crate::effect::Effect;
use crate::effect::Mutation;
use crate::effect::MutationReply;
use crate::level::Level;
use crate::service::DataService;
use crate::service::ServiceError;

pub struct Dispatcher {
    service: Arc<dyn DataService>,
    completions: mpsc::UnboundedSender<Completion>,
    fetches: HashMap<Level, JoinHandle<()>>,
}

impl Dispatcher {
    pub fn new(
        service: Arc<dyn DataService>,
    ) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (completions, rx) = mpsc::unbounded_channel();
        (
            Self {
                service,
                completions,
                fetches: HashMap::new(),
            },
            rx,
        )
    }

    pub fn dispatch_all(&mut self, effects: impl IntoIterator<Item = Effect>) {
        for effect in effects {
            self.dispatch(effect);
        }
    }

    pub fn dispatch(&mut self, effect: Effect) {
        match effect {
            Effect::Fetch {
                level,
                parent,
                generation,
            } => {
                self.abort(level);
                let service = Arc::clone(&self.service);
                let tx = self.completions.clone();
                let task = tokio::spawn(async move {
                    let result = service.list(level, parent).await;
                    if let Err(error) = &result {
                        tracing::warn!(%level, ?parent, %error, "list failed");
                    }
                    // The receiver is gone only during shutdown.
                    let _ = tx.send(Completion::Fetched {
                        level,
                        generation,
                        result,
                    });
                });
                self.fetches.insert(level, task);
            }
            Effect::Cancel { level } => self.abort(level),
            Effect::Mutate { ticket, mutation } => {
                let service = Arc::clone(&self.service);
                let tx = self.completions.clone();
                tokio::spawn(async move {
                    let kind = mutation.describe();
                    let result = run_mutation(service.as_ref(), mutation).await;
                    match &result {
                        Ok(_) => tracing::info!(ticket, mutation = kind, "mutation succeeded"),
                        Err(error) => {
                            tracing::warn!(ticket, mutation = kind, %error, "mutation failed")
                        }
                    }
                    let _ = tx.send(Completion::Mutated { ticket, result });
                });
            }
        }
    }

    fn abort(&mut self, level: Level) {
        if let Some(task) = self.fetches.remove(&level) {
            if !task.is_finished() {
                tracing::debug!(%level, "aborting superseded fetch");
            }
            task.abort();
        }
    }

    /// Abort every in-flight fetch.
    pub fn shutdown(&mut self) {
        for (_, task) in self.fetches.drain() {
            task.abort();
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_mutation(
    service: &dyn DataService,
    mutation: Mutation,
) -> Result<MutationReply, ServiceError> {
    match mutation {
        Mutation::Transfer {
            sessions,
            experiment,
        } => service
            .transfer_sessions(&sessions, experiment)
            .await
            .map(MutationReply::Transferred),
        Mutation::Trash(ids) => service.trash(&ids).await.map(|()| MutationReply::Done),
        Mutation::SetTrashView(view) => service
            .set_trash_view(view)
            .await
            .map(|()| MutationReply::Done),
        Mutation::Download(ids) => service.download(&ids).await.map(|()| MutationReply::Done),
    }
}
