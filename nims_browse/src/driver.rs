/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Glue between the [`Browser`] state machine and the [`Dispatcher`].
//!
//! The driver owns both halves plus the completion receiver. Front ends
//! call [`Driver::update`] with a browser operation, and feed each
//! completion they receive to [`Driver::handle`]. Tests and startup use
//! [`Driver::settle`] to run until nothing is outstanding.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::browser::Browser;
use crate::browser::BrowserOptions;
use crate::dispatch::Dispatcher;
use crate::effect::Completion;
use crate::effect::Effect;
use crate::service::DataService;

pub struct Driver {
    browser: Browser,
    dispatcher: Dispatcher,
    completions: mpsc::UnboundedReceiver<Completion>,
}

impl Driver {
    pub fn new(browser: Browser, service: Arc<dyn DataService>) -> Self {
        let (dispatcher, completions) = Dispatcher::new(service);
        Self {
            browser,
            dispatcher,
            completions,
        }
    }

    /// Read the trash-view mode, then issue the initial reload.
    pub async fn start(service: Arc<dyn DataService>, options: BrowserOptions) -> Self {
        let browser = Browser::bootstrap(service.as_ref(), options).await;
        let mut driver = Self::new(browser, service);
        driver.update(Browser::reload);
        driver
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut Browser {
        &mut self.browser
    }

    /// Run a browser operation and dispatch whatever it asks for.
    pub fn update<F>(&mut self, op: F)
    where
        F: FnOnce(&mut Browser) -> Vec<Effect>,
    {
        let effects = op(&mut self.browser);
        self.dispatch(effects);
    }

    pub fn dispatch(&mut self, effects: Vec<Effect>) {
        self.dispatcher.dispatch_all(effects);
    }

    pub async fn recv(&mut self) -> Option<Completion> {
        self.completions.recv().await
    }

    pub fn handle(&mut self, completion: Completion) {
        let effects = self.browser.apply(completion);
        self.dispatch(effects);
    }

    /// Process completions until the browser is idle.
    pub async fn settle(&mut self) {
        while !self.browser.is_idle() {
            match self.completions.recv().await {
                Some(completion) => self.handle(completion),
                None => break,
            }
        }
    }
}
