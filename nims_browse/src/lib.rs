/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Cascading browser for the Experiment → Session → Epoch → Dataset
//! hierarchy.
//!
//! Four linked panels, one per level. Selecting exactly one row in a
//! panel fetches and shows its children in the next panel; selecting
//! none or several collapses everything below. Rows can be moved
//! (sessions onto another experiment), trashed, or exported by drag
//! and drop.
//!
//! The crate is layered:
//!
//! - [`browser::Browser`] is a synchronous state machine. Input
//!   handlers and [`browser::Browser::apply`] return [`effect::Effect`]s
//!   instead of doing I/O.
//! - [`dispatch::Dispatcher`] runs effects as tokio tasks against a
//!   [`service::DataService`] and reports [`effect::Completion`]s.
//! - [`driver::Driver`] ties the two together.
//! - [`http::HttpDataService`] talks to the server;
//!   [`test_utils::FakeDataService`] stands in for it in tests.

pub mod browser;
pub mod cursor;
pub mod dispatch;
pub mod driver;
pub mod effect;
pub mod http;
pub mod id_dict;
pub mod level;
pub mod notify;
pub mod panel;
pub mod service;
pub mod test_utils;
pub mod wire;

pub use browser::Arrow;
pub use browser::Browser;
pub use browser::BrowserOptions;
pub use browser::Drag;
pub use browser::DropTarget;
pub use driver::Driver;
pub use effect::Completion;
pub use effect::Effect;
pub use id_dict::IdDictionary;
pub use level::Level;
pub use level::RowId;
pub use panel::Panel;
pub use panel::Row;
pub use service::DataService;
pub use service::ServiceError;
pub use service::TrashView;
