/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::io;

use anyhow::Context;
use crossterm::event::Event;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use futures::StreamExt;
use nims_browse::Arrow;
use nims_browse::Browser;
use nims_browse::Driver;
use nims_browse::DropTarget;
use nims_browse::Effect;
use nims_browse::Level;
use nims_browse::RowId;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::Theme;
use crate::ThemeName;
use crate::render::ui;

/// Outcome of a key press.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum KeyResult {
    /// Nothing to run.
    None,
    /// The browser asked for work; hand it to the dispatcher.
    Effects(Vec<Effect>),
}

impl From<Vec<Effect>> for KeyResult {
    fn from(effects: Vec<Effect>) -> Self {
        if effects.is_empty() {
            KeyResult::None
        } else {
            KeyResult::Effects(effects)
        }
    }
}

/// Runtime state for the browse TUI.
pub(crate) struct App {
    /// Base URL of the NIMS server, shown in the header.
    pub(crate) base_url: String,
    /// Browser state machine plus its effect dispatcher.
    pub(crate) driver: Driver,
    /// Set when the user requests exit (`q` / `Ctrl-C`).
    pub(crate) should_quit: bool,
    pub(crate) theme: Theme,
    pub(crate) theme_name: ThemeName,
}

impl App {
    pub(crate) fn new(base_url: String, driver: Driver, theme_name: ThemeName) -> Self {
        Self {
            base_url,
            driver,
            should_quit: false,
            theme: Theme::new(theme_name),
            theme_name,
        }
    }

    pub(crate) fn browser(&self) -> &Browser {
        self.driver.browser()
    }

    fn browser_mut(&mut self) -> &mut Browser {
        self.driver.browser_mut()
    }

    /// Row under the focused panel's cursor, if that panel is showing.
    pub(crate) fn focused_row(&self) -> Option<RowId> {
        let panel = self.browser().panel(self.browser().focus()?);
        if !panel.is_visible() {
            return None;
        }
        panel.cursor_row().map(|row| row.id)
    }

    /// Map a key press onto a browser operation.
    ///
    /// Arrow keys (and their vi aliases) always go to the browser,
    /// even when they do nothing.
    pub(crate) fn on_key(&mut self, key: KeyEvent) -> KeyResult {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                KeyResult::None
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                KeyResult::None
            }
            KeyCode::Up | KeyCode::Char('k') => self.browser_mut().on_arrow(Arrow::Up).into(),
            KeyCode::Down | KeyCode::Char('j') => self.browser_mut().on_arrow(Arrow::Down).into(),
            KeyCode::Left | KeyCode::Char('h') => self.browser_mut().on_arrow(Arrow::Left).into(),
            KeyCode::Right | KeyCode::Char('l') => {
                self.browser_mut().on_arrow(Arrow::Right).into()
            }
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.browser_mut().set_focus(Level::ALL[index]);
                KeyResult::None
            }
            KeyCode::Char(' ') => match self.focused_row() {
                Some(id) => self.browser_mut().toggle_selection(id).into(),
                None => KeyResult::None,
            },
            KeyCode::Enter => {
                let Some(id) = self.focused_row() else {
                    return KeyResult::None;
                };
                if self.browser().drag().is_some() && id.level == Level::Experiment {
                    self.browser_mut()
                        .drop_on(DropTarget::Experiment(id))
                        .into()
                } else {
                    self.browser_mut().select_only(id).into()
                }
            }
            KeyCode::Char('m') => {
                if !self.browser_mut().begin_drag() {
                    self.browser_mut()
                        .notifications_mut()
                        .warn("nothing to pick up here");
                }
                KeyResult::None
            }
            KeyCode::Tab => {
                if self.browser_mut().aim_drop().is_none() {
                    self.browser_mut()
                        .notifications_mut()
                        .warn("no experiment accepts these rows");
                }
                KeyResult::None
            }
            KeyCode::Char('t') => self.browser_mut().drop_on(DropTarget::Trash).into(),
            KeyCode::Char('x') => self.browser_mut().drop_on(DropTarget::Download).into(),
            KeyCode::Esc => {
                self.browser_mut().cancel_drag();
                KeyResult::None
            }
            KeyCode::Char('v') => self.browser_mut().toggle_trash_view().into(),
            KeyCode::Char('r') => self.browser_mut().reload().into(),
            _ => KeyResult::None,
        }
    }
}

/// Drive the main event loop for the browse TUI.
///
/// Renders every iteration, then waits for either a key press or a
/// completion from the dispatcher, until the user exits.
pub(crate) async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> anyhow::Result<()> {
    let mut events = EventStream::new();

    loop {
        terminal.draw(|frame| ui(frame, &app))?;

        tokio::select! {
            Some(completion) = app.driver.recv() => {
                app.driver.handle(completion);
            }
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if let KeyResult::Effects(effects) = app.on_key(key) {
                            app.driver.dispatch(effects);
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e).context("reading terminal events"),
                    None => break,
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
