/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Integration tests that exercise the binary end to end (keys → App →
//! Driver → FakeDataService → render). Per-module unit tests for the
//! browser itself live in the library.

use std::sync::Arc;

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use nims_browse::BrowserOptions;
use nims_browse::Driver;
use nims_browse::Level;
use nims_browse::RowId;
use nims_browse::ServiceError;
use nims_browse::TrashView;
use nims_browse::test_utils::Call;
use nims_browse::test_utils::FakeDataService;
use nims_browse::test_utils::Op;
use nims_browse::test_utils::row;
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use super::*;

fn hierarchy() -> Arc<FakeDataService> {
    Arc::new(
        FakeDataService::new()
            .with_listing(
                Level::Experiment,
                None,
                vec![
                    row(Level::Experiment, 1).with_access_mg(true),
                    row(Level::Experiment, 2),
                    row(Level::Experiment, 3)
                        .with_access_mg(true)
                        .with_trash(true),
                ],
            )
            .with_listing(Level::Session, Some(1), vec![row(Level::Session, 7)])
            .with_listing(Level::Session, Some(3), vec![row(Level::Session, 30)])
            .with_listing(Level::Epoch, Some(7), vec![row(Level::Epoch, 40)])
            .with_listing(
                Level::Dataset,
                Some(40),
                vec![row(Level::Dataset, 400), row(Level::Dataset, 401)],
            ),
    )
}

async fn app_with(fake: &Arc<FakeDataService>, options: BrowserOptions) -> App {
    let mut driver = Driver::start(fake.clone(), options).await;
    driver.settle().await;
    driver.browser_mut().set_focus(Level::Experiment);
    App::new("http://nims.test".to_string(), driver, ThemeName::Nord)
}

async fn app(fake: &Arc<FakeDataService>) -> App {
    app_with(fake, BrowserOptions::default()).await
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Feed one key through the app and run everything it started.
async fn press(app: &mut App, code: KeyCode) {
    if let KeyResult::Effects(effects) = app.on_key(key(code)) {
        app.driver.dispatch(effects);
    }
    app.driver.settle().await;
}

async fn press_all(app: &mut App, codes: &[KeyCode]) {
    for code in codes {
        press(app, *code).await;
    }
}

/// Enter on exp_1, sess_7 and epoch_40, moving right after each.
async fn walk_to_datasets(app: &mut App) {
    press_all(
        app,
        &[
            KeyCode::Enter,
            KeyCode::Right,
            KeyCode::Enter,
            KeyCode::Right,
            KeyCode::Enter,
            KeyCode::Right,
        ],
    )
    .await;
}

fn screen(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(140, 16)).unwrap();
    terminal.draw(|frame| ui(frame, app)).unwrap();
    let buf = terminal.backend().buffer();
    (0..buf.area.height)
        .map(|y| {
            (0..buf.area.width)
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn selected(app: &App, level: Level) -> Vec<u64> {
    app.browser()
        .panel(level)
        .selected_ids()
        .iter()
        .map(|id| id.id)
        .collect()
}

// Startup shows the experiments and hides everything else.
#[tokio::test]
async fn startup_renders_experiments_only() {
    let fake = hierarchy();
    let app = app(&fake).await;
    let text = screen(&app);
    assert!(text.contains("Experiments (3)"), "{}", text);
    assert!(text.contains("exp_1"));
    assert!(text.contains("exp_3 [trash]"));
    assert!(text.contains("select one row to the left"));
    assert!(text.contains("view:active"));
    assert!(text.contains("focus:Experiments"));
    assert!(text.contains("export:off"));
    assert!(text.contains("http://nims.test"));
}

// Enter and Right walk the hierarchy down to datasets.
#[tokio::test]
async fn enter_and_right_walk_the_hierarchy() {
    let fake = hierarchy();
    let mut app = app(&fake).await;
    walk_to_datasets(&mut app).await;

    assert_eq!(
        fake.list_calls(),
        vec![
            (Level::Experiment, None),
            (Level::Session, Some(1)),
            (Level::Epoch, Some(7)),
            (Level::Dataset, Some(40)),
        ]
    );
    assert_eq!(app.browser().focus(), Some(Level::Dataset));
    let text = screen(&app);
    assert!(text.contains("Datasets (2)"));
    assert!(text.contains("dataset_401"));
    assert!(text.contains("focus:Datasets"));
}

// Down selects the next experiment and replaces the sessions.
#[tokio::test]
async fn arrows_select_and_cascade() {
    let fake = hierarchy();
    let mut app = app(&fake).await;
    press_all(&mut app, &[KeyCode::Enter, KeyCode::Down, KeyCode::Char('j')]).await;

    assert_eq!(selected(&app, Level::Experiment), vec![3]);
    let sessions = app.browser().panel(Level::Session);
    assert!(sessions.is_visible());
    assert_eq!(sessions.rows().len(), 1);
    assert!(screen(&app).contains("sess_30"));
}

// Space clears or widens the selection and everything right collapses.
#[tokio::test]
async fn toggling_collapses_descendants() {
    let fake = hierarchy();
    let mut app = app(&fake).await;
    walk_to_datasets(&mut app).await;
    press_all(&mut app, &[KeyCode::Char('1'), KeyCode::Char(' ')]).await;
    assert!(selected(&app, Level::Experiment).is_empty());
    for level in Level::Experiment.descendants() {
        assert!(!app.browser().panel(level).is_visible());
    }

    press(&mut app, KeyCode::Down).await;
    assert_eq!(selected(&app, Level::Experiment), vec![2]);
    assert!(app.browser().panel(Level::Session).is_visible());

    // Refocusing puts the cursor back on exp_1 without selecting it.
    press_all(
        &mut app,
        &[KeyCode::Char('2'), KeyCode::Char('1'), KeyCode::Char(' ')],
    )
    .await;
    assert_eq!(selected(&app, Level::Experiment), vec![1, 2]);
    assert!(!app.browser().panel(Level::Session).is_visible());
}

// Pick up a session, aim at the other managed experiment, drop.
#[tokio::test]
async fn sessions_move_with_pick_up_aim_and_enter() {
    let fake = hierarchy();
    let mut app = app(&fake).await;
    walk_to_datasets(&mut app).await;
    press(&mut app, KeyCode::Char('2')).await;
    press(&mut app, KeyCode::Char('m')).await;
    assert!(screen(&app).contains("carrying sess_7"));

    press(&mut app, KeyCode::Tab).await;
    assert_eq!(app.browser().focus(), Some(Level::Experiment));
    assert_eq!(app.focused_row(), Some(RowId::new(Level::Experiment, 3)));
    assert_eq!(selected(&app, Level::Experiment), vec![1]);

    fake.clear_calls();
    press(&mut app, KeyCode::Enter).await;
    assert_eq!(
        fake.calls(),
        vec![Call::Transfer {
            sessions: vec![7],
            experiment: 3
        }]
    );
    let browser = app.browser();
    assert!(browser.drag().is_none());
    assert!(browser.panel(Level::Session).rows().is_empty());
    assert!(!browser.panel(Level::Epoch).is_visible());
    assert!(!browser.panel(Level::Dataset).is_visible());
    assert!(screen(&app).contains("info: moved 1 session(s) to exp_3"));
}

// Tab with nothing aimable warns instead.
#[tokio::test]
async fn aiming_without_a_session_drag_warns() {
    let fake = hierarchy();
    let mut app = app(&fake).await;
    press_all(&mut app, &[KeyCode::Char('m'), KeyCode::Tab]).await;
    assert!(screen(&app).contains("warning: no experiment accepts these rows"));
    press(&mut app, KeyCode::Esc).await;
    assert!(app.browser().drag().is_none());
}

// Trash drops all the way to the server and the listing reloads.
#[tokio::test]
async fn trash_key_trashes_and_reloads() {
    let fake = hierarchy();
    let mut app = app(&fake).await;
    walk_to_datasets(&mut app).await;
    press_all(&mut app, &[KeyCode::Enter, KeyCode::Char('m')]).await;

    fake.clear_calls();
    press(&mut app, KeyCode::Char('t')).await;
    assert!(matches!(fake.calls().first(), Some(Call::Trash(_))));
    assert!(fake.list_calls().contains(&(Level::Experiment, None)));

    let datasets = app.browser().panel(Level::Dataset);
    assert!(datasets.is_visible());
    let ids: Vec<u64> = datasets.rows().iter().map(|r| r.id.id).collect();
    assert_eq!(ids, vec![401]);
}

// A rejected trash leaves every panel as it was and does not reload.
#[tokio::test]
async fn failed_trash_keeps_panels_and_reports() {
    let fake = hierarchy();
    let mut app = app(&fake).await;
    walk_to_datasets(&mut app).await;
    press_all(&mut app, &[KeyCode::Enter, KeyCode::Char('m')]).await;

    fake.fail(Op::Trash, ServiceError::Rejected);
    fake.clear_calls();
    press(&mut app, KeyCode::Char('t')).await;
    assert!(matches!(fake.calls().as_slice(), [Call::Trash(_)]));
    assert!(fake.list_calls().is_empty());

    assert_eq!(selected(&app, Level::Experiment), vec![1]);
    assert_eq!(selected(&app, Level::Session), vec![7]);
    assert_eq!(selected(&app, Level::Epoch), vec![40]);
    assert_eq!(selected(&app, Level::Dataset), vec![400]);
    let ids: Vec<u64> = app
        .browser()
        .panel(Level::Dataset)
        .rows()
        .iter()
        .map(|r| r.id.id)
        .collect();
    assert_eq!(ids, vec![400, 401]);
    assert!(app.browser().is_idle());
    assert!(screen(&app).contains("error: trash failed"));
}

// Export is notify-only unless enabled on the command line.
#[tokio::test]
async fn export_respects_configuration() {
    let fake = hierarchy();
    let mut app = app(&fake).await;
    press_all(&mut app, &[KeyCode::Char('m'), KeyCode::Char('x')]).await;
    assert!(!fake.calls().iter().any(|c| matches!(c, Call::Download(_))));
    assert!(screen(&app).contains("export is disabled"));

    let fake = hierarchy();
    let mut app = app_with(
        &fake,
        BrowserOptions {
            download_enabled: true,
        },
    )
    .await;
    press_all(&mut app, &[KeyCode::Char('m'), KeyCode::Char('x')]).await;
    assert!(fake.calls().iter().any(|c| matches!(c, Call::Download(_))));
    assert!(!screen(&app).contains("export:off"));
}

// `v` flips the trash view; a rejected flip leaves it alone.
#[tokio::test]
async fn trash_view_key_switches_and_survives_rejection() {
    let fake = hierarchy();
    let mut app = app(&fake).await;
    press(&mut app, KeyCode::Char('v')).await;
    assert_eq!(app.browser().trash_view(), TrashView::Trash);
    assert!(screen(&app).contains("view:trash"));

    fake.fail(Op::SetTrashView, ServiceError::Rejected);
    fake.clear_calls();
    press(&mut app, KeyCode::Char('v')).await;
    assert_eq!(fake.calls(), vec![Call::SetTrashView(TrashView::Active)]);
    assert_eq!(app.browser().trash_view(), TrashView::Trash);
    assert!(screen(&app).contains("error: set-trash-view failed"));
}

// Loading panels carry a glyph in their title until the rows arrive.
#[tokio::test]
async fn loading_glyph_shows_while_held() {
    let fake = hierarchy();
    let mut app = app(&fake).await;
    fake.hold(Level::Session);
    if let KeyResult::Effects(effects) = app.on_key(key(KeyCode::Enter)) {
        app.driver.dispatch(effects);
    }
    assert!(screen(&app).contains("⟳ Sessions (0)"));

    fake.unhold(Level::Session);
    app.driver.settle().await;
    let text = screen(&app);
    assert!(text.contains("Sessions (1)"));
    assert!(!text.contains("⟳"));
}

// Reload re-lists from the top.
#[tokio::test]
async fn reload_key_lists_again() {
    let fake = hierarchy();
    let mut app = app(&fake).await;
    fake.set_listing(Level::Experiment, None, vec![row(Level::Experiment, 9)]);
    press(&mut app, KeyCode::Char('r')).await;
    assert!(screen(&app).contains("Experiments (1)"));
    assert!(screen(&app).contains("exp_9"));
}

// Arrow keys are consumed even when they cannot do anything.
#[tokio::test]
async fn arrows_on_hidden_panels_are_noops() {
    let fake = hierarchy();
    let mut app = app(&fake).await;
    assert_eq!(app.on_key(key(KeyCode::Char('4'))), KeyResult::None);
    assert_eq!(app.browser().focus(), Some(Level::Dataset));
    assert_eq!(app.on_key(key(KeyCode::Down)), KeyResult::None);
    assert_eq!(app.on_key(key(KeyCode::Right)), KeyResult::None);
    assert_eq!(app.browser().focus(), Some(Level::Dataset));
    assert_eq!(app.focused_row(), None);
    assert_eq!(app.on_key(key(KeyCode::Enter)), KeyResult::None);
}

#[tokio::test]
async fn quit_keys() {
    let fake = hierarchy();
    let mut app = app(&fake).await;
    assert_eq!(app.on_key(key(KeyCode::Char('z'))), KeyResult::None);
    assert!(!app.should_quit);
    app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);

    let mut app = self::app(&fake).await;
    app.on_key(key(KeyCode::Char('q')));
    assert!(app.should_quit);
}

// Non-default themes are called out in the header.
#[tokio::test]
async fn light_theme_renders() {
    let fake = hierarchy();
    let driver = Driver::start(fake.clone(), BrowserOptions::default()).await;
    let mut app = App::new("nims.test".to_string(), driver, ThemeName::DoomNordLight);
    app.driver.settle().await;
    let text = screen(&app);
    assert!(text.contains("theme:doom-nord-light"));
    assert!(text.contains("focus:none"));
    assert!(text.contains("Experiments (3)"));
}
