/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;

use crate::App;
use crate::theme::ThemeName;

/// Render the top status/header bar.
///
/// Line 1: app name • URL • view mode (with any pending switch) •
/// focused panel, plus non-default theme and export state.
/// Line 2: what is being carried, if anything.
pub(crate) fn render_header(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let l = &app.theme.labels;
    let s = &app.theme.scheme;
    let browser = app.browser();

    let mut line1_spans = vec![
        Span::styled(l.app_name, s.app_name),
        Span::styled(l.separator, s.stat_label),
        Span::styled(&app.base_url, s.stat_url),
        Span::styled(l.separator, s.stat_label),
        Span::styled(l.view, s.stat_label),
        Span::styled(browser.trash_view().to_string(), s.stat_value),
    ];

    if let Some(pending) = browser.pending_trash_view() {
        line1_spans.extend(vec![
            Span::styled(l.pending_arrow, s.stat_pending),
            Span::styled(pending.to_string(), s.stat_pending),
        ]);
    }

    let focus = browser
        .focus()
        .map_or(l.no_focus, |level| level.title());
    line1_spans.extend(vec![
        Span::styled(l.separator, s.stat_label),
        Span::styled(l.focus, s.stat_label),
        Span::styled(focus, s.stat_value),
    ]);

    // Skip defaults to reduce noise.
    if !matches!(app.theme_name, ThemeName::Nord) {
        line1_spans.extend(vec![
            Span::styled(l.separator, s.stat_label),
            Span::styled(format!("theme:{}", app.theme_name), s.stat_label),
        ]);
    }
    if !browser.options().download_enabled {
        line1_spans.extend(vec![
            Span::styled(l.separator, s.stat_label),
            Span::styled(l.export_off, s.stat_label),
        ]);
    }

    let mut line2_spans = vec![];
    if let Some(drag) = browser.drag() {
        let rows: Vec<String> = drag.rows.iter().map(ToString::to_string).collect();
        line2_spans.extend(vec![
            Span::styled(l.carrying, s.stat_drag),
            Span::styled(rows.join(", "), s.stat_value),
            Span::styled(l.drop_help, s.stat_label),
        ]);
    }

    let header = Paragraph::new(vec![Line::from(line1_spans), Line::from(line2_spans)]).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(s.border),
    );
    frame.render_widget(header, area);
}

/// Render the footer: the most recent notification above the key
/// help line.
pub(crate) fn render_footer(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let s = &app.theme.scheme;
    let l = &app.theme.labels;

    let latest = match app.browser().notifications().latest() {
        Some(n) => Line::from(Span::styled(n.to_string(), s.severity_style(n.severity))),
        None => Line::default(),
    };
    let help = Line::from(Span::styled(l.footer_help_text, s.footer_help));

    let footer = Paragraph::new(vec![latest, help]).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(s.border),
    );
    frame.render_widget(footer, area);
}
