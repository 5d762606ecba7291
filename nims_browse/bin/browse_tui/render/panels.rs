/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use nims_browse::Level;
use nims_browse::Panel;
use nims_browse::Row;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::ListState;
use ratatui::widgets::Paragraph;

use crate::App;

/// Render one level's panel.
///
/// The title carries the level name, the row count and a loading
/// glyph while a fetch is outstanding. A hidden panel shows only a
/// hint. Rows are striped, and style precedence is
/// selected > drop target > trashed > stripe.
pub(crate) fn render_panel(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App, level: Level) {
    let browser = app.browser();
    let panel = browser.panel(level);
    let scheme = &app.theme.scheme;
    let labels = &app.theme.labels;
    let focused = browser.focus() == Some(level);

    let loading = if panel.is_loading() {
        labels.loading_icon
    } else {
        ""
    };
    let title = format!(
        " {}{} ({}) ",
        loading,
        level.title(),
        panel.rows().len()
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused {
            scheme.border_focused
        } else {
            scheme.border
        });

    if !panel.is_visible() {
        let hint = Paragraph::new(labels.hidden_panel)
            .style(scheme.panel_hint)
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    if panel.rows().is_empty() {
        let hint = Paragraph::new(labels.empty_panel)
            .style(scheme.panel_hint)
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    // Only session drags have per-row targets to highlight.
    let carrying_sessions = browser
        .drag()
        .is_some_and(|drag| drag.source == Level::Session);

    let items: Vec<ListItem> = panel
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let under_cursor = focused && index == panel.cursor().pos();
            let drop_target = carrying_sessions && panel.accepts_drop(row.id);
            let style = row_style(app, panel, index, row, drop_target);

            let caret = if under_cursor {
                labels.selection_caret
            } else {
                "  "
            };
            let mut spans = vec![Span::styled(caret, style)];
            if drop_target {
                spans.push(Span::styled(labels.drop_marker, style));
            }
            if row.access_mg {
                spans.push(Span::styled(labels.managed_marker, style));
            }
            spans.push(Span::styled(row.cells.join(" │ "), style));
            if row.trash {
                spans.push(Span::styled(labels.trash_marker, style));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default());
    let mut list_state = ListState::default().with_selected(Some(panel.cursor().pos()));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn row_style(app: &App, panel: &Panel, index: usize, row: &Row, drop_target: bool) -> Style {
    let scheme = &app.theme.scheme;
    if panel.is_selected(row.id) {
        scheme.row_selected
    } else if drop_target {
        scheme.row_drop_target
    } else if row.trash {
        scheme.row_trash
    } else if Panel::is_striped(index) {
        scheme.row_stripe
    } else {
        scheme.row
    }
}
