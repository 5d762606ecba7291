/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clap::ValueEnum;
use nims_browse::BrowserOptions;
use nims_browse::http::ClientConfig;
use nims_browse::notify::Severity;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

/// Selectable color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ThemeName {
    /// Nord, an arctic, north-bluish color palette.
    #[default]
    Nord,
    /// doom-nord-light, desaturated Nord accents for light backgrounds.
    DoomNordLight,
}

impl std::fmt::Display for ThemeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeName::Nord => write!(f, "nord"),
            ThemeName::DoomNordLight => write!(f, "doom-nord-light"),
        }
    }
}

/// Command-line arguments for the browse TUI.
#[derive(Debug, Parser)]
#[command(
    name = "browse-tui",
    about = "Terminal browser for NIMS experiments, sessions, epochs and datasets"
)]
pub(crate) struct Args {
    /// NIMS web server address (e.g., 127.0.0.1:8080 or
    /// https://nims.example.org/nimsgears/browse)
    #[arg(long, short, env = "NIMS_ADDR")]
    pub(crate) addr: String,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    pub(crate) timeout_ms: u64,

    /// PEM CA certificate; enables https
    #[arg(long)]
    pub(crate) tls_ca: Option<String>,

    /// PEM client certificate for mutual TLS
    #[arg(long, requires = "tls_key")]
    pub(crate) tls_cert: Option<String>,

    /// PEM client key for mutual TLS
    #[arg(long, requires = "tls_cert")]
    pub(crate) tls_key: Option<String>,

    /// Send export drops to the server instead of only reporting them
    #[arg(long)]
    pub(crate) enable_export: bool,

    /// Color theme
    #[arg(long, default_value_t = ThemeName::Nord, value_enum)]
    pub(crate) theme: ThemeName,

    /// Where to write logs (stdout belongs to the UI)
    #[arg(long, default_value = "browse_tui.log")]
    pub(crate) log_file: PathBuf,
}

impl Args {
    pub(crate) fn client_config(&self) -> ClientConfig {
        ClientConfig {
            addr: self.addr.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
            tls_ca: self.tls_ca.clone(),
            tls_cert: self.tls_cert.clone(),
            tls_key: self.tls_key.clone(),
        }
    }

    pub(crate) fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            download_enabled: self.enable_export,
        }
    }
}

/// All user-visible text in the TUI.
pub(crate) struct Labels {
    pub(crate) app_name: &'static str,

    // Chrome / decoration
    pub(crate) separator: &'static str,
    pub(crate) selection_caret: &'static str,
    pub(crate) loading_icon: &'static str,
    pub(crate) trash_marker: &'static str,
    pub(crate) drop_marker: &'static str,
    pub(crate) managed_marker: &'static str,

    // Header
    pub(crate) view: &'static str,
    pub(crate) pending_arrow: &'static str,
    pub(crate) focus: &'static str,
    pub(crate) no_focus: &'static str,
    pub(crate) carrying: &'static str,
    pub(crate) drop_help: &'static str,
    pub(crate) export_off: &'static str,

    // Panels
    pub(crate) empty_panel: &'static str,
    pub(crate) hidden_panel: &'static str,

    // Footer
    pub(crate) footer_help_text: &'static str,
}

impl Labels {
    pub(crate) fn en() -> Self {
        Self {
            app_name: "nims-browse",
            separator: " • ",
            selection_caret: "▸ ",
            loading_icon: "⟳ ",
            trash_marker: " [trash]",
            drop_marker: "⇐ ",
            managed_marker: "* ",
            view: "view:",
            pending_arrow: " → ",
            focus: "focus:",
            no_focus: "none",
            carrying: "carrying ",
            drop_help: "  (Tab: next target, Enter: move | t: trash | x: export | Esc: cancel)",
            export_off: "export:off",
            empty_panel: "(empty)",
            hidden_panel: "select one row to the left",
            footer_help_text: "q: quit | ←/→ 1-4: panel | ↑/↓: select | Space: toggle | m: pick up | v: trash view | r: reload",
        }
    }
}

/// Color roles for the four-panel layout.
pub(crate) struct ColorScheme {
    // UI chrome
    pub(crate) app_name: Style,
    pub(crate) border: Style,
    pub(crate) border_focused: Style,
    pub(crate) footer_help: Style,

    // Rows
    pub(crate) row: Style,
    pub(crate) row_stripe: Style,
    pub(crate) row_selected: Style,
    pub(crate) row_trash: Style,
    pub(crate) row_drop_target: Style,
    pub(crate) panel_hint: Style,

    // Notifications
    pub(crate) error: Style,
    pub(crate) warning: Style,
    pub(crate) info: Style,

    // Header stats
    pub(crate) stat_label: Style,
    pub(crate) stat_url: Style,
    pub(crate) stat_value: Style,
    pub(crate) stat_pending: Style,
    pub(crate) stat_drag: Style,
}

impl ColorScheme {
    /// Nord color scheme (https://www.nordtheme.com/).
    pub(crate) fn nord() -> Self {
        // Polar Night
        let polar1 = Color::Rgb(59, 66, 82); // #3B4252
        let polar3 = Color::Rgb(76, 86, 106); // #4C566A
        // Snow Storm
        let snow0 = Color::Rgb(216, 222, 233); // #D8DEE9
        let snow2 = Color::Rgb(236, 239, 244); // #ECEFF4
        // Frost
        let frost_cyan = Color::Rgb(136, 192, 208); // #88C0D0
        let frost_blue = Color::Rgb(129, 161, 193); // #81A1C1
        // Aurora
        let aurora_red = Color::Rgb(191, 97, 106); // #BF616A
        let aurora_orange = Color::Rgb(208, 135, 112); // #D08770
        let aurora_yellow = Color::Rgb(235, 203, 139); // #EBCB8B
        let aurora_green = Color::Rgb(163, 190, 140); // #A3BE8C
        let aurora_purple = Color::Rgb(180, 142, 173); // #B48EAD

        Self {
            app_name: Style::default().fg(frost_cyan).add_modifier(Modifier::BOLD),
            border: Style::default().fg(polar3),
            border_focused: Style::default().fg(frost_cyan),
            footer_help: Style::default().fg(polar3),

            row: Style::default().fg(snow0),
            row_stripe: Style::default().fg(snow0).bg(polar1),
            row_selected: Style::default()
                .fg(aurora_purple)
                .add_modifier(Modifier::BOLD),
            row_trash: Style::default().fg(aurora_orange),
            row_drop_target: Style::default().fg(aurora_green),
            panel_hint: Style::default().fg(polar3),

            error: Style::default().fg(aurora_red),
            warning: Style::default().fg(aurora_yellow),
            info: Style::default().fg(frost_cyan),

            stat_label: Style::default().fg(snow0),
            stat_url: Style::default().fg(polar3),
            stat_value: Style::default().fg(snow2).add_modifier(Modifier::BOLD),
            stat_pending: Style::default().fg(aurora_yellow),
            stat_drag: Style::default().fg(frost_blue),
        }
    }

    /// doom-nord-light color scheme.
    pub(crate) fn doom_nord_light() -> Self {
        let base3 = Color::Rgb(229, 233, 240); // #E5E9F0
        let base7 = Color::Rgb(96, 114, 140); // #60728C
        let fg = Color::Rgb(59, 66, 82); // #3B4252
        let fg_alt = Color::Rgb(46, 52, 64); // #2E3440
        let red = Color::Rgb(153, 50, 75); // #99324B
        let orange = Color::Rgb(172, 68, 38); // #AC4426
        let green = Color::Rgb(79, 137, 76); // #4F894C
        let yellow = Color::Rgb(154, 117, 0); // #9A7500
        let blue = Color::Rgb(59, 110, 168); // #3B6EA8
        let teal = Color::Rgb(41, 131, 141); // #29838D
        let cyan = Color::Rgb(57, 142, 172); // #398EAC
        let violet = Color::Rgb(132, 40, 121); // #842879

        Self {
            app_name: Style::default().fg(teal).add_modifier(Modifier::BOLD),
            border: Style::default().fg(base7),
            border_focused: Style::default().fg(cyan),
            footer_help: Style::default().fg(base7),

            row: Style::default().fg(fg),
            row_stripe: Style::default().fg(fg).bg(base3),
            row_selected: Style::default().fg(violet).add_modifier(Modifier::BOLD),
            row_trash: Style::default().fg(orange),
            row_drop_target: Style::default().fg(green),
            panel_hint: Style::default().fg(base7),

            error: Style::default().fg(red),
            warning: Style::default().fg(yellow),
            info: Style::default().fg(cyan),

            stat_label: Style::default().fg(fg),
            stat_url: Style::default().fg(base7),
            stat_value: Style::default().fg(fg_alt).add_modifier(Modifier::BOLD),
            stat_pending: Style::default().fg(yellow),
            stat_drag: Style::default().fg(blue),
        }
    }

    pub(crate) fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Info => self.info,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
        }
    }
}

/// Complete visual presentation: colors + text.
pub(crate) struct Theme {
    pub(crate) scheme: ColorScheme,
    pub(crate) labels: Labels,
}

impl Theme {
    pub(crate) fn new(theme_name: ThemeName) -> Self {
        let scheme = match theme_name {
            ThemeName::Nord => ColorScheme::nord(),
            ThemeName::DoomNordLight => ColorScheme::doom_nord_light(),
        };
        Self {
            scheme,
            labels: Labels::en(),
        }
    }
}
