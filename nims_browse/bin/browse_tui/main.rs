/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Interactive four-panel browser for a NIMS server.
//!
//! Experiments, sessions, epochs and datasets are shown side by side.
//! Selecting exactly one row lists its children in the panel to the
//! right; any other selection hides everything further right.
//!
//! Keys:
//! - `←`/`→` (`h`/`l`) or `1`-`4`: move focus between panels
//! - `↑`/`↓` (`k`/`j`): move and select in the focused panel
//! - `Space`: toggle the row under the cursor; `Enter`: select only it
//! - `m`: pick up the selection; then `Tab` walks the experiments that
//!   accept it and `Enter` moves sessions there, `t` trashes, `x`
//!   exports, `Esc` puts it back
//! - `v`: flip between active and trash listings; `r`: reload
//!
//! Logs go to a file (`--log-file`) because the terminal belongs to
//! the UI. Filter them with `RUST_LOG`.
//!
//! ```bash
//! browse_tui --addr https://nims.example.org/nimsgears/browse --tls-ca ca.pem
//! ```

mod app;
mod render;
mod theme;

use std::io;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
pub(crate) use app::*;
use clap::Parser;
use crossterm::ExecutableCommand;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use nims_browse::Driver;
use nims_browse::Level;
use nims_browse::http::HttpDataService;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
// Re-exports so #[cfg(test)] mod tests can use `use super::*`.
#[allow(unused_imports)]
pub(crate) use render::*;
pub(crate) use theme::*;
use tracing_subscriber::EnvFilter;

// Terminal setup / teardown

/// Put the terminal into "TUI mode".
///
/// Enables raw mode, switches to the alternate screen, and clears it,
/// returning a `ratatui::Terminal` backed by crossterm.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

/// Restore the terminal back to normal "shell mode".
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nims_browse=info,browse_tui=info".into()),
        )
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file))
        .init();
    Ok(())
}

// Main loop

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if !io::stdout().is_terminal() {
        eprintln!("This TUI requires a real terminal.");
        return Ok(());
    }

    init_logging(&args.log_file)?;

    let service = HttpDataService::from_config(&args.client_config());
    let base_url = service.base_url().to_string();
    tracing::info!(%base_url, export = args.enable_export, "starting browse-tui");

    // Spinner on stderr while the first listing loads, before the
    // alternate screen takes over.
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("spinner template")?,
    );
    spinner.set_message(format!("nims-browse: connecting to {} ...", base_url));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let mut driver = Driver::start(Arc::new(service), args.browser_options()).await;
    driver.settle().await;
    driver.browser_mut().set_focus(Level::Experiment);

    spinner.finish_and_clear();

    let app = App::new(base_url, driver, args.theme);
    let mut terminal = setup_terminal().context("entering terminal UI")?;
    let result = run_app(&mut terminal, app).await;
    restore_terminal(&mut terminal).context("restoring terminal")?;
    result
}

#[cfg(test)]
mod tests;
