pub mod command_bar;
pub mod filter_bar;
pub mod help;
pub mod input;
pub mod load_error;
pub mod snap_detail;
pub mod snap_table;
pub mod status_bar;

use std::fmt::Write;

use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::app::{App, AppMode};

use command_bar::CommandBar;
use filter_bar::FilterBar;
use help::HelpView;
use load_error::LoadErrorView;
use snap_detail::SnapDetail;
use snap_table::SnapTable;
use status_bar::StatusBar;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Layout: filter bar + main content + status bar + optional command bar
    let bottom_height = if app.mode == AppMode::Command { 2 } else { 1 };

    let [filter_area, main_area, bottom_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(bottom_height),
    ])
    .areas(area);

    if app.mode == AppMode::Command {
        let [status_area, cmd_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(bottom_area);
        frame.render_widget(StatusBar::new(app), status_area);
        frame.render_widget(CommandBar::new(app), cmd_area);
    } else {
        frame.render_widget(StatusBar::new(app), bottom_area);
    }

    // A failed load replaces the whole view; there is nothing to filter.
    if let Some(message) = app.view.error() {
        frame.render_widget(LoadErrorView::new(message), main_area);
        return;
    }

    frame.render_widget(FilterBar::new(app), filter_area);
    frame.render_widget(SnapTable::new(app), main_area);

    if let Some(snap) = app.view.detail_snap() {
        frame.render_widget(
            SnapDetail::new(snap, &app.config.date_format).pending(app.view.is_pending(&snap.id)),
            main_area,
        );
    }

    if app.show_help {
        frame.render_widget(HelpView::new(), main_area);
    }
}

/// Render a snap timestamp for display; snaps without a parsable date show a dash.
/// An invalid `date_format` falls back to RFC 3339.
pub(crate) fn format_timestamp(ts: Option<DateTime<Utc>>, fmt: &str) -> String {
    let Some(ts) = ts else {
        return "-".to_string();
    };
    let mut out = String::new();
    match write!(out, "{}", ts.format(fmt)) {
        Ok(()) => out,
        Err(_) => ts.to_rfc3339(),
    }
}

/// Label shown on a row's action column.
pub(crate) fn action_label(blocked: bool, pending: bool) -> &'static str {
    match (pending, blocked) {
        (true, _) => "Processing...",
        (false, true) => "Unblock",
        (false, false) => "Block",
    }
}
