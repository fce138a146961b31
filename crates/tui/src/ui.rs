//! UI rendering for the TUI.
//!
//! Provides layout and widget rendering using ratatui.

use arbor_core::Interaction;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
};

use crate::app::{App, Mode};
use crate::outline_view::render_pane;

/// Legend text while navigating.
const LEGEND_NAVIGATE: &str = " [j/k] Move  [h/l] Collapse/Expand  [Space] Check  [e] Edit  [m] Actions  [J/K] Reorder  [w] Save  [Tab] Pane  [q] Quit ";

/// Legend text while the menu is open.
const LEGEND_MENU: &str = " [j/k] Highlight  [Enter] Apply  [a] Child  [s] Sibling  [d] Delete  [u/n] Move  [Esc] Close ";

/// Legend text while editing a label.
const LEGEND_EDIT: &str = " [Enter] Commit + new sibling  [Esc] Commit  [Backspace] Delete char ";

/// Draw the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = create_main_layout(frame.area());
    app.hits_mut().clear();

    draw_panes(frame, chunks[0], app);
    draw_status(frame, chunks[1], app);
    draw_legend(frame, chunks[2], app.mode());
}

/// Create the main three-part layout: panes, status line, legend.
fn create_main_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Panes
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Legend bar
        ])
        .split(area)
        .to_vec()
}

/// Split the pane area evenly side by side.
fn pane_layout(area: Rect, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let constraints = vec![Constraint::Ratio(1, count as u32); count];
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

fn draw_panes(frame: &mut Frame, area: Rect, app: &mut App) {
    let areas = pane_layout(area, app.pane_count());
    let focus = app.focus();
    let (panes, hits) = app.panes_and_hits_mut();
    for (index, (pane, pane_area)) in panes.iter_mut().zip(areas).enumerate() {
        render_pane(frame, pane_area, pane, index == focus, hits);
    }
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let mut text = String::new();
    if let Some(pane) = app.focused_pane() {
        text.push_str(&format!(" {}", pane.store().path().display()));
        if pane.is_dirty() {
            text.push_str("  [modified]");
        }
        if let Some(saved) = pane.last_saved() {
            text.push_str(&format!("  saved {}", saved.format("%H:%M:%S")));
        }
        if let Interaction::Editing { .. } = pane.editor().interaction() {
            text.push_str("  -- EDIT --");
        }
    }
    if let Some(message) = app.status() {
        text.push_str("  ");
        text.push_str(message);
    }
    let status = Paragraph::new(text).style(Style::default().fg(Color::White).bg(Color::DarkGray));
    frame.render_widget(status, area);
}

/// Draw the legend bar at the bottom.
fn draw_legend(frame: &mut Frame, area: Rect, mode: Mode) {
    let legend = Paragraph::new(legend_for(mode))
        .style(Style::default().fg(Color::Black).bg(Color::Cyan));
    frame.render_widget(legend, area);
}

fn legend_for(mode: Mode) -> &'static str {
    match mode {
        Mode::Navigate => LEGEND_NAVIGATE,
        Mode::Menu => LEGEND_MENU,
        Mode::Edit => LEGEND_EDIT,
    }
}
