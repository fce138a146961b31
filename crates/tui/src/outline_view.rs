//! Outline pane rendering.
//!
//! Draws the rows produced by `arbor_core::rows` and the context menu, and
//! records where each clickable element landed in a `HitMap`.

use arbor_core::{
    Affordance, Element, EventTarget, Expander, Interaction, MenuAction, Point, Row, menu,
    rows,
};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::pane::Pane;

/// Visual prefix characters for tree rows.
mod prefix {
    /// Prefix for collapsed parent nodes.
    pub const COLLAPSED: &str = "\u{25B8}"; // ▸
    /// Prefix for expanded parent nodes.
    pub const EXPANDED: &str = "\u{25BE}"; // ▾
    /// Prefix for leaf nodes.
    pub const LEAF: &str = "\u{2022}"; // •
    /// The more-actions affordance.
    pub const MORE: &str = "\u{22EF}"; // ⋯
    /// Edit caret.
    pub const CARET: &str = "\u{258F}"; // ▏
}

/// Screen regions of the last frame and what they hit.
#[derive(Debug, Default)]
pub struct HitMap {
    regions: Vec<(Rect, EventTarget)>,
}

impl HitMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Record a region. Later regions sit on top of earlier ones.
    pub fn push(&mut self, area: Rect, target: EventTarget) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, target));
        }
    }

    /// The topmost target under a cell.
    pub fn target_at(&self, column: u16, row: u16) -> Option<&EventTarget> {
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| {
                column >= area.x
                    && column < area.x.saturating_add(area.width)
                    && row >= area.y
                    && row < area.y.saturating_add(area.height)
            })
            .map(|(_, target)| target)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Render one pane: border, rows and, if open, its menu.
pub fn render_pane(frame: &mut Frame, area: Rect, pane: &mut Pane, is_focused: bool, hits: &mut HitMap) {
    let border_color = if is_focused { Color::Yellow } else { Color::Cyan };
    let dirty = if pane.is_dirty() { " *" } else { "" };
    let block = Block::default()
        .title(format!(" {}{} ", pane.title(), dirty))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    pane.set_area(inner);

    let scope = pane.editor().id().clone();
    hits.push(inner, EventTarget::new(scope.clone(), Element::Body));

    let all_rows = rows(pane.editor());
    let height = inner.height as usize;
    if let Some(cursor_row) = all_rows.iter().position(|r| r.is_cursor) {
        pane.scroll_to(cursor_row, height);
    }

    let mut lines = Vec::with_capacity(height);
    let mut anchor = None;
    for (offset, row) in all_rows.iter().skip(pane.scroll()).take(height).enumerate() {
        let y = inner.y + offset as u16;
        let (line, layout) = render_row(row);
        record_row_hits(hits, &scope, row, &layout, inner, y);
        if row.is_cursor {
            anchor = Some(Point::new(layout.more.unwrap_or(layout.label_end), offset as u16 + 1));
        }
        lines.push(line);
    }
    pane.set_cursor_anchor(anchor);
    frame.render_widget(Paragraph::new(lines), inner);

    if let Interaction::MenuOpen {
        position,
        highlighted,
        ..
    } = pane.editor().interaction()
    {
        render_menu(frame, inner, *position, *highlighted, &scope, hits);
    }
}

/// Column offsets (relative to the pane) of a rendered row's elements.
#[derive(Debug, Default, PartialEq, Eq)]
struct RowLayout {
    expander: Option<u16>,
    toggle: Option<(u16, u16)>,
    label: (u16, u16),
    label_end: u16,
    more: Option<u16>,
}

fn render_row(row: &Row) -> (Line<'static>, RowLayout) {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut layout = RowLayout::default();
    let mut col: u16 = 0;

    push_span(&mut spans, &mut col, Span::raw("  ".repeat(row.depth.saturating_sub(1))));

    let glyph = match row.expander {
        Expander::Expanded => prefix::EXPANDED,
        Expander::Collapsed => prefix::COLLAPSED,
        Expander::None => prefix::LEAF,
    };
    let at = push_span(&mut spans, &mut col, Span::styled(glyph, Style::default().fg(Color::DarkGray)));
    if row.expander != Expander::None {
        layout.expander = Some(at);
    }
    push_span(&mut spans, &mut col, Span::raw(" "));

    let toggle = match row.affordance {
        Affordance::None => None,
        Affordance::Checkbox(true) => Some("[x]"),
        Affordance::Checkbox(false) => Some("[ ]"),
        Affordance::Radio(true) => Some("(\u{2022})"),
        Affordance::Radio(false) => Some("( )"),
    };
    if let Some(toggle) = toggle {
        let span = Span::styled(toggle, Style::default().fg(Color::Green));
        let width = display_width(&span);
        let at = push_span(&mut spans, &mut col, span);
        layout.toggle = Some((at, width));
        push_span(&mut spans, &mut col, Span::raw(" "));
    }

    let label_style = if row.flashing {
        Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::CROSSED_OUT)
    } else if row.editing {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
    } else if row.is_cursor {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
            .bg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    let label = Span::styled(row.label.clone(), label_style);
    let label_width = display_width(&label);
    let at = push_span(&mut spans, &mut col, label);
    layout.label = (at, label_width.max(1));
    if row.editing {
        push_span(&mut spans, &mut col, Span::styled(prefix::CARET, Style::default().fg(Color::White)));
    }
    layout.label_end = col;

    if row.more_actions && !row.flashing {
        let style = if row.armed {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        push_span(&mut spans, &mut col, Span::raw(" "));
        layout.more = Some(push_span(&mut spans, &mut col, Span::styled(prefix::MORE, style)));
    }

    (Line::from(spans), layout)
}

/// Terminal columns a span occupies.
fn display_width(span: &Span) -> u16 {
    u16::try_from(span.width()).unwrap_or(u16::MAX)
}

/// Append `span` at column `col`, advancing it by the span's display width.
/// Returns the column the span starts at.
fn push_span(spans: &mut Vec<Span<'static>>, col: &mut u16, span: Span<'static>) -> u16 {
    let at = *col;
    *col = col.saturating_add(display_width(&span));
    spans.push(span);
    at
}

fn record_row_hits(
    hits: &mut HitMap,
    scope: &arbor_core::EditorId,
    row: &Row,
    layout: &RowLayout,
    inner: Rect,
    y: u16,
) {
    let cell = |x: u16, width: u16| {
        let x = inner.x.saturating_add(x);
        let right = inner.x.saturating_add(inner.width);
        Rect::new(x, y, width.min(right.saturating_sub(x)), 1)
    };
    let target = |element| EventTarget::new(scope.clone(), element);

    hits.push(cell(layout.label.0, layout.label.1), target(Element::Label(row.id)));
    if let Some(x) = layout.expander {
        hits.push(cell(x, 1), target(Element::Expander(row.id)));
    }
    if let Some((x, width)) = layout.toggle {
        hits.push(cell(x, width), target(Element::Toggle(row.id)));
    }
    if let Some(x) = layout.more {
        hits.push(cell(x, 1), target(Element::MoreActions(row.id)));
    }
}

/// Draw the context menu at `position` (host coordinates of `host`).
fn render_menu(
    frame: &mut Frame,
    host: Rect,
    position: Point,
    highlighted: usize,
    scope: &arbor_core::EditorId,
    hits: &mut HitMap,
) {
    let size = menu::menu_size();
    let area = Rect::new(
        host.x.saturating_add(position.x),
        host.y.saturating_add(position.y),
        size.width,
        size.height,
    )
    .intersection(frame.area());

    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(" Actions ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    hits.push(area, EventTarget::new(scope.clone(), Element::Menu(None)));

    let items: Vec<ListItem> = MenuAction::ALL
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let style = if i == highlighted {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            if (i as u16) < inner.height {
                hits.push(
                    Rect::new(inner.x, inner.y + i as u16, inner.width, 1),
                    EventTarget::new(scope.clone(), Element::Menu(Some(*action))),
                );
            }
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", action.shortcut()), Style::default().fg(Color::DarkGray)),
                Span::styled(action.label(), style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
