//! Context menu actions and placement.

/// Entries of the per-node "more actions" menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    AddChild,
    AddSibling,
    Delete,
    MoveUp,
    MoveDown,
}

impl MenuAction {
    /// All menu entries in display order.
    pub const ALL: [MenuAction; 5] = [
        MenuAction::AddChild,
        MenuAction::AddSibling,
        MenuAction::Delete,
        MenuAction::MoveUp,
        MenuAction::MoveDown,
    ];

    /// Text shown for the entry.
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::AddChild => "Add child",
            MenuAction::AddSibling => "Add sibling",
            MenuAction::Delete => "Delete",
            MenuAction::MoveUp => "Move up",
            MenuAction::MoveDown => "Move down",
        }
    }

    /// Single-key shortcut while the menu is open.
    pub fn shortcut(&self) -> char {
        match self {
            MenuAction::AddChild => 'a',
            MenuAction::AddSibling => 's',
            MenuAction::Delete => 'd',
            MenuAction::MoveUp => 'u',
            MenuAction::MoveDown => 'n',
        }
    }

    /// Look up an entry by shortcut key.
    pub fn from_shortcut(key: char) -> Option<MenuAction> {
        Self::ALL.into_iter().find(|a| a.shortcut() == key)
    }

    /// Entry at a menu row.
    pub fn from_index(index: usize) -> Option<MenuAction> {
        Self::ALL.get(index).copied()
    }

    /// Menu row of this entry.
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|a| a == self)
            .unwrap_or_default()
    }
}

/// A cell position in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// A width/height pair in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Size of the rendered menu: widest label plus border, one row per entry.
pub fn menu_size() -> Size {
    let widest = MenuAction::ALL
        .iter()
        .map(|a| a.label().len() + 4)
        .max()
        .unwrap_or(0);
    Size::new(widest as u16 + 2, MenuAction::ALL.len() as u16 + 2)
}

/// Position a menu next to its anchor so it stays inside the viewport.
///
/// The menu opens right of and below the anchor; on an axis where that would
/// overflow it flips to the left of / above the anchor instead.
pub fn place_menu(anchor: Point, menu: Size, viewport: Size) -> Point {
    let x = if anchor.x.saturating_add(menu.width) <= viewport.width {
        anchor.x
    } else {
        anchor.x.saturating_sub(menu.width)
    };
    let y = if anchor.y.saturating_add(menu.height) <= viewport.height {
        anchor.y
    } else {
        anchor.y.saturating_sub(menu.height)
    };
    Point::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_menu_prefers_right_below() {
        let pos = place_menu(Point::new(10, 5), Size::new(20, 7), Size::new(80, 24));
        assert_eq!(pos, Point::new(10, 5));
    }

    #[test]
    fn test_place_menu_flips_left_on_overflow() {
        let pos = place_menu(Point::new(70, 5), Size::new(20, 7), Size::new(80, 24));
        assert_eq!(pos, Point::new(50, 5));
    }

    #[test]
    fn test_place_menu_flips_up_on_overflow() {
        let pos = place_menu(Point::new(10, 20), Size::new(20, 7), Size::new(80, 24));
        assert_eq!(pos, Point::new(10, 13));
    }

    #[test]
    fn test_place_menu_exact_fit_does_not_flip() {
        let pos = place_menu(Point::new(60, 17), Size::new(20, 7), Size::new(80, 24));
        assert_eq!(pos, Point::new(60, 17));
    }

    #[test]
    fn test_place_menu_saturates_in_tiny_viewport() {
        let pos = place_menu(Point::new(3, 2), Size::new(20, 7), Size::new(10, 4));
        assert_eq!(pos, Point::new(0, 0));
    }

    #[test]
    fn test_shortcuts_are_unique_and_resolve() {
        for action in MenuAction::ALL {
            assert_eq!(MenuAction::from_shortcut(action.shortcut()), Some(action));
            assert_eq!(MenuAction::from_index(action.index()), Some(action));
        }
        assert_eq!(MenuAction::from_shortcut('z'), None);
    }

    #[test]
    fn test_menu_size_fits_labels() {
        let size = menu_size();
        assert_eq!(size.height, 7);
        assert!(size.width as usize >= "Add sibling".len() + 2);
    }
}
