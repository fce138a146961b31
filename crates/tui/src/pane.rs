//! One editor instance bound to one outline file.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use arbor_core::{
    EditorId, EditorOptions, EditorResult, EventTarget, HostContainer, OutlineStore, Point,
    ScopedListener, Size, TreeEditor,
};
use chrono::{DateTime, Local};
use ratatui::layout::Rect;
use tracing::{info, warn};

/// A pane: the editor, where it is saved, and its on-screen geometry.
pub struct Pane {
    editor: TreeEditor,
    store: OutlineStore,
    dirty: Rc<Cell<bool>>,
    last_check: Rc<RefCell<Option<String>>>,
    last_saved: Option<DateTime<Local>>,
    /// Inner area of the pane as of the last frame.
    area: Rect,
    /// First visible row.
    scroll: usize,
    /// Where a keyboard-opened menu is anchored (host coordinates).
    cursor_anchor: Option<Point>,
}

impl Pane {
    /// Load `store` into a fresh editor configured with `options`.
    pub async fn open(store: OutlineStore, options: EditorOptions) -> EditorResult<Self> {
        let nodes = store.load().await?;
        let name = store
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| store.path().display().to_string());
        let mut editor = TreeEditor::create(HostContainer::new(name, 0, 0), None)?;
        editor.configure(options);
        editor.load(&nodes);
        info!("Opened {} as pane {}", store.path().display(), editor.id());
        Ok(Self::new(editor, store))
    }

    /// Wrap an existing editor.
    pub fn new(mut editor: TreeEditor, store: OutlineStore) -> Self {
        let dirty = Rc::new(Cell::new(false));
        let last_check = Rc::new(RefCell::new(None));

        let flag = Rc::clone(&dirty);
        editor.on_change(move |_| flag.set(true));

        let message = Rc::clone(&last_check);
        editor.on_check(move |checked, _label, path| {
            let verb = if checked { "Checked" } else { "Unchecked" };
            *message.borrow_mut() = Some(format!("{}: {}", verb, path.join(" / ")));
        });

        Self {
            editor,
            store,
            dirty,
            last_check,
            last_saved: None,
            area: Rect::default(),
            scroll: 0,
            cursor_anchor: None,
        }
    }

    pub fn editor(&self) -> &TreeEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut TreeEditor {
        &mut self.editor
    }

    pub fn store(&self) -> &OutlineStore {
        &self.store
    }

    pub fn title(&self) -> &str {
        &self.editor.host().name
    }

    /// Whether there are changes since the last save.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub fn last_saved(&self) -> Option<DateTime<Local>> {
        self.last_saved
    }

    /// Take the message left by the last selection toggle.
    pub fn take_check_message(&self) -> Option<String> {
        self.last_check.borrow_mut().take()
    }

    /// Write the outline to its file.
    pub async fn save(&mut self) -> EditorResult<()> {
        match self.store.save(&self.editor.get_data()).await {
            Ok(()) => {
                self.dirty.set(false);
                self.last_saved = Some(Local::now());
                Ok(())
            }
            Err(e) => {
                warn!("Saving {} failed: {}", self.store.path().display(), e);
                Err(e)
            }
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Record the pane's inner area; the editor's host is resized to match.
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
        self.editor.resize_host(Size::new(area.width, area.height));
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Adjust the scroll offset so that `cursor_row` is inside `height` rows.
    pub fn scroll_to(&mut self, cursor_row: usize, height: usize) {
        if height == 0 {
            return;
        }
        if cursor_row < self.scroll {
            self.scroll = cursor_row;
        } else if cursor_row >= self.scroll + height {
            self.scroll = cursor_row + 1 - height;
        }
    }

    pub fn cursor_anchor(&self) -> Point {
        self.cursor_anchor.unwrap_or_default()
    }

    pub fn set_cursor_anchor(&mut self, anchor: Option<Point>) {
        self.cursor_anchor = anchor;
    }

    /// Convert a screen cell into the editor's host coordinates.
    pub fn to_host(&self, column: u16, row: u16) -> Point {
        Point::new(
            column.saturating_sub(self.area.x),
            row.saturating_sub(self.area.y),
        )
    }
}

impl ScopedListener for Pane {
    fn scope(&self) -> &EditorId {
        self.editor.id()
    }

    fn contains_event_target(&self, target: &EventTarget) -> bool {
        self.editor.contains_event_target(target)
    }

    fn on_outside_mousedown(&mut self) {
        self.editor.on_outside_mousedown();
    }
}
