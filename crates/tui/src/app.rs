//! Main application state and event loop.

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use arbor_core::{
    EditorOptions, Element, Interaction, MenuAction, Outcome, OutlineStore, Registry, Rejection,
    ScopedListener,
};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyEvent, MouseEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::prelude::*;
use tracing::debug;

use crate::error::{TuiError, TuiResult};
use crate::event::{
    Input, is_backspace, is_ctrl_c, is_down, is_edit, is_enter, is_escape, is_left,
    is_left_click, is_menu, is_mousedown, is_move_down, is_move_up, is_quit, is_right, is_save,
    is_space, is_tab, is_up, poll_input, typed_char,
};
use crate::outline_view::HitMap;
use crate::pane::Pane;
use crate::ui;

/// What the focused pane is doing, for key routing and the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Navigate,
    Menu,
    Edit,
}

/// Longest wait for input between redraws.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Main application state.
pub struct App {
    /// One pane per outline file.
    panes: Registry<Pane>,
    /// Index of the focused pane.
    focus: usize,
    /// Whether the application is still running.
    running: bool,
    /// Clickable regions of the last frame.
    hits: HitMap,
    /// One-line message for the status bar.
    status: Option<String>,
    /// Save the focused pane after the current event.
    save_requested: bool,
    /// A quit with unsaved changes was refused once.
    quit_armed: bool,
}

impl App {
    /// Open one pane per store.
    ///
    /// # Errors
    ///
    /// Returns `TuiError::Editor` if an outline cannot be read or is
    /// malformed, and `TuiError::NoPanes` if `stores` is empty.
    pub async fn open(stores: Vec<OutlineStore>, options: EditorOptions) -> TuiResult<Self> {
        let mut panes = Vec::with_capacity(stores.len());
        for store in stores {
            panes.push(Pane::open(store, options.clone()).await?);
        }
        Self::from_panes(panes)
    }

    /// Build an app from already loaded panes.
    pub fn from_panes(panes: Vec<Pane>) -> TuiResult<Self> {
        if panes.is_empty() {
            return Err(TuiError::NoPanes);
        }
        let mut registry = Registry::new();
        for pane in panes {
            registry.register(pane);
        }
        Ok(Self {
            panes: registry,
            focus: 0,
            running: true,
            hits: HitMap::new(),
            status: None,
            save_requested: false,
            quit_armed: false,
        })
    }

    /// Check if the application is still running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    /// Index of the focused pane.
    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_pane(&self) -> Option<&Pane> {
        self.panes.at(self.focus)
    }

    pub fn focused_pane_mut(&mut self) -> Option<&mut Pane> {
        self.panes.at_mut(self.focus)
    }

    pub fn pane(&self, index: usize) -> Option<&Pane> {
        self.panes.at(index)
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn hits_mut(&mut self) -> &mut HitMap {
        &mut self.hits
    }

    /// Panes and hit map together, for one rendering pass.
    pub fn panes_and_hits_mut(&mut self) -> (&mut Registry<Pane>, &mut HitMap) {
        (&mut self.panes, &mut self.hits)
    }

    /// Current interaction mode of the focused pane.
    pub fn mode(&self) -> Mode {
        match self.focused_pane().map(|p| p.editor().interaction()) {
            Some(Interaction::MenuOpen { .. }) => Mode::Menu,
            Some(Interaction::Editing { .. }) => Mode::Edit,
            _ => Mode::Navigate,
        }
    }

    /// Request the application to quit.
    ///
    /// With unsaved changes the first request only warns.
    pub fn quit(&mut self) {
        if self.panes.iter().any(Pane::is_dirty) && !self.quit_armed {
            self.quit_armed = true;
            self.status = Some("Unsaved changes, press q again to quit".to_string());
            return;
        }
        self.running = false;
    }

    /// Focus the next pane.
    pub fn next_pane(&mut self) {
        if self.panes.is_empty() {
            return;
        }
        if let Some(pane) = self.focused_pane_mut() {
            pane.editor_mut().close_menu();
        }
        self.focus = (self.focus + 1) % self.panes.len();
    }

    /// Advance pending delete flashes.
    pub fn tick(&mut self, now: Instant) {
        for pane in self.panes.iter_mut() {
            pane.editor_mut().tick(now);
        }
    }

    /// How long to wait for input: the poll interval, shortened so that a
    /// delete flash ends on time.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.panes
            .iter()
            .filter_map(|pane| pane.editor().pending_remaining(now))
            .fold(POLL_INTERVAL, Duration::min)
    }

    /// Run the main application loop.
    ///
    /// This initializes the terminal, runs the event loop, and ensures
    /// the terminal is restored on exit (even on panic).
    pub async fn run(&mut self) -> TuiResult<()> {
        let mut terminal = init_terminal()?;

        let _guard = scopeguard::guard((), |()| {
            let _ = restore_terminal();
        });

        let result = self.event_loop(&mut terminal).await;

        drop(_guard);

        result
    }

    /// The main event loop.
    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> TuiResult<()> {
        while self.running {
            self.tick(Instant::now());

            terminal.draw(|frame| ui::draw(frame, self))?;

            match poll_input(self.poll_timeout(Instant::now()))? {
                Some(Input::Key(key)) => self.handle_key(&key),
                Some(Input::Mouse(mouse)) => self.handle_mouse(&mouse),
                Some(Input::Resize) | None => {}
            }

            self.save_if_requested().await;
        }
        Ok(())
    }

    /// Save the focused pane if a save was requested.
    pub async fn save_if_requested(&mut self) {
        if !std::mem::take(&mut self.save_requested) {
            return;
        }
        let Some(pane) = self.panes.at_mut(self.focus) else {
            return;
        };
        self.status = Some(match pane.save().await {
            Ok(()) => format!("Saved {}", pane.store().path().display()),
            Err(e) => format!("Save failed: {}", e),
        });
    }

    /// Handle a keyboard event.
    pub fn handle_key(&mut self, key: &KeyEvent) {
        if is_ctrl_c(key) {
            self.running = false;
            return;
        }

        let mode = self.mode();
        if mode == Mode::Navigate {
            if is_quit(key) {
                self.quit();
                return;
            }
            if is_tab(key) {
                self.next_pane();
                return;
            }
            if is_save(key) {
                self.save_requested = true;
                return;
            }
        }
        self.quit_armed = false;

        let Some(pane) = self.panes.at_mut(self.focus) else {
            return;
        };
        let now = Instant::now();
        let message = match mode {
            Mode::Navigate => navigate_key(pane, key, now),
            Mode::Menu => menu_key(pane, key, now),
            Mode::Edit => {
                edit_key(pane, key);
                None
            }
        };
        self.status = message;
    }

    /// Handle a mouse event.
    ///
    /// Every button press is first offered to all panes so that panes the
    /// press landed outside of close their menus.
    pub fn handle_mouse(&mut self, mouse: &MouseEvent) {
        if !is_mousedown(mouse) {
            return;
        }
        let target = self.hits.target_at(mouse.column, mouse.row).cloned();
        let notified = self.panes.dispatch_mousedown(target.as_ref());
        debug!("Mousedown at {},{} notified {} panes", mouse.column, mouse.row, notified);

        if !is_left_click(mouse) {
            return;
        }
        let Some(target) = target else {
            return;
        };
        let Some(index) = self.panes.iter().position(|p| p.scope() == &target.scope) else {
            return;
        };
        self.focus = index;
        let Some(pane) = self.panes.at_mut(index) else {
            return;
        };

        let anchor = pane.to_host(mouse.column, mouse.row);
        let editor = pane.editor_mut();
        let message = match target.element {
            Element::Body | Element::Menu(None) => None,
            Element::Label(id) => {
                if editor.cursor() == Some(id) && editor.config().editable {
                    editor.begin_edit(id).err().map(describe_rejection)
                } else {
                    editor.set_cursor(id);
                    None
                }
            }
            Element::Toggle(id) => {
                editor.set_cursor(id);
                editor.toggle_check(id);
                pane.take_check_message()
            }
            Element::Expander(id) => {
                editor.toggle_expanded(id);
                None
            }
            Element::MoreActions(id) => editor.open_menu(id, anchor).err().map(describe_rejection),
            Element::Menu(Some(action)) => describe_outcome(editor.choose_at(action, Instant::now())),
        };
        self.status = message;
    }
}

fn navigate_key(pane: &mut Pane, key: &KeyEvent, now: Instant) -> Option<String> {
    let anchor = pane.cursor_anchor();
    let editor = pane.editor_mut();
    let cursor = editor.cursor()?;

    if is_down(key) {
        editor.cursor_down();
    } else if is_up(key) {
        editor.cursor_up();
    } else if is_left(key) {
        if !editor.collapse(cursor) {
            editor.cursor_parent();
        }
    } else if is_right(key) {
        editor.expand(cursor);
    } else if is_enter(key) {
        editor.toggle_expanded(cursor);
    } else if is_space(key) {
        editor.toggle_check(cursor);
        return pane.take_check_message();
    } else if is_edit(key) {
        return editor.begin_edit(cursor).err().map(describe_rejection);
    } else if is_menu(key) {
        return editor.open_menu(cursor, anchor).err().map(describe_rejection);
    } else if is_move_down(key) {
        return describe_outcome(editor.apply(MenuAction::MoveDown, cursor, now));
    } else if is_move_up(key) {
        return describe_outcome(editor.apply(MenuAction::MoveUp, cursor, now));
    }
    None
}

fn menu_key(pane: &mut Pane, key: &KeyEvent, now: Instant) -> Option<String> {
    let editor = pane.editor_mut();
    if is_escape(key) {
        editor.close_menu();
    } else if is_down(key) {
        editor.highlight_menu(1);
    } else if is_up(key) {
        editor.highlight_menu(-1);
    } else if is_enter(key) {
        return describe_outcome(editor.choose_highlighted());
    } else if let Some(action) = typed_char(key).and_then(MenuAction::from_shortcut) {
        return describe_outcome(editor.choose_at(action, now));
    }
    None
}

fn edit_key(pane: &mut Pane, key: &KeyEvent) {
    let editor = pane.editor_mut();
    if is_escape(key) {
        editor.commit_edit();
    } else if is_enter(key) {
        editor.commit_and_add_sibling();
    } else if is_backspace(key) {
        editor.edit_backspace();
    } else if let Some(c) = typed_char(key) {
        editor.edit_input(c);
    }
}

fn describe_outcome(outcome: Outcome) -> Option<String> {
    match outcome {
        Outcome::Applied { .. } | Outcome::Deferred => None,
        Outcome::Rejected(reason) => Some(describe_rejection(reason)),
    }
}

fn describe_rejection(reason: Rejection) -> String {
    match reason {
        Rejection::NoTarget => "No node selected",
        Rejection::UnknownNode => "Node no longer exists",
        Rejection::NotEditable => "Outline is read-only",
        Rejection::MaxDepth => "Maximum depth reached",
        Rejection::Transitioning => "Node is being deleted",
        Rejection::AtEdge => "Cannot move further",
    }
    .to_string()
}

/// Initialize the terminal for TUI rendering.
fn init_terminal() -> TuiResult<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
fn restore_terminal() -> TuiResult<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
    Ok(())
}
