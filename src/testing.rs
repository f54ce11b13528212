//! In-memory window system and desktop shell.
//!
//! These back the unit and integration tests, and make it possible to drive
//! the layout engine without a display.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use crate::geometry::{Bounds, Point, Rect, Size};
use crate::prelude::*;
use crate::shell::IconShell;
use crate::text::{decode, TextEncoding};
use crate::window::{Placement, PlacementFlags, ShowCommand, WindowHandle, WindowSystem};

/// State of one simulated window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryWindow {
    pub title: String,
    /// Title as raw bytes from the window system, decoded on every query.
    /// Takes the place of `title` when set.
    pub title_bytes: Option<(Vec<u8>, TextEncoding)>,
    pub process: String,
    /// Restored rectangle. Kept while the window is minimized or maximized.
    pub frame: Rect,
    pub minimized: bool,
    pub maximized: bool,
    pub visible: bool,
    pub enabled: bool,
    pub responsive: bool,
    pub parent: Option<WindowHandle>,
    pub flags: PlacementFlags,
    /// Normal rectangle reported by placement queries while the window is not
    /// minimized. Zero by default, like a stale placement record.
    pub reported_normal: Bounds,
    /// Times the window was brought to the front.
    pub raised: usize,
}

impl MemoryWindow {
    pub fn new(title: &str, process: &str, frame: Rect) -> Self {
        Self {
            title: title.to_owned(),
            title_bytes: None,
            process: process.to_owned(),
            frame,
            minimized: false,
            maximized: false,
            visible: true,
            enabled: true,
            responsive: true,
            parent: None,
            flags: PlacementFlags::empty(),
            reported_normal: Bounds::default(),
            raised: 0,
        }
    }

    fn show_command(&self) -> ShowCommand {
        if self.minimized {
            ShowCommand::ShowMinimized
        } else if self.maximized {
            ShowCommand::Maximized
        } else {
            ShowCommand::Normal
        }
    }
}

/// A desktop whose windows live in memory.
#[derive(Debug)]
pub struct MemoryDesktop {
    screen: Size,
    windows: RefCell<Vec<(WindowHandle, MemoryWindow)>>,
    next_handle: Cell<u64>,
}

impl MemoryDesktop {
    pub fn new(screen: Size) -> Self {
        Self {
            screen,
            windows: RefCell::new(Vec::new()),
            next_handle: Cell::new(0x1000),
        }
    }

    /// Open a window, returning its handle.
    pub fn add(&self, window: MemoryWindow) -> WindowHandle {
        let handle = WindowHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 0x10);
        self.windows.borrow_mut().push((handle, window));
        handle
    }

    /// Close a window; its handle goes stale.
    pub fn remove(&self, handle: WindowHandle) -> Option<MemoryWindow> {
        let mut windows = self.windows.borrow_mut();
        let position = windows.iter().position(|(h, _)| *h == handle)?;
        Some(windows.remove(position).1)
    }

    /// Snapshot of a window's state.
    pub fn get(&self, handle: WindowHandle) -> Option<MemoryWindow> {
        self.windows
            .borrow()
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, w)| w.clone())
    }

    /// Modify a window, as the user or another application would.
    pub fn update(&self, handle: WindowHandle, change: impl FnOnce(&mut MemoryWindow)) {
        if let Some((_, window)) = self.windows.borrow_mut().iter_mut().find(|(h, _)| *h == handle) {
            change(window);
        }
    }

    /// Every open window, in opening order.
    pub fn handles(&self) -> Vec<WindowHandle> {
        self.windows.borrow().iter().map(|(h, _)| *h).collect()
    }

    fn with<T>(&self, handle: WindowHandle, read: impl FnOnce(&MemoryWindow) -> T) -> Option<T> {
        self.windows
            .borrow()
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, w)| read(w))
    }

    fn modify(&self, handle: WindowHandle, change: impl FnOnce(&mut MemoryWindow)) -> WinResult<()> {
        let mut windows = self.windows.borrow_mut();
        let (_, window) = windows
            .iter_mut()
            .find(|(h, _)| *h == handle)
            .ok_or(Error::WindowGone(handle))?;
        change(window);
        Ok(())
    }
}

impl WindowSystem for MemoryDesktop {
    fn top_level_windows(&self) -> WinResult<Vec<WindowHandle>> {
        Ok(self.handles())
    }

    fn parent(&self, window: WindowHandle) -> Option<WindowHandle> {
        self.with(window, |w| w.parent).flatten()
    }

    fn is_visible(&self, window: WindowHandle) -> bool {
        self.with(window, |w| w.visible).unwrap_or(false)
    }

    fn is_enabled(&self, window: WindowHandle) -> bool {
        self.with(window, |w| w.enabled).unwrap_or(false)
    }

    fn is_responsive(&self, window: WindowHandle, _timeout: Duration) -> bool {
        self.with(window, |w| w.responsive).unwrap_or(false)
    }

    fn title(&self, window: WindowHandle) -> WinResult<Option<String>> {
        match self.with(window, |w| (w.title.clone(), w.title_bytes.clone())) {
            Some((_, Some((bytes, encoding)))) => decode(bytes, encoding).map(Some),
            Some((title, None)) => Ok(Some(title)),
            None => Ok(None),
        }
    }

    fn process_path(&self, window: WindowHandle) -> WinResult<Option<String>> {
        Ok(self.with(window, |w| w.process.clone()))
    }

    fn screen_size(&self) -> Size {
        self.screen
    }

    fn is_minimized(&self, window: WindowHandle) -> bool {
        self.with(window, |w| w.minimized).unwrap_or(false)
    }

    fn frame(&self, window: WindowHandle) -> WinResult<Rect> {
        self.with(window, |w| w.frame).ok_or(Error::WindowGone(window))
    }

    fn placement(&self, window: WindowHandle) -> WinResult<Placement> {
        self.with(window, |w| Placement {
            flags: w.flags,
            show: w.show_command(),
            min_position: Point::new(-1, -1),
            max_position: Point::new(-1, -1),
            normal: if w.minimized {
                Bounds::from(w.frame)
            } else {
                w.reported_normal
            },
        })
        .ok_or(Error::WindowGone(window))
    }

    fn set_placement(&self, window: WindowHandle, placement: &Placement) -> WinResult<()> {
        self.modify(window, |w| {
            w.flags = placement.flags;
            w.frame = placement.normal.to_rect();
            w.minimized = placement.show.is_minimized();
            w.maximized = placement.show.is_maximized();
        })
    }

    fn set_frame(&self, window: WindowHandle, frame: Rect) -> WinResult<()> {
        self.modify(window, |w| w.frame = frame)
    }

    fn show(&self, window: WindowHandle, command: ShowCommand) -> WinResult<()> {
        self.modify(window, |w| {
            if command.is_minimized() || command == ShowCommand::Hide {
                w.minimized = true;
            } else if command.is_maximized() {
                w.minimized = false;
                w.maximized = true;
            } else {
                w.minimized = false;
                w.maximized = false;
            }
        })
    }

    fn bring_to_front(&self, window: WindowHandle) -> WinResult<()> {
        self.modify(window, |w| w.raised += 1)
    }

    fn close(&self, window: WindowHandle) -> WinResult<()> {
        self.remove(window).map(|_| ()).ok_or(Error::WindowGone(window))
    }
}

/// A desktop shell whose icons live in memory.
#[derive(Debug, Default)]
pub struct MemoryShell {
    icons: RefCell<Vec<(String, Point)>>,
}

impl MemoryShell {
    pub fn new<'a>(icons: impl IntoIterator<Item = (&'a str, Point)>) -> Self {
        Self {
            icons: RefCell::new(
                icons
                    .into_iter()
                    .map(|(label, position)| (label.to_owned(), position))
                    .collect(),
            ),
        }
    }

    /// Position of the first icon with this label.
    pub fn position_of(&self, label: &str) -> Option<Point> {
        self.icons
            .borrow()
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, p)| *p)
    }

    /// Drag an icon somewhere else.
    pub fn move_icon(&self, label: &str, position: Point) {
        if let Some((_, p)) = self.icons.borrow_mut().iter_mut().find(|(l, _)| l == label) {
            *p = position;
        }
    }
}

impl IconShell for MemoryShell {
    fn icon_count(&self) -> WinResult<usize> {
        Ok(self.icons.borrow().len())
    }

    fn icon_position(&self, index: usize) -> WinResult<Point> {
        self.icons
            .borrow()
            .get(index)
            .map(|(_, p)| *p)
            .ok_or(Error::NotFound("icon"))
    }

    fn icon_label(&self, index: usize) -> WinResult<String> {
        self.icons
            .borrow()
            .get(index)
            .map(|(l, _)| l.clone())
            .ok_or(Error::NotFound("icon"))
    }

    fn set_icon_position(&self, index: usize, position: Point) -> WinResult<()> {
        self.icons
            .borrow_mut()
            .get_mut(index)
            .map(|(_, p)| *p = position)
            .ok_or(Error::NotFound("icon"))
    }
}
