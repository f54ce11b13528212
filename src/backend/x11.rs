//! X11 desktops managed by an EWMH compliant window manager.

use std::fs;
use std::time::Duration;

use winstack_x11::context::DisplayContext;
use winstack_x11::window::{self as xwindow, Title, Window};
use winstack_x11::{atoms::names, xlib};

use crate::geometry::{Bounds, Point, Rect, Size};
use crate::prelude::*;
use crate::text::{decode, TextEncoding};
use crate::window::{Placement, PlacementFlags, ShowCommand, WindowHandle, WindowSystem};

/// The X display named by `$DISPLAY`.
pub struct X11Desktop {
    context: DisplayContext,
}

impl X11Desktop {
    pub fn connect() -> WinResult<Self> {
        let context = DisplayContext::open().map_err(|e| Error::Backend(e.to_string()))?;
        Ok(Self { context })
    }

    fn window(handle: WindowHandle) -> Window {
        Window::from_xid(handle.0 as xlib::Window)
    }

    fn handle(window: Window) -> WindowHandle {
        WindowHandle(window.get_xid() as u64)
    }

    /// The window behind `handle`, if it still exists.
    fn live(&self, handle: WindowHandle) -> WinResult<Window> {
        let window = Self::window(handle);
        match window.get_attributes(&self.context) {
            Some(_) => Ok(window),
            None => Err(Error::WindowGone(handle)),
        }
    }

    fn set_maximized(&self, window: &Window, maximized: bool) {
        let action = if maximized {
            xwindow::STATE_ADD
        } else {
            xwindow::STATE_REMOVE
        };
        window.change_state(
            &self.context,
            action,
            names::_NET_WM_STATE_MAXIMIZED_VERT,
            Some(names::_NET_WM_STATE_MAXIMIZED_HORZ),
        );
    }

    fn apply_show(&self, window: &Window, command: ShowCommand) {
        match command {
            command if command.is_minimized() || command == ShowCommand::Hide => {
                window.iconify(&self.context)
            }
            ShowCommand::Maximized => {
                window.activate(&self.context);
                self.set_maximized(window, true);
            }
            _ => {
                if window.is_iconic(&self.context) {
                    window.activate(&self.context);
                }
                self.set_maximized(window, false);
            }
        }
    }

    /// Move the outer frame of `window` to `frame`.
    ///
    /// The window manager positions the frame at the requested origin, while
    /// the requested size is that of the client area.
    fn move_frame(&self, window: &Window, frame: Rect) {
        let extents = window.get_frame_extents(&self.context);
        let width = frame.width - extents.left - extents.right;
        let height = frame.height - extents.top - extents.bottom;

        window.move_resize(
            &self.context,
            xwindow::Geometry {
                x: frame.x,
                y: frame.y,
                width: width.max(1) as u32,
                height: height.max(1) as u32,
            },
        );
    }
}

/// Process id of the window's owner.
fn pid(context: &DisplayContext, window: &Window) -> Option<u32> {
    window.get_pid(context).filter(|pid| *pid != 0)
}

/// Whether the process is stopped or a zombie, per `/proc/<pid>/stat`.
fn is_process_stalled(pid: u32) -> bool {
    let stat = match fs::read_to_string(format!("/proc/{}/stat", pid)) {
        Ok(stat) => stat,
        Err(_) => return false,
    };

    // The state follows the command name, which may itself contain ')'.
    let state = stat
        .rfind(')')
        .and_then(|end| stat[end + 1..].split_whitespace().next());
    matches!(state, Some("T" | "t" | "Z"))
}

impl WindowSystem for X11Desktop {
    fn top_level_windows(&self) -> WinResult<Vec<WindowHandle>> {
        Ok(self
            .context
            .client_list()
            .into_iter()
            .map(Self::handle)
            .collect())
    }

    fn parent(&self, window: WindowHandle) -> Option<WindowHandle> {
        Self::window(window)
            .get_transient_for(&self.context)
            .map(Self::handle)
    }

    fn is_visible(&self, window: WindowHandle) -> bool {
        let window = Self::window(window);
        let mapped = match window.get_wm_state(&self.context) {
            Some(state) => state != xwindow::WM_STATE_WITHDRAWN,
            None => window
                .get_attributes(&self.context)
                .map_or(false, |attributes| attributes.map_state == xlib::IsViewable),
        };

        mapped && !window.has_net_state(&self.context, names::_NET_WM_STATE_SKIP_TASKBAR)
    }

    fn is_enabled(&self, window: WindowHandle) -> bool {
        Self::window(window).accepts_input(&self.context)
    }

    /// X clients are not probed directly; a window counts as responsive unless
    /// its process is stopped or defunct, so the timeout is never waited on.
    fn is_responsive(&self, window: WindowHandle, _timeout: Duration) -> bool {
        match pid(&self.context, &Self::window(window)) {
            Some(pid) => !is_process_stalled(pid),
            None => true,
        }
    }

    fn title(&self, window: WindowHandle) -> WinResult<Option<String>> {
        let (bytes, encoding) = match Self::window(window).get_title(&self.context) {
            Some(Title::Utf8(bytes)) => (bytes, TextEncoding::Utf8),
            Some(Title::Latin1(bytes)) => (bytes, TextEncoding::Latin1),
            None => return Ok(None),
        };
        decode(bytes, encoding).map(Some)
    }

    fn process_path(&self, window: WindowHandle) -> WinResult<Option<String>> {
        let pid = match pid(&self.context, &Self::window(window)) {
            Some(pid) => pid,
            None => return Ok(None),
        };

        match fs::read_link(format!("/proc/{}/exe", pid)) {
            Ok(path) => path
                .into_os_string()
                .into_string()
                .map(Some)
                .map_err(|path| Error::Encoding(format!("process path {:?}", path))),
            Err(e) => {
                debug!("No executable for process {}: {}", pid, e);
                Ok(None)
            }
        }
    }

    fn screen_size(&self) -> Size {
        let (width, height) = self.context.screen_size();
        Size::new(width, height)
    }

    fn is_minimized(&self, window: WindowHandle) -> bool {
        Self::window(window).is_iconic(&self.context)
    }

    fn frame(&self, handle: WindowHandle) -> WinResult<Rect> {
        let window = Self::window(handle);
        let geometry = window
            .get_geometry(&self.context)
            .ok_or(Error::WindowGone(handle))?;
        let extents = window.get_frame_extents(&self.context);

        Ok(Rect::new(
            geometry.x - extents.left,
            geometry.y - extents.top,
            geometry.width as i32 + extents.left + extents.right,
            geometry.height as i32 + extents.top + extents.bottom,
        ))
    }

    /// X keeps no separate restore rectangle, so the current frame stands in
    /// for it. An iconified window keeps its last frame.
    fn placement(&self, handle: WindowHandle) -> WinResult<Placement> {
        let window = self.live(handle)?;
        let iconic = window.is_iconic(&self.context);
        let maximized = window.is_maximized(&self.context);

        let show = if iconic {
            ShowCommand::ShowMinimized
        } else if maximized {
            ShowCommand::Maximized
        } else {
            ShowCommand::Normal
        };
        let mut flags = PlacementFlags::empty();
        if iconic && maximized {
            flags |= PlacementFlags::RESTORE_TO_MAXIMIZED;
        }

        Ok(Placement {
            flags,
            show,
            min_position: Point::new(-1, -1),
            max_position: Point::new(-1, -1),
            normal: Bounds::from(self.frame(handle)?),
        })
    }

    fn set_placement(&self, handle: WindowHandle, placement: &Placement) -> WinResult<()> {
        let window = self.live(handle)?;

        if !placement.normal.is_degenerate() {
            if window.is_iconic(&self.context) && !placement.show.is_minimized() {
                window.activate(&self.context);
            }
            self.set_maximized(&window, false);
            self.move_frame(&window, placement.normal.to_rect());
        }

        self.apply_show(&window, placement.show);

        self.context.flush();
        Ok(())
    }

    fn set_frame(&self, handle: WindowHandle, frame: Rect) -> WinResult<()> {
        let window = self.live(handle)?;
        self.move_frame(&window, frame);
        self.context.flush();
        Ok(())
    }

    fn show(&self, handle: WindowHandle, command: ShowCommand) -> WinResult<()> {
        let window = self.live(handle)?;
        self.apply_show(&window, command);
        self.context.flush();
        Ok(())
    }

    /// Raise through a brief stay in the always-on-top layer, so the window
    /// manager restacks the window without keeping it above others.
    fn bring_to_front(&self, handle: WindowHandle) -> WinResult<()> {
        let window = self.live(handle)?;
        window.change_state(&self.context, xwindow::STATE_ADD, names::_NET_WM_STATE_ABOVE, None);
        window.change_state(&self.context, xwindow::STATE_REMOVE, names::_NET_WM_STATE_ABOVE, None);
        window.raise(&self.context);
        self.context.flush();
        Ok(())
    }

    fn close(&self, handle: WindowHandle) -> WinResult<()> {
        let window = self.live(handle)?;
        window.close(&self.context);
        self.context.flush();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_processes_are_not_stalled() {
        assert!(!is_process_stalled(std::process::id()));
    }

    #[test]
    fn missing_processes_are_not_stalled() {
        assert!(!is_process_stalled(u32::MAX));
    }
}
