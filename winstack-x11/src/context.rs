//! X connection wrapper.

use std::fmt;
use std::os::raw::{c_int, c_long};
use std::ptr;

use log::*;
use x11_dl::xlib;

use crate::atoms::{names, AtomCache};
use crate::window::Window;

/// Failure to connect to an X server.
#[derive(Debug)]
pub enum ConnectError {
    /// `libX11` could not be loaded.
    Library(x11_dl::error::OpenError),
    /// The display named by `$DISPLAY` could not be opened.
    Display,
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Library(e) => write!(f, "could not load libX11: {}", e),
            Self::Display => write!(f, "could not open the X display"),
        }
    }
}

impl std::error::Error for ConnectError {}

/// Requests against windows that closed after enumeration fail with `BadWindow`.
/// Those are expected, so errors are logged and otherwise dropped.
unsafe extern "C" fn log_x_error(_: *mut xlib::Display, event: *mut xlib::XErrorEvent) -> c_int {
    if let Some(event) = event.as_ref() {
        debug!(
            "X error {} (request {}) on resource {:#x}",
            event.error_code, event.request_code, event.resourceid
        );
    }
    0
}

/// Safe wrapper around an X server connection.
pub struct DisplayContext {
    /// X context
    xlib: xlib::Xlib,
    /// Connection to the server
    display: *mut xlib::Display,
    /// Atoms interned on this connection
    atoms: AtomCache,
}

impl DisplayContext {
    /// Connect to the X server named by `$DISPLAY`.
    pub fn open() -> Result<Self, ConnectError> {
        let xlib = xlib::Xlib::open().map_err(ConnectError::Library)?;
        let display = unsafe { (xlib.XOpenDisplay)(ptr::null()) };

        if display.is_null() {
            return Err(ConnectError::Display);
        }

        unsafe { (xlib.XSetErrorHandler)(Some(log_x_error)) };

        let context = Self {
            xlib,
            display,
            atoms: AtomCache::new(),
        };
        for name in names::ALL {
            context.atom(*name);
        }

        info!("Connected to X server");
        Ok(context)
    }

    /// Get raw xlib context.
    pub fn get_raw_context(&self) -> &xlib::Xlib {
        &self.xlib
    }

    /// Get connection pointer.
    pub fn get_connection(&self) -> *mut xlib::Display {
        self.display
    }

    /// Get default screen number.
    pub fn get_default_screen(&self) -> c_int {
        unsafe { (self.xlib.XDefaultScreen)(self.display) }
    }

    /// Get default root window.
    pub fn get_default_root(&self) -> Window {
        Window::from_xid(unsafe { (self.xlib.XDefaultRootWindow)(self.display) })
    }

    /// Width and height of the default screen, in pixels.
    pub fn screen_size(&self) -> (i32, i32) {
        let screen = self.get_default_screen();
        unsafe {
            (
                (self.xlib.XDisplayWidth)(self.display, screen),
                (self.xlib.XDisplayHeight)(self.display, screen),
            )
        }
    }

    /// Get an interned atom.
    pub fn atom(&self, name: &'static str) -> xlib::Atom {
        self.atoms.get(&self.xlib, self.display, name)
    }

    /// Flush the X command queue and wait for it to be processed.
    pub fn flush(&self) {
        unsafe { (self.xlib.XSync)(self.display, xlib::False) };
    }

    /// Client windows managed by the running window manager, in mapping order.
    ///
    /// Without an EWMH compliant window manager, this falls back to the children
    /// of the root window.
    pub fn client_list(&self) -> Vec<Window> {
        let root = self.get_default_root();
        match root.get_property_longs(self, self.atom(names::_NET_CLIENT_LIST), xlib::XA_WINDOW) {
            Some(clients) => clients.into_iter().map(Window::from_xid).collect(),
            None => {
                debug!("_NET_CLIENT_LIST unavailable, using children of the root window");
                root.get_children(self)
            }
        }
    }

    /// Send a 32 bit client message about `window` to the root window, where the
    /// window manager picks it up.
    pub fn send_client_message(&self, window: &Window, message_type: &'static str, data: [c_long; 5]) {
        let mut message = xlib::ClientMessageData::new();
        for (index, value) in data.iter().enumerate() {
            message.set_long(index, *value);
        }

        let mut event = xlib::XEvent {
            client_message: xlib::XClientMessageEvent {
                type_: xlib::ClientMessage,
                serial: 0,
                send_event: xlib::True,
                display: self.display,
                window: window.get_xid(),
                message_type: self.atom(message_type),
                format: 32,
                data: message,
            },
        };

        unsafe {
            (self.xlib.XSendEvent)(
                self.display,
                self.get_default_root().get_xid(),
                xlib::False,
                xlib::SubstructureRedirectMask | xlib::SubstructureNotifyMask,
                &mut event,
            )
        };
        trace!("Sent {} for window {:#x}", message_type, window.get_xid());
    }
}

impl Drop for DisplayContext {
    fn drop(&mut self) {
        unsafe { (self.xlib.XCloseDisplay)(self.display) };
    }
}
