//! X atom utilities.

use std::cell::RefCell;
use std::collections::HashMap;
use std::os::raw::c_char;

use log::*;
use x11_dl::xlib;

define_atom_names! {
    /// EWMH and ICCCM atoms needed to inspect and arrange client windows.
    pub names {
        _NET_ACTIVE_WINDOW,
        _NET_CLIENT_LIST,
        _NET_CLOSE_WINDOW,
        _NET_FRAME_EXTENTS,
        _NET_WM_NAME,
        _NET_WM_PID,
        _NET_WM_STATE,
        _NET_WM_STATE_ABOVE,
        _NET_WM_STATE_HIDDEN,
        _NET_WM_STATE_MAXIMIZED_HORZ,
        _NET_WM_STATE_MAXIMIZED_VERT,
        _NET_WM_STATE_SKIP_TASKBAR,
        UTF8_STRING,
        WM_STATE,
    }
}

/// Helper for keeping track of interned atoms.
pub struct AtomCache {
    atoms: RefCell<HashMap<&'static str, xlib::Atom>>,
}

impl AtomCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            atoms: RefCell::new(HashMap::new()),
        }
    }

    /// Retrieve an atom value, interning it on first use.
    pub fn get(
        &self,
        xlib: &xlib::Xlib,
        display: *mut xlib::Display,
        name: &'static str,
    ) -> xlib::Atom {
        if let Some(atom) = self.atoms.borrow().get(name) {
            return *atom;
        }

        let c_name = format!("{}\0", name);
        let atom = unsafe {
            (xlib.XInternAtom)(display, c_name.as_ptr() as *const c_char, xlib::False)
        };
        trace!("Interned atom {} as {}", name, atom);

        self.atoms.borrow_mut().insert(name, atom);
        atom
    }
}

impl Default for AtomCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AtomCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} atoms stored", self.atoms.borrow().len())
    }
}
