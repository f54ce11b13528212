//! X11 wrapper.
//!
//! Only the client side of the EWMH protocol is covered: reading the managed
//! window list and window properties, and asking the running window manager to
//! move, iconify, maximize or close windows.

#[macro_use]
mod macros;

pub mod atoms;
pub mod context;
pub mod window;

pub use x11_dl::xlib;
