//! Window system implementations.

#[cfg(feature = "x11")]
mod x11;

#[cfg(feature = "x11")]
pub use self::x11::X11Desktop;
