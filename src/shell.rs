//! Desktop icon access.
//!
//! Reading and moving desktop icons depends on the desktop shell in use, so the
//! layout store only sees this narrow interface.

use crate::geometry::Point;
use crate::prelude::*;

/// Access to the icons on the desktop, addressed by index.
pub trait IconShell {
    fn icon_count(&self) -> WinResult<usize>;

    /// Screen position of the icon at `index`.
    fn icon_position(&self, index: usize) -> WinResult<Point>;

    /// Label shown under the icon at `index`.
    fn icon_label(&self, index: usize) -> WinResult<String>;

    fn set_icon_position(&self, index: usize, position: Point) -> WinResult<()>;
}

/// Shell for desktops whose icons cannot be inspected.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedShell;

impl IconShell for UnsupportedShell {
    fn icon_count(&self) -> WinResult<usize> {
        Err(Error::Unsupported("desktop icon introspection"))
    }

    fn icon_position(&self, _index: usize) -> WinResult<Point> {
        Err(Error::Unsupported("desktop icon introspection"))
    }

    fn icon_label(&self, _index: usize) -> WinResult<String> {
        Err(Error::Unsupported("desktop icon introspection"))
    }

    fn set_icon_position(&self, _index: usize, _position: Point) -> WinResult<()> {
        Err(Error::Unsupported("desktop icon introspection"))
    }
}
