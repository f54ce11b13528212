//! Window handles, placements, and the window system interface.
//!
//! Everything in this crate talks to the desktop through [`WindowSystem`]. The
//! X11 implementation lives in [`crate::backend`]; the `testing` module (behind
//! the `testing` feature) provides an in-memory one.

use std::fmt;
use std::time::Duration;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::errors::WinResult;
use crate::geometry::{Bounds, Point, Rect, Size};

/// Longest title kept for a window, in UTF-16 code units.
pub const MAX_TITLE_LEN: usize = 255;

/// Opaque identifier of a live top-level window.
///
/// Handles are borrowed from the window system and may go stale at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct WindowHandle(pub u64);

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// How a window is shown. Numeric values follow the Win32 `SW_*` constants,
/// which is what layout files store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "u32", into = "u32")]
pub enum ShowCommand {
    Hide,
    Normal,
    ShowMinimized,
    Maximized,
    NoActivate,
    Show,
    Minimize,
    MinimizedNoActivate,
    ShowNoActivate,
    Restore,
    Default,
    ForceMinimize,
    /// A value this tool does not interpret; kept so it survives a round trip.
    Other(u32),
}

impl ShowCommand {
    #[must_use]
    pub const fn is_minimized(self) -> bool {
        matches!(
            self,
            Self::ShowMinimized | Self::Minimize | Self::MinimizedNoActivate | Self::ForceMinimize
        )
    }

    #[must_use]
    pub const fn is_maximized(self) -> bool {
        matches!(self, Self::Maximized)
    }
}

impl From<u32> for ShowCommand {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Hide,
            1 => Self::Normal,
            2 => Self::ShowMinimized,
            3 => Self::Maximized,
            4 => Self::NoActivate,
            5 => Self::Show,
            6 => Self::Minimize,
            7 => Self::MinimizedNoActivate,
            8 => Self::ShowNoActivate,
            9 => Self::Restore,
            10 => Self::Default,
            11 => Self::ForceMinimize,
            other => Self::Other(other),
        }
    }
}

impl From<ShowCommand> for u32 {
    fn from(command: ShowCommand) -> Self {
        match command {
            ShowCommand::Hide => 0,
            ShowCommand::Normal => 1,
            ShowCommand::ShowMinimized => 2,
            ShowCommand::Maximized => 3,
            ShowCommand::NoActivate => 4,
            ShowCommand::Show => 5,
            ShowCommand::Minimize => 6,
            ShowCommand::MinimizedNoActivate => 7,
            ShowCommand::ShowNoActivate => 8,
            ShowCommand::Restore => 9,
            ShowCommand::Default => 10,
            ShowCommand::ForceMinimize => 11,
            ShowCommand::Other(other) => other,
        }
    }
}

bitflags! {
    /// Placement flags, as stored in layout files.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct PlacementFlags: u32 {
        const SET_MIN_POSITION = 0x1;
        const RESTORE_TO_MAXIMIZED = 0x2;
        const ASYNC_PLACEMENT = 0x4;
    }
}

/// (De)serialize [`PlacementFlags`] as its raw bits, keeping unknown bits.
pub mod flag_bits {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::PlacementFlags;

    pub fn serialize<S: Serializer>(flags: &PlacementFlags, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(flags.bits())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PlacementFlags, D::Error> {
        u32::deserialize(deserializer).map(PlacementFlags::from_bits_retain)
    }
}

/// Geometry and show state of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub flags: PlacementFlags,
    pub show: ShowCommand,
    /// Where the window sits while minimized.
    pub min_position: Point,
    /// Where the window sits while maximized.
    pub max_position: Point,
    /// The restored (neither minimized nor maximized) rectangle.
    pub normal: Bounds,
}

/// A window that survived enumeration filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRecord {
    pub handle: WindowHandle,
    pub title: String,
    /// Position in the order the window system reported windows.
    pub index: usize,
}

/// Cut a title down to [`MAX_TITLE_LEN`] UTF-16 code units, on a character
/// boundary.
#[must_use]
pub fn truncate_title(title: &str) -> &str {
    let mut units = 0;
    for (offset, c) in title.char_indices() {
        units += c.len_utf16();
        if units > MAX_TITLE_LEN {
            return &title[..offset];
        }
    }
    title
}

/// Access to the live desktop.
///
/// Queries on a stale handle report the window as absent (`None`, `false`, or
/// [`crate::errors::Error::WindowGone`]); commands on a stale handle may fail
/// or silently do nothing.
pub trait WindowSystem {
    /// Every top-level window, in the order the window system reports them.
    fn top_level_windows(&self) -> WinResult<Vec<WindowHandle>>;

    /// The window owning `window`, if it is not a true top-level window.
    fn parent(&self, window: WindowHandle) -> Option<WindowHandle>;

    fn is_visible(&self, window: WindowHandle) -> bool;

    /// Whether the window accepts input.
    fn is_enabled(&self, window: WindowHandle) -> bool;

    /// Whether the window's owner answers a liveness probe within `timeout`.
    fn is_responsive(&self, window: WindowHandle, timeout: Duration) -> bool;

    /// Window title. `Ok(None)` if the window has no title or is gone.
    fn title(&self, window: WindowHandle) -> WinResult<Option<String>>;

    /// Full path of the executable owning the window.
    fn process_path(&self, window: WindowHandle) -> WinResult<Option<String>>;

    /// Size of the (single, virtual) screen.
    fn screen_size(&self) -> Size;

    fn is_minimized(&self, window: WindowHandle) -> bool;

    /// Live bounding rectangle of the window, including decorations.
    fn frame(&self, window: WindowHandle) -> WinResult<Rect>;

    fn placement(&self, window: WindowHandle) -> WinResult<Placement>;

    fn set_placement(&self, window: WindowHandle, placement: &Placement) -> WinResult<()>;

    /// Move and resize the window.
    fn set_frame(&self, window: WindowHandle, frame: Rect) -> WinResult<()>;

    fn show(&self, window: WindowHandle, command: ShowCommand) -> WinResult<()>;

    /// Put the window on top of the stacking order, without leaving it
    /// permanently above other windows.
    fn bring_to_front(&self, window: WindowHandle) -> WinResult<()>;

    fn close(&self, window: WindowHandle) -> WinResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_command_round_trips_through_numbers() {
        for value in 0..=12 {
            assert_eq!(u32::from(ShowCommand::from(value)), value);
        }
        assert_eq!(ShowCommand::from(12), ShowCommand::Other(12));
        assert!(ShowCommand::from(2).is_minimized());
        assert!(ShowCommand::from(3).is_maximized());
    }

    #[test]
    fn long_titles_are_truncated_on_char_boundaries() {
        let title = "é".repeat(300);
        let truncated = truncate_title(&title);
        assert_eq!(truncated.chars().count(), MAX_TITLE_LEN);

        // Astral characters take two UTF-16 units each.
        let emoji = "😀".repeat(200);
        assert_eq!(truncate_title(&emoji).chars().count(), 127);

        assert_eq!(truncate_title("Terminal"), "Terminal");
    }

    #[test]
    fn unknown_flag_bits_survive_serialization() {
        #[derive(Deserialize, Serialize)]
        struct Wrapper {
            #[serde(with = "flag_bits")]
            flags: PlacementFlags,
        }

        let parsed: Wrapper = serde_json::from_str(r#"{"flags": 258}"#).unwrap();
        assert!(parsed.flags.contains(PlacementFlags::RESTORE_TO_MAXIMIZED));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), r#"{"flags":258}"#);
    }
}
