//! Saving and restoring window placements.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{read_document, write_document, LayoutDirs};
use crate::geometry::{Bounds, Point};
use crate::prelude::*;
use crate::text::same_text;
use crate::window::{flag_bits, Placement, PlacementFlags, ShowCommand, WindowHandle, WindowSystem};

/// Size marker of the placement record, kept for file compatibility.
pub const PLACEMENT_LENGTH: u32 = 44;

const fn placement_length() -> u32 {
    PLACEMENT_LENGTH
}

/// One window of a saved layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SavedWindowEntry {
    /// Executable of the process owning the window.
    pub process: String,
    #[serde(default)]
    pub minimized: bool,
    /// Handle at save time. Usually stale by the time the layout is restored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<WindowHandle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default = "placement_length")]
    pub length: u32,
    #[serde(default, with = "flag_bits")]
    pub flags: PlacementFlags,
    #[serde(rename = "showCmd")]
    pub show: ShowCommand,
    #[serde(rename = "ptMinPosition", default)]
    pub min_position: Point,
    #[serde(rename = "ptMaxPosition", default)]
    pub max_position: Point,
    /// The restored rectangle. Never the zero rectangle placement queries
    /// report for windows that are not minimized.
    #[serde(rename = "rcNormalPosition")]
    pub normal: Bounds,
}

impl SavedWindowEntry {
    /// Record the current placement of `window`.
    pub fn capture<S: WindowSystem + ?Sized>(system: &S, window: WindowHandle) -> WinResult<Self> {
        let mut placement = system.placement(window)?;
        let minimized = system.is_minimized(window);

        // Only a minimized window has a trustworthy restore rectangle.
        if !minimized {
            placement.normal = Bounds::from(system.frame(window)?);
        }

        Ok(Self {
            process: system.process_path(window)?.unwrap_or_default(),
            minimized,
            handle: Some(window),
            title: system.title(window)?,
            length: PLACEMENT_LENGTH,
            flags: placement.flags,
            show: placement.show,
            min_position: placement.min_position,
            max_position: placement.max_position,
            normal: placement.normal,
        })
    }

    #[must_use]
    pub fn placement(&self) -> Placement {
        Placement {
            flags: self.flags,
            show: self.show,
            min_position: self.min_position,
            max_position: self.max_position,
            normal: self.normal,
        }
    }
}

/// How a saved entry was paired with a live window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTier {
    Handle,
    Title,
    Process,
}

/// A saved entry that was applied to a live window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreMatch {
    /// Position of the entry in the layout file.
    pub entry: usize,
    pub window: WindowHandle,
    pub tier: MatchTier,
}

/// Outcome of restoring a window layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    pub matches: Vec<RestoreMatch>,
    /// Entries no live window matched.
    pub unmatched: usize,
    /// Matched entries whose window refused the new placement.
    pub failed: usize,
}

/// Identity of a live window, read once per restore.
struct LiveWindow {
    handle: WindowHandle,
    title: Option<String>,
    process: Option<String>,
}

/// Saves window placements to named layouts and restores them.
pub struct LayoutStore<'a, S: WindowSystem + ?Sized> {
    system: &'a S,
    dirs: &'a LayoutDirs,
}

impl<'a, S: WindowSystem + ?Sized> LayoutStore<'a, S> {
    pub fn new(system: &'a S, dirs: &'a LayoutDirs) -> Self {
        Self { system, dirs }
    }

    /// Record the placement of each window, in order.
    ///
    /// Windows that close while being captured are left out.
    pub fn capture(&self, windows: &[WindowHandle]) -> WinResult<Vec<SavedWindowEntry>> {
        let mut entries = Vec::with_capacity(windows.len());
        for &window in windows {
            match SavedWindowEntry::capture(self.system, window) {
                Ok(entry) => entries.push(entry),
                Err(e @ Error::Encoding(_)) => return Err(e),
                Err(e) => debug!("Not saving window {}: {}", window, e),
            }
        }
        Ok(entries)
    }

    /// Save the placement of `windows` as the layout `name`, replacing any
    /// layout of the same name. Returns the file written.
    pub fn save(&self, name: &str, windows: &[WindowHandle]) -> WinResult<PathBuf> {
        let path = self.dirs.window_layout(name)?;
        let entries = self.capture(windows)?;
        write_document(&path, &entries)?;

        info!("Saved {} windows to [{:?}]", entries.len(), path);
        Ok(path)
    }

    /// Entries of the layout `name`, or `None` if it was never saved.
    pub fn load(&self, name: &str) -> WinResult<Option<Vec<SavedWindowEntry>>> {
        read_document(&self.dirs.window_layout(name)?)
    }

    /// Restore the layout `name` onto the `live` windows.
    ///
    /// A layout that does not exist restores nothing.
    pub fn restore(&self, name: &str, live: &[WindowHandle]) -> WinResult<RestoreSummary> {
        let entries = match self.load(name)? {
            Some(entries) => entries,
            None => return Ok(RestoreSummary::default()),
        };

        let summary = self.apply(&entries, live)?;
        info!(
            "Restored {} of {} windows from layout [{}]",
            summary.matches.len(),
            entries.len(),
            name
        );
        Ok(summary)
    }

    /// Apply saved entries to the `live` windows.
    ///
    /// Entries are handled in order. Each one goes to the first live window
    /// with the same handle, failing that the first with the same title,
    /// failing that the first with the same process. Several entries may land
    /// on the same window; the last one applied wins.
    pub fn apply(&self, entries: &[SavedWindowEntry], live: &[WindowHandle]) -> WinResult<RestoreSummary> {
        let live = self.identify(live)?;
        let mut summary = RestoreSummary::default();

        for (index, entry) in entries.iter().enumerate() {
            let (window, tier) = match find_match(entry, &live) {
                Some(found) => found,
                None => {
                    debug!("No window matches saved entry [{}]", entry.process);
                    summary.unmatched += 1;
                    continue;
                }
            };
            trace!("Saved entry {} matches window {} by {:?}", index, window, tier);

            match self.system.set_placement(window, &entry.placement()) {
                Ok(()) => summary.matches.push(RestoreMatch {
                    entry: index,
                    window,
                    tier,
                }),
                Err(e) => {
                    warn!("Could not restore window {}: {}", window, e);
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }

    fn identify(&self, live: &[WindowHandle]) -> WinResult<Vec<LiveWindow>> {
        live.iter()
            .map(|&handle| {
                Ok(LiveWindow {
                    handle,
                    title: absorb(handle, self.system.title(handle))?,
                    process: absorb(handle, self.system.process_path(handle))?,
                })
            })
            .collect()
    }
}

/// Treat a failed query as an absent value, except for encoding failures.
fn absorb(window: WindowHandle, result: WinResult<Option<String>>) -> WinResult<Option<String>> {
    match result {
        Err(e @ Error::Encoding(_)) => Err(e),
        Err(e) => {
            debug!("Could not identify window {}: {}", window, e);
            Ok(None)
        }
        ok => ok,
    }
}

fn find_match(entry: &SavedWindowEntry, live: &[LiveWindow]) -> Option<(WindowHandle, MatchTier)> {
    let equal = |text: &Option<String>, wanted: &str| {
        text.as_deref().map_or(false, |text| same_text(wanted, text))
    };

    if let Some(handle) = entry.handle {
        if let Some(window) = live.iter().find(|w| w.handle == handle) {
            return Some((window.handle, MatchTier::Handle));
        }
    }

    if let Some(title) = &entry.title {
        if let Some(window) = live.iter().find(|w| equal(&w.title, title)) {
            return Some((window.handle, MatchTier::Title));
        }
    }

    // Several windows of one program are indistinguishable here; the first wins.
    live.iter()
        .find(|w| equal(&w.process, &entry.process))
        .map(|window| (window.handle, MatchTier::Process))
}
