//! Saving and restoring desktop icon positions.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

use super::{read_document, write_document, LayoutDirs};
use crate::geometry::Point;
use crate::prelude::*;
use crate::shell::IconShell;
use crate::text::same_text;

/// One icon of a saved desktop layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SavedIconEntry {
    /// Label shown under the icon.
    pub icon: String,
    #[serde(deserialize_with = "lenient_point")]
    pub position: Point,
}

/// A coordinate written either as a number or as numeric text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(i32),
    Text(String),
}

impl Coordinate {
    fn value<E: serde::de::Error>(self) -> Result<i32, E> {
        match self {
            Self::Number(value) => Ok(value),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid coordinate {:?}", text))),
        }
    }
}

fn lenient_point<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Point, D::Error> {
    #[derive(Deserialize)]
    struct RawPoint {
        x: Coordinate,
        y: Coordinate,
    }

    let raw = RawPoint::deserialize(deserializer)?;
    Ok(Point::new(
        raw.x.value::<D::Error>()?,
        raw.y.value::<D::Error>()?,
    ))
}

/// Saves desktop icon positions to named layouts and restores them.
pub struct IconLayoutStore<'a, H: IconShell + ?Sized> {
    shell: &'a H,
    dirs: &'a LayoutDirs,
}

impl<'a, H: IconShell + ?Sized> IconLayoutStore<'a, H> {
    pub fn new(shell: &'a H, dirs: &'a LayoutDirs) -> Self {
        Self { shell, dirs }
    }

    /// Label and position of every icon on the desktop.
    ///
    /// Icons that cannot be read are left out.
    pub fn capture(&self) -> WinResult<Vec<SavedIconEntry>> {
        let count = self.shell.icon_count()?;

        let mut entries = Vec::with_capacity(count);
        for index in 0..count {
            let entry = self.shell.icon_label(index).and_then(|icon| {
                Ok(SavedIconEntry {
                    icon,
                    position: self.shell.icon_position(index)?,
                })
            });
            match entry {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Not saving icon {}: {}", index, e),
            }
        }
        Ok(entries)
    }

    /// Save the desktop icon positions as the layout `name`. Returns the file
    /// written.
    pub fn save(&self, name: &str) -> WinResult<PathBuf> {
        let path = self.dirs.desktop_layout(name)?;
        let entries = self.capture()?;
        write_document(&path, &entries)?;

        info!("Saved {} icons to [{:?}]", entries.len(), path);
        Ok(path)
    }

    pub fn load(&self, name: &str) -> WinResult<Option<Vec<SavedIconEntry>>> {
        read_document(&self.dirs.desktop_layout(name)?)
    }

    /// Move every icon with a saved position back to it. Returns how many
    /// icons were moved; a layout that does not exist moves none.
    pub fn restore(&self, name: &str) -> WinResult<usize> {
        match self.load(name)? {
            Some(entries) => self.apply(&entries),
            None => Ok(0),
        }
    }

    /// Move each icon to the position of the first entry with its label.
    pub fn apply(&self, entries: &[SavedIconEntry]) -> WinResult<usize> {
        let mut moved = 0;
        for index in 0..self.shell.icon_count()? {
            let label = self.shell.icon_label(index)?;
            let saved = match entries.iter().find(|e| same_text(&e.icon, &label)) {
                Some(saved) => saved,
                None => {
                    trace!("No saved position for icon [{}]", label);
                    continue;
                }
            };

            match self.shell.set_icon_position(index, saved.position) {
                Ok(()) => moved += 1,
                Err(e) => warn!("Could not move icon [{}]: {}", label, e),
            }
        }

        info!("Restored {} of {} saved icons", moved, entries.len());
        Ok(moved)
    }
}
