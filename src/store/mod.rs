//! Named layout files.
//!
//! A layout file is a single JSON array of entries, stored under one of the
//! [`dirs::LayoutDirs`] folders and identified by its file name. Saving over an
//! existing name replaces the file.

pub mod dirs;
pub mod icons;
pub mod windows;

pub use dirs::LayoutDirs;
pub use icons::{IconLayoutStore, SavedIconEntry};
pub use windows::{LayoutStore, MatchTier, RestoreMatch, RestoreSummary, SavedWindowEntry};

use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::prelude::*;

/// Write `entries` to `path`, creating its directory if needed.
fn write_document<T: Serialize>(path: &Path, entries: &[T]) -> WinResult<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let mut writer = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer(&mut writer, entries)?;
    writer.flush()?;

    debug!("Wrote {} entries to [{:?}]", entries.len(), path);
    Ok(())
}

/// Read the entries stored at `path`. A missing file reads as `None`.
fn read_document<T: DeserializeOwned>(path: &Path) -> WinResult<Option<Vec<T>>> {
    let document = match fs::read_to_string(path) {
        Ok(document) => document,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No layout at [{:?}]", path);
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let entries: Vec<T> = serde_json::from_str(&document)?;
    debug!("Read {} entries from [{:?}]", entries.len(), path);
    Ok(Some(entries))
}
