//! Where layout files live.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::prelude::*;
use crate::text::trim_padding;

/// Folder holding window layouts.
pub const WINDOW_LAYOUT_DIR: &str = "SavedLayouts";
/// Folder holding desktop icon layouts.
pub const DESKTOP_LAYOUT_DIR: &str = "SavedDesktopLayouts";
/// Name used when a layout is saved without one.
pub const DEFAULT_LAYOUT_NAME: &str = "NewLayout";

const EXTENSION: &str = "json";

/// The two layout folders, under a common root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutDirs {
    root: PathBuf,
}

impl LayoutDirs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Layout folders next to the running executable.
    pub fn beside_executable() -> WinResult<Self> {
        let executable = std::env::current_exe()?;
        let root = executable
            .parent()
            .ok_or(Error::NotFound("executable directory"))?;
        Ok(Self::new(root))
    }

    /// The configured storage root, or the executable's directory.
    pub fn from_config(config: &Config) -> WinResult<Self> {
        match &config.storage_root {
            Some(root) => Ok(Self::new(root.clone())),
            None => Self::beside_executable(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Make the storage root the process's working directory.
    pub fn pin_working_dir(&self) -> WinResult<()> {
        std::env::set_current_dir(&self.root)?;
        debug!("Working directory pinned to [{:?}]", self.root);
        Ok(())
    }

    /// Path of the window layout called `name`.
    pub fn window_layout(&self, name: &str) -> WinResult<PathBuf> {
        self.layout_path(WINDOW_LAYOUT_DIR, name)
    }

    /// Path of the desktop icon layout called `name`.
    pub fn desktop_layout(&self, name: &str) -> WinResult<PathBuf> {
        self.layout_path(DESKTOP_LAYOUT_DIR, name)
    }

    /// Names of the saved window layouts, sorted.
    pub fn window_layouts(&self) -> WinResult<Vec<String>> {
        self.list(WINDOW_LAYOUT_DIR)
    }

    /// Names of the saved desktop icon layouts, sorted.
    pub fn desktop_layouts(&self) -> WinResult<Vec<String>> {
        self.list(DESKTOP_LAYOUT_DIR)
    }

    fn layout_path(&self, folder: &str, name: &str) -> WinResult<PathBuf> {
        let file_name = format!("{}.{}", layout_name(name)?, EXTENSION);
        Ok(self.root.join(folder).join(file_name))
    }

    fn list(&self, folder: &str) -> WinResult<Vec<String>> {
        let entries = match fs::read_dir(self.root.join(folder)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_owned());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Normalize a user-supplied layout name.
///
/// Empty names become [`DEFAULT_LAYOUT_NAME`]. Names that would escape the
/// layout folder are rejected.
pub fn layout_name(name: &str) -> WinResult<&str> {
    let name = trim_padding(name).trim();
    if name.is_empty() {
        return Ok(DEFAULT_LAYOUT_NAME);
    }
    if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(Error::InvalidName(name.to_owned()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_are_json_files_in_their_folders() {
        let dirs = LayoutDirs::new("/opt/winstack");
        assert_eq!(
            dirs.window_layout("work").unwrap(),
            Path::new("/opt/winstack/SavedLayouts/work.json")
        );
        assert_eq!(
            dirs.desktop_layout("home").unwrap(),
            Path::new("/opt/winstack/SavedDesktopLayouts/home.json")
        );
    }

    #[test]
    fn empty_names_use_the_default() {
        assert_eq!(layout_name("").unwrap(), DEFAULT_LAYOUT_NAME);
        assert_eq!(layout_name("\0\0").unwrap(), DEFAULT_LAYOUT_NAME);
        assert_eq!(layout_name("  work \0").unwrap(), "work");
    }

    #[test]
    fn names_cannot_leave_the_folder() {
        for name in ["../escape", "a/b", "a\\b", ".."] {
            assert!(matches!(layout_name(name), Err(Error::InvalidName(_))));
        }
    }

    #[test]
    fn dotted_names_keep_their_dots() {
        let dirs = LayoutDirs::new("/tmp");
        assert_eq!(
            dirs.window_layout("v1.2").unwrap(),
            Path::new("/tmp/SavedLayouts/v1.2.json")
        );
    }

    #[test]
    fn listing_finds_saved_layouts() {
        let root = tempfile::tempdir().unwrap();
        let dirs = LayoutDirs::new(root.path());
        assert!(dirs.window_layouts().unwrap().is_empty());

        let folder = root.path().join(WINDOW_LAYOUT_DIR);
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("work.json"), "[]").unwrap();
        fs::write(folder.join("home.json"), "[]").unwrap();
        fs::write(folder.join("notes.txt"), "").unwrap();

        assert_eq!(dirs.window_layouts().unwrap(), vec!["home", "work"]);
        assert!(dirs.desktop_layouts().unwrap().is_empty());
    }
}
