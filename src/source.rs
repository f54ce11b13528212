//! Enumeration of user-relevant top-level windows.

use std::time::Duration;

use crate::config::Config;
use crate::prelude::*;
use crate::window::{truncate_title, WindowHandle, WindowRecord, WindowSystem};

/// Title of this tool's own window.
pub const SELF_TITLE: &str = "winstack";

/// Shell windows that are always present and never worth arranging.
const SHELL_TITLES: &[&str] = &[
    "Program Manager",
    "Windows Input Experience",
    "Windows Shell Experience Host",
];

/// Produces the ordered list of windows the layout operations work on.
pub struct WindowSource<'a, S: WindowSystem + ?Sized> {
    system: &'a S,
    excluded: Vec<String>,
    probe_timeout: Duration,
}

impl<'a, S: WindowSystem + ?Sized> WindowSource<'a, S> {
    pub fn new(system: &'a S, config: &Config) -> Self {
        let mut excluded: Vec<String> = SHELL_TITLES.iter().map(|t| (*t).to_owned()).collect();
        excluded.push(SELF_TITLE.to_owned());
        #[cfg(debug_assertions)]
        excluded.extend(config.dev_host_titles.iter().cloned());
        excluded.extend(config.excluded_titles.iter().cloned());

        Self {
            system,
            excluded,
            probe_timeout: config.probe_timeout(),
        }
    }

    /// Enumerate candidate windows, sorted by title.
    ///
    /// Windows that vanish or stop responding mid-enumeration are skipped.
    pub fn enumerate(&self) -> WinResult<Vec<WindowRecord>> {
        let candidates = self
            .system
            .top_level_windows()?
            .into_iter()
            .enumerate()
            .filter(|&(_, window)| self.is_candidate(window));

        let mut records = Vec::new();
        for (index, window) in candidates {
            let title = match self.system.title(window)? {
                Some(title) => truncate_title(&title).to_owned(),
                None => continue,
            };
            if title.is_empty() || self.is_excluded(&title) {
                trace!("Skipping window {} [{}]", window, title);
                continue;
            }
            records.push(WindowRecord {
                handle: window,
                title,
                index,
            });
        }

        // Stable, so windows sharing a title keep enumeration order.
        records.sort_by(|a, b| a.title.cmp(&b.title));

        debug!("Enumerated {} windows", records.len());
        Ok(records)
    }

    /// Handles of [`Self::enumerate`], in the same order.
    pub fn handles(&self) -> WinResult<Vec<WindowHandle>> {
        Ok(self.enumerate()?.into_iter().map(|r| r.handle).collect())
    }

    /// The first enumerated window titled exactly `title`.
    pub fn find(&self, title: &str) -> WinResult<WindowHandle> {
        self.enumerate()?
            .into_iter()
            .find(|r| r.title == title)
            .map(|r| r.handle)
            .ok_or(Error::NotFound("window"))
    }

    fn is_candidate(&self, window: WindowHandle) -> bool {
        self.system.parent(window).is_none()
            && self.system.is_visible(window)
            && self.system.is_responsive(window, self.probe_timeout)
            && self.system.is_enabled(window)
    }

    fn is_excluded(&self, title: &str) -> bool {
        self.excluded.iter().any(|excluded| excluded == title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Size};
    use crate::testing::{MemoryDesktop, MemoryWindow};
    use crate::text::TextEncoding;

    fn window(title: &str) -> MemoryWindow {
        MemoryWindow::new(title, "/usr/bin/app", Rect::new(0, 0, 400, 300))
    }

    fn titles(desktop: &MemoryDesktop, config: &Config) -> Vec<String> {
        WindowSource::new(desktop, config)
            .enumerate()
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect()
    }

    #[test]
    fn windows_are_sorted_by_title_case_sensitively() {
        let desktop = MemoryDesktop::new(Size::new(1920, 1080));
        desktop.add(window("terminal"));
        desktop.add(window("Editor"));
        desktop.add(window("Browser"));

        assert_eq!(
            titles(&desktop, &Config::default()),
            vec!["Browser", "Editor", "terminal"]
        );
    }

    #[test]
    fn equal_titles_keep_enumeration_order() {
        let desktop = MemoryDesktop::new(Size::new(1920, 1080));
        let first = desktop.add(window("Terminal"));
        desktop.add(window("Browser"));
        let second = desktop.add(window("Terminal"));

        let records = WindowSource::new(&desktop, &Config::default())
            .enumerate()
            .unwrap();
        let terminals: Vec<_> = records
            .iter()
            .filter(|r| r.title == "Terminal")
            .map(|r| (r.handle, r.index))
            .collect();
        assert_eq!(terminals, vec![(first, 0), (second, 2)]);
    }

    #[test]
    fn unusable_windows_are_filtered() {
        let desktop = MemoryDesktop::new(Size::new(1920, 1080));
        let owner = desktop.add(window("Owner"));
        desktop.add(MemoryWindow {
            parent: Some(owner),
            ..window("Dialog")
        });
        desktop.add(MemoryWindow {
            visible: false,
            ..window("Hidden")
        });
        desktop.add(MemoryWindow {
            responsive: false,
            ..window("Hung")
        });
        desktop.add(MemoryWindow {
            enabled: false,
            ..window("Disabled")
        });
        desktop.add(window(""));
        desktop.add(window("Program Manager"));
        desktop.add(window(SELF_TITLE));

        assert_eq!(titles(&desktop, &Config::default()), vec!["Owner"]);
    }

    #[test]
    fn configured_titles_are_excluded() {
        let desktop = MemoryDesktop::new(Size::new(1920, 1080));
        desktop.add(window("Conky"));
        desktop.add(window("Editor"));

        let config = Config {
            excluded_titles: vec!["Conky".to_owned()],
            ..Config::default()
        };
        assert_eq!(titles(&desktop, &config), vec!["Editor"]);
    }

    #[test]
    fn windows_are_found_by_exact_title() {
        let desktop = MemoryDesktop::new(Size::new(1920, 1080));
        desktop.add(window("Editor - notes"));
        let editor = desktop.add(window("Editor"));
        desktop.add(window("Editor"));

        let source = WindowSource::new(&desktop, &Config::default());
        assert_eq!(source.find("Editor").unwrap(), editor);
        assert!(matches!(source.find("editor"), Err(Error::NotFound(_))));
    }

    #[test]
    fn latin1_titles_are_decoded_not_rejected() {
        let desktop = MemoryDesktop::new(Size::new(1920, 1080));
        desktop.add(window("Editor"));
        desktop.add(MemoryWindow {
            title_bytes: Some((b"caf\xe9".to_vec(), TextEncoding::Latin1)),
            ..window("")
        });
        desktop.add(window("Browser"));

        assert_eq!(
            titles(&desktop, &Config::default()),
            vec!["Browser", "Editor", "café"]
        );
    }

    #[test]
    fn invalid_utf8_titles_are_a_hard_error() {
        let desktop = MemoryDesktop::new(Size::new(1920, 1080));
        desktop.add(window("Editor"));
        desktop.add(MemoryWindow {
            title_bytes: Some((b"caf\xe9".to_vec(), TextEncoding::Utf8)),
            ..window("")
        });

        let result = WindowSource::new(&desktop, &Config::default()).enumerate();
        assert!(matches!(result, Err(Error::Encoding(_))));
    }

    #[test]
    #[cfg(debug_assertions)]
    fn development_hosts_are_excluded_in_debug_builds() {
        let desktop = MemoryDesktop::new(Size::new(1920, 1080));
        desktop.add(window("winstack - Visual Studio Code"));
        desktop.add(window("Editor"));

        let config = Config {
            dev_host_titles: vec!["winstack - Visual Studio Code".to_owned()],
            ..Config::default()
        };
        assert_eq!(titles(&desktop, &config), vec!["Editor"]);
    }

    #[test]
    fn long_titles_are_truncated() {
        let desktop = MemoryDesktop::new(Size::new(1920, 1080));
        desktop.add(window(&"a".repeat(400)));

        let records = WindowSource::new(&desktop, &Config::default())
            .enumerate()
            .unwrap();
        assert_eq!(records[0].title.len(), 255);
    }
}
