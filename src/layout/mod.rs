//! Tools for window layout management.
//!
//! A [`Layout`] computes target frames from a window count and the screen
//! size; an [`Arranger`] applies them to live windows.

mod cascade;
mod paging;
mod stack;

pub use cascade::*;
pub use paging::*;
pub use stack::*;

use crate::config::Config;
use crate::geometry::{Rect, Size};
use crate::prelude::*;
use crate::window::{ShowCommand, WindowHandle, WindowSystem};

/// Window positions and sizes based on an implemented algorithm.
pub trait Layout {
    /// Target frames for `count` windows on `screen`, in input order.
    fn frames(&self, count: usize, screen: Size) -> Vec<Rect>;
}

/// Applies layouts to live windows.
///
/// Windows are handled one at a time in input order. A window that cannot be
/// moved, usually because it closed after enumeration, is logged and skipped.
pub struct Arranger<'a, S: WindowSystem + ?Sized> {
    system: &'a S,
    config: &'a Config,
}

impl<'a, S: WindowSystem + ?Sized> Arranger<'a, S> {
    pub fn new(system: &'a S, config: &'a Config) -> Self {
        Self { system, config }
    }

    /// Stack one page of `windows`, returning the page that was laid out.
    ///
    /// Sets no larger than a page are stacked whole.
    pub fn stack(&self, windows: &[WindowHandle], page: usize) -> Pager {
        let pager = Pager::new(windows.len(), self.config.stack.page_size, page);
        let windows = pager.page(windows);

        self.apply(&StackLayout, windows, ShowCommand::Restore);

        info!(
            "Stacked {} windows (page {}/{})",
            windows.len(),
            pager.index() + 1,
            pager.count()
        );
        pager
    }

    /// Cascade `windows` from the top-left corner of the screen.
    pub fn cascade(&self, windows: &[WindowHandle]) {
        let layout = CascadeLayout {
            config: self.config.cascade,
        };
        self.apply(&layout, windows, ShowCommand::Normal);

        info!("Cascaded {} windows", windows.len());
    }

    /// Minimize every window still sitting where [`Self::cascade`] would put
    /// it. Returns how many windows were minimized.
    pub fn squish(&self, windows: &[WindowHandle]) -> usize {
        let offsets = cascade_offsets(
            windows.len(),
            self.system.screen_size(),
            &self.config.cascade,
        );

        let mut minimized = 0;
        for (&window, expected) in windows.iter().zip(offsets) {
            match self.system.frame(window) {
                Ok(frame) if frame.origin() == expected => {
                    match self.system.show(window, ShowCommand::Minimize) {
                        Ok(()) => minimized += 1,
                        Err(e) => debug!("Could not minimize window {}: {}", window, e),
                    }
                }
                Ok(frame) => trace!("Window {} was moved to {:?}, leaving it", window, frame),
                Err(e) => debug!("Skipping window {}: {}", window, e),
            }
        }

        info!("Squished {} of {} windows", minimized, windows.len());
        minimized
    }

    /// Show, move, and raise each window into its frame.
    fn apply(&self, layout: &dyn Layout, windows: &[WindowHandle], show: ShowCommand) {
        let frames = layout.frames(windows.len(), self.system.screen_size());

        for (&window, frame) in windows.iter().zip(frames) {
            let placed = self
                .system
                .show(window, show)
                .and_then(|_| self.system.set_frame(window, frame))
                .and_then(|_| self.system.bring_to_front(window));

            match placed {
                Ok(()) => debug!("Placed window {} at {:?}", window, frame),
                Err(e) => debug!("Skipping window {}: {}", window, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryDesktop, MemoryWindow};

    fn desktop(count: usize) -> (MemoryDesktop, Vec<WindowHandle>) {
        let desktop = MemoryDesktop::new(Size::new(1920, 1080));
        let handles = (0..count)
            .map(|i| {
                desktop.add(MemoryWindow::new(
                    &format!("Window {}", i),
                    "/usr/bin/app",
                    Rect::new(300, 200, 640, 480),
                ))
            })
            .collect();
        (desktop, handles)
    }

    fn frames(desktop: &MemoryDesktop, handles: &[WindowHandle]) -> Vec<Rect> {
        handles
            .iter()
            .map(|h| desktop.get(*h).unwrap().frame)
            .collect()
    }

    #[test]
    fn stack_restores_raises_and_tiles_windows() {
        let (desktop, handles) = desktop(3);
        desktop.update(handles[1], |w| w.minimized = true);

        let config = Config::default();
        let pager = Arranger::new(&desktop, &config).stack(&handles, 0);
        assert_eq!(pager.count(), 1);

        assert_eq!(
            frames(&desktop, &handles),
            vec![
                Rect::new(0, 0, 1920, 360),
                Rect::new(0, 360, 1920, 360),
                Rect::new(0, 720, 1920, 360),
            ]
        );
        for handle in &handles {
            let window = desktop.get(*handle).unwrap();
            assert!(!window.minimized);
            assert_eq!(window.raised, 1);
        }
    }

    #[test]
    fn stack_lays_out_only_the_requested_page() {
        let (desktop, handles) = desktop(11);
        let config = Config::default();

        let pager = Arranger::new(&desktop, &config).stack(&handles, 1);
        assert_eq!(pager.index(), 1);
        assert_eq!(pager.count(), 2);
        assert!(pager.has_prev());
        assert!(!pager.has_next());

        // The first page is untouched; the last three are stacked on their own.
        assert!(handles[..8]
            .iter()
            .all(|h| desktop.get(*h).unwrap().raised == 0));
        assert_eq!(
            frames(&desktop, &handles[8..]),
            stack_frames(3, Size::new(1920, 1080))
        );
    }

    #[test]
    fn stale_windows_do_not_stop_the_batch() {
        let (desktop, handles) = desktop(4);
        desktop.remove(handles[1]);

        let config = Config::default();
        Arranger::new(&desktop, &config).stack(&handles, 0);

        assert_eq!(desktop.get(handles[3]).unwrap().frame, Rect::new(0, 810, 1920, 270));
    }

    #[test]
    fn cascade_gives_each_window_a_distinct_square() {
        let (desktop, handles) = desktop(5);
        desktop.update(handles[0], |w| w.maximized = true);

        let config = Config::default();
        Arranger::new(&desktop, &config).cascade(&handles);

        let placed = frames(&desktop, &handles);
        assert_eq!(placed[0], Rect::new(10, 10, 750, 750));
        assert_eq!(placed[4], Rect::new(210, 210, 750, 750));
        assert!(!desktop.get(handles[0]).unwrap().maximized);
    }

    #[test]
    fn squish_after_cascade_minimizes_everything() {
        let (desktop, handles) = desktop(12);
        let config = Config::default();
        let arranger = Arranger::new(&desktop, &config);

        arranger.cascade(&handles);
        assert_eq!(arranger.squish(&handles), 12);
        assert!(handles.iter().all(|h| desktop.get(*h).unwrap().minimized));

        // Already minimized windows stay minimized.
        arranger.squish(&handles);
        assert!(handles.iter().all(|h| desktop.get(*h).unwrap().minimized));
    }

    #[test]
    fn squish_leaves_moved_windows_alone() {
        let (desktop, handles) = desktop(4);
        let config = Config::default();
        let arranger = Arranger::new(&desktop, &config);

        arranger.cascade(&handles);
        desktop.update(handles[2], |w| w.frame.x += 40);

        assert_eq!(arranger.squish(&handles), 3);
        assert!(!desktop.get(handles[2]).unwrap().minimized);
        assert!(desktop.get(handles[3]).unwrap().minimized);
    }
}
