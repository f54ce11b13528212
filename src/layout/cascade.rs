//! Cascaded layout: equally sized windows overlapping along a diagonal.
//!
//! Cascading and squishing both derive window positions from
//! [`cascade_offsets`], so a squish recognizes exactly the positions a cascade
//! produced.

use super::Layout;
use crate::config::CascadeConfig;
use crate::geometry::{Point, Rect, Size};

/// Offset between consecutive windows of a cascade of `count` windows.
///
/// The horizontal step is fixed. The vertical step starts out equal to it and
/// shrinks, down to `min_step`, when the last window would otherwise hang off
/// the bottom of the screen.
#[must_use]
pub fn cascade_step(count: usize, screen: Size, config: &CascadeConfig) -> Point {
    let mut step_y = config.step;
    let extent = config.origin + config.size;

    if count > 0 && count as i32 * step_y + extent > screen.height {
        step_y = ((screen.height - extent) / count as i32).max(config.min_step);
    }

    Point::new(config.step, step_y)
}

/// Top-left corner of each window in a cascade of `count` windows.
#[must_use]
pub fn cascade_offsets(count: usize, screen: Size, config: &CascadeConfig) -> Vec<Point> {
    let step = cascade_step(count, screen, config);
    (0..count as i32)
        .map(|i| Point::new(config.origin + i * step.x, config.origin + i * step.y))
        .collect()
}

/// [`Layout`] placing windows along a diagonal.
#[derive(Debug, Clone, Copy, Default)]
pub struct CascadeLayout {
    pub config: CascadeConfig,
}

impl Layout for CascadeLayout {
    fn frames(&self, count: usize, screen: Size) -> Vec<Rect> {
        cascade_offsets(count, screen, &self.config)
            .into_iter()
            .map(|p| Rect::new(p.x, p.y, self.config.size, self.config.size))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Size = Size::new(1920, 1080);

    #[test]
    fn a_few_windows_step_evenly() {
        let offsets = cascade_offsets(3, SCREEN, &CascadeConfig::default());
        assert_eq!(
            offsets,
            vec![Point::new(10, 10), Point::new(60, 60), Point::new(110, 110)]
        );
    }

    #[test]
    fn dense_cascades_shrink_the_vertical_step() {
        let config = CascadeConfig::default();
        // 10 * 50 + 760 > 1080, so the step becomes (1080 - 760) / 10.
        assert_eq!(cascade_step(10, SCREEN, &config), Point::new(50, 32));

        let offsets = cascade_offsets(10, SCREEN, &config);
        let last = offsets.last().unwrap();
        assert!(last.y + config.size <= SCREEN.height);
    }

    #[test]
    fn vertical_step_never_drops_below_the_minimum() {
        let config = CascadeConfig::default();
        assert_eq!(cascade_step(200, SCREEN, &config).y, 5);
        assert_eq!(cascade_step(3, Size::new(800, 600), &config).y, 5);
    }

    #[test]
    fn offsets_strictly_increase() {
        for count in [1, 6, 40, 120] {
            let offsets = cascade_offsets(count, SCREEN, &CascadeConfig::default());
            for pair in offsets.windows(2) {
                assert!(pair[1].x > pair[0].x);
                assert!(pair[1].y > pair[0].y);
            }
        }
    }

    #[test]
    fn every_frame_is_the_configured_square() {
        let layout = CascadeLayout::default();
        let frames = layout.frames(12, SCREEN);
        assert_eq!(frames.len(), 12);
        assert!(frames.iter().all(|f| f.width == 750 && f.height == 750));
    }
}
