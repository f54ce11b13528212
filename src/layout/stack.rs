//! Stacked layout: windows tiled in rows filling the screen.

use super::Layout;
use crate::geometry::{Rect, Size};

/// Largest window count stacked in a single full-width column.
pub const SINGLE_COLUMN_MAX: usize = 4;

/// Frames for `count` windows stacked on `screen`, in input order.
///
/// Up to [`SINGLE_COLUMN_MAX`] windows share the full screen width in equal
/// rows. Larger counts are split into two half-width columns, the left one
/// taking the extra window when `count` is odd.
#[must_use]
pub fn stack_frames(count: usize, screen: Size) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }

    if count <= SINGLE_COLUMN_MAX {
        return column(count, 0, screen.width, screen.height).collect();
    }

    let left = (count + 1) / 2;
    let right = count / 2;
    let half = screen.width / 2;

    column(left, 0, half, screen.height)
        .chain(column(right, half, half, screen.height))
        .collect()
}

/// `count` equal rows of a column starting at `x`.
fn column(count: usize, x: i32, width: i32, height: i32) -> impl Iterator<Item = Rect> {
    let row = height / count as i32;
    (0..count as i32).map(move |i| Rect::new(x, i * row, width, row))
}

/// [`Layout`] for a single page of stacked windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackLayout;

impl Layout for StackLayout {
    fn frames(&self, count: usize, screen: Size) -> Vec<Rect> {
        stack_frames(count, screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCREEN: Size = Size::new(1920, 1080);

    #[test]
    fn three_windows_fill_the_screen_in_rows() {
        assert_eq!(
            stack_frames(3, SCREEN),
            vec![
                Rect::new(0, 0, 1920, 360),
                Rect::new(0, 360, 1920, 360),
                Rect::new(0, 720, 1920, 360),
            ]
        );
    }

    #[test]
    fn up_to_four_windows_span_the_full_width() {
        for count in 1..=4 {
            let frames = stack_frames(count, SCREEN);
            assert_eq!(frames.len(), count);
            assert!(frames.iter().all(|f| f.x == 0 && f.width == SCREEN.width));

            let total: i32 = frames.iter().map(|f| f.height).sum();
            assert!(SCREEN.height - total < count as i32);

            for pair in frames.windows(2) {
                assert_eq!(pair[0].bottom(), pair[1].y);
                assert!(!pair[0].intersects(&pair[1]));
            }
        }
    }

    #[test]
    fn five_to_eight_windows_split_into_two_columns() {
        for count in 5..=8 {
            let frames = stack_frames(count, SCREEN);
            let left = (count + 1) / 2;

            let (left_frames, right_frames) = frames.split_at(left);
            assert_eq!(right_frames.len(), count / 2);
            assert!(left_frames.iter().all(|f| f.x == 0 && f.width == 960));
            assert!(right_frames.iter().all(|f| f.x == 960 && f.width == 960));
            assert_eq!(left_frames[0].y, 0);
            assert_eq!(right_frames[0].y, 0);
        }
    }

    #[test]
    fn odd_counts_give_the_left_column_the_extra_window() {
        assert_eq!(
            stack_frames(5, SCREEN),
            vec![
                Rect::new(0, 0, 960, 360),
                Rect::new(0, 360, 960, 360),
                Rect::new(0, 720, 960, 360),
                Rect::new(960, 0, 960, 540),
                Rect::new(960, 540, 960, 540),
            ]
        );
    }

    #[test]
    fn nothing_to_stack() {
        assert!(stack_frames(0, SCREEN).is_empty());
    }
}
