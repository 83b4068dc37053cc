//! Screen geometry value types and the bubble placement rule.
//!
//! All coordinates are in screen pixels with the origin at the top-left of the
//! primary display. The sprite surface is addressed by its top-left corner.

use serde::{Deserialize, Serialize};

/// Top-left corner of the sprite surface in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

impl WindowPosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rounds fractional coordinates to the nearest pixel.
    ///
    /// Non-finite inputs collapse to `0` so a malformed request can never
    /// produce an unrepresentable window position.
    ///
    /// # Examples
    ///
    /// ```
    /// use ping_pet::domain::WindowPosition;
    ///
    /// assert_eq!(WindowPosition::rounded(10.4, 20.5), WindowPosition::new(10, 21));
    /// assert_eq!(WindowPosition::rounded(f64::NAN, -3.6), WindowPosition::new(0, -4));
    /// ```
    #[must_use]
    pub fn rounded(x: f64, y: f64) -> Self {
        Self {
            x: round_to_pixel(x),
            y: round_to_pixel(y),
        }
    }

    /// Whether this position lies in the left half of a screen `metrics` wide.
    #[must_use]
    pub fn is_on_left(&self, metrics: &ScreenMetrics) -> bool {
        f64::from(self.x) < f64::from(metrics.width) / 2.0
    }
}

#[allow(clippy::cast_possible_truncation)]
fn round_to_pixel(value: f64) -> i32 {
    if value.is_finite() {
        value
            .round()
            .clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
    } else {
        0
    }
}

/// A pointer location in screen coordinates.
///
/// Kept fractional because high-DPI pointer devices report sub-pixel positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance from `origin`.
    #[must_use]
    pub fn displacement_from(&self, origin: &Self) -> f64 {
        (self.x - origin.x).hypot(self.y - origin.y)
    }
}

/// Usable work area of the primary display (taskbar excluded).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenMetrics {
    pub width: i32,
    pub height: i32,
}

impl ScreenMetrics {
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Fallback used when the display provider fails.
    #[must_use]
    pub const fn zero() -> Self {
        Self { width: 0, height: 0 }
    }

    /// Y coordinate the sprite settles on after a fall.
    #[must_use]
    pub const fn resting_line(&self, resting_offset: i32) -> i32 {
        self.height - resting_offset
    }
}

/// Size and offsets of the notification bubble relative to the sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleLayout {
    pub width: i32,
    pub height: i32,
    /// Distance from the sprite's left edge to the bubble's left edge when the
    /// bubble opens to the right.
    pub right_offset: i32,
    /// Gap between the bubble's right edge and the sprite when the bubble opens
    /// to the left.
    pub left_offset: i32,
    /// How far above the sprite's top edge the bubble starts.
    pub vertical_offset: i32,
}

impl Default for BubbleLayout {
    fn default() -> Self {
        Self {
            width: 320,
            height: 500,
            right_offset: 60,
            left_offset: 10,
            vertical_offset: 60,
        }
    }
}

/// Computes where the bubble goes for a sprite anchored at `anchor`.
///
/// A sprite in the left half of the screen gets its bubble on the right, a
/// sprite in the right half gets it on the left. The bubble always sits above
/// the sprite's head.
///
/// # Examples
///
/// ```
/// use ping_pet::domain::{bubble_placement, BubbleLayout, ScreenMetrics, WindowPosition};
///
/// let screen = ScreenMetrics::new(1920, 1080);
/// let layout = BubbleLayout::default();
///
/// let right = bubble_placement(WindowPosition::new(100, 1035), &screen, &layout);
/// assert_eq!(right, WindowPosition::new(160, 975));
///
/// let left = bubble_placement(WindowPosition::new(1800, 1035), &screen, &layout);
/// assert_eq!(left, WindowPosition::new(1470, 975));
/// ```
#[must_use]
pub fn bubble_placement(
    anchor: WindowPosition,
    metrics: &ScreenMetrics,
    layout: &BubbleLayout,
) -> WindowPosition {
    let x = if anchor.is_on_left(metrics) {
        anchor.x + layout.right_offset
    } else {
        anchor.x - layout.left_offset - layout.width
    };

    WindowPosition::new(x, anchor.y - layout.vertical_offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_opens_right_in_left_half() {
        let screen = ScreenMetrics::new(1920, 1080);
        let placed = bubble_placement(WindowPosition::new(100, 500), &screen, &BubbleLayout::default());
        assert_eq!(placed.x, 160);
        assert_eq!(placed.y, 440);
    }

    #[test]
    fn placement_opens_left_in_right_half() {
        let screen = ScreenMetrics::new(1920, 1080);
        let placed = bubble_placement(WindowPosition::new(1800, 500), &screen, &BubbleLayout::default());
        assert_eq!(placed.x, 1800 - 330);
    }

    #[test]
    fn midpoint_counts_as_right_half() {
        let screen = ScreenMetrics::new(1920, 1080);
        let at_mid = WindowPosition::new(960, 0);
        assert!(!at_mid.is_on_left(&screen));
        assert!(WindowPosition::new(959, 0).is_on_left(&screen));

        let odd = ScreenMetrics::new(1921, 1080);
        assert!(at_mid.is_on_left(&odd));
    }

    #[test]
    fn resting_line_subtracts_offset() {
        assert_eq!(ScreenMetrics::new(1920, 1080).resting_line(45), 1035);
    }

    #[test]
    fn displacement_is_euclidean() {
        let start = Point::new(10.0, 10.0);
        assert!((Point::new(13.0, 14.0).displacement_from(&start) - 5.0).abs() < 1e-9);
        assert!((Point::new(10.0, 4.0).displacement_from(&start) - 6.0).abs() < 1e-9);
    }
}
