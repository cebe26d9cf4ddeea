//! Window geometry against the current display layout
//!
//! All values are logical points with a top-left origin, which is what Tauri
//! reports once monitor positions are divided by their scale factor.

use serde::{Deserialize, Serialize};

/// Gap between the tray icon and the popover
pub const POPOVER_GAP: f64 = 6.0;

/// Distance between the chat bar and the bottom of its display
pub const CHAT_BAR_BOTTOM_MARGIN: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let width = self.right().min(other.right()) - self.x.max(other.x);
        let height = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if width > 0.0 && height > 0.0 {
            width * height
        } else {
            0.0
        }
    }

    /// Shrink to fit inside `bounds`, then shift until fully inside.
    pub fn clamp_within(&self, bounds: &Rect) -> Rect {
        let width = self.width.min(bounds.width);
        let height = self.height.min(bounds.height);
        let x = self.x.max(bounds.x).min(bounds.right() - width);
        let y = self.y.max(bounds.y).min(bounds.bottom() - height);
        Rect { x, y, width, height }
    }

    pub fn is_usable(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|value| value.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// A monitor's usable area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Display {
    pub bounds: Rect,
}

impl Display {
    /// Build from physical monitor coordinates and the monitor scale factor.
    pub fn from_physical(x: i32, y: i32, width: u32, height: u32, scale: f64) -> Option<Self> {
        if !scale.is_finite() || scale <= 0.0 || width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            bounds: Rect::new(
                f64::from(x) / scale,
                f64::from(y) / scale,
                f64::from(width) / scale,
                f64::from(height) / scale,
            ),
        })
    }
}

/// Which edge stays put when a panel changes height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    Top,
    Bottom,
}

fn distance_sq(a: Point, b: Point) -> f64 {
    (a.x - b.x).powi(2) + (a.y - b.y).powi(2)
}

/// Display the rect mostly lives on, or the nearest one when it is off screen.
pub fn display_for_rect<'a>(displays: &'a [Display], rect: &Rect) -> Option<&'a Display> {
    let best_overlap = displays
        .iter()
        .map(|display| (display, display.bounds.intersection_area(rect)))
        .filter(|(_, area)| *area > 0.0)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(display, _)| display);

    best_overlap.or_else(|| {
        let center = rect.center();
        displays.iter().min_by(|a, b| {
            distance_sq(a.bounds.center(), center).total_cmp(&distance_sq(b.bounds.center(), center))
        })
    })
}

pub fn display_for_point(displays: &[Display], point: Point) -> Option<&Display> {
    displays
        .iter()
        .find(|display| display.bounds.contains(point))
        .or_else(|| {
            displays.iter().min_by(|a, b| {
                distance_sq(a.bounds.center(), point).total_cmp(&distance_sq(b.bounds.center(), point))
            })
        })
}

/// Keep `rect` fully on the display it belongs to. Without displays the rect
/// is returned untouched.
pub fn reconcile(rect: Rect, displays: &[Display]) -> Rect {
    match display_for_rect(displays, &rect) {
        Some(display) => rect.clamp_within(&display.bounds),
        None => rect,
    }
}

/// Frame for the popover: centred under the tray icon.
pub fn popover_frame(anchor: Rect, width: f64, height: f64, displays: &[Display]) -> Rect {
    let center = anchor.center();
    let frame = Rect::new(
        center.x - width / 2.0,
        anchor.bottom() + POPOVER_GAP,
        width,
        height,
    );
    match display_for_point(displays, center) {
        Some(display) => frame.clamp_within(&display.bounds),
        None => frame,
    }
}

/// Default chat bar frame: horizontally centred near the bottom of the display.
pub fn chat_bar_frame(display: &Display, width: f64, height: f64, bottom_margin: f64) -> Rect {
    let bounds = display.bounds;
    let frame = Rect::new(
        bounds.x + (bounds.width - width) / 2.0,
        bounds.bottom() - bottom_margin - height,
        width,
        height,
    );
    frame.clamp_within(&bounds)
}

/// Change the height while keeping the anchored edge in place.
pub fn resize_anchored(rect: Rect, height: f64, anchor: VerticalAnchor) -> Rect {
    match anchor {
        VerticalAnchor::Top => Rect { height, ..rect },
        VerticalAnchor::Bottom => Rect {
            y: rect.bottom() - height,
            height,
            ..rect
        },
    }
}

/// Centre a window of the given size on a display.
pub fn centered_frame(display: &Display, width: f64, height: f64) -> Rect {
    let bounds = display.bounds;
    Rect::new(
        bounds.x + (bounds.width - width) / 2.0,
        bounds.y + (bounds.height - height) / 2.0,
        width,
        height,
    )
    .clamp_within(&bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_displays() -> Vec<Display> {
        vec![
            Display { bounds: Rect::new(0.0, 0.0, 1440.0, 900.0) },
            // External monitor to the right, taller and offset upward
            Display { bounds: Rect::new(1440.0, -180.0, 1920.0, 1080.0) },
        ]
    }

    #[test]
    fn test_display_from_physical() {
        let display = Display::from_physical(2880, 0, 3840, 2160, 2.0).unwrap();
        assert_eq!(display.bounds, Rect::new(1440.0, 0.0, 1920.0, 1080.0));

        assert!(Display::from_physical(0, 0, 100, 100, 0.0).is_none());
        assert!(Display::from_physical(0, 0, 0, 100, 1.0).is_none());
        assert!(Display::from_physical(0, 0, 100, 100, f64::NAN).is_none());
    }

    #[test]
    fn test_intersection_area() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(a.intersection_area(&Rect::new(50.0, 50.0, 100.0, 100.0)), 2500.0);
        assert_eq!(a.intersection_area(&Rect::new(100.0, 0.0, 10.0, 10.0)), 0.0);
    }

    #[test]
    fn test_clamp_within_shifts_and_shrinks() {
        let bounds = Rect::new(0.0, 0.0, 1000.0, 800.0);

        let shifted = Rect::new(900.0, -20.0, 300.0, 200.0).clamp_within(&bounds);
        assert_eq!(shifted, Rect::new(700.0, 0.0, 300.0, 200.0));

        let shrunk = Rect::new(-50.0, 0.0, 2000.0, 900.0).clamp_within(&bounds);
        assert_eq!(shrunk, bounds);
    }

    #[test]
    fn test_display_for_rect_prefers_largest_overlap() {
        let displays = two_displays();
        // Mostly on the external display
        let rect = Rect::new(1400.0, 100.0, 400.0, 300.0);
        assert_eq!(display_for_rect(&displays, &rect), Some(&displays[1]));
    }

    #[test]
    fn test_offscreen_rect_moves_to_nearest_display() {
        let displays = two_displays();
        // Saved on a monitor that has since been unplugged
        let rect = Rect::new(-2000.0, 200.0, 800.0, 600.0);

        let reconciled = reconcile(rect, &displays);
        assert_eq!(reconciled, Rect::new(0.0, 200.0, 800.0, 600.0));
        assert!(reconciled.intersection_area(&displays[0].bounds) > 0.0);
    }

    #[test]
    fn test_reconcile_without_displays_is_identity() {
        let rect = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert_eq!(reconcile(rect, &[]), rect);
    }

    #[test]
    fn test_popover_centered_under_icon() {
        let displays = two_displays();
        let icon = Rect::new(1000.0, 0.0, 24.0, 24.0);

        let frame = popover_frame(icon, 400.0, 600.0, &displays);
        assert_eq!(frame, Rect::new(812.0, 30.0, 400.0, 600.0));
    }

    #[test]
    fn test_popover_clamped_at_screen_edge() {
        let displays = two_displays();
        let icon = Rect::new(1420.0, 0.0, 16.0, 24.0);

        let frame = popover_frame(icon, 400.0, 600.0, &displays);
        assert_eq!(frame.right(), 1440.0);
        assert_eq!(frame.y, 30.0);
    }

    #[test]
    fn test_chat_bar_frame() {
        let display = Display { bounds: Rect::new(0.0, 0.0, 1440.0, 900.0) };
        let frame = chat_bar_frame(&display, 680.0, 72.0, CHAT_BAR_BOTTOM_MARGIN);
        assert_eq!(frame, Rect::new(380.0, 708.0, 680.0, 72.0));
    }

    #[test]
    fn test_resize_anchored() {
        let rect = Rect::new(100.0, 700.0, 600.0, 80.0);

        let grown = resize_anchored(rect, 300.0, VerticalAnchor::Bottom);
        assert_eq!(grown.bottom(), rect.bottom());
        assert_eq!(grown.y, 480.0);

        let grown = resize_anchored(rect, 300.0, VerticalAnchor::Top);
        assert_eq!(grown.y, 700.0);
        assert_eq!(grown.height, 300.0);
    }

    #[test]
    fn test_display_for_point_falls_back_to_nearest() {
        let displays = two_displays();
        assert_eq!(
            display_for_point(&displays, Point { x: 2000.0, y: 0.0 }),
            Some(&displays[1])
        );
        assert_eq!(
            display_for_point(&displays, Point { x: -10.0, y: 400.0 }),
            Some(&displays[0])
        );
    }

    #[test]
    fn test_is_usable() {
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_usable());
        assert!(!Rect::new(0.0, 0.0, 0.0, 1.0).is_usable());
        assert!(!Rect::new(f64::NAN, 0.0, 1.0, 1.0).is_usable());
    }
}
