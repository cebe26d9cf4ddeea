//! Page zoom factor

pub const MIN_ZOOM: f64 = 0.6;
pub const MAX_ZOOM: f64 = 1.4;
pub const ZOOM_STEP: f64 = 0.1;
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Zoom factor, always within `MIN_ZOOM..=MAX_ZOOM` and rounded to 0.01
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom(f64);

impl Zoom {
    pub fn new(factor: f64) -> Self {
        if !factor.is_finite() {
            return Self::default();
        }
        let rounded = (factor * 100.0).round() / 100.0;
        Self(rounded.clamp(MIN_ZOOM, MAX_ZOOM))
    }

    pub fn factor(self) -> f64 {
        self.0
    }

    pub fn zoom_in(self) -> Self {
        Self::new(self.0 + ZOOM_STEP)
    }

    pub fn zoom_out(self) -> Self {
        Self::new(self.0 - ZOOM_STEP)
    }

    pub fn reset() -> Self {
        Self::default()
    }

    pub fn can_zoom_in(self) -> bool {
        self.0 < MAX_ZOOM
    }

    pub fn can_zoom_out(self) -> bool {
        self.0 > MIN_ZOOM
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self(DEFAULT_ZOOM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_do_not_drift() {
        let mut zoom = Zoom::default();
        for _ in 0..3 {
            zoom = zoom.zoom_in();
        }
        assert_eq!(zoom.factor(), 1.3);
        for _ in 0..3 {
            zoom = zoom.zoom_out();
        }
        assert_eq!(zoom.factor(), 1.0);
    }

    #[test]
    fn test_bounds() {
        let mut zoom = Zoom::default();
        for _ in 0..20 {
            zoom = zoom.zoom_in();
        }
        assert_eq!(zoom.factor(), MAX_ZOOM);
        assert!(!zoom.can_zoom_in());

        for _ in 0..20 {
            zoom = zoom.zoom_out();
        }
        assert_eq!(zoom.factor(), MIN_ZOOM);
        assert!(!zoom.can_zoom_out());
    }

    #[test]
    fn test_new_clamps_and_sanitizes() {
        assert_eq!(Zoom::new(3.0).factor(), MAX_ZOOM);
        assert_eq!(Zoom::new(0.1).factor(), MIN_ZOOM);
        assert_eq!(Zoom::new(f64::NAN).factor(), DEFAULT_ZOOM);
        assert_eq!(Zoom::new(1.234).factor(), 1.23);
        assert_eq!(Zoom::reset().factor(), DEFAULT_ZOOM);
    }
}
