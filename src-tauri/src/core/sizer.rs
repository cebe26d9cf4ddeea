//! Chat bar height reconciliation
//!
//! The page bridge reports the composer height, whether a menu/overlay is
//! open and whether a conversation has started. `PanelSizer` turns those
//! signals into a target panel height and only reports a change when it is
//! large enough to be worth animating.
//!
//! Composer heights arrive in CSS pixels; the panel is sized in points, so
//! growth is scaled by the page zoom.

use crate::core::bridge::PageSignal;

/// Changes smaller than this are swallowed to avoid animation jitter
pub const RESIZE_EPSILON: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizerConfig {
    pub collapsed_height: f64,
    pub min_height: f64,
    pub max_height: f64,
    pub expanded_height: f64,
    pub overlay_floor: f64,
    pub expand_on_conversation: bool,
}

impl Default for SizerConfig {
    fn default() -> Self {
        Self {
            collapsed_height: 72.0,
            min_height: 56.0,
            max_height: 620.0,
            expanded_height: 460.0,
            overlay_floor: 320.0,
            expand_on_conversation: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PanelSizer {
    config: SizerConfig,
    baseline_input: Option<f64>,
    input_height: Option<f64>,
    overlay_visible: bool,
    conversation_started: bool,
    zoom: f64,
    current: f64,
}

impl PanelSizer {
    pub fn new(config: SizerConfig) -> Self {
        let current = clamp(config.collapsed_height, &config);
        Self {
            config,
            baseline_input: None,
            input_height: None,
            overlay_visible: false,
            conversation_started: false,
            zoom: 1.0,
            current,
        }
    }

    pub fn with_zoom(config: SizerConfig, zoom: f64) -> Self {
        let mut sizer = Self::new(config);
        sizer.zoom = zoom;
        sizer
    }

    /// Height the panel currently has (or is animating towards)
    pub fn current_height(&self) -> f64 {
        self.current
    }

    pub fn conversation_started(&self) -> bool {
        self.conversation_started
    }

    /// Swap the limits after a settings change and re-evaluate.
    pub fn reconfigure(&mut self, config: SizerConfig) -> Option<f64> {
        self.config = config;
        self.commit_if_changed()
    }

    /// Follow a page zoom change; composer growth is re-measured in points.
    pub fn set_zoom(&mut self, zoom: f64) -> Option<f64> {
        self.zoom = zoom;
        self.commit_if_changed()
    }

    /// Feed one page signal. Returns the new height when the panel should resize.
    pub fn apply(&mut self, signal: &PageSignal) -> Option<f64> {
        match signal {
            PageSignal::InputHeight { height } => {
                if self.baseline_input.is_none() {
                    self.baseline_input = Some(*height);
                }
                self.input_height = Some(*height);
            }
            PageSignal::OverlayVisibility { visible } => self.overlay_visible = *visible,
            PageSignal::ConversationStarted { started } => self.conversation_started = *started,
            PageSignal::Navigated { .. } => return None,
        }
        self.commit_if_changed()
    }

    /// Back to the collapsed state, e.g. after a new chat.
    pub fn reset(&mut self) -> Option<f64> {
        self.baseline_input = None;
        self.input_height = None;
        self.overlay_visible = false;
        self.conversation_started = false;
        self.commit_if_changed()
    }

    /// Target height for the current signal state
    pub fn target_height(&self) -> f64 {
        let growth = match (self.baseline_input, self.input_height) {
            (Some(baseline), Some(input)) => (input - baseline) * self.zoom,
            _ => 0.0,
        };
        let mut target = self.config.collapsed_height + growth;

        if self.conversation_started && self.config.expand_on_conversation {
            target = target.max(self.config.expanded_height);
        }
        if self.overlay_visible {
            target = target.max(self.config.overlay_floor);
        }

        clamp(target, &self.config)
    }

    fn commit_if_changed(&mut self) -> Option<f64> {
        let target = self.target_height();
        if (target - self.current).abs() <= RESIZE_EPSILON {
            return None;
        }
        self.current = target;
        Some(target)
    }
}

fn clamp(height: f64, config: &SizerConfig) -> f64 {
    height.max(config.min_height).min(config.max_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(height: f64) -> PageSignal {
        PageSignal::InputHeight { height }
    }

    fn overlay(visible: bool) -> PageSignal {
        PageSignal::OverlayVisibility { visible }
    }

    fn started(started: bool) -> PageSignal {
        PageSignal::ConversationStarted { started }
    }

    #[test]
    fn test_first_input_signal_sets_baseline() {
        let mut sizer = PanelSizer::new(SizerConfig::default());

        // The first report only captures the baseline
        assert_eq!(sizer.apply(&input(40.0)), None);
        assert_eq!(sizer.current_height(), 72.0);

        // Composer grew by 48 points, panel follows
        assert_eq!(sizer.apply(&input(88.0)), Some(120.0));
        assert_eq!(sizer.current_height(), 120.0);
    }

    #[test]
    fn test_growth_follows_page_zoom() {
        let mut sizer = PanelSizer::with_zoom(SizerConfig::default(), 1.4);
        sizer.apply(&input(40.0));

        // 48 CSS px of growth is 67.2 points at 140%
        let height = sizer.apply(&input(88.0)).unwrap();
        assert!((height - 139.2).abs() < 1e-9, "height {}", height);

        // Back to 100%: the same composer needs less room
        let height = sizer.set_zoom(1.0).unwrap();
        assert!((height - 120.0).abs() < 1e-9, "height {}", height);
        assert_eq!(sizer.set_zoom(1.0), None);
    }

    #[test]
    fn test_small_changes_are_ignored() {
        let mut sizer = PanelSizer::new(SizerConfig::default());
        sizer.apply(&input(40.0));

        assert_eq!(sizer.apply(&input(41.5)), None);
        assert_eq!(sizer.apply(&input(42.0)), None);
        assert_eq!(sizer.apply(&input(42.5)), Some(74.5));
    }

    #[test]
    fn test_height_is_clamped() {
        let mut sizer = PanelSizer::new(SizerConfig::default());
        sizer.apply(&input(40.0));

        assert_eq!(sizer.apply(&input(4000.0)), Some(620.0));
        assert_eq!(sizer.apply(&input(0.0)), Some(56.0));
    }

    #[test]
    fn test_overlay_raises_floor() {
        let mut sizer = PanelSizer::new(SizerConfig::default());
        sizer.apply(&input(40.0));

        assert_eq!(sizer.apply(&overlay(true)), Some(320.0));
        // Composer growth under the floor does not move the panel
        assert_eq!(sizer.apply(&input(60.0)), None);
        assert_eq!(sizer.apply(&overlay(false)), Some(92.0));
    }

    #[test]
    fn test_conversation_expands_panel() {
        let mut sizer = PanelSizer::new(SizerConfig::default());

        assert_eq!(sizer.apply(&started(true)), Some(460.0));
        assert!(sizer.conversation_started());
        assert_eq!(sizer.reset(), Some(72.0));
        assert!(!sizer.conversation_started());
    }

    #[test]
    fn test_conversation_expansion_can_be_disabled() {
        let mut sizer = PanelSizer::new(SizerConfig {
            expand_on_conversation: false,
            ..SizerConfig::default()
        });

        assert_eq!(sizer.apply(&started(true)), None);
        assert_eq!(sizer.current_height(), 72.0);
    }

    #[test]
    fn test_never_exceeds_maximum() {
        let config = SizerConfig {
            max_height: 300.0,
            ..SizerConfig::default()
        };
        let mut sizer = PanelSizer::new(config);
        let signals = [
            input(30.0),
            started(true),
            overlay(true),
            input(900.0),
            overlay(false),
            input(10.0),
        ];

        for signal in &signals {
            if let Some(height) = sizer.apply(signal) {
                assert!(height <= 300.0 && height >= 56.0, "height {} out of range", height);
            }
            assert!(sizer.current_height() <= 300.0);
        }
    }

    #[test]
    fn test_reconfigure_reclamps() {
        let mut sizer = PanelSizer::new(SizerConfig::default());
        sizer.apply(&started(true));

        let smaller = SizerConfig {
            max_height: 200.0,
            ..SizerConfig::default()
        };
        assert_eq!(sizer.reconfigure(smaller), Some(200.0));
    }

    #[test]
    fn test_navigation_does_not_resize() {
        let mut sizer = PanelSizer::new(SizerConfig::default());
        let signal = PageSignal::Navigated {
            url: "https://chatgpt.com/c/1".to_string(),
        };
        assert_eq!(sizer.apply(&signal), None);
    }
}
