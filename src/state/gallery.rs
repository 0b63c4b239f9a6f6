/// Free-drag gallery strip state
///
/// The polaroid strip free-runs leftward at a constant speed while the
/// owning scene is active. Holding the secondary mouse button hands
/// control to the pointer: the offset follows the cursor delta, clamped
/// so the strip can never be dragged right of its starting position.
/// The drag is tracked globally through the application event
/// subscription, so it survives the cursor leaving the strip.

/// Pixels of auto-scroll per animation tick (~90 px/s at 60 Hz)
pub const AUTO_SCROLL_STEP: f32 = 1.5;

#[derive(Debug, Clone, Default)]
pub struct GalleryStrip {
    offset_px: f32,
    dragging: bool,
    last_x: f32,
}

impl GalleryStrip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current translation of the strip; always <= 0
    pub fn offset(&self) -> f32 {
        self.offset_px
    }

    /// Scroll distance from the start, for driving a scrollable view
    pub fn scroll_x(&self) -> f32 {
        -self.offset_px
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// One animation frame. Free-runs only while no drag is in progress.
    pub fn tick(&mut self) {
        if !self.dragging {
            self.offset_px -= AUTO_SCROLL_STEP;
        }
    }

    /// Secondary button pressed at `x`: the pointer takes over
    pub fn begin_drag(&mut self, x: f32) {
        self.dragging = true;
        self.last_x = x;
    }

    /// Pointer moved while dragging. One-sided clamp: the strip start
    /// can never move past the left viewport edge.
    pub fn drag_to(&mut self, x: f32) {
        if !self.dragging {
            return;
        }
        let delta = x - self.last_x;
        self.last_x = x;
        self.offset_px = f32::min(self.offset_px + delta, 0.0);
    }

    /// Button released anywhere: auto-scroll resumes
    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Rewind to the start (scene re-mounted)
    pub fn reset(&mut self) {
        self.offset_px = 0.0;
        self.dragging = false;
        self.last_x = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_scroll_moves_left() {
        let mut strip = GalleryStrip::new();
        strip.tick();
        strip.tick();
        assert_eq!(strip.offset(), -2.0 * AUTO_SCROLL_STEP);
        assert_eq!(strip.scroll_x(), 2.0 * AUTO_SCROLL_STEP);
    }

    #[test]
    fn test_drag_suspends_auto_scroll() {
        let mut strip = GalleryStrip::new();
        strip.begin_drag(100.0);

        let before = strip.offset();
        strip.tick();
        assert_eq!(strip.offset(), before);

        strip.end_drag();
        strip.tick();
        assert!(strip.offset() < before);
    }

    #[test]
    fn test_drag_follows_pointer_delta() {
        let mut strip = GalleryStrip::new();
        for _ in 0..100 {
            strip.tick();
        }
        let start = strip.offset();

        strip.begin_drag(500.0);
        strip.drag_to(480.0);
        assert_eq!(strip.offset(), start - 20.0);

        strip.drag_to(490.0);
        assert_eq!(strip.offset(), start - 10.0);
    }

    #[test]
    fn test_offset_never_exceeds_zero() {
        let mut strip = GalleryStrip::new();
        strip.tick();

        // Wild rightward drags cannot pull the strip past its start
        strip.begin_drag(0.0);
        strip.drag_to(10_000.0);
        assert_eq!(strip.offset(), 0.0);

        strip.drag_to(9_000.0);
        strip.drag_to(20_000.0);
        assert_eq!(strip.offset(), 0.0);
    }

    #[test]
    fn test_moves_ignored_when_not_dragging() {
        let mut strip = GalleryStrip::new();
        strip.drag_to(300.0);
        assert_eq!(strip.offset(), 0.0);
    }

    #[test]
    fn test_reset_rewinds_strip() {
        let mut strip = GalleryStrip::new();
        for _ in 0..10 {
            strip.tick();
        }
        strip.begin_drag(5.0);
        strip.reset();

        assert_eq!(strip.offset(), 0.0);
        assert!(!strip.is_dragging());
    }
}
