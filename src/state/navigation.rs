/// Scene timer/navigation core
///
/// Holds the current scene index and decides every transition: the one-time
/// begin, timer-driven auto-advance, and manual click navigation. The
/// browser original let the UI framework tear down stale timers on
/// re-render; here every armed timer carries the epoch it was armed under,
/// and a fire with a stale epoch is void. The epoch bumps on every
/// transition, so a timer can never advance an index the machine already
/// left.

/// Visibility of a scene relative to the current index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Current,
    Past,
    Future,
}

/// A committed transition into a scene. The caller arms the auto-advance
/// timer iff `duration_ms > 0`, tagging it with `epoch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub index: usize,
    pub epoch: u64,
    pub duration_ms: u64,
}

/// The navigation state machine
#[derive(Debug, Clone)]
pub struct Navigator {
    durations: Vec<u64>,
    current: usize,
    playing: bool,
    epoch: u64,
}

impl Navigator {
    pub fn new(durations: Vec<u64>) -> Self {
        assert!(!durations.is_empty(), "a show needs at least one scene");
        Navigator {
            durations,
            current: 0,
            playing: false,
            epoch: 0,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn scene_count(&self) -> usize {
        self.durations.len()
    }

    /// The one-time start. Idempotent: a second begin is a no-op.
    pub fn begin(&mut self) -> Option<Entry> {
        if self.playing {
            return None;
        }
        self.playing = true;
        Some(self.enter(0))
    }

    /// An auto-advance timer armed under `epoch` has fired.
    /// Stale epochs (navigation happened since arming) are void.
    pub fn timer_fired(&mut self, epoch: u64) -> Option<Entry> {
        if !self.playing || epoch != self.epoch {
            return None;
        }
        // A terminal scene never arms a timer, but guard anyway
        if self.durations[self.current] == 0 {
            return None;
        }
        self.advance(1)
    }

    /// Manual navigation from a viewport click: right half forward,
    /// left half backward. Only valid while playing.
    pub fn navigate(&mut self, click_x: f32, viewport_width: f32) -> Option<Entry> {
        if !self.playing {
            return None;
        }
        if click_x > viewport_width / 2.0 {
            self.advance(1)
        } else {
            self.retreat(1)
        }
    }

    pub fn forward(&mut self) -> Option<Entry> {
        if !self.playing {
            return None;
        }
        self.advance(1)
    }

    pub fn backward(&mut self) -> Option<Entry> {
        if !self.playing {
            return None;
        }
        self.retreat(1)
    }

    /// Saturating step forward; None when already on the last scene
    fn advance(&mut self, step: usize) -> Option<Entry> {
        let next = usize::min(self.current + step, self.durations.len() - 1);
        if next == self.current {
            return None;
        }
        Some(self.enter(next))
    }

    /// Saturating step backward; None when already on the first scene
    fn retreat(&mut self, step: usize) -> Option<Entry> {
        let next = self.current.saturating_sub(step);
        if next == self.current {
            return None;
        }
        Some(self.enter(next))
    }

    fn enter(&mut self, index: usize) -> Entry {
        self.current = index;
        // Invalidate any timer armed for the scene we just left
        self.epoch += 1;
        Entry {
            index,
            epoch: self.epoch,
            duration_ms: self.durations[index],
        }
    }

    /// Where scene `i` sits relative to the playhead
    pub fn visibility(&self, i: usize) -> Visibility {
        use std::cmp::Ordering;
        match i.cmp(&self.current) {
            Ordering::Equal => Visibility::Current,
            Ordering::Less => Visibility::Past,
            Ordering::Greater => Visibility::Future,
        }
    }

    /// A scene stays active once passed, so its exit effects keep running
    /// during the transition out. Future scenes are dormant.
    pub fn is_active(&self, i: usize) -> bool {
        self.playing && self.visibility(i) != Visibility::Future
    }

    /// Only the current scene and its immediate neighbours are mounted.
    /// Everything outside the window is not rendered at all, so rendering
    /// cost stays O(1) in the scene count.
    pub fn in_window(&self, i: usize) -> bool {
        i + 1 >= self.current && i <= self.current + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navigator() -> Navigator {
        // Gate, party, lane, promise, finale shape: terminal scene last
        Navigator::new(vec![1000, 1000, 2000, 1000, 0])
    }

    fn started() -> Navigator {
        let mut nav = navigator();
        nav.begin().unwrap();
        nav
    }

    #[test]
    fn test_begin_enters_scene_zero_once() {
        let mut nav = navigator();
        assert!(!nav.is_playing());

        let entry = nav.begin().unwrap();
        assert_eq!(entry.index, 0);
        assert_eq!(entry.duration_ms, 1000);
        assert!(nav.is_playing());

        // Begin is one-time
        assert!(nav.begin().is_none());
    }

    #[test]
    fn test_no_navigation_before_begin() {
        let mut nav = navigator();
        assert!(nav.navigate(900.0, 1000.0).is_none());
        assert!(nav.navigate(100.0, 1000.0).is_none());
        assert!(nav.timer_fired(0).is_none());
        assert_eq!(nav.current(), 0);
    }

    #[test]
    fn test_timer_advances_with_matching_epoch() {
        let mut nav = navigator();
        let entry = nav.begin().unwrap();

        let next = nav.timer_fired(entry.epoch).unwrap();
        assert_eq!(next.index, 1);
        assert_eq!(nav.current(), 1);
    }

    #[test]
    fn test_stale_timer_is_void() {
        let mut nav = navigator();
        let armed = nav.begin().unwrap();

        // Manual navigation supersedes the armed timer
        let moved = nav.navigate(900.0, 1000.0).unwrap();
        assert_eq!(moved.index, 1);

        // The old timer fires late: it must not advance anything
        assert!(nav.timer_fired(armed.epoch).is_none());
        assert_eq!(nav.current(), 1);

        // The fresh timer still works
        assert!(nav.timer_fired(moved.epoch).is_some());
        assert_eq!(nav.current(), 2);
    }

    #[test]
    fn test_terminal_scene_never_auto_advances() {
        let mut nav = started();
        // Walk to the terminal scene
        for _ in 0..4 {
            nav.forward().unwrap();
        }
        assert_eq!(nav.current(), 4);

        // A terminal scene arms no timer; even a forged fire is ignored
        let mut probe = nav.clone();
        for epoch in 0..20 {
            assert!(probe.timer_fired(epoch).is_none());
        }
        assert_eq!(probe.current(), 4);
    }

    #[test]
    fn test_navigation_saturates_at_both_ends() {
        let mut nav = started();

        // Hammer backward: stays at 0, never wraps, never panics
        for _ in 0..10 {
            let _ = nav.navigate(100.0, 1000.0);
            assert_eq!(nav.current(), 0);
        }

        // Hammer forward: stops at the last index
        for _ in 0..10 {
            let _ = nav.navigate(900.0, 1000.0);
        }
        assert_eq!(nav.current(), 4);

        // Backward from the terminal scene still works
        let entry = nav.navigate(100.0, 1000.0).unwrap();
        assert_eq!(entry.index, 3);
    }

    #[test]
    fn test_click_halves_pick_direction() {
        let mut nav = started();
        nav.forward().unwrap();
        nav.forward().unwrap();
        assert_eq!(nav.current(), 2);

        // 10% of the width goes backward
        let entry = nav.navigate(100.0, 1000.0).unwrap();
        assert_eq!(entry.index, 1);

        // 90% goes forward
        let entry = nav.navigate(900.0, 1000.0).unwrap();
        assert_eq!(entry.index, 2);
    }

    #[test]
    fn test_two_scene_terminal_scenario() {
        // Scene list [{d:1000},{d:0}]: one auto-advance, then parked forever
        let mut nav = Navigator::new(vec![1000, 0]);
        let entry = nav.begin().unwrap();

        let advanced = nav.timer_fired(entry.epoch).unwrap();
        assert_eq!(advanced.index, 1);
        assert_eq!(advanced.duration_ms, 0);

        // No timer gets armed for duration 0, and nothing moves it
        assert!(nav.timer_fired(advanced.epoch).is_none());
        assert_eq!(nav.current(), 1);
    }

    #[test]
    fn test_visibility_classification() {
        let mut nav = started();
        nav.forward().unwrap();
        nav.forward().unwrap();

        assert_eq!(nav.visibility(0), Visibility::Past);
        assert_eq!(nav.visibility(1), Visibility::Past);
        assert_eq!(nav.visibility(2), Visibility::Current);
        assert_eq!(nav.visibility(3), Visibility::Future);
        assert_eq!(nav.visibility(4), Visibility::Future);
    }

    #[test]
    fn test_active_includes_past_scenes() {
        let mut nav = started();
        nav.forward().unwrap();

        assert!(nav.is_active(0), "a passed scene keeps running its effects");
        assert!(nav.is_active(1));
        assert!(!nav.is_active(2), "future scenes are dormant");
    }

    #[test]
    fn test_nothing_active_before_begin() {
        let nav = navigator();
        for i in 0..5 {
            assert!(!nav.is_active(i));
        }
    }

    #[test]
    fn test_render_window_is_three_wide() {
        let mut nav = started();
        nav.forward().unwrap();
        nav.forward().unwrap();
        assert_eq!(nav.current(), 2);

        assert!(!nav.in_window(0));
        assert!(nav.in_window(1));
        assert!(nav.in_window(2));
        assert!(nav.in_window(3));
        assert!(!nav.in_window(4));
    }

    #[test]
    fn test_window_at_edges() {
        let nav = started();
        assert!(nav.in_window(0));
        assert!(nav.in_window(1));
        assert!(!nav.in_window(2));
    }
}
