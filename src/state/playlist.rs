/// Playlist controller: "one track or silence" over a fixed track list
///
/// Pure state machine, decoupled from audio I/O. Every operation returns
/// the effects the update loop must run (fetch a track, stop the
/// foreground sink, flip the background mute, schedule a delayed skip).
/// Two epochs keep async work honest: `epoch` tags the in-flight track
/// request so a superseded fetch is dropped as the benign abort class,
/// and `skip_epoch` tags the 1.5 s auto-skip delay so deactivating the
/// scene cancels a pending skip.

/// How long a failed track waits before auto-skipping to the next one
pub const SKIP_DELAY_MS: u64 = 1_500;

/// Side effects requested by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Fetch and start the given track; report back with this epoch
    FetchTrack { index: usize, epoch: u64 },
    /// Stop the foreground sink immediately
    StopForeground,
    /// Mute (true) or restore (false) the background channel
    SetBackgroundMuted(bool),
    /// After SKIP_DELAY_MS, deliver a skip carrying this epoch
    ScheduleSkip { epoch: u64 },
}

/// User-visible status line owned by the playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Transient: one track failed, the next one is coming
    Skipping,
    /// Terminal: every track failed in a row, playback halted
    Unavailable,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::Skipping => "Track unavailable. Skipping to next song…",
            Notice::Unavailable => "Soundtrack unavailable. Please check connection.",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlaylistController {
    track_count: usize,
    current: Option<usize>,
    consecutive_errors: usize,
    epoch: u64,
    skip_epoch: u64,
    notice: Option<Notice>,
}

impl PlaylistController {
    pub fn new(track_count: usize) -> Self {
        PlaylistController {
            track_count,
            current: None,
            consecutive_errors: 0,
            epoch: 0,
            skip_epoch: 0,
            notice: None,
        }
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn consecutive_errors(&self) -> usize {
        self.consecutive_errors
    }

    pub fn is_halted(&self) -> bool {
        self.notice == Some(Notice::Unavailable)
    }

    /// A user picked track `index`. Picking the playing track stops it.
    pub fn toggle(&mut self, index: usize) -> Vec<Effect> {
        if index >= self.track_count {
            return Vec::new();
        }
        self.notice = None;
        if self.current == Some(index) {
            return self.stop();
        }
        self.select(index)
    }

    /// Stop playback and hand the audio focus back to the background loop
    pub fn stop(&mut self) -> Vec<Effect> {
        self.current = None;
        self.epoch += 1;
        vec![Effect::StopForeground, Effect::SetBackgroundMuted(false)]
    }

    /// Track `index` actually started under `epoch`. A stale report means
    /// the user already moved on; that is the expected abort class and is
    /// swallowed without touching the error count.
    pub fn track_started(&mut self, index: usize, epoch: u64) -> bool {
        if epoch != self.epoch || self.current != Some(index) {
            return false;
        }
        self.consecutive_errors = 0;
        self.notice = None;
        true
    }

    /// The playing track ran to its end: advance, wrapping to the start.
    /// If nothing was playing, start at the first track.
    pub fn track_ended(&mut self) -> Vec<Effect> {
        let next = match self.current {
            Some(index) => (index + 1) % self.track_count,
            None => 0,
        };
        if self.current == Some(next) {
            // Single-track playlist wraps onto itself: treat as a stop
            return self.stop();
        }
        self.select(next)
    }

    /// The current track failed to load or decode. Bounded auto-skip:
    /// after `track_count` consecutive failures the playlist halts, which
    /// guarantees the skip chain terminates when every track is broken.
    pub fn playback_error(&mut self) -> Vec<Effect> {
        self.consecutive_errors = usize::min(self.consecutive_errors + 1, self.track_count);

        if self.consecutive_errors >= self.track_count {
            self.notice = Some(Notice::Unavailable);
            self.current = None;
            self.epoch += 1;
            return vec![Effect::StopForeground, Effect::SetBackgroundMuted(false)];
        }

        self.notice = Some(Notice::Skipping);
        self.skip_epoch += 1;
        vec![Effect::ScheduleSkip {
            epoch: self.skip_epoch,
        }]
    }

    /// A delayed skip came due. Fires only if nothing invalidated it.
    pub fn skip_due(&mut self, epoch: u64) -> Vec<Effect> {
        if epoch != self.skip_epoch {
            return Vec::new();
        }
        self.track_ended()
    }

    /// The owning scene left the active set: stop unconditionally and
    /// cancel any pending skip.
    pub fn deactivate(&mut self) -> Vec<Effect> {
        self.skip_epoch += 1;
        if self.notice == Some(Notice::Skipping) {
            self.notice = None;
        }
        self.stop()
    }

    /// Whether a fetch completion for (`index`, `epoch`) still matters
    pub fn is_current_request(&self, index: usize, epoch: u64) -> bool {
        epoch == self.epoch && self.current == Some(index)
    }

    fn select(&mut self, index: usize) -> Vec<Effect> {
        self.current = Some(index);
        self.epoch += 1;
        vec![
            Effect::SetBackgroundMuted(true),
            Effect::FetchTrack {
                index,
                epoch: self.epoch,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetch_index(effects: &[Effect]) -> Option<usize> {
        effects.iter().find_map(|effect| match effect {
            Effect::FetchTrack { index, .. } => Some(*index),
            _ => None,
        })
    }

    fn fetch_epoch(effects: &[Effect]) -> Option<u64> {
        effects.iter().find_map(|effect| match effect {
            Effect::FetchTrack { epoch, .. } => Some(*epoch),
            _ => None,
        })
    }

    #[test]
    fn test_toggle_starts_and_mutes_background() {
        let mut playlist = PlaylistController::new(5);
        let effects = playlist.toggle(2);

        assert_eq!(playlist.current(), Some(2));
        assert!(effects.contains(&Effect::SetBackgroundMuted(true)));
        assert_eq!(fetch_index(&effects), Some(2));
    }

    #[test]
    fn test_toggle_same_track_stops() {
        let mut playlist = PlaylistController::new(5);
        playlist.toggle(1);

        let effects = playlist.toggle(1);
        assert_eq!(playlist.current(), None);
        assert!(effects.contains(&Effect::StopForeground));
        assert!(effects.contains(&Effect::SetBackgroundMuted(false)));
        assert!(fetch_index(&effects).is_none(), "toggle-off must not restart");
    }

    #[test]
    fn test_stale_fetch_is_benign() {
        let mut playlist = PlaylistController::new(5);
        let first = fetch_epoch(&playlist.toggle(0)).unwrap();
        playlist.toggle(3);

        // The first fetch finishing late is not an error and not a start
        assert!(!playlist.is_current_request(0, first));
        assert!(!playlist.track_started(0, first));
        assert_eq!(playlist.consecutive_errors(), 0);
        assert_eq!(playlist.current(), Some(3));
    }

    #[test]
    fn test_track_started_resets_error_count() {
        let mut playlist = PlaylistController::new(5);
        playlist.toggle(0);
        playlist.playback_error();
        let effects = playlist.skip_due(1);
        let epoch = fetch_epoch(&effects).unwrap();
        assert_eq!(playlist.consecutive_errors(), 1);

        assert!(playlist.track_started(1, epoch));
        assert_eq!(playlist.consecutive_errors(), 0);
        assert!(playlist.notice().is_none());
    }

    #[test]
    fn test_track_ended_wraps_to_start() {
        let mut playlist = PlaylistController::new(3);
        playlist.toggle(2);

        let effects = playlist.track_ended();
        assert_eq!(fetch_index(&effects), Some(0));
        assert_eq!(playlist.current(), Some(0));
    }

    #[test]
    fn test_track_ended_with_silence_starts_first() {
        let mut playlist = PlaylistController::new(3);
        let effects = playlist.track_ended();
        assert_eq!(fetch_index(&effects), Some(0));
    }

    #[test]
    fn test_all_tracks_failing_halts() {
        let mut playlist = PlaylistController::new(3);
        playlist.toggle(0);

        // First two failures schedule skips; running each skip selects the
        // next track, which also fails.
        let mut halted = Vec::new();
        for _ in 0..3 {
            halted = playlist.playback_error();
            let skip = halted.iter().find_map(|effect| match effect {
                Effect::ScheduleSkip { epoch } => Some(*epoch),
                _ => None,
            });
            if let Some(epoch) = skip {
                playlist.skip_due(epoch);
            }
        }

        assert!(playlist.is_halted());
        assert_eq!(playlist.consecutive_errors(), 3);
        assert_eq!(playlist.current(), None);
        assert!(halted.contains(&Effect::StopForeground));
        assert!(halted.contains(&Effect::SetBackgroundMuted(false)));
    }

    #[test]
    fn test_error_count_never_exceeds_track_count() {
        let mut playlist = PlaylistController::new(3);
        playlist.toggle(0);
        for _ in 0..10 {
            playlist.playback_error();
        }
        assert_eq!(playlist.consecutive_errors(), 3);
        assert!(playlist.is_halted());
    }

    #[test]
    fn test_transient_then_terminal_notice() {
        let mut playlist = PlaylistController::new(2);
        playlist.toggle(0);

        playlist.playback_error();
        assert_eq!(playlist.notice(), Some(Notice::Skipping));

        playlist.playback_error();
        assert_eq!(playlist.notice(), Some(Notice::Unavailable));

        // Picking a track again clears the terminal message
        playlist.toggle(1);
        assert!(playlist.notice().is_none());
    }

    #[test]
    fn test_deactivation_cancels_pending_skip() {
        let mut playlist = PlaylistController::new(5);
        playlist.toggle(0);

        let effects = playlist.playback_error();
        let epoch = effects
            .iter()
            .find_map(|effect| match effect {
                Effect::ScheduleSkip { epoch } => Some(*epoch),
                _ => None,
            })
            .unwrap();

        // Scene exits during the delay: the skip must die
        let stop = playlist.deactivate();
        assert!(stop.contains(&Effect::StopForeground));
        assert!(stop.contains(&Effect::SetBackgroundMuted(false)));

        assert!(playlist.skip_due(epoch).is_empty());
        assert_eq!(playlist.current(), None);
    }

    #[test]
    fn test_skip_due_advances_past_broken_track() {
        let mut playlist = PlaylistController::new(5);
        playlist.toggle(1);

        let effects = playlist.playback_error();
        let epoch = match effects[0] {
            Effect::ScheduleSkip { epoch } => epoch,
            _ => panic!("expected a scheduled skip"),
        };

        let next = playlist.skip_due(epoch);
        assert_eq!(fetch_index(&next), Some(2));
    }

    #[test]
    fn test_single_track_playlist_end_stops() {
        let mut playlist = PlaylistController::new(1);
        playlist.toggle(0);

        let effects = playlist.track_ended();
        assert!(effects.contains(&Effect::StopForeground));
        assert_eq!(playlist.current(), None);
    }

    #[test]
    fn test_out_of_range_toggle_is_ignored() {
        let mut playlist = PlaylistController::new(3);
        assert!(playlist.toggle(7).is_empty());
        assert_eq!(playlist.current(), None);
    }
}
