/// Scene descriptors: the fixed, ordered program of the show
///
/// A scene is one full-viewport presentation unit. Its ordinal position is
/// its identity; its duration drives the auto-advance timer. A duration of
/// zero marks a terminal scene that only leaves via manual navigation.

/// Which scenes exist, in playback order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    /// Opening doors that part to reveal the greeting
    Gate,
    /// Wrapped grid of cat portraits
    Party,
    /// Auto-scrolling polaroid strip
    MemoryLane,
    /// Full-bleed background with the promise message
    Promise,
    /// Festival finale with the interactive playlist
    Finale,
}

/// What a scene is allowed to do beyond rendering itself.
/// The toggle over the background audio channel is granted structurally,
/// not by position, so reordering scenes cannot leak the capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneRole {
    Standard,
    /// May mute/unmute the background channel (owns the playlist UI)
    Terminal,
}

/// One entry in the program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneSpec {
    pub kind: SceneKind,
    pub role: SceneRole,
    /// Auto-advance delay in milliseconds; 0 = never advance
    pub duration_ms: u64,
}

/// The program. Memory lane runs long enough for the full strip to scroll by.
pub const PROGRAM: [SceneSpec; 5] = [
    SceneSpec {
        kind: SceneKind::Gate,
        role: SceneRole::Standard,
        duration_ms: 12_000,
    },
    SceneSpec {
        kind: SceneKind::Party,
        role: SceneRole::Standard,
        duration_ms: 12_000,
    },
    SceneSpec {
        kind: SceneKind::MemoryLane,
        role: SceneRole::Standard,
        duration_ms: 169_000,
    },
    SceneSpec {
        kind: SceneKind::Promise,
        role: SceneRole::Standard,
        duration_ms: 30_000,
    },
    SceneSpec {
        kind: SceneKind::Finale,
        role: SceneRole::Terminal,
        duration_ms: 0,
    },
];

/// Durations only, in program order. This is what the navigator consumes.
pub fn durations() -> Vec<u64> {
    PROGRAM.iter().map(|scene| scene.duration_ms).collect()
}

/// Index of a scene kind within the program
pub fn index_of(kind: SceneKind) -> usize {
    PROGRAM
        .iter()
        .position(|scene| scene.kind == kind)
        .unwrap_or(0)
}

/// The scene holding the background-audio capability. Found by role, not
/// by position, so the playlist lifecycle follows the declaration even if
/// the program is reordered.
pub fn terminal_index() -> usize {
    PROGRAM
        .iter()
        .position(|scene| scene.role == SceneRole::Terminal)
        .unwrap_or(PROGRAM.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_terminal_scene() {
        let terminals: Vec<_> = PROGRAM
            .iter()
            .filter(|scene| scene.role == SceneRole::Terminal)
            .collect();
        assert_eq!(terminals.len(), 1);
        assert_eq!(terminals[0].kind, SceneKind::Finale);
    }

    #[test]
    fn test_terminal_scene_never_advances() {
        // The last scene must hold: duration 0, and it is the only one
        let last = PROGRAM.last().unwrap();
        assert_eq!(last.duration_ms, 0);
        assert!(PROGRAM[..PROGRAM.len() - 1]
            .iter()
            .all(|scene| scene.duration_ms > 0));
    }

    #[test]
    fn test_index_of_matches_order() {
        assert_eq!(index_of(SceneKind::Gate), 0);
        assert_eq!(index_of(SceneKind::MemoryLane), 2);
        assert_eq!(index_of(SceneKind::Finale), PROGRAM.len() - 1);
    }

    #[test]
    fn test_terminal_index_follows_the_role() {
        assert_eq!(terminal_index(), index_of(SceneKind::Finale));
    }
}
