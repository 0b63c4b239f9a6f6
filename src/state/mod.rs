/// Orchestration state machines
///
/// This module holds the pure state of the show, including:
/// - The scene timer/navigation core (navigation.rs)
/// - The playlist controller (playlist.rs)
/// - The free-drag gallery strip (gallery.rs)
///
/// Nothing here does I/O or touches widgets. The update loop in main.rs
/// feeds events in and runs the effects that come back out.

pub mod navigation;
pub mod playlist;
pub mod gallery;
