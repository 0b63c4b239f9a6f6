use chrono::Utc;
use iced::widget::scrollable::{self, AbsoluteOffset};
use iced::widget::stack;
use iced::{event, mouse, time, window, Element, Event, Length, Point, Size, Subscription, Task, Theme};
use std::collections::HashMap;
use std::time::{Duration, Instant};

mod assets;
mod media;
mod net;
mod scenes;
mod state;
mod ui;

use assets::{ImageQuality, Registry};
use media::images::{self, RemoteImage};
use media::AudioEngine;
use scenes::{SceneKind, PROGRAM};
use state::gallery::GalleryStrip;
use state::navigation::{Entry, Navigator, Visibility};
use state::playlist::{self, PlaylistController};

/// Animation frame cadence for the gallery, petals and the fade scrim
const TICK_MS: u64 = 16;
const TICK_SECS: f32 = TICK_MS as f32 / 1000.0;

/// How often the foreground sink is checked for a finished track
const AUDIO_POLL_MS: u64 = 500;

/// Delay before the gate doors part once the scene is live
const GATE_REVEAL_MS: u64 = 1_500;

/// Main application state
struct ScenePlayer {
    registry: Registry,
    navigator: Navigator,
    playlist: PlaylistController,
    gallery: GalleryStrip,
    audio: AudioEngine,
    /// Every remote image, keyed by its logical name
    images: HashMap<String, RemoteImage>,
    http: reqwest::Client,
    quality: ImageQuality,
    /// Tagline shown on the memory lane scene once fetched
    narrative: Option<String>,
    gate_open: bool,
    gate_epoch: u64,
    /// Set on every scene change; drives the fade scrim until it clears
    fade_started: Option<Instant>,
    petal_clock: f32,
    cursor: Point,
    viewport: Size,
    /// Soundtrack bytes preloaded before the user presses Begin
    soundtrack_bytes: Option<Vec<u8>>,
    soundtrack_started: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// The one-time start button
    Begin,
    /// Unhandled left click anywhere in the viewport: navigation
    ViewportPressed,
    CursorMoved(Point),
    /// Secondary button: gallery drag
    DragPressed,
    DragReleased,
    WindowResized(Size),
    /// A scene auto-advance timer fired; stale epochs are void
    SceneTimerFired { epoch: u64 },
    GateRevealDue { epoch: u64 },
    /// Animation frame
    Tick(Instant),
    /// Foreground track-end poll
    AudioPoll(Instant),
    QualityPicked(ImageQuality),
    ImageLoaded {
        name: String,
        generation: u64,
        result: Result<images::Loaded, String>,
    },
    ImageRetryDue {
        name: String,
        generation: u64,
    },
    /// Playlist row clicked
    TrackChosen(usize),
    TrackFetched {
        index: usize,
        epoch: u64,
        result: Result<Vec<u8>, String>,
    },
    /// The 1.5 s auto-skip delay elapsed
    SkipDue { epoch: u64 },
    SoundtrackFetched(Result<Vec<u8>, String>),
    NarrativeFetched(String),
}

impl ScenePlayer {
    fn new() -> (Self, Task<Message>) {
        let registry = Registry::load();

        println!(
            "🎨 Scene player initialized: {} scenes, {} images, {} tracks",
            PROGRAM.len(),
            registry.images.len(),
            registry.songs.len()
        );

        let images: HashMap<String, RemoteImage> = registry
            .images
            .iter()
            .map(|asset| (asset.name.clone(), RemoteImage::new(asset.url.clone())))
            .collect();

        let http = net::client();
        let soundtrack_url = registry.soundtrack_url.clone();
        let track_count = registry.songs.len();

        let player = ScenePlayer {
            navigator: Navigator::new(scenes::durations()),
            playlist: PlaylistController::new(track_count),
            gallery: GalleryStrip::new(),
            audio: AudioEngine::new(),
            images,
            http: http.clone(),
            quality: ImageQuality::OneK,
            narrative: None,
            gate_open: false,
            gate_epoch: 0,
            fade_started: None,
            petal_clock: 0.0,
            cursor: Point::ORIGIN,
            viewport: Size::new(1280.0, 720.0),
            soundtrack_bytes: None,
            soundtrack_started: false,
            registry,
        };

        let mut tasks = vec![window::get_latest()
            .and_then(window::get_size)
            .map(Message::WindowResized)];

        // Preload everything up front, like the hidden preloader of the
        // original page: the images and the soundtrack are wanted soon anyway
        let names: Vec<String> = player.images.keys().cloned().collect();
        for name in names {
            tasks.push(player.fetch_image_task(&name, true));
        }
        tasks.push(Task::perform(
            net::fetch_audio(http, soundtrack_url),
            Message::SoundtrackFetched,
        ));

        (player, Task::batch(tasks))
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Begin => {
                if self.navigator.is_playing() {
                    return Task::none();
                }
                println!("🎬 The journey begins");
                let task = self.transition(|nav| nav.begin());
                if let Some(bytes) = self.soundtrack_bytes.clone() {
                    self.start_soundtrack(bytes);
                }
                task
            }

            Message::ViewportPressed => {
                let x = self.cursor.x;
                let width = self.viewport.width;
                self.transition(move |nav| nav.navigate(x, width))
            }

            Message::SceneTimerFired { epoch } => {
                self.transition(move |nav| nav.timer_fired(epoch))
            }

            Message::CursorMoved(position) => {
                self.cursor = position;
                if self.gallery.is_dragging() {
                    self.gallery.drag_to(position.x);
                    return scrollable::scroll_to(
                        ui::gallery_scroll_id(),
                        AbsoluteOffset {
                            x: self.gallery.scroll_x(),
                            y: 0.0,
                        },
                    );
                }
                Task::none()
            }

            Message::DragPressed => {
                let lane = scenes::index_of(SceneKind::MemoryLane);
                if self.navigator.is_playing()
                    && self.navigator.visibility(lane) == Visibility::Current
                {
                    self.gallery.begin_drag(self.cursor.x);
                }
                Task::none()
            }

            Message::DragReleased => {
                self.gallery.end_drag();
                Task::none()
            }

            Message::WindowResized(size) => {
                self.viewport = size;
                Task::none()
            }

            Message::GateRevealDue { epoch } => {
                let gate = scenes::index_of(SceneKind::Gate);
                if epoch == self.gate_epoch && self.navigator.is_active(gate) {
                    self.gate_open = true;
                }
                Task::none()
            }

            Message::Tick(_now) => {
                self.petal_clock += TICK_SECS;

                if let Some(started) = self.fade_started {
                    if started.elapsed() >= Duration::from_millis(ui::FADE_MS) {
                        self.fade_started = None;
                    }
                }

                if self.gallery_running() {
                    self.gallery.tick();
                    return scrollable::scroll_to(
                        ui::gallery_scroll_id(),
                        AbsoluteOffset {
                            x: self.gallery.scroll_x(),
                            y: 0.0,
                        },
                    );
                }
                Task::none()
            }

            Message::AudioPoll(_now) => {
                if self.playlist.current().is_some() && self.audio.foreground_finished() {
                    self.audio.stop_foreground();
                    println!("⏭️  Track finished, advancing");
                    let effects = self.playlist.track_ended();
                    return self.run_playlist_effects(effects);
                }
                Task::none()
            }

            Message::QualityPicked(quality) => {
                self.quality = quality;
                println!("🔍 {}", quality);
                Task::none()
            }

            Message::ImageLoaded {
                name,
                generation,
                result,
            } => match result {
                Ok(loaded) => {
                    if let Some(entry) = self.images.get_mut(&name) {
                        entry.fetch_succeeded(generation, loaded);
                    }
                    Task::none()
                }
                Err(e) => {
                    let Some(entry) = self.images.get_mut(&name) else {
                        return Task::none();
                    };
                    if !entry.fetch_failed(generation) {
                        return Task::none();
                    }
                    let attempt = entry.retry_count();
                    eprintln!(
                        "🖼️  Image {} failed (attempt {}): {}. Retrying…",
                        name, attempt, e
                    );
                    Task::perform(
                        tokio::time::sleep(Duration::from_millis(images::RETRY_DELAY_MS)),
                        move |_| Message::ImageRetryDue {
                            name: name.clone(),
                            generation,
                        },
                    )
                }
            },

            Message::ImageRetryDue { name, generation } => {
                let now = Utc::now().timestamp_millis();
                let Some(entry) = self.images.get_mut(&name) else {
                    return Task::none();
                };
                if entry.retry_due(generation, now).is_none() {
                    return Task::none();
                }
                // Retries bypass the disk cache; their URL is cache-busted
                self.fetch_image_task(&name, false)
            }

            Message::TrackChosen(index) => {
                let effects = self.playlist.toggle(index);
                self.run_playlist_effects(effects)
            }

            Message::TrackFetched {
                index,
                epoch,
                result,
            } => {
                if !self.playlist.is_current_request(index, epoch) {
                    // Superseded while in flight: the expected abort class,
                    // neither surfaced nor counted
                    return Task::none();
                }
                match result {
                    Ok(bytes) => match self.audio.play_foreground(bytes) {
                        Ok(()) => {
                            self.playlist.track_started(index, epoch);
                            if let Some(song) = self.registry.songs.get(index) {
                                println!("🎵 Now playing \"{}\" by {}", song.title, song.artist);
                            }
                            Task::none()
                        }
                        Err(e) => {
                            eprintln!("⚠️  Track failed to start: {}", e);
                            let effects = self.playlist.playback_error();
                            self.run_playlist_effects(effects)
                        }
                    },
                    Err(e) => {
                        eprintln!("⚠️  Track fetch failed: {}", e);
                        let effects = self.playlist.playback_error();
                        self.run_playlist_effects(effects)
                    }
                }
            }

            Message::SkipDue { epoch } => {
                let effects = self.playlist.skip_due(epoch);
                self.run_playlist_effects(effects)
            }

            Message::SoundtrackFetched(result) => {
                match result {
                    Ok(bytes) => {
                        println!("🎧 Soundtrack ready ({} KB)", bytes.len() / 1024);
                        if self.navigator.is_playing() {
                            self.start_soundtrack(bytes);
                        } else {
                            self.soundtrack_bytes = Some(bytes);
                        }
                    }
                    // The background loop has no retry; the show runs without it
                    Err(e) => eprintln!("⚠️  Soundtrack unavailable: {}", e),
                }
                Task::none()
            }

            Message::NarrativeFetched(line) => {
                self.narrative = Some(line);
                Task::none()
            }
        }
    }

    /// Run one navigation step and everything that hangs off a scene
    /// change: the fade scrim, the next auto-advance timer, and the
    /// activation/mount diffs of the scenes involved.
    fn transition(
        &mut self,
        go: impl FnOnce(&mut Navigator) -> Option<Entry>,
    ) -> Task<Message> {
        let gate = scenes::index_of(SceneKind::Gate);
        let lane = scenes::index_of(SceneKind::MemoryLane);
        let finale = scenes::terminal_index();

        let finale_was_active = self.navigator.is_active(finale);
        let lane_was_active = self.navigator.is_active(lane);
        let gate_was_mounted = self.navigator.is_playing() && self.navigator.in_window(gate);

        let Some(entry) = go(&mut self.navigator) else {
            return Task::none();
        };

        self.fade_started = Some(Instant::now());
        println!(
            "🎞️  Scene {} of {}",
            entry.index + 1,
            self.navigator.scene_count()
        );

        let mut tasks: Vec<Task<Message>> = Vec::new();

        // Arm the auto-advance timer; a zero duration is a terminal scene.
        // The epoch makes a superseded timer harmless when it fires late.
        if entry.duration_ms > 0 {
            let epoch = entry.epoch;
            tasks.push(Task::perform(
                tokio::time::sleep(Duration::from_millis(entry.duration_ms)),
                move |_| Message::SceneTimerFired { epoch },
            ));
        }

        // The playlist scene must fall silent the moment it leaves the
        // active set, and pending skips die with it
        if finale_was_active && !self.navigator.is_active(finale) {
            let effects = self.playlist.deactivate();
            tasks.push(self.run_playlist_effects(effects));
        }

        // Memory lane fetches a fresh tagline on every activation
        if !lane_was_active && self.navigator.is_active(lane) {
            tasks.push(Task::perform(
                net::fetch_narrative(self.http.clone()),
                Message::NarrativeFetched,
            ));
        }

        // Unmounting the lane rewinds the strip for its next mount
        if !self.navigator.in_window(lane) {
            self.gallery.reset();
        }

        // Gate doors close again when the scene unmounts, and the reveal
        // timer re-arms when it comes back
        let gate_mounted = self.navigator.is_playing() && self.navigator.in_window(gate);
        if gate_was_mounted && !gate_mounted {
            self.gate_open = false;
            self.gate_epoch += 1;
        }
        if gate_mounted && !gate_was_mounted && !self.gate_open {
            self.gate_epoch += 1;
            let epoch = self.gate_epoch;
            tasks.push(Task::perform(
                tokio::time::sleep(Duration::from_millis(GATE_REVEAL_MS)),
                move |_| Message::GateRevealDue { epoch },
            ));
        }

        Task::batch(tasks)
    }

    /// Translate playlist controller effects into audio calls and tasks
    fn run_playlist_effects(&mut self, effects: Vec<playlist::Effect>) -> Task<Message> {
        let mut tasks: Vec<Task<Message>> = Vec::new();

        for effect in effects {
            match effect {
                playlist::Effect::StopForeground => self.audio.stop_foreground(),
                playlist::Effect::SetBackgroundMuted(muted) => {
                    self.audio.set_background_muted(muted)
                }
                playlist::Effect::FetchTrack { index, epoch } => {
                    if let Some(song) = self.registry.songs.get(index) {
                        println!("🎵 Loading \"{}\" by {}", song.title, song.artist);
                        tasks.push(Task::perform(
                            net::fetch_audio(self.http.clone(), song.url.clone()),
                            move |result| Message::TrackFetched {
                                index,
                                epoch,
                                result,
                            },
                        ));
                    }
                }
                playlist::Effect::ScheduleSkip { epoch } => {
                    tasks.push(Task::perform(
                        tokio::time::sleep(Duration::from_millis(playlist::SKIP_DELAY_MS)),
                        move |_| Message::SkipDue { epoch },
                    ));
                }
            }
        }

        Task::batch(tasks)
    }

    /// Kick off (or re-kick) the fetch for one remote image
    fn fetch_image_task(&self, name: &str, use_cache: bool) -> Task<Message> {
        let Some(entry) = self.images.get(name) else {
            return Task::none();
        };
        let generation = entry.generation();
        let url = entry.url().to_string();
        let owned = name.to_string();

        Task::perform(
            net::load_image(self.http.clone(), owned.clone(), url, use_cache),
            move |result| Message::ImageLoaded {
                name: owned.clone(),
                generation,
                result,
            },
        )
    }

    fn start_soundtrack(&mut self, bytes: Vec<u8>) {
        if self.soundtrack_started {
            return;
        }
        match self.audio.start_background(bytes) {
            Ok(()) => {
                self.soundtrack_started = true;
                println!("🎧 Background soundtrack playing");
            }
            // Absorbed: the show never depends on the soundtrack
            Err(e) => eprintln!("⚠️  Background soundtrack failed: {}", e),
        }
    }

    /// The strip free-runs while the lane is active and mounted and the
    /// user is not holding it
    fn gallery_running(&self) -> bool {
        let lane = scenes::index_of(SceneKind::MemoryLane);
        self.navigator.is_playing()
            && self.navigator.is_active(lane)
            && self.navigator.in_window(lane)
            && !self.gallery.is_dragging()
    }

    /// Whether the animation tick subscription needs to run at all
    fn animating(&self) -> bool {
        if !self.navigator.is_playing() {
            return false;
        }
        let gate = scenes::index_of(SceneKind::Gate);
        let finale = scenes::terminal_index();
        self.fade_started.is_some()
            || self.gallery_running()
            || self.navigator.in_window(gate)
            || self.navigator.in_window(finale)
    }

    fn fade_alpha(&self) -> Option<f32> {
        let started = self.fade_started?;
        let alpha = 1.0 - started.elapsed().as_millis() as f32 / ui::FADE_MS as f32;
        (alpha > 0.0).then_some(alpha)
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let current = self.navigator.current();
        let mut layers: Vec<Element<Message>> = Vec::new();

        // Only the render window is mounted: neighbours beneath, the
        // current scene on top of them
        for index in 0..PROGRAM.len() {
            if index != current && self.navigator.in_window(index) {
                layers.push(self.scene_view(index));
            }
        }
        layers.push(self.scene_view(current));

        if let Some(alpha) = self.fade_alpha() {
            layers.push(ui::scrim(alpha));
        }

        if self.navigator.is_playing() {
            // Chrome disappears on the terminal scene
            if current + 1 < self.navigator.scene_count() {
                layers.push(ui::nav_hints());
                layers.push(ui::progress_bar(current, self.navigator.scene_count()));
            }
        } else {
            layers.push(ui::start_overlay());
        }

        layers.push(ui::quality_selector(self.quality));

        stack(layers)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn scene_view(&self, index: usize) -> Element<Message> {
        match PROGRAM[index].kind {
            SceneKind::Gate => ui::scene_views::gate(self.gate_open, self.petal_clock),
            SceneKind::Party => ui::scene_views::party(&self.registry, &self.images),
            SceneKind::MemoryLane => ui::scene_views::memory_lane(
                &self.registry,
                &self.images,
                self.narrative.as_deref(),
            ),
            SceneKind::Promise => ui::scene_views::promise(&self.images),
            SceneKind::Finale => ui::scene_views::finale(
                &self.registry,
                &self.images,
                &self.playlist,
                self.petal_clock,
            ),
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![event::listen_with(handle_event)];

        if self.animating() {
            subscriptions.push(time::every(Duration::from_millis(TICK_MS)).map(Message::Tick));
        }

        if self.playlist.current().is_some() && self.audio.has_foreground() {
            subscriptions
                .push(time::every(Duration::from_millis(AUDIO_POLL_MS)).map(Message::AudioPoll));
        }

        Subscription::batch(subscriptions)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Raw event filter backing click navigation and the gallery drag.
/// Anything a widget already captured (the Begin button, track rows, the
/// quality selector) never reaches navigation.
fn handle_event(event: Event, status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Mouse(mouse::Event::CursorMoved { position }) => {
            Some(Message::CursorMoved(position))
        }
        Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
            if status == event::Status::Captured {
                None
            } else {
                Some(Message::ViewportPressed)
            }
        }
        // The drag is tracked globally so it survives leaving the strip
        Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Right)) => {
            Some(Message::DragPressed)
        }
        Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Right)) => {
            Some(Message::DragReleased)
        }
        Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized(size)),
        _ => None,
    }
}

fn main() -> iced::Result {
    iced::application("A Journey for You", ScenePlayer::update, ScenePlayer::view)
        .subscription(ScenePlayer::subscription)
        .theme(ScenePlayer::theme)
        .centered()
        .run_with(ScenePlayer::new)
}
