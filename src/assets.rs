/// Static asset registry: logical names mapped to remote URLs
///
/// All images, playlist tracks and the background soundtrack live on
/// external hosting. The registry is consumed read-only by every scene;
/// a deployment can swap the whole manifest by pointing the
/// SCENE_PLAYER_MANIFEST environment variable at a JSON file.

use serde::{Deserialize, Serialize};

/// A single remote image with a stable logical name.
/// The name doubles as the disk-cache key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub name: String,
    pub url: String,
}

/// One polaroid in the memory lane strip
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Memory {
    /// Logical image name (must exist in `images`)
    pub image: String,
    pub caption: String,
    /// Tilt in degrees, alternating sign gives the strip its scattered look
    pub tilt: f32,
}

/// One portrait in the party grid
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Cat {
    pub name: String,
    /// Logical image name (must exist in `images`)
    pub image: String,
}

/// One playlist track
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Song {
    pub title: String,
    pub artist: String,
    pub url: String,
}

/// The complete asset manifest
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Registry {
    pub images: Vec<ImageAsset>,
    pub memories: Vec<Memory>,
    pub cats: Vec<Cat>,
    pub songs: Vec<Song>,
    /// The always-present ambient loop (the background audio channel)
    pub soundtrack_url: String,
}

impl Registry {
    /// The compiled-in manifest
    pub fn builtin() -> Self {
        let images = vec![
            asset("childhood_yellow", "https://i.ibb.co/GBWMftp/Gemini-Generated-Image-s3075qs3075qs307.png"),
            asset("childhood_boy", "https://i.ibb.co/xKQ3pRrX/Gemini-Generated-Image-ktbwkgktbwkgktbw.png"),
            asset("white_kurti", "https://i.ibb.co/tpTSHDYq/Whats-App-Image-2025-11-22-at-18-51-11.jpg"),
            asset("close_selfie", "https://i.ibb.co/8DJpghgs/Gemini-Generated-Image-t38rbht38rbht38r.png"),
            asset("couple_red_hair", "https://i.ibb.co/sJRmtJ45/Gemini-Generated-Image-yk1lrwyk1lrwyk1l.png"),
            asset("walking_back", "https://i.ibb.co/5Xy3KRYC/Gemini-Generated-Image-ndcf3yndcf3yndcf.png"),
            asset("group_event", "https://i.ibb.co/ZCd52DX/Gemini-Generated-Image-rspa2srspa2srspa.png"),
            asset("couple_walking_blue", "https://i.ibb.co/NdZzhHfd/Gemini-Generated-Image-gz1wl6gz1wl6gz1w.png"),
            asset("red_hair_solo", "https://i.ibb.co/KpkwLDBh/Gemini-Generated-Image-12qee112qee112qe.png"),
            asset("red_top_car", "https://i.ibb.co/WNkwK36q/Gemini-Generated-Image-flrinflrinflrinf.png"),
            asset("mirror_red_top", "https://i.ibb.co/391LY2qw/Gemini-Generated-Image-83qmp783qmp783qm.png"),
            asset("car_selfie", "https://i.ibb.co/6JV3j36r/Gemini-Generated-Image-n4y5yen4y5yen4y5.png"),
            asset("black_shirt_smile", "https://i.ibb.co/Kjd1F3kf/Gemini-Generated-Image-4bcl6m4bcl6m4bcl.png"),
            asset("basketball_team", "https://i.ibb.co/Psh4Qcjs/Whats-App-Image-2025-11-22-at-20-08-23.jpg"),
            asset("diego", "https://i.ibb.co/nNpM14Xz/Gemini-Generated-Image-fqmm87fqmm87fqmm.png"),
            asset("archie", "https://i.ibb.co/BKvB3Rf3/Whats-App-Image-2025-11-22-at-20-02-43.jpg"),
            asset("katy", "https://i.ibb.co/mFzTMTTX/Gemini-Generated-Image-od3o85od3o85od3o.png"),
            asset("casper", "https://i.ibb.co/gLY0gy1B/Whats-App-Image-2025-11-22-at-20-01-20.jpg"),
            asset("leonard", "https://i.ibb.co/zHLJpNz5/Whats-App-Image-2025-11-22-at-20-04-14.jpg"),
            asset("snowbell", "https://i.ibb.co/TM9rBf0Z/Whats-App-Image-2025-11-22-at-20-04-28.jpg"),
            asset("oliver", "https://i.ibb.co/ZRFCB8p3/Gemini-Generated-Image-7zvdah7zvdah7zvd.png"),
            asset("promise_background", "https://i.ibb.co/xKQ3pRrX/Gemini-Generated-Image-ktbwkgktbwkgktbw.png"),
            asset("finale_background", "https://i.ibb.co/39PHZbJk/Gemini-Generated-Image-khavqukhavqukhav.png"),
        ];

        // Ordered by mood: childhood, joy, connection
        let memories = vec![
            memory("childhood_yellow", "Where it all began", -4.0),
            memory("childhood_boy", "Little You", 3.0),
            memory("basketball_team", "Team Spirit #16", -2.0),
            memory("white_kurti", "Pure Joy", 2.0),
            memory("red_hair_solo", "Stunning", 1.0),
            memory("mirror_red_top", "Selfie Queen", -3.0),
            memory("close_selfie", "That Smile", 2.0),
            memory("black_shirt_smile", "Infectious Happiness", -2.0),
            memory("red_top_car", "Road Trips", 4.0),
            memory("car_selfie", "Peace", -1.0),
            memory("couple_walking_blue", "Side by Side", 3.0),
            memory("walking_back", "I Got You", -2.0),
            memory("couple_red_hair", "Us Against The World", 1.0),
            memory("group_event", "Celebrations", -3.0),
        ];

        let cats = ["Diego", "Archie", "Katy", "Casper", "Leonard", "Snowbell", "Oliver"]
            .iter()
            .map(|name| Cat {
                name: (*name).to_string(),
                image: name.to_lowercase(),
            })
            .collect();

        let songs = vec![
            song("Coconut Tree", "Mohombi", "https://files.catbox.moe/nzg8w1.mp3"),
            song("In Your Head", "Mohombi", "https://files.catbox.moe/0pfjsv.mp3"),
            song("What Am I", "Why Don't We", "https://files.catbox.moe/whnpt7.mp3"),
            song("Don't Change", "Why Don't We", "https://files.catbox.moe/hcaa1e.mp3"),
            song("8 Letters", "Why Don't We", "https://files.catbox.moe/iupne9.mp3"),
        ];

        Registry {
            images,
            memories,
            cats,
            songs,
            soundtrack_url: "https://files.catbox.moe/wsppup.mp3".to_string(),
        }
    }

    /// Parse a manifest override from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load the manifest, honoring the SCENE_PLAYER_MANIFEST override.
    /// Any problem with the override falls back to the builtin manifest.
    pub fn load() -> Self {
        let Ok(path) = std::env::var("SCENE_PLAYER_MANIFEST") else {
            return Self::builtin();
        };

        match std::fs::read_to_string(&path).map_err(|e| e.to_string()) {
            Ok(json) => match Self::from_json(&json) {
                Ok(registry) => {
                    println!("📁 Loaded asset manifest override from {}", path);
                    registry
                }
                Err(e) => {
                    eprintln!("⚠️  Bad manifest {}: {}. Using builtin assets.", path, e);
                    Self::builtin()
                }
            },
            Err(e) => {
                eprintln!("⚠️  Cannot read manifest {}: {}. Using builtin assets.", path, e);
                Self::builtin()
            }
        }
    }

    /// Look up the URL for a logical image name
    pub fn image_url(&self, name: &str) -> Option<&str> {
        self.images
            .iter()
            .find(|asset| asset.name == name)
            .map(|asset| asset.url.as_str())
    }
}

fn asset(name: &str, url: &str) -> ImageAsset {
    ImageAsset {
        name: name.to_string(),
        url: url.to_string(),
    }
}

fn memory(image: &str, caption: &str, tilt: f32) -> Memory {
    Memory {
        image: image.to_string(),
        caption: caption.to_string(),
        tilt,
    }
}

fn song(title: &str, artist: &str, url: &str) -> Song {
    Song {
        title: title.to_string(),
        artist: artist.to_string(),
        url: url.to_string(),
    }
}

/// Requested image quality. Shown in the top-right selector.
/// The hosting serves one rendition today, so playback ignores it,
/// but the selection is kept so a future host can honor it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageQuality {
    OneK,
    TwoK,
    FourK,
}

impl ImageQuality {
    pub const ALL: [ImageQuality; 3] = [ImageQuality::OneK, ImageQuality::TwoK, ImageQuality::FourK];
}

impl std::fmt::Display for ImageQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ImageQuality::OneK => "Quality: 1K",
            ImageQuality::TwoK => "Quality: 2K",
            ImageQuality::FourK => "Quality: 4K",
        };
        write!(f, "{}", label)
    }
}
