/// Resilient remote images
///
/// Externally-hosted images fail often enough that every one gets the
/// same treatment: on failure, wait two seconds and refetch through a
/// cache-busting URL so no intermediary can replay the failure. The
/// retries never give up; the hosts are assumed to come back eventually.
/// A generation token guards each delayed retry so a success (or a
/// superseding attempt) voids anything still in flight.
///
/// A loaded image carries two handles: the sharp pixels and a blurred,
/// darkened copy drawn underneath as the full-bleed fill.

use iced::widget::image::Handle;
use image::imageops::FilterType;

/// Delay before a failed image is refetched
pub const RETRY_DELAY_MS: u64 = 2_000;

/// Width of the downscaled copy the blur runs on. Blurring a small image
/// and letting the GPU stretch it matches the cheap CSS-blur look.
const BLUR_BASE_WIDTH: u32 = 160;
const BLUR_SIGMA: f32 = 8.0;

/// Decoded image ready for the compositor
#[derive(Debug, Clone)]
pub struct Loaded {
    pub sharp: Handle,
    pub blurred: Handle,
    pub width: u32,
    pub height: u32,
}

/// One remote image and its retry ledger
#[derive(Debug, Clone)]
pub struct RemoteImage {
    canonical_url: String,
    displayed_url: String,
    retry_count: u32,
    generation: u64,
    loaded: Option<Loaded>,
}

impl RemoteImage {
    pub fn new(canonical_url: impl Into<String>) -> Self {
        let canonical_url = canonical_url.into();
        RemoteImage {
            displayed_url: canonical_url.clone(),
            canonical_url,
            retry_count: 0,
            generation: 0,
            loaded: None,
        }
    }

    /// URL the current attempt should fetch
    pub fn url(&self) -> &str {
        &self.displayed_url
    }

    /// Token identifying the current attempt
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn loaded(&self) -> Option<&Loaded> {
        self.loaded.as_ref()
    }

    /// A fetch or decode attempt failed. Returns true when the failure
    /// belongs to the current attempt, i.e. the caller should schedule a
    /// retry carrying the same generation.
    pub fn fetch_failed(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.loaded.is_some() {
            return false;
        }
        self.retry_count += 1;
        true
    }

    /// The retry delay elapsed. Recomputes the displayed URL with a fresh
    /// cache-busting token and returns it, or None when the retry went
    /// stale (image loaded meanwhile, or a newer attempt exists).
    pub fn retry_due(&mut self, generation: u64, now_millis: i64) -> Option<String> {
        if generation != self.generation || self.loaded.is_some() {
            return None;
        }
        self.generation += 1;
        self.displayed_url = cache_busted(&self.canonical_url, now_millis);
        Some(self.displayed_url.clone())
    }

    /// Pixels arrived for the given attempt. Stale results are dropped.
    pub fn fetch_succeeded(&mut self, generation: u64, loaded: Loaded) -> bool {
        if generation != self.generation || self.loaded.is_some() {
            return false;
        }
        self.loaded = Some(loaded);
        // Void any retry still sleeping
        self.generation += 1;
        true
    }
}

/// Append a unique cache-busting token, respecting an existing query string
fn cache_busted(canonical: &str, now_millis: i64) -> String {
    let separator = if canonical.contains('?') { '&' } else { '?' };
    format!("{}{}retry={}", canonical, separator, now_millis)
}

/// Decode raw bytes and build the sharp handle plus its blurred fill.
/// CPU-bound; callers run it on a blocking thread.
pub fn decode_with_placeholder(bytes: Vec<u8>) -> Result<Loaded, String> {
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| format!("Image decode failed: {}", e))?;

    let width = decoded.width();
    let height = decoded.height();

    // Small copy, heavy blur, slightly darkened so overlaid text stays legible
    let blur_height = (BLUR_BASE_WIDTH * height.max(1) / width.max(1)).max(1);
    let blurred = decoded
        .resize_exact(BLUR_BASE_WIDTH, blur_height, FilterType::Triangle)
        .blur(BLUR_SIGMA)
        .brighten(-30)
        .to_rgba8();

    let blurred_handle = Handle::from_rgba(
        blurred.width(),
        blurred.height(),
        blurred.into_raw(),
    );

    Ok(Loaded {
        sharp: Handle::from_bytes(bytes),
        blurred: blurred_handle,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn dummy_loaded() -> Loaded {
        Loaded {
            sharp: Handle::from_rgba(1, 1, vec![255, 0, 0, 255]),
            blurred: Handle::from_rgba(1, 1, vec![0, 0, 0, 255]),
            width: 1,
            height: 1,
        }
    }

    #[test]
    fn test_cache_busting_separator() {
        assert_eq!(
            cache_busted("https://host/a.png", 42),
            "https://host/a.png?retry=42"
        );
        assert_eq!(
            cache_busted("https://host/a.png?v=1", 42),
            "https://host/a.png?v=1&retry=42"
        );
    }

    #[test]
    fn test_retry_urls_differ_every_attempt() {
        let mut img = RemoteImage::new("https://host/pic.png");
        let mut seen = Vec::new();

        // Fail, wait, retry, fail again: each attempt gets a fresh URL
        let mut clock = 1_000;
        for _ in 0..5 {
            let generation = img.generation();
            assert!(img.fetch_failed(generation));
            let url = img.retry_due(generation, clock).unwrap();
            assert!(
                !seen.contains(&url),
                "retry URL repeated: {}",
                url
            );
            seen.push(url);
            clock += RETRY_DELAY_MS as i64;
        }
        assert_eq!(img.retry_count(), 5);
    }

    #[test]
    fn test_success_voids_pending_retry() {
        let mut img = RemoteImage::new("https://host/pic.png");
        let generation = img.generation();
        assert!(img.fetch_failed(generation));

        // The image recovers before the retry delay elapses
        assert!(img.fetch_succeeded(generation, dummy_loaded()));
        assert!(img.loaded().is_some());

        // The sleeping retry wakes up to nothing
        assert!(img.retry_due(generation, 9_999).is_none());
    }

    #[test]
    fn test_stale_failure_is_ignored() {
        let mut img = RemoteImage::new("https://host/pic.png");
        let old = img.generation();
        assert!(img.fetch_failed(old));
        img.retry_due(old, 1_000);

        // A late failure report from the first attempt changes nothing
        assert!(!img.fetch_failed(old));
        assert_eq!(img.retry_count(), 1);
    }

    #[test]
    fn test_stale_success_is_dropped() {
        let mut img = RemoteImage::new("https://host/pic.png");
        let old = img.generation();
        assert!(img.fetch_failed(old));
        img.retry_due(old, 1_000);

        assert!(!img.fetch_succeeded(old, dummy_loaded()));
        assert!(img.loaded().is_none());
    }

    #[test]
    fn test_decode_builds_both_handles() {
        // Encode a tiny PNG in memory and run it through the decoder
        let source = image::RgbaImage::from_pixel(8, 4, image::Rgba([200, 60, 120, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(source)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let loaded = decode_with_placeholder(bytes).unwrap();
        assert_eq!(loaded.width, 8);
        assert_eq!(loaded.height, 4);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_with_placeholder(vec![0, 1, 2, 3]).is_err());
    }
}
