/// Remote fetching and the on-disk image cache
///
/// All network I/O funnels through one reqwest client. Downloaded images
/// are cached on disk under the user's cache directory so a replay of the
/// show works offline; retries always go to the network, since their whole
/// point is to bypass a cached failure.

use crate::media::images::{self, Loaded};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Fallback tagline when the narrative provider is unreachable or unset
pub const FALLBACK_NARRATIVE: &str = "Every memory with you is a treasure I hold dear.";

/// Environment variable naming an optional narrative text endpoint
pub const NARRATIVE_URL_VAR: &str = "SCENE_NARRATIVE_URL";

#[derive(Debug, Error, Clone)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("server answered {0}")]
    Status(u16),
}

/// Build the shared HTTP client
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(concat!("scene-player/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}

/// GET a URL and return its body bytes
pub async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Request(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| FetchError::Request(e.to_string()))?;
    Ok(bytes.to_vec())
}

/// Get the image cache directory
/// Returns ~/.cache/scene-player/images on Linux
pub fn image_cache_dir() -> Option<PathBuf> {
    let mut path = dirs::cache_dir().or_else(dirs::home_dir)?;
    path.push("scene-player");
    path.push("images");
    Some(path)
}

/// Cache file for a logical image name
fn cached_image_path(name: &str) -> Option<PathBuf> {
    Some(image_cache_dir()?.join(format!("{}.img", name)))
}

async fn read_cached(name: &str) -> Option<Vec<u8>> {
    let path = cached_image_path(name)?;
    tokio::fs::read(&path).await.ok()
}

/// Best effort: a failed cache write only costs the next session a fetch
async fn write_cache(name: &str, bytes: &[u8]) {
    let Some(path) = cached_image_path(name) else {
        return;
    };
    if let Some(parent) = path.parent() {
        if tokio::fs::create_dir_all(parent).await.is_err() {
            return;
        }
    }
    if let Err(e) = tokio::fs::write(&path, bytes).await {
        eprintln!("⚠️  Could not cache image {}: {}", name, e);
    }
}

/// Fetch and decode one remote image. `use_cache` is true only for the
/// first attempt; retry attempts carry a cache-busted URL and must hit
/// the network.
pub async fn load_image(
    client: reqwest::Client,
    name: String,
    url: String,
    use_cache: bool,
) -> Result<Loaded, String> {
    if use_cache {
        if let Some(bytes) = read_cached(&name).await {
            // A corrupt cache entry falls through to the network
            if let Ok(loaded) = decode_off_thread(bytes).await {
                return Ok(loaded);
            }
        }
    }

    let bytes = fetch_bytes(&client, &url).await.map_err(|e| e.to_string())?;
    let loaded = decode_off_thread(bytes.clone()).await?;
    write_cache(&name, &bytes).await;
    Ok(loaded)
}

/// Image decoding and blurring are CPU-bound; keep them off the UI path
async fn decode_off_thread(bytes: Vec<u8>) -> Result<Loaded, String> {
    tokio::task::spawn_blocking(move || images::decode_with_placeholder(bytes))
        .await
        .map_err(|e| format!("Decode task failed: {}", e))?
}

/// Fetch one playlist or soundtrack source
pub async fn fetch_audio(client: reqwest::Client, url: String) -> Result<Vec<u8>, String> {
    fetch_bytes(&client, &url).await.map_err(|e| e.to_string())
}

/// Narrative text provider. Always resolves: any failure, an empty body,
/// or an unset endpoint yields the fixed fallback line.
pub async fn fetch_narrative(client: reqwest::Client) -> String {
    let Ok(url) = std::env::var(NARRATIVE_URL_VAR) else {
        return FALLBACK_NARRATIVE.to_string();
    };

    let text = async {
        let response = client.get(&url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        response.text().await.ok()
    }
    .await;

    match text {
        Some(body) => {
            let line = body.trim();
            if line.is_empty() {
                FALLBACK_NARRATIVE.to_string()
            } else {
                line.to_string()
            }
        }
        None => FALLBACK_NARRATIVE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn test_cached_image_path_uses_logical_name() {
        if let Some(path) = cached_image_path("finale_background") {
            assert!(path.ends_with("scene-player/images/finale_background.img"));
        }
    }

    #[test]
    fn test_narrative_always_resolves_to_fallback() {
        // One test covers both paths so the env var is never mutated
        // concurrently: no endpoint configured, then an unreachable one.
        std::env::remove_var(NARRATIVE_URL_VAR);
        let narrative = runtime().block_on(fetch_narrative(client()));
        assert_eq!(narrative, FALLBACK_NARRATIVE);

        std::env::set_var(NARRATIVE_URL_VAR, "http://127.0.0.1:1/nothing");
        let narrative = runtime().block_on(fetch_narrative(client()));
        std::env::remove_var(NARRATIVE_URL_VAR);
        assert_eq!(narrative, FALLBACK_NARRATIVE);
    }

    #[test]
    fn test_fetch_bytes_reports_unreachable_host() {
        let result = runtime().block_on(fetch_bytes(&client(), "http://127.0.0.1:1/x"));
        assert!(matches!(result, Err(FetchError::Request(_))));
    }
}
