//! Mascot image cache
//!
//! Fetches the configured mascot image once at startup and stores it in the
//! static directory. The tracker works fine without the image, so every
//! failure here is logged and swallowed.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;

/// File name the cached image is served under (`/static/mascot.webp`)
pub const MASCOT_FILE_NAME: &str = "mascot.webp";

/// Timeout for the image fetch
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum redirects to follow
const MAX_REDIRECTS: usize = 5;

/// Fetch and cache the mascot image, if one is configured.
///
/// Returns the cached path on success, `None` when no URL is configured or
/// the fetch failed. Never returns an error; startup must not depend on the
/// network.
pub async fn cache_mascot_image(config: &Config, static_dir: &Path) -> Option<PathBuf> {
    let url = match config.assets.mascot_url.as_deref() {
        Some(url) if !url.is_empty() => url,
        _ => {
            debug!("No mascot URL configured, skipping image cache");
            return None;
        }
    };

    match fetch_and_store(url, static_dir).await {
        Ok(path) => Some(path),
        Err(e) => {
            warn!("Failed to cache mascot image: {:#}", e);
            None
        }
    }
}

async fn fetch_and_store(raw_url: &str, static_dir: &Path) -> Result<PathBuf> {
    let parsed = url::Url::parse(raw_url).context("Invalid mascot URL")?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        bail!("URL scheme '{}' is not supported", scheme);
    }

    let target = static_dir.join(MASCOT_FILE_NAME);
    if target.exists() {
        info!("Mascot image already cached at {}", target.display());
        return Ok(target);
    }

    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .user_agent(format!(
            "pantry-budget/{} ({})",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS
        ))
        .build()
        .context("Failed to build HTTP client")?;

    let response = client
        .get(parsed)
        .send()
        .await
        .context("Failed to fetch mascot image")?;

    let status = response.status();
    if !status.is_success() {
        bail!("Image fetch returned status {}", status);
    }

    let bytes = response
        .bytes()
        .await
        .context("Failed to read image body")?;

    tokio::fs::write(&target, &bytes)
        .await
        .context("Failed to write cached image")?;

    info!(
        path = %target.display(),
        size = bytes.len(),
        "Mascot image cached"
    );

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssetsConfig;

    fn config_with_url(url: Option<&str>) -> Config {
        let mut config = Config::default();
        config.assets = AssetsConfig {
            mascot_url: url.map(|u| u.to_string()),
        };
        config
    }

    #[tokio::test]
    async fn skips_when_no_url_configured() {
        let dir = tempfile::tempdir().unwrap();

        let config = config_with_url(None);
        assert!(cache_mascot_image(&config, dir.path()).await.is_none());

        let config = config_with_url(Some(""));
        assert!(cache_mascot_image(&config, dir.path()).await.is_none());
    }

    #[tokio::test]
    async fn bad_url_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();

        let config = config_with_url(Some("not a url"));
        assert!(cache_mascot_image(&config, dir.path()).await.is_none());

        let config = config_with_url(Some("ftp://example.com/mascot.webp"));
        assert!(cache_mascot_image(&config, dir.path()).await.is_none());
    }

    #[tokio::test]
    async fn existing_file_is_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join(MASCOT_FILE_NAME);
        std::fs::write(&target, b"cached").unwrap();

        let config = config_with_url(Some("https://example.com/mascot.webp"));
        let path = cache_mascot_image(&config, dir.path()).await;

        assert_eq!(path.as_deref(), Some(target.as_path()));
        assert_eq!(std::fs::read(&target).unwrap(), b"cached");
    }
}
