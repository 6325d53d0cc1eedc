//! Plant portrait generator
//!
//! Calls the hosted image API, downloads the result, and files it under the
//! data directory. Image failures are always recoverable for callers: the
//! text content they already hold is kept and shown without a portrait.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.5.0
//!
//! ## Changelog
//! - 1.1.0: Store downloaded portraits in the snapshot store's image cache
//! - 1.0.0: Initial generation with URL download

use anyhow::{anyhow, Context as _, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

use crate::core::response::preview;
use crate::storage::SnapshotStore;

const IMAGES_URL: &str = "https://api.openai.com/v1/images/generations";
const IMAGE_MODEL: &str = "dall-e-3";

/// Generation regularly takes 10-30 seconds; downloads are bounded by the
/// shared client timeout.
const HTTP_TIMEOUT: Duration = Duration::from_secs(90);

/// A generated image, not yet downloaded. The API may rewrite the prompt;
/// the revised form is kept for display.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub url: String,
    pub revised_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    data: Vec<GenerationEntry>,
}

#[derive(Debug, Deserialize)]
struct GenerationEntry {
    url: String,
    revised_prompt: Option<String>,
}

/// Client for the image API plus the local portrait cache.
#[derive(Clone)]
pub struct ImageGenerator {
    http: reqwest::Client,
    api_key: String,
    store: SnapshotStore,
}

impl ImageGenerator {
    pub fn new(api_key: String, store: SnapshotStore) -> Self {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_key,
            store,
        }
    }

    /// Request one square image for the prompt.
    pub async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage> {
        debug!("Generating image | Prompt: '{}'", preview(prompt));

        let body = serde_json::json!({
            "model": IMAGE_MODEL,
            "prompt": prompt,
            "n": 1,
            "size": "1024x1024"
        });

        let response = self
            .http
            .post(IMAGES_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("image generation request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "image generation returned HTTP {status}: {}",
                preview(&detail)
            ));
        }

        let payload: GenerationResponse = response.json().await?;
        let entry = payload
            .data
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("image generation returned no data"))?;

        Ok(GeneratedImage {
            url: entry.url,
            revised_prompt: entry.revised_prompt,
        })
    }

    /// Download a generated image's bytes.
    pub async fn download_image(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("image download failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("image download returned HTTP {status}"));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            warn!("Downloaded image is empty (0 bytes)");
        }
        Ok(bytes.to_vec())
    }

    /// File image bytes into the portrait cache under a name derived from
    /// the plant, returning the stored path.
    pub fn save_plant_image(&self, plant_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let filename = format!(
            "{}-{}.png",
            sanitize_filename(plant_name),
            Uuid::new_v4().simple()
        );
        self.store.save_image(&filename, bytes)
    }

    /// Generate, download, and store a portrait in one step, returning the
    /// stored path as a display reference.
    pub async fn fetch_plant_image(&self, plant_name: &str, prompt: &str) -> Result<String> {
        let generated = self.generate_image(prompt).await?;
        let bytes = self.download_image(&generated.url).await?;
        let path = self.save_plant_image(plant_name, &bytes)?;
        debug!(
            "Stored portrait for {plant_name} | {} bytes | {}",
            bytes.len(),
            path.display()
        );
        Ok(path.to_string_lossy().into_owned())
    }
}

/// Studio-photo framing applied to every plant portrait prompt.
pub fn frame_prompt(subject: &str) -> String {
    format!(
        "A vibrant, clear photograph of a healthy {subject}, in a simple pot, \
         studio lighting, on a pure white background."
    )
}

/// Framing for encyclopedia illustrations, which may depict a concept
/// (photosynthesis, a root system) rather than a potted plant.
pub fn representation_prompt(subject: &str) -> String {
    format!(
        "A vibrant, clear photograph representing: {subject}. Studio lighting, \
         on a pure white background."
    )
}

/// Sanitize a string for use as a filename.
///
/// Keeps only alphanumeric characters, spaces, hyphens, underscores, and
/// dots. Replaces spaces with underscores and lowercases. Truncates to 50
/// characters.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_' || *c == '.')
        .take(50)
        .collect::<String>()
        .trim()
        .replace(' ', "_")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_prompt_wraps_subject() {
        let prompt = frame_prompt("Tulsi with oval green leaves");
        assert!(prompt.contains("Tulsi with oval green leaves"));
        assert!(prompt.contains("pure white background"));
    }

    #[test]
    fn test_sanitize_filename_basic() {
        assert_eq!(sanitize_filename("Hybrid Tea Rose"), "hybrid_tea_rose");
    }

    #[test]
    fn test_sanitize_filename_special_chars() {
        assert_eq!(sanitize_filename("rose<>:\"/\\|?*.png"), "rose.png");
    }

    #[test]
    fn test_sanitize_filename_truncates() {
        let long = "a".repeat(100);
        assert!(sanitize_filename(&long).len() <= 50);
    }

    #[test]
    fn test_generation_response_parses() {
        let json = r#"{"data": [{"url": "https://img.example/1.png",
                                  "revised_prompt": "A healthy rose"}]}"#;
        let payload: GenerationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.data[0].url, "https://img.example/1.png");
        assert_eq!(payload.data[0].revised_prompt.as_deref(), Some("A healthy rose"));
    }
}
