//! # Encyclopedia Feature
//!
//! Free-text botanical lookup: a Markdown entry plus a best-effort
//! illustration. Garden views hand off a plant name here for "learn more".
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.7.0

use anyhow::Result;
use log::warn;

use crate::features::image_gen::{representation_prompt, ImageGenerator};
use crate::oracle::PlantOracle;

/// A resolved encyclopedia lookup.
#[derive(Debug, Clone)]
pub struct EncyclopediaPage {
    pub query: String,
    /// Markdown with section headings (Care, Uses, Warnings, ...).
    pub description: String,
    /// Stored illustration path; `None` when generation failed.
    pub image_ref: Option<String>,
}

/// Look up a plant or botanical term.
///
/// The entry failing is an error; the illustration failing is not: the
/// page is returned with the text that already arrived.
pub async fn lookup(
    oracle: &dyn PlantOracle,
    images: &ImageGenerator,
    query: &str,
) -> Result<EncyclopediaPage> {
    let entry = oracle.encyclopedia_entry(query).await?;

    let image_ref = match images
        .fetch_plant_image(query, &representation_prompt(&entry.image_prompt))
        .await
    {
        Ok(image_ref) => Some(image_ref),
        Err(e) => {
            warn!("Failed to illustrate '{query}': {e:#}");
            None
        }
    };

    Ok(EncyclopediaPage {
        query: query.to_string(),
        description: entry.description,
        image_ref,
    })
}
