//! # My Garden Feature
//!
//! Personal plant collection with add-by-photo and add-by-name flows. Both
//! flows produce a candidate [`Plant`] the user confirms (optionally with a
//! nickname) before it is inserted into the [`GardenStore`].
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Keep text info when portrait generation fails in the name flow
//! - 1.1.0: Add-by-name lookup with generated portrait
//! - 1.0.0: Initial photo identification and collection

pub mod store;

pub use store::GardenStore;

use anyhow::Result;
use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::features::image_gen::{frame_prompt, ImageGenerator};
use crate::oracle::{PlantOracle, PlantRecord};

/// A plant in the user's garden. Fields are fixed at insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    pub life_span: String,
    pub seasonal_info: String,
    pub useful_info: String,
    pub environment: String,
    pub watering_frequency: String,
    /// Stored portrait path (or source photo path); empty while unresolved.
    #[serde(default)]
    pub image_ref: String,
    #[serde(default)]
    pub image_prompt: Option<String>,
    #[serde(default)]
    pub is_safe: Option<bool>,
    #[serde(default)]
    pub safety_explanation: Option<String>,
}

impl Plant {
    /// Build a plant from an oracle care profile.
    pub fn from_record(record: PlantRecord, image_ref: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: record.name,
            nickname: None,
            life_span: record.life_span,
            seasonal_info: record.seasonal_info,
            useful_info: record.useful_info,
            environment: record.environment,
            watering_frequency: record.watering_frequency,
            image_ref,
            image_prompt: record.image_prompt,
            is_safe: None,
            safety_explanation: None,
        }
    }

    /// Display name used in lists and reminder snapshots:
    /// "nickname (species)" when a nickname is set, otherwise the species.
    pub fn display_name(&self) -> String {
        match &self.nickname {
            Some(nickname) if !nickname.is_empty() => format!("{nickname} ({})", self.name),
            _ => self.name.clone(),
        }
    }
}

/// Identify a plant from a photo. `image_ref` is the user's own photo path,
/// reused as the candidate's display image.
pub async fn identify_candidate(
    oracle: &dyn PlantOracle,
    image_base64: &str,
    image_ref: String,
) -> Result<Plant> {
    let record = oracle.identify_plant(image_base64).await?;
    Ok(Plant::from_record(record, image_ref))
}

/// Look up a plant by name and synthesize its portrait.
///
/// The lookup failing is an error; the portrait failing is not: the
/// candidate is returned with the text info it already has.
pub async fn candidate_by_name(
    oracle: &dyn PlantOracle,
    images: &ImageGenerator,
    name: &str,
) -> Result<Plant> {
    let record = oracle.plant_info_by_name(name).await?;
    let mut plant = Plant::from_record(record, String::new());

    let subject = plant.image_prompt.as_deref().unwrap_or(&plant.name);
    match images.fetch_plant_image(&plant.name, &frame_prompt(subject)).await {
        Ok(image_ref) => plant.image_ref = image_ref,
        Err(e) => warn!("Failed to generate portrait for {}: {e:#}", plant.name),
    }

    Ok(plant)
}
