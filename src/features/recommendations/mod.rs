//! # Recommendations Feature
//!
//! Three-step preference wizard plus a slot list that fills in portraits as
//! they arrive. Each slot's image resolves independently and in any order;
//! correctness never depends on completion order.
//!
//! - **Version**: 1.3.0
//! - **Since**: 0.6.0
//!
//! ## Changelog
//! - 1.3.0: Index-addressed slot resolution for out-of-order completions
//! - 1.2.0: Safety verdicts carried onto garden candidates
//! - 1.0.0: Initial wizard and fetch

use anyhow::Result;
use log::{debug, warn};
use uuid::Uuid;

use crate::core::error::WizardError;
use crate::features::garden::Plant;
use crate::features::image_gen::{frame_prompt, ImageGenerator};
use crate::oracle::{PlantOracle, Preferences, RecommendedPlant};

/// Plant-type choices offered by the first wizard step.
pub const TYPE_CHOICES: &[&str] = &["Flower", "Fruit", "Leaf", "Succulent", "Herb"];

/// Flowering choices offered by the second step.
pub const FLOWERING_CHOICES: &[&str] = &["Flowering", "Non-flowering"];

/// Size choices offered by the second step.
pub const SIZE_CHOICES: &[&str] = &["Small (Desktop)", "Medium (Floor)", "Large (Outdoor)"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Type,
    Details,
    Results,
}

/// Preference wizard state machine. Advancing with an incomplete step is
/// rejected at the intent boundary and the step does not change.
#[derive(Debug, Default)]
pub struct RecommendationWizard {
    preferences: Preferences,
    details_done: bool,
}

impl RecommendationWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        if self.preferences.plant_type.is_empty() {
            WizardStep::Type
        } else if !self.details_done {
            WizardStep::Details
        } else {
            WizardStep::Results
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn choose_type(&mut self, plant_type: &str) {
        self.preferences.plant_type = plant_type.to_string();
    }

    pub fn choose_flowering(&mut self, flowering: &str) {
        self.preferences.flowering = flowering.to_string();
    }

    pub fn choose_size(&mut self, size: &str) {
        self.preferences.size = size.to_string();
    }

    /// Advance past the current step once its choices are complete.
    pub fn next(&mut self) -> Result<(), WizardError> {
        match self.step() {
            WizardStep::Type => {
                // Reached only while plant_type is still empty.
                Err(WizardError::IncompleteStep)
            }
            WizardStep::Details => {
                if self.preferences.flowering.is_empty() || self.preferences.size.is_empty() {
                    return Err(WizardError::IncompleteStep);
                }
                self.details_done = true;
                Ok(())
            }
            WizardStep::Results => Ok(()),
        }
    }

    /// Start over with empty preferences.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Image state of one recommendation slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotImage {
    Pending,
    Ready(String),
    Failed,
}

/// One recommended plant and its independently-resolving portrait.
#[derive(Debug, Clone)]
pub struct RecommendationSlot {
    pub plant: Plant,
    pub image: SlotImage,
}

/// Ordered recommendation list whose portraits fill in as they complete.
#[derive(Debug, Default)]
pub struct RecommendationSet {
    slots: Vec<RecommendationSlot>,
}

impl RecommendationSet {
    pub fn new(records: Vec<RecommendedPlant>) -> Self {
        let slots = records
            .into_iter()
            .map(|record| RecommendationSlot {
                plant: Plant {
                    id: Uuid::new_v4().to_string(),
                    name: record.name,
                    nickname: None,
                    life_span: record.life_span,
                    seasonal_info: record.seasonal_info,
                    useful_info: record.useful_info,
                    environment: record.environment,
                    watering_frequency: record.watering_frequency,
                    image_ref: String::new(),
                    image_prompt: Some(record.image_prompt),
                    is_safe: Some(record.is_safe),
                    safety_explanation: Some(record.safety_explanation),
                },
                image: SlotImage::Pending,
            })
            .collect();
        Self { slots }
    }

    /// Record one portrait outcome by slot index. Indices outside the list
    /// are ignored; completions may land in any order.
    pub fn resolve_image(&mut self, index: usize, outcome: Result<String>) {
        let Some(slot) = self.slots.get_mut(index) else {
            debug!("Ignoring image for out-of-range slot {index}");
            return;
        };
        match outcome {
            Ok(image_ref) => {
                slot.plant.image_ref = image_ref.clone();
                slot.image = SlotImage::Ready(image_ref);
            }
            Err(e) => {
                warn!("Portrait failed for {}: {e:#}", slot.plant.name);
                slot.image = SlotImage::Failed;
            }
        }
    }

    pub fn slots(&self) -> &[RecommendationSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// True once no slot is still pending.
    pub fn is_settled(&self) -> bool {
        self.slots.iter().all(|s| s.image != SlotImage::Pending)
    }
}

/// Fetch recommendations for the completed wizard preferences.
pub async fn fetch(
    oracle: &dyn PlantOracle,
    condition: &str,
    preferences: &Preferences,
) -> Result<RecommendationSet> {
    let records = oracle.recommendations(condition, preferences).await?;
    debug!("Oracle returned {} recommendations", records.len());
    Ok(RecommendationSet::new(records))
}

/// Resolve every pending portrait concurrently, merging results as each
/// task finishes regardless of order.
pub async fn resolve_images(set: &mut RecommendationSet, images: &ImageGenerator) {
    let mut tasks = tokio::task::JoinSet::new();
    for (index, slot) in set.slots().iter().enumerate() {
        if slot.image != SlotImage::Pending {
            continue;
        }
        let subject = slot
            .plant
            .image_prompt
            .clone()
            .unwrap_or_else(|| slot.plant.name.clone());
        let name = slot.plant.name.clone();
        let images = images.clone();
        tasks.spawn(async move {
            let outcome = images.fetch_plant_image(&name, &frame_prompt(&subject)).await;
            (index, outcome)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, outcome)) => set.resolve_image(index, outcome),
            Err(e) => warn!("Portrait task failed to join: {e}"),
        }
    }
}
