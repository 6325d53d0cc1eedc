//! Request/response shapes for the generative-AI collaborator
//!
//! Field names are camelCase on the wire; the prompts in
//! [`crate::oracle::client`] spell out the exact keys the model must emit.

use serde::{Deserialize, Serialize};

/// Care profile returned by identification and name lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantRecord {
    pub name: String,
    pub life_span: String,
    pub seasonal_info: String,
    pub useful_info: String,
    pub environment: String,
    pub watering_frequency: String,
    /// Visual description for the image model; identification replies omit it.
    #[serde(default)]
    pub image_prompt: Option<String>,
}

/// One entry of a personalized recommendation list. `is_safe` and
/// `safety_explanation` carry the oracle's cross-verification against the
/// user's medical condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedPlant {
    pub name: String,
    pub life_span: String,
    pub seasonal_info: String,
    pub useful_info: String,
    pub environment: String,
    pub watering_frequency: String,
    pub image_prompt: String,
    pub is_safe: bool,
    pub safety_explanation: String,
}

/// A plant the user should avoid, with the condition-specific reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsafePlant {
    pub name: String,
    #[serde(default)]
    pub common_names: Vec<String>,
    pub reason: String,
}

/// Encyclopedia lookup result: a Markdown entry plus an image description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncyclopediaEntry {
    pub description: String,
    pub image_prompt: String,
}

/// Completed preference-wizard answers forwarded to the recommendation query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub plant_type: String,
    pub flowering: String,
    pub size: String,
}

/// Speaker of one chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

/// One turn of the AI guide conversation.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plant_record_parses_camel_case() {
        let json = r#"{
            "name": "Tulsi",
            "lifeSpan": "Perennial",
            "seasonalInfo": "Flowers in summer",
            "usefulInfo": "Medicinal herb",
            "environment": "Full sun",
            "wateringFrequency": "Every 2-3 days"
        }"#;
        let record: PlantRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "Tulsi");
        assert_eq!(record.watering_frequency, "Every 2-3 days");
        assert!(record.image_prompt.is_none());
    }

    #[test]
    fn test_unsafe_plant_tolerates_missing_common_names() {
        let json = r#"{"name": "Oleander", "reason": "Toxic if ingested"}"#;
        let plant: UnsafePlant = serde_json::from_str(json).unwrap();
        assert!(plant.common_names.is_empty());
    }

    #[test]
    fn test_recommended_plant_parses() {
        let json = r#"{
            "name": "Snake Plant",
            "lifeSpan": "5-10 years",
            "seasonalInfo": "Rarely flowers indoors",
            "usefulInfo": "Air purifying",
            "environment": "Tolerates low light",
            "wateringFrequency": "Every 2 weeks",
            "imagePrompt": "A tall snake plant with banded leaves",
            "isSafe": true,
            "safetyExplanation": "No airborne allergens; mildly toxic to pets if chewed."
        }"#;
        let plant: RecommendedPlant = serde_json::from_str(json).unwrap();
        assert!(plant.is_safe);
        assert_eq!(plant.image_prompt, "A tall snake plant with banded leaves");
    }
}
