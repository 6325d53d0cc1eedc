//! Oracle client
//!
//! Thin request/response layer over the hosted AI service. Builds prompts,
//! enforces a timeout, and parses strict-JSON replies; it never retries.
//! Callers surface failures as retryable user-facing messages; nothing
//! here panics on a malformed payload.
//!
//! - **Version**: 1.3.0
//! - **Since**: 0.4.0
//!
//! ## Changelog
//! - 1.3.0: Route recommendation and safety queries to the research model
//! - 1.2.0: Vision request for photo identification
//! - 1.1.0: Strict-JSON prompts with fence-tolerant parsing
//! - 1.0.0: Initial chat-completion integration

use anyhow::{anyhow, Context as _, Result};
use async_trait::async_trait;
use log::debug;
use openai::chat::{ChatCompletion, ChatCompletionMessage, ChatCompletionMessageRole};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::timeout;
use uuid::Uuid;

use crate::core::response::{extract_json, preview};
use crate::oracle::types::{
    ChatRole, ChatTurn, EncyclopediaEntry, PlantRecord, Preferences, RecommendedPlant, UnsafePlant,
};

/// Hard cap on any single completion call.
const ORACLE_TIMEOUT: Duration = Duration::from_secs(45);

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The seam between Botanica and the generative-AI backend.
///
/// Implemented by [`OracleClient`] in production; tests substitute a fake.
#[async_trait]
pub trait PlantOracle: Send + Sync {
    /// Identify a plant from a JPEG photo (base64-encoded bytes).
    async fn identify_plant(&self, image_base64: &str) -> Result<PlantRecord>;

    /// Full care profile for a named plant, including an image description.
    async fn plant_info_by_name(&self, name: &str) -> Result<PlantRecord>;

    /// Up to five personalized, safety-verified recommendations.
    async fn recommendations(
        &self,
        condition: &str,
        preferences: &Preferences,
    ) -> Result<Vec<RecommendedPlant>>;

    /// Encyclopedia entry for a plant or botanical term.
    async fn encyclopedia_entry(&self, query: &str) -> Result<EncyclopediaEntry>;

    /// Plants to avoid for the given condition, optionally filtered.
    async fn unsafe_plants(&self, condition: &str, query: Option<&str>)
        -> Result<Vec<UnsafePlant>>;

    /// Short encouraging gardening tip for the given condition.
    async fn health_tip(&self, condition: &str) -> Result<String>;

    /// One reply in the AI guide conversation. `history` includes the
    /// latest user turn.
    async fn guide_reply(&self, system_prompt: &str, history: &[ChatTurn]) -> Result<String>;
}

/// Production oracle over the OpenAI-compatible chat and vision APIs.
#[derive(Clone)]
pub struct OracleClient {
    model: String,
    research_model: String,
    http: reqwest::Client,
    api_key: String,
}

impl OracleClient {
    pub fn new(api_key: String, model: String, research_model: String) -> Self {
        Self {
            model,
            research_model,
            http: reqwest::Client::new(),
            api_key,
        }
    }

    /// Get a completion for a single-turn prompt.
    ///
    /// This is the core AI integration: every text operation below funnels
    /// through here or [`Self::complete_with_history`].
    async fn complete(&self, model: &str, system_prompt: &str, user_message: &str) -> Result<String> {
        self.complete_with_history(model, system_prompt, &[], user_message)
            .await
    }

    async fn complete_with_history(
        &self,
        model: &str,
        system_prompt: &str,
        history: &[ChatTurn],
        user_message: &str,
    ) -> Result<String> {
        let request_id = Uuid::new_v4();
        debug!(
            "[{request_id}] Building oracle request with {} history turns",
            history.len()
        );

        let mut messages = vec![ChatCompletionMessage {
            role: ChatCompletionMessageRole::System,
            content: Some(system_prompt.to_string()),
            name: None,
            function_call: None,
            tool_call_id: None,
            tool_calls: None,
        }];

        for turn in history {
            let role = match turn.role {
                ChatRole::User => ChatCompletionMessageRole::User,
                ChatRole::Model => ChatCompletionMessageRole::Assistant,
            };
            messages.push(ChatCompletionMessage {
                role,
                content: Some(turn.text.clone()),
                name: None,
                function_call: None,
                tool_call_id: None,
                tool_calls: None,
            });
        }

        messages.push(ChatCompletionMessage {
            role: ChatCompletionMessageRole::User,
            content: Some(user_message.to_string()),
            name: None,
            function_call: None,
            tool_call_id: None,
            tool_calls: None,
        });

        debug!("[{request_id}] Sending {} messages to the oracle", messages.len());

        let completion = timeout(
            ORACLE_TIMEOUT,
            ChatCompletion::builder(model, messages).create(),
        )
        .await
        .map_err(|_| {
            anyhow!(
                "Oracle request timed out after {} seconds",
                ORACLE_TIMEOUT.as_secs()
            )
        })??;

        let response = completion
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default()
            .trim()
            .to_string();

        debug!("[{request_id}] Got response: {} chars", response.len());

        Ok(response)
    }

    /// Vision request: a text prompt plus an inline JPEG, JSON reply.
    ///
    /// The `openai` crate's message type is text-only, so this goes over
    /// reqwest with the multi-part content form directly.
    async fn complete_with_image(&self, prompt: &str, image_base64: &str) -> Result<String> {
        let request_id = Uuid::new_v4();
        debug!("[{request_id}] Building vision request ({} b64 chars)", image_base64.len());

        let body = serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": prompt},
                    {"type": "image_url", "image_url": {
                        "url": format!("data:image/jpeg;base64,{image_base64}")
                    }}
                ]
            }],
            "response_format": {"type": "json_object"}
        });

        let response = timeout(
            ORACLE_TIMEOUT,
            self.http
                .post(CHAT_COMPLETIONS_URL)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send(),
        )
        .await
        .map_err(|_| {
            anyhow!(
                "Oracle request timed out after {} seconds",
                ORACLE_TIMEOUT.as_secs()
            )
        })?
        .context("vision request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Oracle returned HTTP {status}"));
        }

        let payload: serde_json::Value = response.json().await?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow!("Oracle reply had no content"))?;

        debug!("[{request_id}] Got vision response: {} chars", content.len());

        Ok(content.to_string())
    }

    /// Parse a strict-JSON oracle reply, tolerating Markdown fences.
    fn parse_payload<T: DeserializeOwned>(reply: &str) -> Result<T> {
        serde_json::from_str(extract_json(reply)).with_context(|| {
            format!("oracle returned a malformed payload: {}", preview(reply))
        })
    }
}

// Prompt builders. These reproduce the intent of the original service
// prompts; the JSON key contracts match the serde shapes in `types`.

const BOTANICAL_EXPERT: &str = "You are a botanical expert.";

fn identify_prompt() -> String {
    format!(
        "{BOTANICAL_EXPERT} Based on the provided image of a plant, identify it and provide \
         its common name, typical lifespan, seasonal information (flowers/fruits), practical \
         uses (including toxicity warnings), ideal environment, and watering frequency. \
         Reply with a single JSON object with exactly these string keys: \
         \"name\", \"lifeSpan\", \"seasonalInfo\", \"usefulInfo\", \"environment\", \
         \"wateringFrequency\"."
    )
}

fn info_by_name_prompt(plant_name: &str) -> String {
    format!(
        "For the plant named \"{plant_name}\", provide its common name, \
         typical lifespan, seasonal information (flowers/fruits), practical uses (including \
         toxicity warnings), ideal environment, and watering frequency. Also provide a \
         detailed visual description of a single, healthy plant on a plain background, \
         suitable for an image generation model. Reply with a single JSON object with \
         exactly these string keys: \"name\", \"lifeSpan\", \"seasonalInfo\", \"usefulInfo\", \
         \"environment\", \"wateringFrequency\", \"imagePrompt\"."
    )
}

fn recommendations_prompt(condition: &str, preferences: &Preferences) -> String {
    format!(
        "A user with \"{condition}\" is looking for a plant with these traits:\n\
         - Type: {}\n- Flowering: {}\n- Size: {}\n\n\
         Recommend up to 5 plants that fit these criteria. Crucially, the recommendations \
         should be plants that are very common and well-known in India, or are globally \
         recognized household plants (like Snake Plant, Spider Plant, etc.). Prioritize \
         plants that an average person in India would likely recognize (e.g., Tulsi, \
         Marigold, Aloe Vera).\n\
         The most important step is safety verification. Cross-verify each recommendation \
         with the user's condition (\"{condition}\"): 'isSafe' must be true only if the \
         plant is broadly considered safe for that condition, and 'safetyExplanation' must \
         detail any potential risks (allergens, toxins, physical challenges like thorns) \
         or confirm its safety. If there are known risks, 'isSafe' must be false. \
         Prioritize safety above all. In 'usefulInfo', also briefly mention any specific \
         benefits for a user with this condition.\n\
         Reply with a JSON array of objects, each with keys \"name\", \"lifeSpan\", \
         \"seasonalInfo\", \"usefulInfo\", \"environment\", \"wateringFrequency\", \
         \"imagePrompt\" (a detailed visual description for an image generation model), \
         \"isSafe\" (boolean), and \"safetyExplanation\".",
        preferences.plant_type, preferences.flowering, preferences.size
    )
}

const ENCYCLOPEDIA_ROLE: &str = "You are a comprehensive botanical encyclopedia.";

const SAFETY_ROLE: &str = "You are a toxicologist and botanist specializing in plant safety \
                           for individuals with medical conditions.";

fn encyclopedia_prompt(query: &str) -> String {
    format!(
        "The user wants to know about \
         \"{query}\". Provide a detailed description. If it's a specific plant, detail \
         each part (roots, stem, leaves, flowers, fruits, seeds), its life cycle, uses, \
         care, and any warnings in a dedicated 'Warnings' section. If it's a botanical \
         term (like 'photosynthesis'), explain it clearly. Format the description using \
         Markdown with headings for different sections. Reply with a single JSON object \
         with string keys \"description\" (the full Markdown entry) and \"imagePrompt\" \
         (a detailed visual description of the plant, or a concept representing the term, \
         for an image generation model)."
    )
}

fn unsafe_plants_prompt(condition: &str, query: Option<&str>) -> String {
    let filter = match query {
        Some(query) => {
            format!(" The user is specifically searching for \"{query}\", so filter the list to plants matching that term.")
        }
        None => String::new(),
    };
    format!(
        "A user with \"{condition}\" is asking for a list of \
         plants they should avoid worldwide.{filter} For each plant, provide its primary \
         common name, an array of other common names, and a detailed but easy-to-understand \
         reason why it is unsafe for someone with their condition (e.g., allergenic pollen, \
         toxic if ingested, sharp thorns posing a risk for those with mobility issues). \
         Provide a comprehensive list if no search query is given. Reply with a JSON array \
         of objects, each with keys \"name\" (string), \"commonNames\" (array of strings), \
         and \"reason\" (string)."
    )
}

fn health_tip_prompt(condition: &str) -> String {
    format!(
        "Provide a short, positive, and encouraging gardening-related health tip for \
         someone with \"{condition}\". The tip should be about how gardening can be \
         beneficial. Keep it under 50 words. Reply with the tip as plain text only."
    )
}

#[async_trait]
impl PlantOracle for OracleClient {
    async fn identify_plant(&self, image_base64: &str) -> Result<PlantRecord> {
        let reply = self
            .complete_with_image(&identify_prompt(), image_base64)
            .await?;
        Self::parse_payload(&reply)
    }

    async fn plant_info_by_name(&self, name: &str) -> Result<PlantRecord> {
        let reply = self
            .complete(&self.model, BOTANICAL_EXPERT, &info_by_name_prompt(name))
            .await?;
        Self::parse_payload(&reply)
    }

    async fn recommendations(
        &self,
        condition: &str,
        preferences: &Preferences,
    ) -> Result<Vec<RecommendedPlant>> {
        let reply = self
            .complete(
                &self.research_model,
                BOTANICAL_EXPERT,
                &recommendations_prompt(condition, preferences),
            )
            .await?;
        Self::parse_payload(&reply)
    }

    async fn encyclopedia_entry(&self, query: &str) -> Result<EncyclopediaEntry> {
        let reply = self
            .complete(&self.model, ENCYCLOPEDIA_ROLE, &encyclopedia_prompt(query))
            .await?;
        Self::parse_payload(&reply)
    }

    async fn unsafe_plants(
        &self,
        condition: &str,
        query: Option<&str>,
    ) -> Result<Vec<UnsafePlant>> {
        let reply = self
            .complete(
                &self.research_model,
                SAFETY_ROLE,
                &unsafe_plants_prompt(condition, query),
            )
            .await?;
        Self::parse_payload(&reply)
    }

    async fn health_tip(&self, condition: &str) -> Result<String> {
        let tip = self
            .complete(
                &self.model,
                "You are a friendly gardening companion.",
                &health_tip_prompt(condition),
            )
            .await?;
        if tip.is_empty() {
            return Err(anyhow!("Oracle returned an empty tip"));
        }
        Ok(tip)
    }

    async fn guide_reply(&self, system_prompt: &str, history: &[ChatTurn]) -> Result<String> {
        let (latest, earlier) = history
            .split_last()
            .ok_or_else(|| anyhow!("guide history is empty"))?;
        self.complete_with_history(&self.model, system_prompt, earlier, &latest.text)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payload_record() {
        let reply = r#"```json
        {"name": "Aloe Vera", "lifeSpan": "5-25 years", "seasonalInfo": "Summer blooms",
         "usefulInfo": "Soothing gel", "environment": "Bright light",
         "wateringFrequency": "Every 3 weeks"}
        ```"#;
        let record: PlantRecord = OracleClient::parse_payload(reply).unwrap();
        assert_eq!(record.name, "Aloe Vera");
    }

    #[test]
    fn test_parse_payload_malformed_is_error() {
        let result: Result<PlantRecord> = OracleClient::parse_payload("I cannot help with that.");
        assert!(result.is_err());
    }

    #[test]
    fn test_unsafe_plants_prompt_includes_filter() {
        let with_query = unsafe_plants_prompt("asthma", Some("lily"));
        assert!(with_query.contains("\"lily\""));

        let without_query = unsafe_plants_prompt("asthma", None);
        assert!(!without_query.contains("specifically searching"));
    }

    #[test]
    fn test_recommendations_prompt_carries_preferences() {
        let preferences = Preferences {
            plant_type: "Herb".to_string(),
            flowering: "Flowering".to_string(),
            size: "Small (Desktop)".to_string(),
        };
        let prompt = recommendations_prompt("arthritis", &preferences);
        assert!(prompt.contains("Type: Herb"));
        assert!(prompt.contains("Size: Small (Desktop)"));
        assert!(prompt.contains("\"arthritis\""));
    }
}
