//! # AI Guide Feature
//!
//! Conversational gardening assistant. The chat session owns the running
//! history; the oracle stays stateless and receives the full transcript on
//! every turn.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.9.0
//!
//! ## Changelog
//! - 1.1.0: Keep the user turn in history when a reply fails
//! - 1.0.0: Initial guided chat with app feature map

use anyhow::{bail, Result};
use std::sync::Arc;

use crate::features::auth::User;
use crate::oracle::{ChatTurn, PlantOracle};

/// System instruction: user context plus a map of the app so the guide can
/// point at the right view.
fn system_instruction(user: &User) -> String {
    let condition = if user.medical_condition.is_empty() {
        "Not specified"
    } else {
        &user.medical_condition
    };
    format!(
        "You are Botanica AI Guide, a friendly and expert gardening assistant.\n\
         Your goal is to help the user with their gardening questions and guide them \
         through the Botanica app.\n\n\
         User Details:\n\
         - Username: {}\n\
         - Medical Condition: {condition}\n\n\
         Botanica App Features:\n\
         - Dashboard: The main screen with an overview.\n\
         - My Garden: Where users add and view their plants.\n\
         - Reminders: To set watering or care notifications.\n\
         - For You (Recommendations): Personalized plant suggestions.\n\
         - Discover (Encyclopedia): A search tool for any botanical term or plant.\n\
         - Warnings: Lists plants to be cautious about based on the user's condition.\n\n\
         Your tasks:\n\
         1. Answer gardening questions (e.g., soil types, planting times, pest control). \
         If the user asks for weather-related or seasonal advice, be sure to ask for \
         their location first.\n\
         2. Guide the user on how to use the app's features. For example, if they ask \
         \"how to add a plant?\", tell them to go to the \"My Garden\" tab.\n\
         3. Be conversational, encouraging, and clear in your responses. Keep answers \
         concise and easy to understand.",
        user.username
    )
}

fn greeting(user: &User) -> String {
    format!(
        "Hello {}! I'm your AI Guide. I can help you with gardening questions about \
         soil, weather, or how to use the Botanica app. What's on your mind?",
        user.username
    )
}

/// One AI guide conversation.
pub struct GuideChat {
    oracle: Arc<dyn PlantOracle>,
    system_prompt: String,
    history: Vec<ChatTurn>,
}

impl GuideChat {
    /// Start a session seeded with the guide's greeting.
    pub fn start(oracle: Arc<dyn PlantOracle>, user: &User) -> Self {
        Self {
            oracle,
            system_prompt: system_instruction(user),
            history: vec![ChatTurn::model(greeting(user))],
        }
    }

    /// Send one message and return the reply.
    ///
    /// The user turn stays in the history even when the oracle call fails,
    /// so the transcript reflects what the user actually said; the view
    /// renders its own apology line for the failed reply.
    pub async fn send(&mut self, text: &str) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            bail!("message must not be empty");
        }

        self.history.push(ChatTurn::user(text));
        let reply = self
            .oracle
            .guide_reply(&self.system_prompt, &self.history)
            .await?;
        self.history.push(ChatTurn::model(reply.clone()));
        Ok(reply)
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }
}
