//! # Dashboard Feature
//!
//! Overview assembly: a condition-aware health tip and the at-a-glance
//! summary (plant count, next reminder).
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.9.0

use log::warn;

use crate::features::auth::User;
use crate::features::garden::GardenStore;
use crate::features::reminders::Reminder;
use crate::oracle::PlantOracle;

/// Tip shown when the user has no recorded condition.
pub const DEFAULT_TIP: &str =
    "Caring for plants can be a wonderful and relaxing hobby. Enjoy your garden!";

/// Tip shown when the oracle is unavailable.
pub const FALLBACK_TIP: &str = "Could not load a tip right now, but remember that caring for \
                                plants is a great way to de-stress!";

/// Fetch the daily tip. Never fails: oracle trouble degrades to a fixed
/// encouragement line.
pub async fn health_tip(oracle: &dyn PlantOracle, user: &User) -> String {
    if user.medical_condition.trim().is_empty() {
        return DEFAULT_TIP.to_string();
    }
    match oracle.health_tip(&user.medical_condition).await {
        Ok(tip) => tip,
        Err(e) => {
            warn!("Failed to fetch health tip: {e:#}");
            FALLBACK_TIP.to_string()
        }
    }
}

/// The dashboard's at-a-glance numbers.
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub username: String,
    pub plant_count: usize,
    pub upcoming: Option<Reminder>,
}

pub fn summarize(user: &User, garden: &GardenStore, upcoming: Option<Reminder>) -> DashboardSummary {
    DashboardSummary {
        username: user.username.clone(),
        plant_count: garden.len(),
        upcoming,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::types::{
        ChatTurn, EncyclopediaEntry, PlantRecord, Preferences, RecommendedPlant, UnsafePlant,
    };
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    struct TipOracle {
        tip: Option<String>,
    }

    #[async_trait]
    impl PlantOracle for TipOracle {
        async fn identify_plant(&self, _image_base64: &str) -> Result<PlantRecord> {
            Err(anyhow!("not used"))
        }

        async fn plant_info_by_name(&self, _name: &str) -> Result<PlantRecord> {
            Err(anyhow!("not used"))
        }

        async fn recommendations(
            &self,
            _condition: &str,
            _preferences: &Preferences,
        ) -> Result<Vec<RecommendedPlant>> {
            Err(anyhow!("not used"))
        }

        async fn encyclopedia_entry(&self, _query: &str) -> Result<EncyclopediaEntry> {
            Err(anyhow!("not used"))
        }

        async fn unsafe_plants(
            &self,
            _condition: &str,
            _query: Option<&str>,
        ) -> Result<Vec<UnsafePlant>> {
            Err(anyhow!("not used"))
        }

        async fn health_tip(&self, _condition: &str) -> Result<String> {
            self.tip.clone().ok_or_else(|| anyhow!("oracle down"))
        }

        async fn guide_reply(&self, _system_prompt: &str, _history: &[ChatTurn]) -> Result<String> {
            Err(anyhow!("not used"))
        }
    }

    fn user(condition: &str) -> User {
        User {
            phone_number: "9876543210".to_string(),
            username: "PlantLover23".to_string(),
            medical_condition: condition.to_string(),
        }
    }

    #[tokio::test]
    async fn test_health_tip_without_condition_uses_default() {
        let oracle = TipOracle { tip: None };
        let tip = health_tip(&oracle, &user("")).await;
        assert_eq!(tip, DEFAULT_TIP);
    }

    #[tokio::test]
    async fn test_health_tip_fetches_for_condition() {
        let oracle = TipOracle {
            tip: Some("Gardening gently keeps joints moving.".to_string()),
        };
        let tip = health_tip(&oracle, &user("arthritis")).await;
        assert_eq!(tip, "Gardening gently keeps joints moving.");
    }

    #[tokio::test]
    async fn test_health_tip_falls_back_on_failure() {
        let oracle = TipOracle { tip: None };
        let tip = health_tip(&oracle, &user("arthritis")).await;
        assert_eq!(tip, FALLBACK_TIP);
    }
}
