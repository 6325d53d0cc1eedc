//! # Warnings Feature
//!
//! Plants to avoid for the user's condition, with an optional search filter
//! applied by the oracle.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.8.0

use anyhow::Result;

use crate::oracle::{PlantOracle, UnsafePlant};

/// Fetch the unsafe-plant list. An empty or whitespace query is treated as
/// no filter.
pub async fn fetch(
    oracle: &dyn PlantOracle,
    condition: &str,
    query: Option<&str>,
) -> Result<Vec<UnsafePlant>> {
    let query = query.map(str::trim).filter(|q| !q.is_empty());
    oracle.unsafe_plants(condition, query).await
}
