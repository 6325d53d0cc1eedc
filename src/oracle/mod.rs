//! # Oracle Module
//!
//! The external generative-AI collaborator. All actual reasoning (plant
//! identification, recommendation generation, safety assessment, chat)
//! happens on the other side of this seam; the crate only builds requests,
//! enforces timeouts, and parses replies.

pub mod client;
pub mod types;

pub use client::{OracleClient, PlantOracle};
pub use types::{
    ChatRole, ChatTurn, EncyclopediaEntry, PlantRecord, Preferences, RecommendedPlant, UnsafePlant,
};
