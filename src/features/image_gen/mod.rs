//! # Image Generation Feature
//!
//! Generated plant portraits for garden entries, recommendations, and
//! encyclopedia pages.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.5.0

pub mod generator;

pub use generator::{frame_prompt, representation_prompt, GeneratedImage, ImageGenerator};
