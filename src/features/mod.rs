//! # Features Layer
//!
//! Self-contained feature modules over the core, oracle, and storage layers.

pub mod auth;
pub mod dashboard;
pub mod encyclopedia;
pub mod garden;
pub mod guide;
pub mod image_gen;
pub mod recommendations;
pub mod reminders;
pub mod warnings;

// Re-export the service types features are known by
pub use auth::{AuthFlow, AuthStep, User};
pub use garden::{GardenStore, Plant};
pub use guide::GuideChat;
pub use image_gen::{GeneratedImage, ImageGenerator};
pub use recommendations::{RecommendationSet, RecommendationWizard, SlotImage, WizardStep};
pub use reminders::{
    ConsoleNotifier, Notifier, Reminder, ReminderCenter, ReminderDraft, ReminderScheduler,
};
