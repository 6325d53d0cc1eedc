// Core layer - shared types, configuration, and error handling
pub mod core;

// Storage layer - JSON snapshot persistence
pub mod storage;

// Oracle layer - the external generative-AI collaborator
pub mod oracle;

// Features layer - all feature modules
pub mod features;

// Re-export core config for convenience
pub use crate::core::Config;

// Re-export feature items used by the front-end
pub use features::{
    // Auth
    AuthFlow, AuthStep, User,
    // Garden
    GardenStore, Plant,
    // Guide
    GuideChat,
    // Image generation
    GeneratedImage, ImageGenerator,
    // Recommendations
    RecommendationSet, RecommendationWizard, SlotImage, WizardStep,
    // Reminders
    ConsoleNotifier, Notifier, Reminder, ReminderCenter, ReminderDraft, ReminderScheduler,
};

// Re-export the oracle seam
pub use oracle::{OracleClient, PlantOracle};

// Re-export storage
pub use storage::SnapshotStore;
