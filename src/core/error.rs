//! Typed intent-boundary errors
//!
//! Validation failures are rejected before they reach the stores or the
//! scheduler and are surfaced to the user inline. Oracle and storage
//! failures stay `anyhow::Error` at their call sites.

use thiserror::Error;

/// Rejections for the reminder-creation intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReminderError {
    #[error("Please enter a reminder message.")]
    EmptyMessage,
    #[error("Please select a future time for the reminder.")]
    TimeNotFuture,
}

/// Rejections for the mock phone/OTP sign-in flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Please enter a valid 10-digit phone number.")]
    InvalidPhone,
    #[error("Invalid OTP. Please use 123456 for this prototype.")]
    InvalidOtp,
    #[error("Please fill out all fields.")]
    MissingProfileField,
    #[error("Complete the previous step first.")]
    OutOfOrder,
}

/// Rejections for the recommendation preference wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("Complete the current step before continuing.")]
    IncompleteStep,
}
