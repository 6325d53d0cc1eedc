//! # Auth Feature
//!
//! Mock phone/OTP sign-in: a three-step form state machine with a fixed
//! prototype OTP. No real authentication happens here.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::core::error::AuthError;

/// The only OTP this prototype accepts.
pub const MOCK_OTP: &str = "123456";

/// The signed-in user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub phone_number: String,
    pub username: String,
    pub medical_condition: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStep {
    Phone,
    Otp,
    Profile,
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{10}$").expect("phone pattern compiles"))
}

/// Sign-in state machine. Each submission either advances one step or
/// leaves the state untouched with a validation error.
#[derive(Debug)]
pub struct AuthFlow {
    step: AuthStep,
    phone_number: Option<String>,
}

impl Default for AuthFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthFlow {
    pub fn new() -> Self {
        Self {
            step: AuthStep::Phone,
            phone_number: None,
        }
    }

    pub fn step(&self) -> AuthStep {
        self.step
    }

    /// Step 1: a 10-digit phone number.
    pub fn submit_phone(&mut self, raw: &str) -> Result<(), AuthError> {
        if self.step != AuthStep::Phone {
            return Err(AuthError::OutOfOrder);
        }
        let raw = raw.trim();
        if !phone_pattern().is_match(raw) {
            return Err(AuthError::InvalidPhone);
        }
        self.phone_number = Some(raw.to_string());
        self.step = AuthStep::Otp;
        Ok(())
    }

    /// Step 2: the mock OTP.
    pub fn submit_otp(&mut self, raw: &str) -> Result<(), AuthError> {
        if self.step != AuthStep::Otp {
            return Err(AuthError::OutOfOrder);
        }
        if raw.trim() != MOCK_OTP {
            return Err(AuthError::InvalidOtp);
        }
        self.step = AuthStep::Profile;
        Ok(())
    }

    /// Step 3: profile details. Both fields are required (the condition
    /// drives recommendations and warnings).
    pub fn submit_profile(
        &mut self,
        username: &str,
        medical_condition: &str,
    ) -> Result<User, AuthError> {
        if self.step != AuthStep::Profile {
            return Err(AuthError::OutOfOrder);
        }
        let username = username.trim();
        let medical_condition = medical_condition.trim();
        if username.is_empty() || medical_condition.is_empty() {
            return Err(AuthError::MissingProfileField);
        }

        let phone_number = self.phone_number.clone().ok_or(AuthError::OutOfOrder)?;
        Ok(User {
            phone_number,
            username: username.to_string(),
            medical_condition: medical_condition.to_string(),
        })
    }
}
