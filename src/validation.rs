// Copyright 2025 the Bikestem Authors
// SPDX-License-Identifier: Apache-2.0

//! Validators gating free-text edits before they reach the fit state.
//!
//! Measurements accept digits only (no sign, decimal point or whitespace);
//! an empty string clears the field. Names are capped in length. Slider
//! values never pass through here, since the input surface already bounds
//! them.

use crate::model::{FitUpdate, MeasurementField, NumericInput, TextField};
use crate::settings::limits;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static DIGITS_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]*$").expect("valid digits regex"));

/// Reason a text edit was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field:?} accepts digits only, got {input:?}")]
    NotDigits {
        field: MeasurementField,
        input: String,
    },
    #[error("name is {len} characters long, the limit is {max}")]
    NameTooLong { len: usize, max: usize },
}

impl ValidationError {
    /// The field that should carry the inline error
    pub fn field(&self) -> TextField {
        match self {
            ValidationError::NotDigits { field, .. } => TextField::Measurement(*field),
            ValidationError::NameTooLong { .. } => TextField::Name,
        }
    }
}

/// Validate a measurement typed as text.
///
/// `""` maps to the empty marker, never to zero.
pub fn validate_measurement(field: MeasurementField, input: &str) -> Result<NumericInput, ValidationError> {
    if input.is_empty() {
        return Ok(NumericInput::Empty);
    }
    let not_digits = || ValidationError::NotDigits {
        field,
        input: input.to_string(),
    };
    if !DIGITS_ONLY.is_match(input) {
        return Err(not_digits());
    }
    // Digit strings always parse; very long ones saturate to infinity
    // and would break the finite-number invariant.
    match input.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(NumericInput::Value(value)),
        _ => Err(not_digits()),
    }
}

/// Validate a configuration name against the length cap.
pub fn validate_name(input: &str) -> Result<String, ValidationError> {
    let len = input.chars().count();
    if len > limits::NAME_MAX_LEN {
        return Err(ValidationError::NameTooLong {
            len,
            max: limits::NAME_MAX_LEN,
        });
    }
    Ok(input.to_string())
}

/// Validate raw text for a field and turn it into an update.
pub fn validate_text(field: TextField, input: &str) -> Result<FitUpdate, ValidationError> {
    match field {
        TextField::Measurement(measurement) => {
            validate_measurement(measurement, input).map(|value| FitUpdate::Measurement(measurement, value))
        }
        TextField::Name => validate_name(input).map(FitUpdate::Name),
    }
}
