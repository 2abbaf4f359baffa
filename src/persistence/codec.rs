// Copyright 2025 the Bikestem Authors
// SPDX-License-Identifier: Apache-2.0

//! Conversion between the persisted payload string and `FitState`.
//!
//! Decoding is lenient: each of the eleven fields is taken from the payload
//! when it has the right type and falls back to the template otherwise.
//! That keeps old links working (no `name`, extra `input`/`value` keys) and
//! tolerates hand-edited or truncated ones. Only an absent payload or
//! malformed JSON yields no state at all.

use crate::model::{FitField, FitState, NumericInput};
use crate::settings::limits;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("payload is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("fit state could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Parse a persisted payload against the built-in template.
///
/// `None` for an absent or empty payload and for malformed JSON; the caller
/// substitutes its fallback.
pub fn parse(raw: Option<&str>) -> Option<FitState> {
    parse_with_template(raw, &FitState::default())
}

/// Parse a persisted payload, defaulting missing or mistyped fields from
/// `template`.
pub fn parse_with_template(raw: Option<&str>, template: &FitState) -> Option<FitState> {
    let raw = raw.filter(|raw| !raw.is_empty())?;
    match try_decode(raw, template) {
        Ok(state) => Some(state),
        Err(err) => {
            tracing::warn!("Invalid fit state in query string: {}", err);
            None
        }
    }
}

/// Decode a payload, reporting why it could not be read.
pub fn try_decode(raw: &str, template: &FitState) -> Result<FitState, CodecError> {
    let value: Value = serde_json::from_str(raw).map_err(CodecError::Decode)?;
    let Value::Object(map) = value else {
        tracing::warn!("Fit state payload is not an object, using defaults");
        return Ok(template.clone());
    };

    for key in map.keys().filter(|key| FitField::from_key(key).is_none()) {
        tracing::debug!("Ignoring unknown fit state field '{}'", key);
    }

    Ok(FitState {
        stem_x_origin: number(&map, FitField::StemXOrigin, template.stem_x_origin),
        stem_y_origin: number(&map, FitField::StemYOrigin, template.stem_y_origin),
        spacer: number(&map, FitField::Spacer, template.spacer),
        stem: number(&map, FitField::Stem, template.stem),
        angle_ht: number(&map, FitField::AngleHt, template.angle_ht),
        angle_stem: number(&map, FitField::AngleStem, template.angle_stem),
        stack: measurement(&map, FitField::Stack, template.stack),
        reach: measurement(&map, FitField::Reach, template.reach),
        handlebar_stack: measurement(&map, FitField::HandlebarStack, template.handlebar_stack),
        handlebar_reach: measurement(&map, FitField::HandlebarReach, template.handlebar_reach),
        name: name(&map, &template.name),
    })
}

/// Encode a state for the persisted slot. `None` in, `None` out.
pub fn serialize(state: Option<&FitState>) -> Option<String> {
    let state = state?;
    match try_encode(state) {
        Ok(payload) => Some(payload),
        Err(err) => {
            tracing::warn!("Unable to serialize fit state: {}", err);
            None
        }
    }
}

pub fn try_encode(state: &FitState) -> Result<String, CodecError> {
    serde_json::to_string(state).map_err(CodecError::Encode)
}

fn number(map: &Map<String, Value>, field: FitField, default: f64) -> f64 {
    let found = map.get(field.key());
    match found.and_then(Value::as_f64).filter(|value| value.is_finite()) {
        Some(value) => value,
        None => {
            log_default(field, found);
            default
        }
    }
}

fn measurement(map: &Map<String, Value>, field: FitField, default: NumericInput) -> NumericInput {
    let found = map.get(field.key());
    let parsed = match found {
        Some(Value::String(text)) if text.is_empty() => Some(NumericInput::Empty),
        Some(value) => value
            .as_f64()
            .filter(|value| value.is_finite())
            .map(NumericInput::Value),
        None => None,
    };
    parsed.unwrap_or_else(|| {
        log_default(field, found);
        default
    })
}

fn name(map: &Map<String, Value>, default: &str) -> String {
    let found = map.get(FitField::Name.key());
    match found {
        Some(Value::String(text)) if text.chars().count() <= limits::NAME_MAX_LEN => text.clone(),
        _ => {
            log_default(FitField::Name, found);
            default.to_string()
        }
    }
}

fn log_default(field: FitField, found: Option<&Value>) {
    match found {
        None => tracing::debug!("Fit state field '{}' missing, using default", field),
        Some(value) => tracing::debug!("Fit state field '{}' has invalid value {}, using default", field, value),
    }
}
