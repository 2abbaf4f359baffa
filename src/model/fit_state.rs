// Copyright 2025 the Bikestem Authors
// SPDX-License-Identifier: Apache-2.0

//! The canonical fit-state record.
//!
//! `FitState` holds the drawing origin, the four slider-driven component
//! parameters, the four optional frame/fit measurements and a user label.
//! Its serde `Serialize` impl produces the wire payload stored in the URL;
//! decoding is field-by-field and lives in `persistence::codec`.

use super::field::{FitField, MeasurementField, SliderField};
use crate::settings::defaults;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Largest integer an IEEE double represents exactly (2^53)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A measurement that may be left blank.
///
/// On the wire the empty marker is the empty string `""`; a value is a
/// plain JSON number. `Empty` is distinct from zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NumericInput {
    #[default]
    Empty,
    Value(f64),
}

impl NumericInput {
    pub fn value(self) -> Option<f64> {
        match self {
            NumericInput::Empty => None,
            NumericInput::Value(value) => Some(value),
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, NumericInput::Empty)
    }
}

impl fmt::Display for NumericInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericInput::Empty => Ok(()),
            NumericInput::Value(value) => write!(f, "{value}"),
        }
    }
}

impl Serialize for NumericInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NumericInput::Empty => serializer.serialize_str(""),
            NumericInput::Value(value) => serialize_number(value, serializer),
        }
    }
}

impl<'de> Deserialize<'de> for NumericInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumericInputVisitor)
    }
}

struct NumericInputVisitor;

impl Visitor<'_> for NumericInputVisitor {
    type Value = NumericInput;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a finite number or an empty string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<NumericInput, E> {
        if value.is_empty() {
            Ok(NumericInput::Empty)
        } else {
            Err(E::invalid_value(de::Unexpected::Str(value), &self))
        }
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<NumericInput, E> {
        Ok(NumericInput::Value(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<NumericInput, E> {
        Ok(NumericInput::Value(value as f64))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<NumericInput, E> {
        if value.is_finite() {
            Ok(NumericInput::Value(value))
        } else {
            Err(E::invalid_value(de::Unexpected::Float(value), &self))
        }
    }
}

/// Write whole numbers as JSON integers so payloads read `"spacer":40`
/// rather than `"spacer":40.0`.
pub(crate) fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Frame geometry, fit targets and component parameters.
///
/// Field equality is the derived `PartialEq`, which compares all eleven
/// fields; it never sees NaN because every constructor keeps numbers finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitState {
    #[serde(serialize_with = "serialize_number")]
    pub stem_x_origin: f64,
    #[serde(serialize_with = "serialize_number")]
    pub stem_y_origin: f64,
    /// Headset spacer stack height, mm
    #[serde(serialize_with = "serialize_number")]
    pub spacer: f64,
    /// Stem length, mm
    #[serde(serialize_with = "serialize_number")]
    pub stem: f64,
    /// Head-tube angle from horizontal, degrees
    #[serde(serialize_with = "serialize_number")]
    pub angle_ht: f64,
    /// Stem angle from horizontal, degrees
    #[serde(serialize_with = "serialize_number")]
    pub angle_stem: f64,
    pub stack: NumericInput,
    pub reach: NumericInput,
    /// Fit-target handlebar Y (HY)
    pub handlebar_stack: NumericInput,
    /// Fit-target handlebar X (HX)
    pub handlebar_reach: NumericInput,
    pub name: String,
}

impl Default for FitState {
    fn default() -> Self {
        Self {
            stem_x_origin: defaults::STEM_X_ORIGIN,
            stem_y_origin: defaults::STEM_Y_ORIGIN,
            spacer: defaults::SPACER,
            stem: defaults::STEM,
            angle_ht: defaults::ANGLE_HT,
            angle_stem: defaults::ANGLE_STEM,
            stack: NumericInput::Empty,
            reach: NumericInput::Empty,
            handlebar_stack: NumericInput::Empty,
            handlebar_reach: NumericInput::Empty,
            name: String::new(),
        }
    }
}

impl FitState {
    pub fn slider(&self, field: SliderField) -> f64 {
        match field {
            SliderField::Spacer => self.spacer,
            SliderField::Stem => self.stem,
            SliderField::AngleHt => self.angle_ht,
            SliderField::AngleStem => self.angle_stem,
        }
    }

    pub fn slider_mut(&mut self, field: SliderField) -> &mut f64 {
        match field {
            SliderField::Spacer => &mut self.spacer,
            SliderField::Stem => &mut self.stem,
            SliderField::AngleHt => &mut self.angle_ht,
            SliderField::AngleStem => &mut self.angle_stem,
        }
    }

    pub fn measurement(&self, field: MeasurementField) -> NumericInput {
        match field {
            MeasurementField::Stack => self.stack,
            MeasurementField::Reach => self.reach,
            MeasurementField::HandlebarStack => self.handlebar_stack,
            MeasurementField::HandlebarReach => self.handlebar_reach,
        }
    }

    pub fn measurement_mut(&mut self, field: MeasurementField) -> &mut NumericInput {
        match field {
            MeasurementField::Stack => &mut self.stack,
            MeasurementField::Reach => &mut self.reach,
            MeasurementField::HandlebarStack => &mut self.handlebar_stack,
            MeasurementField::HandlebarReach => &mut self.handlebar_reach,
        }
    }

    /// Whether one field holds the same value in both records
    pub fn field_eq(&self, other: &FitState, field: FitField) -> bool {
        match field {
            FitField::StemXOrigin => self.stem_x_origin == other.stem_x_origin,
            FitField::StemYOrigin => self.stem_y_origin == other.stem_y_origin,
            FitField::Spacer => self.spacer == other.spacer,
            FitField::Stem => self.stem == other.stem,
            FitField::AngleHt => self.angle_ht == other.angle_ht,
            FitField::AngleStem => self.angle_stem == other.angle_stem,
            FitField::Stack => self.stack == other.stack,
            FitField::Reach => self.reach == other.reach,
            FitField::HandlebarStack => self.handlebar_stack == other.handlebar_stack,
            FitField::HandlebarReach => self.handlebar_reach == other.handlebar_reach,
            FitField::Name => self.name == other.name,
        }
    }

    /// Fields whose values differ between the two records
    pub fn differing_fields(&self, other: &FitState) -> Vec<FitField> {
        FitField::ALL
            .into_iter()
            .filter(|&field| !self.field_eq(other, field))
            .collect()
    }

    /// Document title for this configuration
    pub fn title(&self) -> String {
        format!("{} Bicycle Stem & Fit Calculator", self.name)
    }
}
