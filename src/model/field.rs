// Copyright 2025 the Bikestem Authors
// SPDX-License-Identifier: Apache-2.0

//! Field identifiers for the fit state.
//!
//! `FitField` names every field of the record and maps it to its wire key.
//! The narrower enums group fields by how they are edited: sliders carry a
//! bounded number, measurements carry a number-or-empty typed as text, and
//! text fields are the ones whose raw input goes through validation.

use crate::settings::sliders;
use std::fmt;

/// Every field of `FitState`, in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FitField {
    StemXOrigin,
    StemYOrigin,
    Spacer,
    Stem,
    AngleHt,
    AngleStem,
    Stack,
    Reach,
    HandlebarStack,
    HandlebarReach,
    Name,
}

impl FitField {
    /// All eleven fields, in the order they appear on the wire
    pub const ALL: [FitField; 11] = [
        FitField::StemXOrigin,
        FitField::StemYOrigin,
        FitField::Spacer,
        FitField::Stem,
        FitField::AngleHt,
        FitField::AngleStem,
        FitField::Stack,
        FitField::Reach,
        FitField::HandlebarStack,
        FitField::HandlebarReach,
        FitField::Name,
    ];

    /// JSON key of this field in the persisted payload
    pub fn key(self) -> &'static str {
        match self {
            FitField::StemXOrigin => "stemXOrigin",
            FitField::StemYOrigin => "stemYOrigin",
            FitField::Spacer => "spacer",
            FitField::Stem => "stem",
            FitField::AngleHt => "angleHt",
            FitField::AngleStem => "angleStem",
            FitField::Stack => "stack",
            FitField::Reach => "reach",
            FitField::HandlebarStack => "handlebarStack",
            FitField::HandlebarReach => "handlebarReach",
            FitField::Name => "name",
        }
    }

    /// Look a field up by its wire key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl fmt::Display for FitField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Fields driven by a range- and step-constrained slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliderField {
    Spacer,
    Stem,
    AngleHt,
    AngleStem,
}

impl SliderField {
    pub const ALL: [SliderField; 4] = [
        SliderField::Spacer,
        SliderField::Stem,
        SliderField::AngleHt,
        SliderField::AngleStem,
    ];

    pub fn field(self) -> FitField {
        match self {
            SliderField::Spacer => FitField::Spacer,
            SliderField::Stem => FitField::Stem,
            SliderField::AngleHt => FitField::AngleHt,
            SliderField::AngleStem => FitField::AngleStem,
        }
    }

    /// Slider bounds and step as `(min, max, step)`
    pub fn range(self) -> (f64, f64, f64) {
        match self {
            SliderField::Spacer => sliders::SPACER,
            SliderField::Stem => sliders::STEM,
            SliderField::AngleHt => sliders::ANGLE_HT,
            SliderField::AngleStem => sliders::ANGLE_STEM,
        }
    }

    /// Clamp a value into the slider range and round it to the nearest step.
    ///
    /// Steps are counted from the range minimum, matching how the input
    /// surface positions its thumb. Non-finite input lands on the minimum.
    pub fn snap(self, value: f64) -> f64 {
        let (min, max, step) = self.range();
        if !value.is_finite() {
            return min;
        }
        let clamped = value.clamp(min, max);
        let steps = ((clamped - min) / step).round();
        (min + steps * step).min(max)
    }
}

/// Fields holding a frame or fit measurement that may be left empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementField {
    Stack,
    Reach,
    HandlebarStack,
    HandlebarReach,
}

impl MeasurementField {
    pub const ALL: [MeasurementField; 4] = [
        MeasurementField::Stack,
        MeasurementField::Reach,
        MeasurementField::HandlebarStack,
        MeasurementField::HandlebarReach,
    ];

    pub fn field(self) -> FitField {
        match self {
            MeasurementField::Stack => FitField::Stack,
            MeasurementField::Reach => FitField::Reach,
            MeasurementField::HandlebarStack => FitField::HandlebarStack,
            MeasurementField::HandlebarReach => FitField::HandlebarReach,
        }
    }

    /// Helper label shown under the input when it is not errored
    pub fn label(self) -> &'static str {
        match self {
            MeasurementField::Stack => "Stack (mm)",
            MeasurementField::Reach => "Reach (mm)",
            MeasurementField::HandlebarStack => "HY (mm)",
            MeasurementField::HandlebarReach => "HX (mm)",
        }
    }
}

/// Fields edited as free text and validated before they are committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Measurement(MeasurementField),
    Name,
}

impl TextField {
    pub fn field(self) -> FitField {
        match self {
            TextField::Measurement(measurement) => measurement.field(),
            TextField::Name => FitField::Name,
        }
    }

    /// Helper text for the input, switching to the error hint when errored
    pub fn helper_text(self, errored: bool) -> &'static str {
        match (self, errored) {
            (TextField::Measurement(_), true) => "Numbers only",
            (TextField::Measurement(measurement), false) => measurement.label(),
            (TextField::Name, true) => "That's too long",
            (TextField::Name, false) => "",
        }
    }
}

impl From<MeasurementField> for TextField {
    fn from(field: MeasurementField) -> Self {
        TextField::Measurement(field)
    }
}
