// Copyright 2025 the Bikestem Authors
// SPDX-License-Identifier: Apache-2.0

//! State transitions for the fit state.
//!
//! An `Update` sets exactly one field and leaves the rest of the record
//! untouched. A `Replace` swaps in a whole record, unless it is field-equal
//! to the current one.

use super::field::{MeasurementField, SliderField};
use super::fit_state::{FitState, NumericInput};

/// A typed single-field edit
#[derive(Debug, Clone, PartialEq)]
pub enum FitUpdate {
    Slider(SliderField, f64),
    Measurement(MeasurementField, NumericInput),
    Name(String),
}

/// A transition of the committed fit state
#[derive(Debug, Clone, PartialEq)]
pub enum FitAction {
    Update(FitUpdate),
    Replace(FitState),
}

/// Apply an action, returning the next state.
pub fn reduce(mut state: FitState, action: FitAction) -> FitState {
    match action {
        FitAction::Update(FitUpdate::Slider(field, value)) => {
            *state.slider_mut(field) = value;
            state
        }
        FitAction::Update(FitUpdate::Measurement(field, value)) => {
            *state.measurement_mut(field) = value;
            state
        }
        FitAction::Update(FitUpdate::Name(name)) => {
            state.name = name;
            state
        }
        FitAction::Replace(payload) => {
            if payload == state {
                state
            } else {
                payload
            }
        }
    }
}
