// Copyright 2025 the Bikestem Authors
// SPDX-License-Identifier: Apache-2.0

//! Fit-state data model

pub mod action;
pub mod field;
pub mod fit_state;

pub use action::{FitAction, FitUpdate, reduce};
pub use field::{FitField, MeasurementField, SliderField, TextField};
pub use fit_state::{FitState, NumericInput};
