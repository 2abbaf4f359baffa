// Copyright 2025 the Bikestem Authors
// SPDX-License-Identifier: Apache-2.0

//! Stack and reach mismatch between the frame-plus-stem build and the fit
//! target.
//!
//! A positive diff means the build falls short of the target; a negative
//! diff means it overshoots. Diffs are whole millimetres.

use crate::geometry::Geometry;
use crate::model::FitState;

const JUST_RIGHT: &str = "JUST RIGHT";

/// Round to the nearest integer, halves toward positive infinity
fn round_half_up(value: f64) -> i64 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

/// Vertical mismatch: `HY - (stack + spacerRise + stemRise)`.
///
/// `None` when either the frame stack or the target HY is empty.
pub fn stack_diff(state: &FitState, spacer_rise: f64, stem_rise: f64) -> Option<i64> {
    let target = state.handlebar_stack.value()?;
    let stack = state.stack.value()?;
    Some(round_half_up(target - (stack + spacer_rise + stem_rise)))
}

/// Horizontal mismatch: `HX - (reach + stemRun - spacerRun)`.
///
/// `None` when either the frame reach or the target HX is empty.
pub fn reach_diff(state: &FitState, stem_run: f64, spacer_run: f64) -> Option<i64> {
    let target = state.handlebar_reach.value()?;
    let reach = state.reach.value()?;
    Some(round_half_up(target - (reach + stem_run - spacer_run)))
}

/// Render a diff as a sentence, or an empty string when there is no diff.
pub fn format_diff_message(
    diff: Option<i64>,
    too_large_label: &str,
    too_small_label: &str,
    axis_label: &str,
) -> String {
    match diff {
        None => String::new(),
        Some(0) => format!("{axis_label} is {JUST_RIGHT}"),
        Some(diff) => {
            let label = if diff > 0 { too_small_label } else { too_large_label };
            format!("{axis_label} is {label} by {}mm", diff.abs())
        }
    }
}

/// Everything the calculator shows for one fit state
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    pub geometry: Geometry,
    pub stack_diff: Option<i64>,
    pub reach_diff: Option<i64>,
    pub stack_message: String,
    pub reach_message: String,
    /// Stack added by spacers and stem, e.g. `+ Stack: 38mm`
    pub rise_label: String,
    /// Reach added by spacers and stem, e.g. `+ Reach: 88mm`
    pub run_label: String,
    pub title: String,
}

impl FitReport {
    pub fn new(state: &FitState) -> Self {
        let geometry = Geometry::from_state(state);
        let stack_diff = stack_diff(state, geometry.spacer_rise, geometry.stem_rise);
        let reach_diff = reach_diff(state, geometry.stem_run, geometry.spacer_run);

        let rise_sign = if geometry.total_rise < 0.0 { "-" } else { "+" };
        let rise = round_half_up((geometry.spacer_rise + geometry.stem_rise).abs());
        let run = round_half_up(geometry.total_run);

        Self {
            geometry,
            stack_diff,
            reach_diff,
            stack_message: format_diff_message(stack_diff, "TOO TALL", "TOO SHORT", "Stack"),
            reach_message: format_diff_message(reach_diff, "TOO LONG", "TOO SHORT", "Reach"),
            rise_label: format!("{rise_sign} Stack: {rise}mm"),
            run_label: format!("+ Reach: {run}mm"),
            title: state.title(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NumericInput;

    fn frame_and_fit() -> FitState {
        FitState {
            stack: NumericInput::Value(500.0),
            reach: NumericInput::Value(400.0),
            handlebar_stack: NumericInput::Value(600.0),
            handlebar_reach: NumericInput::Value(500.0),
            ..FitState::default()
        }
    }

    #[test]
    fn default_components_fall_short() {
        let report = FitReport::new(&frame_and_fit());
        assert_eq!(report.stack_message, "Stack is TOO SHORT by 62mm");
        assert_eq!(report.reach_message, "Reach is TOO SHORT by 12mm");
    }

    #[test]
    fn adjusted_components_fall_short() {
        let state = FitState {
            spacer: 80.0,
            stem: 70.0,
            angle_ht: 85.0,
            angle_stem: -60.0,
            ..frame_and_fit()
        };
        let report = FitReport::new(&state);
        assert_eq!(report.stack_message, "Stack is TOO SHORT by 81mm");
        assert_eq!(report.reach_message, "Reach is TOO SHORT by 72mm");
    }

    #[test]
    fn empty_measurements_give_no_diff() {
        let mut state = frame_and_fit();
        state.stack = NumericInput::Empty;
        state.handlebar_reach = NumericInput::Empty;
        let report = FitReport::new(&state);
        assert_eq!(report.stack_diff, None);
        assert_eq!(report.reach_diff, None);
        assert_eq!(report.stack_message, "");
        assert_eq!(report.reach_message, "");
    }

    #[test]
    fn zero_is_a_real_measurement() {
        let state = FitState {
            stack: NumericInput::Value(0.0),
            handlebar_stack: NumericInput::Value(0.0),
            ..FitState::default()
        };
        assert!(FitReport::new(&state).stack_diff.is_some());
    }

    #[test]
    fn sign_flips_across_exact_match() {
        let base = FitState::default();
        let geometry = Geometry::from_state(&base);
        let exact = 600.0 - geometry.spacer_rise - geometry.stem_rise;

        let at = |stack: f64| FitState {
            stack: NumericInput::Value(stack),
            handlebar_stack: NumericInput::Value(600.0),
            ..base.clone()
        };

        let short = stack_diff(&at(exact - 5.0), geometry.spacer_rise, geometry.stem_rise);
        let tall = stack_diff(&at(exact + 5.0), geometry.spacer_rise, geometry.stem_rise);
        let right = stack_diff(&at(exact), geometry.spacer_rise, geometry.stem_rise);
        assert_eq!(short, Some(5));
        assert_eq!(tall, Some(-5));
        assert_eq!(right, Some(0));
        assert_eq!(
            format_diff_message(right, "TOO TALL", "TOO SHORT", "Stack"),
            "Stack is JUST RIGHT"
        );
    }

    #[test]
    fn overshoot_uses_too_large_label() {
        assert_eq!(
            format_diff_message(Some(-7), "TOO LONG", "TOO SHORT", "Reach"),
            "Reach is TOO LONG by 7mm"
        );
        assert_eq!(format_diff_message(None, "TOO LONG", "TOO SHORT", "Reach"), "");
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(round_half_up(61.75), 62);
    }

    #[test]
    fn summary_labels() {
        let report = FitReport::new(&FitState::default());
        // 40 * sin(73deg) = 38.25
        assert_eq!(report.rise_label, "+ Stack: 38mm");
        // 100 - 40 * sin(17deg) = 88.31
        assert_eq!(report.run_label, "+ Reach: 88mm");

        let dropped = FitState {
            spacer: 0.0,
            angle_stem: -30.0,
            ..FitState::default()
        };
        assert_eq!(FitReport::new(&dropped).rise_label, "- Stack: 50mm");
    }
}
