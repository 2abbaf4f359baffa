// Copyright 2025 the Bikestem Authors
// SPDX-License-Identifier: Apache-2.0

//! Application settings and configuration constants.
//!
//! This module holds the fixed numbers of the calculator: the persisted
//! slot key, the debounce window, input limits and the slider ranges.
//! Runtime overrides go through `config::ReconcilerConfig`.

// ============================================================================
// PERSISTENCE SETTINGS
// ============================================================================
/// Query-string key holding the JSON-encoded fit state
const URL_STATE_KEY: &str = "urlstate";

/// Quiet period before a settled state is written back (milliseconds)
const DEBOUNCE_MS: u64 = 250;

// ============================================================================
// INPUT LIMITS
// ============================================================================
/// Maximum length of the configuration name (characters)
const NAME_MAX_LEN: usize = 100;

// ============================================================================
// DEFAULT FIT STATE
// ============================================================================
// The drawing origin is fixed for a session and never edited.
const STEM_X_ORIGIN: f64 = 100.0;
const STEM_Y_ORIGIN: f64 = 200.0;

const DEFAULT_SPACER: f64 = 40.0;
const DEFAULT_STEM: f64 = 100.0;
const DEFAULT_ANGLE_HT: f64 = 73.0;
const DEFAULT_ANGLE_STEM: f64 = 0.0;

// ============================================================================
// SLIDER RANGES
// ============================================================================
// (min, max, step)
const SPACER_RANGE: (f64, f64, f64) = (0.0, 200.0, 1.0);
const STEM_RANGE: (f64, f64, f64) = (70.0, 140.0, 10.0);
const ANGLE_HT_RANGE: (f64, f64, f64) = (65.0, 85.0, 0.25);
const ANGLE_STEM_RANGE: (f64, f64, f64) = (-60.0, 60.0, 1.0);

// ============================================================================
// DRAWING SETTINGS
// ============================================================================
/// Divisor applied to millimetre coordinates when drawing the diagram
const SHRINK_FACTOR: f64 = 2.3;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Persisted-state settings
pub mod persistence {
    /// Key of the persisted slot in the query string
    pub const URL_STATE_KEY: &str = super::URL_STATE_KEY;

    /// Debounce window for write-back, in milliseconds
    pub const DEBOUNCE_MS: u64 = super::DEBOUNCE_MS;
}

/// Limits enforced by the field validators
pub mod limits {
    /// Maximum configuration name length
    pub const NAME_MAX_LEN: usize = super::NAME_MAX_LEN;
}

/// Values of the built-in default template
pub mod defaults {
    pub const STEM_X_ORIGIN: f64 = super::STEM_X_ORIGIN;
    pub const STEM_Y_ORIGIN: f64 = super::STEM_Y_ORIGIN;
    pub const SPACER: f64 = super::DEFAULT_SPACER;
    pub const STEM: f64 = super::DEFAULT_STEM;
    pub const ANGLE_HT: f64 = super::DEFAULT_ANGLE_HT;
    pub const ANGLE_STEM: f64 = super::DEFAULT_ANGLE_STEM;
}

/// Slider ranges as `(min, max, step)`
pub mod sliders {
    pub const SPACER: (f64, f64, f64) = super::SPACER_RANGE;
    pub const STEM: (f64, f64, f64) = super::STEM_RANGE;
    pub const ANGLE_HT: (f64, f64, f64) = super::ANGLE_HT_RANGE;
    pub const ANGLE_STEM: (f64, f64, f64) = super::ANGLE_STEM_RANGE;
}

/// Diagram settings
pub mod drawing {
    /// Millimetres per diagram unit
    pub const SHRINK_FACTOR: f64 = super::SHRINK_FACTOR;
}
