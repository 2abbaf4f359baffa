// Copyright 2025 the Bikestem Authors
// SPDX-License-Identifier: Apache-2.0

//! Runtime configuration for the reconciler.
//!
//! Defaults come from `settings`. A TOML file may override the debounce
//! window, the history mode used for write-back, and any subset of the
//! default template:
//!
//! ```toml
//! debounce_ms = 400
//! history = "push"
//!
//! [template]
//! spacer = 20
//! name = "Shop default"
//! ```

use crate::model::{FitField, FitState, NumericInput};
use crate::persistence::HistoryMode;
use crate::settings::{limits, persistence};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings the reconciler runs with
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilerConfig {
    /// Quiet period before write-back
    pub debounce: Duration,
    /// History mode for write-back
    pub history: HistoryMode,
    /// State used when nothing usable is persisted, and per-field fallback
    pub template: FitState,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(persistence::DEBOUNCE_MS),
            history: HistoryMode::Replace,
            template: FitState::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    debounce_ms: Option<u64>,
    history: Option<HistoryMode>,
    template: TemplateOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
struct TemplateOverrides {
    stem_x_origin: Option<f64>,
    stem_y_origin: Option<f64>,
    spacer: Option<f64>,
    stem: Option<f64>,
    angle_ht: Option<f64>,
    angle_stem: Option<f64>,
    stack: Option<NumericInput>,
    reach: Option<NumericInput>,
    handlebar_stack: Option<NumericInput>,
    handlebar_reach: Option<NumericInput>,
    name: Option<String>,
}

impl TemplateOverrides {
    fn apply(self, mut template: FitState) -> Result<FitState, ConfigError> {
        let numbers = [
            (FitField::StemXOrigin, self.stem_x_origin, &mut template.stem_x_origin),
            (FitField::StemYOrigin, self.stem_y_origin, &mut template.stem_y_origin),
            (FitField::Spacer, self.spacer, &mut template.spacer),
            (FitField::Stem, self.stem, &mut template.stem),
            (FitField::AngleHt, self.angle_ht, &mut template.angle_ht),
            (FitField::AngleStem, self.angle_stem, &mut template.angle_stem),
        ];
        for (field, value, slot) in numbers {
            if let Some(value) = value {
                if !value.is_finite() {
                    return Err(ConfigError::Invalid(format!("template {field} must be finite")));
                }
                *slot = value;
            }
        }

        let measurements = [
            (self.stack, &mut template.stack),
            (self.reach, &mut template.reach),
            (self.handlebar_stack, &mut template.handlebar_stack),
            (self.handlebar_reach, &mut template.handlebar_reach),
        ];
        for (value, slot) in measurements {
            if let Some(value) = value {
                *slot = value;
            }
        }

        if let Some(name) = self.name {
            if name.chars().count() > limits::NAME_MAX_LEN {
                return Err(ConfigError::Invalid(format!(
                    "template name is longer than {} characters",
                    limits::NAME_MAX_LEN
                )));
            }
            template.name = name;
        }

        Ok(template)
    }
}

impl ReconcilerConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(source)?;
        let defaults = Self::default();

        let debounce = match file.debounce_ms {
            Some(0) => {
                return Err(ConfigError::Invalid("debounce_ms must be greater than zero".to_string()));
            }
            Some(ms) => Duration::from_millis(ms),
            None => defaults.debounce,
        };

        Ok(Self {
            debounce,
            history: file.history.unwrap_or(defaults.history),
            template: file.template.apply(defaults.template)?,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!("Loaded config from: {}", path.display());
        Ok(config)
    }
}
