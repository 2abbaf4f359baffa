// Copyright 2025 the Bikestem Authors
// SPDX-License-Identifier: Apache-2.0

//! Keeps the committed fit state and the persisted slot in step.
//!
//! Three values interact: the slot contents (owned by the storage layer),
//! the committed `FitState` (owned here, updated synchronously on every
//! edit) and a debounced copy of it that is written back once edits settle.
//!
//! Loop avoidance rests on two comparisons:
//! - a settled state is written only when it differs field-by-field from
//!   the freshest persisted value, so hydrating or adopting a persisted
//!   value never writes it straight back;
//! - a slot change is treated as external only when the raw value differs
//!   from the last value seen and from every write this reconciler still
//!   has outstanding, so our own writes (even late-applied ones, in any
//!   number) never bounce back as replacements.
//!
//! An external change that differs from the committed state replaces it
//! and cancels any write still waiting in the debounce window.

use super::debounce::Debouncer;
use crate::config::ReconcilerConfig;
use crate::diff::FitReport;
use crate::model::{FitAction, FitField, FitState, FitUpdate, SliderField, TextField, reduce};
use crate::persistence::{self, PersistedSlot};
use crate::validation::{self, ValidationError};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Result of giving the debounced write a chance to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing waiting to be written
    Idle,
    /// A write is waiting for the window to pass
    Waiting,
    /// The settled state already matches the persisted value
    Unchanged,
    /// The settled state could not be encoded; the slot was left alone
    Abandoned,
    /// The payload written to the slot
    Written(String),
}

pub struct Reconciler<S> {
    slot: S,
    config: ReconcilerConfig,
    state: FitState,
    input_error: Option<TextField>,
    debounced: Debouncer<FitState>,
    /// Raw slot value as last observed
    last_seen: Option<String>,
    /// Our writes not yet observed in the slot, oldest first
    in_flight: VecDeque<String>,
}

impl<S: PersistedSlot> Reconciler<S> {
    /// Read the slot once and adopt its state, or the template when the
    /// slot is empty or unreadable. Hydration never writes.
    pub fn hydrate(slot: S, config: ReconcilerConfig) -> Self {
        let raw = slot.get();
        let state = match persistence::parse_with_template(raw.as_deref(), &config.template) {
            Some(state) => {
                tracing::info!("Hydrated fit state from slot");
                state
            }
            None => {
                tracing::debug!("No usable persisted state, starting from template");
                config.template.clone()
            }
        };

        Self {
            slot,
            debounced: Debouncer::new(config.debounce),
            config,
            state,
            input_error: None,
            last_seen: raw,
            in_flight: VecDeque::new(),
        }
    }

    pub fn state(&self) -> &FitState {
        &self.state
    }

    pub fn report(&self) -> FitReport {
        FitReport::new(&self.state)
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Mutable slot access for external navigation. Call `sync_external`
    /// afterwards so the change is picked up.
    pub fn slot_mut(&mut self) -> &mut S {
        &mut self.slot
    }

    /// The single field currently flagged with an input error
    pub fn input_error(&self) -> Option<TextField> {
        self.input_error
    }

    pub fn has_error(&self, field: FitField) -> bool {
        self.input_error.map(TextField::field) == Some(field)
    }

    /// Whether a field should be non-interactive: another field is errored
    pub fn is_disabled(&self, field: FitField) -> bool {
        self.input_error
            .is_some_and(|errored| errored.field() != field)
    }

    /// Set a slider-driven field. Sliders are bounded by their input
    /// surface, so the value is accepted as is.
    pub fn set_slider(&mut self, field: SliderField, value: f64, now: Instant) {
        self.update(FitUpdate::Slider(field, value), now);
    }

    /// Validate free text for a field and commit it.
    ///
    /// On rejection the state is untouched and the field is flagged; on
    /// success any flag is cleared.
    pub fn edit_text(&mut self, field: TextField, input: &str, now: Instant) -> Result<(), ValidationError> {
        match validation::validate_text(field, input) {
            Ok(update) => {
                self.input_error = None;
                self.update(update, now);
                Ok(())
            }
            Err(err) => {
                tracing::debug!("Rejected edit: {}", err);
                self.input_error = Some(err.field());
                Err(err)
            }
        }
    }

    /// Commit a single-field update and restart the write-back window.
    pub fn update(&mut self, update: FitUpdate, now: Instant) {
        let next = reduce(self.state.clone(), FitAction::Update(update));
        if next == self.state {
            return;
        }
        self.state = next;
        self.debounced.push(self.state.clone(), now);
    }

    /// Check the slot for a change made outside this reconciler (history
    /// navigation, a pasted link) and adopt it.
    ///
    /// Returns `true` when the committed state was replaced.
    pub fn sync_external(&mut self) -> bool {
        let raw = self.slot.get();

        if let Some(value) = raw.as_deref()
            && let Some(landed) = self.in_flight.iter().position(|written| written == value)
        {
            // One of our writes has landed; anything older is superseded
            self.in_flight.drain(..=landed);
            tracing::debug!("Own write landed, {} still outstanding", self.in_flight.len());
            self.last_seen = raw;
            return false;
        }
        if raw == self.last_seen {
            return false;
        }

        self.last_seen = raw;
        self.in_flight.clear();

        let Some(incoming) =
            persistence::parse_with_template(self.last_seen.as_deref(), &self.config.template)
        else {
            tracing::debug!("Slot cleared externally, keeping current state");
            return false;
        };
        if incoming == self.state {
            return false;
        }

        let changed = incoming.differing_fields(&self.state);
        tracing::info!("Adopting external fit state ({} fields changed)", changed.len());
        if self.debounced.cancel().is_some() {
            tracing::debug!("Dropped pending write superseded by external state");
        }
        self.state = reduce(self.state.clone(), FitAction::Replace(incoming));
        true
    }

    pub fn time_until_flush(&self, now: Instant) -> Option<Duration> {
        self.debounced.time_remaining(now)
    }

    /// Write the settled state back if its window has passed.
    ///
    /// External changes are picked up first, so a fresher persisted value
    /// wins over an in-flight local write.
    pub fn poll(&mut self, now: Instant) -> FlushOutcome {
        self.sync_external();

        let Some(settled) = self.debounced.poll(now) else {
            return if self.debounced.is_pending() {
                FlushOutcome::Waiting
            } else {
                FlushOutcome::Idle
            };
        };

        if self.persisted_state().as_ref() == Some(&settled) {
            tracing::debug!("Settled state matches persisted value, skipping write");
            return FlushOutcome::Unchanged;
        }

        let Some(payload) = persistence::serialize(Some(&settled)) else {
            return FlushOutcome::Abandoned;
        };

        tracing::debug!("Writing fit state to slot ({} bytes)", payload.len());
        self.slot.set(Some(payload.clone()), self.config.history);
        let landed = self.slot.get();
        if landed.as_deref() == Some(payload.as_str()) {
            self.last_seen = landed;
            self.in_flight.clear();
        } else {
            self.in_flight.push_back(payload.clone());
        }
        FlushOutcome::Written(payload)
    }

    /// Stop reconciling. Any write still in its window is cancelled.
    pub fn teardown(mut self) -> S {
        if self.debounced.cancel().is_some() {
            tracing::debug!("Cancelled pending write on teardown");
        }
        self.slot
    }

    /// Freshest known persisted state: our newest unapplied write if there
    /// is one, otherwise the slot contents.
    fn persisted_state(&self) -> Option<FitState> {
        let raw = match self.in_flight.back() {
            Some(written) => Some(written.clone()),
            None => self.slot.get(),
        };
        persistence::parse_with_template(raw.as_deref(), &self.config.template)
    }
}
