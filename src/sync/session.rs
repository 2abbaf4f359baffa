// Copyright 2025 the Bikestem Authors
// SPDX-License-Identifier: Apache-2.0

//! Async driver running a reconciler against the tokio clock.
//!
//! Edits arrive over an mpsc channel and are committed at once. While a
//! write is pending, the loop waits on the channel with a timeout equal to
//! the time left in the debounce window; when the timeout fires with no new
//! event, the settled state is flushed. Closing the channel or sending
//! `Shutdown` tears the reconciler down, cancelling any pending write.

use super::reconciler::{FlushOutcome, Reconciler};
use crate::model::{SliderField, TextField};
use crate::persistence::PersistedSlot;
use std::fmt;
use std::time::Instant;
use tokio::sync::mpsc;

/// Change applied to the slot from outside the session
pub type ExternalChange<S> = Box<dyn FnOnce(&mut S) + Send>;

/// Input to a running session
pub enum SessionEvent<S> {
    /// A slider moved
    Slider(SliderField, f64),
    /// Text typed into a measurement or the name field
    Text(TextField, String),
    /// The slot was changed externally (history navigation, pasted link)
    External(ExternalChange<S>),
    /// Stop the session
    Shutdown,
}

impl<S> fmt::Debug for SessionEvent<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::Slider(field, value) => write!(f, "Slider({field:?}, {value})"),
            SessionEvent::Text(field, text) => write!(f, "Text({field:?}, {text:?})"),
            SessionEvent::External(_) => f.write_str("External(..)"),
            SessionEvent::Shutdown => f.write_str("Shutdown"),
        }
    }
}

fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Run until shutdown, returning the slot.
pub async fn run_session<S: PersistedSlot>(
    mut reconciler: Reconciler<S>,
    mut events: mpsc::Receiver<SessionEvent<S>>,
) -> S {
    loop {
        let event = match reconciler.time_until_flush(now()) {
            Some(wait) => match tokio::time::timeout(wait, events.recv()).await {
                Ok(event) => event,
                Err(_) => {
                    if let FlushOutcome::Written(payload) = reconciler.poll(now()) {
                        tracing::info!("Persisted fit state ({} bytes)", payload.len());
                    }
                    continue;
                }
            },
            None => events.recv().await,
        };

        match event {
            None | Some(SessionEvent::Shutdown) => break,
            Some(SessionEvent::Slider(field, value)) => {
                reconciler.set_slider(field, value, now());
            }
            Some(SessionEvent::Text(field, text)) => {
                if let Err(err) = reconciler.edit_text(field, &text, now()) {
                    tracing::debug!("Session kept {} flagged: {}", field.field(), err);
                }
            }
            Some(SessionEvent::External(change)) => {
                change(reconciler.slot_mut());
                reconciler.sync_external();
            }
        }
    }

    tracing::debug!("Session ended");
    reconciler.teardown()
}
