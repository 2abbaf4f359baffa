// Copyright 2025 the Bikestem Authors
// SPDX-License-Identifier: Apache-2.0

//! Synchronizing the in-memory fit state with the persisted slot.

pub mod debounce;
pub mod reconciler;
pub mod session;

pub use debounce::Debouncer;
pub use reconciler::{FlushOutcome, Reconciler};
pub use session::{ExternalChange, SessionEvent, run_session};
