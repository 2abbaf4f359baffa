// Copyright 2025 the Bikestem Authors
// SPDX-License-Identifier: Apache-2.0

//! Persisted representation of the fit state: the payload codec and the
//! slot it is stored in.

pub mod codec;
pub mod slot;

pub use codec::{CodecError, parse, parse_with_template, serialize};
pub use slot::{HistoryMode, MemorySlot, PersistedSlot, QueryStringSlot, SlotError, SlotWrite};
