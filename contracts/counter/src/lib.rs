// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Contract to implement a simple counter that can be read and incremented
//! by one count.

use granary_uplink as uplink;
use uplink::{
    wrap_query, wrap_transaction, CallError, Contract, State, StateError,
    StateKey, StateMut,
};

/// The well-known key the counter stores its value under.
pub const COUNTER_KEY: &[u8] = b"COUNTER_KEY";

/// A counter over a single key of the host store.
///
/// The counter holds no value of its own: every call re-reads the
/// authoritative value from the store, so the stored value always equals the
/// number of increments that have completed since the key was created.
pub struct Counter {
    key: StateKey,
}

impl Counter {
    /// A counter over [`COUNTER_KEY`].
    pub fn new() -> Self {
        Self::with_key(StateKey::new(COUNTER_KEY))
    }

    /// A counter over the given key.
    ///
    /// Counters with distinct keys are fully independent.
    pub fn with_key(key: StateKey) -> Self {
        Counter { key }
    }

    /// Read the value of the counter. A key that has never been written
    /// reads as 0.
    pub fn value(&self, state: &State) -> Result<u64, StateError> {
        state.read_u64(&self.key)
    }

    /// Increment the value of the counter by 1 and return the new value.
    ///
    /// Incrementing past [`u64::MAX`] fails with [`StateError::Overflow`]
    /// rather than wrapping: callers relying on the values being unique are
    /// never handed a repeated 0.
    pub fn inc(&self, state: &mut StateMut) -> Result<u64, StateError> {
        let value = state.read_u64(&self.key)?;
        let value = value.checked_add(1).ok_or(StateError::Overflow)?;
        state.write_u64(&self.key, value)?;
        Ok(value)
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

impl Contract for Counter {
    fn query(
        &self,
        state: &State,
        fn_name: &str,
        buf: &mut [u8],
        arg_len: u32,
    ) -> Result<u32, CallError> {
        match fn_name {
            "value" => wrap_query(buf, arg_len, |_: ()| self.value(state)),
            _ => Err(CallError::UnknownFunction),
        }
    }

    fn transact(
        &mut self,
        state: &mut StateMut,
        fn_name: &str,
        buf: &mut [u8],
        arg_len: u32,
    ) -> Result<u32, CallError> {
        match fn_name {
            "inc" => wrap_transaction(buf, arg_len, |_: ()| self.inc(state)),
            _ => Err(CallError::UnknownFunction),
        }
    }
}
