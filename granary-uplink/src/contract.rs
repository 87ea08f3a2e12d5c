// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use crate::{CallError, State, StateMut};

/// A contract deployable to a session of the host.
///
/// Both methods receive the function name the host was asked to call, the
/// argument buffer with `arg_len` bytes of serialized argument in it, and a
/// handle to the host store. They return the number of bytes of serialized
/// return value they wrote back into the buffer - [`wrap_query`] and
/// [`wrap_transaction`] produce that number from a plain closure.
///
/// [`wrap_query`]: crate::wrap_query
/// [`wrap_transaction`]: crate::wrap_transaction
pub trait Contract {
    /// Execute the read-only function `fn_name`.
    ///
    /// Queries cannot write: the [`State`] handle exposes no mutation, so a
    /// query leaves the store exactly as it found it.
    fn query(
        &self,
        state: &State,
        fn_name: &str,
        buf: &mut [u8],
        arg_len: u32,
    ) -> Result<u32, CallError>;

    /// Execute the state-mutating function `fn_name`.
    ///
    /// If this returns an error the host discards every write the call made.
    fn transact(
        &mut self,
        state: &mut StateMut,
        fn_name: &str,
        buf: &mut [u8],
        arg_len: u32,
    ) -> Result<u32, CallError>;
}
