// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Build contracts directly on top of the `granary` host.
//!
//! A contract is a type implementing [`Contract`], reading and writing host
//! state exclusively through the [`State`] and [`StateMut`] handles it is
//! given for the duration of a call. Arguments and returns travel through a
//! host-owned argument buffer; [`wrap_query`] and [`wrap_transaction`] take
//! care of the (de)serialization on the contract side.

mod contract;
pub use contract::Contract;

mod error;
pub use error::{CallError, StateError};

mod handlers;
pub use handlers::{wrap_query, wrap_transaction};

mod state;
pub use state::{State, StateKey, StateMut, Store};

mod types;
pub use types::*;

/// How many bytes to use for scratch space when serializing
pub const SCRATCH_BUF_BYTES: usize = 64;

/// The size of the argument buffer in bytes
pub const ARGBUF_LEN: usize = 64 * 1024;
