// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Deterministic host for contracts over a byte-keyed state store.
//!
//! A [`VM`] owns a directory of persisted commits and spawns [`Session`]s.
//! A session holds one store instance and the contracts deployed to it, and
//! dispatches queries and transactions to them one at a time. Committing a
//! session persists the store's contents under a content-derived
//! [`CommitId`], from which later sessions - including ones of a VM opened
//! over the same directory after a restart - can be spawned.

mod commit;
mod error;
mod session;
mod store;
mod util;
mod vm;

pub use commit::CommitId;
pub use error::Error;
pub use session::Session;
pub use store::MemStore;
pub use vm::VM;

// re-exports

pub use granary_uplink::{ContractId, StateKey, Store};
