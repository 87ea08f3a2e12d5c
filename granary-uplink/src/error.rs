// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fmt::{Display, Formatter};
use std::io;

/// The error possibly returned by a contract accessing host state.
///
/// None of these are recoverable from within a contract: the host aborts the
/// running call and rolls back whatever the call had written.
#[derive(Debug)]
pub enum StateError {
    /// The underlying store operation could not complete.
    StoreUnavailable(io::Error),
    /// The stored bytes are not a valid encoding of the expected value.
    DecodeMismatch,
    /// An arithmetic step would exceed the representable range.
    Overflow,
}

impl Display for StateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::StoreUnavailable(err) => {
                write!(f, "STORE UNAVAILABLE: {err}")
            }
            StateError::DecodeMismatch => write!(f, "DECODE MISMATCH"),
            StateError::Overflow => write!(f, "OVERFLOW"),
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StateError::StoreUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

/// The error returned by a contract call.
#[derive(Debug)]
pub enum CallError {
    /// Host state access failed.
    State(StateError),
    /// The contract exposes no function with the called name.
    UnknownFunction,
}

impl From<StateError> for CallError {
    fn from(err: StateError) -> Self {
        CallError::State(err)
    }
}

impl Display for CallError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CallError::State(err) => Display::fmt(err, f),
            CallError::UnknownFunction => write!(f, "UNKNOWN FUNCTION"),
        }
    }
}

impl std::error::Error for CallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CallError::State(err) => Some(err),
            CallError::UnknownFunction => None,
        }
    }
}
