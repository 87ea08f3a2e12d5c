// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::borrow::Cow;
use std::sync::Arc;

use thiserror::Error;

use granary_uplink::{ContractId, StateError};
use rkyv::ser::serializers::{
    BufferSerializerError, CompositeSerializerError, FixedSizeScratchError,
};

use crate::commit::CommitId;

pub type Compo = CompositeSerializerError<
    BufferSerializerError,
    FixedSizeScratchError,
    std::convert::Infallible,
>;

/// The error type returned by the granary host.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Commit error: {0}")]
    CommitError(Cow<'static, str>),
    #[error("Commit does not exist: {0}")]
    CommitDoesNotExist(CommitId),
    #[error(transparent)]
    CompositeSerializerError(Arc<Compo>),
    #[error("Contract does not exist: {0}")]
    ContractDoesNotExist(ContractId),
    #[error("Stored bytes are not a valid encoding of the expected value")]
    DecodeMismatch,
    #[error(transparent)]
    Infallible(std::convert::Infallible),
    #[error("Overflow")]
    Overflow,
    #[error(transparent)]
    PersistenceError(Arc<std::io::Error>),
    #[error(transparent)]
    RestoreError(Arc<std::io::Error>),
    #[error("Rollback failure: {reason} {io}")]
    RollbackFailure {
        reason: Arc<Self>,
        io: Arc<std::io::Error>,
    },
    #[error("Store unavailable: {0}")]
    StoreUnavailable(Arc<std::io::Error>),
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
    #[error("ValidationError")]
    ValidationError,
}

impl From<std::convert::Infallible> for Error {
    fn from(err: std::convert::Infallible) -> Self {
        Self::Infallible(err)
    }
}

impl From<Compo> for Error {
    fn from(err: Compo) -> Self {
        Error::CompositeSerializerError(Arc::from(err))
    }
}

impl<A, B> From<rkyv::validation::CheckArchiveError<A, B>> for Error {
    fn from(_err: rkyv::validation::CheckArchiveError<A, B>) -> Self {
        Error::ValidationError
    }
}

impl From<StateError> for Error {
    fn from(err: StateError) -> Self {
        match err {
            StateError::StoreUnavailable(io) => {
                Error::StoreUnavailable(Arc::new(io))
            }
            StateError::DecodeMismatch => Error::DecodeMismatch,
            StateError::Overflow => Error::Overflow,
        }
    }
}
