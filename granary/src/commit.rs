// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use memmap2::Mmap;
use rkyv::{check_archived_root, Deserialize, Infallible};

use crate::store::MemStore;
use crate::util::{commit_id_to_name, ByteArrayWrapper};
use crate::Error::{self, PersistenceError, RestoreError};

pub const COMMIT_ID_BYTES: usize = 32;

/// The ID of a committed store state.
///
/// Derived from the serialized contents of the store, so two commits of equal
/// contents share an ID.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct CommitId([u8; COMMIT_ID_BYTES]);

impl CommitId {
    /// Creates a new [`CommitId`] from an array of bytes
    pub const fn from_bytes(bytes: [u8; COMMIT_ID_BYTES]) -> Self {
        Self(bytes)
    }

    /// Returns the array of bytes that make up the [`CommitId`]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; COMMIT_ID_BYTES]> for CommitId {
    fn from(bytes: [u8; COMMIT_ID_BYTES]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl core::fmt::Display for CommitId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&ByteArrayWrapper(&self.0), f)
    }
}

type StoreEntries = Vec<(Vec<u8>, Vec<u8>)>;

/// Serialize the given store contents into a file under `base_dir`, named
/// after the hash of the serialized bytes.
pub(crate) fn write_commit(
    base_dir: &Path,
    entries: StoreEntries,
) -> Result<(CommitId, PathBuf), Error> {
    let bytes = rkyv::to_bytes::<_, 4096>(&entries).map_err(|err| {
        Error::CommitError(
            format!("failed to serialize store contents: {err}").into(),
        )
    })?;

    let commit_id = CommitId::from(*blake3::hash(&bytes).as_bytes());
    let path = base_dir.join(commit_id_to_name(commit_id));

    tracing::trace!("persisting commit {commit_id}");
    fs::write(&path, bytes.as_slice())
        .map_err(|err| PersistenceError(Arc::new(err)))?;

    Ok((commit_id, path))
}

/// Map the commit file at `path` and rebuild the store it captured.
pub(crate) fn load_commit(path: &Path) -> Result<MemStore, Error> {
    let file = File::open(path).map_err(|err| RestoreError(Arc::new(err)))?;
    let mmap =
        unsafe { Mmap::map(&file) }.map_err(|err| RestoreError(Arc::new(err)))?;

    tracing::trace!("loading commit from {}", path.display());

    let archived = check_archived_root::<StoreEntries>(&mmap[..])?;
    let entries: StoreEntries = archived.deserialize(&mut Infallible)?;

    Ok(MemStore::from_entries(entries))
}
