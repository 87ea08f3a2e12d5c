// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, io};

use crate::commit::{CommitId, COMMIT_ID_BYTES};
use crate::Error::{self, PersistenceError};

pub fn commit_id_to_name(commit_id: CommitId) -> String {
    format!("{}", ByteArrayWrapper(commit_id.as_bytes()))
}

pub struct ByteArrayWrapper<'a>(pub &'a [u8]);

impl<'a> core::fmt::UpperHex for ByteArrayWrapper<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if f.alternate() {
            write!(f, "0x")?
        }
        for byte in self.0 {
            write!(f, "{:02X}", &byte)?
        }
        Ok(())
    }
}

impl<'a> core::fmt::Display for ByteArrayWrapper<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::UpperHex::fmt(self, f)
    }
}

/// Parse a commit ID from the file name of the given `path`.
///
/// # Panics
/// If the given path doesn't have a final component, or that final component
/// is not valid UTF-8.
fn commit_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<(CommitId, PathBuf), Error> {
    let path = path.as_ref();
    let fname = path
        .file_name()
        .expect("The path must have a final component")
        .to_str()
        .expect("The final path component should be valid UTF-8");
    let commit_id_bytes = hex::decode(fname).ok().ok_or_else(|| {
        PersistenceError(Arc::new(io::Error::new(
            io::ErrorKind::InvalidData,
            "Invalid hex in file name",
        )))
    })?;
    if commit_id_bytes.len() != COMMIT_ID_BYTES {
        return Err(PersistenceError(Arc::new(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Expected file name of length {COMMIT_ID_BYTES}, found {}",
                commit_id_bytes.len()
            ),
        ))));
    }
    let mut bytes = [0u8; COMMIT_ID_BYTES];
    bytes.copy_from_slice(&commit_id_bytes);
    let commit_id = CommitId::from_bytes(bytes);
    Ok((commit_id, path.to_path_buf()))
}

/// Index the commits persisted under `base_dir`.
pub(crate) fn read_commits<P: AsRef<Path>>(
    base_dir: P,
) -> Result<BTreeMap<CommitId, PathBuf>, Error> {
    let base_dir = base_dir.as_ref();

    let mut commits = BTreeMap::new();

    // If the directory doesn't exist, then there are no commits
    if !base_dir.exists() {
        return Ok(commits);
    }

    for entry in fs::read_dir(base_dir)
        .map_err(|err| PersistenceError(Arc::new(err)))?
    {
        let entry = entry.map_err(|err| PersistenceError(Arc::new(err)))?;
        let entry_path = entry.path();
        // Only read if it is a file, otherwise simply ignore
        if entry_path.is_file() {
            let (commit_id, path) = commit_from_path(entry_path)?;
            commits.insert(commit_id, path);
        }
    }

    Ok(commits)
}
