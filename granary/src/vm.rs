// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tempfile::{tempdir, TempDir};

use granary_uplink::Store;

use crate::commit::{self, CommitId};
use crate::session::Session;
use crate::store::MemStore;
use crate::util::read_commits;
use crate::Error::{self, PersistenceError};

struct VMInner {
    base_dir: PathBuf,
    commits: BTreeMap<CommitId, PathBuf>,
    // Keeps an ephemeral VM's directory alive for as long as the VM is.
    _tmpdir: Option<TempDir>,
}

impl VMInner {
    fn new<P>(dir: P) -> Result<Self, Error>
    where
        P: Into<PathBuf>,
    {
        let base_dir = dir.into();
        fs::create_dir_all(&base_dir)
            .map_err(|err| PersistenceError(Arc::new(err)))?;
        let commits = read_commits(&base_dir)?;
        Ok(Self {
            base_dir,
            commits,
            _tmpdir: None,
        })
    }

    fn ephemeral() -> Result<Self, Error> {
        let tmpdir =
            tempdir().map_err(|err| PersistenceError(Arc::new(err)))?;
        Ok(Self {
            base_dir: tmpdir.path().into(),
            commits: BTreeMap::new(),
            _tmpdir: Some(tmpdir),
        })
    }
}

/// The host environment sessions are spawned from.
///
/// A `VM` owns the directory commits are persisted under. Opening a `VM`
/// over a directory a previous instance committed to makes those commits
/// available again.
#[derive(Clone)]
pub struct VM {
    inner: Arc<RwLock<VMInner>>,
}

impl VM {
    /// A VM persisting its commits under the given directory.
    ///
    /// The directory is created if it does not exist, and scanned for
    /// commits persisted by previous instances.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, Error>
    where
        P: Into<PathBuf>,
    {
        Ok(VM {
            inner: Arc::new(RwLock::new(VMInner::new(dir)?)),
        })
    }

    /// A VM persisting its commits under a temporary directory, removed when
    /// the VM is dropped.
    pub fn ephemeral() -> Result<Self, Error> {
        Ok(VM {
            inner: Arc::new(RwLock::new(VMInner::ephemeral()?)),
        })
    }

    /// Spawn a session over a fresh, empty store.
    pub fn session(&self) -> Session {
        Session::new(self.clone(), Box::<MemStore>::default())
    }

    /// Spawn a session over the given store.
    ///
    /// This is the seam through which a caller supplies its own store - a
    /// pre-populated one, or a simulated one injecting failures.
    pub fn session_with_store<S>(&self, store: S) -> Session
    where
        S: Store + 'static,
    {
        Session::new(self.clone(), Box::new(store))
    }

    /// Spawn a session over the store captured by the given commit.
    pub fn session_from(&self, commit: &CommitId) -> Result<Session, Error> {
        let path = self
            .inner
            .read()
            .commits
            .get(commit)
            .cloned()
            .ok_or(Error::CommitDoesNotExist(*commit))?;
        let store = commit::load_commit(&path)?;
        Ok(Session::new(self.clone(), Box::new(store)))
    }

    /// The IDs of all commits this VM knows of.
    pub fn commits(&self) -> Vec<CommitId> {
        self.inner.read().commits.keys().copied().collect()
    }

    pub(crate) fn commit_store(
        &self,
        entries: Vec<(Vec<u8>, Vec<u8>)>,
    ) -> Result<CommitId, Error> {
        let mut guard = self.inner.write();
        let (commit_id, path) = commit::write_commit(&guard.base_dir, entries)?;
        guard.commits.insert(commit_id, path);
        Ok(commit_id)
    }
}

impl core::fmt::Debug for VM {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let guard = self.inner.read();
        f.debug_struct("VM")
            .field("base_dir", &guard.base_dir)
            .field("commits", &guard.commits.keys())
            .finish()
    }
}
