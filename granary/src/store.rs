// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::collections::BTreeMap;
use std::io;

use granary_uplink::Store;

/// The host's in-memory store.
///
/// Entries are kept ordered so that [`entries`] is canonical: two stores
/// holding the same data serialize to the same bytes, which is what makes
/// commit IDs content-derived.
///
/// [`entries`]: Store::entries
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(entries: Vec<(Vec<u8>, Vec<u8>)>) -> Self {
        MemStore {
            entries: entries.into_iter().collect(),
        }
    }
}

impl Store for MemStore {
    fn get(&self, key: &[u8]) -> io::Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> io::Result<()> {
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn entries(&self) -> io::Result<Vec<(Vec<u8>, Vec<u8>)>> {
        Ok(self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn replace(&mut self, entries: Vec<(Vec<u8>, Vec<u8>)>) -> io::Result<()> {
        self.entries = entries.into_iter().collect();
        Ok(())
    }
}
