// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::io;

use crate::StateError;

/// A byte-keyed store owned by the host.
///
/// The store outlives any single call and is the sole state shared between
/// calls. Contracts never hold one directly; they go through the [`State`]
/// and [`StateMut`] handles the host passes into each call.
///
/// Any [`io::Error`] surfaced here is propagated to the caller unmodified.
/// The host performs no retries: replaying a read-modify-write sequence
/// without transactional guarantees risks applying it twice.
pub trait Store {
    /// Read the bytes stored under `key`, or `None` if the key has never
    /// been written.
    fn get(&self, key: &[u8]) -> io::Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&mut self, key: &[u8], value: &[u8]) -> io::Result<()>;

    /// All entries in ascending key order. This is the canonical form of the
    /// store's contents, and what the host serializes on commit.
    fn entries(&self) -> io::Result<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Replace the entire contents of the store with the given entries.
    fn replace(&mut self, entries: Vec<(Vec<u8>, Vec<u8>)>) -> io::Result<()>;
}

/// A key addressing one value in the host store.
///
/// Keys are explicit handles rather than hidden constants, so independent
/// values - and the tests exercising them - can coexist in one store without
/// collision.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateKey(Vec<u8>);

impl StateKey {
    /// Creates a new [`StateKey`] from the given bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        StateKey(bytes.into())
    }

    /// Returns the bytes that make up the [`StateKey`]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Read-only view of the host store, handed to queries.
///
/// Repeated reads through this handle without an intervening transaction
/// return identical values.
pub struct State<'a> {
    store: &'a dyn Store,
}

impl<'a> State<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        State { store }
    }

    /// Read the bytes stored under `key`, or `None` if absent.
    pub fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StateError> {
        self.store
            .get(key.as_bytes())
            .map_err(StateError::StoreUnavailable)
    }

    /// Read the unsigned 64-bit value stored under `key`.
    ///
    /// An absent key reads as 0. Present bytes that are not a valid encoding
    /// fail with [`StateError::DecodeMismatch`] - they are never coerced to a
    /// default.
    pub fn read_u64(&self, key: &StateKey) -> Result<u64, StateError> {
        match self.get(key)? {
            None => Ok(0),
            Some(bytes) => decode_u64(&bytes),
        }
    }
}

/// Mutable view of the host store, handed to transactions.
pub struct StateMut<'a> {
    store: &'a mut dyn Store,
}

impl<'a> StateMut<'a> {
    pub fn new(store: &'a mut dyn Store) -> Self {
        StateMut { store }
    }

    /// Read the bytes stored under `key`, or `None` if absent.
    pub fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StateError> {
        State::new(&*self.store).get(key)
    }

    /// Read the unsigned 64-bit value stored under `key`, as
    /// [`State::read_u64`].
    pub fn read_u64(&self, key: &StateKey) -> Result<u64, StateError> {
        State::new(&*self.store).read_u64(key)
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn put(
        &mut self,
        key: &StateKey,
        value: &[u8],
    ) -> Result<(), StateError> {
        self.store
            .put(key.as_bytes(), value)
            .map_err(StateError::StoreUnavailable)
    }

    /// Store the unsigned 64-bit `value` under `key`.
    ///
    /// The encoding is the exact inverse of [`State::read_u64`]: the value's
    /// 8 little-endian bytes, nothing more.
    pub fn write_u64(
        &mut self,
        key: &StateKey,
        value: u64,
    ) -> Result<(), StateError> {
        self.put(key, &value.to_le_bytes())
    }
}

fn decode_u64(bytes: &[u8]) -> Result<u64, StateError> {
    let bytes: [u8; 8] =
        bytes.try_into().map_err(|_| StateError::DecodeMismatch)?;
    Ok(u64::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    use rand::Rng;

    #[derive(Default)]
    struct TestStore {
        entries: BTreeMap<Vec<u8>, Vec<u8>>,
    }

    impl Store for TestStore {
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

        fn replace(
            &mut self,
            entries: Vec<(Vec<u8>, Vec<u8>)>,
        ) -> io::Result<()> {
            self.entries = entries.into_iter().collect();
            Ok(())
        }
    }

    #[test]
    fn absent_key_reads_as_zero() {
        let store = TestStore::default();
        let key = StateKey::new(&b"missing"[..]);

        let state = State::new(&store);
        assert_eq!(state.read_u64(&key).expect("read should succeed"), 0);
    }

    #[test]
    fn round_trip_is_exact() {
        let mut store = TestStore::default();
        let key = StateKey::new(&b"value"[..]);

        let mut rng = rand::thread_rng();
        let mut values = vec![0, 1, u64::MAX];
        values.extend((0..64).map(|_| rng.gen::<u64>()));

        for value in values {
            StateMut::new(&mut store)
                .write_u64(&key, value)
                .expect("write should succeed");
            let read = State::new(&store)
                .read_u64(&key)
                .expect("read should succeed");
            assert_eq!(read, value);
        }
    }

    #[test]
    fn short_or_long_bytes_are_a_mismatch() {
        for bytes in [&b""[..], &b"1234567"[..], &b"123456789"[..]] {
            let mut store = TestStore::default();
            let key = StateKey::new(&b"value"[..]);

            StateMut::new(&mut store)
                .put(&key, bytes)
                .expect("put should succeed");

            let err = State::new(&store)
                .read_u64(&key)
                .expect_err("decoding should fail");
            assert!(matches!(err, StateError::DecodeMismatch));
        }
    }

    #[test]
    fn reads_are_idempotent() {
        let mut store = TestStore::default();
        let key = StateKey::new(&b"value"[..]);

        StateMut::new(&mut store)
            .write_u64(&key, 42)
            .expect("write should succeed");

        let state = State::new(&store);
        let first = state.read_u64(&key).expect("read should succeed");
        let second = state.read_u64(&key).expect("read should succeed");
        assert_eq!(first, second);
    }
}
