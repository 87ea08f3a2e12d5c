// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use counter::{Counter, COUNTER_KEY};
use granary::{Error, MemStore, StateKey, Store, VM};

#[test]
fn counter_initial_value() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let mut session = vm.session();

    let id = session.deploy("counter", Counter::new());

    assert_eq!(session.query::<(), u64>(id, "value", ())?, 0);

    Ok(())
}

#[test]
fn counter_increment() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let mut session = vm.session();

    let id = session.deploy("counter", Counter::new());

    assert_eq!(session.transact::<(), u64>(id, "inc", ())?, 1);
    assert_eq!(session.query::<(), u64>(id, "value", ())?, 1);

    assert_eq!(session.transact::<(), u64>(id, "inc", ())?, 2);
    assert_eq!(session.query::<(), u64>(id, "value", ())?, 2);

    Ok(())
}

#[test]
fn counter_monotonic_sequence() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let mut session = vm.session();

    let id = session.deploy("counter", Counter::new());

    for expected in 1..=1000u64 {
        assert_eq!(session.transact::<(), u64>(id, "inc", ())?, expected);
    }
    assert_eq!(session.query::<(), u64>(id, "value", ())?, 1000);

    Ok(())
}

#[test]
fn counter_read_is_idempotent() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let mut session = vm.session();

    let id = session.deploy("counter", Counter::new());

    session.transact::<(), u64>(id, "inc", ())?;

    let first = session.query::<(), u64>(id, "value", ())?;
    let second = session.query::<(), u64>(id, "value", ())?;
    let third = session.query::<(), u64>(id, "value", ())?;

    assert_eq!(first, 1);
    assert_eq!(first, second);
    assert_eq!(second, third);

    Ok(())
}

#[test]
fn counters_with_distinct_keys_are_independent() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let mut session = vm.session();

    let left = session.deploy("counter", Counter::new());
    let right = session.deploy(
        "counter_aux",
        Counter::with_key(StateKey::new(&b"AUX_COUNTER_KEY"[..])),
    );

    session.transact::<(), u64>(left, "inc", ())?;
    session.transact::<(), u64>(left, "inc", ())?;
    session.transact::<(), u64>(right, "inc", ())?;

    assert_eq!(session.query::<(), u64>(left, "value", ())?, 2);
    assert_eq!(session.query::<(), u64>(right, "value", ())?, 1);

    Ok(())
}

#[test]
fn counter_reads_seeded_values_exactly() -> Result<(), Error> {
    for seeded in [0u64, 1, 42, u64::MAX] {
        let vm = VM::ephemeral()?;

        let mut store = MemStore::new();
        store
            .put(COUNTER_KEY, &seeded.to_le_bytes())
            .expect("in-memory put cannot fail");

        let mut session = vm.session_with_store(store);
        let id = session.deploy("counter", Counter::new());

        assert_eq!(session.query::<(), u64>(id, "value", ())?, seeded);
    }

    Ok(())
}

#[test]
fn counter_overflow_is_signaled() -> Result<(), Error> {
    let vm = VM::ephemeral()?;

    let mut store = MemStore::new();
    store
        .put(COUNTER_KEY, &u64::MAX.to_le_bytes())
        .expect("in-memory put cannot fail");

    let mut session = vm.session_with_store(store);
    let id = session.deploy("counter", Counter::new());

    match session.transact::<(), u64>(id, "inc", ()) {
        Err(Error::Overflow) => (),
        other => panic!("incrementing at the maximum should overflow, got {other:?}"),
    }

    // The failed increment must not have touched the stored value, and in
    // particular must not have wrapped it to 0.
    assert_eq!(session.query::<(), u64>(id, "value", ())?, u64::MAX);

    Ok(())
}

#[test]
fn counter_rejects_corrupt_values() -> Result<(), Error> {
    let vm = VM::ephemeral()?;

    let mut store = MemStore::new();
    store
        .put(COUNTER_KEY, b"junk")
        .expect("in-memory put cannot fail");

    let mut session = vm.session_with_store(store);
    let id = session.deploy("counter", Counter::new());

    match session.query::<(), u64>(id, "value", ()) {
        Err(Error::DecodeMismatch) => (),
        other => panic!("corrupt bytes should fail decoding, got {other:?}"),
    }

    Ok(())
}

#[test]
fn counter_unknown_function() -> Result<(), Error> {
    let vm = VM::ephemeral()?;
    let mut session = vm.session();

    let id = session.deploy("counter", Counter::new());

    match session.query::<(), u64>(id, "frobnicate", ()) {
        Err(Error::UnknownFunction(name)) => assert_eq!(name, "frobnicate"),
        other => panic!("expected an unknown function error, got {other:?}"),
    }

    Ok(())
}
