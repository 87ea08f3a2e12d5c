// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use bytecheck::CheckBytes;
use rkyv::ser::serializers::{
    BufferScratch, BufferSerializer, CompositeSerializer,
};
use rkyv::ser::Serializer;
use rkyv::validation::validators::DefaultValidator;
use rkyv::{check_archived_root, Archive, Deserialize, Infallible, Serialize};

use granary_uplink::{
    CallError, Contract, ContractId, StandardBufSerializer, State, StateMut,
    Store, ARGBUF_LEN, SCRATCH_BUF_BYTES,
};

use crate::commit::CommitId;
use crate::vm::VM;
use crate::Error;

/// A running mutation of a store.
///
/// Sessions are spawned using a [`VM`] instance. Contracts are deployed in
/// the context of a session, and can then be [`query`]ed and [`transact`]ed
/// with. A sequence of transactions may then be [`commit`]ted to, or
/// discarded by simply allowing the session to drop.
///
/// All calls within a session execute strictly one after the other, so a
/// read-modify-write sequence inside a single call can never interleave with
/// another call. Callers that need the same guarantee across sessions must
/// serialize the sessions themselves.
///
/// Commits capture the store only. Contracts are code, not state: a session
/// spawned from a commit deploys its contracts again.
///
/// [`query`]: Session::query
/// [`transact`]: Session::transact
/// [`commit`]: Session::commit
pub struct Session {
    vm: VM,
    contracts: BTreeMap<ContractId, Box<dyn Contract>>,
    store: Box<dyn Store>,
    buffer: ArgBuf,
}

impl Session {
    pub(crate) fn new(vm: VM, store: Box<dyn Store>) -> Self {
        Session {
            vm,
            contracts: BTreeMap::new(),
            store,
            buffer: ArgBuf::new(),
        }
    }

    /// Deploy a contract under the given `name`, returning the ID it is
    /// callable under.
    ///
    /// The ID is derived from the name, so deploying the same name in
    /// another session yields the same ID. Deploying a name twice replaces
    /// the earlier contract.
    pub fn deploy<C>(&mut self, name: &str, contract: C) -> ContractId
    where
        C: Contract + 'static,
    {
        let hash = blake3::hash(name.as_bytes());
        let contract_id = ContractId::from(<[u8; 32]>::from(hash));

        tracing::trace!("deploying contract {contract_id} as {name:?}");
        self.contracts.insert(contract_id, Box::new(contract));

        contract_id
    }

    /// Call the read-only function `fn_name` of the contract `contract`.
    ///
    /// Queries cannot change the store: the contract is handed a read-only
    /// state handle. Repeated queries without an intervening transaction
    /// return identical values.
    pub fn query<A, R>(
        &mut self,
        contract: ContractId,
        fn_name: &str,
        arg: A,
    ) -> Result<R, Error>
    where
        A: for<'b> Serialize<StandardBufSerializer<'b>>,
        R: Archive,
        R::Archived: Deserialize<R, Infallible>
            + for<'b> CheckBytes<DefaultValidator<'b>>,
    {
        let arg_len = write_to_arg_buffer(self.buffer.as_mut_slice(), arg)?;

        let instance = self
            .contracts
            .get(&contract)
            .ok_or(Error::ContractDoesNotExist(contract))?;

        let state = State::new(self.store.as_ref());
        let ret_len = instance
            .query(&state, fn_name, self.buffer.as_mut_slice(), arg_len)
            .map_err(|err| call_error(err, fn_name))?;

        read_from_arg_buffer(&self.buffer.as_mut_slice()[..ret_len as usize])
    }

    /// Call the state-mutating function `fn_name` of the contract
    /// `contract`.
    ///
    /// A transaction either completes and returns, or fails and leaves the
    /// store exactly as it was: the store is checkpointed before the call
    /// and restored if the call errors, so a failed call never results in a
    /// partial write.
    pub fn transact<A, R>(
        &mut self,
        contract: ContractId,
        fn_name: &str,
        arg: A,
    ) -> Result<R, Error>
    where
        A: for<'b> Serialize<StandardBufSerializer<'b>>,
        R: Archive,
        R::Archived: Deserialize<R, Infallible>
            + for<'b> CheckBytes<DefaultValidator<'b>>,
    {
        let checkpoint = self
            .store
            .entries()
            .map_err(|err| Error::StoreUnavailable(Arc::new(err)))?;

        match self.perform_transaction(contract, fn_name, arg) {
            Ok(ret) => Ok(ret),
            Err(err) => {
                tracing::trace!(
                    "transaction {fn_name:?} failed, restoring store"
                );
                if let Err(io) = self.store.replace(checkpoint) {
                    return Err(Error::RollbackFailure {
                        reason: Arc::new(err),
                        io: Arc::new(io),
                    });
                }
                Err(err)
            }
        }
    }

    /// Commit the current contents of the store, returning the ID the state
    /// can be restored under.
    pub fn commit(self) -> Result<CommitId, Error> {
        let entries = self
            .store
            .entries()
            .map_err(|err| Error::StoreUnavailable(Arc::new(err)))?;
        self.vm.commit_store(entries)
    }

    fn perform_transaction<A, R>(
        &mut self,
        contract: ContractId,
        fn_name: &str,
        arg: A,
    ) -> Result<R, Error>
    where
        A: for<'b> Serialize<StandardBufSerializer<'b>>,
        R: Archive,
        R::Archived: Deserialize<R, Infallible>
            + for<'b> CheckBytes<DefaultValidator<'b>>,
    {
        let arg_len = write_to_arg_buffer(self.buffer.as_mut_slice(), arg)?;

        let instance = self
            .contracts
            .get_mut(&contract)
            .ok_or(Error::ContractDoesNotExist(contract))?;

        let mut state = StateMut::new(self.store.as_mut());
        let ret_len = instance
            .transact(&mut state, fn_name, self.buffer.as_mut_slice(), arg_len)
            .map_err(|err| call_error(err, fn_name))?;

        read_from_arg_buffer(&self.buffer.as_mut_slice()[..ret_len as usize])
    }
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("contracts", &self.contracts.keys())
            .finish()
    }
}

fn call_error(err: CallError, fn_name: &str) -> Error {
    match err {
        CallError::State(err) => err.into(),
        CallError::UnknownFunction => {
            Error::UnknownFunction(fn_name.to_string())
        }
    }
}

fn write_to_arg_buffer<A>(buf: &mut [u8], arg: A) -> Result<u32, Error>
where
    A: for<'b> Serialize<StandardBufSerializer<'b>>,
{
    let mut sbuf = [0u8; SCRATCH_BUF_BYTES];
    let scratch = BufferScratch::new(&mut sbuf);
    let ser = BufferSerializer::new(buf);
    let mut composite =
        CompositeSerializer::new(ser, scratch, rkyv::Infallible);

    composite.serialize_value(&arg)?;

    Ok(composite.pos() as u32)
}

fn read_from_arg_buffer<R>(buf: &[u8]) -> Result<R, Error>
where
    R: Archive,
    R::Archived: Deserialize<R, Infallible>
        + for<'b> CheckBytes<DefaultValidator<'b>>,
{
    let ta = check_archived_root::<R>(buf)?;
    let ret = ta.deserialize(&mut Infallible)?;
    Ok(ret)
}

/// The session's argument buffer.
///
/// Backed by `u64`s so that archived roots are 8-byte aligned, which the
/// calling convention requires.
struct ArgBuf {
    words: Box<[u64]>,
}

impl ArgBuf {
    fn new() -> Self {
        ArgBuf {
            words: vec![0u64; ARGBUF_LEN / 8].into_boxed_slice(),
        }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        let ptr = self.words.as_mut_ptr() as *mut u8;
        unsafe { std::slice::from_raw_parts_mut(ptr, ARGBUF_LEN) }
    }
}
