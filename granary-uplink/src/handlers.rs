// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use bytecheck::CheckBytes;
use rkyv::ser::serializers::{
    BufferScratch, BufferSerializer, CompositeSerializer,
};
use rkyv::ser::Serializer;
use rkyv::validation::validators::DefaultValidator;
use rkyv::{
    check_archived_root, Archive, Deserialize, Infallible, Serialize,
};

use crate::{CallError, StandardBufSerializer, StateError, SCRATCH_BUF_BYTES};

/// Wrap a query with its respective (de)serializers.
///
/// Returns the length of the result written to the buffer.
pub fn wrap_query<A, R, F>(
    buf: &mut [u8],
    arg_len: u32,
    f: F,
) -> Result<u32, CallError>
where
    A: Archive,
    A::Archived: Deserialize<A, Infallible>
        + for<'a> CheckBytes<DefaultValidator<'a>>,
    R: for<'a> Serialize<StandardBufSerializer<'a>>,
    F: FnOnce(A) -> Result<R, StateError>,
{
    let slice = &buf[..arg_len as usize];
    let aa: &A::Archived = check_archived_root::<A>(slice)
        .expect("the host serializes the arguments it passes");
    let a: A = aa.deserialize(&mut Infallible).expect("infallible");

    let ret = f(a)?;

    let mut sbuf = [0u8; SCRATCH_BUF_BYTES];
    let scratch = BufferScratch::new(&mut sbuf);
    let ser = BufferSerializer::new(buf);
    let mut composite =
        CompositeSerializer::new(ser, scratch, rkyv::Infallible);
    composite.serialize_value(&ret).expect("infallible");

    Ok(composite.pos() as u32)
}

/// Wrap a transaction with its respective (de)serializers.
///
/// Returns the length of the result written to the buffer.
pub fn wrap_transaction<A, R, F>(
    buf: &mut [u8],
    arg_len: u32,
    f: F,
) -> Result<u32, CallError>
where
    A: Archive,
    A::Archived: Deserialize<A, Infallible>
        + for<'a> CheckBytes<DefaultValidator<'a>>,
    R: for<'a> Serialize<StandardBufSerializer<'a>>,
    F: FnOnce(A) -> Result<R, StateError>,
{
    let slice = &buf[..arg_len as usize];
    let aa: &A::Archived = check_archived_root::<A>(slice)
        .expect("the host serializes the arguments it passes");
    let a: A = aa.deserialize(&mut Infallible).expect("infallible");

    let ret = f(a)?;

    let mut sbuf = [0u8; SCRATCH_BUF_BYTES];
    let scratch = BufferScratch::new(&mut sbuf);
    let ser = BufferSerializer::new(buf);
    let mut composite =
        CompositeSerializer::new(ser, scratch, rkyv::Infallible);
    composite.serialize_value(&ret).expect("infallible");

    Ok(composite.pos() as u32)
}
