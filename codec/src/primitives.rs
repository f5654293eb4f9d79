//! Wire implementations for primitive types.
//!
//! All multi-byte integers are encoded big-endian (network byte order), the
//! order RTPS submessage elements use unless a submessage flag says otherwise.
//! Host-to-wire conversion happens here; callers always operate on host-order
//! values.

use crate::{Error, FixedSize, Read, Write};
use bytes::{Buf, BufMut};

// Fixed-width unsigned integers.
macro_rules! impl_uint {
    ($t:ty, $get:ident, $put:ident) => {
        impl Write for $t {
            fn write(&self, buf: &mut impl BufMut) {
                buf.$put(*self);
            }
        }

        impl Read for $t {
            type Cfg = ();

            fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
                if buf.remaining() < Self::SIZE {
                    return Err(Error::EndOfBuffer);
                }
                Ok(buf.$get())
            }
        }

        impl FixedSize for $t {
            const SIZE: usize = core::mem::size_of::<$t>();
        }
    };
}

impl_uint!(u8, get_u8, put_u8);
impl_uint!(u16, get_u16, put_u16);
impl_uint!(u32, get_u32, put_u32);
impl_uint!(u64, get_u64, put_u64);

impl Write for bool {
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_u8(*self as u8);
    }
}

impl Read for bool {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        match u8::read_cfg(buf, &())? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(Error::Invalid("bool", "not 0 or 1")),
        }
    }
}

impl FixedSize for bool {
    const SIZE: usize = 1;
}

impl<const N: usize> Write for [u8; N] {
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_slice(self);
    }
}

impl<const N: usize> Read for [u8; N] {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        if buf.remaining() < N {
            return Err(Error::EndOfBuffer);
        }
        let mut out = [0u8; N];
        buf.copy_to_slice(&mut out);
        Ok(out)
    }
}

impl<const N: usize> FixedSize for [u8; N] {
    const SIZE: usize = N;
}
