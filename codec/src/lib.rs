//! Serialize RTPS wire elements.
//!
//! A small binary serialization layer for the fixed-width, network-byte-order
//! elements that make up RTPS submessages. Values describe their encoded size
//! up front, write themselves into any [`BufMut`], and read themselves back
//! from untrusted input without panicking.
//!
//! # Example
//!
//! ```
//! use bytes::{Buf, BufMut};
//! use rtps_codec::{Error, FixedSize, Read, ReadExt, Write};
//!
//! #[derive(Debug, PartialEq)]
//! struct Locator {
//!     kind: u32,
//!     port: u32,
//! }
//!
//! impl Write for Locator {
//!     fn write(&self, buf: &mut impl BufMut) {
//!         self.kind.write(buf);
//!         self.port.write(buf);
//!     }
//! }
//!
//! impl Read for Locator {
//!     type Cfg = ();
//!
//!     fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
//!         let kind = u32::read(buf)?;
//!         let port = u32::read(buf)?;
//!         Ok(Self { kind, port })
//!     }
//! }
//!
//! impl FixedSize for Locator {
//!     const SIZE: usize = u32::SIZE + u32::SIZE;
//! }
//! ```

use bytes::{Buf, BufMut, BytesMut};

mod error;
pub use error::Error;
mod primitives;

/// Types that can write themselves into a buffer.
pub trait Write {
    /// Appends the wire representation of `self` to `buf`.
    fn write(&self, buf: &mut impl BufMut);
}

/// Types that know the size of their wire representation.
pub trait EncodeSize {
    /// Returns the number of bytes [`Write::write`] will append.
    fn encode_size(&self) -> usize;
}

/// Types whose wire representation has a constant size.
pub trait FixedSize {
    /// The encoded size, in bytes.
    const SIZE: usize;
}

// Every fixed-size type trivially knows its encoded size.
impl<T: FixedSize> EncodeSize for T {
    fn encode_size(&self) -> usize {
        Self::SIZE
    }
}

/// Convenience trait for encoding a value into a fresh buffer.
pub trait Encode: Write + EncodeSize {
    /// Encodes `self` into a new buffer sized by [`EncodeSize::encode_size`].
    fn encode(&self) -> BytesMut {
        let size = self.encode_size();
        let mut buf = BytesMut::with_capacity(size);
        self.write(&mut buf);
        assert_eq!(buf.len(), size, "encode_size did not match written bytes");
        buf
    }
}

impl<T: Write + EncodeSize> Encode for T {}

/// Types that can read themselves from a buffer of untrusted input.
pub trait Read: Sized {
    /// Configuration supplied by the caller to bound or interpret the read.
    type Cfg;

    /// Reads a value from `buf`, consuming exactly its wire representation.
    fn read_cfg(buf: &mut impl Buf, cfg: &Self::Cfg) -> Result<Self, Error>;
}

/// Ergonomic read method for types requiring no configuration.
pub trait ReadExt: Read<Cfg = ()> {
    /// Reads a value using the default `()` config.
    fn read(buf: &mut impl Buf) -> Result<Self, Error> {
        Self::read_cfg(buf, &())
    }
}

impl<T: Read<Cfg = ()>> ReadExt for T {}

/// Convenience trait for decoding a value from a buffer that must be fully
/// consumed.
pub trait Decode: Read {
    /// Decodes a value, returning [`Error::ExtraData`] if bytes remain.
    fn decode_cfg(buf: impl Buf, cfg: &Self::Cfg) -> Result<Self, Error> {
        let mut buf = buf;
        let value = Self::read_cfg(&mut buf, cfg)?;
        let remaining = buf.remaining();
        if remaining > 0 {
            return Err(Error::ExtraData(remaining));
        }
        Ok(value)
    }
}

impl<T: Read> Decode for T {}

/// Ergonomic decode method for types requiring no configuration.
pub trait DecodeExt: Decode<Cfg = ()> {
    /// Decodes a value using the default `()` config.
    fn decode(buf: impl Buf) -> Result<Self, Error> {
        Self::decode_cfg(buf, &())
    }
}

impl<T: Decode<Cfg = ()>> DecodeExt for T {}
