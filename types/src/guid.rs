//! Globally unique identifiers for RTPS entities.
//!
//! A [`Guid`] names one endpoint: the [`GuidPrefix`] is shared by every
//! entity of a participant, and the [`EntityId`] distinguishes entities
//! within it.

use bytes::{Buf, BufMut};
use core::fmt::{Debug, Formatter};
use rtps_codec::{Error as CodecError, FixedSize, Read, ReadExt, Write};

// Identifiers read best as flat hex.
macro_rules! fmt_hex {
    () => {
        fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
            for byte in &self.0 {
                write!(f, "{byte:02x}")?;
            }
            Ok(())
        }
    };
}

/// 12-byte participant prefix.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GuidPrefix([u8; 12]);

impl GuidPrefix {
    /// Prefix of an unknown participant.
    pub const UNKNOWN: Self = Self([0; 12]);

    pub const fn new(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }
}

impl Write for GuidPrefix {
    fn write(&self, buf: &mut impl BufMut) {
        self.0.write(buf);
    }
}

impl Read for GuidPrefix {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        <[u8; 12]>::read(buf).map(Self)
    }
}

impl FixedSize for GuidPrefix {
    const SIZE: usize = 12;
}

impl Debug for GuidPrefix {
    fmt_hex!();
}

/// 4-byte entity identifier, scoped to a participant.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EntityId([u8; 4]);

impl EntityId {
    /// Identifier of an unknown entity.
    pub const UNKNOWN: Self = Self([0; 4]);

    /// Built-in identifier of the participant itself.
    pub const PARTICIPANT: Self = Self([0x00, 0x00, 0x01, 0xc1]);

    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl Write for EntityId {
    fn write(&self, buf: &mut impl BufMut) {
        self.0.write(buf);
    }
}

impl Read for EntityId {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        <[u8; 4]>::read(buf).map(Self)
    }
}

impl FixedSize for EntityId {
    const SIZE: usize = 4;
}

impl Debug for EntityId {
    fmt_hex!();
}

/// Globally unique entity identifier: participant prefix plus entity id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Guid {
    pub prefix: GuidPrefix,
    pub entity_id: EntityId,
}

impl Guid {
    /// The unknown GUID.
    pub const UNKNOWN: Self = Self {
        prefix: GuidPrefix::UNKNOWN,
        entity_id: EntityId::UNKNOWN,
    };

    pub const fn new(prefix: GuidPrefix, entity_id: EntityId) -> Self {
        Self { prefix, entity_id }
    }
}

impl Write for Guid {
    fn write(&self, buf: &mut impl BufMut) {
        self.prefix.write(buf);
        self.entity_id.write(buf);
    }
}

impl Read for Guid {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let prefix = GuidPrefix::read(buf)?;
        let entity_id = EntityId::read(buf)?;
        Ok(Self { prefix, entity_id })
    }
}

impl FixedSize for Guid {
    const SIZE: usize = GuidPrefix::SIZE + EntityId::SIZE;
}

impl Debug for Guid {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}|{:?}", self.prefix, self.entity_id)
    }
}
