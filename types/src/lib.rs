//! Core RTPS protocol types.
//!
//! The building blocks shared by the reader/writer protocol machinery:
//! totally-ordered sequence and fragment numbers, entity GUIDs, and the
//! fixed-capacity [`BitmapRange`] window that backs the `SequenceNumberSet`
//! and `FragmentNumberSet` elements of ACKNACK, NACKFRAG, and HEARTBEAT
//! traffic.
//!
//! Everything here is a passive value type: no allocation after
//! construction, no locking, no syscalls. Callers that share these values
//! across threads wrap them in whatever synchronization their protocol
//! layer uses.

pub mod bitmap;
pub mod guid;
pub mod sequence;
pub mod set;

pub use bitmap::{BitmapRange, Ordinal};
pub use guid::{EntityId, Guid, GuidPrefix};
pub use sequence::{FragmentNumber, SequenceNumber};
pub use set::{FragmentNumberSet, SequenceNumberSet};
