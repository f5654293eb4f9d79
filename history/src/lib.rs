//! Bounded cache of changes exchanged between RTPS readers and writers.
//!
//! A [`HistoryCache`] holds the changes a writer has published (and not yet
//! retired) or a reader has received (and not yet consumed), up to a fixed
//! capacity. Writer caches stamp each added change with the next sequence
//! number; reader caches reject duplicates of a `(writer, sequence)` pair.
//! The cache keeps the minimum and maximum sequence numbers it holds so the
//! protocol layer can build heartbeat and acknowledgement windows without
//! scanning.
//!
//! The cache is a passive value type: the enclosing reader or writer
//! serializes access to it, exactly as it does for the windowed bitmap
//! sets the cache feeds.

use bytes::Bytes;
use rtps_types::{Guid, SequenceNumber};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors returned when adding a change to a [`HistoryCache`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("history full: capacity {0}")]
    Full(usize),
    #[error("duplicate change: sequence {1} from {0:?}")]
    Duplicate(Guid, SequenceNumber),
}

/// Role of the endpoint the cache belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    /// Outgoing history: the cache assigns sequence numbers on add.
    Writer,
    /// Incoming history: the cache rejects duplicate changes.
    Reader,
}

/// Disposition a change communicates about its instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Alive,
    Disposed,
    Unregistered,
}

/// Configuration for a [`HistoryCache`].
#[derive(Clone, Debug)]
pub struct Config {
    /// Role of the owning endpoint.
    pub kind: Kind,
    /// Maximum number of changes retained.
    pub capacity: usize,
}

/// A single change to a data instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheChange {
    pub kind: ChangeKind,
    /// GUID of the writer that produced the change.
    pub writer: Guid,
    /// Position of the change in the writer's stream. Ignored on add for
    /// writer histories, which stamp it themselves.
    pub sequence: SequenceNumber,
    /// Serialized payload.
    pub payload: Bytes,
}

impl CacheChange {
    /// Creates an alive change, sequence to be assigned by a writer history.
    pub fn alive(writer: Guid, payload: Bytes) -> Self {
        Self {
            kind: ChangeKind::Alive,
            writer,
            sequence: SequenceNumber::default(),
            payload,
        }
    }
}

/// Bounded store of [`CacheChange`]s with min/max sequence tracking.
pub struct HistoryCache {
    kind: Kind,
    capacity: usize,
    changes: Vec<CacheChange>,
    /// Last sequence number stamped by a writer history.
    last_sequence: SequenceNumber,
    min: Option<(SequenceNumber, Guid)>,
    max: Option<(SequenceNumber, Guid)>,
}

impl HistoryCache {
    /// Creates an empty cache.
    pub fn new(config: Config) -> Self {
        Self {
            kind: config.kind,
            capacity: config.capacity,
            changes: Vec::with_capacity(config.capacity),
            last_sequence: SequenceNumber::default(),
            min: None,
            max: None,
        }
    }

    /// Adds a change, returning the sequence number it is stored under.
    ///
    /// Writer histories assign the next sequence number, overwriting
    /// whatever the change carried. Reader histories keep the change's own
    /// sequence and reject a `(writer, sequence)` pair already present.
    pub fn add(&mut self, mut change: CacheChange) -> Result<SequenceNumber, Error> {
        if self.changes.len() >= self.capacity {
            warn!(capacity = self.capacity, "rejecting change: history full");
            return Err(Error::Full(self.capacity));
        }

        match self.kind {
            Kind::Writer => {
                self.last_sequence = self.last_sequence.next();
                change.sequence = self.last_sequence;
            }
            Kind::Reader => {
                if self.find(change.writer, change.sequence).is_some() {
                    warn!(
                        sequence = %change.sequence,
                        writer = ?change.writer,
                        "rejecting change: already in history"
                    );
                    return Err(Error::Duplicate(change.writer, change.sequence));
                }
            }
        }

        let sequence = change.sequence;
        debug!(sequence = %sequence, "change added");
        self.changes.push(change);
        self.update_min_max();
        Ok(sequence)
    }

    /// Returns the change for a `(writer, sequence)` pair, if present.
    pub fn get(&self, writer: Guid, sequence: SequenceNumber) -> Option<&CacheChange> {
        self.find(writer, sequence).map(|index| &self.changes[index])
    }

    /// Removes the change for a `(writer, sequence)` pair.
    ///
    /// Returns false when no such change is held.
    pub fn remove(&mut self, writer: Guid, sequence: SequenceNumber) -> bool {
        let Some(index) = self.find(writer, sequence) else {
            return false;
        };
        self.changes.remove(index);
        self.update_min_max();
        debug!(sequence = %sequence, "change removed");
        true
    }

    /// Removes every change. Returns false when the cache was already empty.
    pub fn clear(&mut self) -> bool {
        if self.changes.is_empty() {
            return false;
        }
        self.changes.clear();
        self.update_min_max();
        true
    }

    /// Returns true when the cache has reached its capacity.
    pub fn is_full(&self) -> bool {
        self.changes.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Iterates over the held changes in insertion order.
    pub fn changes(&self) -> impl Iterator<Item = &CacheChange> {
        self.changes.iter()
    }

    /// Smallest held sequence number and the writer that produced it.
    pub fn sequence_min(&self) -> Option<(SequenceNumber, Guid)> {
        self.min
    }

    /// Largest held sequence number and the writer that produced it.
    pub fn sequence_max(&self) -> Option<(SequenceNumber, Guid)> {
        self.max
    }

    fn find(&self, writer: Guid, sequence: SequenceNumber) -> Option<usize> {
        self.changes
            .iter()
            .position(|change| change.sequence == sequence && change.writer == writer)
    }

    fn update_min_max(&mut self) {
        self.min = None;
        self.max = None;
        for change in &self.changes {
            let entry = (change.sequence, change.writer);
            if self.min.is_none_or(|(sequence, _)| change.sequence < sequence) {
                self.min = Some(entry);
            }
            if self.max.is_none_or(|(sequence, _)| change.sequence > sequence) {
                self.max = Some(entry);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtps_types::{EntityId, GuidPrefix};

    fn guid(tag: u8) -> Guid {
        Guid::new(GuidPrefix::new([tag; 12]), EntityId::PARTICIPANT)
    }

    fn writer_cache(capacity: usize) -> HistoryCache {
        HistoryCache::new(Config {
            kind: Kind::Writer,
            capacity,
        })
    }

    fn reader_cache(capacity: usize) -> HistoryCache {
        HistoryCache::new(Config {
            kind: Kind::Reader,
            capacity,
        })
    }

    #[test]
    fn test_writer_assigns_sequences() {
        let mut cache = writer_cache(8);
        let writer = guid(1);

        for expected in 1..=3u64 {
            let sequence = cache
                .add(CacheChange::alive(writer, Bytes::from_static(b"data")))
                .unwrap();
            assert_eq!(sequence, SequenceNumber::new(expected));
        }

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.sequence_min(), Some((SequenceNumber::new(1), writer)));
        assert_eq!(cache.sequence_max(), Some((SequenceNumber::new(3), writer)));
    }

    #[test]
    fn test_writer_overwrites_carried_sequence() {
        let mut cache = writer_cache(8);
        let mut change = CacheChange::alive(guid(1), Bytes::new());
        change.sequence = SequenceNumber::new(999);

        assert_eq!(cache.add(change), Ok(SequenceNumber::new(1)));
    }

    #[test]
    fn test_reader_rejects_duplicates() {
        let mut cache = reader_cache(8);
        let writer = guid(2);

        let mut change = CacheChange::alive(writer, Bytes::new());
        change.sequence = SequenceNumber::new(10);

        assert_eq!(cache.add(change.clone()), Ok(SequenceNumber::new(10)));
        assert_eq!(
            cache.add(change.clone()),
            Err(Error::Duplicate(writer, SequenceNumber::new(10)))
        );

        // Same sequence from a different writer is a distinct change.
        change.writer = guid(3);
        assert_eq!(cache.add(change), Ok(SequenceNumber::new(10)));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_capacity() {
        let mut cache = writer_cache(2);
        let writer = guid(1);

        cache.add(CacheChange::alive(writer, Bytes::new())).unwrap();
        assert!(!cache.is_full());
        cache.add(CacheChange::alive(writer, Bytes::new())).unwrap();
        assert!(cache.is_full());

        assert_eq!(
            cache.add(CacheChange::alive(writer, Bytes::new())),
            Err(Error::Full(2))
        );
        assert_eq!(cache.len(), 2);

        // Removing frees a slot.
        assert!(cache.remove(writer, SequenceNumber::new(1)));
        assert!(!cache.is_full());
        assert_eq!(cache.add(CacheChange::alive(writer, Bytes::new())), Ok(SequenceNumber::new(3)));
    }

    #[test]
    fn test_get_and_remove() {
        let mut cache = reader_cache(8);
        let writer = guid(4);

        let mut change = CacheChange::alive(writer, Bytes::from_static(b"payload"));
        change.sequence = SequenceNumber::new(5);
        cache.add(change.clone()).unwrap();

        assert_eq!(cache.get(writer, SequenceNumber::new(5)), Some(&change));
        assert_eq!(cache.get(writer, SequenceNumber::new(6)), None);
        assert_eq!(cache.get(guid(5), SequenceNumber::new(5)), None);

        assert!(cache.remove(writer, SequenceNumber::new(5)));
        assert!(!cache.remove(writer, SequenceNumber::new(5)));
        assert!(cache.is_empty());
        assert_eq!(cache.get(writer, SequenceNumber::new(5)), None);
    }

    #[test]
    fn test_min_max_across_removals() {
        let mut cache = reader_cache(8);
        let low = guid(1);
        let high = guid(2);

        for (writer, sequence) in [(low, 3u64), (high, 7), (low, 5)] {
            let mut change = CacheChange::alive(writer, Bytes::new());
            change.sequence = SequenceNumber::new(sequence);
            cache.add(change).unwrap();
        }

        assert_eq!(cache.sequence_min(), Some((SequenceNumber::new(3), low)));
        assert_eq!(cache.sequence_max(), Some((SequenceNumber::new(7), high)));

        assert!(cache.remove(high, SequenceNumber::new(7)));
        assert_eq!(cache.sequence_max(), Some((SequenceNumber::new(5), low)));

        assert!(cache.remove(low, SequenceNumber::new(3)));
        assert_eq!(cache.sequence_min(), Some((SequenceNumber::new(5), low)));

        assert!(cache.remove(low, SequenceNumber::new(5)));
        assert_eq!(cache.sequence_min(), None);
        assert_eq!(cache.sequence_max(), None);
    }

    #[test]
    fn test_clear() {
        let mut cache = writer_cache(4);
        assert!(!cache.clear());

        cache.add(CacheChange::alive(guid(1), Bytes::new())).unwrap();
        cache.add(CacheChange::alive(guid(1), Bytes::new())).unwrap();
        assert!(cache.clear());
        assert!(cache.is_empty());
        assert_eq!(cache.sequence_min(), None);

        // Writer numbering continues after a clear.
        assert_eq!(
            cache.add(CacheChange::alive(guid(1), Bytes::new())),
            Ok(SequenceNumber::new(3))
        );
    }

    #[test]
    fn test_changes_iterates_in_insertion_order() {
        let mut cache = writer_cache(4);
        let writer = guid(9);
        for payload in [&b"a"[..], b"b", b"c"] {
            cache
                .add(CacheChange::alive(writer, Bytes::copy_from_slice(payload)))
                .unwrap();
        }

        let payloads: Vec<&[u8]> = cache.changes().map(|c| c.payload.as_ref()).collect();
        assert_eq!(payloads, vec![&b"a"[..], b"b", b"c"]);
    }
}
