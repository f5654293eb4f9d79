//! Windowed set elements carried by acknowledgement submessages.
//!
//! ACKNACK carries a [`SequenceNumberSet`] naming the changes a reader is
//! still missing; NACKFRAG carries a [`FragmentNumberSet`] for fragments.
//! Both are a [`BitmapRange`] over a 256-item window, serialized as the
//! base, a 32-bit `numBits`, and the `ceil(numBits / 32)` words covering
//! the watermark.

use crate::bitmap::BitmapRange;
use crate::sequence::{FragmentNumber, SequenceNumber};

/// Set of sequence numbers within a 256-wide window.
pub type SequenceNumberSet = BitmapRange<SequenceNumber, 8>;

/// Set of fragment numbers within a 256-wide window.
pub type FragmentNumberSet = BitmapRange<FragmentNumber, 8>;

#[cfg(test)]
mod tests {
    use super::*;
    use rtps_codec::{DecodeExt, Encode, EncodeSize};

    #[test]
    fn test_sequence_set_roundtrip() {
        let mut set = SequenceNumberSet::with_base(SequenceNumber::new(1000));
        for value in [1000, 1005, 1255] {
            assert!(set.add(SequenceNumber::new(value)));
        }

        let encoded = set.encode();
        // Base (8) + numBits (4) + 8 words.
        assert_eq!(encoded.len(), 8 + 4 + 8 * 4);
        assert_eq!(encoded.len(), set.encode_size());

        let decoded = SequenceNumberSet::decode(encoded.freeze()).unwrap();
        assert_eq!(decoded, set);
        assert_eq!(
            decoded.iter().collect::<Vec<_>>(),
            vec![
                SequenceNumber::new(1000),
                SequenceNumber::new(1005),
                SequenceNumber::new(1255),
            ]
        );
    }

    #[test]
    fn test_sequence_set_wire_prefix() {
        let mut set = SequenceNumberSet::with_base(SequenceNumber::new(2));
        set.add(SequenceNumber::new(2));

        let encoded = set.encode();
        // base high, base low, numBits = 1, one word with its top bit set.
        assert_eq!(
            encoded.as_ref(),
            &[
                0, 0, 0, 0, 0, 0, 0, 2, // base
                0, 0, 0, 1, // numBits
                0x80, 0, 0, 0, // word 0
            ]
        );
    }

    #[test]
    fn test_fragment_set_roundtrip() {
        let mut set = FragmentNumberSet::with_base(FragmentNumber::new(1));
        for value in [1, 2, 66] {
            assert!(set.add(FragmentNumber::new(value)));
        }

        let encoded = set.encode();
        // Base (4) + numBits (4) + 3 words covering offset 65.
        assert_eq!(encoded.len(), 4 + 4 + 3 * 4);

        let decoded = FragmentNumberSet::decode(encoded.freeze()).unwrap();
        assert_eq!(
            decoded.iter().collect::<Vec<_>>(),
            vec![
                FragmentNumber::new(1),
                FragmentNumber::new(2),
                FragmentNumber::new(66),
            ]
        );
    }

    #[test]
    fn test_heartbeat_ack_exchange() {
        // A reader acknowledging up to 999 and requesting 1003 and 1007
        // rebases its window as the writer advances.
        let mut missing = SequenceNumberSet::with_base(SequenceNumber::new(1000));
        missing.add(SequenceNumber::new(1003));
        missing.add(SequenceNumber::new(1007));

        // 1003 arrives; the window slides past it.
        missing.base_update(SequenceNumber::new(1004));
        assert_eq!(
            missing.iter().collect::<Vec<_>>(),
            vec![SequenceNumber::new(1007)]
        );

        let decoded = SequenceNumberSet::decode(missing.encode().freeze()).unwrap();
        assert_eq!(decoded.base(), SequenceNumber::new(1004));
        assert_eq!(
            decoded.iter().collect::<Vec<_>>(),
            vec![SequenceNumber::new(1007)]
        );
    }
}
