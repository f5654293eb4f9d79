//! Fixed-capacity bitmap over a sliding window of ordered items.
//!
//! A [`BitmapRange`] tracks which members of a contiguous window
//! `[base, base + N - 1]` are present, one bit per item. Acknowledgement
//! and heartbeat traffic uses it to carry sets of sequence numbers: the
//! caller decides what a set bit means (missing, acknowledged, requested).
//!
//! Storage is an inline array of 32-bit words, so the window capacity is a
//! multiple of 32 chosen at compile time by the `WORDS` parameter (the
//! default, 8 words, gives the 256-bit window the RTPS wire sets use).
//! Word 0 covers offsets 0 through 31 from the base, and within each word
//! the most significant bit carries the smallest offset — the layout of the
//! serialized `SequenceNumberSet` element.

use bytes::{Buf, BufMut};
use core::fmt;
use rtps_codec::{EncodeSize, Error as CodecError, FixedSize, Read, ReadExt, Write};

/// Capability bundle for items a [`BitmapRange`] can track.
///
/// Implementations must behave like points on a line of unit steps:
/// `base.advance(k).offset_from(base) == k` for every `k` the caller keeps
/// within the window. Overflow outside that contract is the caller's
/// responsibility.
pub trait Ordinal: Copy + Ord + Default {
    /// Returns the item `steps` positions after `self`.
    fn advance(self, steps: u32) -> Self;

    /// Returns the number of unit steps from `base` up to `self`.
    ///
    /// Only defined when `self >= base`.
    fn offset_from(self, base: Self) -> u32;
}

macro_rules! impl_ordinal {
    ($($t:ty),*) => {$(
        impl Ordinal for $t {
            fn advance(self, steps: u32) -> Self {
                self + steps as $t
            }

            fn offset_from(self, base: Self) -> u32 {
                (self - base) as u32
            }
        }
    )*};
}

impl_ordinal!(u32, u64, usize);

/// A window of `32 * WORDS` consecutive items starting at a movable base,
/// with one presence bit per item.
///
/// The watermark `num_bits` is one past the largest offset set since the
/// base was last reset; every bit at or above it is zero. It is not tight:
/// rebasing may leave it above the highest bit still set (see [`Self::max`]).
#[derive(Clone, PartialEq, Eq)]
pub struct BitmapRange<T, const WORDS: usize = 8> {
    /// Item represented by bit 0.
    base: T,

    /// Cached `base + (capacity - 1)`, the inclusive upper bound of the
    /// window.
    range_max: T,

    /// Presence bits, most significant bit of word 0 first.
    bitmap: [u32; WORDS],

    /// Exclusive upper bound on set-bit offsets.
    num_bits: u32,
}

impl<T: Ordinal, const WORDS: usize> BitmapRange<T, WORDS> {
    /// Number of items the window can track.
    pub const CAPACITY: u32 = 32 * WORDS as u32;

    /// Creates an empty range based at `T::default()`.
    pub fn new() -> Self {
        Self::with_base(T::default())
    }

    /// Creates an empty range with the given base.
    pub fn with_base(base: T) -> Self {
        Self {
            base,
            range_max: base.advance(Self::CAPACITY - 1),
            bitmap: [0; WORDS],
            num_bits: 0,
        }
    }

    /// Returns the item represented by bit 0.
    #[inline]
    pub fn base(&self) -> T {
        self.base
    }

    /// Returns true if no bit is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_bits == 0
    }

    /// Returns the item at the watermark, `base + (num_bits - 1)`, or `None`
    /// when the range is empty.
    ///
    /// This is an upper bound, not necessarily a member: rebasing can leave
    /// the watermark above the highest set bit. Callers needing the exact
    /// highest member must take the last item of [`Self::iter`].
    pub fn max(&self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        Some(self.base.advance(self.num_bits - 1))
    }

    /// Resets the range: new base, all bits cleared.
    pub fn set_base(&mut self, base: T) {
        self.base = base;
        self.range_max = base.advance(Self::CAPACITY - 1);
        self.bitmap = [0; WORDS];
        self.num_bits = 0;
    }

    /// Records `item` if it lies inside the window.
    ///
    /// Returns false (leaving the range untouched) when `item` is outside
    /// `[base, base + capacity - 1]`. Recording an already-present item is a
    /// no-op.
    pub fn add(&mut self, item: T) -> bool {
        if item < self.base || item > self.range_max {
            return false;
        }
        let offset = item.offset_from(self.base);
        self.num_bits = self.num_bits.max(offset + 1);
        self.bitmap[(offset >> 5) as usize] |= 1 << (31 - (offset & 31));
        true
    }

    /// Returns true if `item` is inside the window and its bit is set.
    pub fn contains(&self, item: T) -> bool {
        if item < self.base || item > self.range_max {
            return false;
        }
        let offset = item.offset_from(self.base);
        if offset >= self.num_bits {
            return false;
        }
        self.bitmap[(offset >> 5) as usize] & (1 << (31 - (offset & 31))) != 0
    }

    /// Returns the watermark and the prefix of words it covers, for
    /// serialization.
    ///
    /// The slice holds `ceil(num_bits / 32)` words; it is empty when the
    /// range is.
    pub fn bitmap_get(&self) -> (u32, &[u32]) {
        let used = self.num_bits.div_ceil(32) as usize;
        (self.num_bits, &self.bitmap[..used])
    }

    /// Overwrites the bits from deserialized state, keeping the base.
    ///
    /// `num_bits` is clamped to the capacity; `ceil(num_bits / 32)` words
    /// are copied from `words` and the remainder zeroed. Bits inside the
    /// last copied word at offsets past `num_bits` are kept exactly as
    /// supplied, matching the wire contract.
    ///
    /// # Panics
    ///
    /// Panics if `words` holds fewer than `ceil(num_bits / 32)` entries.
    pub fn bitmap_set(&mut self, num_bits: u32, words: &[u32]) {
        self.num_bits = num_bits.min(Self::CAPACITY);
        let used = self.num_bits.div_ceil(32) as usize;
        self.bitmap[..used].copy_from_slice(&words[..used]);
        self.bitmap[used..].fill(0);
    }

    /// Moves the base while keeping bits for items inside the new window.
    ///
    /// Bits falling outside the new window are dropped; newly covered
    /// positions start cleared. Moving the base forward past every set bit,
    /// or backward by the whole capacity, empties the range.
    pub fn base_update(&mut self, base: T) {
        if base == self.base {
            return;
        }

        if base > self.base {
            let shift = base.offset_from(self.base);
            self.shift_left(shift);
        } else {
            let shift = self.base.offset_from(base);
            self.shift_right(shift);
        }

        self.base = base;
        self.range_max = base.advance(Self::CAPACITY - 1);
    }

    /// Creates an iterator over the recorded items, in ascending order.
    pub fn iter(&self) -> Iter<'_, T, WORDS> {
        let words = self.num_bits.div_ceil(32) as usize;
        Iter {
            range: self,
            word: 0,
            bits: if words > 0 { self.bitmap[0] } else { 0 },
            words,
        }
    }

    /// Shifts every bit toward smaller offsets, dropping the first `shift`
    /// offsets from the window.
    fn shift_left(&mut self, shift: u32) {
        if shift >= self.num_bits {
            // Shifting past the watermark clears everything.
            self.bitmap = [0; WORDS];
            self.num_bits = 0;
            return;
        }
        self.num_bits -= shift;

        let words = (shift >> 5) as usize;
        let bits = shift & 31;
        if bits == 0 {
            // Word-aligned: move whole words down.
            self.bitmap.copy_within(words.., 0);
        } else {
            // Each destination word takes the high part of one source word
            // and the spill of the next. The last source word has no next.
            let spill = 32 - bits;
            let last = WORDS - 1;
            for d in 0..last - words {
                self.bitmap[d] =
                    (self.bitmap[d + words] << bits) | (self.bitmap[d + words + 1] >> spill);
            }
            self.bitmap[last - words] = self.bitmap[last] << bits;
        }
        self.bitmap[WORDS - words..].fill(0);
    }

    /// Shifts every bit toward larger offsets, prepending `shift` cleared
    /// offsets; bits pushed past the capacity are dropped.
    fn shift_right(&mut self, shift: u32) {
        if shift >= Self::CAPACITY {
            self.bitmap = [0; WORDS];
            self.num_bits = 0;
            return;
        }

        // If the watermark would pass the capacity, bits are about to drop
        // off the top and the new watermark must be rescanned afterwards.
        let tentative = self.num_bits + shift;
        let rescan = tentative > Self::CAPACITY;

        let words = (shift >> 5) as usize;
        let bits = shift & 31;
        if bits == 0 {
            // Word-aligned: move whole words up.
            self.bitmap.copy_within(..WORDS - words, words);
        } else {
            // Walk destinations from the top so sources are read before
            // they are overwritten. The first source word has no previous.
            let spill = 32 - bits;
            for d in ((words + 1)..WORDS).rev() {
                self.bitmap[d] =
                    (self.bitmap[d - words] >> bits) | (self.bitmap[d - words - 1] << spill);
            }
            self.bitmap[words] = self.bitmap[0] >> bits;
        }
        self.bitmap[..words].fill(0);

        self.num_bits = if rescan {
            // Tight watermark: lowest set bit of the highest non-zero word.
            let mut num_bits = 0;
            for i in (words..WORDS).rev() {
                let word = self.bitmap[i];
                if word != 0 {
                    num_bits = 32 * i as u32 + (31 - word.trailing_zeros()) + 1;
                    break;
                }
            }
            num_bits
        } else {
            tentative
        };
    }
}

impl<T: Ordinal, const WORDS: usize> Default for BitmapRange<T, WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ordinal + fmt::Debug, const WORDS: usize> fmt::Debug for BitmapRange<T, WORDS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitmapRange(base={:?}, bits={}, ", self.base, self.num_bits)?;
        f.debug_list().entries(self.iter()).finish()?;
        f.write_str(")")
    }
}

impl<'a, T: Ordinal, const WORDS: usize> IntoIterator for &'a BitmapRange<T, WORDS> {
    type Item = T;
    type IntoIter = Iter<'a, T, WORDS>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the items recorded in a [`BitmapRange`], ascending.
///
/// Finds each item with a leading-zero count on the current word, so a word
/// costs one step per set bit rather than one per position.
pub struct Iter<'a, T, const WORDS: usize> {
    range: &'a BitmapRange<T, WORDS>,
    word: usize,
    bits: u32,
    words: usize,
}

impl<T: Ordinal, const WORDS: usize> Iterator for Iter<'_, T, WORDS> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        while self.bits == 0 {
            self.word += 1;
            if self.word >= self.words {
                return None;
            }
            self.bits = self.range.bitmap[self.word];
        }

        // The highest set bit is the smallest remaining offset in the word.
        let lead = self.bits.leading_zeros();
        self.bits &= !(1 << (31 - lead));
        Some(self.range.base.advance(32 * self.word as u32 + lead))
    }
}

// Wire layout of the set elements: base, then the watermark as `numBits`,
// then the `ceil(numBits / 32)` words it covers.

impl<T: Ordinal + Write, const WORDS: usize> Write for BitmapRange<T, WORDS> {
    fn write(&self, buf: &mut impl BufMut) {
        let (num_bits, words) = self.bitmap_get();
        self.base.write(buf);
        num_bits.write(buf);
        for word in words {
            word.write(buf);
        }
    }
}

impl<T: Ordinal + EncodeSize, const WORDS: usize> EncodeSize for BitmapRange<T, WORDS> {
    fn encode_size(&self) -> usize {
        let used = self.num_bits.div_ceil(32) as usize;
        self.base.encode_size() + u32::SIZE + used * u32::SIZE
    }
}

impl<T: Ordinal + Read<Cfg = ()>, const WORDS: usize> Read for BitmapRange<T, WORDS> {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let base = T::read(buf)?;
        let num_bits = u32::read(buf)?;
        if num_bits > Self::CAPACITY {
            return Err(CodecError::InvalidLength(num_bits as usize));
        }

        let mut range = Self::with_base(base);
        range.num_bits = num_bits;
        let used = num_bits.div_ceil(32) as usize;
        for word in &mut range.bitmap[..used] {
            *word = u32::read(buf)?;
        }
        Ok(range)
    }
}
