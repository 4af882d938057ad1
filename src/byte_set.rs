//! A 256-bit byte membership set.
//!
//! [`ByteSet`] answers "is this byte one of these?" in constant time
//! using a 4-word bitmap. It backs the trimming and tokenization
//! operations of [`CompactString`](crate::CompactString), which treat
//! their character sets as unordered collections of raw bytes rather
//! than text.
//!
//! ## Examples
//!
//! ```
//! use xstr::ByteSet;
//!
//! let delims = ByteSet::from_bytes(b"\n ");
//! assert!(delims.contains(b' '));
//! assert!(delims.contains(b'\n'));
//! assert!(!delims.contains(b'f'));
//! ```

use core::fmt;

/// A set of bytes, represented as a 256-bit bitmap.
///
/// Membership tests are branch-free and O(1); building the set from a
/// slice is O(slice length). The set is `Copy` and 32 bytes wide, so it
/// is cheap to pass around and never allocates.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteSet {
  bits: [u64; 4],
}

impl ByteSet {
  /// Creates an empty `ByteSet`.
  #[inline]
  pub const fn new() -> Self {
    Self { bits: [0; 4] }
  }

  /// Creates a `ByteSet` containing every byte that occurs in `bytes`.
  /// Duplicates are harmless.
  pub const fn from_bytes(bytes: &[u8]) -> Self {
    let mut set = Self::new();
    let mut i = 0;
    while i < bytes.len() {
      set.bits[(bytes[i] >> 6) as usize] |= 1 << (bytes[i] & 63);
      i += 1;
    }
    set
  }

  /// Adds `byte` to the set.
  #[inline]
  pub const fn insert(&mut self, byte: u8) {
    self.bits[(byte >> 6) as usize] |= 1 << (byte & 63);
  }

  /// Removes `byte` from the set.
  #[inline]
  pub const fn remove(&mut self, byte: u8) {
    self.bits[(byte >> 6) as usize] &= !(1 << (byte & 63));
  }

  /// Returns `true` if `byte` is a member of the set.
  #[inline]
  pub const fn contains(&self, byte: u8) -> bool {
    self.bits[(byte >> 6) as usize] & (1 << (byte & 63)) != 0
  }

  /// Returns the number of bytes in the set.
  #[inline]
  pub const fn len(&self) -> usize {
    (self.bits[0].count_ones()
      + self.bits[1].count_ones()
      + self.bits[2].count_ones()
      + self.bits[3].count_ones()) as usize
  }

  /// Returns `true` if the set contains no bytes.
  #[inline]
  pub const fn is_empty(&self) -> bool {
    self.bits[0] | self.bits[1] | self.bits[2] | self.bits[3] == 0
  }
}

impl From<&[u8]> for ByteSet {
  #[inline]
  fn from(bytes: &[u8]) -> Self {
    Self::from_bytes(bytes)
  }
}

impl<const N: usize> From<&[u8; N]> for ByteSet {
  #[inline]
  fn from(bytes: &[u8; N]) -> Self {
    Self::from_bytes(bytes)
  }
}

impl FromIterator<u8> for ByteSet {
  fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
    let mut set = Self::new();
    for byte in iter {
      set.insert(byte);
    }
    set
  }
}

impl fmt::Debug for ByteSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set()
      .entries((0..=u8::MAX).filter(|b| self.contains(*b)))
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_set_contains_nothing() {
    let set = ByteSet::new();
    assert!(set.is_empty());
    assert_eq!(set.len(), 0);
    for b in 0..=u8::MAX {
      assert!(!set.contains(b));
    }
  }

  #[test]
  fn from_bytes_and_contains() {
    let set = ByteSet::from_bytes(b"\n ");
    assert!(set.contains(b'\n'));
    assert!(set.contains(b' '));
    assert!(!set.contains(b'f'));
    assert_eq!(set.len(), 2);
  }

  #[test]
  fn duplicates_are_harmless() {
    let set = ByteSet::from_bytes(b"aaaa");
    assert_eq!(set.len(), 1);
    assert!(set.contains(b'a'));
  }

  #[test]
  fn insert_and_remove() {
    let mut set = ByteSet::new();
    set.insert(0);
    set.insert(63);
    set.insert(64);
    set.insert(255);
    assert_eq!(set.len(), 4);
    for b in [0u8, 63, 64, 255] {
      assert!(set.contains(b));
    }
    set.remove(64);
    assert!(!set.contains(64));
    assert_eq!(set.len(), 3);
  }

  #[test]
  fn full_range_round_trip() {
    let all: ByteSet = (0..=u8::MAX).collect();
    assert_eq!(all.len(), 256);
    for b in 0..=u8::MAX {
      assert!(all.contains(b));
    }
  }

  #[test]
  fn debug_lists_members() {
    let set = ByteSet::from_bytes(b"a");
    assert_eq!(format!("{set:?}"), "{97}");
  }
}
