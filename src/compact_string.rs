//! A compact byte string with small-string optimization.
//!
//! [`CompactString`] stores up to [`INLINE_CAP`] (15) bytes directly
//! inside the value, with no heap allocation. Longer contents spill
//! into a heap buffer whose size is always a power of two, tracked by
//! its *capacity class* (the exponent). The two representations are
//! expressed as an explicit tagged enum; the discriminant is the single
//! source of truth for which form is active, and every operation
//! branches on it before touching length, capacity, or data.
//!
//! ## Examples
//!
//! Short strings stay on the stack, long ones spill to the heap:
//!
//! ```
//! use xstr::CompactString;
//!
//! # fn main() -> Result<(), xstr::AllocError> {
//! let short = CompactString::from_bytes(b"hello")?;
//! assert!(short.is_inline());
//! assert_eq!(short.capacity(), 15);
//!
//! let long = CompactString::from_bytes(b"this does not fit inline")?;
//! assert!(long.is_heap());
//! assert_eq!(long.as_bytes(), b"this does not fit inline");
//! # Ok(())
//! # }
//! ```
//!
//! In-place concatenation and trimming:
//!
//! ```
//! use xstr::CompactString;
//!
//! # fn main() -> Result<(), xstr::AllocError> {
//! let mut s = CompactString::from_bytes(b"\n foobarbar \n\n\n")?;
//! s.trim(b"\n ");
//! assert_eq!(s.as_bytes(), b"foobarbar");
//!
//! let wrap = CompactString::from_bytes(b"((((((")?;
//! let close = CompactString::from_bytes(b"))))))")?;
//! s.concat(&wrap, &close)?;
//! assert_eq!(s.as_bytes(), b"((((((foobarbar))))))");
//! # Ok(())
//! # }
//! ```

use alloc::borrow::Borrow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::hash::Hash;
use core::hash::Hasher;
use core::ops::Deref;
use core::ops::DerefMut;
use core::str;
use core::str::FromStr;

use crate::byte_set::ByteSet;

/// Number of content bytes an inline value can hold.
pub const INLINE_CAP: usize = 15;

/// Largest permitted capacity class. Buffers must stay below
/// `isize::MAX` bytes, so the exponent is capped two below the pointer
/// width.
const MAX_CLASS: u32 = usize::BITS - 2;

/// Error type returned when a `CompactString` cannot obtain the storage
/// it needs.
///
/// Allocation failure is always surfaced to the caller as a recoverable
/// error; no operation treats a failed allocation as success.
///
/// # Example
///
/// ```rust
/// # use xstr::{AllocError, CompactString};
/// let mut s = CompactString::new();
/// let err = s.grow(usize::MAX).unwrap_err();
/// assert_eq!(err, AllocError::CapacityOverflow);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
  /// The allocator could not provide a buffer of the requested size.
  OutOfMemory,
  /// The requested length exceeds the largest representable capacity
  /// class.
  CapacityOverflow,
}

impl fmt::Display for AllocError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AllocError::OutOfMemory => f.write_str("allocation failed"),
      AllocError::CapacityOverflow => {
        f.write_str("requested capacity exceeds the maximum")
      }
    }
  }
}

impl core::error::Error for AllocError {}

/// Inline payload: 15 content bytes plus a control byte counting the
/// free space left. Length is `INLINE_CAP - space_left`. When the value
/// is full, `space_left` is zero and doubles as the null terminator.
#[derive(Clone, Copy)]
struct Inline {
  buf:        [u8; INLINE_CAP],
  space_left: u8,
}

impl Inline {
  const EMPTY: Self = Self {
    buf:        [0; INLINE_CAP],
    space_left: INLINE_CAP as u8,
  };
}

/// Heap payload: an owned buffer of exactly `1 << class` bytes. The
/// last byte of the usable range is reserved so a null terminator
/// always fits; usable capacity is `(1 << class) - 1`.
#[derive(Clone)]
struct Heap {
  buf:   Box<[u8]>,
  len:   usize,
  class: u8,
}

impl Heap {
  #[inline]
  const fn capacity(&self) -> usize {
    (1usize << self.class) - 1
  }
}

#[derive(Clone)]
#[cfg_attr(feature = "is_variant", derive(derive_more::IsVariant))]
enum Repr {
  Inline(Inline),
  Heap(Heap),
}

#[cfg(not(feature = "is_variant"))]
impl Repr {
  const fn is_inline(&self) -> bool {
    matches!(self, Repr::Inline(_))
  }

  const fn is_heap(&self) -> bool {
    matches!(self, Repr::Heap(_))
  }
}

/// A compact byte string: up to 15 bytes inline, heap-allocated beyond
/// that.
///
/// Contents are raw bytes; no encoding is assumed or enforced. The
/// buffer is always null-terminated at exactly `len()` in both forms,
/// and growth never shrinks: once a value has spilled to the heap it
/// stays there for the rest of its lifetime.
///
/// All fallible operations report storage exhaustion as
/// [`AllocError`]; dropping the value (or calling [`release`]) frees
/// any heap buffer exactly once.
///
/// [`release`]: CompactString::release
#[derive(Clone)]
pub struct CompactString {
  repr: Repr,
}

/// Smallest class whose usable capacity `(1 << class) - 1` covers
/// `min_len` content bytes plus the terminator.
fn capacity_class(min_len: usize) -> Result<u32, AllocError> {
  let needed = min_len.checked_add(1).ok_or(AllocError::CapacityOverflow)?;
  let class = if needed.is_power_of_two() {
    needed.ilog2()
  } else {
    needed.ilog2() + 1
  };
  if class > MAX_CLASS {
    return Err(AllocError::CapacityOverflow);
  }
  Ok(class)
}

/// Allocates a zero-filled buffer of `1 << class` bytes, reporting
/// failure instead of aborting.
fn alloc_buffer(class: u32) -> Result<Box<[u8]>, AllocError> {
  let size = 1usize << class;
  let mut buf = Vec::new();
  buf
    .try_reserve_exact(size)
    .map_err(|_| AllocError::OutOfMemory)?;
  buf.resize(size, 0);
  Ok(buf.into_boxed_slice())
}

impl CompactString {
  /// Creates a new, empty `CompactString` in the inline form.
  #[inline]
  pub const fn new() -> Self {
    Self {
      repr: Repr::Inline(Inline::EMPTY),
    }
  }

  /// Creates a `CompactString` holding a copy of `bytes`.
  ///
  /// Contents of 15 bytes or fewer are stored inline; anything longer
  /// is placed in a heap buffer of the smallest sufficient capacity
  /// class.
  pub fn from_bytes(bytes: &[u8]) -> Result<Self, AllocError> {
    if bytes.len() <= INLINE_CAP {
      let mut inline = Inline::EMPTY;
      inline.buf[..bytes.len()].copy_from_slice(bytes);
      inline.space_left = (INLINE_CAP - bytes.len()) as u8;
      return Ok(Self {
        repr: Repr::Inline(inline),
      });
    }

    let class = capacity_class(bytes.len())?;
    let mut buf = alloc_buffer(class)?;
    buf[..bytes.len()].copy_from_slice(bytes);
    Ok(Self {
      repr: Repr::Heap(Heap {
        buf,
        len: bytes.len(),
        class: class as u8,
      }),
    })
  }

  /// Returns the length of the string in bytes.
  #[inline]
  pub const fn len(&self) -> usize {
    match &self.repr {
      Repr::Inline(inline) => INLINE_CAP - inline.space_left as usize,
      Repr::Heap(heap) => heap.len,
    }
  }

  /// Returns `true` if the string is empty.
  #[inline]
  pub const fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns the number of content bytes the current buffer can hold
  /// without reallocating. Always 15 for the inline form and
  /// `2^class - 1` for the heap form.
  #[inline]
  pub const fn capacity(&self) -> usize {
    match &self.repr {
      Repr::Inline(_) => INLINE_CAP,
      Repr::Heap(heap) => heap.capacity(),
    }
  }

  /// Returns `true` if the contents currently live in a heap buffer.
  #[inline]
  pub fn is_heap(&self) -> bool {
    self.repr.is_heap()
  }

  /// Returns `true` if the contents are stored inline.
  #[inline]
  pub fn is_inline(&self) -> bool {
    self.repr.is_inline()
  }

  /// Returns the contents as a byte slice.
  #[inline]
  pub fn as_bytes(&self) -> &[u8] {
    match &self.repr {
      Repr::Inline(inline) => {
        &inline.buf[..INLINE_CAP - inline.space_left as usize]
      }
      Repr::Heap(heap) => &heap.buf[..heap.len],
    }
  }

  /// Returns the contents as a mutable byte slice.
  #[inline]
  pub fn as_bytes_mut(&mut self) -> &mut [u8] {
    match &mut self.repr {
      Repr::Inline(inline) => {
        &mut inline.buf[..INLINE_CAP - inline.space_left as usize]
      }
      Repr::Heap(heap) => &mut heap.buf[..heap.len],
    }
  }

  /// Returns the contents as a `&str` if they are valid UTF-8.
  #[inline]
  pub fn as_str(&self) -> Result<&str, str::Utf8Error> {
    str::from_utf8(self.as_bytes())
  }

  /// Ensures `capacity() >= min_len`, performing at most one
  /// allocation.
  ///
  /// A no-op when the current capacity already suffices. An inline
  /// value whose requested length exceeds 15 converts to the heap form,
  /// carrying its content over; a heap value moves to a larger buffer
  /// of the smallest sufficient capacity class. Growth is never
  /// triggered implicitly by length changes alone.
  pub fn grow(&mut self, min_len: usize) -> Result<(), AllocError> {
    if min_len <= self.capacity() {
      return Ok(());
    }

    let class = capacity_class(min_len)?;
    let mut buf = alloc_buffer(class)?;
    let len = self.len();
    buf[..len].copy_from_slice(self.as_bytes());
    self.repr = Repr::Heap(Heap {
      buf,
      len,
      class: class as u8,
    });
    Ok(())
  }

  /// Resets the string to the empty inline form, freeing the heap
  /// buffer if one is held. Calling this on an already-empty value is
  /// a no-op; the buffer is never freed twice.
  #[inline]
  pub fn release(&mut self) {
    self.repr = Repr::Inline(Inline::EMPTY);
  }

  /// Rewrites `self` as `prefix + self + suffix`.
  ///
  /// When the combined length fits the current capacity the existing
  /// buffer is reused: the present content is shifted right (tail
  /// first, so no byte is overwritten before it has been copied) and
  /// the prefix and suffix are written around it. Otherwise a fresh
  /// buffer of the combined size is assembled and swapped in, dropping
  /// the old one.
  ///
  /// `prefix` and `suffix` may be the same value; neither can alias
  /// `self` (the borrows forbid it), so clone first to concatenate a
  /// string with itself.
  pub fn concat(
    &mut self,
    prefix: &CompactString,
    suffix: &CompactString,
  ) -> Result<(), AllocError> {
    let pre = prefix.as_bytes();
    let suf = suffix.as_bytes();
    let len = self.len();
    let total = len
      .checked_add(pre.len())
      .and_then(|n| n.checked_add(suf.len()))
      .ok_or(AllocError::CapacityOverflow)?;

    if total <= self.capacity() {
      let buf = self.raw_buf_mut();
      buf.copy_within(..len, pre.len());
      buf[..pre.len()].copy_from_slice(pre);
      buf[pre.len() + len..total].copy_from_slice(suf);
      self.set_len(total);
    } else {
      let mut tmp = CompactString::new();
      tmp.grow(total)?;
      let buf = tmp.raw_buf_mut();
      buf[..pre.len()].copy_from_slice(pre);
      buf[pre.len()..pre.len() + len].copy_from_slice(self.as_bytes());
      buf[pre.len() + len..total].copy_from_slice(suf);
      tmp.set_len(total);
      *self = tmp;
    }
    Ok(())
  }

  /// Removes every leading and trailing byte that occurs in `charset`.
  ///
  /// The charset is an unordered byte set, not text; membership is
  /// tested through a [`ByteSet`] built once up front, so the whole
  /// operation is O(`len` + `charset.len()`). An empty charset trims
  /// nothing. The surviving span is shifted to the front of the
  /// existing buffer; trimming never changes the inline/heap form,
  /// only the length. If nothing survives, the result is empty in the
  /// form it already had.
  pub fn trim(&mut self, charset: &[u8]) {
    if charset.is_empty() {
      return;
    }

    let set = ByteSet::from_bytes(charset);
    let bytes = self.as_bytes();
    let start = bytes.iter().position(|b| !set.contains(*b));
    let Some(start) = start else {
      // every byte was a member
      self.set_len(0);
      return;
    };
    // a non-member exists, so the reverse scan finds one too
    let end = bytes
      .iter()
      .rposition(|b| !set.contains(*b))
      .map_or(start, |i| i + 1);

    let buf = self.raw_buf_mut();
    buf.copy_within(start..end, 0);
    self.set_len(end - start);
  }

  /// Makes `self` an equal-valued deep copy of `src`.
  ///
  /// The source buffer is never shared: content is copied into `self`'s
  /// existing buffer when its capacity suffices, or into a freshly
  /// grown one otherwise. A replaced heap buffer is dropped, never
  /// leaked, and later mutation of `src` can never be observed through
  /// `self`.
  pub fn assign(&mut self, src: &CompactString) -> Result<(), AllocError> {
    let src_len = src.len();
    self.grow(src_len)?;
    let buf = self.raw_buf_mut();
    buf[..src_len].copy_from_slice(src.as_bytes());
    self.set_len(src_len);
    Ok(())
  }

  /// Drops the first `count` bytes, shifting the remainder to the
  /// front of the buffer. The form is left unchanged.
  pub(crate) fn consume_prefix(&mut self, count: usize) {
    let len = self.len();
    debug_assert!(count <= len);
    let count = count.min(len);
    let buf = self.raw_buf_mut();
    buf.copy_within(count..len, 0);
    self.set_len(len - count);
  }

  /// Full backing storage of the active form, independent of the
  /// current length: all 15 inline bytes, or the whole `1 << class`
  /// heap buffer.
  fn raw_buf_mut(&mut self) -> &mut [u8] {
    match &mut self.repr {
      Repr::Inline(inline) => &mut inline.buf,
      Repr::Heap(heap) => &mut heap.buf,
    }
  }

  /// Updates the length of the active form and null-terminates the
  /// content, skipping the write when the terminator byte is already
  /// zero. At full inline length the `space_left` byte is the
  /// terminator, so there is nothing to write.
  fn set_len(&mut self, new_len: usize) {
    match &mut self.repr {
      Repr::Inline(inline) => {
        debug_assert!(new_len <= INLINE_CAP);
        inline.space_left = (INLINE_CAP - new_len) as u8;
        if new_len < INLINE_CAP && inline.buf[new_len] != 0 {
          inline.buf[new_len] = 0;
        }
      }
      Repr::Heap(heap) => {
        debug_assert!(new_len <= heap.capacity());
        heap.len = new_len;
        if heap.buf[new_len] != 0 {
          heap.buf[new_len] = 0;
        }
      }
    }
  }
}

impl Default for CompactString {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for CompactString {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?}", String::from_utf8_lossy(self.as_bytes()))
  }
}

impl fmt::Display for CompactString {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", String::from_utf8_lossy(self.as_bytes()))
  }
}

impl Deref for CompactString {
  type Target = [u8];

  #[inline]
  fn deref(&self) -> &[u8] {
    self.as_bytes()
  }
}

impl DerefMut for CompactString {
  #[inline]
  fn deref_mut(&mut self) -> &mut [u8] {
    self.as_bytes_mut()
  }
}

impl AsRef<[u8]> for CompactString {
  #[inline]
  fn as_ref(&self) -> &[u8] {
    self.as_bytes()
  }
}

impl Borrow<[u8]> for CompactString {
  #[inline]
  fn borrow(&self) -> &[u8] {
    self.as_bytes()
  }
}

impl Hash for CompactString {
  #[inline]
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.as_bytes().hash(state);
  }
}

impl PartialEq for CompactString {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl Eq for CompactString {}

impl PartialEq<[u8]> for CompactString {
  #[inline]
  fn eq(&self, other: &[u8]) -> bool {
    self.as_bytes() == other
  }
}

impl PartialEq<&[u8]> for CompactString {
  #[inline]
  fn eq(&self, other: &&[u8]) -> bool {
    self.as_bytes() == *other
  }
}

impl<const N: usize> PartialEq<[u8; N]> for CompactString {
  #[inline]
  fn eq(&self, other: &[u8; N]) -> bool {
    self.as_bytes() == other
  }
}

impl<const N: usize> PartialEq<&[u8; N]> for CompactString {
  #[inline]
  fn eq(&self, other: &&[u8; N]) -> bool {
    self.as_bytes() == *other
  }
}

impl PartialEq<str> for CompactString {
  #[inline]
  fn eq(&self, other: &str) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl PartialEq<&str> for CompactString {
  #[inline]
  fn eq(&self, other: &&str) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl PartialEq<CompactString> for [u8] {
  #[inline]
  fn eq(&self, other: &CompactString) -> bool {
    self == other.as_bytes()
  }
}

impl PartialEq<CompactString> for str {
  #[inline]
  fn eq(&self, other: &CompactString) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl PartialOrd for CompactString {
  #[inline]
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for CompactString {
  #[inline]
  fn cmp(&self, other: &Self) -> Ordering {
    self.as_bytes().cmp(other.as_bytes())
  }
}

impl TryFrom<&[u8]> for CompactString {
  type Error = AllocError;

  #[inline]
  fn try_from(bytes: &[u8]) -> Result<Self, AllocError> {
    Self::from_bytes(bytes)
  }
}

impl TryFrom<&str> for CompactString {
  type Error = AllocError;

  #[inline]
  fn try_from(s: &str) -> Result<Self, AllocError> {
    Self::from_bytes(s.as_bytes())
  }
}

impl FromStr for CompactString {
  type Err = AllocError;

  #[inline]
  fn from_str(s: &str) -> Result<Self, AllocError> {
    Self::from_bytes(s.as_bytes())
  }
}

impl From<CompactString> for Vec<u8> {
  fn from(s: CompactString) -> Self {
    match s.repr {
      Repr::Inline(inline) => {
        inline.buf[..INLINE_CAP - inline.space_left as usize].to_vec()
      }
      Repr::Heap(heap) => {
        let mut vec = heap.buf.into_vec();
        vec.truncate(heap.len);
        vec
      }
    }
  }
}

#[cfg(feature = "serde")]
mod serde_impl {
  use super::*;

  impl serde::Serialize for CompactString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
      S: serde::Serializer,
    {
      serializer.serialize_bytes(self.as_bytes())
    }
  }

  impl<'de> serde::Deserialize<'de> for CompactString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
      D: serde::Deserializer<'de>,
    {
      use serde::de::Error;
      use serde::de::SeqAccess;
      use serde::de::Visitor;

      struct BytesVisitor;

      impl<'de> Visitor<'de> for BytesVisitor {
        type Value = CompactString;

        fn expecting(
          &self,
          formatter: &mut core::fmt::Formatter,
        ) -> core::fmt::Result {
          formatter.write_str("a byte string")
        }

        fn visit_bytes<E: Error>(self, v: &[u8]) -> Result<Self::Value, E> {
          CompactString::from_bytes(v).map_err(E::custom)
        }

        fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
          self.visit_bytes(v.as_bytes())
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
          A: SeqAccess<'de>,
        {
          let mut bytes = Vec::new();
          while let Some(byte) = seq.next_element::<u8>()? {
            bytes.push(byte);
          }
          CompactString::from_bytes(&bytes).map_err(A::Error::custom)
        }
      }

      deserializer.deserialize_byte_buf(BytesVisitor)
    }
  }
}
