//! Cursor-based tokenization over a byte-set delimiter.
//!
//! A [`Tokenizer`] is bound to exactly one target
//! [`CompactString`](crate::CompactString) at construction time and
//! keeps its delimiter set alongside. Each call to
//! [`next_token`](Tokenizer::next_token) extracts the next maximal run
//! of non-delimiter bytes as an independently owned string and removes
//! the consumed prefix from the live target. There is no shared or
//! process-wide state: any number of cursors over *different* strings
//! can be interleaved freely.
//!
//! ## Examples
//!
//! ```
//! use xstr::{CompactString, Tokenizer};
//!
//! # fn main() -> Result<(), xstr::AllocError> {
//! let mut text = CompactString::from_bytes(b"foobarbar")?;
//! let mut tokens = Tokenizer::new(&mut text, b"r");
//!
//! assert_eq!(tokens.next_token()?.unwrap(), b"fooba");
//! assert_eq!(tokens.next_token()?.unwrap(), b"ba");
//! assert!(tokens.next_token()?.is_none());
//! # Ok(())
//! # }
//! ```

use crate::byte_set::ByteSet;
use crate::compact_string::AllocError;
use crate::compact_string::CompactString;

/// A stateful cursor that splits one `CompactString` on a set of
/// delimiter bytes.
///
/// The target is consumed in place: every extracted token (and the
/// delimiter run that follows it) is removed from the front of the
/// target, so once the cursor reports no more tokens the target is
/// empty. Tokens are owned values; they stay valid after the cursor
/// and the target are gone.
pub struct Tokenizer<'a> {
  target:     &'a mut CompactString,
  delimiters: ByteSet,
}

impl<'a> Tokenizer<'a> {
  /// Creates a cursor over `target`, splitting on every byte that
  /// occurs in `delimiters`.
  ///
  /// An empty delimiter set yields the whole remaining content as a
  /// single token.
  #[inline]
  pub fn new(target: &'a mut CompactString, delimiters: &[u8]) -> Self {
    Self::with_set(target, ByteSet::from_bytes(delimiters))
  }

  /// Creates a cursor over `target` with a prebuilt delimiter set.
  #[inline]
  pub fn with_set(target: &'a mut CompactString, delimiters: ByteSet) -> Self {
    Self { target, delimiters }
  }

  /// Returns the not-yet-consumed content of the target.
  #[inline]
  pub fn remainder(&self) -> &[u8] {
    self.target.as_bytes()
  }

  /// Extracts the next token.
  ///
  /// Skips the leading delimiter run, copies the following maximal run
  /// of non-delimiter bytes into a fresh `CompactString`, and removes
  /// everything up to and including the token's trailing delimiter run
  /// from the target. Returns `Ok(None)` once the target is empty or
  /// holds nothing but delimiters (which are then consumed as well).
  pub fn next_token(&mut self) -> Result<Option<CompactString>, AllocError> {
    let delimiters = self.delimiters;
    let bytes = self.target.as_bytes();
    let len = bytes.len();

    let start = bytes.iter().position(|b| !delimiters.contains(*b));
    let Some(start) = start else {
      if len > 0 {
        self.target.consume_prefix(len);
      }
      return Ok(None);
    };
    let end = bytes[start..]
      .iter()
      .position(|b| delimiters.contains(*b))
      .map_or(bytes.len(), |i| start + i);
    let cut = bytes[end..]
      .iter()
      .position(|b| !delimiters.contains(*b))
      .map_or(bytes.len(), |i| end + i);

    let token = CompactString::from_bytes(&bytes[start..end])?;
    self.target.consume_prefix(cut);
    Ok(Some(token))
  }
}

impl Iterator for Tokenizer<'_> {
  type Item = Result<CompactString, AllocError>;

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    self.next_token().transpose()
  }
}
