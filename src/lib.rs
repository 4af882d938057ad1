//! # xstr
//!
//! ### Compact byte strings with small-string optimization
//!
//! This crate provides [`CompactString`], a byte-string type that keeps
//! short contents (up to 15 bytes) inline on the stack and spills
//! longer contents into a heap buffer sized to a power of two. The two
//! physical forms live behind one explicit tagged representation, and
//! every operation (growth, concatenation, trimming, assignment,
//! tokenization) branches on that tag before touching length,
//! capacity, or data.
//!
//! ---
//!
//! ## [`CompactString`]
//!
//! The core type. Construction copies the source bytes; operations
//! mutate in place and report storage exhaustion as a recoverable
//! [`AllocError`] instead of aborting.
//!
//! ```rust
//! use xstr::CompactString;
//!
//! # fn main() -> Result<(), xstr::AllocError> {
//! let mut s = CompactString::from_bytes(b"\n foobarbar \n\n\n")?;
//! s.trim(b"\n ");
//! assert_eq!(s.as_bytes(), b"foobarbar");
//! assert!(s.is_inline());
//! # Ok(())
//! # }
//! ```
//!
//! ## [`Tokenizer`]
//!
//! An explicit cursor bound to one target string, splitting it on a
//! byte set. Cursors over different strings are fully independent.
//!
//! ```rust
//! use xstr::{CompactString, Tokenizer};
//!
//! # fn main() -> Result<(), xstr::AllocError> {
//! let mut csv = CompactString::from_bytes(b"a,b,c")?;
//! let fields: Vec<_> =
//!   Tokenizer::new(&mut csv, b",").collect::<Result<_, _>>()?;
//! assert_eq!(fields.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## [`ByteSet`]
//!
//! The 256-bit membership bitmap behind trimming and tokenization,
//! exposed for callers who want to build delimiter sets once and reuse
//! them.
//!
//! ---
//!
//! ## `no_std` Support
//!
//! The crate is `no_std` (with `alloc`) by default, making it suitable
//! for embedded and other resource-constrained environments.
//!
//! ---
//!
//! ## Features
//!
//! - `std`: Enables integration with the Rust standard library. When
//!   disabled, which is the default, the crate operates in `no_std`
//!   mode.
//! - `serde`†: Serialization and deserialization of [`CompactString`]
//!   as a byte sequence via Serde.
//! - `is_variant`†: Derives the representation predicates through
//!   `derive_more` instead of the hand-written fallbacks.
//!
//! > † enabled by default

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;
extern crate core;

pub mod byte_set;
pub mod compact_string;
pub mod tokenizer;

pub use byte_set::*;
pub use compact_string::*;
pub use tokenizer::*;
