//! Reed-Solomon error correction for Data Matrix (ECC 200) symbols.
//!
//! A Data Matrix stores its message as a sequence of 8 bit _codewords_.
//! The data codewords are followed by error codewords computed with a
//! Reed-Solomon code over GF(256), which allows a reader to recover from a
//! limited number of damaged codewords.
//!
//! Larger symbols split their codewords into several interleaved blocks, each
//! an independent Reed-Solomon codeword. The layout of a symbol is described
//! by [SymbolSize].
//!
//! # Example
//!
//! ```rust
//! # use ecc200::{decode, encode, SymbolSize};
//! let size = SymbolSize::Square12;
//! // data codewords followed by space for the error codewords
//! let mut codewords = vec![73, 102, 109, 109, 112, 0, 0, 0, 0, 0, 0, 0];
//! encode(&mut codewords, size).unwrap();
//! assert_eq!(&codewords[5..], &[243, 55, 99, 199, 231, 27, 37]);
//!
//! // damage three codewords, a 12x12 symbol can recover from three errors
//! let original = codewords.clone();
//! codewords[0] = 0;
//! codewords[4] = 0;
//! codewords[9] = 1;
//! assert_eq!(decode(&mut codewords, size, true), Ok(3));
//! assert_eq!(codewords, original);
//! ```
//!
//! Errors which can not be corrected are reported as [ErrorDecodingError]
//! and leave the codewords untouched.
//!
//! # Features
//!
//! - `std`: implement `std::error::Error` for the error types.
//! - `rayon`: encode and decode the blocks of a symbol in parallel.
//!
//! The crate logs through the [log](https://docs.rs/log) facade, decode
//! failures and corrections on the `debug` level.
#![no_std]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod errorcode;
mod symbol_size;

pub use errorcode::{decode, encode, ErrorDecodingError, LayoutError};
pub use symbol_size::SymbolSize;
