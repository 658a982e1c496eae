//! Reed-Solomon error correction codes.
//!
//! The error correction in a Data Matrix is done using Reed-Solomon codes.
//!
//! Assuming you have never heard of coding theory: By putting some redundancy
//! into the Data Matrix one can recover from, say, detection or printing errors
//! when trying to read a Data Matrix. A clever way to add redundancy
//! is the Reed-Solomon code. The details are relatively
//! math heavy and involve, for example, "higher" algebra (Galois fields).
//! Any book about coding theory should cover it, for example
//! "Error Correction Coding: Mathematical Methods and Algorithms" by Moon.
//!
//! There is only one way to compute the error code (called _encoding_). It is
//! a polynomial division by the generator polynomial, implemented as a shift
//! register. The code is _systematic_: the data codewords are sent unchanged
//! and followed by the error codewords.
//!
//! For error correction (called _decoding_) this module implements a classic
//! syndrome based decoder made of four steps:
//!
//! 1. Compute the syndrome values. If all are zero, there is nothing to do.
//! 2. Compute the error locator polynomial with the Berlekamp-Massey algorithm.
//! 3. Find its roots with a Chien search, they give the error locations.
//! 4. Compute the error values with Forney's algorithm.
//!
//! A block with `t` error codewords can recover from up to `t / 2` corrupted
//! codewords. Whenever a block has more errors than that and the decoder can tell,
//! the whole decode fails and the codewords are left untouched.
mod decoding;
mod galois;
mod generator;
mod interleave;

use alloc::{vec, vec::Vec};

use arrayvec::ArrayVec;
use log::trace;
use thiserror::Error;

use crate::symbol_size::{BlockSetup, SymbolSize};
use galois::GF;
use generator::generator;
use interleave::BlockLayout;

pub use decoding::{decode, decode_block, ErrorDecodingError};
pub use generator::generator_polynomial;

/// Largest number of error codewords in one block (Square48, Square96, Square120).
pub const MAX_ERROR_WORDS: usize = 68;

/// Largest number of codewords in one block, the number of non-zero
/// elements of GF(256).
pub const MAX_BLOCK_LEN: usize = 255;

/// The codewords handed to the encoder or decoder do not have the
/// expected shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("number of error codewords must be in 1..=68, got {0}")]
    ParityCount(usize),
    #[error("a block of {len} codewords cannot carry {parity} error codewords")]
    BlockLength { len: usize, parity: usize },
    #[error("expected {expected} codewords for the symbol, got {actual}")]
    CodewordCount { expected: usize, actual: usize },
}

/// Check that a single block of `len` codewords with `parity` error codewords is valid.
fn check_block_shape(len: usize, parity: usize) -> Result<(), LayoutError> {
    if parity == 0 || parity > MAX_ERROR_WORDS {
        return Err(LayoutError::ParityCount(parity));
    }
    if len <= parity || len > MAX_BLOCK_LEN {
        return Err(LayoutError::BlockLength { len, parity });
    }
    Ok(())
}

fn check_codeword_count(expected: usize, actual: usize) -> Result<(), LayoutError> {
    if expected != actual {
        return Err(LayoutError::CodewordCount { expected, actual });
    }
    Ok(())
}

/// Compute the Reed-Solomon code used by Data Matrix for error correction.
///
/// `data` are the data codewords of a symbol of the given size.
///
/// Depending on the symbol size, the data is first split up into
/// interleaved blocks. For each block an error code is computed.
/// The resulting blocks of error codes are returned interleaved, ready
/// to be appended to `data`.
pub fn encode_error(data: &[u8], size: SymbolSize) -> Result<Vec<u8>, LayoutError> {
    let setup = size.block_setup();
    check_codeword_count(setup.num_data, data.len())?;
    let mut codewords = vec![0; setup.num_data + setup.num_error()];
    codewords[..setup.num_data].copy_from_slice(data);
    fill_error_codewords(&mut codewords, &setup)?;
    Ok(codewords.split_off(setup.num_data))
}

/// Fill in the error codewords of a symbol.
///
/// `codewords` must have the length [SymbolSize::num_codewords]. The first
/// [SymbolSize::num_data_codewords] entries are the data, the remaining ones
/// are overwritten with the interleaved error codewords.
pub fn encode(codewords: &mut [u8], size: SymbolSize) -> Result<(), LayoutError> {
    let setup = size.block_setup();
    check_codeword_count(setup.num_data + setup.num_error(), codewords.len())?;
    fill_error_codewords(codewords, &setup)
}

/// Compute the error codewords of a single, non-interleaved block.
///
/// The block consists of the data codewords followed by `t` error
/// codewords, at most 255 codewords in total. The last `t` entries
/// are overwritten.
pub fn encode_block(block: &mut [u8], t: usize) -> Result<(), LayoutError> {
    check_block_shape(block.len(), t)?;
    let gen = generator(t)?;
    let (data, error) = block.split_at_mut(block.len() - t);
    let ecc = ecc_block(data.iter().cloned(), &gen);
    for (e, ecc_i) in error.iter_mut().zip(ecc) {
        *e = ecc_i.into();
    }
    Ok(())
}

fn fill_error_codewords(codewords: &mut [u8], setup: &BlockSetup) -> Result<(), LayoutError> {
    // the generator only depends on the number of error codewords,
    // all blocks of a symbol share it
    let gen = generator(setup.num_ecc_per_block)?;
    let data: &[u8] = codewords;
    let ecc_blocks = map_blocks(setup, |layout| {
        Ok::<_, LayoutError>(ecc_block(layout.data_positions().map(|i| data[i]), &gen))
    })?;
    trace!(
        "computed {} error codewords in {} blocks",
        setup.num_error(),
        ecc_blocks.len()
    );
    for (layout, ecc) in BlockLayout::all(setup).zip(ecc_blocks) {
        for (i, ecc_i) in layout.error_positions().zip(ecc) {
            codewords[i] = ecc_i.into();
        }
    }
    Ok(())
}

/// Divide the data polynomial, shifted by `t`, by the generator and return
/// the remainder, highest coefficient first.
fn ecc_block<T: Iterator<Item = u8>>(data: T, gen: &[GF]) -> ArrayVec<GF, MAX_ERROR_WORDS> {
    // Let d be the data polynomial and g the generator polynomial of degree t.
    // The shift register computes the remainder r in
    //
    //     d(x) * x^t = q(x) g(x) + r(x).
    //
    // Then d(x) * x^t - r(x) = d(x) * x^t + r(x) is divisible by g and
    // the coefficients of r are the error codewords. The register holds r
    // lowest coefficient first, each data codeword is fed in at the top.
    let t = gen.len();
    let mut ecc: ArrayVec<GF, MAX_ERROR_WORDS> = core::iter::repeat(GF(0)).take(t).collect();
    for a in data {
        let feedback = ecc[t - 1] + GF(a);
        for j in (1..t).rev() {
            ecc[j] = ecc[j - 1] + gen[j] * feedback;
        }
        ecc[0] = gen[0] * feedback;
    }
    ecc.reverse();
    ecc
}

/// Run `f` for every block of a symbol and collect the results in block order.
///
/// On error the error of the first failing block is returned.
#[cfg(not(feature = "rayon"))]
fn map_blocks<T, E, F>(setup: &BlockSetup, f: F) -> Result<Vec<T>, E>
where
    F: Fn(BlockLayout) -> Result<T, E>,
{
    BlockLayout::all(setup).map(f).collect()
}

/// Run `f` for every block of a symbol and collect the results in block order.
///
/// The blocks are processed in parallel. On error the error of the first
/// failing block is returned.
#[cfg(feature = "rayon")]
fn map_blocks<T, E, F>(setup: &BlockSetup, f: F) -> Result<Vec<T>, E>
where
    T: Send,
    E: Send,
    F: Fn(BlockLayout) -> Result<T, E> + Sync + Send,
{
    use rayon::prelude::*;

    let layouts: Vec<BlockLayout> = BlockLayout::all(setup).collect();
    let results: Vec<Result<T, E>> = layouts.into_par_iter().map(f).collect();
    results.into_iter().collect()
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn ecc_block_1() {
    let data = [23, 40, 11];
    let gen = generator(5).unwrap();
    let ecc = ecc_block(data.iter().cloned(), &gen);
    let ecc: Vec<u8> = ecc.into_iter().map(u8::from).collect();
    assert_eq!(ecc, vec![255, 207, 37, 244, 81]);
}

#[test]
fn encode_block_six_data_words() {
    let mut block = [1, 2, 3, 4, 5, 6, 0, 0, 0, 0, 0];
    encode_block(&mut block, 5).unwrap();
    assert_eq!(block, [1, 2, 3, 4, 5, 6, 42, 221, 228, 49, 249]);
}

#[test]
fn encode_block_shape_errors() {
    let mut block = [0u8; 5];
    assert_eq!(
        encode_block(&mut block, 5),
        Err(LayoutError::BlockLength { len: 5, parity: 5 })
    );
    assert_eq!(encode_block(&mut block, 0), Err(LayoutError::ParityCount(0)));
    let mut block = [0u8; 256];
    assert_eq!(
        encode_block(&mut block, 10),
        Err(LayoutError::BlockLength {
            len: 256,
            parity: 10
        })
    );
    let mut block = [0u8; 200];
    assert_eq!(
        encode_block(&mut block, 69),
        Err(LayoutError::ParityCount(69))
    );
}

#[test]
fn encode_error_square10() {
    let ecc = encode_error(&[1, 2, 3], SymbolSize::Square10).unwrap();
    assert_eq!(ecc, vec![53, 46, 95, 0, 75]);
    let ecc = encode_error(&[73, 102, 109, 109, 112], SymbolSize::Square12).unwrap();
    assert_eq!(ecc, vec![243, 55, 99, 199, 231, 27, 37]);
}

#[test]
fn encode_error_matches_in_place_encode() {
    for size in SymbolSize::all() {
        let n = size.num_data_codewords();
        let data: Vec<u8> = (0..n).map(|i| (i * 7 + 3) as u8).collect();
        let ecc = encode_error(&data, size).unwrap();
        assert_eq!(ecc.len(), size.num_error_codewords());

        let mut codewords = data.clone();
        codewords.resize(size.num_codewords(), 0xAA);
        encode(&mut codewords, size).unwrap();
        assert_eq!(&codewords[..n], &data[..]);
        assert_eq!(&codewords[n..], &ecc[..], "{:?}", size);
    }
}

#[test]
fn encode_wrong_length() {
    let mut codewords = [0u8; 7];
    assert_eq!(
        encode(&mut codewords, SymbolSize::Square10),
        Err(LayoutError::CodewordCount {
            expected: 8,
            actual: 7
        })
    );
    assert_eq!(
        encode_error(&[0; 4], SymbolSize::Square10),
        Err(LayoutError::CodewordCount {
            expected: 3,
            actual: 4
        })
    );
}

#[test]
fn interleaved_blocks_are_encoded_independently() {
    // every block of a Square144 must be a valid codeword on its own
    let size = SymbolSize::Square144;
    let data: Vec<u8> = (0..size.num_data_codewords())
        .map(|i| (i * 31 % 251) as u8)
        .collect();
    let mut codewords = data.clone();
    codewords.extend(encode_error(&data, size).unwrap());
    let setup = size.block_setup();
    for layout in BlockLayout::all(&setup) {
        let mut block: Vec<u8> = layout.positions().map(|i| codewords[i]).collect();
        let expected = block.clone();
        encode_block(&mut block, setup.num_ecc_per_block).unwrap();
        assert_eq!(block, expected, "block {}", layout.index());
    }
}
