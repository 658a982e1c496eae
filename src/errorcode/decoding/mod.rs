//! Syndrome based decoding of the Reed-Solomon blocks.
//!
//! See the [module documentation](crate::errorcode) for an overview.
mod berlekamp_massey;
mod forney;

use arrayvec::ArrayVec;
use log::{debug, trace};
use thiserror::Error;

use super::{
    check_block_shape, check_codeword_count,
    galois::{GF, ORDER},
    map_blocks, LayoutError, MAX_BLOCK_LEN, MAX_ERROR_WORDS,
};
use crate::SymbolSize;

/// Reasons why the codewords could not be decoded.
///
/// The variants tied to a block carry the index of the first block that
/// failed, in stride order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorDecodingError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    /// Errors were found but correcting them was not requested.
    #[error("errors detected in block {block}")]
    ErrorsDetected { block: usize },
    /// The block has more errors than its error codewords can correct.
    #[error("too many errors in block {block}")]
    TooManyErrors { block: usize },
    /// Error locations were found outside of the block.
    ///
    /// This usually means there were a lot of transmission errors, uncorrectable.
    #[error("error locations outside of block {block}")]
    ErrorsOutsideRange { block: usize },
    /// The located errors do not explain the syndromes, more errors than
    /// correctable must be present.
    #[error("decoder malfunction in block {block}")]
    Malfunction { block: usize },
}

/// Received block, lowest degree first.
type Received = ArrayVec<GF, MAX_BLOCK_LEN>;

type Syndromes = ArrayVec<GF, MAX_ERROR_WORDS>;

/// Decode the Reed-Solomon code of a symbol.
///
/// # Params
///
/// The symbol `codewords` and the `size` of the symbol. If `fix` is true
/// the errors are corrected in-place, otherwise any error fails the decode.
///
/// For larger symbols the error codes are interleaved, this is considered
/// in this decoder.
///
/// Returns the number of corrected codewords. The codewords are only
/// modified if every block could be decoded.
pub fn decode(
    codewords: &mut [u8],
    size: SymbolSize,
    fix: bool,
) -> Result<usize, ErrorDecodingError> {
    let setup = size.block_setup();
    check_codeword_count(setup.num_data + setup.num_error(), codewords.len())?;
    let t = setup.num_ecc_per_block;
    let max_correctable = size.max_correctable();

    let received: &[u8] = codewords;
    let blocks = map_blocks(&setup, |layout| {
        let mut block = layout.deinterleave(received);
        let corrected = decode_gen(&mut block, t, max_correctable, layout.index(), fix)?;
        Ok::<_, ErrorDecodingError>((layout, block, corrected))
    })?;

    let mut total = 0;
    for (layout, block, corrected) in blocks {
        if corrected > 0 {
            layout.interleave(&block, codewords);
            total += corrected;
        }
    }
    if total > 0 {
        debug!("corrected {} codewords in {:?} symbol", total, size);
    }
    Ok(total)
}

/// Decode a single, non-interleaved block with `t` error codewords.
///
/// The block consists of the data codewords followed by the error codewords.
/// Up to `t / 2` errors are corrected in place if `fix` is true. Errors
/// report block index 0.
pub fn decode_block(block: &mut [u8], t: usize, fix: bool) -> Result<usize, ErrorDecodingError> {
    check_block_shape(block.len(), t)?;
    let mut received: Received = block.iter().rev().map(|c| GF(*c)).collect();
    let corrected = decode_gen(&mut received, t, t / 2, 0, fix)?;
    if corrected > 0 {
        for (c, r) in block.iter_mut().zip(received.iter().rev()) {
            *c = r.0;
        }
    }
    Ok(corrected)
}

/// Decode one block given lowest degree first.
///
/// On success the corrected block is in `received` and the number of
/// corrections is returned. On error `received` is unchanged.
fn decode_gen(
    received: &mut Received,
    t: usize,
    max_correctable: usize,
    block: usize,
    fix: bool,
) -> Result<usize, ErrorDecodingError> {
    let n = received.len();
    debug_assert!(n > t && t >= 1);

    // 1. Calculate syndromes
    let (syn, have_errors) = syndromes(received, t);
    if !have_errors {
        return Ok(0);
    }
    if !fix {
        debug!("errors detected in block {}, not fixing", block);
        return Err(ErrorDecodingError::ErrorsDetected { block });
    }
    trace!("block {}: syndromes {:?}", block, syn);

    // 2. Find the error locator polynomial
    let lambda = berlekamp_massey::error_locator(&syn, max_correctable);
    let num_errors = lambda.len() - 1;
    trace!("block {}: error locator {:?}", block, lambda);
    if num_errors > max_correctable {
        debug!(
            "block {}: {} errors exceed the capacity of {}",
            block, num_errors, max_correctable
        );
        return Err(ErrorDecodingError::TooManyErrors { block });
    }

    // 3. Find its roots, they give the error locations
    let roots = chien_search(&lambda);
    if roots.len() != num_errors {
        debug!(
            "block {}: locator of degree {} has {} roots",
            block,
            num_errors,
            roots.len()
        );
        return Err(ErrorDecodingError::TooManyErrors { block });
    }

    // 4. Find the error values and correct a copy
    let omega = forney::error_evaluator(&syn, &lambda);
    let mut corrected = received.clone();
    for root in roots.iter().cloned() {
        let degree = (ORDER - root) % ORDER;
        if degree >= n {
            debug!("block {}: error location {} outside of {}", block, degree, n);
            return Err(ErrorDecodingError::ErrorsOutsideRange { block });
        }
        let value = forney::error_value(&omega, &lambda, root).ok_or_else(|| {
            debug!("block {}: no error value at location {}", block, degree);
            ErrorDecodingError::Malfunction { block }
        })?;
        corrected[degree] -= value;
    }

    // 5. The corrected block must be a codeword
    if syndromes(&corrected, t).1 {
        debug!("block {}: syndromes remain after correction", block);
        return Err(ErrorDecodingError::Malfunction { block });
    }

    debug!("block {}: corrected {} errors", block, num_errors);
    *received = corrected;
    Ok(num_errors)
}

/// Evaluate the received polynomial at a, a^2, ..., a^t.
///
/// The second value is true if any syndrome is non-zero.
fn syndromes(received: &[GF], t: usize) -> (Syndromes, bool) {
    let mut gamma: Received = received.iter().cloned().collect();
    let mut syndromes = Syndromes::new();
    let mut errors = false;
    for _ in 0..t {
        for (g, alpha) in gamma.iter_mut().zip(GF::primitive_powers()) {
            *g *= alpha;
        }
        let s: GF = gamma.iter().cloned().sum();
        errors = errors || !s.is_zero();
        syndromes.push(s);
    }
    (syndromes, errors)
}

/// Find the roots a^e, 1 <= e <= 255, of the polynomial `lambda`.
///
/// Returns the exponents `e` in increasing order. `lambda` must have a
/// non-zero constant coefficient.
fn chien_search(lambda: &[GF]) -> ArrayVec<usize, MAX_ERROR_WORDS> {
    debug_assert!(lambda.len() <= MAX_ERROR_WORDS + 1);
    let mut out = ArrayVec::new();
    let mut gamma: ArrayVec<GF, { MAX_ERROR_WORDS + 1 }> = lambda.iter().cloned().collect();
    for e in 1..=ORDER {
        for (g, alpha) in gamma.iter_mut().zip(GF::primitive_powers()) {
            *g *= alpha;
        }
        let val: GF = gamma.iter().cloned().sum();
        if val.is_zero() {
            if out.is_full() {
                break;
            }
            out.push(e);
        }
    }
    out
}

#[cfg(test)]
use alloc::{vec, vec::Vec};

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn test_evaluate_primitive() {
    // 1 + 23 x^2 + 90 x^4, lowest degree first
    let c = [GF(1), GF(0), GF(23), GF(0), GF(90)];
    let (syn, errors) = syndromes(&c, 3);
    assert!(errors);
    assert_eq!(syn.as_slice(), &[GF(100), GF(187), GF(131)]);
}

#[test]
fn syndromes_of_codeword_vanish() {
    let mut block = [1, 2, 3, 4, 5, 6, 0, 0, 0, 0, 0];
    super::encode_block(&mut block, 5).unwrap();
    let received: Received = block.iter().rev().map(|c| GF(*c)).collect();
    let (syn, errors) = syndromes(&received, 5);
    assert!(!errors);
    assert_eq!(syn.as_slice(), &[GF(0); 5]);
}

#[test]
fn chien_finds_roots() {
    // (1 + a^3 x)(1 + a^200 x) has roots a^252 and a^55
    let a3 = GF::primitive_power(3);
    let a200 = GF::primitive_power(200);
    let lambda = [GF(1), a3 + a200, a3 * a200];
    assert_eq!(chien_search(&lambda).as_slice(), &[55, 252]);
    // 1 + x has the root 1 = a^255
    assert_eq!(chien_search(&[GF(1), GF(1)]).as_slice(), &[255]);
    assert!(chien_search(&[GF(1)]).is_empty());
}

#[test]
fn decode_block_corrects_single_error() {
    let mut block = [1, 2, 3, 4, 5, 6, 0, 0, 0, 0, 0];
    super::encode_block(&mut block, 5).unwrap();
    let expected = block;
    block[8] ^= 0x5A;
    assert_eq!(decode_block(&mut block, 5, true), Ok(1));
    assert_eq!(block, expected);
}

#[test]
fn decode_block_corrects_two_errors() {
    let mut block = [1, 2, 3, 4, 5, 6, 42, 221, 228, 49, 249];
    let expected = block;
    block[0] = 0;
    block[10] = 1;
    assert_eq!(decode_block(&mut block, 5, true), Ok(2));
    assert_eq!(block, expected);
}

#[test]
fn decode_block_three_errors_fail() {
    let original = [1, 2, 3, 4, 5, 6, 42, 221, 228, 49, 249];
    let mut block = original;
    block[1] ^= 1;
    block[4] ^= 77;
    block[9] ^= 200;
    let corrupted = block;
    assert!(decode_block(&mut block, 5, true).is_err());
    assert_eq!(block, corrupted);
}

#[test]
fn decode_block_without_fixing() {
    let mut block = [1, 2, 3, 4, 5, 6, 42, 221, 228, 49, 249];
    assert_eq!(decode_block(&mut block, 5, false), Ok(0));
    block[3] = 0;
    let corrupted = block;
    assert_eq!(
        decode_block(&mut block, 5, false),
        Err(ErrorDecodingError::ErrorsDetected { block: 0 })
    );
    assert_eq!(block, corrupted);
}

#[test]
fn decode_block_shape() {
    let mut block = [0u8; 4];
    assert_eq!(
        decode_block(&mut block, 5, true),
        Err(ErrorDecodingError::Layout(LayoutError::BlockLength {
            len: 4,
            parity: 5
        }))
    );
}

#[test]
fn test_recovery() {
    let mut data = vec![1, 2, 3];
    let ecc = super::encode_error(&data, SymbolSize::Square10).unwrap();
    data.extend_from_slice(&ecc);
    assert_eq!(data.len(), 3 + 5);
    let mut received = data.clone();
    // make two wrong
    received[0] = 230;
    received[3 + 5 - 1] = 32;
    assert_eq!(decode(&mut received, SymbolSize::Square10, true), Ok(2));
    assert_eq!(&data, &received);
}

#[test]
fn test_recovery1() {
    let mut data = vec![
        255, 255, 255, 72, 52, 38, 52, 52, 52, 52, 52, 52, 52, 52, 52, 72, 0, 0, 72, 0, 0, 10,
    ];
    let ecc = super::encode_error(&data, SymbolSize::Square20).unwrap();
    data.extend_from_slice(&ecc);
    let mut received = data.clone();
    received[0] = 52;
    received[8] = 144;
    assert_eq!(decode(&mut received, SymbolSize::Square20, true), Ok(2));
    assert_eq!(&data, &received);
}

#[test]
fn test_recovery2() {
    let mut data = vec![
        144, 144, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255,
        255, 255, 255, 255,
    ];
    let ecc = super::encode_error(&data, SymbolSize::Square20).unwrap();
    data.extend_from_slice(&ecc);
    let mut received = data.clone();
    received[1] = 32;
    received[0] = 0;
    received[12] = 0;
    received[16] = 144;
    assert_eq!(decode(&mut received, SymbolSize::Square20, true), Ok(4));
    assert_eq!(&data, &received);
}

#[test]
fn test_recovery3() {
    let mut data = vec![
        255, 23, 189, 54, 189, 189, 189, 189, 255, 255, 255, 255, 255, 255, 255, 67, 4, 0, 255,
        189, 48, 37,
    ];
    let ecc = super::encode_error(&data, SymbolSize::Square20).unwrap();
    data.extend_from_slice(&ecc);
    let mut received = data.clone();
    received[0] = 247;
    received[1] = 49;
    received[5] = 255;
    received[6] = 0;
    received[8] = 49;
    received[10] = 0;
    received[12] = 65;
    received[15] = 177;
    received[16] = 32;
    assert_eq!(decode(&mut received, SymbolSize::Square20, true), Ok(9));
    assert_eq!(&data, &received);
}

#[test]
fn recovery_in_all_blocks_of_square144() {
    let size = SymbolSize::Square144;
    let data: Vec<u8> = (0..size.num_data_codewords())
        .map(|i| (i * 13 % 256) as u8)
        .collect();
    let mut codewords = data.clone();
    codewords.extend(super::encode_error(&data, size).unwrap());
    let expected = codewords.clone();

    // 1557 is the last data codeword (block 7), n - 1 the last error codeword (block 9)
    let n = codewords.len();
    for i in [0, 1, 9, 1557, 1558, 1567, n - 1] {
        codewords[i] ^= 0xFF;
    }
    assert_eq!(decode(&mut codewords, size, true), Ok(7));
    assert_eq!(codewords, expected);
}

#[test]
fn failing_block_leaves_symbol_untouched() {
    let size = SymbolSize::Square52;
    let data: Vec<u8> = (0..size.num_data_codewords()).map(|i| i as u8).collect();
    let mut codewords = data.clone();
    codewords.extend(super::encode_error(&data, size).unwrap());

    // one error in block 0, far too many in block 1
    codewords[0] ^= 1;
    for j in 0..30 {
        codewords[1 + 2 * j] ^= 0x33;
    }
    let corrupted = codewords.clone();
    let result = decode(&mut codewords, size, true);
    assert!(
        matches!(
            result,
            Err(ErrorDecodingError::TooManyErrors { block: 1 })
                | Err(ErrorDecodingError::ErrorsOutsideRange { block: 1 })
                | Err(ErrorDecodingError::Malfunction { block: 1 })
        ),
        "{:?}",
        result
    );
    assert_eq!(codewords, corrupted);
}

#[test]
fn decode_wrong_length() {
    let mut codewords = [0u8; 9];
    assert_eq!(
        decode(&mut codewords, SymbolSize::Square10, true),
        Err(ErrorDecodingError::Layout(LayoutError::CodewordCount {
            expected: 8,
            actual: 9
        }))
    );
}
