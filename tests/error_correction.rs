//! Property-based tests for encoding and decoding whole symbols.
//!
//! Errors are injected with a seeded RNG so that failing cases can be
//! reproduced from the seed proptest reports.

use ecc200::errorcode::{decode_block, encode_block, encode_error};
use ecc200::{decode, encode, ErrorDecodingError, SymbolSize};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn any_size() -> impl Strategy<Value = SymbolSize> {
    proptest::sample::select(SymbolSize::all().collect::<Vec<_>>())
}

fn odd_parity_size() -> impl Strategy<Value = SymbolSize> {
    let sizes: Vec<SymbolSize> = SymbolSize::all()
        .filter(|s| s.num_error_codewords_per_block() % 2 == 1)
        .collect();
    proptest::sample::select(sizes)
}

/// Symbol positions of block `block`, data codewords first.
fn block_positions(size: SymbolSize, block: usize) -> Vec<usize> {
    let stride = size.num_blocks();
    let num_data = size.num_data_codewords();
    let data_len = size.block_data_size(block).unwrap();
    let data = (0..data_len).map(|j| block + j * stride);
    let error = (0..size.num_error_codewords_per_block()).map(|j| num_data + block + j * stride);
    data.chain(error).collect()
}

fn random_symbol(size: SymbolSize, rng: &mut StdRng) -> Vec<u8> {
    let mut codewords: Vec<u8> = (0..size.num_codewords()).map(|_| rng.random()).collect();
    encode(&mut codewords, size).unwrap();
    codewords
}

/// Flip `count` distinct codewords of a block to a different value.
fn corrupt_block(
    codewords: &mut [u8],
    size: SymbolSize,
    block: usize,
    count: usize,
    rng: &mut StdRng,
) {
    let positions = block_positions(size, block);
    for i in rand::seq::index::sample(rng, positions.len(), count) {
        codewords[positions[i]] ^= rng.random_range(1..=255u8);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: an undamaged symbol decodes without corrections
    #[test]
    fn prop_roundtrip(size in any_size(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let original = random_symbol(size, &mut rng);

        let ecc = encode_error(&original[..size.num_data_codewords()], size).unwrap();
        prop_assert_eq!(&original[size.num_data_codewords()..], &ecc[..]);

        let mut codewords = original.clone();
        prop_assert_eq!(decode(&mut codewords, size, true), Ok(0));
        prop_assert_eq!(decode(&mut codewords, size, false), Ok(0));
        prop_assert_eq!(&codewords, &original);
    }

    /// Property: up to t/2 errors in every block are corrected exactly
    #[test]
    fn prop_corrects_up_to_capacity(size in any_size(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let original = random_symbol(size, &mut rng);
        let mut codewords = original.clone();

        let mut total = 0;
        for block in 0..size.num_blocks() {
            let count = rng.random_range(0..=size.max_correctable());
            corrupt_block(&mut codewords, size, block, count, &mut rng);
            total += count;
        }

        prop_assert_eq!(decode(&mut codewords, size, true), Ok(total));
        prop_assert_eq!(&codewords, &original);
    }

    /// Property: with an odd number of error codewords, one error more than
    /// correctable is always detected and nothing is modified
    #[test]
    fn prop_detects_one_too_many(size in odd_parity_size(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut codewords = random_symbol(size, &mut rng);
        let block = rng.random_range(0..size.num_blocks());
        corrupt_block(&mut codewords, size, block, size.max_correctable() + 1, &mut rng);
        let corrupted = codewords.clone();

        let result = decode(&mut codewords, size, true);
        prop_assert!(
            matches!(
                result,
                Err(ErrorDecodingError::TooManyErrors { block: b })
                    | Err(ErrorDecodingError::ErrorsOutsideRange { block: b })
                    | Err(ErrorDecodingError::Malfunction { block: b }) if b == block
            ),
            "{:?}",
            result
        );
        prop_assert_eq!(&codewords, &corrupted);
    }

    /// Property: any damage is reported when fixing is disabled
    #[test]
    fn prop_detects_without_fixing(size in any_size(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut codewords = random_symbol(size, &mut rng);
        let block = rng.random_range(0..size.num_blocks());
        corrupt_block(&mut codewords, size, block, 1, &mut rng);
        let corrupted = codewords.clone();

        prop_assert_eq!(
            decode(&mut codewords, size, false),
            Err(ErrorDecodingError::ErrorsDetected { block })
        );
        prop_assert_eq!(&codewords, &corrupted);
    }

    /// Property: single blocks of any valid shape correct up to t/2 errors
    #[test]
    fn prop_block_corrects_up_to_capacity(
        t in 1usize..=68,
        extra in 1usize..=187,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut block: Vec<u8> = (0..t + extra).map(|_| rng.random()).collect();
        encode_block(&mut block, t).unwrap();
        let original = block.clone();

        let count = rng.random_range(0..=t / 2);
        for i in rand::seq::index::sample(&mut rng, block.len(), count) {
            block[i] ^= rng.random_range(1..=255u8);
        }

        prop_assert_eq!(decode_block(&mut block, t, true), Ok(count));
        prop_assert_eq!(&block, &original);
    }
}

#[test]
fn six_data_words_one_parity_error() {
    let mut block = [1, 2, 3, 4, 5, 6, 0, 0, 0, 0, 0];
    encode_block(&mut block, 5).unwrap();
    assert_eq!(block[6..], [42, 221, 228, 49, 249]);

    let original = block;
    block[7] = 0;
    assert_eq!(decode_block(&mut block, 5, true), Ok(1));
    assert_eq!(block, original);
}

#[test]
fn six_data_words_three_errors() {
    let mut block = [1, 2, 3, 4, 5, 6, 42, 221, 228, 49, 249];
    block[0] = 0xFF;
    block[5] = 0;
    block[10] = 7;
    let corrupted = block;
    assert!(decode_block(&mut block, 5, true).is_err());
    assert_eq!(block, corrupted);
}

#[test]
fn every_codeword_of_a_symbol_can_be_repaired() {
    let size = SymbolSize::Rect16x48;
    let mut rng = StdRng::seed_from_u64(0x00EC_C200);
    let original = random_symbol(size, &mut rng);
    for i in 0..size.num_codewords() {
        let mut codewords = original.clone();
        codewords[i] = !codewords[i];
        assert_eq!(decode(&mut codewords, size, true), Ok(1), "position {}", i);
        assert_eq!(codewords, original);
    }
}
