//! Interleaving of the Reed-Solomon blocks in a symbol.
//!
//! Larger symbols split their codewords into several blocks which are
//! encoded independently. With `S` blocks, block `b` owns every `S`-th codeword
//! starting at `b`. Data and error codewords are interleaved separately: the
//! data part of block `b` starts at position `b`, the error part at
//! `num_data + b`.
//!
//! For most sizes this is the same as striding through the whole sequence.
//! Square144 is the exception, its last two blocks have one data codeword
//! less than the others, so a single stride would leave the data region of
//! those blocks at the wrong error codeword.
use arrayvec::ArrayVec;

use super::{galois::GF, MAX_BLOCK_LEN};
use crate::symbol_size::BlockSetup;

/// Positions of one block inside the codeword sequence of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockLayout {
    block: usize,
    stride: usize,
    /// Start of the error codewords in the symbol
    error_offset: usize,
    num_data: usize,
    num_error: usize,
}

impl BlockLayout {
    pub(crate) fn new(setup: &BlockSetup, block: usize) -> Self {
        debug_assert!(block < setup.num_ecc_blocks);
        Self {
            block,
            stride: setup.num_ecc_blocks,
            error_offset: setup.num_data,
            num_data: setup.data_in_block(block),
            num_error: setup.num_ecc_per_block,
        }
    }

    /// The layouts of all blocks of a symbol, in stride order.
    pub(crate) fn all(setup: &BlockSetup) -> impl Iterator<Item = BlockLayout> + '_ {
        (0..setup.num_ecc_blocks).map(move |block| Self::new(setup, block))
    }

    pub(crate) fn index(&self) -> usize {
        self.block
    }

    /// Number of codewords in the block, data and error.
    pub(crate) fn len(&self) -> usize {
        self.num_data + self.num_error
    }

    /// Symbol positions of the block's data codewords, in order.
    pub(crate) fn data_positions(&self) -> impl Iterator<Item = usize> + Clone {
        let (block, stride) = (self.block, self.stride);
        (0..self.num_data).map(move |j| block + j * stride)
    }

    /// Symbol positions of the block's error codewords, in order.
    pub(crate) fn error_positions(&self) -> impl Iterator<Item = usize> + Clone {
        let (start, stride) = (self.error_offset + self.block, self.stride);
        (0..self.num_error).map(move |j| start + j * stride)
    }

    /// Symbol positions of all codewords of the block, in order.
    pub(crate) fn positions(&self) -> impl Iterator<Item = usize> + Clone {
        self.data_positions().chain(self.error_positions())
    }

    /// Collect the block from `codewords`, last codeword first.
    ///
    /// The first codeword is the highest coefficient of the received
    /// polynomial, so the result holds the coefficients lowest degree first.
    pub(crate) fn deinterleave(&self, codewords: &[u8]) -> ArrayVec<GF, MAX_BLOCK_LEN> {
        debug_assert!(self.len() <= MAX_BLOCK_LEN);
        let mut block: ArrayVec<GF, MAX_BLOCK_LEN> =
            self.positions().map(|i| GF(codewords[i])).collect();
        block.reverse();
        block
    }

    /// Inverse of [deinterleave](Self::deinterleave).
    pub(crate) fn interleave(&self, block: &[GF], codewords: &mut [u8]) {
        debug_assert_eq!(block.len(), self.len());
        for (i, value) in self.positions().zip(block.iter().rev()) {
            codewords[i] = value.0;
        }
    }
}

#[cfg(test)]
use alloc::vec::Vec;

#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
use crate::SymbolSize;

#[test]
fn uniform_blocks_stride_through_everything() {
    let setup = SymbolSize::Square52.block_setup();
    let layout = BlockLayout::new(&setup, 1);
    assert_eq!(layout.len(), 102 + 42);
    let positions: Vec<usize> = layout.positions().collect();
    let strided: Vec<usize> = (1..setup.num_data + setup.num_error()).step_by(2).collect();
    assert_eq!(positions, strided);
}

#[test]
fn positions_cover_the_symbol_once() {
    for size in SymbolSize::all() {
        let setup = size.block_setup();
        let mut seen = alloc::vec![false; size.num_codewords()];
        for layout in BlockLayout::all(&setup) {
            for i in layout.positions() {
                assert!(!seen[i], "{:?}: position {} used twice", size, i);
                seen[i] = true;
            }
        }
        assert!(seen.iter().all(|s| *s), "{:?}", size);
    }
}

#[test]
fn square144_short_blocks() {
    let setup = SymbolSize::Square144.block_setup();
    let layout = BlockLayout::new(&setup, 9);
    let data: Vec<usize> = layout.data_positions().collect();
    assert_eq!(data.len(), 155);
    assert_eq!(data.last(), Some(&(9 + 154 * 10)));
    let error: Vec<usize> = layout.error_positions().collect();
    assert_eq!(error[0], 1558 + 9);
    assert_eq!(error.last(), Some(&(1558 + 9 + 61 * 10)));
}

#[test]
fn deinterleave_reverses_block() {
    let setup = SymbolSize::Square52.block_setup();
    let codewords: Vec<u8> = (0..SymbolSize::Square52.num_codewords())
        .map(|i| i as u8)
        .collect();
    let layout = BlockLayout::new(&setup, 0);
    let block = layout.deinterleave(&codewords);
    assert_eq!(block.len(), 144);
    // last error codeword of block 0 sits at 204 + 41 * 2
    assert_eq!(block[0], GF((204 + 41 * 2) as u8));
    assert_eq!(block[143], GF(0));
    assert_eq!(block[142], GF(2));

    let mut copy = alloc::vec![0; codewords.len()];
    for layout in BlockLayout::all(&setup) {
        let block = layout.deinterleave(&codewords);
        layout.interleave(&block, &mut copy);
    }
    assert_eq!(copy, codewords);
}
