//! Symbol sizes and the error correction layout of each.
use core::cmp::Ordering;

#[cfg(test)]
use alloc::vec::Vec;

#[cfg(test)]
use pretty_assertions::assert_eq;

/// Codeword layout of a symbol size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockSetup {
    /// Number of data codewords in the whole symbol
    pub(crate) num_data: usize,
    /// Number of interleaved error correction blocks
    pub(crate) num_ecc_blocks: usize,
    /// Number of error correction codewords per block
    pub(crate) num_ecc_per_block: usize,
    /// Total width of the symbol including alignment pattern but not quiet zone
    pub(crate) width: usize,
    /// Total height of the symbol including alignment pattern but not quiet zone
    pub(crate) height: usize,
}

impl BlockSetup {
    const fn new(
        num_data: usize,
        num_ecc_blocks: usize,
        num_ecc_per_block: usize,
        width: usize,
        height: usize,
    ) -> Self {
        Self {
            num_data,
            num_ecc_blocks,
            num_ecc_per_block,
            width,
            height,
        }
    }

    /// Number of data codewords in interleaved block `block`.
    ///
    /// Only Square144 has blocks of different length. Its 1558 data codewords
    /// are spread over 10 blocks, the first eight get 156 and the last
    /// two 155.
    pub(crate) fn data_in_block(&self, block: usize) -> usize {
        debug_assert!(block < self.num_ecc_blocks);
        let base = self.num_data / self.num_ecc_blocks;
        if block < self.num_data % self.num_ecc_blocks {
            base + 1
        } else {
            base
        }
    }

    pub(crate) fn num_error(&self) -> usize {
        self.num_ecc_blocks * self.num_ecc_per_block
    }
}

/// The symbol sizes supported by Data Matrix.
///
/// The number behind a variant, e.g., [Square10](SymbolSize::Square10),
/// describes the number of modules (the tiny black squares) the symbol is
/// tall/wide.
///
/// Each size fixes how its codewords are protected: how many data codewords
/// there are, into how many interleaved Reed-Solomon blocks they are split, and
/// how many error correction codewords each block carries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(enum_iterator::Sequence))]
pub enum SymbolSize {
    Square10,
    Square12,
    Square14,
    Square16,
    Square18,
    Square20,
    Square22,
    Square24,
    Square26,
    Square32,
    Square36,
    Square40,
    Square44,
    Square48,
    Square52,
    Square64,
    Square72,
    Square80,
    Square88,
    Square96,
    Square104,
    Square120,
    Square132,
    Square144,
    Rect8x18,
    Rect8x32,
    Rect12x26,
    Rect12x36,
    Rect16x36,
    Rect16x48,

    /// DMRE 8x48 variant
    Rect8x48,
    /// DMRE 8x64 variant
    Rect8x64,
    /// DMRE 8x80 variant
    Rect8x80,
    /// DMRE 8x96 variant
    Rect8x96,
    /// DMRE 8x120 variant
    Rect8x120,
    /// DMRE 8x144 variant
    Rect8x144,
    /// DMRE 12x64 variant
    Rect12x64,
    /// DMRE 12x88 variant
    Rect12x88,
    /// DMRE 16x64 variant
    Rect16x64,
    /// DMRE 20x36 variant
    Rect20x36,
    /// DMRE 20x44 variant
    Rect20x44,
    /// DMRE 20x64 variant
    Rect20x64,
    /// DMRE 22x48 variant
    Rect22x48,
    /// DMRE 24x48 variant
    Rect24x48,
    /// DMRE 24x64 variant
    Rect24x64,
    /// DMRE 26x40 variant
    Rect26x40,
    /// DMRE 26x48 variant
    Rect26x48,
    /// DMRE 26x64 variant
    Rect26x64,
}

#[rustfmt::skip]
const SYMBOL_SIZES: &[SymbolSize] = &[
    SymbolSize::Square10, SymbolSize::Square12, SymbolSize::Rect8x18, SymbolSize::Square14,
    SymbolSize::Rect8x32, SymbolSize::Square16, SymbolSize::Rect12x26, SymbolSize::Square18,
    SymbolSize::Rect8x48, SymbolSize::Square20, SymbolSize::Rect12x36, SymbolSize::Rect8x64,
    SymbolSize::Square22, SymbolSize::Rect16x36, SymbolSize::Rect8x80, SymbolSize::Square24,
    SymbolSize::Rect8x96, SymbolSize::Rect12x64, SymbolSize::Square26, SymbolSize::Rect20x36,
    SymbolSize::Rect16x48, SymbolSize::Rect8x120, SymbolSize::Rect20x44, SymbolSize::Square32,
    SymbolSize::Rect16x64, SymbolSize::Rect8x144, SymbolSize::Rect12x88, SymbolSize::Rect26x40,
    SymbolSize::Rect22x48, SymbolSize::Rect24x48, SymbolSize::Rect20x64, SymbolSize::Square36,
    SymbolSize::Rect26x48, SymbolSize::Rect24x64, SymbolSize::Square40, SymbolSize::Rect26x64,
    SymbolSize::Square44, SymbolSize::Square48, SymbolSize::Square52, SymbolSize::Square64,
    SymbolSize::Square72, SymbolSize::Square80, SymbolSize::Square88, SymbolSize::Square96,
    SymbolSize::Square104, SymbolSize::Square120, SymbolSize::Square132, SymbolSize::Square144,
];

impl SymbolSize {
    /// All symbol sizes, ordered by the number of data codewords they hold.
    pub fn all() -> impl Iterator<Item = SymbolSize> {
        SYMBOL_SIZES.iter().cloned()
    }

    /// Find the symbol size with the given number of modules.
    ///
    /// `width` and `height` count the modules including the finder and
    /// alignment patterns but not the quiet zone.
    pub fn from_dimensions(width: usize, height: usize) -> Option<SymbolSize> {
        Self::all().find(|s| {
            let setup = s.block_setup();
            setup.width == width && setup.height == height
        })
    }

    pub(crate) fn block_setup(&self) -> BlockSetup {
        match self {
            Self::Square10 => BlockSetup::new(3, 1, 5, 10, 10),
            Self::Square12 => BlockSetup::new(5, 1, 7, 12, 12),
            Self::Square14 => BlockSetup::new(8, 1, 10, 14, 14),
            Self::Square16 => BlockSetup::new(12, 1, 12, 16, 16),
            Self::Square18 => BlockSetup::new(18, 1, 14, 18, 18),
            Self::Square20 => BlockSetup::new(22, 1, 18, 20, 20),
            Self::Square22 => BlockSetup::new(30, 1, 20, 22, 22),
            Self::Square24 => BlockSetup::new(36, 1, 24, 24, 24),
            Self::Square26 => BlockSetup::new(44, 1, 28, 26, 26),
            Self::Square32 => BlockSetup::new(62, 1, 36, 32, 32),
            Self::Square36 => BlockSetup::new(86, 1, 42, 36, 36),
            Self::Square40 => BlockSetup::new(114, 1, 48, 40, 40),
            Self::Square44 => BlockSetup::new(144, 1, 56, 44, 44),
            Self::Square48 => BlockSetup::new(174, 1, 68, 48, 48),
            Self::Square52 => BlockSetup::new(204, 2, 42, 52, 52),
            Self::Square64 => BlockSetup::new(280, 2, 56, 64, 64),
            Self::Square72 => BlockSetup::new(368, 4, 36, 72, 72),
            Self::Square80 => BlockSetup::new(456, 4, 48, 80, 80),
            Self::Square88 => BlockSetup::new(576, 4, 56, 88, 88),
            Self::Square96 => BlockSetup::new(696, 4, 68, 96, 96),
            Self::Square104 => BlockSetup::new(816, 6, 56, 104, 104),
            Self::Square120 => BlockSetup::new(1050, 6, 68, 120, 120),
            Self::Square132 => BlockSetup::new(1304, 8, 62, 132, 132),
            Self::Square144 => BlockSetup::new(1558, 10, 62, 144, 144),
            Self::Rect8x18 => BlockSetup::new(5, 1, 7, 18, 8),
            Self::Rect8x32 => BlockSetup::new(10, 1, 11, 32, 8),
            Self::Rect12x26 => BlockSetup::new(16, 1, 14, 26, 12),
            Self::Rect12x36 => BlockSetup::new(22, 1, 18, 36, 12),
            Self::Rect16x36 => BlockSetup::new(32, 1, 24, 36, 16),
            Self::Rect16x48 => BlockSetup::new(49, 1, 28, 48, 16),
            // DMRE
            Self::Rect8x48 => BlockSetup::new(18, 1, 15, 48, 8),
            Self::Rect8x64 => BlockSetup::new(24, 1, 18, 64, 8),
            Self::Rect8x80 => BlockSetup::new(32, 1, 22, 80, 8),
            Self::Rect8x96 => BlockSetup::new(38, 1, 28, 96, 8),
            Self::Rect8x120 => BlockSetup::new(49, 1, 32, 120, 8),
            Self::Rect8x144 => BlockSetup::new(63, 1, 36, 144, 8),
            Self::Rect12x64 => BlockSetup::new(43, 1, 27, 64, 12),
            Self::Rect12x88 => BlockSetup::new(64, 1, 36, 88, 12),
            Self::Rect16x64 => BlockSetup::new(62, 1, 36, 64, 16),
            Self::Rect20x36 => BlockSetup::new(44, 1, 28, 36, 20),
            Self::Rect20x44 => BlockSetup::new(56, 1, 34, 44, 20),
            Self::Rect20x64 => BlockSetup::new(84, 1, 42, 64, 20),
            Self::Rect22x48 => BlockSetup::new(72, 1, 38, 48, 22),
            Self::Rect24x48 => BlockSetup::new(80, 1, 41, 48, 24),
            Self::Rect24x64 => BlockSetup::new(108, 1, 46, 64, 24),
            Self::Rect26x40 => BlockSetup::new(70, 1, 38, 40, 26),
            Self::Rect26x48 => BlockSetup::new(90, 1, 42, 48, 26),
            Self::Rect26x64 => BlockSetup::new(118, 1, 50, 64, 26),
        }
    }

    /// Width in modules, including alignment patterns.
    pub fn width(&self) -> usize {
        self.block_setup().width
    }

    /// Height in modules, including alignment patterns.
    pub fn height(&self) -> usize {
        self.block_setup().height
    }

    /// Number of data codewords of the symbol.
    pub fn num_data_codewords(&self) -> usize {
        self.block_setup().num_data
    }

    /// Number of error correction codewords of the symbol, all blocks together.
    pub fn num_error_codewords(&self) -> usize {
        self.block_setup().num_error()
    }

    /// Number of codewords of the symbol, data and error correction.
    pub fn num_codewords(&self) -> usize {
        let setup = self.block_setup();
        setup.num_data + setup.num_error()
    }

    /// Number of interleaved Reed-Solomon blocks.
    pub fn num_blocks(&self) -> usize {
        self.block_setup().num_ecc_blocks
    }

    /// Number of error correction codewords in each block.
    pub fn num_error_codewords_per_block(&self) -> usize {
        self.block_setup().num_ecc_per_block
    }

    /// Number of data codewords in the given block, `None` if there is
    /// no such block.
    pub fn block_data_size(&self, block: usize) -> Option<usize> {
        let setup = self.block_setup();
        if block < setup.num_ecc_blocks {
            Some(setup.data_in_block(block))
        } else {
            None
        }
    }

    /// Maximal number of corrupted codewords each block can recover from.
    pub fn max_correctable(&self) -> usize {
        self.block_setup().num_ecc_per_block / 2
    }

    pub fn is_square(&self) -> bool {
        let setup = self.block_setup();
        setup.width == setup.height
    }

    /// Symbol is part of the rectangular extension (ISO 21471 DMRE).
    pub fn is_dmre(&self) -> bool {
        matches!(
            self,
            Self::Rect8x48
                | Self::Rect8x64
                | Self::Rect8x80
                | Self::Rect8x96
                | Self::Rect8x120
                | Self::Rect8x144
                | Self::Rect12x64
                | Self::Rect12x88
                | Self::Rect16x64
                | Self::Rect20x36
                | Self::Rect20x44
                | Self::Rect20x64
                | Self::Rect22x48
                | Self::Rect24x48
                | Self::Rect24x64
                | Self::Rect26x40
                | Self::Rect26x48
                | Self::Rect26x64
        )
    }
}

impl PartialOrd for SymbolSize {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SymbolSize {
    fn cmp(&self, other: &Self) -> Ordering {
        fn key(obj: &SymbolSize) -> (usize, usize) {
            let bs = obj.block_setup();
            (bs.num_data, bs.width.pow(2) + bs.height.pow(2))
        }
        key(self).cmp(&key(other))
    }
}

#[test]
fn test_partial_ord_symbol_size() {
    for a in SYMBOL_SIZES {
        for b in SYMBOL_SIZES {
            assert_eq!(
                a.partial_cmp(b) == Some(Ordering::Equal),
                a == b,
                "a = {:?}, b = {:?}",
                a,
                b,
            );
        }
    }
}

#[test]
fn test_symbol_size_order() {
    let mut all: Vec<SymbolSize> = SYMBOL_SIZES.into();
    all.sort_unstable();
    let all2: Vec<SymbolSize> = SymbolSize::all().collect();
    assert_eq!(&all, &all2);
}

#[test]
fn test_iter_all_symbols() {
    let mut all: Vec<SymbolSize> = enum_iterator::all::<SymbolSize>().collect();
    all.sort_unstable();
    assert_eq!(&all, SYMBOL_SIZES);
}

#[test]
fn test_distinguishable_by_size() {
    for size in SymbolSize::all() {
        assert_eq!(
            SymbolSize::from_dimensions(size.width(), size.height()),
            Some(size)
        );
    }
    assert_eq!(SymbolSize::from_dimensions(11, 11), None);
    assert_eq!(
        SymbolSize::from_dimensions(18, 8),
        Some(SymbolSize::Rect8x18)
    );
}

#[test]
fn test_square_and_dmre() {
    let squares = SymbolSize::all().filter(|s| s.is_square()).count();
    let dmre = SymbolSize::all().filter(|s| s.is_dmre()).count();
    assert_eq!(squares, 24);
    assert_eq!(dmre, 18);
    assert!(SymbolSize::all().all(|s| !(s.is_square() && s.is_dmre())));
}

#[test]
fn test_block_data_sizes_add_up() {
    for size in SymbolSize::all() {
        let total: usize = (0..size.num_blocks())
            .map(|b| size.block_data_size(b).unwrap())
            .sum();
        assert_eq!(total, size.num_data_codewords(), "{:?}", size);
        assert_eq!(size.block_data_size(size.num_blocks()), None);
        for b in 0..size.num_blocks() {
            let len = size.block_data_size(b).unwrap() + size.num_error_codewords_per_block();
            assert!(len <= 255, "{:?}", size);
        }
    }
}

#[test]
fn test_square144_has_uneven_blocks() {
    let size = SymbolSize::Square144;
    let sizes: Vec<usize> = (0..10).map(|b| size.block_data_size(b).unwrap()).collect();
    assert_eq!(sizes, [156, 156, 156, 156, 156, 156, 156, 156, 155, 155]);
    assert_eq!(size.num_codewords(), 2178);
}

#[test]
fn test_max_correctable() {
    // the ISO 16022 sizes in the order of the standard's attribute table
    #[rustfmt::skip]
    let sizes = [
        SymbolSize::Square10, SymbolSize::Square12, SymbolSize::Square14, SymbolSize::Square16,
        SymbolSize::Square18, SymbolSize::Square20, SymbolSize::Square22, SymbolSize::Square24,
        SymbolSize::Square26, SymbolSize::Square32, SymbolSize::Square36, SymbolSize::Square40,
        SymbolSize::Square44, SymbolSize::Square48, SymbolSize::Square52, SymbolSize::Square64,
        SymbolSize::Square72, SymbolSize::Square80, SymbolSize::Square88, SymbolSize::Square96,
        SymbolSize::Square104, SymbolSize::Square120, SymbolSize::Square132, SymbolSize::Square144,
        SymbolSize::Rect8x18, SymbolSize::Rect8x32, SymbolSize::Rect12x26, SymbolSize::Rect12x36,
        SymbolSize::Rect16x36, SymbolSize::Rect16x48,
    ];
    #[rustfmt::skip]
    let expected: [usize; 30] = [
        2, 3, 5, 6, 7, 9, 10, 12, 14, 18, 21, 24, 28, 34, 21, 28, 18, 24, 28, 34, 28, 34, 31, 31,
        3, 5, 7, 9, 12, 14,
    ];
    let max: Vec<usize> = sizes.iter().map(|s| s.max_correctable()).collect();
    assert_eq!(max, expected);
}
