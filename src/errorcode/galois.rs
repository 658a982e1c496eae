//! GF(256) arithmetic for the Data Matrix Reed-Solomon code.
//!
//! An element is stored as a `u8` whose bits are the coefficients of a
//! polynomial of degree at most 7, the least significant bit being the
//! constant term:
//!
//! > 45 = 0b00101101 = x^5 + x^3 + x^2 + 1.
//!
//! Addition is coefficient-wise modulo 2, so a plain XOR. Every element is its
//! own additive inverse and subtraction is the same operation.
//!
//! Multiplication is polynomial multiplication modulo x^8 + x^5 + x^3 + x^2 + 1,
//! the polynomial 301 (0x12D) prescribed by ISO 16022. It is primitive: the
//! powers 1, x, x^2, ..., x^254 run through all 255 non-zero elements before
//! repeating. Writing a = x^i and b = x^j turns a product into a sum of
//! exponents, a * b = x^((i + j) mod 255). The two tables in this module
//! translate between both views, `LOG` from element to exponent and `ANTI_LOG`
//! back.
use core::iter::Sum;
use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// The primitive polynomial x^8 + x^5 + x^3 + x^2 + 1.
const PRIMITIVE_POLYNOMIAL: u16 = 0x12D;

/// Order of the multiplicative group.
pub(crate) const ORDER: usize = 255;

/// `LOG[0]` has no meaning, zero has no logarithm.
const LOG_SENTINEL: u8 = 255;

/// Compute the antilog and log tables, checking that they invert each other.
const fn compute_alog_log() -> ([u8; 256], [u8; 256]) {
    let mut alog = [0u8; 256];
    let mut log = [LOG_SENTINEL; 256];
    let mut p: u16 = 1;
    let mut i = 0;
    while i < ORDER {
        alog[i] = p as u8;
        log[p as usize] = i as u8;

        // multiply by x and reduce
        p <<= 1;
        if p >= 256 {
            p ^= PRIMITIVE_POLYNOMIAL;
        }
        i += 1;
    }
    // x^255 = 1 again, the polynomial is primitive
    assert!(p == 1);

    let mut i = 0;
    while i < ORDER {
        assert!(log[alog[i] as usize] as usize == i);
        i += 1;
    }
    (alog, log)
}

const TABLES: ([u8; 256], [u8; 256]) = compute_alog_log();

/// Exponent to element. The last entry is unused and zero.
static ANTI_LOG: [u8; 256] = TABLES.0;

/// Element to exponent. The first entry is a sentinel.
static LOG: [u8; 256] = TABLES.1;

#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct GF(pub u8);

impl GF {
    /// Iterator over 1, a, a^2, ... for the primitive element a, repeating
    /// after a^254.
    pub fn primitive_powers() -> impl Iterator<Item = Self> + Clone {
        ANTI_LOG[..ORDER].iter().map(|x| Self(*x)).cycle()
    }

    /// The element a^i for the primitive element a.
    #[inline]
    pub fn primitive_power(i: usize) -> Self {
        GF(ANTI_LOG[i % ORDER])
    }

    /// Compute `self * a^k` with a single table lookup for `self`.
    #[inline]
    pub fn mul_primitive_power(self, k: usize) -> Self {
        if self.0 == 0 {
            return GF(0);
        }
        GF(ANTI_LOG[(LOG[self.0 as usize] as usize + k % ORDER) % ORDER])
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl core::fmt::Debug for GF {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_fmt(format_args!("{}₂₅₆", self.0))
    }
}

impl Add<GF> for GF {
    type Output = Self;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn add(self, rhs: Self) -> Self {
        GF(self.0 ^ rhs.0)
    }
}

impl AddAssign<GF> for GF {
    fn add_assign(&mut self, rhs: GF) {
        *self = *self + rhs;
    }
}

impl Sub<GF> for GF {
    type Output = Self;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn sub(self, rhs: Self) -> Self {
        self + rhs
    }
}

impl SubAssign<GF> for GF {
    fn sub_assign(&mut self, rhs: GF) {
        *self = *self - rhs;
    }
}

impl Mul<GF> for GF {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        if self.0 == 0 || rhs.0 == 0 {
            return GF(0);
        }
        let ia = LOG[self.0 as usize] as usize;
        let ib = LOG[rhs.0 as usize] as usize;
        GF(ANTI_LOG[(ia + ib) % ORDER])
    }
}

impl Mul<usize> for GF {
    type Output = Self;

    fn mul(self, rhs: usize) -> Self {
        // n-fold addition, elements are their own additive inverse
        // so only the parity of n matters.
        GF(self.0 * (rhs % 2) as u8)
    }
}

impl MulAssign<GF> for GF {
    fn mul_assign(&mut self, rhs: GF) {
        *self = *self * rhs;
    }
}

impl Div<GF> for GF {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        assert_ne!(rhs.0, 0, "division by zero");
        if self.0 == 0 {
            return GF(0);
        }
        let ia = LOG[self.0 as usize] as usize;
        let ib = LOG[rhs.0 as usize] as usize;
        GF(ANTI_LOG[(ia + ORDER - ib) % ORDER])
    }
}

impl Neg for GF {
    type Output = Self;

    fn neg(self) -> Self {
        self
    }
}

impl From<GF> for u8 {
    fn from(x: GF) -> u8 {
        x.0
    }
}

impl From<u8> for GF {
    fn from(i: u8) -> Self {
        GF(i)
    }
}

impl Sum for GF {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(GF(0), |a, b| a + b)
    }
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn sanity_check_tables() {
    use std::collections::HashSet;

    let anti_log: HashSet<u8> = ANTI_LOG[..ORDER].iter().cloned().collect();
    assert_eq!(anti_log.len(), ORDER);
    assert!(!anti_log.contains(&0));

    let log: HashSet<u8> = LOG[1..].iter().cloned().collect();
    assert_eq!(log.len(), LOG.len() - 1);

    for i in 0..ORDER {
        assert_eq!(i, LOG[ANTI_LOG[i] as usize] as usize);
        assert_eq!(i + 1, ANTI_LOG[LOG[i + 1] as usize] as usize);
    }
    assert_eq!(LOG[0], LOG_SENTINEL);
    assert_eq!(ANTI_LOG[255], 0);
}

#[test]
fn tables_match_iso_16022() {
    assert_eq!(&ANTI_LOG[..10], &[1, 2, 4, 8, 16, 32, 64, 128, 45, 90]);
    assert_eq!(ANTI_LOG[254], 150);
    assert_eq!(&LOG[1..8], &[0, 1, 240, 2, 225, 241, 53]);
    assert_eq!(LOG[255], 150);
}

#[test]
fn gf256_mul() {
    assert_eq!(GF(123) * GF(1), GF(123));
    assert_eq!(GF(234) * GF(0), GF(0));
    assert_eq!(GF(0) * GF(23), GF(0));
    assert_eq!(GF(2) * GF(4) * GF(8) * GF(16) * GF(32), GF(228));
}

#[test]
fn gf256_field_laws() {
    for a in 0..=255 {
        let a = GF(a);
        assert_eq!(a + a, GF(0));
        assert_eq!(a * GF(0), GF(0));
        assert_eq!(a * GF(1), a);
        for b in 0..=255 {
            let b = GF(b);
            assert_eq!(a * b, b * a, "{:?} * {:?}", a, b);
            assert_eq!(a + b, b + a);
        }
    }
}

#[test]
fn gf256_div_mul() {
    for a in 0..=255 {
        for b in 1..=255 {
            let a_div_b = GF(a) / GF(b);
            assert_eq!(a_div_b * GF(b), GF(a));
        }
    }
}

#[test]
fn mul_primitive_power_matches_mul() {
    for a in 0..=255 {
        for k in 0..600 {
            assert_eq!(
                GF(a).mul_primitive_power(k),
                GF(a) * GF::primitive_power(k),
                "a = {}, k = {}",
                a,
                k
            );
        }
    }
}

#[test]
fn test_gf256_power_iterator() {
    let powers: std::vec::Vec<GF> = GF::primitive_powers().take(500).collect();
    let mut power_direct = std::vec::Vec::with_capacity(500);
    let mut a = GF(1);
    for i in 0..500 {
        power_direct.push(a);
        assert_eq!(GF::primitive_power(i), a);
        a *= GF(2);
    }
    assert_eq!(powers, power_direct);
}

#[test]
fn test_neg() {
    for a in 0..=255 {
        let a = GF(a);
        assert_eq!(a + -a, GF(0), "{:?}", a);
    }
}

#[test]
fn test_mul_usize() {
    assert_eq!(GF(5) * 1, GF(5));
    assert_eq!(GF(5) * 2, GF(5) + GF(5));
    assert_eq!(GF(5) * 3, GF(5));
}
