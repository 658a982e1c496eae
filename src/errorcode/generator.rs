//! Generator polynomials of the Data Matrix Reed-Solomon codes.
use arrayvec::ArrayVec;

use super::{galois::GF, LayoutError, MAX_ERROR_WORDS};

/// Coefficients of a generator polynomial, lowest degree first.
///
/// The polynomial is monic, the leading coefficient is not stored. So
/// for `t` error codewords there are exactly `t` entries.
pub(crate) type Generator = ArrayVec<GF, MAX_ERROR_WORDS>;

/// Build the generator polynomial (x + a)(x + a^2)...(x + a^t).
///
/// The product is computed in place. In round `i` the current polynomial has
/// degree `i - 1` and is multiplied by (x + a^i); walking from the highest
/// coefficient down means every `gen[j - 1]` is still the old value when
/// `gen[j]` reads it.
pub(crate) fn generator(t: usize) -> Result<Generator, LayoutError> {
    if t == 0 || t > MAX_ERROR_WORDS {
        return Err(LayoutError::ParityCount(t));
    }
    let mut gen: Generator = core::iter::repeat(GF(1)).take(t).collect();
    for i in 1..=t {
        for j in (0..i).rev() {
            gen[j] = gen[j].mul_primitive_power(i);
            if j > 0 {
                let lower = gen[j - 1];
                gen[j] += lower;
            }
        }
    }
    Ok(gen)
}

/// Compute the coefficients of the generator polynomial for `t` error codewords.
///
/// The coefficients are returned lowest degree first and without the
/// leading 1, e.g. `t = 5` gives `[228, 48, 15, 111, 62]` for
/// x^5 + 62x^4 + 111x^3 + 15x^2 + 48x + 228.
pub fn generator_polynomial(t: usize) -> Result<ArrayVec<u8, MAX_ERROR_WORDS>, LayoutError> {
    Ok(generator(t)?.into_iter().map(u8::from).collect())
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn evaluate(gen: &[GF], x: GF) -> GF {
    // Horner, starting with the implicit leading 1
    gen.iter().rev().fold(GF(1), |acc, c| acc * x + *c)
}

#[test]
fn generator_small() {
    assert_eq!(
        generator_polynomial(5).unwrap().as_slice(),
        &[228, 48, 15, 111, 62]
    );
    assert_eq!(
        generator_polynomial(7).unwrap().as_slice(),
        &[23, 68, 144, 134, 240, 92, 254]
    );
    assert_eq!(generator_polynomial(1).unwrap().as_slice(), &[2]);
}

#[test]
fn generator_68_matches_published_coefficients() {
    // ISO 16022, highest degree first, leading 1 omitted
    #[rustfmt::skip]
    let published: [u8; 68] = [
        186, 82, 103, 96, 63, 132, 153, 108, 54, 64, 189, 211, 232, 49, 25, 172, 52, 59, 241,
        181, 239, 223, 136, 231, 210, 96, 232, 220, 25, 179, 167, 202, 185, 153, 139, 66, 236,
        227, 160, 15, 213, 93, 122, 68, 177, 158, 197, 234, 180, 248, 136, 213, 127, 73, 36,
        154, 244, 147, 33, 89, 56, 159, 149, 251, 89, 173, 228, 220,
    ];
    let mut gen = generator_polynomial(68).unwrap();
    gen.reverse();
    assert_eq!(gen.as_slice(), &published[..]);
}

#[test]
fn generator_vanishes_at_its_roots() {
    for t in 1..=MAX_ERROR_WORDS {
        let gen = generator(t).unwrap();
        assert_eq!(gen.len(), t);
        for i in 1..=t {
            assert_eq!(evaluate(&gen, GF::primitive_power(i)), GF(0), "t = {}, i = {}", t, i);
        }
        // a^(t + 1) is not a root
        assert_ne!(evaluate(&gen, GF::primitive_power(t + 1)), GF(0));
    }
}

#[test]
fn generator_parity_count_out_of_range() {
    assert_eq!(generator(0), Err(LayoutError::ParityCount(0)));
    assert_eq!(generator(69), Err(LayoutError::ParityCount(69)));
}
