//! The Berlekamp-Massey (BM) algorithm for finding the error locator polynomial.
//!
//! BM computes the shortest linear feedback shift register (LFSR) generating
//! the syndrome sequence. Its connection polynomial is the error locator
//! polynomial Lambda(x) = 1 + Lambda_1 x + ... + Lambda_L x^L whose
//! roots are the inverses of the error locations.
//!
//! Only the current polynomial and the one before the last length change
//! are kept, together with the discrepancy at that change and the shift
//! since then.
use arrayvec::ArrayVec;

use super::super::{galois::GF, MAX_ERROR_WORDS};

/// Coefficients of an error locator polynomial, lowest degree first.
pub(super) type Locator = ArrayVec<GF, { MAX_ERROR_WORDS + 1 }>;

/// Compute the error locator polynomial for the syndromes S_1, ..., S_t.
///
/// The returned polynomial has `L + 1` coefficients where `L` is the length
/// of the final LFSR. The caller must check `L` against the correction
/// capacity, it is not an error here.
///
/// The iteration stops early once `max_correctable + L` syndromes are
/// processed; the remaining ones can not change an LFSR that is short
/// enough to be used.
pub(super) fn error_locator(syn: &[GF], max_correctable: usize) -> Locator {
    debug_assert!(syn.len() <= MAX_ERROR_WORDS);
    let size = syn.len() + 1;
    let mut cur: Locator = core::iter::repeat(GF(0)).take(size).collect(); // connection polynomial
    let mut prev = cur.clone(); // polynomial before last length change
    cur[0] = GF(1);
    prev[0] = GF(1);
    let mut len_lfsr = 0; // current length of the LFSR
    let mut shift = 1; // steps since the last length change
    let mut discrepancy_m = GF(1); // discrepancy at the last length change

    for k in 0..syn.len() {
        let discrepancy = syn[k]
            + cur[1..=len_lfsr]
                .iter()
                .zip(syn[..k].iter().rev())
                .map(|(a, b)| *a * *b)
                .sum();
        if discrepancy == GF(0) {
            shift += 1;
        } else if 2 * len_lfsr > k {
            // update without length change
            let scale = discrepancy / discrepancy_m;
            for (ci, pj) in cur[shift..].iter_mut().zip(prev.iter()) {
                *ci -= scale * *pj;
            }
            shift += 1;
        } else {
            // update with length change
            let before = cur.clone();
            let scale = discrepancy / discrepancy_m;
            for (ci, pj) in cur[shift..].iter_mut().zip(prev.iter()) {
                *ci -= scale * *pj;
            }
            len_lfsr = k + 1 - len_lfsr;
            prev = before;
            discrepancy_m = discrepancy;
            shift = 1;
        }
        if k + 1 >= len_lfsr + max_correctable {
            break;
        }
    }

    cur.truncate(len_lfsr + 1);
    cur
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn syndromes_of(errors: &[(usize, u8)], t: usize) -> alloc::vec::Vec<GF> {
    // S_i = sum_k Y_k X_k^i for errors Y_k at degree d_k, X_k = a^d_k
    (1..=t)
        .map(|i| {
            errors
                .iter()
                .map(|(d, y)| GF(*y).mul_primitive_power(i * d))
                .sum::<GF>()
        })
        .collect()
}

#[test]
fn no_errors_give_trivial_locator() {
    let syn = [GF(0); 10];
    assert_eq!(error_locator(&syn, 5).as_slice(), &[GF(1)]);
}

#[test]
fn single_error() {
    // error at degree 7: Lambda(x) = 1 + a^7 x
    let syn = syndromes_of(&[(7, 99)], 6);
    let lambda = error_locator(&syn, 3);
    assert_eq!(lambda.as_slice(), &[GF(1), GF::primitive_power(7)]);
}

#[test]
fn locator_is_product_of_error_factors() {
    let errors = [(0, 1), (12, 200), (100, 37), (254, 5)];
    let syn = syndromes_of(&errors, 10);
    let lambda = error_locator(&syn, 5);
    assert_eq!(lambda.len(), errors.len() + 1);

    // expand prod (1 + X_k x)
    let mut expected = alloc::vec![GF(1)];
    for (d, _) in errors.iter() {
        let x_k = GF::primitive_power(*d);
        expected.push(GF(0));
        for j in (1..expected.len()).rev() {
            let lower = expected[j - 1];
            expected[j] += x_k * lower;
        }
    }
    assert_eq!(lambda.as_slice(), &expected[..]);
}

#[test]
fn early_exit_bounds_lfsr_length() {
    // six errors are more than t = 5 can handle, the shortened iteration
    // still never returns an LFSR longer than the capacity
    let syn = syndromes_of(&[(1, 1), (2, 2), (3, 3), (4, 4), (5, 5), (6, 6)], 5);
    let lambda = error_locator(&syn, 2);
    assert_eq!(lambda.as_slice(), &[GF(1), GF(0), GF(148)]);
}

#[test]
fn lfsr_generates_syndromes() {
    let syn = syndromes_of(&[(3, 17), (77, 1), (201, 250)], 8);
    let lambda = error_locator(&syn, 4);
    let len = lambda.len() - 1;
    assert_eq!(len, 3);
    for k in len..syn.len() {
        let value: GF = (0..=len).map(|j| lambda[j] * syn[k - j]).sum();
        assert_eq!(value, GF(0), "k = {}", k);
    }
}
