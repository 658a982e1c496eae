//! Forney's algorithm for computing the error values.
//!
//! With the syndrome polynomial S(x) = S_1 + S_2 x + ... + S_t x^(t-1) and
//! the error locator Lambda(x), the error evaluator is
//!
//! > Omega(x) = S(x) Lambda(x) mod x^t.
//!
//! An error at location X, so a root X^-1 of Lambda, has the value
//!
//! > Y = Omega(X^-1) / Lambda'(X^-1)
//!
//! where Lambda' is the formal derivative. In characteristic 2 only the odd
//! degree terms of Lambda survive the differentiation.
use arrayvec::ArrayVec;

use super::super::{galois::GF, MAX_ERROR_WORDS};

/// Compute Omega(x) = S(x) Lambda(x) mod x^t, lowest degree first.
pub(super) fn error_evaluator(syn: &[GF], lambda: &[GF]) -> ArrayVec<GF, MAX_ERROR_WORDS> {
    (0..syn.len())
        .map(|i| {
            syn[..=i]
                .iter()
                .rev()
                .zip(lambda.iter())
                .map(|(s, l)| *s * *l)
                .sum::<GF>()
        })
        .collect()
}

/// Evaluate a polynomial, coefficients lowest degree first, at `x`.
fn evaluate(coeffs: &[GF], x: GF) -> GF {
    coeffs.iter().rev().fold(GF(0), |acc, c| acc * x + *c)
}

/// Evaluate the formal derivative of `lambda` at `x`.
fn evaluate_derivative(lambda: &[GF], x: GF) -> GF {
    lambda
        .iter()
        .enumerate()
        .skip(1)
        .rev()
        // lk * k is not a field multiplication, see Mul<usize> for GF
        .fold(GF(0), |acc, (k, lk)| acc * x + *lk * k)
}

/// Compute the error value for the root a^`root` of the error locator.
///
/// Returns `None` if the derivative vanishes at the root or the value is
/// zero. Neither can happen for a correctly located error.
pub(super) fn error_value(omega: &[GF], lambda: &[GF], root: usize) -> Option<GF> {
    let x = GF::primitive_power(root);
    let denominator = evaluate_derivative(lambda, x);
    if denominator.is_zero() {
        return None;
    }
    let value = evaluate(omega, x) / denominator;
    if value.is_zero() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
use alloc::vec::Vec;

#[cfg(test)]
fn locator_for(degrees: &[usize]) -> Vec<GF> {
    let mut lambda = alloc::vec![GF(1)];
    for d in degrees {
        let x_k = GF::primitive_power(*d);
        lambda.push(GF(0));
        for j in (1..lambda.len()).rev() {
            let lower = lambda[j - 1];
            lambda[j] += x_k * lower;
        }
    }
    lambda
}

#[test]
fn derivative_keeps_odd_terms() {
    // Lambda(x) = 1 + 3x + 5x^2 + 7x^3, Lambda'(x) = 3 + 7x^2
    let lambda = [GF(1), GF(3), GF(5), GF(7)];
    for x in 0..=255 {
        let x = GF(x);
        assert_eq!(evaluate_derivative(&lambda, x), GF(3) + GF(7) * x * x);
    }
}

#[test]
fn derivative_matches_product_form() {
    // Lambda'(X_i^-1) = X_i * prod_{j != i} (1 + X_j X_i^-1)
    let degrees = [4, 9, 33, 120, 250];
    let lambda = locator_for(&degrees);
    for (i, d_i) in degrees.iter().enumerate() {
        let x_i = GF::primitive_power(*d_i);
        let x_i_inv = GF(1) / x_i;
        let product = degrees
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .fold(x_i, |acc, (_, d_j)| {
                acc * (GF(1) + GF::primitive_power(*d_j) * x_i_inv)
            });
        assert_eq!(evaluate_derivative(&lambda, x_i_inv), product);
    }
}

#[test]
fn error_values_are_recovered() {
    let errors = [(0, 17), (5, 1), (80, 255), (254, 42)];
    let t = 8;
    let syn: Vec<GF> = (1..=t)
        .map(|i| {
            errors
                .iter()
                .map(|(d, y)| GF(*y).mul_primitive_power(i * d))
                .sum::<GF>()
        })
        .collect();
    let degrees: Vec<usize> = errors.iter().map(|(d, _)| *d).collect();
    let lambda = locator_for(&degrees);
    let omega = error_evaluator(&syn, &lambda);
    assert_eq!(omega.len(), t);
    for (d, y) in errors.iter() {
        let root = (255 - d) % 255;
        assert_eq!(error_value(&omega, &lambda, root), Some(GF(*y)), "degree {}", d);
    }
}

#[test]
fn vanishing_derivative_is_rejected() {
    // Lambda(x) = (1 + x)^2 = 1 + x^2 has a vanishing derivative
    let lambda = [GF(1), GF(0), GF(1)];
    let omega = [GF(5), GF(6)];
    assert_eq!(error_value(&omega, &lambda, 0), None);
}
