/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Dense-vector kernels.
//!
//! All sums are accumulated sequentially in index order, so results are
//! reproducible bit by bit independently of the number of threads.
//!
//! The binary kernels panic if their arguments have different lengths.

/// Divides `v` by the sum of its entries, returning the sum before
/// normalization.
///
/// If the sum is zero, the entries become NaN or infinite.
pub fn normalize(v: &mut [f64]) -> f64 {
    let sum = v.iter().sum::<f64>();
    for x in v.iter_mut() {
        *x /= sum;
    }
    sum
}

/// Returns the 𝓁₁ norm of `v`.
pub fn norm1(v: &[f64]) -> f64 {
    v.iter().map(|x| x.abs()).sum()
}

/// Returns the scalar product of `a` and `b`.
pub fn scalar_product(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Returns ‖`a` − `b`‖₁.
pub fn diff_norm1(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

/// Returns ∑ᵢ |*aᵢ* − *bᵢ*| / (|*aᵢ*| + |*bᵢ*|), skipping the indices at which
/// the denominator is zero.
pub fn diff_norm_rel(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    let mut sum = 0.0;
    for (x, y) in a.iter().zip(b) {
        let den = x.abs() + y.abs();
        if den > 0.0 {
            sum += (x - y).abs() / den;
        }
    }
    sum
}

/// Sets `v` to `v` − `lambda` `w`.
pub fn sub_scaled(v: &mut [f64], lambda: f64, w: &[f64]) {
    assert_eq!(v.len(), w.len());
    for (x, y) in v.iter_mut().zip(w) {
        *x -= lambda * y;
    }
}

/// Sets `v` to `lambda` `w`.
pub fn set_scaled(v: &mut [f64], lambda: f64, w: &[f64]) {
    assert_eq!(v.len(), w.len());
    for (x, y) in v.iter_mut().zip(w) {
        *x = lambda * y;
    }
}

/// Sets `v` to `v` + `w`.
pub fn add_assign(v: &mut [f64], w: &[f64]) {
    assert_eq!(v.len(), w.len());
    for (x, y) in v.iter_mut().zip(w) {
        *x += y;
    }
}

/// Multiplies `v` by `lambda`.
pub fn scale(v: &mut [f64], lambda: f64) {
    for x in v.iter_mut() {
        *x *= lambda;
    }
}
