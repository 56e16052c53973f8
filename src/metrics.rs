//! Quality and ramification-depth invariants over factored triples.
//!
//! Everything here is a pure function of the three [`PrimeFactorization`]s
//! of a triple's components (and `c` itself for the quality ratio). The
//! radical is carried as `u128` because \(\mathrm{rad}(abc)\) can approach
//! `limit`³ for large search bounds.

use crate::factor::PrimeFactorization;

// ============================================================================
// Metrics
// ============================================================================

/// Derived invariants of one triple.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    /// Squarefree kernel of `a * b * c`.
    pub radical: u128,
    /// `ln(c) / ln(radical)`, or the documented sentinel when radical <= 1.
    pub quality: f64,
    /// Maximum single-prime valuation jump between either summand and `c`.
    pub ramification_depth: u32,
}

impl Metrics {
    /// Computes all three invariants for the triple behind `fa`, `fb`, `fc`.
    pub fn compute(
        c: u64,
        fa: &PrimeFactorization,
        fb: &PrimeFactorization,
        fc: &PrimeFactorization,
    ) -> Self {
        let radical = radical(fa, fb, fc);
        Self {
            radical,
            quality: quality_from_radical(c, radical),
            ramification_depth: ramification_depth(fa, fb, fc),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Product of every prime appearing in any of the three factorizations,
/// each to the first power. Returns 1 on an empty union. A `Zero`
/// factorization contributes no primes.
pub fn radical(
    fa: &PrimeFactorization,
    fb: &PrimeFactorization,
    fc: &PrimeFactorization,
) -> u128 {
    support_union(fa, fb, fc)
        .iter()
        .fold(1u128, |acc, &p| acc * u128::from(p))
}

/// The abc quality `ln(c) / ln(rad)`.
///
/// When the radical degenerates to <= 1 this returns `f64::INFINITY` for
/// `c > 1` and `0.0` otherwise. The enumerator's filters never produce
/// that case; the boundary is kept exactly as documented.
pub fn quality(
    c: u64,
    fa: &PrimeFactorization,
    fb: &PrimeFactorization,
    fc: &PrimeFactorization,
) -> f64 {
    quality_from_radical(c, radical(fa, fb, fc))
}

/// Maximum over all primes `p` of `|v_p(a) - v_p(c)|` and
/// `|v_p(b) - v_p(c)|`. Returns 0 on an empty support union.
pub fn ramification_depth(
    fa: &PrimeFactorization,
    fb: &PrimeFactorization,
    fc: &PrimeFactorization,
) -> u32 {
    let mut depth = 0u32;
    for &p in &support_union(fa, fb, fc) {
        let vc = fc.exponent_of(p);
        depth = depth
            .max(fa.exponent_of(p).abs_diff(vc))
            .max(fb.exponent_of(p).abs_diff(vc));
    }
    depth
}

// ============================================================================
// Internal
// ============================================================================

#[inline]
fn quality_from_radical(c: u64, radical: u128) -> f64 {
    if radical <= 1 {
        if c > 1 {
            f64::INFINITY
        } else {
            0.0
        }
    } else {
        (c as f64).ln() / (radical as f64).ln()
    }
}

/// Distinct primes of the three factorizations, ascending.
fn support_union(
    fa: &PrimeFactorization,
    fb: &PrimeFactorization,
    fc: &PrimeFactorization,
) -> Vec<u64> {
    let mut primes: Vec<u64> = fa
        .pairs()
        .iter()
        .chain(fb.pairs())
        .chain(fc.pairs())
        .map(|&(p, _)| p)
        .collect();
    primes.sort_unstable();
    primes.dedup();
    primes
}

// ============================================================================
// Tests
// ============================================================================
