//! Trial-division factorization into prime-power form.
//!
//! This is the innermost oracle of the pipeline: the enumerator calls it
//! three times per accepted triple, so the \(d^2 \le n\) cutoff
//! (O(\(\sqrt{n}\)) worst case, hit when `n` is prime) is part of the
//! contract, not an implementation detail.

// ============================================================================
// PrimeFactorization
// ============================================================================

/// Prime-power decomposition of an integer's magnitude.
///
/// `Primes` holds `(prime, exponent)` pairs strictly increasing in the
/// prime, with every exponent at least 1 and the product of
/// `prime^exponent` equal to the factored magnitude. `factorize(1)` yields
/// an empty `Primes` list.
///
/// `Zero` tags the degenerate input `n = 0`. It is a control-flow marker,
/// not a factorization: it carries no prime support, and callers that can
/// receive it must branch on the variant explicitly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrimeFactorization {
    /// Degenerate input `n = 0`.
    Zero,
    /// Sorted `(prime, exponent)` pairs.
    Primes(Vec<(u64, u32)>),
}

impl PrimeFactorization {
    /// Returns the `(prime, exponent)` pairs (empty for [`Self::Zero`]).
    #[inline]
    pub fn pairs(&self) -> &[(u64, u32)] {
        match self {
            Self::Zero => &[],
            Self::Primes(pairs) => pairs,
        }
    }

    /// Returns the exponent of `p`, or 0 when `p` does not divide the value.
    #[inline]
    pub fn exponent_of(&self, p: u64) -> u32 {
        let pairs = self.pairs();
        pairs
            .binary_search_by_key(&p, |&(q, _)| q)
            .map_or(0, |i| pairs[i].1)
    }

    /// Returns `true` for the degenerate zero case.
    #[inline]
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Zero)
    }

    /// Reconstructs the factored magnitude (0 for [`Self::Zero`]).
    ///
    /// Validation uses this to cross-check a factorization against the
    /// integer it came from.
    pub fn value(&self) -> u64 {
        match self {
            Self::Zero => 0,
            Self::Primes(pairs) => pairs.iter().fold(1u64, |acc, &(p, e)| acc * p.pow(e)),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Factors `n` by trial division.
///
/// The sign is discarded: `factorize(-12)` equals `factorize(12)`. Input 0
/// yields [`PrimeFactorization::Zero`]. Each divisor is divided out
/// completely before advancing, the scan stops once `d * d` exceeds the
/// remaining cofactor, and a cofactor above 1 at that point is itself
/// prime. Always terminates, no side effects.
pub fn factorize(n: i64) -> PrimeFactorization {
    let mut m = n.unsigned_abs();
    if m == 0 {
        return PrimeFactorization::Zero;
    }

    let mut pairs = Vec::new();
    let mut d: u64 = 2;
    while d * d <= m {
        if m % d == 0 {
            let mut e = 0u32;
            while m % d == 0 {
                m /= d;
                e += 1;
            }
            pairs.push((d, e));
        }
        d += 1;
    }
    if m > 1 {
        pairs.push((m, 1));
    }
    PrimeFactorization::Primes(pairs)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn pairs_of(n: i64) -> Vec<(u64, u32)> {
        match factorize(n) {
            PrimeFactorization::Zero => panic!("unexpected zero factorization for {n}"),
            PrimeFactorization::Primes(pairs) => pairs,
        }
    }

    fn is_prime(n: u64) -> bool {
        if n < 2 {
            return false;
        }
        let mut d = 2u64;
        while d * d <= n {
            if n % d == 0 {
                return false;
            }
            d += 1;
        }
        true
    }

    #[test]
    fn known_factorizations() {
        assert_eq!(pairs_of(1), vec![]);
        assert_eq!(pairs_of(2), vec![(2, 1)]);
        assert_eq!(pairs_of(9), vec![(3, 2)]);
        assert_eq!(pairs_of(12), vec![(2, 2), (3, 1)]);
        assert_eq!(pairs_of(97), vec![(97, 1)]);
        assert_eq!(pairs_of(125), vec![(5, 3)]);
        assert_eq!(pairs_of(128), vec![(2, 7)]);
        assert_eq!(pairs_of(360), vec![(2, 3), (3, 2), (5, 1)]);
    }

    #[test]
    fn zero_is_a_tagged_case() {
        let f = factorize(0);
        assert!(f.is_zero());
        assert!(f.pairs().is_empty());
        assert_eq!(f.value(), 0);
    }

    #[test]
    fn sign_is_discarded() {
        assert_eq!(factorize(-12), factorize(12));
        assert_eq!(factorize(i64::MIN + 1), factorize(i64::MAX));
    }

    #[test]
    fn large_prime_cofactor_is_recorded() {
        // 1_000_003 is prime, so the scan stops at its square root and the
        // cofactor must be flushed with exponent 1.
        assert_eq!(pairs_of(2 * 1_000_003), vec![(2, 1), (1_000_003, 1)]);
        assert_eq!(pairs_of(1_000_003), vec![(1_000_003, 1)]);
    }

    #[test]
    fn exponent_of_present_and_absent_primes() {
        let f = factorize(360);
        assert_eq!(f.exponent_of(2), 3);
        assert_eq!(f.exponent_of(3), 2);
        assert_eq!(f.exponent_of(5), 1);
        assert_eq!(f.exponent_of(7), 0);
    }

    #[test]
    fn product_reconstructs_input_on_random_values() {
        let mut rng = XorShiftRng::seed_from_u64(0xABC0FFEE);
        for _case in 0..200 {
            let n: u64 = rng.random_range(1..=5_000_000);
            let f = factorize(n as i64);
            assert_eq!(f.value(), n, "product of prime powers must equal {n}");

            let pairs = f.pairs();
            for window in pairs.windows(2) {
                assert!(window[0].0 < window[1].0, "primes must be strictly increasing");
            }
            for &(p, e) in pairs {
                assert!(is_prime(p), "{p} recorded as a factor of {n} but is not prime");
                assert!(e >= 1);
            }
        }
    }
}
