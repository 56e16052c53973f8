//! Fast deterministic validation of known high-quality triples.

use crate::factor::{factorize, PrimeFactorization};
use crate::metrics::Metrics;
use crate::search::enumerate;

/// Metric tolerance for the recomputed quality.
const QUALITY_EPS: f64 = 1e-9;

// ============================================================================
// Bundled triples
// ============================================================================

/// A triple with independently established metric values.
struct KnownTriple {
    a: u64,
    b: u64,
    c: u64,
    quality: f64,
    ramification_depth: u32,
}

/// Classic high-quality examples, smallest `c` first.
const KNOWN_TRIPLES: &[KnownTriple] = &[
    KnownTriple { a: 1, b: 8, c: 9, quality: 1.226_294_385_530_917, ramification_depth: 3 },
    KnownTriple { a: 5, b: 27, c: 32, quality: 1.018_975_235_452_531, ramification_depth: 5 },
    KnownTriple { a: 32, b: 49, c: 81, quality: 1.175_718_991_634_877, ramification_depth: 5 },
    KnownTriple { a: 3, b: 125, c: 128, quality: 1.426_565_329_633_543, ramification_depth: 7 },
];

// ============================================================================
// Public API
// ============================================================================

/// Validates the bundled known triples.
///
/// For each triple this re-runs the factorizer on all three components,
/// multiplies each factorization back to the component it came from,
/// recomputes quality and ramification depth against the stored values,
/// and confirms the enumerator reproduces the triple at `limit = c`.
///
/// # Errors
/// Returns a message naming the first triple that fails and why.
pub fn validate_known_triples() -> Result<(), String> {
    for triple in KNOWN_TRIPLES {
        check_triple(triple)?;
    }
    Ok(())
}

// ============================================================================
// Internal
// ============================================================================

fn check_triple(t: &KnownTriple) -> Result<(), String> {
    let name = format!("({}, {}, {})", t.a, t.b, t.c);
    if t.a + t.b != t.c {
        return Err(format!("{name}: components do not sum"));
    }

    let fa = factorize(t.a as i64);
    let fb = factorize(t.b as i64);
    let fc = factorize(t.c as i64);
    check_roundtrip(&name, t.a, &fa)?;
    check_roundtrip(&name, t.b, &fb)?;
    check_roundtrip(&name, t.c, &fc)?;

    let m = Metrics::compute(t.c, &fa, &fb, &fc);
    if (m.quality - t.quality).abs() > QUALITY_EPS {
        return Err(format!(
            "{name}: quality {} drifted from expected {}",
            m.quality, t.quality
        ));
    }
    if m.ramification_depth != t.ramification_depth {
        return Err(format!(
            "{name}: ramification depth {} != expected {}",
            m.ramification_depth, t.ramification_depth
        ));
    }

    let reproduced = enumerate(t.c).any(|(tri, _)| (tri.a, tri.b, tri.c) == (t.a, t.b, t.c));
    if !reproduced {
        return Err(format!("{name}: enumerator did not reproduce the triple"));
    }
    Ok(())
}

fn check_roundtrip(name: &str, n: u64, f: &PrimeFactorization) -> Result<(), String> {
    if f.value() != n {
        return Err(format!(
            "{name}: factorization of {n} multiplies back to {}",
            f.value()
        ));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_triples_are_valid() {
        validate_known_triples().unwrap();
    }

    #[test]
    fn check_triple_rejects_wrong_quality() {
        let bad = KnownTriple {
            a: 1,
            b: 8,
            c: 9,
            quality: 1.5,
            ramification_depth: 3,
        };
        let result = check_triple(&bad);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("quality"));
    }

    #[test]
    fn check_triple_rejects_wrong_depth() {
        let bad = KnownTriple {
            a: 1,
            b: 8,
            c: 9,
            quality: 1.226_294_385_530_917,
            ramification_depth: 4,
        };
        let result = check_triple(&bad);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("ramification depth"));
    }

    #[test]
    fn check_triple_rejects_non_summing_components() {
        let bad = KnownTriple {
            a: 1,
            b: 8,
            c: 10,
            quality: 1.0,
            ramification_depth: 0,
        };
        assert!(check_triple(&bad).is_err());
    }
}
