//! Fan-in scaled uniform initialization.
//!
//! Matches the Kaiming uniform scheme with a leaky-ReLU slope of zero:
//! values are drawn from `U[-bound, bound)` with `bound = sqrt(6 / fan_in)`.

use rand::Rng;

/// Initializer bound for a weight with `fan_in` input connections.
pub fn kaiming_uniform_bound(fan_in: usize) -> f64 {
    (6.0f64 / fan_in as f64).sqrt()
}

/// Fills `values` in place from `U[-bound, bound)`.
///
/// `fan_in` is the second dimension of an `(out, in)` weight matrix and must
/// be positive.
pub fn kaiming_uniform<R: Rng + ?Sized>(values: &mut [f64], fan_in: usize, rng: &mut R) {
    let bound = kaiming_uniform_bound(fan_in);
    for value in values.iter_mut() {
        *value = rng.random_range(-bound..bound);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_bound_formula() {
        assert!((kaiming_uniform_bound(6) - 1.0).abs() < 1e-12);
        assert!((kaiming_uniform_bound(24) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_values_within_bound() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut values = vec![0.0; 1000];
        kaiming_uniform(&mut values, 10, &mut rng);

        let bound = kaiming_uniform_bound(10);
        for &v in &values {
            assert!(v >= -bound && v < bound, "{} outside [-{}, {})", v, bound, bound);
        }
        // Both signs show up in a sample this large.
        assert!(values.iter().any(|&v| v < 0.0));
        assert!(values.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn test_deterministic_with_seed() {
        let mut a = vec![0.0; 16];
        let mut b = vec![0.0; 16];
        kaiming_uniform(&mut a, 4, &mut Xoshiro256PlusPlus::seed_from_u64(7));
        kaiming_uniform(&mut b, 4, &mut Xoshiro256PlusPlus::seed_from_u64(7));
        assert_eq!(a, b);
    }
}
