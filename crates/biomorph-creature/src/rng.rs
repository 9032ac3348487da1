//! RNG trait abstraction for mutation and noisy rendering
//!
//! Callers hand a random source to every randomized operation instead of
//! relying on a process-wide generator:
//! - seeded `Xoshiro256StarStar` for reproducible lineages and tests
//! - `rand::rng()` for interactive use

use rand_distr::{Distribution, Exp1};

/// Random number source used by the mutation engine and tree noise
pub trait GeneRng {
    /// Generate random f64 in [0.0, 1.0)
    fn gen_f64(&mut self) -> f64;

    /// Sample the unit exponential distribution (mean 1.0, always >= 0)
    fn gen_exp(&mut self) -> f64;

    /// Check if random value is less than probability threshold
    fn check_probability(&mut self, probability: f64) -> bool {
        self.gen_f64() < probability
    }

    /// Pick an index in [0, len), or None when len is zero
    fn gen_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(((self.gen_f64() * len as f64) as usize).min(len - 1))
    }
}

// Blanket implementation for any type implementing rand::Rng
impl<T: ?Sized + rand::Rng> GeneRng for T {
    fn gen_f64(&mut self) -> f64 {
        rand::Rng::random(self)
    }

    fn gen_exp(&mut self) -> f64 {
        Exp1.sample(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_gene_rng_gen_f64_range() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(12345);

        for _ in 0..1000 {
            let val = rng.gen_f64();
            assert!(val >= 0.0);
            assert!(val < 1.0);
        }
    }

    #[test]
    fn test_gene_rng_gen_exp_non_negative() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(12345);

        let mut sum = 0.0;
        for _ in 0..10_000 {
            let val = rng.gen_exp();
            assert!(val >= 0.0);
            sum += val;
        }

        // Mean of Exp(1) is 1.0
        let mean = sum / 10_000.0;
        assert!((mean - 1.0).abs() < 0.1, "mean was {mean}");
    }

    #[test]
    fn test_check_probability_extremes() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(12345);

        for _ in 0..100 {
            assert!(rng.check_probability(1.0));
            assert!(!rng.check_probability(0.0));
        }
    }

    #[test]
    fn test_gen_index() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);

        assert_eq!(rng.gen_index(0), None);
        assert_eq!(rng.gen_index(1), Some(0));

        let mut seen = [false; 4];
        for _ in 0..200 {
            let idx = rng.gen_index(4).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_gene_rng_deterministic() {
        let mut rng1 = Xoshiro256StarStar::seed_from_u64(42);
        let mut rng2 = Xoshiro256StarStar::seed_from_u64(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_f64(), rng2.gen_f64());
            assert_eq!(rng1.gen_exp(), rng2.gen_exp());
        }
    }
}
