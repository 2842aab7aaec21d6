//! Coefficient Schedule
//!
//! The hop sequence is never transmitted. Both ends derive the same short
//! list of coefficient products from the shared synchronization key and walk
//! through it cyclically, one entry per hop.
//!
//! ```text
//! sync key ──► StdRng::seed_from_u64 ──► 5 × U[1000, 3000] ──► sort ──► [p0 ≤ p1 ≤ … ≤ p4]
//!
//! hop n:  product = list[n mod 5]    k1 = product / k2    k2 = 100
//! ```
//!
//! Reproducibility holds for a given key within this implementation. Another
//! runtime with a different generator will draw a different list from the
//! same key.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::error::{HopError, HopResult};
use crate::params::LinkParams;

/// A (k1, k2) pair taken from the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoefficientPair {
    /// Schedule position the pair was read from (already reduced modulo length)
    pub index: usize,
    /// Raw schedule product
    pub product: u32,
    /// Amplitude coefficient, product / k2 (integer division)
    pub k1: u32,
    /// Energy coefficient
    pub k2: u32,
}

impl CoefficientPair {
    /// k1 × k2, which differs from `product` by the truncated remainder
    pub fn effective_product(&self) -> u32 {
        self.k1 * self.k2
    }
}

/// Ordered coefficient products shared by sender and receiver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoefficientSchedule {
    products: Vec<u32>,
    k2: u32,
}

impl CoefficientSchedule {
    /// Derive the schedule from a synchronization key.
    ///
    /// Seeds a generator once with the key, draws `schedule_len` products
    /// uniformly from `[coefficient_min, coefficient_max]` in order, then sorts
    /// them ascending.
    pub fn from_key(sync_key: u64, params: &LinkParams) -> HopResult<Self> {
        params.validate()?;

        let mut rng = StdRng::seed_from_u64(sync_key);
        let dist = Uniform::new_inclusive(params.coefficient_min, params.coefficient_max);
        let products: Vec<u32> = (0..params.schedule_len)
            .map(|_| dist.sample(&mut rng))
            .collect();

        Self::from_products(products, params.k2)
    }

    /// Build a schedule from explicit products (sorted on the way in)
    pub fn from_products(mut products: Vec<u32>, k2: u32) -> HopResult<Self> {
        if products.is_empty() {
            return Err(HopError::InvalidParams(
                "coefficient schedule must not be empty".to_string(),
            ));
        }
        if k2 == 0 {
            return Err(HopError::InvalidParams("k2 must be non-zero".to_string()));
        }
        products.sort_unstable();
        Ok(Self { products, k2 })
    }

    /// Number of products in the schedule
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Always false; an empty schedule cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// The products in ascending order
    pub fn products(&self) -> &[u32] {
        &self.products
    }

    /// The fixed k2 coefficient
    pub fn k2(&self) -> u32 {
        self.k2
    }

    /// Product at `index`, wrapping around the schedule
    pub fn product(&self, index: usize) -> u32 {
        self.products[index % self.products.len()]
    }

    /// Coefficient pair at `index`, wrapping around the schedule
    pub fn pair(&self, index: usize) -> CoefficientPair {
        let index = index % self.products.len();
        let product = self.products[index];
        CoefficientPair {
            index,
            product,
            k1: product / self.k2,
            k2: self.k2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key_same_schedule() {
        let params = LinkParams::default();
        let a = CoefficientSchedule::from_key(12345, &params).unwrap();
        let b = CoefficientSchedule::from_key(12345, &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_schedule_shape() {
        let params = LinkParams::default();
        let schedule = CoefficientSchedule::from_key(12345, &params).unwrap();

        assert_eq!(schedule.len(), 5);
        assert!(schedule.products().windows(2).all(|w| w[0] <= w[1]));
        assert!(schedule
            .products()
            .iter()
            .all(|&p| (1000..=3000).contains(&p)));
    }

    #[test]
    fn test_different_keys_differ() {
        let params = LinkParams::default();
        let schedules: Vec<_> = (0..8u64)
            .map(|key| CoefficientSchedule::from_key(key, &params).unwrap())
            .collect();
        // Eight five-element draws from 2001 values colliding would be remarkable
        assert!(schedules.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_pair_extraction_wraps() {
        let schedule = CoefficientSchedule::from_products(vec![2999, 1000, 1550], 100).unwrap();
        assert_eq!(schedule.products(), &[1000, 1550, 2999]);

        let pair = schedule.pair(2);
        assert_eq!(pair.product, 2999);
        assert_eq!(pair.k1, 29);
        assert_eq!(pair.k2, 100);
        assert_eq!(pair.effective_product(), 2900);

        let wrapped = schedule.pair(4);
        assert_eq!(wrapped.index, 1);
        assert_eq!(wrapped.k1, 15);
    }

    #[test]
    fn test_rejects_empty_schedule() {
        assert!(CoefficientSchedule::from_products(Vec::new(), 100).is_err());
        assert!(CoefficientSchedule::from_products(vec![1000], 0).is_err());
    }
}
