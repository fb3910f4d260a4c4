// policy.rs
//
// Immutable descriptor of one cache level's geometry and timing, plus
// the power-of-two/divisibility constructor validation a cache geometry
// requires. Grounded on the teacher's `CacheConfig::new`
// (src/timing_simulator/config.rs), with the teacher's `assert!`-based
// validation converted to a `Result` since a bad configuration is a
// recoverable-at-the-boundary error, not a bug.

use crate::errors::SimulatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub cache_size: usize,
    pub block_size: usize,
    pub block_num: usize,
    pub associativity: usize,
    pub hit_latency: u64,
    pub miss_latency: u64,
    /// When `false` (the default), `fill` transfers exactly one byte of a
    /// block on each miss, faithfully reproducing a fill-loop quirk
    /// inherited from the reference design it was ported from. Set
    /// `true` to fill the whole block.
    pub full_block_fill: bool,
}

impl CachePolicy {
    pub fn new(
        cache_size: usize,
        block_size: usize,
        associativity: usize,
        hit_latency: u64,
        miss_latency: u64,
    ) -> Result<Self, SimulatorError> {
        if !cache_size.is_power_of_two() {
            return Err(SimulatorError::InvalidPolicy(format!(
                "cacheSize {} is not a power of two",
                cache_size
            )));
        }
        if !block_size.is_power_of_two() {
            return Err(SimulatorError::InvalidPolicy(format!(
                "blockSize {} is not a power of two",
                block_size
            )));
        }
        if cache_size % block_size != 0 {
            return Err(SimulatorError::InvalidPolicy(format!(
                "blockSize {} does not divide cacheSize {}",
                block_size, cache_size
            )));
        }
        let block_num = cache_size / block_size;
        if associativity == 0 || block_num % associativity != 0 {
            return Err(SimulatorError::InvalidPolicy(format!(
                "associativity {} does not divide blockNum {}",
                associativity, block_num
            )));
        }
        if block_num * block_size != cache_size {
            return Err(SimulatorError::InvalidPolicy(format!(
                "blockNum * blockSize ({} * {}) != cacheSize {}",
                block_num, block_size, cache_size
            )));
        }

        Ok(Self {
            cache_size,
            block_size,
            block_num,
            associativity,
            hit_latency,
            miss_latency,
            full_block_fill: false,
        })
    }

    pub fn with_full_block_fill(mut self, enabled: bool) -> Self {
        self.full_block_fill = enabled;
        self
    }

    pub fn num_sets(&self) -> usize {
        self.block_num / self.associativity
    }

    pub fn offset_bits(&self) -> u32 {
        self.block_size.trailing_zeros()
    }

    pub fn set_bits(&self) -> u32 {
        self.num_sets().trailing_zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_power_of_two_cache_size() {
        assert!(CachePolicy::new(100, 64, 1, 1, 1).is_err());
    }

    #[test]
    fn rejects_block_size_not_dividing_cache_size() {
        assert!(CachePolicy::new(1024, 100, 1, 1, 1).is_err());
    }

    #[test]
    fn rejects_associativity_not_dividing_block_num() {
        // blockNum = 16, associativity 3 does not divide 16
        assert!(CachePolicy::new(1024, 64, 3, 1, 1).is_err());
    }

    #[test]
    fn accepts_default_l1_shape() {
        let p = CachePolicy::new(16 * 1024, 64, 1, 1, 1).unwrap();
        assert_eq!(p.block_num, 256);
        assert_eq!(p.num_sets(), 256);
        assert_eq!(p.offset_bits(), 6);
    }
}
