//! Deterministic 64-bit PRNG (xorshift64*).
//!
//! Seeded once at startup, used both to generate the Zobrist key table and to
//! search for sliding-piece magic multipliers. Magic search wants "sparse"
//! candidates (few set bits), produced by ANDing three draws together.

/// xorshift64* — small, fast, and deterministic given a seed.
pub struct Rng {
    state: u64,
}

impl Rng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    #[inline]
    #[must_use]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// A candidate with few set bits, suitable for magic-number search.
    #[must_use]
    pub fn next_sparse_u64(&mut self) -> u64 {
        self.next_u64() & self.next_u64() & self.next_u64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_given_seed() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn sparse_numbers_have_few_bits() {
        let mut rng = Rng::new(7);
        let avg: u32 = (0..1000)
            .map(|_| rng.next_sparse_u64().count_ones())
            .sum::<u32>()
            / 1000;
        assert!(avg < 20, "expected sparse candidates, got avg popcount {avg}");
    }
}
