use std::time::{SystemTime, UNIX_EPOCH};

/// xorshift64*, good enough to scatter balls.
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    pub fn from_time() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Rng::new(nanos ^ 0x9E37_79B9_7F4A_7C15)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform-ish value in `0..n`. `n` must be positive.
    pub fn below(&mut self, n: i32) -> i32 {
        debug_assert!(n > 0);
        ((self.next_u64() >> 32) % n as u64) as i32
    }

    pub fn sign(&mut self) -> i32 {
        if self.below(2) == 0 { -1 } else { 1 }
    }
}
