//! `KeyRng` - the per-worker pseudo-random stream.
//!
//! A multiplicative congruential generator modulo the prime 4294967291.
//! Each worker owns one, seeded from its rank, so workers never contend on a
//! shared generator and a run is reproducible for a fixed thread count.

const MULTIPLIER: u64 = 279_470_273;
const MODULUS: u64 = 4_294_967_291;

/// Keys drawn by the workload lie in `0..MAX_KEY`.
pub const MAX_KEY: u32 = 100_000_000;

/// Deterministic, non-cryptographic random stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRng {
    state: u64,
}

impl KeyRng {
    /// Creates a stream from `seed`.
    ///
    /// Zero is a fixed point of the recurrence (and multiples of the modulus
    /// reduce to it), so such seeds are replaced with 1.
    pub fn new(seed: u64) -> Self {
        let state = seed % MODULUS;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    /// Advances the stream and returns the new state, in `1..4294967291`.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state * MULTIPLIER % MODULUS;
        // state < MODULUS < 2^32
        self.state as u32
    }

    /// A uniform draw in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / MODULUS as f64
    }

    /// A key in `0..MAX_KEY`.
    #[inline]
    pub fn next_key(&mut self) -> i64 {
        i64::from(self.next_u32() % MAX_KEY)
    }
}
