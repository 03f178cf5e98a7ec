//! Deterministic generator core.
//!
//! Perturbation directions must be byte-for-byte reproducible from a
//! seed across processes and architectures, so the generator is carried
//! here in full rather than delegated to an external RNG crate whose
//! stream is free to change between versions.

/// splitmix64 stream used to expand a single 64-bit seed into larger
/// generator state.
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    x: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { x: seed }
    }

    /// Returns the next 64-bit output of the stream.
    pub fn next_u64(&mut self) -> u64 {
        self.x = self.x.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.x;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}

/// xoshiro256** generator with 256 bits of state.
#[derive(Debug, Clone)]
pub struct Xoshiro256StarStar {
    s: [u64; 4],
}

impl Xoshiro256StarStar {
    /// Seeds the state from four sequential splitmix64 draws.
    pub fn from_seed(seed: u64) -> Self {
        let mut sm = SplitMix64::new(seed);
        Self {
            s: [sm.next_u64(), sm.next_u64(), sm.next_u64(), sm.next_u64()],
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let result = self.s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Uniform double in [0, 1) built from the top 53 bits of the next
    /// output.
    pub fn next_uniform(&mut self) -> f64 {
        // 2^-53
        const SCALE: f64 = 1.110_223_024_625_156_5e-16;
        (self.next_u64() >> 11) as f64 * SCALE
    }
}
