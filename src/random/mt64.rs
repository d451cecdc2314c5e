//! 64-bit Mersenne Twister (MT19937-64)
//!
//! Reference: Nishimura, T. (2000). Tables of 64-bit Mersenne Twisters.
//! ACM Transactions on Modeling and Computer Simulation, 10(4).

use rand::{Error, RngCore, SeedableRng};

const NN: usize = 312;
const MM: usize = 156;
const MATRIX_A: u64 = 0xB502_6F5A_A966_19E9;
const UPPER_MASK: u64 = 0xFFFF_FFFF_8000_0000;
const LOWER_MASK: u64 = 0x0000_0000_7FFF_FFFF;
const INIT_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const ARRAY_SEED: u64 = 19_650_218;
const ARRAY_MIX_A: u64 = 3_935_559_000_370_003_845;
const ARRAY_MIX_B: u64 = 2_862_933_555_777_941_757;

/// Seed used when none is supplied
pub const DEFAULT_SEED: u64 = 5489;

/// MT19937-64 generator state
#[derive(Clone)]
pub struct Mt64 {
    state: Box<[u64; NN]>,
    index: usize,
}

impl Mt64 {
    /// Create a generator seeded with a single value (`init_genrand64`)
    pub fn new(seed: u64) -> Self {
        let mut mt = Self {
            state: Box::new([0; NN]),
            index: NN,
        };
        mt.reseed(seed);
        mt
    }

    /// Create a generator seeded from a key array (`init_by_array64`)
    pub fn from_key(key: &[u64]) -> Self {
        let mut mt = Self::new(ARRAY_SEED);
        if key.is_empty() {
            return mt;
        }

        let s = &mut mt.state;
        let mut i = 1;
        let mut j = 0;

        for _ in 0..NN.max(key.len()) {
            let prev = s[i - 1];
            s[i] = (s[i] ^ (prev ^ (prev >> 62)).wrapping_mul(ARRAY_MIX_A))
                .wrapping_add(key[j])
                .wrapping_add(j as u64);
            i += 1;
            j += 1;
            if i >= NN {
                s[0] = s[NN - 1];
                i = 1;
            }
            if j >= key.len() {
                j = 0;
            }
        }

        for _ in 0..NN - 1 {
            let prev = s[i - 1];
            s[i] = (s[i] ^ (prev ^ (prev >> 62)).wrapping_mul(ARRAY_MIX_B)).wrapping_sub(i as u64);
            i += 1;
            if i >= NN {
                s[0] = s[NN - 1];
                i = 1;
            }
        }

        s[0] = 1 << 63;
        mt.index = NN;
        mt
    }

    /// Reset the state from a single seed value
    pub fn reseed(&mut self, seed: u64) {
        let s = &mut self.state;
        s[0] = seed;
        for n in 1..NN {
            let prev = s[n - 1];
            s[n] = INIT_MULTIPLIER
                .wrapping_mul(prev ^ (prev >> 62))
                .wrapping_add(n as u64);
        }
        self.index = NN;
    }

    /// Next tempered 64-bit output
    pub fn next_raw(&mut self) -> u64 {
        if self.index >= NN {
            self.twist();
        }

        let mut y = self.state[self.index];
        self.index += 1;

        y ^= (y >> 29) & 0x5555_5555_5555_5555;
        y ^= (y << 17) & 0x71D6_7FFF_EDA6_0000;
        y ^= (y << 37) & 0xFFF7_EEE0_0000_0000;
        y ^ (y >> 43)
    }

    /// Uniform deviate in [0, 1) with 53 bits of precision
    pub fn next_f64(&mut self) -> f64 {
        (self.next_raw() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    fn twist(&mut self) {
        let s = &mut self.state;
        for i in 0..NN {
            let x = (s[i] & UPPER_MASK) | (s[(i + 1) % NN] & LOWER_MASK);
            let mut xa = x >> 1;
            if x & 1 == 1 {
                xa ^= MATRIX_A;
            }
            s[i] = s[(i + MM) % NN] ^ xa;
        }
        self.index = 0;
    }
}

impl Default for Mt64 {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl std::fmt::Debug for Mt64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mt64").field("index", &self.index).finish()
    }
}

impl RngCore for Mt64 {
    fn next_u32(&mut self) -> u32 {
        (self.next_raw() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_raw()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mt64 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
