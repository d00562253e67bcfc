/// Randomness provider for measurement and trials.
///
/// Engine functions take any `RngCore + CryptoRng` explicitly, so there is no
/// process-wide generator. `EngineRng` is the concrete provider the runtime
/// holds: the operating system CSPRNG by default, or a seeded `StdRng`
/// (ChaCha-based, still a CSPRNG) when reproducible outcomes are wanted.
use rand::rngs::{OsRng, StdRng};
use rand::{CryptoRng, RngCore, SeedableRng};

#[derive(Debug, Clone)]
pub enum EngineRng {
    /// Fresh entropy from the OS for every draw.
    Os(OsRng),
    /// Deterministic stream from a fixed seed.
    Seeded(StdRng),
}

impl EngineRng {
    pub fn os() -> Self {
        Self::Os(OsRng)
    }

    pub fn seeded(seed: u64) -> Self {
        Self::Seeded(StdRng::seed_from_u64(seed))
    }

    /// Seeded when `seed` is given, OS entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::os, Self::seeded)
    }

    pub fn is_deterministic(&self) -> bool {
        matches!(self, Self::Seeded(_))
    }
}

impl Default for EngineRng {
    fn default() -> Self {
        Self::os()
    }
}

impl RngCore for EngineRng {
    fn next_u32(&mut self) -> u32 {
        match self {
            Self::Os(rng) => rng.next_u32(),
            Self::Seeded(rng) => rng.next_u32(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match self {
            Self::Os(rng) => rng.next_u64(),
            Self::Seeded(rng) => rng.next_u64(),
        }
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        match self {
            Self::Os(rng) => rng.fill_bytes(dest),
            Self::Seeded(rng) => rng.fill_bytes(dest),
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        match self {
            Self::Os(rng) => rng.try_fill_bytes(dest),
            Self::Seeded(rng) => rng.try_fill_bytes(dest),
        }
    }
}

impl CryptoRng for EngineRng {}

#[cfg(test)]
pub(crate) mod testing {
    use rand::{CryptoRng, RngCore};

    /// Test generator whose every `f64` draw is the same value.
    ///
    /// `rand` builds a uniform `f64` from the top 53 bits of `next_u64`,
    /// so storing `t · 2^53` shifted left by 11 reproduces `t` exactly for
    /// dyadic `t` in [0, 1).
    #[derive(Debug, Clone)]
    pub struct ConstRng(u64);

    impl ConstRng {
        pub fn unit(t: f64) -> Self {
            assert!((0.0..1.0).contains(&t));
            Self(((t * (1u64 << 53) as f64) as u64) << 11)
        }
    }

    impl RngCore for ConstRng {
        fn next_u32(&mut self) -> u32 {
            (self.0 >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(8) {
                let bytes = self.0.to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for ConstRng {}
}
