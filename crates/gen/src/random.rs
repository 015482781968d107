use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws consumed by the generator.
///
/// Injected rather than ambient so a fixed seed reproduces a cloud exactly.
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`.
    fn next_uniform(&mut self) -> f64;

    /// `+1.0` or `-1.0` with equal probability.
    fn next_sign(&mut self) -> f32 {
        if self.next_uniform() < 0.5 { 1.0 } else { -1.0 }
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }

    fn next_sign(&mut self) -> f32 {
        (**self).next_sign()
    }
}

/// Seeded splitmix64 stream.
///
/// Platform-independent and cheap; the default source for reproducible
/// generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        mix64(self.state)
    }
}

impl RandomSource for SplitMix64 {
    fn next_uniform(&mut self) -> f64 {
        // Top 53 bits fill the f64 mantissa exactly.
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Splitmix64 finalizer.
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Adapter exposing any [`rand::Rng`] as a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    /// OS-seeded source for interactive use where reproducibility is not needed.
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_uniform(&mut self) -> f64 {
        self.0.gen_range(0.0..1.0)
    }
}
