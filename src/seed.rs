//! Seed combination, hashing, and deterministic RNG streams.
//!
//! Every generator in the crate derives its randomness from a single world
//! seed through the functions here, so regenerating one subsystem never
//! perturbs another. Same seed + same inputs yields the same output sequence
//! across runs and platforms.

use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;
use std::cell::{RefCell, RefMut};
use twox_hash::XxHash64;

/// Fixed key so `hash_string` stays stable across processes.
const STRING_HASH_KEY: u64 = 0x1905_4A11_0E5C_AFE5;

/// Stable hash of a content identifier.
#[must_use]
pub fn hash_string(value: &str) -> u64 {
    XxHash64::oneshot(STRING_HASH_KEY, value.as_bytes())
}

/// Deterministically fold two seeds into one without global state.
#[must_use]
pub fn combine_seeds(a: u64, b: u64) -> u64 {
    XxHash64::oneshot(a, &b.to_le_bytes())
}

/// Sub-seed for a chunk of world space.
#[must_use]
pub fn chunk_seed(world_seed: u64, cx: i32, cz: i32) -> u64 {
    let mut buf = [0u8; 8];
    buf[..4].copy_from_slice(&cx.to_le_bytes());
    buf[4..].copy_from_slice(&cz.to_le_bytes());
    XxHash64::oneshot(world_seed, &buf)
}

/// Derive an independent stream seed for a named simulation domain.
///
/// HMAC-SHA256 keyed by the user seed keeps the domains statistically
/// unrelated even for adjacent seeds.
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes())
        .expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}

/// Deterministic content-generation stream.
///
/// ChaCha is used rather than `SmallRng` because chunk and location content
/// must be reproducible across platforms and crate versions.
#[derive(Debug, Clone)]
pub struct GameRng {
    inner: ChaCha20Rng,
}

impl GameRng {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Uniform draw in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        self.inner.gen()
    }

    /// Uniform draw in `[lo, hi)`. Returns `lo` when the range is empty.
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.inner.gen_range(lo..hi)
    }

    /// Uniform integer draw in `[lo, hi]`.
    pub fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.inner.gen_range(lo..=hi)
    }

    /// Uniform index below `len`; `None` for an empty collection.
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.inner.gen_range(0..len))
    }
}

impl RngCore for GameRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

/// Deterministic bundle of RNG streams segregated by simulation domain.
#[derive(Debug, Clone)]
pub struct RngBundle {
    combat: RefCell<CountingRng<SmallRng>>,
    encounter: RefCell<CountingRng<SmallRng>>,
    loot: RefCell<CountingRng<SmallRng>>,
    travel: RefCell<CountingRng<SmallRng>>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            combat: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"combat"))),
            encounter: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"encounter"))),
            loot: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"loot"))),
            travel: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"travel"))),
        }
    }

    /// Access the combat RNG stream.
    #[must_use]
    pub fn combat(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.combat.borrow_mut()
    }

    /// Access the encounter RNG stream.
    #[must_use]
    pub fn encounter(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.encounter.borrow_mut()
    }

    /// Access the loot RNG stream.
    #[must_use]
    pub fn loot(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.loot.borrow_mut()
    }

    /// Access the travel RNG stream.
    #[must_use]
    pub fn travel(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.travel.borrow_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_hash_is_stable() {
        let a = hash_string("rusty_gulch");
        let b = hash_string("rusty_gulch");
        assert_eq!(a, b);
        assert_ne!(a, hash_string("rusty_gulcH"));
    }

    #[test]
    fn combine_is_order_sensitive() {
        assert_ne!(combine_seeds(1, 2), combine_seeds(2, 1));
        assert_eq!(combine_seeds(7, 9), combine_seeds(7, 9));
    }

    #[test]
    fn chunk_seeds_differ_per_coordinate() {
        let seed = 0xC0FFEE;
        assert_ne!(chunk_seed(seed, 0, 0), chunk_seed(seed, 1, 0));
        assert_ne!(chunk_seed(seed, 0, 1), chunk_seed(seed, 1, 0));
        assert_eq!(chunk_seed(seed, -3, 5), chunk_seed(seed, -3, 5));
    }

    #[test]
    fn domain_tags_derive_distinct_seeds() {
        let seed = 0xFEED_CAFE_u64;
        assert_ne!(
            derive_stream_seed(seed, b"combat"),
            derive_stream_seed(seed, b"loot"),
        );
        assert_eq!(
            derive_stream_seed(seed, b"combat"),
            derive_stream_seed(seed, b"combat"),
        );
    }

    #[test]
    fn game_rng_repeats_for_same_seed() {
        let mut a = GameRng::from_seed(42);
        let mut b = GameRng::from_seed(42);
        for _ in 0..32 {
            let x = a.next_f32();
            let y = b.next_f32();
            assert!((x - y).abs() < f32::EPSILON);
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn bundle_streams_count_draws() {
        let bundle = RngBundle::from_user_seed(9);
        {
            let mut combat = bundle.combat();
            let _ = combat.next_u32();
            let _ = combat.next_u32();
            assert_eq!(combat.draws(), 2);
        }
        assert_eq!(bundle.loot().draws(), 0);
    }

    #[test]
    fn bundle_matches_direct_derivation() {
        let seed = 0xBADD_CAB;
        let bundle = RngBundle::from_user_seed(seed);
        let mut expected = SmallRng::seed_from_u64(derive_stream_seed(seed, b"travel"));
        assert_eq!(bundle.travel().next_u32(), expected.next_u32());
    }
}
