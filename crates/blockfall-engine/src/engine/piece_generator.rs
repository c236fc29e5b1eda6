use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{GeneratorKind, ParseSeedError, PieceKind};

/// Source of upcoming piece kinds.
///
/// The session owns one generator and asks it for a kind every time the
/// "next" slot needs refilling. Implementations decide the distribution;
/// tests inject [`SequenceGenerator`] to script exact piece orders.
pub trait PieceGenerator: fmt::Debug {
    /// Draws the next piece kind.
    fn next_kind(&mut self) -> PieceKind;
}

/// Seed for deterministic piece generation.
///
/// A 128-bit value written as a 32-character hex string. Two generators of
/// the same kind built from the same seed produce the same sequence.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GeneratorKind, PieceSeed};
///
/// let seed: PieceSeed = "0123456789abcdeffedcba9876543210".parse().unwrap();
/// let mut a = GeneratorKind::Uniform.build(seed);
/// let mut b = GeneratorKind::Uniform.build(seed);
///
/// for _ in 0..10 {
///     assert_eq!(a.next_kind(), b.next_kind());
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    /// Draws a seed from the thread-local RNG.
    #[must_use]
    pub fn random() -> Self {
        rand::rng().random()
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError::new(format!(
                "expected 32 characters, got {}",
                s.len()
            )));
        }
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseSeedError::new(format!("{s} (non-hex character)")));
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| ParseSeedError::new(format!("{s} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl GeneratorKind {
    /// Builds the generator for this policy from `seed`.
    #[must_use]
    pub fn build(self, seed: PieceSeed) -> Box<dyn PieceGenerator> {
        match self {
            GeneratorKind::Uniform => Box::new(UniformGenerator::with_seed(seed)),
            GeneratorKind::Bag => Box::new(BagGenerator::with_seed(seed)),
        }
    }
}

/// Draws every piece independently with equal probability.
#[derive(Debug, Clone)]
pub struct UniformGenerator {
    rng: Pcg32,
}

impl UniformGenerator {
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }
}

impl PieceGenerator for UniformGenerator {
    fn next_kind(&mut self) -> PieceKind {
        self.rng.random()
    }
}

/// 7-bag randomizer.
///
/// Pieces are dealt from shuffled bags holding each kind once, so any run of
/// seven consecutive bag-aligned draws contains every kind.
#[derive(Debug, Clone)]
pub struct BagGenerator {
    rng: Pcg32,
    bag: VecDeque<PieceKind>,
}

impl BagGenerator {
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            bag: VecDeque::with_capacity(PieceKind::LEN),
        }
    }
}

impl PieceGenerator for BagGenerator {
    fn next_kind(&mut self) -> PieceKind {
        if let Some(kind) = self.bag.pop_front() {
            return kind;
        }
        let mut new_bag = PieceKind::ALL;
        new_bag.shuffle(&mut self.rng);
        self.bag.extend(&new_bag[1..]);
        new_bag[0]
    }
}

/// Replays a fixed list of kinds, starting over after the last one.
#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    kinds: Vec<PieceKind>,
    index: usize,
}

impl SequenceGenerator {
    /// # Panics
    ///
    /// Panics if `kinds` is empty.
    #[must_use]
    pub fn new(kinds: impl IntoIterator<Item = PieceKind>) -> Self {
        let kinds: Vec<_> = kinds.into_iter().collect();
        assert!(!kinds.is_empty(), "sequence generator needs at least one kind");
        Self { kinds, index: 0 }
    }
}

impl PieceGenerator for SequenceGenerator {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.kinds[self.index];
        self.index = (self.index + 1) % self.kinds.len();
        kind
    }
}
