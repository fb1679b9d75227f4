use combat_core::DiceRoller;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Dice backed by `rand`'s standard RNG.
#[derive(Clone, Debug)]
pub struct RandDice {
    rng: StdRng,
}

impl RandDice {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeds from the operating system.
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl DiceRoller for RandDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.rng.random_range(1..=sides.max(1))
    }

    fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}
