//! Dice oracle for roll resolution.
//!
//! All randomness the rules need flows through [`DiceRoller`]: die faces for
//! rerolls, explosions, extra dice and random combo routing, and a uniform
//! draw for reroll chances. Seeded implementations make every resolution
//! replayable.

/// Source of die rolls and uniform draws.
pub trait DiceRoller {
    /// Roll a die with N sides (1-N inclusive).
    fn roll_die(&mut self, sides: u32) -> u32;

    /// Uniform draw in `[0.0, 1.0)`.
    fn uniform(&mut self) -> f64;

    /// Uniform index in `[0, upper)`. Returns 0 when `upper == 0`.
    fn index_below(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        let sides = u32::try_from(upper).unwrap_or(u32::MAX);
        (self.roll_die(sides) - 1) as usize
    }
}

/// Seeded PCG dice (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// Same seed, same sequence. Used for replays and tests.
#[derive(Clone, Copy, Debug)]
pub struct PcgDice {
    state: u64,
}

impl PcgDice {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn seeded(seed: u64) -> Self {
        Self { state: seed }
    }

    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = Self::pcg_step(self.state);
        Self::pcg_output(self.state)
    }
}

impl DiceRoller for PcgDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        (self.next_u32() % sides.max(1)) + 1
    }

    fn uniform(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }
}

/// Dice that replay fixed scripts.
///
/// Each script repeats its last value once exhausted. An empty roll script
/// yields 1 and an empty draw script yields 0.5. Rolls are clamped into the
/// requested die.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    rolls: Vec<u32>,
    draws: Vec<f64>,
    roll_cursor: usize,
    draw_cursor: usize,
}

impl ScriptedDice {
    pub fn new(rolls: impl Into<Vec<u32>>) -> Self {
        Self {
            rolls: rolls.into(),
            ..Self::default()
        }
    }

    /// Builder: set the uniform draw script.
    pub fn with_draws(mut self, draws: impl Into<Vec<f64>>) -> Self {
        self.draws = draws.into();
        self
    }

    /// Number of die rolls consumed so far.
    pub fn rolls_taken(&self) -> usize {
        self.roll_cursor
    }

    fn next_scripted<T: Copy>(script: &[T], cursor: &mut usize) -> Option<T> {
        let value = script.get(*cursor).or_else(|| script.last()).copied();
        *cursor += 1;
        value
    }
}

impl DiceRoller for ScriptedDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        Self::next_scripted(&self.rolls, &mut self.roll_cursor)
            .unwrap_or(1)
            .clamp(1, sides.max(1))
    }

    fn uniform(&mut self) -> f64 {
        Self::next_scripted(&self.draws, &mut self.draw_cursor).unwrap_or(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_is_deterministic_per_seed() {
        let mut a = PcgDice::seeded(42);
        let mut b = PcgDice::seeded(42);
        for _ in 0..32 {
            assert_eq!(a.roll_die(20), b.roll_die(20));
        }
    }

    #[test]
    fn pcg_rolls_stay_on_the_die() {
        let mut dice = PcgDice::seeded(7);
        for _ in 0..1000 {
            let roll = dice.roll_die(20);
            assert!((1..=20).contains(&roll));
            let draw = dice.uniform();
            assert!((0.0..1.0).contains(&draw));
        }
    }

    #[test]
    fn scripted_dice_repeat_last_value_and_clamp() {
        let mut dice = ScriptedDice::new([3, 25]).with_draws([0.1]);
        assert_eq!(dice.roll_die(20), 3);
        assert_eq!(dice.roll_die(20), 20);
        assert_eq!(dice.roll_die(20), 20);
        assert_eq!(dice.rolls_taken(), 3);
        assert_eq!(dice.uniform(), 0.1);
        assert_eq!(dice.uniform(), 0.1);
    }

    #[test]
    fn index_below_handles_empty_range() {
        let mut dice = ScriptedDice::new([4]);
        assert_eq!(dice.index_below(0), 0);
        assert_eq!(dice.index_below(5), 3);
    }
}
