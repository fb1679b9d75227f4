/// Current and maximum health of an actor.
///
/// `current` never exceeds `max`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    /// Creates a health pool, clamping `current` to `max`.
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    /// Creates a full health pool.
    pub fn full(max: u32) -> Self {
        Self::new(max, max)
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Fraction of health remaining in `[0.0, 1.0]`; `0.0` when `max == 0`.
    pub fn percentage(&self) -> f64 {
        if self.max == 0 {
            return 0.0;
        }
        f64::from(self.current) / f64::from(self.max)
    }

    pub fn is_dead(&self) -> bool {
        self.current == 0
    }

    /// Reduces health (clamped to 0) and returns the damage actually taken.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.current);
        self.current -= taken;
        taken
    }

    /// Restores health (clamped to max) and returns the amount restored.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max - self.current);
        self.current += restored;
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_max_reports_zero_percent() {
        assert_eq!(Health::new(10, 0).percentage(), 0.0);
        assert_eq!(Health::default().percentage(), 0.0);
    }

    #[test]
    fn damage_and_restore_are_clamped() {
        let mut health = Health::full(30);
        assert_eq!(health.apply_damage(12), 12);
        assert_eq!(health.current(), 18);
        assert_eq!(health.restore(50), 12);
        assert_eq!(health.current(), 30);
        assert_eq!(health.apply_damage(99), 30);
        assert!(health.is_dead());
    }
}
