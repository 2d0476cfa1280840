//! Dice sources.

use super::types::DiceRoll;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Produces dice rolls for the turn state machine.
pub trait DiceSource: Send {
    /// Rolls two independent dice, each 1–6.
    fn roll(&mut self) -> DiceRoll;
}

/// Uniform random dice.
#[derive(Debug, Clone)]
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    /// Dice seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible dice.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDice {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceSource for RandomDice {
    fn roll(&mut self) -> DiceRoll {
        DiceRoll::new(self.rng.random_range(1..=6), self.rng.random_range(1..=6))
    }
}

/// Replays a fixed list of rolls, then repeats the last one.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    rolls: VecDeque<DiceRoll>,
    last: DiceRoll,
}

impl ScriptedDice {
    /// Creates dice that yield `rolls` in order.
    pub fn new(rolls: impl IntoIterator<Item = (u8, u8)>) -> Self {
        let rolls: VecDeque<DiceRoll> = rolls
            .into_iter()
            .map(|(first, second)| DiceRoll::new(first, second))
            .collect();
        let last = rolls.back().copied().unwrap_or(DiceRoll::new(1, 2));
        Self { rolls, last }
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self) -> DiceRoll {
        if let Some(next) = self.rolls.pop_front() {
            self.last = next;
        }
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_dice_in_range() {
        let mut dice = RandomDice::seeded(7);
        for _ in 0..500 {
            let roll = dice.roll();
            assert!((1..=6).contains(&roll.first));
            assert!((1..=6).contains(&roll.second));
        }
    }

    #[test]
    fn test_seeded_dice_repeat() {
        let mut a = RandomDice::seeded(42);
        let mut b = RandomDice::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.roll(), b.roll());
        }
    }

    #[test]
    fn test_scripted_dice_sequence() {
        let mut dice = ScriptedDice::new([(3, 1), (6, 6)]);
        assert_eq!(dice.roll(), DiceRoll::new(3, 1));
        assert_eq!(dice.roll(), DiceRoll::new(6, 6));
        assert_eq!(dice.roll(), DiceRoll::new(6, 6));
    }
}
