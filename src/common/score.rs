//! Score accumulator.
//!
//! A plain resource inserted by the core plugin; anything that reports kills
//! takes `ResMut<Score>` as a system parameter.

use bevy::prelude::*;

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Score(u32);

impl Score {
    pub fn add(&mut self, amount: u32) {
        self.0 = self.0.saturating_add(amount);
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_accumulates_and_saturates() {
        let mut s = Score::default();
        s.add(100);
        s.add(100);
        assert_eq!(s.value(), 200);

        s.add(u32::MAX);
        assert_eq!(s.value(), u32::MAX);
    }
}
