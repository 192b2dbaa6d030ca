//! Animation driver interface.
//!
//! Gameplay code only writes animation *parameters*: one-shot triggers,
//! bools and floats. Whatever plays the clips reads them. Triggers are
//! consumed at the end of every frame.

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

/// Which clock drives the animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimatorUpdateMode {
    #[default]
    Gameplay,
    /// Keeps playing while gameplay time is paused (death clip).
    Unscaled,
}

#[derive(Component, Debug, Default, Clone)]
pub struct Animator {
    pub update_mode: AnimatorUpdateMode,
    triggers: Vec<&'static str>,
    bools: HashMap<&'static str, bool>,
    floats: HashMap<&'static str, f32>,
}

impl Animator {
    pub fn set_trigger(&mut self, name: &'static str) {
        self.triggers.push(name);
    }

    pub fn set_bool(&mut self, name: &'static str, value: bool) {
        self.bools.insert(name, value);
    }

    pub fn set_float(&mut self, name: &'static str, value: f32) {
        self.floats.insert(name, value);
    }

    pub fn fired(&self, name: &str) -> bool {
        self.triggers.iter().any(|t| *t == name)
    }

    pub fn trigger_count(&self, name: &str) -> usize {
        self.triggers.iter().filter(|t| **t == name).count()
    }

    pub fn triggers(&self) -> &[&'static str] {
        &self.triggers
    }

    pub fn bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    pub fn float(&self, name: &str) -> f32 {
        self.floats.get(name).copied().unwrap_or(0.0)
    }

    pub fn clear_triggers(&mut self) {
        self.triggers.clear();
    }
}

/// End-of-frame: drop consumed triggers.
pub fn clear_animation_triggers(mut q: Query<&mut Animator>) {
    for mut animator in &mut q {
        if !animator.triggers.is_empty() {
            animator.clear_triggers();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_utils::run_system_once;

    #[test]
    fn parameters_round_trip_and_triggers_clear() {
        let mut world = World::new();
        let mut animator = Animator::default();
        animator.set_trigger("Attack1");
        animator.set_trigger("Attack1");
        animator.set_bool("isRunning", true);
        animator.set_float("Speed", 3.5);
        let e = world.spawn(animator).id();

        {
            let a = world.get::<Animator>(e).unwrap();
            assert_eq!(a.trigger_count("Attack1"), 2);
            assert!(a.bool("isRunning"));
            assert_eq!(a.float("Speed"), 3.5);
            assert!(!a.bool("missing"));
        }

        run_system_once(&mut world, clear_animation_triggers);

        let a = world.get::<Animator>(e).unwrap();
        assert!(a.triggers().is_empty());
        assert!(a.bool("isRunning"));
    }
}
