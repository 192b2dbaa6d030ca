//! Common, shared types.

pub mod animator;
pub mod layers;
pub mod motion;
pub mod rng;
pub mod score;
pub mod state;
pub mod tunables;

#[cfg(test)]
pub mod test_utils;
