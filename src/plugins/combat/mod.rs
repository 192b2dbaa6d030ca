//! Combat resolution: who gets hit by what.
//!
//! ```text
//!   Update
//!   player actions ──MeleeStrike──▶ resolve_melee_strikes ──MeleeVictims──▶ apply_melee_kills
//!                                   (SpatialQuery circle)                     (Damageable::die, Score)
//!
//!   enemy AI ──PlayerHit──▶ player::receive_hits ──PlayerDied──▶ game_over
//! ```
//!
//! Finding victims and applying consequences are separate systems. Tests inject
//! `MeleeVictims` directly instead of running the physics pipeline.

pub mod messages;

use avian2d::prelude::*;
use bevy::ecs::component::Mutable;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use bevy::time::Virtual;

use crate::common::layers::Layer;
use crate::common::score::Score;
use crate::common::state::{gameplay_running, GameState};
use crate::plugins::enemies::Enemy;

pub use messages::{MeleeStrike, MeleeVictims, PlayerDied, PlayerHit};

/// Outcome of a health-based damage application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target was already dead.
    Ignored,
    Damaged { remaining: i32 },
    Killed,
}

/// Anything the player's attack can hit.
pub trait Damageable {
    fn is_dead(&self) -> bool;

    /// Reduce health; reaching zero runs the death transition.
    fn take_damage(&mut self, amount: i32, now: f32) -> DamageOutcome;

    /// Instant kill. Returns `true` only on the call that actually killed.
    fn die(&mut self, now: f32) -> bool;
}

pub fn plugin(app: &mut App) {
    app.add_message::<MeleeStrike>()
        .add_message::<MeleeVictims>()
        .add_message::<PlayerHit>()
        .add_message::<PlayerDied>();

    app.add_systems(
        Update,
        (resolve_melee_strikes, apply_melee_kills::<Enemy>)
            .chain()
            .after(crate::plugins::player::player_actions)
            .run_if(in_state(GameState::InGame).and(gameplay_running)),
    );
}

/// Entities on `layer` overlapping a circle, without duplicates.
pub fn overlap_circle(
    spatial_query: &SpatialQuery,
    center: Vec2,
    radius: f32,
    layer: Layer,
) -> Vec<Entity> {
    let filter = SpatialQueryFilter::from_mask(layer);
    let hits = spatial_query.shape_intersections(&Collider::circle(radius), center, 0.0, &filter);
    dedup_in_order(hits)
}

fn dedup_in_order(entities: impl IntoIterator<Item = Entity>) -> Vec<Entity> {
    let mut seen = HashSet::new();
    entities.into_iter().filter(|e| seen.insert(*e)).collect()
}

/// Turn each strike into the set of enemies under its hitbox.
pub fn resolve_melee_strikes(
    mut strikes: MessageReader<MeleeStrike>,
    spatial_query: SpatialQuery,
    mut victims: MessageWriter<MeleeVictims>,
) {
    for strike in strikes.read() {
        let hit = overlap_circle(&spatial_query, strike.center, strike.radius, Layer::Enemy);
        if hit.is_empty() {
            continue;
        }

        debug!("Strike from {:?} overlaps {} enemies", strike.attacker, hit.len());
        victims.write(MeleeVictims {
            attacker: strike.attacker,
            victims: hit,
            reward: strike.reward,
        });
    }
}

/// Kill every victim once and credit the reward for each kill that landed.
///
/// Victims that are gone or already dead are skipped and earn nothing.
pub fn apply_melee_kills<D>(
    mut reader: MessageReader<MeleeVictims>,
    time: Res<Time<Virtual>>,
    mut score: ResMut<Score>,
    mut q: Query<&mut D>,
) where
    D: Component<Mutability = Mutable> + Damageable,
{
    let now = time.elapsed_secs();

    for hit in reader.read() {
        for victim in dedup_in_order(hit.victims.iter().copied()) {
            let Ok(mut target) = q.get_mut(victim) else {
                continue;
            };
            if target.die(now) {
                score.add(hit.reward);
                debug!("{:?} killed {:?}, +{}", hit.attacker, victim, hit.reward);
            }
        }
    }
}
