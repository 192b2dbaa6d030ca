//! Enemies plugin: melee chasers with an explicit attack windup, randomized
//! jumping and a short death state.
//!
//! ---------------------------
//! HOW THIS IS DESIGNED (ECS)
//! ---------------------------
//! - FACTS live in `Enemy`: health, life state, attack cooldown, the in-flight
//!   windup and the next jump time. Every wait is a resume-at timestamp on the
//!   gameplay clock (`Time<Virtual>`), so pausing that clock freezes them all.
//!
//! - RULES run in two rates:
//!   - Update: chase / start attack / resolve windup (`enemy_ai`).
//!   - FixedUpdate: random jumps after the ground probe (`enemy_jump`).
//!
//! - DEATH is a state change on `Enemy` (through `Damageable`). A separate
//!   system settles the body (velocity, collision layers, death cue) the same
//!   frame, and removal is delayed: mark `PendingDespawn`, despawn in PostUpdate.
//!
//! - The target player entity is wired at construction. No runtime lookup.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy::time::Virtual;

use crate::common::animator::Animator;
use crate::common::layers::{corpse_layers, enemy_layers};
use crate::common::motion::{detect_ground, Facing, Grounded};
use crate::common::rng::GameRng;
use crate::common::state::{gameplay_running, GameState};
use crate::common::tunables::{EnemyTuning, Tunables};
use crate::plugins::combat::{DamageOutcome, Damageable, PlayerHit};
use crate::plugins::player::Player;

/// Horizontal speed below which the run animation is switched off.
const RUNNING_THRESHOLD: f32 = 0.1;

// -----------------------------------------------------------------------------
// Components
// -----------------------------------------------------------------------------

/// Reported AI state, derived every frame from `Enemy` and ground contact.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnemyState {
    #[default]
    Chasing,
    Attacking,
    Jumping,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Life {
    Alive,
    Dead { remove_at: f32, settled: bool },
}

/// Result of polling an in-flight attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackResolution {
    /// No attack in flight.
    Idle,
    /// Windup still running.
    Pending,
    /// Target still in range at resolution time.
    Landed,
    /// Target left range (or the attacker died) before resolution.
    Missed,
}

/// One enemy's brain: stats, timers and life state.
#[derive(Component, Debug, Clone)]
pub struct Enemy {
    pub target: Entity,
    pub health: i32,
    pub run_speed: f32,
    pub jump_velocity: f32,
    pub jump_interval: (f32, f32),
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub attack_windup: f32,
    pub despawn_delay: f32,
    life: Life,
    attack_cooldown_until: f32,
    windup_resolves_at: Option<f32>,
    next_jump_at: f32,
}

impl Enemy {
    pub fn new(target: Entity, tuning: &EnemyTuning, first_jump_at: f32) -> Self {
        Self {
            target,
            health: tuning.health,
            run_speed: tuning.run_speed,
            jump_velocity: tuning.jump_velocity,
            jump_interval: (tuning.jump_interval_min, tuning.jump_interval_max),
            attack_range: tuning.attack_range,
            attack_cooldown: tuning.attack_cooldown,
            attack_windup: tuning.attack_windup,
            despawn_delay: tuning.despawn_delay,
            life: Life::Alive,
            attack_cooldown_until: 0.0,
            windup_resolves_at: None,
            next_jump_at: first_jump_at,
        }
    }

    pub fn attack_in_flight(&self) -> bool {
        self.windup_resolves_at.is_some()
    }

    pub fn attack_cooldown_until(&self) -> f32 {
        self.attack_cooldown_until
    }

    pub fn next_jump_at(&self) -> f32 {
        self.next_jump_at
    }

    /// Movement speed right now: zero while an attack winds up.
    pub fn current_speed(&self) -> f32 {
        if self.attack_in_flight() { 0.0 } else { self.run_speed }
    }

    pub fn in_range(&self, distance: f32) -> bool {
        distance <= self.attack_range
    }

    /// Start an attack if in range, idle and off cooldown.
    ///
    /// The cooldown restarts here, at initiation, not when the hit resolves.
    pub fn try_begin_attack(&mut self, distance: f32, now: f32) -> bool {
        if self.is_dead()
            || self.attack_in_flight()
            || !self.in_range(distance)
            || now < self.attack_cooldown_until
        {
            return false;
        }

        self.windup_resolves_at = Some(now + self.attack_windup);
        self.attack_cooldown_until = now + self.attack_cooldown;
        true
    }

    /// Resolve the windup once its time has come.
    ///
    /// The in-flight flag clears whatever the outcome.
    pub fn poll_attack(&mut self, distance: f32, now: f32) -> AttackResolution {
        let Some(at) = self.windup_resolves_at else {
            return AttackResolution::Idle;
        };
        if now < at {
            return AttackResolution::Pending;
        }

        self.windup_resolves_at = None;
        if !self.is_dead() && self.in_range(distance) {
            AttackResolution::Landed
        } else {
            AttackResolution::Missed
        }
    }

    pub fn jump_due(&self, now: f32, grounded: bool) -> bool {
        !self.is_dead() && grounded && now >= self.next_jump_at
    }

    pub fn schedule_jump(&mut self, at: f32) {
        self.next_jump_at = at;
    }

    pub fn remove_at(&self) -> Option<f32> {
        match self.life {
            Life::Alive => None,
            Life::Dead { remove_at, .. } => Some(remove_at),
        }
    }

    pub fn state(&self, grounded: bool) -> EnemyState {
        if self.is_dead() {
            EnemyState::Dead
        } else if self.attack_in_flight() {
            EnemyState::Attacking
        } else if !grounded {
            EnemyState::Jumping
        } else {
            EnemyState::Chasing
        }
    }

    /// First call after death returns `true`; the body effects are applied once.
    fn settle(&mut self) -> bool {
        match &mut self.life {
            Life::Dead { settled, .. } if !*settled => {
                *settled = true;
                true
            }
            _ => false,
        }
    }
}

impl Damageable for Enemy {
    fn is_dead(&self) -> bool {
        matches!(self.life, Life::Dead { .. })
    }

    fn take_damage(&mut self, amount: i32, now: f32) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::Ignored;
        }

        self.health = self.health.saturating_sub(amount.max(0));
        if self.health <= 0 {
            self.health = 0;
            self.die(now);
            DamageOutcome::Killed
        } else {
            DamageOutcome::Damaged { remaining: self.health }
        }
    }

    fn die(&mut self, now: f32) -> bool {
        if self.is_dead() {
            return false;
        }

        self.life = Life::Dead { remove_at: now + self.despawn_delay, settled: false };
        self.windup_resolves_at = None;
        true
    }
}

/// Marker: enemy should be removed from the world.
///
/// We don't despawn inside gameplay systems; we mark and despawn in PostUpdate.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingDespawn;

// -----------------------------------------------------------------------------
// Plugin wiring
// -----------------------------------------------------------------------------

pub fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (enemy_ai, settle_dead_enemies, mark_expired_enemies, update_enemy_presentation)
            .chain()
            .after(crate::plugins::combat::apply_melee_kills::<Enemy>)
            .run_if(in_state(GameState::InGame).and(gameplay_running)),
    );

    app.add_systems(
        Update,
        report_enemy_setup_errors.run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedUpdate,
        enemy_jump
            .after(detect_ground)
            .run_if(in_state(GameState::InGame).and(gameplay_running)),
    );

    app.add_systems(PostUpdate, despawn_marked_enemies);
}

// -----------------------------------------------------------------------------
// Spawn
// -----------------------------------------------------------------------------

/// Spawn one enemy chasing `target`.
///
/// The first jump is scheduled here with a fresh random interval.
pub fn spawn_enemy(
    commands: &mut Commands,
    tunables: &Tunables,
    rng: &mut GameRng,
    target: Entity,
    position: Vec2,
    now: f32,
) -> Entity {
    let tuning = &tunables.enemy;
    let first_jump_at = now + rng.range_f32(tuning.jump_interval_min, tuning.jump_interval_max);

    commands
        .spawn((
            Name::new("Enemy"),
            Enemy::new(target, tuning, first_jump_at),
            EnemyState::default(),
            Facing::default(),
            Grounded::default(),
            Animator::default(),
            Sprite {
                color: Color::srgb(0.85, 0.25, 0.25),
                custom_size: Some(Vec2::new(tuning.size_x, tuning.size_y)),
                ..default()
            },
            Transform::from_xyz(position.x, position.y, 1.0),
            RigidBody::Dynamic,
            Collider::rectangle(tuning.size_x, tuning.size_y),
            LockedAxes::ROTATION_LOCKED,
            enemy_layers(),
            LinearVelocity::ZERO,
            DespawnOnExit(GameState::InGame),
        ))
        .id()
}

// -----------------------------------------------------------------------------
// Rules
// -----------------------------------------------------------------------------

/// Chase, start attacks, resolve windups.
pub(crate) fn enemy_ai(
    time: Res<Time<Virtual>>,
    mut hits: MessageWriter<PlayerHit>,
    q_targets: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut q: Query<
        (Entity, &Transform, &mut Enemy, &mut LinearVelocity, &mut Facing, &mut Animator),
        Without<PendingDespawn>,
    >,
) {
    let now = time.elapsed_secs();

    for (e, tf, mut enemy, mut vel, mut facing, mut animator) in &mut q {
        if enemy.is_dead() {
            continue;
        }
        let Ok(target_tf) = q_targets.get(enemy.target) else {
            continue;
        };

        let to_target = target_tf.translation.truncate() - tf.translation.truncate();
        let distance = to_target.length();

        if enemy.poll_attack(distance, now) == AttackResolution::Landed {
            debug!("Enemy {e:?} attack landed on {:?}", enemy.target);
            hits.write(PlayerHit { attacker: e, target: enemy.target });
        }

        if enemy.try_begin_attack(distance, now) {
            animator.set_trigger("Attack");
            vel.x = 0.0;
        } else {
            // f32::signum(0.0) is 1.0: a target straight above counts as "right".
            let dir = to_target.x.signum();
            vel.x = dir * enemy.current_speed();
            animator.set_bool("isRunning", true);
            *facing = Facing::from_x(dir, *facing);
        }

        if vel.x.abs() < RUNNING_THRESHOLD {
            animator.set_bool("isRunning", false);
        }
    }
}

/// Random jumps on the fixed step, only while grounded.
pub(crate) fn enemy_jump(
    time: Res<Time<Virtual>>,
    mut rng: ResMut<GameRng>,
    mut q: Query<(&mut Enemy, &Grounded, &mut LinearVelocity, &mut Animator), Without<PendingDespawn>>,
) {
    let now = time.elapsed_secs();

    for (mut enemy, grounded, mut vel, mut animator) in &mut q {
        if !enemy.jump_due(now, grounded.0) {
            continue;
        }

        vel.y = enemy.jump_velocity;
        animator.set_trigger("Jump");

        let (lo, hi) = enemy.jump_interval;
        let next = now + rng.range_f32(lo, hi);
        enemy.schedule_jump(next);
    }
}

/// Apply death to the body once: stop, stop interacting, play the cue.
pub(crate) fn settle_dead_enemies(
    mut q: Query<(Entity, &mut Enemy, &mut LinearVelocity, &mut CollisionLayers, &mut Animator, &mut Sprite)>,
) {
    for (e, mut enemy, mut vel, mut layers, mut animator, mut sprite) in &mut q {
        if !enemy.settle() {
            continue;
        }

        vel.0 = Vec2::ZERO;
        *layers = corpse_layers();
        animator.set_trigger("Die");
        animator.set_bool("isRunning", false);
        sprite.color = Color::srgba(0.8, 0.8, 0.8, 1.0);
        debug!("Enemy {e:?} died");
    }
}

/// Mark dead enemies whose removal delay has passed.
pub(crate) fn mark_expired_enemies(
    time: Res<Time<Virtual>>,
    mut commands: Commands,
    q: Query<(Entity, &Enemy), Without<PendingDespawn>>,
) {
    let now = time.elapsed_secs();

    for (e, enemy) in &q {
        if enemy.remove_at().is_some_and(|at| now >= at) {
            commands.entity(e).insert(PendingDespawn);
        }
    }
}

fn update_enemy_presentation(
    mut q: Query<(&Enemy, &Grounded, &Facing, &mut EnemyState, &mut Sprite)>,
) {
    for (enemy, grounded, facing, mut state, mut sprite) in &mut q {
        let next = enemy.state(grounded.0);
        if *state != next {
            *state = next;
        }
        sprite.flip_x = facing.flip_x();
    }
}

/// Missing physics or animation parts are configuration errors: reported, not fatal.
fn report_enemy_setup_errors(
    q: Query<(Entity, Has<Collider>, Has<LinearVelocity>, Has<Animator>), Added<Enemy>>,
) {
    for (e, has_collider, has_velocity, has_animator) in &q {
        if !(has_collider && has_velocity && has_animator) {
            error_once!(
                "Enemy {e:?} is missing components (collider: {has_collider}, velocity: {has_velocity}, animator: {has_animator})"
            );
        }
    }
}

// -----------------------------------------------------------------------------
// Cleanup (PostUpdate)
// -----------------------------------------------------------------------------

/// Despawn enemies marked for removal.
fn despawn_marked_enemies(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}
