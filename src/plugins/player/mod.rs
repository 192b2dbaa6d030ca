//! Player plugin.
//!
//! Pipeline:
//! - PreUpdate: keyboard -> `ActionInput` (input plugin)
//! - Update: jump / attack / block on action edges, incoming hits, reported state
//! - FixedUpdate: ground contact refresh, horizontal velocity from held actions
//!
//! The rules live on `PlayerCombat` as plain methods (`try_jump`, `try_attack`,
//! `try_block`, `receive_hit`); systems only feed them the clock and apply the
//! results to physics, animation and messages.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy::time::Virtual;

use crate::common::animator::{Animator, AnimatorUpdateMode};
use crate::common::layers::player_layers;
use crate::common::motion::{detect_ground, Facing, Grounded};
use crate::common::rng::GameRng;
use crate::common::state::{gameplay_running, GameState};
use crate::common::tunables::{PlayerTuning, Tunables};
use crate::plugins::combat::{MeleeStrike, PlayerDied, PlayerHit};
use crate::plugins::input::{Action, ActionInput};

const ATTACK_VARIANTS: [&str; 3] = ["Attack1", "Attack2", "Attack3"];

/// Horizontal speed above which the player counts as moving.
const MOVING_THRESHOLD: f32 = 0.1;

#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Player;

/// The live player entity, if any. Enemies copy it at construction.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PlayerEntity(pub Option<Entity>);

/// Melee hitbox in the player's local space, authored facing right.
#[derive(Component, Debug, Clone, Copy)]
pub struct AttackHitbox {
    pub offset: Vec2,
    pub radius: f32,
}

impl AttackHitbox {
    /// World-space center for the given body position and facing.
    pub fn center(&self, position: Vec2, facing: Facing) -> Vec2 {
        position + facing.mirror(self.offset)
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Idle,
    Moving,
    Airborne,
    Attacking,
    Blocking,
    Hit,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    Ground,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Already dead.
    Ignored,
    /// Absorbed by an active block.
    Blocked,
    Wounded { lives_left: u32 },
    Killed,
}

/// Lives, jump, attack and block bookkeeping.
#[derive(Component, Debug, Clone)]
pub struct PlayerCombat {
    lives: u32,
    dead: bool,
    double_jump_available: bool,
    block_until: Option<f32>,
    next_attack_allowed_at: f32,
    last_attack_at: Option<f32>,
    last_hit_at: Option<f32>,
}

impl PlayerCombat {
    pub fn new(lives: u32) -> Self {
        Self {
            lives,
            dead: false,
            double_jump_available: false,
            block_until: None,
            next_attack_allowed_at: 0.0,
            last_attack_at: None,
            last_hit_at: None,
        }
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn double_jump_available(&self) -> bool {
        self.double_jump_available
    }

    pub fn next_attack_allowed_at(&self) -> f32 {
        self.next_attack_allowed_at
    }

    /// Touching ground replenishes the double jump. A new player has none until
    /// the first landing.
    pub fn on_ground_contact(&mut self) {
        if !self.dead {
            self.double_jump_available = true;
        }
    }

    pub fn try_jump(&mut self, grounded: bool) -> Option<JumpKind> {
        if self.dead {
            None
        } else if grounded {
            Some(JumpKind::Ground)
        } else if self.double_jump_available {
            self.double_jump_available = false;
            Some(JumpKind::Double)
        } else {
            None
        }
    }

    pub fn try_attack(&mut self, now: f32, cooldown: f32) -> bool {
        if self.dead || now < self.next_attack_allowed_at {
            return false;
        }

        self.next_attack_allowed_at = now + cooldown;
        self.last_attack_at = Some(now);
        true
    }

    pub fn is_blocking(&self, now: f32) -> bool {
        !self.dead && self.block_until.is_some_and(|until| now < until)
    }

    /// Start a block unless one is already running.
    pub fn try_block(&mut self, now: f32, duration: f32) -> bool {
        if self.dead || self.is_blocking(now) {
            return false;
        }

        self.block_until = Some(now + duration);
        true
    }

    /// Drop a block whose deadline has passed. `true` when a live block just ended.
    pub fn expire_block(&mut self, now: f32) -> bool {
        match self.block_until {
            Some(until) if now >= until || self.dead => {
                self.block_until = None;
                !self.dead
            }
            _ => false,
        }
    }

    pub fn receive_hit(&mut self, now: f32) -> HitOutcome {
        if self.dead {
            return HitOutcome::Ignored;
        }
        if self.is_blocking(now) {
            return HitOutcome::Blocked;
        }

        self.lives = self.lives.saturating_sub(1);
        self.last_hit_at = Some(now);

        if self.lives == 0 {
            self.dead = true;
            self.block_until = None;
            HitOutcome::Killed
        } else {
            HitOutcome::Wounded { lives_left: self.lives }
        }
    }

    /// Reported state by priority: Dead > Blocking > Hit > Attacking > Airborne > Moving > Idle.
    pub fn state(&self, now: f32, grounded: bool, vx: f32, tuning: &PlayerTuning) -> PlayerState {
        let within = |at: Option<f32>, window: f32| at.is_some_and(|t| now < t + window);

        if self.dead {
            PlayerState::Dead
        } else if self.is_blocking(now) {
            PlayerState::Blocking
        } else if within(self.last_hit_at, tuning.hit_react_time) {
            PlayerState::Hit
        } else if within(self.last_attack_at, tuning.attack_anim_time) {
            PlayerState::Attacking
        } else if !grounded {
            PlayerState::Airborne
        } else if vx.abs() > MOVING_THRESHOLD {
            PlayerState::Moving
        } else {
            PlayerState::Idle
        }
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<PlayerEntity>()
        .add_systems(OnEnter(GameState::InGame), spawn_player)
        .add_systems(OnExit(GameState::InGame), forget_player);

    app.add_systems(
        Update,
        (
            report_player_setup_errors,
            (player_actions, expire_player_block)
                .chain()
                .run_if(gameplay_running),
            receive_hits
                .after(crate::plugins::enemies::enemy_ai)
                .run_if(gameplay_running),
            update_player_presentation
                .after(receive_hits)
                .run_if(gameplay_running),
        )
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedUpdate,
        (refresh_ground_contact, apply_player_movement)
            .chain()
            .after(detect_ground)
            .run_if(in_state(GameState::InGame).and(gameplay_running)),
    );
}

fn spawn_player(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut player_entity: ResMut<PlayerEntity>,
) {
    let t = &tunables.player;

    let id = commands
        .spawn((
            Name::new("Player"),
            Player,
            PlayerCombat::new(t.lives),
            PlayerState::default(),
            AttackHitbox { offset: t.attack_offset(), radius: t.attack_radius },
            Facing::default(),
            Grounded::default(),
            Animator::default(),
            Sprite {
                color: Color::srgb(0.2, 0.75, 0.9),
                custom_size: Some(Vec2::new(t.size_x, t.size_y)),
                ..default()
            },
            Transform::from_xyz(t.spawn_x, t.spawn_y, 2.0),
            (
                RigidBody::Dynamic,
                Collider::rectangle(t.size_x, t.size_y),
                LockedAxes::ROTATION_LOCKED,
                player_layers(),
                LinearVelocity::ZERO,
            ),
            DespawnOnExit(GameState::InGame),
        ))
        .id();

    player_entity.0 = Some(id);
    info!("Player spawned with {} lives", t.lives);
}

fn forget_player(mut player_entity: ResMut<PlayerEntity>) {
    player_entity.0 = None;
}

/// Missing physics or animation parts are configuration errors: reported once.
fn report_player_setup_errors(
    q: Query<(Entity, Has<Collider>, Has<LinearVelocity>, Has<Animator>), Added<Player>>,
) {
    for (e, has_collider, has_velocity, has_animator) in &q {
        if !(has_collider && has_velocity && has_animator) {
            error_once!(
                "Player {e:?} is missing components (collider: {has_collider}, velocity: {has_velocity}, animator: {has_animator})"
            );
        }
    }
}

fn refresh_ground_contact(mut q: Query<(&Grounded, &mut PlayerCombat), With<Player>>) {
    for (grounded, mut combat) in &mut q {
        if grounded.0 && !combat.double_jump_available() {
            combat.on_ground_contact();
        }
    }
}

/// Horizontal velocity straight from held actions; zero when none are held.
pub(crate) fn apply_player_movement(
    tunables: Res<Tunables>,
    input: Res<ActionInput>,
    mut q: Query<(&PlayerCombat, &mut LinearVelocity), With<Player>>,
) {
    for (combat, mut vel) in &mut q {
        if combat.is_dead() {
            continue;
        }
        vel.x = input.horizontal_axis() * tunables.player.move_speed;
    }
}

/// Jump, attack and block on this frame's action edges.
pub fn player_actions(
    time: Res<Time<Virtual>>,
    tunables: Res<Tunables>,
    input: Res<ActionInput>,
    mut rng: ResMut<GameRng>,
    mut strikes: MessageWriter<MeleeStrike>,
    mut q: Query<
        (
            Entity,
            &Transform,
            &Grounded,
            &Facing,
            &AttackHitbox,
            &mut PlayerCombat,
            &mut LinearVelocity,
            &mut Animator,
        ),
        With<Player>,
    >,
) {
    let now = time.elapsed_secs();
    let t = &tunables.player;

    for (e, tf, grounded, facing, hitbox, mut combat, mut vel, mut animator) in &mut q {
        if combat.is_dead() {
            continue;
        }

        if input.just_pressed(Action::Jump) {
            if let Some(kind) = combat.try_jump(grounded.0) {
                vel.y = t.jump_velocity;
                animator.set_trigger("Jump");
                debug!("Player jump ({kind:?})");
            }
        }

        if input.just_pressed(Action::Attack) && combat.try_attack(now, t.attack_cooldown) {
            let variant = ATTACK_VARIANTS[rng.index(ATTACK_VARIANTS.len())];
            animator.set_trigger(variant);

            strikes.write(MeleeStrike {
                attacker: e,
                center: hitbox.center(tf.translation.truncate(), *facing),
                radius: hitbox.radius,
                reward: t.kill_reward,
            });
        }

        if input.just_pressed(Action::Block) && combat.try_block(now, t.block_duration) {
            animator.set_trigger("Block");
            info!("Player blocking for {:.2}s", t.block_duration);
        }
    }
}

fn expire_player_block(time: Res<Time<Virtual>>, mut q: Query<&mut PlayerCombat, With<Player>>) {
    let now = time.elapsed_secs();

    for mut combat in &mut q {
        if combat.expire_block(now) {
            info!("Player block ended");
        }
    }
}

/// Apply resolved enemy attacks. The last life pauses gameplay time and hands
/// off to the end sequence.
pub(crate) fn receive_hits(
    mut hits: MessageReader<PlayerHit>,
    mut time: ResMut<Time<Virtual>>,
    mut died: MessageWriter<PlayerDied>,
    mut q: Query<(&Transform, &mut PlayerCombat, &mut Animator, &mut LinearVelocity), With<Player>>,
) {
    for hit in hits.read() {
        let Ok((tf, mut combat, mut animator, mut vel)) = q.get_mut(hit.target) else {
            continue;
        };

        let now = time.elapsed_secs();
        match combat.receive_hit(now) {
            HitOutcome::Ignored => {}
            HitOutcome::Blocked => info!("Player blocked an attack from {:?}", hit.attacker),
            HitOutcome::Wounded { lives_left } => {
                animator.set_trigger("Hit");
                info!("Player hit by {:?}, {lives_left} lives left", hit.attacker);
            }
            HitOutcome::Killed => {
                animator.set_trigger("Hit");
                animator.set_trigger("Die");
                animator.update_mode = AnimatorUpdateMode::Unscaled;
                vel.0 = Vec2::ZERO;
                time.pause();

                info!("Player died");
                died.write(PlayerDied { player: hit.target, position: tf.translation.truncate() });
            }
        }
    }
}

/// Facing follows horizontal velocity; sprite, animator and reported state follow.
fn update_player_presentation(
    time: Res<Time<Virtual>>,
    tunables: Res<Tunables>,
    mut q: Query<
        (
            &PlayerCombat,
            &LinearVelocity,
            &Grounded,
            &mut Facing,
            &mut PlayerState,
            &mut Animator,
            &mut Sprite,
        ),
        With<Player>,
    >,
) {
    let now = time.elapsed_secs();

    for (combat, vel, grounded, mut facing, mut state, mut animator, mut sprite) in &mut q {
        let next_facing = Facing::from_x(vel.x, *facing);
        if *facing != next_facing {
            *facing = next_facing;
        }
        sprite.flip_x = facing.flip_x();
        animator.set_float("Speed", vel.x.abs());

        let next = combat.state(now, grounded.0, vel.x, &tunables.player);
        if *state != next {
            debug!("Player state {:?} -> {:?}", *state, next);
            *state = next;
        }
    }
}
