mod common;

use avian2d::prelude::*;
use bevy::prelude::*;

use blade_rush::common::motion::Grounded;
use blade_rush::common::tunables::Tunables;
use blade_rush::plugins::input::{Action, ActionInput};
use blade_rush::plugins::player::PlayerCombat;

fn app_with_gravity() -> App {
    let mut tunables = common::test_tunables();
    tunables.gravity = Tunables::default().gravity;
    common::app_headless_with(tunables)
}

fn press_jump(app: &mut App) {
    let mut input = app.world_mut().resource_mut::<ActionInput>();
    input.release(Action::Jump);
    input.press(Action::Jump);
}

fn grounded(app: &App) -> bool {
    app.world().get::<Grounded>(common::player(app)).is_some_and(|g| g.0)
}

fn combat(app: &App) -> &PlayerCombat {
    app.world()
        .get::<PlayerCombat>(common::player(app))
        .expect("player has combat state")
}

fn vertical_speed(app: &App) -> f32 {
    app.world()
        .get::<LinearVelocity>(common::player(app))
        .expect("player has a velocity")
        .y
}

/// Tick until the player's ground contact matches `want`, or give up.
fn tick_until_grounded(app: &mut App, want: bool, max_frames: usize) -> bool {
    for _ in 0..max_frames {
        app.update();
        if grounded(app) == want {
            return true;
        }
    }
    false
}

#[test]
fn player_lands_and_gets_the_double_jump() {
    let mut app = app_with_gravity();
    common::tick(&mut app, 2);

    // Spawned above the floor: no contact and no double jump yet.
    assert!(!grounded(&app));
    assert!(!combat(&app).double_jump_available());

    assert!(tick_until_grounded(&mut app, true, 120), "player never landed");
    common::tick(&mut app, 2);
    assert!(grounded(&app));
    assert!(combat(&app).double_jump_available());
}

#[test]
fn one_air_jump_per_landing() {
    let mut app = app_with_gravity();
    let jump_velocity = Tunables::default().player.jump_velocity;
    common::tick(&mut app, 2);
    assert!(tick_until_grounded(&mut app, true, 120), "player never landed");
    common::tick(&mut app, 2);

    // Ground jump.
    press_jump(&mut app);
    common::tick(&mut app, 1);
    assert_eq!(vertical_speed(&app), jump_velocity);
    assert!(tick_until_grounded(&mut app, false, 30), "player never left the ground");
    common::tick(&mut app, 4);

    // Air jump resets the rise speed and spends the double jump.
    press_jump(&mut app);
    common::tick(&mut app, 1);
    assert_eq!(vertical_speed(&app), jump_velocity);
    assert!(!combat(&app).double_jump_available());

    // A third press in the air does nothing; gravity keeps slowing the rise.
    common::tick(&mut app, 6);
    press_jump(&mut app);
    common::tick(&mut app, 1);
    assert!(vertical_speed(&app) < jump_velocity);
    assert!(!combat(&app).double_jump_available());

    // Landing hands it back.
    assert!(tick_until_grounded(&mut app, true, 180), "player never came back down");
    common::tick(&mut app, 2);
    assert!(combat(&app).double_jump_available());
}
