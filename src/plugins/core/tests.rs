use bevy::prelude::*;
use crate::plugins::core;
use crate::common::rng::GameRng;
use crate::common::score::Score;
use crate::common::tunables::Tunables;

#[test]
fn inserts_resources() {
    let mut app = App::new();
    core::plugin(&mut app);
    assert!(app.world().get_resource::<Tunables>().is_some());
    assert!(app.world().get_resource::<ClearColor>().is_some());
    assert!(app.world().get_resource::<GameRng>().is_some());
    assert_eq!(app.world().resource::<Score>().value(), 0);
}

#[test]
fn keeps_preloaded_tunables() {
    let mut app = App::new();
    let mut tunables = Tunables::default();
    tunables.player.lives = 9;
    tunables.seed = Some(4);
    app.insert_resource(tunables);

    core::plugin(&mut app);

    assert_eq!(app.world().resource::<Tunables>().player.lives, 9);
    let mut expected = GameRng::seeded(4);
    let mut rng = app.world_mut().resource_mut::<GameRng>();
    assert_eq!(rng.range_f32(0.0, 1.0), expected.range_f32(0.0, 1.0));
}
