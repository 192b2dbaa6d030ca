use bevy::prelude::*;
use avian2d::prelude::*;
use crate::common::layers::ground_layers;
use crate::common::test_utils::run_system_once;

#[test]
fn spawns_floor_and_walls_on_ground_layer() {
    let mut world = World::new();
    run_system_once(&mut world, super::spawn_arena);

    let blocks = world.query::<(&Name, &RigidBody, &CollisionLayers)>().iter(&world)
        .filter(|(_, rb, layers)| matches!(**rb, RigidBody::Static) && **layers == ground_layers())
        .count();
    assert_eq!(blocks, 3);

    let floor = world.query::<(&Name, &Transform)>().iter(&world)
        .find(|(n, _)| n.as_str() == "Floor")
        .map(|(_, tf)| tf.translation.y)
        .unwrap();
    assert!(floor < super::FLOOR_Y);
}
