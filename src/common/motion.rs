//! Shared locomotion state: facing and ground contact.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::common::tunables::Tunables;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// Facing for a horizontal direction. Zero keeps the current facing.
    pub fn from_x(x: f32, current: Facing) -> Facing {
        if x < 0.0 {
            Facing::Left
        } else if x > 0.0 {
            Facing::Right
        } else {
            current
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    /// Mirror a right-facing local offset about the vertical axis.
    pub fn mirror(self, offset: Vec2) -> Vec2 {
        Vec2::new(offset.x.abs() * self.sign(), offset.y)
    }

    pub fn flip_x(self) -> bool {
        self == Facing::Left
    }
}

/// Result of the last downward ground probe.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Grounded(pub bool);

/// Half height of a box or circle collider; other shapes probe from the center.
pub fn half_height(collider: &Collider) -> f32 {
    let shape = collider.shape_scaled();
    if let Some(c) = shape.as_cuboid() {
        c.half_extents.y
    } else if let Some(b) = shape.as_ball() {
        b.radius
    } else {
        0.0
    }
}

/// Probe origin: bottom-center of the collider.
pub fn probe_origin(center: Vec2, half_height: f32) -> Vec2 {
    center - Vec2::new(0.0, half_height)
}

/// Short downward ray from each body's lower bound against the ground layer.
///
/// Runs in the fixed step, before jump impulses are applied.
pub fn detect_ground(
    spatial_query: SpatialQuery,
    tunables: Res<Tunables>,
    mut q: Query<(&Transform, &Collider, &mut Grounded)>,
) {
    let filter = SpatialQueryFilter::from_mask(Layer::Ground);

    for (transform, collider, mut grounded) in &mut q {
        let origin = probe_origin(transform.translation.truncate(), half_height(collider));
        let hit = spatial_query.cast_ray(
            origin,
            Dir2::NEG_Y,
            tunables.ground_probe_distance,
            true,
            &filter,
        );

        let now_grounded = hit.is_some();
        if grounded.0 != now_grounded {
            grounded.0 = now_grounded;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_flips_only_x() {
        let off = Vec2::new(40.0, 5.0);
        assert_eq!(Facing::Right.mirror(off), Vec2::new(40.0, 5.0));
        assert_eq!(Facing::Left.mirror(off), Vec2::new(-40.0, 5.0));
        // Mirroring is about the axis, not relative to the stored sign.
        assert_eq!(Facing::Right.mirror(Vec2::new(-40.0, 5.0)), Vec2::new(40.0, 5.0));
    }

    #[test]
    fn zero_direction_keeps_facing() {
        assert_eq!(Facing::from_x(0.0, Facing::Left), Facing::Left);
        assert_eq!(Facing::from_x(-2.0, Facing::Right), Facing::Left);
        assert_eq!(Facing::from_x(2.0, Facing::Left), Facing::Right);
    }

    #[test]
    fn probe_starts_at_the_lower_bound() {
        let collider = Collider::rectangle(32.0, 48.0);
        let origin = probe_origin(Vec2::new(10.0, 100.0), half_height(&collider));
        assert!((origin - Vec2::new(10.0, 76.0)).length() < 1e-4);

        assert!((half_height(&Collider::circle(13.0)) - 13.0).abs() < 1e-4);
    }
}
