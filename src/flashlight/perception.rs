//! Light-cone perception: which enemy the flashlight is touching, and where
//! the beam lands.
//!
//! The geometry is written against the [`RayCaster`] trait so it can be
//! driven by Rapier in game and by a stub in tests.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::core::ConeLayout;

/// First thing a ray ran into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub point: Vec3,
}

/// Anything that can answer "what does this ray hit first?".
pub trait RayCaster {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}

/// A position plus the direction it faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    pub position: Vec3,
    pub forward: Vec3,
}

impl Viewpoint {
    pub fn from_global(transform: &GlobalTransform) -> Self {
        Self {
            position: transform.translation(),
            forward: *transform.forward(),
        }
    }
}

/// Ray queries against the Rapier world.
pub struct PhysicsRayCaster<'a> {
    pub context: &'a RapierContext,
    /// Usually the player's own collider.
    pub exclude: Option<Entity>,
}

impl RayCaster for PhysicsRayCaster<'_> {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let mut filter = QueryFilter::default().exclude_sensors();
        if let Some(entity) = self.exclude {
            filter = filter.exclude_collider(entity);
        }

        self.context
            .cast_ray(origin, direction, max_distance, true, filter)
            .map(|(entity, distance)| RayHit {
                entity,
                point: origin + direction * distance,
            })
    }
}

/// Number of whole-degree steps in an inclusive sweep.
fn steps_in(range: (i32, i32), step: i32) -> usize {
    if step <= 0 || range.1 < range.0 {
        return 0;
    }
    ((range.1 - range.0) / step + 1) as usize
}

/// Ray directions of the perception cone in sweep order.
///
/// The first ray is `base_forward` turned left by the yaw offset and then up
/// by the pitch offset, both about world axes. Each row walks right in
/// `step_degrees` increments; each new row starts one step further down.
pub fn cone_directions(base_forward: Vec3, cone: &ConeLayout) -> Vec<Vec3> {
    let rows = steps_in(cone.rows, cone.step_degrees);
    let columns = steps_in(cone.columns, cone.step_degrees);
    let step = (cone.step_degrees as f32).to_radians();

    let yawed = Quat::from_axis_angle(Vec3::Y, cone.yaw_offset_degrees.to_radians())
        * base_forward.normalize_or_zero();
    let mut first_in_row =
        Quat::from_axis_angle(Vec3::X, cone.pitch_offset_degrees.to_radians()) * yawed;

    let step_right = Quat::from_axis_angle(Vec3::Y, -step);
    let step_down = Quat::from_axis_angle(Vec3::X, -step);

    let mut directions = Vec::with_capacity(rows * columns);
    for _ in 0..rows {
        let mut direction = first_in_row;
        for _ in 0..columns {
            directions.push(direction);
            direction = step_right * direction;
        }
        first_in_row = step_down * first_in_row;
    }
    directions
}

/// Sweep the cone and return the first enemy struck.
///
/// Nothing is cast while the light is off. Rays that hit scenery simply
/// move on to the next direction; the first enemy hit ends the sweep.
pub fn scan_for_lit_targets(
    light_on: bool,
    view: Viewpoint,
    cone: &ConeLayout,
    caster: &impl RayCaster,
    is_enemy: impl Fn(Entity) -> bool,
) -> Option<Entity> {
    if !light_on {
        return None;
    }

    let origin = view.position + view.forward.normalize_or_zero() * cone.origin_offset;
    cone_directions(view.forward, cone).into_iter().find_map(|direction| {
        caster
            .cast_ray(origin, direction, cone.max_distance)
            .filter(|hit| is_enemy(hit.entity))
            .map(|hit| hit.entity)
    })
}

/// World point currently lit by the flashlight.
///
/// A miss falls back to a point `range` ahead of the *camera*, not the
/// light, which sits slightly off to the side of the eyes.
pub fn query_beam_target(
    light: Viewpoint,
    camera: Viewpoint,
    range: f32,
    caster: &impl RayCaster,
) -> Vec3 {
    match caster.cast_ray(light.position, light.forward, range) {
        Some(hit) => hit.point,
        None => camera.position + camera.forward.normalize_or_zero() * range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Returns a hit for any ray pointing (almost) exactly at a target.
    struct StubCaster {
        targets: Vec<(Vec3, RayHit)>,
        casts: Cell<usize>,
    }

    impl StubCaster {
        fn new(targets: Vec<(Vec3, RayHit)>) -> Self {
            Self { targets, casts: Cell::new(0) }
        }
    }

    impl RayCaster for StubCaster {
        fn cast_ray(&self, _origin: Vec3, direction: Vec3, _max: f32) -> Option<RayHit> {
            self.casts.set(self.casts.get() + 1);
            self.targets
                .iter()
                .find(|(target, _)| target.dot(direction.normalize()) > 0.99999)
                .map(|(_, hit)| *hit)
        }
    }

    fn hit(index: u32) -> RayHit {
        RayHit { entity: Entity::from_raw(index), point: Vec3::splat(index as f32) }
    }

    fn view() -> Viewpoint {
        Viewpoint { position: Vec3::ZERO, forward: Vec3::NEG_Z }
    }

    #[test]
    fn cone_has_one_ray_per_grid_cell() {
        let directions = cone_directions(Vec3::NEG_Z, &ConeLayout::default());
        assert_eq!(directions.len(), 37 * 9);
        assert!(directions.iter().all(|d| (d.length() - 1.0).abs() < 1e-4));
    }

    #[test]
    fn first_ray_points_up_and_left() {
        let directions = cone_directions(Vec3::NEG_Z, &ConeLayout::default());
        let first = directions[0];
        assert!(first.x < 0.0, "first ray should lean left: {first:?}");
        assert!(first.y > 0.0, "first ray should lean up: {first:?}");

        // Next ray in the row is further right, next row is further down.
        assert!(directions[1].x > first.x);
        assert!(directions[9].y < first.y);
    }

    #[test]
    fn dark_flashlight_casts_nothing() {
        let caster = StubCaster::new(vec![]);
        let found = scan_for_lit_targets(false, view(), &ConeLayout::default(), &caster, |_| true);
        assert_eq!(found, None);
        assert_eq!(caster.casts.get(), 0);
    }

    #[test]
    fn earliest_row_wins_and_stops_the_sweep() {
        let cone = ConeLayout::default();
        let directions = cone_directions(Vec3::NEG_Z, &cone);
        let row_one = 9 + 4;
        let row_twenty = 20 * 9 + 4;
        let caster = StubCaster::new(vec![
            (directions[row_twenty], hit(2)),
            (directions[row_one], hit(1)),
        ]);

        let found = scan_for_lit_targets(true, view(), &cone, &caster, |_| true);
        assert_eq!(found, Some(Entity::from_raw(1)));
        assert_eq!(caster.casts.get(), row_one + 1);
    }

    #[test]
    fn scenery_hits_do_not_end_the_sweep() {
        let cone = ConeLayout::default();
        let directions = cone_directions(Vec3::NEG_Z, &cone);
        let wall = hit(7);
        let enemy = hit(3);
        let caster = StubCaster::new(vec![(directions[0], wall), (directions[50], enemy)]);

        let found = scan_for_lit_targets(true, view(), &cone, &caster, |e| e == enemy.entity);
        assert_eq!(found, Some(enemy.entity));
    }

    #[test]
    fn beam_target_is_the_hit_point() {
        let caster = StubCaster::new(vec![(Vec3::NEG_Z, hit(4))]);
        let light = Viewpoint { position: Vec3::ZERO, forward: Vec3::NEG_Z };
        let target = query_beam_target(light, light, 10.0, &caster);
        assert_eq!(target, Vec3::splat(4.0));
    }

    #[test]
    fn beam_miss_falls_back_along_camera_forward() {
        let caster = StubCaster::new(vec![]);
        let light = Viewpoint { position: Vec3::new(0.2, 1.5, 0.0), forward: Vec3::NEG_Z };
        let camera = Viewpoint { position: Vec3::new(0.0, 1.6, 0.0), forward: Vec3::X * 2.0 };

        let target = query_beam_target(light, camera, 10.0, &caster);
        assert_eq!(target, Vec3::new(10.0, 1.6, 0.0));
    }
}
