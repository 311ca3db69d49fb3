//! Level construction from the layout.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use std::f32::consts::FRAC_PI_2;

use super::house::{Door, DoorTrigger, House, Interior};
use crate::enemies::NavObstacle;
use super::layout::{HouseDef, InteriorDef, LevelLayout, Side, WallDef};
use super::materials::Palette;

/// Marker for everything that belongs to the current level and is
/// despawned with it.
#[derive(Component)]
pub struct LevelEntity;

/// Fence that only stands during the tutorial.
#[derive(Component)]
pub struct TutorialFence;

const WALL_HEIGHT: f32 = 3.0;
const WALL_THICKNESS: f32 = 0.2;
const DOOR_WIDTH: f32 = 1.2;
const DOOR_HEIGHT: f32 = 2.2;
const FENCE_THICKNESS: f32 = 0.15;
/// Room enemies keep from walls and fences.
const NAV_CLEARANCE: f32 = 0.3;

/// Build the street. Returns the spawned houses.
pub fn build_level(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    layout: &LevelLayout,
) -> Vec<Entity> {
    let palette = Palette::new(materials);

    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.6, 0.65, 0.8),
        brightness: layout.ambient_brightness,
    });

    spawn_ground(commands, meshes, &palette, layout);

    for wall in &layout.boundary {
        spawn_fence(commands, meshes, &palette, wall);
    }
    for wall in &layout.tutorial_fences {
        let fence = spawn_fence(commands, meshes, &palette, wall);
        let span = Rect::from_corners(Vec2::from(wall.from), Vec2::from(wall.to));
        commands.entity(fence).insert((
            TutorialFence,
            NavObstacle(vec![span.inflate(FENCE_THICKNESS / 2.0 + NAV_CLEARANCE)]),
        ));
    }

    for &position in &layout.street_lamps {
        spawn_street_lamp(commands, meshes, &palette, Vec3::from(position));
    }

    layout
        .houses
        .iter()
        .map(|def| spawn_house(commands, meshes, &palette, def))
        .collect()
}

fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    palette: &Palette,
    layout: &LevelLayout,
) {
    let min = Vec2::from(layout.ground_min);
    let max = Vec2::from(layout.ground_max);
    let size = max - min;
    let center = (min + max) / 2.0;
    let depth = 0.5;

    // Top surface at y = 0
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(size.x, depth, size.y))),
        MeshMaterial3d(palette.ground.clone()),
        Transform::from_xyz(center.x, -depth / 2.0, center.y),
        Collider::cuboid(size.x / 2.0, depth / 2.0, size.y / 2.0),
        LevelEntity,
    ));
}

/// Spawn a solid box. Returns the entity.
fn spawn_block(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    transform: Transform,
    size: Vec3,
) -> Entity {
    commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
            MeshMaterial3d(material),
            transform,
            Collider::cuboid(size.x / 2.0, size.y / 2.0, size.z / 2.0),
            LevelEntity,
        ))
        .id()
}

fn spawn_fence(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    palette: &Palette,
    wall: &WallDef,
) -> Entity {
    let from = Vec2::from(wall.from);
    let to = Vec2::from(wall.to);
    let span = to - from;
    let middle = (from + to) / 2.0;
    let yaw = (-span.y).atan2(span.x);

    spawn_block(
        commands,
        meshes,
        palette.fence.clone(),
        Transform::from_xyz(middle.x, wall.height / 2.0, middle.y)
            .with_rotation(Quat::from_rotation_y(yaw)),
        Vec3::new(span.length(), wall.height, FENCE_THICKNESS),
    )
}

fn spawn_street_lamp(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    palette: &Palette,
    position: Vec3,
) {
    spawn_block(
        commands,
        meshes,
        palette.fence.clone(),
        Transform::from_xyz(position.x, position.y / 2.0, position.z),
        Vec3::new(0.15, position.y, 0.15),
    );

    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(0.2))),
        MeshMaterial3d(palette.lamp.clone()),
        PointLight {
            color: Color::srgb(1.0, 0.75, 0.45),
            intensity: 60_000.0,
            range: 12.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(position),
        LevelEntity,
    ));
}

/// Where the doorway sits in a room wall and which way the wall runs.
struct Doorway {
    center: Vec3,
    /// Direction along the wall, from the hinge towards the latch.
    along: Vec3,
    /// Base rotation mapping local +X onto `along`.
    rotation: Quat,
    /// Sign of the swing that opens the door into the room.
    swing_sign: f32,
}

fn doorway(min: Vec2, max: Vec2, side: Side) -> Doorway {
    let center = (min + max) / 2.0;
    let (point, along, rotation, swing_sign) = match side {
        Side::North => (Vec2::new(center.x, min.y), Vec3::X, Quat::IDENTITY, -1.0),
        Side::South => (Vec2::new(center.x, max.y), Vec3::X, Quat::IDENTITY, 1.0),
        Side::East => (Vec2::new(max.x, center.y), Vec3::Z, Quat::from_rotation_y(-FRAC_PI_2), -1.0),
        Side::West => (Vec2::new(min.x, center.y), Vec3::Z, Quat::from_rotation_y(-FRAC_PI_2), 1.0),
    };

    Doorway {
        center: Vec3::new(point.x, 0.0, point.y),
        along,
        rotation,
        swing_sign,
    }
}

fn spawn_house(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    palette: &Palette,
    def: &HouseDef,
) -> Entity {
    let (a, b) = (Vec2::from(def.room[0]), Vec2::from(def.room[1]));
    let (min, max) = (a.min(b), a.max(b));
    let size = max - min;
    let center = (min + max) / 2.0;

    let house = commands
        .spawn((
            House::new(def.address, def.footprint(), def.is_final),
            NavObstacle(def.footprint().keep_out(NAV_CLEARANCE).to_vec()),
            Transform::from_xyz(center.x, 0.0, center.y),
            Visibility::default(),
            LevelEntity,
        ))
        .id();

    // Four walls, the door wall split around the doorway
    let sides = [
        (Side::North, Vec2::new(center.x, min.y), size.x, false),
        (Side::South, Vec2::new(center.x, max.y), size.x, false),
        (Side::East, Vec2::new(max.x, center.y), size.y, true),
        (Side::West, Vec2::new(min.x, center.y), size.y, true),
    ];
    for (side, middle, length, runs_along_z) in sides {
        let pieces: Vec<(f32, f32)> = if side == def.door {
            let piece = (length - DOOR_WIDTH) / 2.0;
            vec![(-(DOOR_WIDTH + piece) / 2.0, piece), ((DOOR_WIDTH + piece) / 2.0, piece)]
        } else {
            vec![(0.0, length)]
        };

        for (offset, piece) in pieces {
            let (position, extent) = if runs_along_z {
                (
                    Vec3::new(middle.x, WALL_HEIGHT / 2.0, middle.y + offset),
                    Vec3::new(WALL_THICKNESS, WALL_HEIGHT, piece),
                )
            } else {
                (
                    Vec3::new(middle.x + offset, WALL_HEIGHT / 2.0, middle.y),
                    Vec3::new(piece, WALL_HEIGHT, WALL_THICKNESS),
                )
            };
            spawn_block(commands, meshes, palette.siding.clone(), Transform::from_translation(position), extent);
        }
    }

    // Roof
    spawn_block(
        commands,
        meshes,
        palette.roof.clone(),
        Transform::from_xyz(center.x, WALL_HEIGHT + 0.1, center.y),
        Vec3::new(size.x + 0.6, 0.2, size.y + 0.6),
    );

    let door = doorway(min, max, def.door);

    // Lintel over the doorway
    spawn_block(
        commands,
        meshes,
        palette.siding.clone(),
        Transform::from_translation(door.center + Vec3::Y * (DOOR_HEIGHT + WALL_HEIGHT) / 2.0)
            .with_rotation(door.rotation),
        Vec3::new(DOOR_WIDTH, WALL_HEIGHT - DOOR_HEIGHT, WALL_THICKNESS),
    );

    // Door hinged at one jamb; the panel hangs off the hinge
    let hinge = door.center - door.along * DOOR_WIDTH / 2.0;
    commands
        .spawn((
            Door {
                house,
                closed_rotation: door.rotation,
                swing: 0.0,
                swing_sign: door.swing_sign,
            },
            Transform::from_translation(hinge).with_rotation(door.rotation),
            Visibility::default(),
            LevelEntity,
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::new(DOOR_WIDTH, DOOR_HEIGHT, 0.08))),
                MeshMaterial3d(palette.door.clone()),
                Transform::from_xyz(DOOR_WIDTH / 2.0, DOOR_HEIGHT / 2.0, 0.0),
                Collider::cuboid(DOOR_WIDTH / 2.0, DOOR_HEIGHT / 2.0, 0.04),
            ));
        });

    // Trigger reaching out on both sides of the doorway
    commands.spawn((
        DoorTrigger(house),
        Transform::from_translation(door.center + Vec3::Y).with_rotation(door.rotation),
        Collider::cuboid(DOOR_WIDTH / 2.0 + 0.4, 1.0, 1.5),
        Sensor,
        ActiveEvents::COLLISION_EVENTS,
        ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
        LevelEntity,
    ));

    debug!("Built house {} at {}", def.address, center);
    house
}

/// Furnish a house. Props are children of the house, placed from its centre.
pub fn spawn_interior(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    house: Entity,
    interior: &InteriorDef,
) {
    for prop in &interior.props {
        let size = Vec3::from(prop.size);
        let mesh = meshes.add(Cuboid::new(size.x, size.y, size.z));
        let material = Palette::prop(materials, prop.color);

        commands.entity(house).with_children(|parent| {
            parent.spawn((
                Interior,
                Mesh3d(mesh),
                MeshMaterial3d(material),
                Transform::from_translation(Vec3::from(prop.offset)),
                Collider::cuboid(size.x / 2.0, size.y / 2.0, size.z / 2.0),
            ));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doorway_rotation_lines_up_with_wall() {
        let (min, max) = (Vec2::new(0.0, 0.0), Vec2::new(8.0, 6.0));
        for side in [Side::North, Side::South, Side::East, Side::West] {
            let door = doorway(min, max, side);
            assert!((door.rotation * Vec3::X).distance(door.along) < 1e-5);
        }
    }

    #[test]
    fn doors_swing_into_the_room() {
        let (min, max) = (Vec2::new(0.0, 0.0), Vec2::new(8.0, 6.0));
        for side in [Side::North, Side::South, Side::East, Side::West] {
            let door = doorway(min, max, side);
            let open = door.rotation * Quat::from_rotation_y(door.swing_sign * FRAC_PI_2);
            let panel = open * Vec3::X;
            assert!(panel.dot(side.outward()) < -0.99, "{side:?} door swings outward");
        }
    }
}
