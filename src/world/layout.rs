//! Level layout data (assets/data/level.ron).

use bevy::prelude::*;
use serde::Deserialize;

use super::error::LayoutError;
use super::house::Footprint;
use super::puzzle::PUZZLE_HOUSES;
use crate::enemies::WalkableRegion;

/// Wall of a house the door sits in. North is towards -Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Side {
    North,
    South,
    East,
    West,
}

impl Side {
    /// Unit vector pointing out of the house through this wall.
    pub fn outward(self) -> Vec3 {
        match self {
            Side::North => Vec3::NEG_Z,
            Side::South => Vec3::Z,
            Side::East => Vec3::X,
            Side::West => Vec3::NEG_X,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HouseDef {
    pub address: u32,
    #[serde(default)]
    pub is_final: bool,
    /// Opposite corners of the main room.
    pub room: [(f32, f32); 2],
    /// Opposite corners of the porch in front of the door.
    pub porch: [(f32, f32); 2],
    pub door: Side,
}

impl HouseDef {
    pub fn footprint(&self) -> Footprint {
        Footprint::new([self.room[0], self.room[1], self.porch[0], self.porch[1]])
    }
}

/// A straight wall segment between two points on the ground.
#[derive(Debug, Clone, Deserialize)]
pub struct WallDef {
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub height: f32,
}

/// One box of furniture, placed relative to the room centre.
#[derive(Debug, Clone, Deserialize)]
pub struct PropDef {
    pub offset: (f32, f32, f32),
    pub size: (f32, f32, f32),
    pub color: (f32, f32, f32),
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteriorDef {
    pub props: Vec<PropDef>,
}

#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LevelLayout {
    pub ground_min: (f32, f32),
    pub ground_max: (f32, f32),
    pub player_spawn: (f32, f32, f32),
    /// Facing of the player at spawn, in degrees about +Y.
    pub player_yaw: f32,
    pub enemy_spawns: Vec<(f32, f32, f32)>,
    /// Where an enemy comes back when a puzzle reset finds none alive.
    pub enemy_respawn: (f32, f32, f32),
    pub houses: Vec<HouseDef>,
    pub walkable: Vec<WalkableRegion>,
    /// Fences that fall once the tutorial is over.
    pub tutorial_fences: Vec<WallDef>,
    /// Fences around the edge of the street.
    pub boundary: Vec<WallDef>,
    /// Furniture for the first, second, third and fourth house opened.
    pub interiors: Vec<InteriorDef>,
    /// Door order before shuffling.
    pub combo: Vec<u32>,
    pub street_lamps: Vec<(f32, f32, f32)>,
    pub ambient_brightness: f32,
}

impl LevelLayout {
    /// Check the layout can host the door puzzle.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut addresses: Vec<u32> = self
            .houses
            .iter()
            .filter(|house| !house.is_final)
            .map(|house| house.address)
            .collect();

        if addresses.len() != PUZZLE_HOUSES {
            return Err(LayoutError::HouseCount {
                expected: PUZZLE_HOUSES,
                found: addresses.len(),
            });
        }
        if !self.houses.iter().any(|house| house.is_final) {
            return Err(LayoutError::NoFinalHouse);
        }

        addresses.sort_unstable();
        if let Some(pair) = addresses.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(LayoutError::DuplicateAddress(pair[0]));
        }

        let mut combo = self.combo.clone();
        combo.sort_unstable();
        if combo != addresses {
            return Err(LayoutError::ComboMismatch {
                combo: self.combo.clone(),
                addresses,
            });
        }
        Ok(())
    }

    pub fn player_spawn(&self) -> Vec3 {
        Vec3::from(self.player_spawn)
    }

    pub fn enemy_respawn(&self) -> Vec3 {
        Vec3::from(self.enemy_respawn)
    }
}

fn furniture(props: &[((f32, f32, f32), (f32, f32, f32))]) -> InteriorDef {
    let wood = (0.25, 0.18, 0.12);
    InteriorDef {
        props: props
            .iter()
            .map(|&(offset, size)| PropDef { offset, size, color: wood })
            .collect(),
    }
}

fn fence(from: (f32, f32), to: (f32, f32)) -> WallDef {
    WallDef { from, to, height: 2.0 }
}

impl Default for LevelLayout {
    fn default() -> Self {
        let house = |address, room, porch, door| HouseDef {
            address,
            is_final: false,
            room,
            porch,
            door,
        };

        Self {
            ground_min: (66.0, 86.0),
            ground_max: (144.0, 154.0),
            player_spawn: (100.0, 1.2, 120.0),
            player_yaw: 90.0,
            enemy_spawns: vec![(74.0, 0.0, 120.0)],
            enemy_respawn: (119.0, 1.0, 121.0),
            houses: vec![
                house(13, [(90.0, 100.0), (98.0, 106.0)], [(92.0, 106.0), (96.0, 108.0)], Side::South),
                house(11, [(104.0, 100.0), (112.0, 106.0)], [(106.0, 106.0), (110.0, 108.0)], Side::South),
                house(21, [(90.0, 134.0), (98.0, 140.0)], [(92.0, 132.0), (96.0, 134.0)], Side::North),
                house(33, [(104.0, 134.0), (112.0, 140.0)], [(106.0, 132.0), (110.0, 134.0)], Side::North),
                HouseDef {
                    address: 0,
                    is_final: true,
                    room: [(132.0, 116.0), (138.0, 124.0)],
                    porch: [(130.0, 118.0), (132.0, 122.0)],
                    door: Side::West,
                },
            ],
            walkable: vec![WalkableRegion {
                min: (67.0, 87.0),
                max: (143.0, 153.0),
                floor: 0.0,
            }],
            tutorial_fences: vec![fence((122.0, 86.0), (122.0, 154.0))],
            boundary: vec![
                fence((66.0, 86.0), (144.0, 86.0)),
                fence((144.0, 86.0), (144.0, 154.0)),
                fence((144.0, 154.0), (66.0, 154.0)),
                fence((66.0, 154.0), (66.0, 86.0)),
            ],
            interiors: vec![
                furniture(&[((0.0, 0.4, 0.0), (1.6, 0.8, 0.9))]),
                furniture(&[
                    ((-1.5, 0.4, 0.5), (1.2, 0.8, 0.8)),
                    ((-0.5, 0.25, 0.5), (0.5, 0.5, 0.5)),
                ]),
                furniture(&[((2.0, 0.3, -1.5), (2.0, 0.6, 1.0)), ((-2.5, 0.9, -2.5), (1.0, 1.8, 0.5))]),
                furniture(&[
                    ((0.0, 0.5, -2.5), (3.0, 1.0, 0.5)),
                    ((-2.5, 0.3, 1.0), (0.6, 0.6, 0.6)),
                    ((2.5, 0.3, 1.0), (0.6, 0.6, 0.6)),
                ]),
            ],
            combo: vec![13, 11, 21, 33],
            street_lamps: vec![(84.0, 3.5, 120.0), (118.0, 3.5, 120.0)],
            ambient_brightness: 15.0,
        }
    }
}
