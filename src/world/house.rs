//! Houses, their footprints, and their doors.

use bevy::prelude::*;

/// Ground area covered by a house, as two rectangles on the x/z plane.
///
/// Each rectangle is given by two opposite corners in any order. The main
/// room (`corners[0]`, `corners[1]`) is tested with one unit of slack on
/// every side so standing in the wall counts; the annex (`corners[2]`,
/// `corners[3]`) is tested exactly. All comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub corners: [Vec2; 4],
}

const ROOM_SLACK: f32 = 1.0;

fn strictly_between(value: f32, a: f32, b: f32, slack: f32) -> bool {
    (a - slack < value && value < b + slack) || (b - slack < value && value < a + slack)
}

impl Footprint {
    pub fn new(corners: [(f32, f32); 4]) -> Self {
        Self {
            corners: corners.map(|(x, z)| Vec2::new(x, z)),
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        let [c0, c1, c2, c3] = self.corners;

        let in_room = strictly_between(point.x, c0.x, c1.x, ROOM_SLACK)
            && strictly_between(point.z, c0.y, c1.y, ROOM_SLACK);
        let in_annex = strictly_between(point.x, c2.x, c3.x, 0.0)
            && strictly_between(point.z, c2.y, c3.y, 0.0);

        in_room || in_annex
    }

    /// Ground to keep out of so a body `clearance` wide never counts as
    /// inside: the slackened room and the porch.
    pub fn keep_out(&self, clearance: f32) -> [Rect; 2] {
        let [c0, c1, c2, c3] = self.corners;
        [
            Rect::from_corners(c0, c1).inflate(ROOM_SLACK + clearance),
            Rect::from_corners(c2, c3).inflate(clearance),
        ]
    }
}

/// What happened when someone tried the door.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorOutcome {
    /// The door was locked. It is unlocked now but stays shut.
    Locked,
    /// Opened for the first time since the last reset.
    FirstOpening,
    Opened,
}

/// A house on the street.
#[derive(Component, Debug, Clone)]
pub struct House {
    pub address: u32,
    pub footprint: Footprint,
    pub door_open: bool,
    pub door_locked: bool,
    pub has_opened: bool,
    /// The house holding the clue. It never takes part in the door puzzle.
    pub is_final: bool,
}

impl House {
    pub fn new(address: u32, footprint: Footprint, is_final: bool) -> Self {
        Self {
            address,
            footprint,
            door_open: false,
            door_locked: false,
            has_opened: false,
            is_final,
        }
    }

    pub fn open_door(&mut self) -> DoorOutcome {
        if self.door_locked {
            self.door_locked = false;
            return DoorOutcome::Locked;
        }

        self.door_open = true;
        if !self.has_opened && !self.is_final {
            self.has_opened = true;
            DoorOutcome::FirstOpening
        } else {
            DoorOutcome::Opened
        }
    }

    pub fn close_door(&mut self) {
        self.door_open = false;
    }

    pub fn lock(&mut self) {
        self.door_locked = true;
    }

    pub fn unlock(&mut self) {
        self.door_locked = false;
    }

    /// Forget everything the puzzle did to this house.
    pub fn reset(&mut self) {
        self.has_opened = false;
        self.door_locked = false;
        self.door_open = false;
    }

    /// What clicking would do right now.
    pub fn prompt(&self) -> &'static str {
        if self.door_open {
            "Click to close door."
        } else if self.door_locked {
            "This door is locked. Click to Reset."
        } else {
            "Click to open door."
        }
    }
}

/// Swinging door panel belonging to a house.
#[derive(Component, Debug, Clone)]
pub struct Door {
    pub house: Entity,
    pub closed_rotation: Quat,
    /// Current swing, 0 = shut, 1 = fully open.
    pub swing: f32,
    /// Which way round the hinge opens into the room.
    pub swing_sign: f32,
}

impl Door {
    /// Move the swing towards open or shut, `rate` per second.
    pub fn advance(&mut self, open: bool, rate: f32, dt: f32) -> Quat {
        let target = if open { 1.0 } else { 0.0 };
        let step = rate * dt;
        self.swing += (target - self.swing).clamp(-step, step);
        self.closed_rotation * Quat::from_rotation_y(self.swing_sign * self.swing * std::f32::consts::FRAC_PI_2)
    }
}

/// Sensor on both sides of a doorway.
#[derive(Component, Debug, Clone, Copy)]
pub struct DoorTrigger(pub Entity);

/// Furniture loaded into a house as the puzzle advances.
#[derive(Component)]
pub struct Interior;
