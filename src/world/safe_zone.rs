//! Whether the player is hiding somewhere enemies leave them alone.

use bevy::prelude::*;

use super::house::House;
use crate::enemies::Enemy;
use crate::player::Player;

/// Published once per tick for everything that reads it.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SafeZone(pub bool);

/// The player is safe inside the first closed house they stand in, as long
/// as no enemy stands in that same house.
///
/// Houses are tried in the order given and the search stops at the first
/// closed house containing the player, even when an enemy spoils it.
pub fn is_player_safe<'a>(
    player: Vec3,
    houses: impl IntoIterator<Item = &'a House>,
    enemies: &[Vec3],
) -> bool {
    houses
        .into_iter()
        .filter(|house| !house.is_final)
        .find(|house| !house.door_open && house.footprint.contains(player))
        .is_some_and(|house| !enemies.iter().any(|&enemy| house.footprint.contains(enemy)))
}

pub fn update_safe_zone(
    players: Query<&GlobalTransform, With<Player>>,
    houses: Query<&House>,
    enemies: Query<&GlobalTransform, With<Enemy>>,
    mut zone: ResMut<SafeZone>,
) {
    let Ok(player) = players.get_single() else {
        zone.0 = false;
        return;
    };

    let mut ordered: Vec<&House> = houses.iter().collect();
    ordered.sort_by_key(|house| house.address);
    let enemy_positions: Vec<Vec3> = enemies.iter().map(GlobalTransform::translation).collect();

    let safe = is_player_safe(player.translation(), ordered, &enemy_positions);
    if safe != zone.0 {
        debug!("Player safe: {}", safe);
        zone.0 = safe;
    }
}
