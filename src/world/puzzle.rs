//! Door puzzle progression.
//!
//! The street starts as a tutorial: every house opened for the first time
//! gets furnished, and once all four are open the order clue is shuffled and
//! the fences come down. Walking out of the final house starts the real
//! attempt, where the houses must be opened in clue order.

use bevy::prelude::*;
use rand::Rng;
use std::ops::DerefMut;

use super::house::House;

/// Number of houses the puzzle is played with.
pub const PUZZLE_HOUSES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PuzzleStage {
    #[default]
    Tutorial,
    FindCombo,
    UseCombo,
    Complete,
}

/// Things the puzzle wants done to the world.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleEffect {
    /// Furnish a house with interior number `interior`.
    LoadInterior { house: Entity, interior: usize },
    /// The one house left unopened starts singing.
    StartSinging { house: Entity },
    /// The clue is shuffled and the tutorial fences come down.
    FindComboStarted,
    /// Every house was reset.
    DoorsClosed,
    ClearInteriors,
    /// No enemy is left on the street; bring one back.
    RespawnEnemy,
    Completed,
}

#[derive(Resource, Debug, Clone)]
pub struct PuzzleProgress {
    stage: PuzzleStage,
    opened: usize,
    correct_order: bool,
    combo: Vec<u32>,
}

impl PuzzleProgress {
    pub fn new(combo: Vec<u32>) -> Self {
        Self {
            stage: PuzzleStage::Tutorial,
            opened: 0,
            correct_order: true,
            combo,
        }
    }

    pub fn stage(&self) -> PuzzleStage {
        self.stage
    }

    pub fn opened(&self) -> usize {
        self.opened
    }

    pub fn correct_order(&self) -> bool {
        self.correct_order
    }

    /// Addresses in the order they must be opened.
    pub fn combo(&self) -> &[u32] {
        &self.combo
    }

    /// A house door was opened for the first time since the last reset.
    pub fn first_opening<H: DerefMut<Target = House>>(
        &mut self,
        house: Entity,
        houses: &mut [(Entity, H)],
        rng: &mut impl Rng,
    ) -> Vec<PuzzleEffect> {
        if self.stage == PuzzleStage::UseCombo {
            self.door_opened(house, houses, rng)
        } else {
            self.load_interior(house, houses, rng)
        }
    }

    fn load_interior<H: DerefMut<Target = House>>(
        &mut self,
        house: Entity,
        houses: &mut [(Entity, H)],
        rng: &mut impl Rng,
    ) -> Vec<PuzzleEffect> {
        if self.stage == PuzzleStage::UseCombo && self.opened == PUZZLE_HOUSES - 1 {
            info!("Final door opened in order");
            self.stage = PuzzleStage::Complete;
            return vec![PuzzleEffect::Completed];
        }

        let mut effects = vec![PuzzleEffect::LoadInterior {
            house,
            interior: self.opened,
        }];
        self.opened += 1;

        if self.opened == PUZZLE_HOUSES - 1 && self.correct_order {
            effects.extend(
                houses
                    .iter()
                    .filter(|(_, h)| !h.has_opened && !h.is_final)
                    .map(|(entity, _)| PuzzleEffect::StartSinging { house: *entity }),
            );
        } else if self.opened == PUZZLE_HOUSES && self.stage == PuzzleStage::Tutorial {
            self.begin_find_combo(rng);
            effects.push(PuzzleEffect::FindComboStarted);
        }
        effects
    }

    fn door_opened<H: DerefMut<Target = House>>(
        &mut self,
        house: Entity,
        houses: &mut [(Entity, H)],
        rng: &mut impl Rng,
    ) -> Vec<PuzzleEffect> {
        let address = houses
            .iter()
            .find(|(entity, _)| *entity == house)
            .map(|(_, h)| h.address);

        let mut effects = Vec::new();
        if address.is_some() && self.combo.get(self.opened).copied() == address {
            effects = self.load_interior(house, houses, rng);
        } else {
            self.correct_order = false;
            self.opened += 1;
        }

        if self.opened == PUZZLE_HOUSES - 1 {
            for (_, h) in houses.iter_mut().filter(|(_, h)| !h.has_opened && !h.is_final) {
                if self.correct_order {
                    h.unlock();
                } else {
                    h.lock();
                }
            }
            debug!("Three doors opened, order correct: {}", self.correct_order);
        }
        effects
    }

    /// Close and reset every house and start counting from zero.
    pub fn close_all_doors<H: DerefMut<Target = House>>(
        &mut self,
        houses: &mut [(Entity, H)],
        enemies_alive: bool,
    ) -> Vec<PuzzleEffect> {
        for (_, h) in houses.iter_mut().filter(|(_, h)| !h.is_final) {
            h.reset();
        }
        self.opened = 0;
        self.correct_order = true;

        let mut effects = vec![PuzzleEffect::DoorsClosed, PuzzleEffect::ClearInteriors];
        if !enemies_alive {
            effects.push(PuzzleEffect::RespawnEnemy);
        }
        effects
    }

    /// The player left the final house with the clue in mind.
    ///
    /// Ignored during the tutorial, when the clue has not been dealt yet.
    pub fn begin_use_combo<H: DerefMut<Target = House>>(
        &mut self,
        houses: &mut [(Entity, H)],
        enemies_alive: bool,
    ) -> Vec<PuzzleEffect> {
        match self.stage {
            PuzzleStage::FindCombo | PuzzleStage::UseCombo => {
                let effects = self.close_all_doors(houses, enemies_alive);
                if self.stage != PuzzleStage::UseCombo {
                    info!("Puzzle stage: UseCombo");
                }
                self.stage = PuzzleStage::UseCombo;
                effects
            }
            PuzzleStage::Tutorial | PuzzleStage::Complete => Vec::new(),
        }
    }

    fn begin_find_combo(&mut self, rng: &mut impl Rng) {
        shuffle(&mut self.combo, rng);
        self.stage = PuzzleStage::FindCombo;
        info!("Puzzle stage: FindCombo, order {:?}", self.combo);
    }
}

/// Fisher-Yates, each slot swapped with one at or after it.
pub fn shuffle<T>(items: &mut [T], rng: &mut impl Rng) {
    for t in 0..items.len() {
        let r = rng.gen_range(t..items.len());
        items.swap(t, r);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::house::{DoorOutcome, Footprint};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ADDRESSES: [u32; 4] = [13, 11, 21, 33];

    struct Street {
        houses: Vec<(Entity, House)>,
        progress: PuzzleProgress,
        rng: StdRng,
    }

    impl Street {
        fn new() -> Self {
            let footprint = Footprint::new([(0.0, 0.0), (1.0, 1.0), (0.0, 0.0), (0.0, 0.0)]);
            let houses = ADDRESSES
                .iter()
                .enumerate()
                .map(|(i, &address)| (Entity::from_raw(i as u32), House::new(address, footprint, false)))
                .collect();
            Self {
                houses,
                progress: PuzzleProgress::new(ADDRESSES.to_vec()),
                rng: StdRng::seed_from_u64(3),
            }
        }

        fn entity(&self, address: u32) -> Entity {
            self.houses
                .iter()
                .find(|(_, h)| h.address == address)
                .map(|(e, _)| *e)
                .unwrap()
        }

        fn house(&self, address: u32) -> &House {
            &self.houses.iter().find(|(_, h)| h.address == address).unwrap().1
        }

        /// Click a door open, like the player would.
        fn open(&mut self, address: u32) -> Vec<PuzzleEffect> {
            let entity = self.entity(address);
            let outcome = self
                .houses
                .iter_mut()
                .find(|(e, _)| *e == entity)
                .unwrap()
                .1
                .open_door();

            let mut view: Vec<(Entity, &mut House)> =
                self.houses.iter_mut().map(|(e, h)| (*e, h)).collect();
            match outcome {
                DoorOutcome::FirstOpening => {
                    self.progress.first_opening(entity, &mut view, &mut self.rng)
                }
                DoorOutcome::Locked => self.progress.close_all_doors(&mut view, true),
                DoorOutcome::Opened => Vec::new(),
            }
        }

        fn leave_final_house(&mut self) -> Vec<PuzzleEffect> {
            let mut view: Vec<(Entity, &mut House)> =
                self.houses.iter_mut().map(|(e, h)| (*e, h)).collect();
            self.progress.begin_use_combo(&mut view, true)
        }

        fn finish_tutorial(&mut self) {
            for address in ADDRESSES {
                self.open(address);
            }
        }
    }

    #[test]
    fn tutorial_furnishes_houses_in_turn() {
        let mut street = Street::new();
        let effects = street.open(21);
        assert_eq!(
            effects,
            vec![PuzzleEffect::LoadInterior { house: street.entity(21), interior: 0 }]
        );

        let effects = street.open(13);
        assert!(matches!(effects[0], PuzzleEffect::LoadInterior { interior: 1, .. }));
        assert_eq!(street.progress.opened(), 2);
    }

    #[test]
    fn third_opening_makes_the_last_house_sing() {
        let mut street = Street::new();
        street.open(13);
        street.open(11);
        let effects = street.open(21);
        assert!(effects.contains(&PuzzleEffect::StartSinging { house: street.entity(33) }));
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn fourth_opening_deals_the_clue() {
        let mut street = Street::new();
        street.finish_tutorial();
        assert_eq!(street.progress.stage(), PuzzleStage::FindCombo);

        let mut combo = street.progress.combo().to_vec();
        combo.sort_unstable();
        assert_eq!(combo, vec![11, 13, 21, 33]);
    }

    #[test]
    fn reopening_does_not_advance() {
        let mut street = Street::new();
        street.open(13);
        street.houses[0].1.close_door();
        assert!(street.open(13).is_empty());
        assert_eq!(street.progress.opened(), 1);
    }

    #[test]
    fn leaving_final_house_during_tutorial_is_ignored() {
        let mut street = Street::new();
        street.open(13);
        assert!(street.leave_final_house().is_empty());
        assert_eq!(street.progress.stage(), PuzzleStage::Tutorial);
        assert!(street.house(13).has_opened);
    }

    #[test]
    fn correct_order_unlocks_and_completes() {
        let mut street = Street::new();
        street.finish_tutorial();
        let effects = street.leave_final_house();
        assert!(effects.contains(&PuzzleEffect::DoorsClosed));
        assert_eq!(street.progress.stage(), PuzzleStage::UseCombo);
        assert!(ADDRESSES.iter().all(|&a| !street.house(a).has_opened));

        let combo = street.progress.combo().to_vec();
        for (i, &address) in combo.iter().take(3).enumerate() {
            let effects = street.open(address);
            assert!(matches!(effects[0], PuzzleEffect::LoadInterior { interior, .. } if interior == i));
        }
        assert!(!street.house(combo[3]).door_locked);

        let effects = street.open(combo[3]);
        assert_eq!(effects, vec![PuzzleEffect::Completed]);
        assert_eq!(street.progress.stage(), PuzzleStage::Complete);
    }

    #[test]
    fn wrong_order_locks_the_last_house_and_resets() {
        let mut street = Street::new();
        street.finish_tutorial();
        street.leave_final_house();

        let combo = street.progress.combo().to_vec();
        // Swap the first two
        assert!(street.open(combo[1]).is_empty());
        assert!(!street.progress.correct_order());
        street.open(combo[0]);
        street.open(combo[2]);
        assert_eq!(street.progress.opened(), 3);
        assert!(street.house(combo[3]).door_locked);

        let effects = street.open(combo[3]);
        assert!(effects.contains(&PuzzleEffect::DoorsClosed));
        assert!(!effects.contains(&PuzzleEffect::RespawnEnemy));
        assert_eq!(street.progress.opened(), 0);
        assert!(street.progress.correct_order());
        assert_eq!(street.progress.stage(), PuzzleStage::UseCombo);
        assert!(ADDRESSES.iter().all(|&a| !street.house(a).door_locked));
    }

    #[test]
    fn reset_brings_back_a_missing_enemy() {
        let mut street = Street::new();
        let mut view: Vec<(Entity, &mut House)> =
            street.houses.iter_mut().map(|(e, h)| (*e, h)).collect();
        let effects = street.progress.close_all_doors(&mut view, false);
        assert!(effects.contains(&PuzzleEffect::RespawnEnemy));
    }

    #[test]
    fn shuffle_keeps_every_item() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut items: Vec<u32> = (0..10).collect();
        shuffle(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());
    }
}
