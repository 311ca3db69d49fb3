//! Enemy behaviour core.
//!
//! [`EnemyBrain`] is the per-enemy state machine. It reads a snapshot of the
//! world each tick, steers its [`NavAgent`], and reports what the rest of the
//! game should do about it through [`Reactions`]. It never touches Bevy
//! resources itself, so the whole machine can be stepped in plain tests.

use bevy::prelude::*;
use rand::Rng;
use std::time::Duration;

use super::navigation::{NavAgent, NavMesh};
use super::sequences::{AttackSequence, FlickerSequence, FootstepCadence};
use crate::core::{Cue, EnemyTuning, NavigationError};

/// What the enemy is currently after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChaseTarget {
    #[default]
    Nothing,
    Light,
    Player,
}

/// Phase of an attack run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPhase {
    Stare,
    Pursue,
}

/// Externally observable behaviour state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorState {
    Idle,
    ChaseLight,
    /// `None` once the attack run ended but nothing has reset the target yet.
    ChasePlayer(Option<AttackPhase>),
    Killing,
}

/// Everything an enemy needs to know about the world for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surroundings {
    pub player_safe: bool,
    pub light_on: bool,
    pub beam_target: Vec3,
    pub player_position: Vec3,
    pub camera_forward: Vec3,
    /// Where the short look ray from the camera hit, if anywhere.
    pub look_hit: Option<Vec3>,
}

/// Collaborators shared by every enemy.
pub struct Environment<'a, N: NavMesh> {
    pub tuning: &'a EnemyTuning,
    pub nav: &'a N,
}

/// Side effects requested by the brain for this tick.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Reactions {
    /// Animation cues, in order.
    pub cues: Vec<Cue>,
    /// Play one footstep.
    pub footstep: bool,
    /// Snap the enemy to face this point.
    pub face: Option<Vec3>,
    /// Flashlight toggle requests.
    pub flashlight_toggles: u32,
    /// The kill just began: freeze the player, stop the song, disable colliders.
    pub kill_started: bool,
}

/// Per-enemy behaviour state machine.
#[derive(Component, Debug, Default)]
pub struct EnemyBrain {
    chase: ChaseTarget,
    killing: bool,
    attack: Option<AttackSequence>,
    flicker: Option<FlickerSequence>,
    footsteps: FootstepCadence,
    last_cue: Option<Cue>,
}

impl EnemyBrain {
    pub fn is_killing(&self) -> bool {
        self.killing
    }

    pub fn footstep_loop_active(&self) -> bool {
        self.footsteps.is_active()
    }

    pub fn flicker_in_progress(&self) -> bool {
        self.flicker.as_ref().is_some_and(|f| !f.is_finished())
    }

    pub fn attack(&self) -> Option<&AttackSequence> {
        self.attack.as_ref()
    }

    pub fn state(&self) -> BehaviorState {
        if self.killing {
            return BehaviorState::Killing;
        }
        match self.chase {
            ChaseTarget::Nothing => BehaviorState::Idle,
            ChaseTarget::Light => BehaviorState::ChaseLight,
            ChaseTarget::Player => BehaviorState::ChasePlayer(self.attack.as_ref().map(|a| {
                if a.is_staring() {
                    AttackPhase::Stare
                } else {
                    AttackPhase::Pursue
                }
            })),
        }
    }

    /// Run one simulation tick.
    pub fn update<N: NavMesh>(
        &mut self,
        dt: Duration,
        position: Vec3,
        world: &Surroundings,
        agent: &mut NavAgent,
        env: &Environment<N>,
        rng: &mut impl Rng,
    ) -> Reactions {
        let tuning = env.tuning;
        let mut out = Reactions::default();
        let speed = agent.speed_magnitude();

        // The cadence runs on its own clock, whatever the rules below decide.
        if self.footsteps.advance(dt, speed) && !self.killing {
            out.footstep = true;
        }

        if self.killing {
            self.hold_for_kill(position, world, agent, &mut out);
            if let Some(flicker) = self.flicker.as_mut() {
                if flicker.advance(dt) {
                    out.flashlight_toggles += 1;
                }
            }
            return out;
        }

        // Safe zone always wins
        if world.player_safe {
            self.attack = None;
            self.go_idle(agent, &mut out);
            return out;
        }

        agent.speed = if self.chase == ChaseTarget::Player {
            tuning.chase_speed
        } else {
            tuning.walk_speed
        };

        if !self.footsteps.is_active()
            && self.chase != ChaseTarget::Nothing
            && 1.0 / speed < tuning.footstep_threshold
        {
            out.footstep |= self.footsteps.start(speed);
        }

        if world.light_on && self.chase != ChaseTarget::Player {
            self.chase_light(world, agent, env, &mut out);
        }

        if !world.light_on && position.distance(agent.destination) < tuning.goal_threshold {
            self.go_idle(agent, &mut out);
        }

        if position.distance(world.player_position) > tuning.leash_distance {
            match behind_player(world, env, rng) {
                Ok(point) => {
                    debug!("Leashing enemy from {} to {}", position, point);
                    agent.warp(point);
                }
                Err(e) => debug!("Leash skipped: {}", e),
            }
        }

        if world.light_on {
            let caught = world
                .look_hit
                .is_some_and(|hit| position.distance(hit) < tuning.catch_radius);
            if caught {
                self.begin_attack(position, agent, tuning, rng, &mut out);
            }
        }

        self.advance_attack(dt, position, world, agent, env, &mut out);
        out
    }

    /// The flashlight cone struck this enemy.
    pub fn hit_by_light(
        &mut self,
        position: Vec3,
        player_safe: bool,
        agent: &mut NavAgent,
        tuning: &EnemyTuning,
        rng: &mut impl Rng,
    ) -> Reactions {
        let mut out = Reactions::default();
        if self.killing {
            return out;
        }

        if player_safe {
            // Stop and stare from outside the house
            self.go_idle(agent, &mut out);
        } else {
            self.begin_attack(position, agent, tuning, rng, &mut out);
        }
        out
    }

    /// This enemy physically touched the player.
    pub fn touched_player<N: NavMesh>(
        &mut self,
        position: Vec3,
        world: &Surroundings,
        agent: &mut NavAgent,
        env: &Environment<N>,
        rng: &mut impl Rng,
    ) -> Reactions {
        let mut out = Reactions::default();
        if self.killing {
            return out;
        }

        if self.chase == ChaseTarget::Player {
            self.start_kill(position, world, agent, env.tuning, &mut out);
            return out;
        }

        // Bumping into the player while pathing leaves the agent confused.
        // Put it back somewhere behind them instead.
        match behind_player(world, env, rng) {
            Ok(point) => {
                debug!("Enemy bumped the player, relocating to {}", point);
                agent.warp(point);
            }
            Err(e) => debug!("Relocation skipped: {}", e),
        }
        out
    }

    /// The flashlight dropped this enemy into the beam.
    pub fn teleported_ahead(
        &mut self,
        position: Vec3,
        agent: &mut NavAgent,
        tuning: &EnemyTuning,
        rng: &mut impl Rng,
    ) -> Reactions {
        let mut out = Reactions::default();
        if !self.killing {
            self.begin_attack(position, agent, tuning, rng, &mut out);
        }
        out
    }

    fn cue(&mut self, cue: Cue, out: &mut Reactions) {
        if self.last_cue != Some(cue) {
            self.last_cue = Some(cue);
            out.cues.push(cue);
        }
    }

    fn go_idle(&mut self, agent: &mut NavAgent, out: &mut Reactions) {
        agent.stop();
        agent.frozen = true;
        self.cue(Cue::Idle, out);
        self.chase = ChaseTarget::Nothing;
    }

    fn chase_light<N: NavMesh>(
        &mut self,
        world: &Surroundings,
        agent: &mut NavAgent,
        env: &Environment<N>,
        out: &mut Reactions,
    ) {
        self.chase = ChaseTarget::Light;
        agent.resume();
        agent.frozen = false;
        self.cue(Cue::Run, out);

        // The origin means "no beam target yet"
        if world.beam_target == Vec3::ZERO {
            return;
        }
        match env.nav.sample_point(world.beam_target, env.tuning.sample_radius) {
            Ok(point) => agent.set_destination(point),
            Err(e) => debug!("Beam target unreachable: {}", e),
        }
    }

    fn begin_attack(
        &mut self,
        position: Vec3,
        agent: &mut NavAgent,
        tuning: &EnemyTuning,
        rng: &mut impl Rng,
        out: &mut Reactions,
    ) {
        if self.attack.is_some() {
            return;
        }

        // Deer in headlights
        if self.chase != ChaseTarget::Player {
            self.cue(Cue::Idle, out);
            agent.frozen = true;
            agent.halt();
            agent.set_destination(position);
            self.chase = ChaseTarget::Player;
        }

        let (shortest, longest) = tuning.stare_seconds;
        let stare = if longest > shortest {
            rng.gen_range(shortest..longest)
        } else {
            shortest
        };
        debug!("Enemy caught in the light, staring for {:.2}s", stare);
        self.attack = Some(AttackSequence::stare(stare));
    }

    fn advance_attack<N: NavMesh>(
        &mut self,
        dt: Duration,
        position: Vec3,
        world: &Surroundings,
        agent: &mut NavAgent,
        env: &Environment<N>,
        out: &mut Reactions,
    ) {
        let Some(attack) = self.attack.as_mut() else {
            return;
        };

        if let AttackSequence::Stare { timer } = attack {
            out.face = Some(world.player_position);
            timer.tick(dt);
            if !timer.finished() {
                return;
            }

            *attack = AttackSequence::Pursue;
            self.chase = ChaseTarget::Player;
            agent.resume();
            agent.frozen = false;
            agent.set_destination(pursuit_point(position, world, env));
            self.cue(Cue::Run, out);
        }

        if world.light_on {
            agent.set_destination(pursuit_point(position, world, env));
        } else {
            self.attack = None;
        }
    }

    fn start_kill(
        &mut self,
        position: Vec3,
        world: &Surroundings,
        agent: &mut NavAgent,
        tuning: &EnemyTuning,
        out: &mut Reactions,
    ) {
        info!("Enemy caught the player");
        self.killing = true;
        self.attack = None;
        out.kill_started = true;
        self.cue(Cue::Kill, out);

        if !world.light_on {
            out.flashlight_toggles += 1;
        }
        self.flicker = Some(FlickerSequence::new(&tuning.flicker_delays));

        self.hold_for_kill(position, world, agent, out);
    }

    /// Perpetual freeze while the kill plays out. Overrides navigation.
    fn hold_for_kill(
        &self,
        position: Vec3,
        world: &Surroundings,
        agent: &mut NavAgent,
        out: &mut Reactions,
    ) {
        agent.stop();
        agent.halt();
        agent.frozen = true;
        agent.set_destination(position);
        out.face = Some(world.player_position);
    }
}

/// The player's feet, snapped onto walkable ground.
fn pursuit_point<N: NavMesh>(position: Vec3, world: &Surroundings, env: &Environment<N>) -> Vec3 {
    let player = world.player_position;
    env.nav
        .sample_point(player, env.tuning.sample_radius)
        .unwrap_or(Vec3::new(player.x, position.y, player.z))
}

/// Navigable point roughly behind the player, out of direct view.
///
/// The camera forward is turned about world up by a random whole-degree
/// angle from the tuning range, then pushed out to the respawn distance.
pub fn behind_player<N: NavMesh>(
    world: &Surroundings,
    env: &Environment<N>,
    rng: &mut impl Rng,
) -> Result<Vec3, NavigationError> {
    let tuning = env.tuning;
    if world.player_position.y <= tuning.min_player_height {
        return Err(NavigationError::BelowMap {
            height: world.player_position.y,
            floor: tuning.min_player_height,
        });
    }

    let (low, high) = tuning.respawn_angle_degrees;
    let degrees = if high > low { rng.gen_range(low..high) } else { low };
    let direction = Quat::from_axis_angle(Vec3::Y, (degrees as f32).to_radians())
        * world.camera_forward.normalize_or_zero();

    env.nav.sample_point(
        world.player_position + tuning.respawn_distance * direction,
        tuning.sample_radius,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::navigation::{WalkableArea, WalkableRegion};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TICK: f32 = 0.02;

    fn tick() -> Duration {
        Duration::from_secs_f32(TICK)
    }

    fn field() -> WalkableArea {
        WalkableArea::new(vec![WalkableRegion {
            min: (-500.0, -500.0),
            max: (500.0, 500.0),
            floor: 0.0,
        }])
    }

    fn dark_world() -> Surroundings {
        Surroundings {
            player_safe: false,
            light_on: false,
            beam_target: Vec3::ZERO,
            player_position: Vec3::new(0.0, 0.0, 0.0),
            camera_forward: Vec3::NEG_Z,
            look_hit: None,
        }
    }

    fn lit_world() -> Surroundings {
        Surroundings {
            light_on: true,
            beam_target: Vec3::new(0.0, 0.0, -8.0),
            ..dark_world()
        }
    }

    struct Rig {
        brain: EnemyBrain,
        agent: NavAgent,
        position: Vec3,
        tuning: EnemyTuning,
        nav: WalkableArea,
        rng: StdRng,
    }

    impl Rig {
        fn at(position: Vec3) -> Self {
            Self {
                brain: EnemyBrain::default(),
                agent: NavAgent::at(position),
                position,
                tuning: EnemyTuning::default(),
                nav: field(),
                rng: StdRng::seed_from_u64(11),
            }
        }

        fn tick(&mut self, world: &Surroundings) -> Reactions {
            let env = Environment { tuning: &self.tuning, nav: &self.nav };
            let out = self.brain.update(
                tick(),
                self.position,
                world,
                &mut self.agent,
                &env,
                &mut self.rng,
            );
            self.position = self.agent.step(self.position, TICK, &self.nav);
            out
        }

        fn light_hit(&mut self, safe: bool) -> Reactions {
            self.brain
                .hit_by_light(self.position, safe, &mut self.agent, &self.tuning, &mut self.rng)
        }

        fn touch(&mut self, world: &Surroundings) -> Reactions {
            let env = Environment { tuning: &self.tuning, nav: &self.nav };
            self.brain.touched_player(self.position, world, &mut self.agent, &env, &mut self.rng)
        }
    }

    #[test]
    fn dark_enemy_at_goal_goes_idle() {
        let mut rig = Rig::at(Vec3::new(0.0, 0.0, -10.0));
        rig.tick(&lit_world());
        assert_eq!(rig.brain.state(), BehaviorState::ChaseLight);
        assert!(!rig.agent.stopped);

        // Light goes out while the enemy stands on its destination
        rig.agent.set_destination(rig.position + Vec3::new(0.5, 0.0, 0.0));
        let out = rig.tick(&dark_world());
        assert_eq!(rig.brain.state(), BehaviorState::Idle);
        assert!(rig.agent.stopped);
        assert!(out.cues.contains(&Cue::Idle));
    }

    #[test]
    fn dark_enemy_far_from_goal_keeps_walking() {
        let mut rig = Rig::at(Vec3::new(0.0, 0.0, -10.0));
        rig.tick(&lit_world());
        rig.agent.set_destination(Vec3::new(0.0, 0.0, -20.0));
        rig.tick(&dark_world());
        assert_eq!(rig.brain.state(), BehaviorState::ChaseLight);
    }

    #[test]
    fn light_pulls_enemy_to_beam_target() {
        let mut rig = Rig::at(Vec3::new(5.0, 0.0, -10.0));
        let out = rig.tick(&lit_world());
        assert_eq!(rig.agent.destination, Vec3::new(0.0, 0.0, -8.0));
        assert_eq!(out.cues, vec![Cue::Run]);
        assert_eq!(rig.agent.speed, 3.0);
    }

    #[test]
    fn origin_beam_target_is_ignored() {
        let mut rig = Rig::at(Vec3::new(5.0, 0.0, -10.0));
        let world = Surroundings { beam_target: Vec3::ZERO, ..lit_world() };
        rig.tick(&world);
        assert_eq!(rig.brain.state(), BehaviorState::ChaseLight);
        assert_eq!(rig.agent.destination, Vec3::new(5.0, 0.0, -10.0));
    }

    #[test]
    fn safe_zone_forces_idle_even_mid_attack() {
        let mut rig = Rig::at(Vec3::new(0.0, 0.0, -6.0));
        rig.light_hit(false);
        for _ in 0..100 {
            rig.tick(&lit_world());
        }
        assert_eq!(rig.brain.state(), BehaviorState::ChasePlayer(Some(AttackPhase::Pursue)));

        let safe = Surroundings { player_safe: true, ..lit_world() };
        let out = rig.tick(&safe);
        assert_eq!(rig.brain.state(), BehaviorState::Idle);
        assert!(rig.agent.stopped);
        assert!(rig.agent.frozen);
        assert!(rig.brain.attack().is_none());
        assert!(out.cues.contains(&Cue::Idle));
    }

    #[test]
    fn light_hit_in_safe_zone_only_stares() {
        let mut rig = Rig::at(Vec3::new(0.0, 0.0, -6.0));
        rig.tick(&lit_world());
        let out = rig.light_hit(true);
        assert_eq!(rig.brain.state(), BehaviorState::Idle);
        assert!(rig.brain.attack().is_none());
        assert_eq!(out.cues, vec![Cue::Idle]);
    }

    #[test]
    fn stare_duration_is_within_range() {
        for seed in 0..200 {
            let mut rig = Rig::at(Vec3::new(0.0, 0.0, -6.0));
            rig.rng = StdRng::seed_from_u64(seed);
            rig.light_hit(false);
            let stare = rig.brain.attack().and_then(|a| a.stare_duration()).unwrap();
            assert!((0.5..1.5).contains(&stare), "stare of {stare}s");
        }
    }

    #[test]
    fn stare_freezes_then_pursuit_tracks_player_while_lit() {
        let mut rig = Rig::at(Vec3::new(0.0, 0.0, -12.0));
        let out = rig.light_hit(false);
        assert_eq!(out.cues, vec![Cue::Idle]);
        assert_eq!(rig.brain.state(), BehaviorState::ChasePlayer(Some(AttackPhase::Stare)));
        assert_eq!(rig.agent.destination, Vec3::new(0.0, 0.0, -12.0));

        let stare = rig.brain.attack().and_then(|a| a.stare_duration()).unwrap();

        let mut world = lit_world();
        let mut ticks = 0;
        let mut ran = false;
        while rig.brain.state() == BehaviorState::ChasePlayer(Some(AttackPhase::Stare)) {
            assert!(rig.agent.frozen);
            let out = rig.tick(&world);
            assert_eq!(out.face, Some(world.player_position));
            ran |= out.cues.contains(&Cue::Run);
            ticks += 1;
            assert!(ticks < 100, "stare never ended");
        }
        assert!((ticks as f32 * TICK - stare).abs() <= TICK + 1e-4);

        // Stare ends, pursuit starts and re-targets every tick
        assert!(ran);
        assert!(!rig.agent.frozen);
        for step in 0..5 {
            world.player_position = Vec3::new(step as f32, 0.0, 0.0);
            rig.tick(&world);
            assert_eq!(rig.agent.destination, world.player_position);
            assert_eq!(rig.agent.speed, 4.0);
        }

        // Light off: no more re-targeting, still chasing the player
        let last = world.player_position;
        let mut dark = Surroundings { player_position: Vec3::new(9.0, 0.0, 9.0), ..dark_world() };
        rig.tick(&dark);
        assert_eq!(rig.agent.destination, last);
        assert_eq!(rig.brain.state(), BehaviorState::ChasePlayer(None));

        dark.player_position = Vec3::new(-9.0, 0.0, 9.0);
        rig.tick(&dark);
        assert_eq!(rig.agent.destination, last);
    }

    #[test]
    fn pursuit_runs_for_the_players_feet() {
        let mut rig = Rig::at(Vec3::new(0.0, 0.0, -6.0));
        rig.light_hit(false);
        let body = Vec3::new(0.0, 0.8, 0.0);
        let lit = Surroundings { player_position: body, ..lit_world() };
        for _ in 0..100 {
            rig.tick(&lit);
        }
        assert_eq!(rig.brain.state(), BehaviorState::ChasePlayer(Some(AttackPhase::Pursue)));
        assert_eq!(rig.agent.destination, Vec3::ZERO);

        // A unit short of the player on level ground counts as arrived
        rig.position = Vec3::new(0.0, 0.0, -1.0);
        let dark = Surroundings { player_position: body, ..dark_world() };
        rig.tick(&dark);
        assert_eq!(rig.brain.state(), BehaviorState::Idle);
    }

    #[test]
    fn repeated_light_hits_do_not_restart_the_stare() {
        let mut rig = Rig::at(Vec3::new(0.0, 0.0, -6.0));
        rig.light_hit(false);
        let first = rig.brain.attack().and_then(|a| a.stare_duration());
        rig.tick(&lit_world());
        rig.light_hit(false);
        assert_eq!(rig.brain.attack().and_then(|a| a.stare_duration()), first);
    }

    #[test]
    fn looking_at_the_ground_next_to_an_enemy_triggers_attack() {
        let mut rig = Rig::at(Vec3::new(0.0, 0.0, -2.0));
        let world = Surroundings { look_hit: Some(Vec3::new(0.5, 0.0, -1.5)), ..lit_world() };
        rig.tick(&world);
        assert!(matches!(rig.brain.state(), BehaviorState::ChasePlayer(Some(_))));
    }

    #[test]
    fn look_hit_too_far_from_enemy_is_ignored() {
        let mut rig = Rig::at(Vec3::new(0.0, 0.0, -6.0));
        let world = Surroundings { look_hit: Some(Vec3::new(0.0, 0.0, -1.5)), ..lit_world() };
        rig.tick(&world);
        assert_eq!(rig.brain.state(), BehaviorState::ChaseLight);
    }

    #[test]
    fn leash_never_fires_within_range() {
        let mut rig = Rig::at(Vec3::new(0.0, 0.0, -30.0));
        rig.brain.update(
            tick(),
            rig.position,
            &dark_world(),
            &mut rig.agent,
            &Environment { tuning: &rig.tuning, nav: &rig.nav },
            &mut rig.rng,
        );
        assert!(rig.agent.pending_warp().is_none());
    }

    #[test]
    fn leash_warps_far_enemy_behind_the_player() {
        for seed in 0..50 {
            let mut rig = Rig::at(Vec3::new(0.0, 0.0, 40.0));
            rig.rng = StdRng::seed_from_u64(seed);
            let world = dark_world();
            rig.brain.update(
                tick(),
                rig.position,
                &world,
                &mut rig.agent,
                &Environment { tuning: &rig.tuning, nav: &rig.nav },
                &mut rig.rng,
            );

            let warp = rig.agent.pending_warp().unwrap();
            let offset = warp - world.player_position;
            assert!(offset.length() <= 10.0 + 1e-4);
            let angle = offset.normalize().angle_between(world.camera_forward).to_degrees();
            assert!(angle >= 85.0 - 1e-3, "relocated only {angle} degrees off the view");
        }
    }

    #[test]
    fn leash_skipped_when_player_fell_off_the_map() {
        let mut rig = Rig::at(Vec3::new(0.0, 0.0, 40.0));
        let world = Surroundings { player_position: Vec3::new(0.0, -6.0, 0.0), ..dark_world() };
        rig.tick(&world);
        assert!(rig.agent.pending_warp().is_none());
    }

    #[test]
    fn touching_player_while_wandering_relocates() {
        let mut rig = Rig::at(Vec3::new(0.0, 0.0, -1.0));
        rig.tick(&lit_world());
        let out = rig.touch(&lit_world());
        assert!(!out.kill_started);
        assert!(rig.agent.pending_warp().is_some());
        assert_eq!(rig.brain.state(), BehaviorState::ChaseLight);
    }

    #[test]
    fn kill_runs_once() {
        let mut rig = Rig::at(Vec3::new(0.0, 0.0, -1.0));
        rig.light_hit(false);

        let first = rig.touch(&dark_world());
        assert!(first.kill_started);
        assert_eq!(first.cues, vec![Cue::Kill]);
        assert_eq!(first.flashlight_toggles, 1);
        assert!(rig.brain.flicker_in_progress());

        let second = rig.touch(&dark_world());
        assert_eq!(second, Reactions::default());
        assert_eq!(rig.brain.state(), BehaviorState::Killing);

        // Four more toggles over the flicker, then nothing
        let mut toggles = 0;
        for _ in 0..100 {
            let out = rig.tick(&lit_world());
            toggles += out.flashlight_toggles;
            assert!(rig.agent.stopped && rig.agent.frozen);
            assert_eq!(out.face, Some(Vec3::ZERO));
        }
        assert_eq!(toggles, 4);
        assert!(!rig.brain.flicker_in_progress());
        assert_eq!(rig.brain.state(), BehaviorState::Killing);
    }

    #[test]
    fn killing_ignores_light_and_safety() {
        let mut rig = Rig::at(Vec3::new(0.0, 0.0, -1.0));
        rig.light_hit(false);
        rig.touch(&lit_world());

        let safe = Surroundings { player_safe: true, ..lit_world() };
        let out = rig.tick(&safe);
        assert!(out.cues.is_empty());
        assert_eq!(rig.brain.state(), BehaviorState::Killing);
        assert!(rig.light_hit(false).cues.is_empty());
    }

    #[test]
    fn footsteps_start_only_when_moving_fast() {
        let mut rig = Rig::at(Vec3::new(0.0, 0.0, -20.0));
        let world = Surroundings { beam_target: Vec3::new(0.0, 0.0, 20.0), ..lit_world() };

        // First tick: standing still, no steps yet
        let out = rig.tick(&world);
        assert!(!out.footstep);
        assert!(!rig.brain.footstep_loop_active());

        // Now moving at 3 u/s: 1/3 < 0.5
        let out = rig.tick(&world);
        assert!(out.footstep);
        assert!(rig.brain.footstep_loop_active());
    }

    #[test]
    fn idle_enemy_never_starts_footsteps() {
        let mut rig = Rig::at(Vec3::new(0.0, 0.0, -20.0));
        for _ in 0..10 {
            assert!(!rig.tick(&dark_world()).footstep);
        }
        assert!(!rig.brain.footstep_loop_active());
    }
}
