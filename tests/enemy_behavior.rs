//! Drives the enemy systems in a headless app with a hand-built world.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier3d::prelude::ColliderDisabled;

use hollow_lights::audio::{FootstepPool, RotatingPool};
use hollow_lights::core::{
    EnemyCue, EnemyTuning, FlashlightToggleRequest, GameRng, LightHitEvent, NotifyEvent,
    PlayerCaughtEvent, PlayerContactEvent, SoundCue,
};
use hollow_lights::enemies::brain::AttackPhase;
use hollow_lights::enemies::navigation::{steer_agents, sync_obstacles};
use hollow_lights::enemies::{
    ai, BehaviorState, Enemy, EnemyBrain, NavAgent, NavObstacle, WalkableArea, WalkableRegion,
};
use hollow_lights::flashlight::{BeamTarget, Flashlight, LookProbe};
use hollow_lights::player::{handle_player_caught, Dying, Player, PlayerCamera, PlayerConfig};
use hollow_lights::world::{Footprint, SafeZone};

const TICK: Duration = Duration::from_millis(20);
const ENEMY_START: Vec3 = Vec3::new(0.0, 0.0, -8.0);

struct Scene {
    app: App,
    player: Entity,
    enemy: Entity,
    light: Entity,
}

impl Scene {
    /// Player at the origin looking down -Z with the light on, one enemy ahead.
    fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(TICK))
            .insert_resource(EnemyTuning::default())
            .insert_resource(GameRng::seeded(42))
            .insert_resource(PlayerConfig::default())
            .insert_resource(WalkableArea::new(vec![WalkableRegion {
                min: (-50.0, -50.0),
                max: (50.0, 50.0),
                floor: 0.0,
            }]))
            .insert_resource(BeamTarget(Vec3::new(0.0, 0.0, -10.0)))
            .init_resource::<LookProbe>()
            .init_resource::<SafeZone>()
            .add_event::<LightHitEvent>()
            .add_event::<PlayerContactEvent>()
            .add_event::<EnemyCue>()
            .add_event::<SoundCue>()
            .add_event::<FlashlightToggleRequest>()
            .add_event::<PlayerCaughtEvent>()
            .add_event::<NotifyEvent>()
            .add_systems(
                Update,
                (
                    sync_obstacles,
                    ai::process_light_hits,
                    ai::think,
                    ai::handle_player_contact,
                    handle_player_caught,
                    steer_agents,
                )
                    .chain(),
            );

        let body = Transform::from_xyz(0.0, 1.0, 0.0);
        let eyes = Transform::from_xyz(0.0, 1.6, 0.0);
        let player = app
            .world_mut()
            .spawn((Player, body, GlobalTransform::from(body)))
            .id();
        app.world_mut()
            .spawn((PlayerCamera::default(), eyes, GlobalTransform::from(eyes)));
        let light = app.world_mut().spawn(Flashlight::new(true)).id();

        let enemy = app
            .world_mut()
            .spawn((
                Enemy,
                EnemyBrain::default(),
                NavAgent::at(ENEMY_START),
                FootstepPool(RotatingPool::new(4)),
                Transform::from_translation(ENEMY_START),
            ))
            .id();

        // First update only primes the clock
        app.update();

        Self { app, player, enemy, light }
    }

    fn state(&self) -> BehaviorState {
        self.app.world().get::<EnemyBrain>(self.enemy).unwrap().state()
    }

    fn agent(&self) -> &NavAgent {
        self.app.world().get::<NavAgent>(self.enemy).unwrap()
    }

    fn enemy_position(&self) -> Vec3 {
        self.app.world().get::<Transform>(self.enemy).unwrap().translation
    }

    fn send<E: Event>(&mut self, event: E) {
        self.app.world_mut().send_event(event);
    }

    fn tick(&mut self, n: usize) {
        for _ in 0..n {
            self.app.update();
        }
    }

    /// Tick until `done` holds, giving up after `limit` ticks.
    fn tick_until(&mut self, limit: usize, done: impl Fn(&Self) -> bool) -> Option<usize> {
        for i in 1..=limit {
            self.app.update();
            if done(self) {
                return Some(i);
            }
        }
        None
    }

    fn sent<E: Event>(&self) -> Vec<E>
    where
        E: Clone,
    {
        self.app
            .world()
            .resource::<Events<E>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }
}

#[test]
fn lit_enemy_stares_then_charges() {
    let mut scene = Scene::new();
    let enemy = scene.enemy;

    scene.send(LightHitEvent { enemy });
    scene.tick(1);
    assert_eq!(scene.state(), BehaviorState::ChasePlayer(Some(AttackPhase::Stare)));
    assert!(scene.agent().frozen);

    // Stares for somewhere between half a second and a second and a half
    let ticks = scene
        .tick_until(100, |s| {
            s.state() == BehaviorState::ChasePlayer(Some(AttackPhase::Pursue))
        })
        .expect("enemy never started the charge");
    assert!(ticks >= 24, "charged after only {ticks} ticks");
    assert_eq!(scene.agent().speed, 4.0);

    let before = scene.enemy_position().distance(Vec3::ZERO);
    scene.tick(25);
    let after = scene.enemy_position().distance(Vec3::ZERO);
    assert!(after < before - 1.5, "enemy went from {before} to {after}");
}

#[test]
fn light_hit_while_player_is_safe_only_stops_the_enemy() {
    let mut scene = Scene::new();
    let enemy = scene.enemy;
    scene.app.world_mut().resource_mut::<SafeZone>().0 = true;

    scene.send(LightHitEvent { enemy });
    scene.tick(1);

    assert_eq!(scene.state(), BehaviorState::Idle);
    assert!(scene.agent().stopped);

    let start = scene.enemy_position();
    scene.tick(20);
    assert_eq!(scene.enemy_position(), start);
}

#[test]
fn enemy_follows_the_beam_and_rests_in_the_dark() {
    let mut scene = Scene::new();

    scene.tick(1);
    assert_eq!(scene.state(), BehaviorState::ChaseLight);
    assert_eq!(scene.agent().destination, Vec3::new(0.0, 0.0, -10.0));

    let light = scene.light;
    scene.app.world_mut().entity_mut(light).insert(Flashlight::new(false));

    // Just under a unit left to walk
    scene
        .tick_until(50, |s| s.state() == BehaviorState::Idle)
        .expect("enemy never gave up in the dark");
    assert!(scene.enemy_position().distance(Vec3::new(0.0, 0.0, -10.0)) < 1.1);
}

#[test]
fn touching_the_player_mid_attack_kills_once() {
    let mut scene = Scene::new();
    let enemy = scene.enemy;

    scene.send(LightHitEvent { enemy });
    scene.tick(1);

    scene.send(PlayerContactEvent { enemy });
    scene.tick(1);

    assert_eq!(scene.state(), BehaviorState::Killing);
    let caught = scene.sent::<PlayerCaughtEvent>();
    assert_eq!(caught.len(), 1);
    assert_eq!(caught[0].enemy, enemy);
    assert!(scene.sent::<SoundCue>().contains(&SoundCue::StopSong { enemy }));
    assert!(scene.app.world().get::<ColliderDisabled>(enemy).is_some());
    assert_eq!(
        scene.sent::<NotifyEvent>(),
        vec![NotifyEvent::new("I don't think it likes that flashlight...")]
    );

    // The player's body drops out of the physics world too
    let player = scene.player;
    assert!(scene.app.world().get::<Dying>(player).is_some());
    assert!(scene.app.world().get::<ColliderDisabled>(player).is_some());

    // A second touch changes nothing
    scene.send(PlayerContactEvent { enemy });
    scene.tick(1);
    assert!(scene.sent::<PlayerCaughtEvent>().is_empty());

    let held = scene.enemy_position();
    scene.tick(30);
    assert_eq!(scene.enemy_position(), held);
}

#[test]
fn touching_an_idle_enemy_moves_it_behind_the_player() {
    let mut scene = Scene::new();
    let enemy = scene.enemy;
    scene.app.world_mut().resource_mut::<SafeZone>().0 = true;
    scene.tick(1);
    scene.app.world_mut().resource_mut::<SafeZone>().0 = false;

    let light = scene.light;
    scene.app.world_mut().entity_mut(light).insert(Flashlight::new(false));

    scene.send(PlayerContactEvent { enemy });
    scene.tick(2);

    assert_ne!(scene.state(), BehaviorState::Killing);
    let position = scene.enemy_position();
    // Ten units out, well away from where the camera points
    let offset = Vec3::new(position.x, 0.0, position.z);
    assert!((offset.length() - 10.0).abs() < 1e-3, "landed at {position}");
    let off_view = offset.angle_between(Vec3::NEG_Z).to_degrees();
    assert!(off_view > 90.0, "only {off_view} degrees off the view");
}

#[test]
fn enemy_chasing_into_a_house_stops_outside() {
    let mut scene = Scene::new();
    // Room around the beam target, porch facing the street
    let house = Footprint::new([(17.0, -13.0), (23.0, -7.0), (19.0, -7.0), (21.0, -6.0)]);
    scene
        .app
        .world_mut()
        .spawn(NavObstacle(house.keep_out(0.3).to_vec()));
    scene.app.world_mut().resource_mut::<BeamTarget>().0 = Vec3::new(19.0, 0.0, -10.0);

    for _ in 0..400 {
        scene.tick(1);
        let position = scene.enemy_position();
        assert!(!house.contains(position), "walked into the house at {position}");
    }

    assert_eq!(scene.state(), BehaviorState::ChaseLight);
    let position = scene.enemy_position();
    assert!(position.distance(Vec3::new(19.0, 0.0, -10.0)) < 6.0, "stopped at {position}");
    assert_eq!(scene.agent().speed_magnitude(), 0.0);
}
