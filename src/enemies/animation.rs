//! Enemy presentation: animator parameters, model clips, and the kill
//! choreography.
//!
//! The brain only ever emits `Idle`, `Run` and `Kill` cues. Everything the
//! player sees and hears because of them is decided here.

use bevy::animation::{graph::AnimationNodeIndex, AnimationClip, AnimationPlayer, RepeatAnimation};
use bevy::prelude::*;
use std::time::Duration;

use super::components::Enemy;
use super::navigation::NavAgent;
use crate::core::{
    ActiveView, ActiveViewEvent, Cue, EnemyCue, EnemyModel, EnemyTuning, SceneReloadEvent,
    SoundCue,
};

/// Animator parameters driven by the presentation cues.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct AnimatorParams {
    pub is_running: bool,
    /// Mirrors the agent's speed while running.
    pub run_speed: f32,
    pub is_killing: bool,
}

impl AnimatorParams {
    pub fn apply(&mut self, cue: Cue) {
        match cue {
            Cue::Idle => self.is_running = false,
            Cue::Run => self.is_running = true,
            Cue::Kill => self.is_killing = true,
        }
    }
}

/// What the kill choreography wants done on a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillBeat {
    /// Play the death fade and black the view out.
    DeathView,
    /// Rebuild the level.
    Reload,
}

/// Timeline that runs after an enemy catches the player.
#[derive(Component, Debug, Clone)]
pub enum KillChoreography {
    Reveal(Timer),
    Linger(Timer),
    Done,
}

impl KillChoreography {
    pub fn new(reveal_seconds: f32) -> Self {
        Self::Reveal(Timer::from_seconds(reveal_seconds, TimerMode::Once))
    }

    pub fn advance(&mut self, dt: Duration, linger_seconds: f32) -> Option<KillBeat> {
        match self {
            Self::Reveal(timer) => {
                timer.tick(dt);
                if !timer.finished() {
                    return None;
                }
                *self = Self::Linger(Timer::from_seconds(linger_seconds, TimerMode::Once));
                Some(KillBeat::DeathView)
            }
            Self::Linger(timer) => {
                timer.tick(dt);
                if !timer.finished() {
                    return None;
                }
                *self = Self::Done;
                Some(KillBeat::Reload)
            }
            Self::Done => None,
        }
    }
}

/// Animation graph nodes for a model that ships its own clips.
#[derive(Component)]
pub struct EnemyAnimations {
    pub idle: AnimationNodeIndex,
    pub run: AnimationNodeIndex,
    pub kill: AnimationNodeIndex,
}

/// Links an enemy entity to its child AnimationPlayer entity.
#[derive(Component)]
pub struct AnimationLink(pub Entity);

/// Marker for enemies awaiting AnimationPlayer discovery.
#[derive(Component)]
pub struct NeedsAnimationSetup;

/// Feed presentation cues into the animator and start the kill timeline.
pub fn apply_enemy_cues(
    mut commands: Commands,
    tuning: Res<EnemyTuning>,
    mut cues: EventReader<EnemyCue>,
    mut views: EventWriter<ActiveViewEvent>,
    mut query: Query<&mut AnimatorParams, With<Enemy>>,
) {
    for EnemyCue { enemy, cue } in cues.read().copied() {
        let Ok(mut params) = query.get_mut(enemy) else {
            continue;
        };

        let already_killing = params.is_killing;
        params.apply(cue);

        if cue == Cue::Kill && !already_killing {
            // Keep the kill in plain sight until the reveal
            views.send(ActiveViewEvent(ActiveView::Main));
            commands
                .entity(enemy)
                .insert(KillChoreography::new(tuning.kill_reveal_seconds));
        }
    }
}

/// Keep the run speed parameter in step with the agent.
pub fn sync_run_speed(mut query: Query<(&NavAgent, &mut AnimatorParams)>) {
    for (agent, mut params) in query.iter_mut() {
        if params.is_running {
            params.run_speed = agent.speed_magnitude();
        }
    }
}

/// Step every kill timeline.
pub fn advance_kill_choreography(
    time: Res<Time>,
    tuning: Res<EnemyTuning>,
    mut query: Query<&mut KillChoreography>,
    mut sounds: EventWriter<SoundCue>,
    mut views: EventWriter<ActiveViewEvent>,
    mut reloads: EventWriter<SceneReloadEvent>,
) {
    for mut choreography in query.iter_mut() {
        match choreography.advance(time.delta(), tuning.kill_reload_seconds) {
            Some(KillBeat::DeathView) => {
                sounds.send(SoundCue::DeathFade);
                views.send(ActiveViewEvent(ActiveView::Death));
            }
            Some(KillBeat::Reload) => {
                reloads.send(SceneReloadEvent);
            }
            None => {}
        }
    }
}

/// Find the AnimationPlayer in a freshly loaded model and build its graph.
pub fn setup_enemy_animations(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    tuning: Res<EnemyTuning>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    enemy_query: Query<(Entity, &Children), (With<NeedsAnimationSetup>, With<Enemy>)>,
    children_query: Query<&Children>,
    mut animation_player_query: Query<(Entity, &mut AnimationPlayer)>,
) {
    for (enemy_entity, children) in enemy_query.iter() {
        let Some(player_entity) =
            find_animation_player_entity(children, &children_query, &animation_player_query)
        else {
            continue;
        };

        let Some((graph, animations)) = build_animation_graph(&asset_server, &tuning.model) else {
            commands.entity(enemy_entity).remove::<NeedsAnimationSetup>();
            continue;
        };

        let idle = animations.idle;
        commands
            .entity(player_entity)
            .insert(AnimationGraphHandle(graphs.add(graph)));
        commands
            .entity(enemy_entity)
            .remove::<NeedsAnimationSetup>()
            .insert((AnimationLink(player_entity), animations));

        if let Ok((_, mut player)) = animation_player_query.get_mut(player_entity) {
            player.stop_all();
            player.start(idle).set_repeat(RepeatAnimation::Forever);
        }

        debug!("Animation setup complete for enemy {:?}", enemy_entity);
    }
}

fn find_animation_player_entity(
    children: &Children,
    children_query: &Query<&Children>,
    animation_player_query: &Query<(Entity, &mut AnimationPlayer)>,
) -> Option<Entity> {
    for &child in children.iter() {
        if animation_player_query.get(child).is_ok() {
            return Some(child);
        }

        if let Ok(grandchildren) = children_query.get(child) {
            if let Some(found) =
                find_animation_player_entity(grandchildren, children_query, animation_player_query)
            {
                return Some(found);
            }
        }
    }
    None
}

fn build_animation_graph(
    asset_server: &AssetServer,
    model: &EnemyModel,
) -> Option<(AnimationGraph, EnemyAnimations)> {
    let path = model.scene_path.as_deref()?;
    let indices = model.animations.as_ref()?;
    let base = path.replace("#Scene0", "");

    let mut graph = AnimationGraph::new();
    let mut add = |index: u32| {
        let clip: Handle<AnimationClip> = asset_server.load(format!("{}#Animation{}", base, index));
        graph.add_clip(clip, 1.0, graph.root)
    };
    let animations = EnemyAnimations {
        idle: add(indices.idle),
        run: add(indices.run),
        kill: add(indices.kill),
    };
    Some((graph, animations))
}

/// Play the clip matching the animator parameters.
pub fn play_animations(
    query: Query<(&AnimatorParams, &AnimationLink, &EnemyAnimations), Changed<AnimatorParams>>,
    mut animation_players: Query<&mut AnimationPlayer>,
) {
    for (params, link, animations) in query.iter() {
        let Ok(mut player) = animation_players.get_mut(link.0) else {
            continue;
        };

        let (node, repeat) = if params.is_killing {
            (animations.kill, RepeatAnimation::Never)
        } else if params.is_running {
            (animations.run, RepeatAnimation::Forever)
        } else {
            (animations.idle, RepeatAnimation::Forever)
        };

        if player.is_playing_animation(node) {
            // Run speed changes every tick; only the playback rate follows it
            if node == animations.run {
                if let Some(active) = player.animation_mut(node) {
                    active.set_speed((params.run_speed / 3.0).max(0.1));
                }
            }
            continue;
        }

        player.stop_all();
        player.start(node).set_repeat(repeat);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_drive_animator_flags() {
        let mut params = AnimatorParams::default();
        params.apply(Cue::Run);
        assert!(params.is_running);
        params.apply(Cue::Idle);
        assert!(!params.is_running);
        params.apply(Cue::Kill);
        assert!(params.is_killing);
    }

    #[test]
    fn kill_timeline_reveals_then_reloads_once() {
        let mut choreography = KillChoreography::new(1.25);
        let step = Duration::from_millis(50);
        let mut beats = Vec::new();
        let mut elapsed = Duration::ZERO;

        while elapsed < Duration::from_secs(6) {
            elapsed += step;
            if let Some(beat) = choreography.advance(step, 2.7) {
                beats.push((beat, elapsed));
            }
        }

        assert_eq!(beats.len(), 2);
        assert_eq!(beats[0], (KillBeat::DeathView, Duration::from_millis(1250)));
        assert_eq!(beats[1].0, KillBeat::Reload);
        assert!(beats[1].1 >= Duration::from_millis(3950));
        assert!(beats[1].1 <= Duration::from_millis(4000));
    }
}
