//! Navigation agent adapter.
//!
//! Enemies never move their own transform. They hand destinations to a
//! [`NavAgent`] and ask a [`NavMesh`] for walkable points and routes; the
//! steering system does the rest.

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::NavigationError;

/// How far outside an obstacle its corner waypoints sit.
const CORNER_MARGIN: f32 = 0.05;
const EPSILON: f32 = 1e-3;

/// Anything that can snap a world point onto walkable ground.
pub trait NavMesh {
    /// Closest walkable point within `max_radius` of `near`.
    fn sample_point(&self, near: Vec3, max_radius: f32) -> Result<Vec3, NavigationError>;

    /// Point to walk straight at on the way from `from` to `to`, or `None`
    /// when no route exists.
    fn next_waypoint(&self, _from: Vec3, to: Vec3) -> Option<Vec3> {
        Some(to)
    }
}

/// Ground enemies must walk around, as rectangles on the x/z plane.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct NavObstacle(pub Vec<Rect>);

/// Axis-aligned walkable rectangle on the x/z plane.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WalkableRegion {
    pub min: (f32, f32),
    pub max: (f32, f32),
    /// Height of the floor surface.
    pub floor: f32,
}

impl WalkableRegion {
    fn closest_point(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            p.x.clamp(self.min.0, self.max.0),
            self.floor,
            p.z.clamp(self.min.1, self.max.1),
        )
    }

    fn contains(&self, p: Vec2) -> bool {
        (self.min.0..=self.max.0).contains(&p.x) && (self.min.1..=self.max.1).contains(&p.y)
    }
}

/// The walkable area of the current level.
#[derive(Resource, Debug, Clone, Default, Deserialize)]
pub struct WalkableArea {
    pub regions: Vec<WalkableRegion>,
    /// Mirrors every [`NavObstacle`] in the level.
    #[serde(skip)]
    pub obstacles: Vec<Rect>,
}

impl WalkableArea {
    pub fn new(regions: Vec<WalkableRegion>) -> Self {
        Self { regions, obstacles: Vec::new() }
    }

    fn on_ground(&self, p: Vec2) -> bool {
        self.regions.is_empty() || self.regions.iter().any(|region| region.contains(p))
    }

    /// Shortest route over obstacle corners. Returns the first hop.
    fn route(&self, obstacles: &[Rect], start: Vec2, goal: Vec2) -> Option<Vec2> {
        if is_clear(obstacles, start, goal) {
            return Some(goal);
        }

        let mut nodes: Vec<Vec2> = obstacles
            .iter()
            .flat_map(|rect| corners(&rect.inflate(CORNER_MARGIN)))
            .filter(|&p| blocker(obstacles, p).is_none() && self.on_ground(p))
            .filter(|p| p.distance(start) > 10.0 * EPSILON)
            .collect();
        nodes.push(goal);
        let goal_index = nodes.len() - 1;

        let mut cost = vec![f32::INFINITY; nodes.len()];
        let mut first_hop = vec![None; nodes.len()];
        let mut done = vec![false; nodes.len()];
        for (i, &node) in nodes.iter().enumerate() {
            if is_clear(obstacles, start, node) {
                cost[i] = start.distance(node);
                first_hop[i] = Some(i);
            }
        }

        while let Some(current) = (0..nodes.len())
            .filter(|&i| !done[i] && cost[i].is_finite())
            .min_by(|&a, &b| cost[a].total_cmp(&cost[b]))
        {
            if current == goal_index {
                break;
            }
            done[current] = true;
            for next in 0..nodes.len() {
                let through = cost[current] + nodes[current].distance(nodes[next]);
                if !done[next]
                    && through < cost[next]
                    && is_clear(obstacles, nodes[current], nodes[next])
                {
                    cost[next] = through;
                    first_hop[next] = first_hop[current];
                }
            }
        }

        first_hop[goal_index].map(|hop| nodes[hop])
    }
}

impl NavMesh for WalkableArea {
    fn sample_point(&self, near: Vec3, max_radius: f32) -> Result<Vec3, NavigationError> {
        self.regions
            .iter()
            .filter_map(|region| {
                let clamped = region.closest_point(near);
                let free = push_out(&self.obstacles, clamped.xz())?;
                region
                    .contains(free)
                    .then(|| Vec3::new(free.x, region.floor, free.y))
            })
            .map(|point| (point.distance(near), point))
            .filter(|(distance, _)| *distance <= max_radius)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, point)| point)
            .ok_or(NavigationError::NoWalkablePoint { near, radius: max_radius })
    }

    fn next_waypoint(&self, from: Vec3, to: Vec3) -> Option<Vec3> {
        let start = from.xz();
        // Anything already underfoot is left behind rather than routed around
        let obstacles: Vec<Rect> = self
            .obstacles
            .iter()
            .filter(|rect| !strictly_inside(rect, start))
            .copied()
            .collect();

        let goal = push_out(&obstacles, to.xz())?;
        let hop = self.route(&obstacles, start, goal)?;
        Some(Vec3::new(hop.x, to.y, hop.y))
    }
}

fn strictly_inside(rect: &Rect, p: Vec2) -> bool {
    p.x > rect.min.x && p.x < rect.max.x && p.y > rect.min.y && p.y < rect.max.y
}

fn blocker(obstacles: &[Rect], p: Vec2) -> Option<&Rect> {
    obstacles.iter().find(|rect| strictly_inside(rect, p))
}

fn corners(rect: &Rect) -> [Vec2; 4] {
    [
        rect.min,
        Vec2::new(rect.max.x, rect.min.y),
        rect.max,
        Vec2::new(rect.min.x, rect.max.y),
    ]
}

/// Nearest point on the rectangle's outline.
fn nearest_edge(rect: &Rect, p: Vec2) -> Vec2 {
    let exits = [
        (p.x - rect.min.x, Vec2::new(rect.min.x, p.y)),
        (rect.max.x - p.x, Vec2::new(rect.max.x, p.y)),
        (p.y - rect.min.y, Vec2::new(p.x, rect.min.y)),
        (rect.max.y - p.y, Vec2::new(p.x, rect.max.y)),
    ];
    exits
        .into_iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map_or(p, |(_, exit)| exit)
}

/// Move `p` out of every obstacle, one rectangle at a time.
fn push_out(obstacles: &[Rect], mut p: Vec2) -> Option<Vec2> {
    for _ in 0..=obstacles.len() {
        match blocker(obstacles, p) {
            Some(rect) => p = nearest_edge(rect, p),
            None => return Some(p),
        }
    }
    None
}

/// Whether the segment `a..b` stays out of every obstacle's interior.
fn is_clear(obstacles: &[Rect], a: Vec2, b: Vec2) -> bool {
    !obstacles.iter().any(|rect| crosses(&rect.inflate(-EPSILON), a, b))
}

fn crosses(rect: &Rect, a: Vec2, b: Vec2) -> bool {
    let delta = b - a;
    let (mut enter, mut exit) = (0.0_f32, 1.0_f32);
    for axis in 0..2 {
        let (start, step) = (a[axis], delta[axis]);
        let (low, high) = (rect.min[axis], rect.max[axis]);
        if step.abs() < f32::EPSILON {
            if start <= low || start >= high {
                return false;
            }
        } else {
            let (t0, t1) = ((low - start) / step, (high - start) / step);
            enter = enter.max(t0.min(t1));
            exit = exit.min(t0.max(t1));
        }
    }
    enter < exit
}

/// Pathfinding agent state for one enemy.
#[derive(Component, Debug, Clone)]
pub struct NavAgent {
    pub destination: Vec3,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Stopped agents keep their destination but do not move.
    pub stopped: bool,
    /// Equivalent of frozen rigid-body constraints: nothing moves the body.
    pub frozen: bool,
    velocity: Vec3,
    pending_warp: Option<Vec3>,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            destination: Vec3::ZERO,
            speed: 3.0,
            stopped: true,
            frozen: true,
            velocity: Vec3::ZERO,
            pending_warp: None,
        }
    }
}

impl NavAgent {
    pub fn at(position: Vec3) -> Self {
        Self {
            destination: position,
            ..default()
        }
    }

    pub fn set_destination(&mut self, point: Vec3) {
        self.destination = point;
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn resume(&mut self) {
        self.stopped = false;
    }

    /// Zero the current velocity without touching the stopped flag.
    pub fn halt(&mut self) {
        self.velocity = Vec3::ZERO;
    }

    /// Teleport on the next steering step. Walking is skipped that step.
    pub fn warp(&mut self, point: Vec3) {
        self.pending_warp = Some(point);
    }

    pub fn pending_warp(&self) -> Option<Vec3> {
        self.pending_warp
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn speed_magnitude(&self) -> f32 {
        self.velocity.length()
    }

    /// Advance one step: apply a pending warp or walk toward the destination
    /// along the route `nav` picks. Returns the new position.
    pub fn step(&mut self, position: Vec3, dt: f32, nav: &impl NavMesh) -> Vec3 {
        if let Some(target) = self.pending_warp.take() {
            self.velocity = Vec3::ZERO;
            return target;
        }

        if self.stopped || self.frozen || dt <= 0.0 {
            self.velocity = Vec3::ZERO;
            return position;
        }

        let Some(waypoint) = nav.next_waypoint(position, self.destination) else {
            self.velocity = Vec3::ZERO;
            return position;
        };

        let mut to_goal = waypoint - position;
        to_goal.y = 0.0;
        let distance = to_goal.length();
        if distance < 1e-3 {
            self.velocity = Vec3::ZERO;
            return position;
        }

        let travel = (self.speed * dt).min(distance);
        let direction = to_goal / distance;
        self.velocity = direction * (travel / dt);
        position + direction * travel
    }
}

/// Mirror every obstacle in the level into the walkable area.
pub fn sync_obstacles(obstacles: Query<&NavObstacle>, mut area: ResMut<WalkableArea>) {
    let rects: Vec<Rect> = obstacles.iter().flat_map(|o| o.0.iter().copied()).collect();
    if area.obstacles != rects {
        area.obstacles = rects;
    }
}

/// Move every agent toward its destination.
pub fn steer_agents(
    time: Res<Time>,
    area: Res<WalkableArea>,
    mut query: Query<(&mut Transform, &mut NavAgent)>,
) {
    let dt = time.delta_secs();

    for (mut transform, mut agent) in query.iter_mut() {
        let before = transform.translation;
        transform.translation = agent.step(before, dt, &*area);

        // Face the direction of travel
        let heading = agent.velocity();
        if heading.length_squared() > 1e-6 {
            let look_target = transform.translation + Vec3::new(heading.x, 0.0, heading.z);
            transform.look_at(look_target, Vec3::Y);
        }
    }
}
