//! Actor physics against static tile geometry
//!
//! One call to [`step`] per actor per frame:
//! 1. gravity (airborne only), clamped to terminal velocity
//! 2. integrate position
//! 3. walls at the leading edge, with step-up for small ledges
//! 4. ceiling, while moving up
//! 5. ground and slope snapping
//!
//! Positions are top-left, y grows downward, so "higher" means smaller y.

use glam::Vec2;

use crate::config::PhysicsTuning;
use crate::map::TileQuery;

use super::components::{Body, PhysicsBody};

/// Keeps the right edge sample inside the body's last pixel column.
const EDGE_EPSILON: f32 = 0.01;

/// What one resolver tick ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// Blocked by a wall, x clamped and vx zeroed
    pub hit_wall: bool,
    /// Climbed a ledge no taller than the max step height
    pub stepped_up: bool,
    pub hit_ceiling: bool,
    /// Went from airborne to grounded this tick
    pub landed: bool,
    pub grounded: bool,
    pub on_slope: bool,
}

/// Advance one actor by `dt` seconds and resolve it against the map.
pub fn step<M: TileQuery + ?Sized>(
    body: &mut Body,
    phys: &mut PhysicsBody,
    map: &M,
    tuning: &PhysicsTuning,
    dt: f32,
) -> StepReport {
    let mut report = StepReport::default();
    let was_grounded = phys.grounded;

    if !phys.grounded {
        body.vel.y = (body.vel.y + tuning.gravity * dt).min(tuning.terminal_velocity);
    }

    let old_x = body.pos.x;
    body.pos += body.vel * dt;

    resolve_walls(body, phys, map, tuning, old_x, &mut report);
    if body.vel.y < 0.0 {
        resolve_ceiling(body, map, tuning, &mut report);
    }
    resolve_ground(body, phys, map, tuning, dt, was_grounded || report.stepped_up);

    if phys.grounded {
        phys.airborne_frames = 0;
    } else {
        phys.airborne_frames = phys.airborne_frames.saturating_add(1);
    }
    report.landed = phys.grounded && !was_grounded;
    report.grounded = phys.grounded;
    report.on_slope = phys.on_slope;
    report
}

// =============================================================================
// Walls
// =============================================================================

/// Head, middle and feet sample heights for wall checks.
fn wall_samples(body: &Body, tuning: &PhysicsTuning) -> [f32; 3] {
    let y = body.pos.y;
    let h = body.size.y;
    [y + tuning.head_inset, y + h * 0.5, y + h - tuning.feet_sample_inset]
}

fn leading_edge(x: f32, width: f32, vx: f32) -> f32 {
    if vx > 0.0 {
        x + width - EDGE_EPSILON
    } else {
        x
    }
}

/// A sample only counts as a wall if the same row was clear at the edge's
/// previous x. Rows that were already solid there are floor or ceiling
/// penetration from vertical movement, which the later passes own.
fn wall_hit<M: TileQuery + ?Sized>(
    map: &M,
    body: &Body,
    tuning: &PhysicsTuning,
    old_edge: f32,
    new_edge: f32,
) -> bool {
    wall_samples(body, tuning)
        .iter()
        .any(|&sy| map.is_solid_at_world(new_edge, sy) && !map.is_solid_at_world(old_edge, sy))
}

fn resolve_walls<M: TileQuery + ?Sized>(
    body: &mut Body,
    phys: &PhysicsBody,
    map: &M,
    tuning: &PhysicsTuning,
    old_x: f32,
    report: &mut StepReport,
) {
    let vx = body.vel.x;
    if vx == 0.0 {
        return;
    }
    let w = body.size.x;
    let new_edge = leading_edge(body.pos.x, w, vx);
    let old_edge = leading_edge(old_x, w, vx);
    if !wall_hit(map, body, tuning, old_edge, new_edge) {
        return;
    }

    // Never while rising, or a jump along a wall would climb it.
    if phys.grounded || body.vel.y >= 0.0 {
        let max_step = tuning.max_step_height.floor() as i32;
        for dy in 1..=max_step {
            let y = body.pos.y - dy as f32;
            if !map.rect_hits_solid(body.pos.x, y, w, body.size.y) {
                body.pos.y = y;
                report.stepped_up = true;
                return;
            }
        }
    }

    let tw = map.tile_width();
    let column = (new_edge / tw).floor();
    body.pos.x = if vx > 0.0 { column * tw - w } else { (column + 1.0) * tw };
    body.vel.x = 0.0;
    report.hit_wall = true;
}

// =============================================================================
// Ceiling
// =============================================================================

fn resolve_ceiling<M: TileQuery + ?Sized>(
    body: &mut Body,
    map: &M,
    tuning: &PhysicsTuning,
    report: &mut StepReport,
) {
    let head = body.pos.y;
    let xs = [
        body.pos.x + tuning.foot_inset,
        body.pos.x + body.size.x - tuning.foot_inset,
    ];
    if xs.iter().any(|&x| map.is_solid_at_world(x, head)) {
        let th = map.tile_height();
        body.pos.y = ((head / th).floor() + 1.0) * th;
        body.vel.y = 0.0;
        report.hit_ceiling = true;
    }
}

// =============================================================================
// Ground
// =============================================================================

/// A walkable surface found under a foot sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub y: f32,
    pub slope: bool,
}

/// Accepted range of `surface_y - feet_y` for a snap. Negative gaps mean
/// the feet are already below the surface.
fn snap_window(tuning: &PhysicsTuning, grounded: bool, vy: f32, dt: f32) -> Option<(f32, f32)> {
    if vy < 0.0 {
        // Rising never snaps, even when a skill holds `grounded` to switch
        // gravity off.
        None
    } else if grounded {
        // States that force grounded may still carry a downward velocity.
        let reach = tuning.max_step_height.max(vy * dt + tuning.grounded_snap);
        Some((-reach, tuning.grounded_snap))
    } else if vy > 0.0 {
        // Falling: only land once the feet have actually reached the
        // surface, and never on one further up than this tick's travel.
        Some((-(vy * dt + tuning.grounded_snap), tuning.fall_snap_threshold))
    } else {
        Some((-tuning.max_step_height, tuning.airborne_snap))
    }
}

/// Highest surface under any of `xs` whose gap to `feet` lies in `window`.
pub fn find_surface<M: TileQuery + ?Sized>(
    map: &M,
    xs: &[f32],
    feet: f32,
    window: (f32, f32),
) -> Option<Surface> {
    let (lo, hi) = window;
    let th = map.tile_height();
    let tw = map.tile_width();
    let first_row = ((feet + lo) / th).floor() as i32;
    let last_row = ((feet + hi) / th).floor() as i32;

    let mut best: Option<Surface> = None;
    for &x in xs {
        let tx = (x / tw).floor() as i32;
        for ty in first_row..=last_row {
            let candidate = if let Some(slope) = map.slope_at(tx, ty) {
                Surface { y: slope.y_for_x(slope.clamp_x(x)), slope: true }
            } else if map.is_solid(tx, ty) && !map.is_solid(tx, ty - 1) {
                Surface { y: ty as f32 * th, slope: false }
            } else {
                continue;
            };
            let gap = candidate.y - feet;
            if gap < lo || gap > hi {
                continue;
            }
            if best.map_or(true, |b| candidate.y < b.y) {
                best = Some(candidate);
            }
        }
    }
    best
}

/// The part of a body the resolver samples (inside the foot and head
/// insets) is clear of solid tiles with its top-left at `pos`.
fn body_fits<M: TileQuery + ?Sized>(map: &M, tuning: &PhysicsTuning, pos: Vec2, size: Vec2) -> bool {
    !map.rect_hits_solid(
        pos.x + tuning.foot_inset,
        pos.y + tuning.head_inset,
        size.x - 2.0 * tuning.foot_inset,
        size.y - tuning.head_inset,
    )
}

fn resolve_ground<M: TileQuery + ?Sized>(
    body: &mut Body,
    phys: &mut PhysicsBody,
    map: &M,
    tuning: &PhysicsTuning,
    dt: f32,
    grounded: bool,
) {
    let vy = body.vel.y;
    let Some(window) = snap_window(tuning, grounded, vy, dt) else {
        // Rising; whoever set vy owns the grounded flag until it comes down.
        return;
    };

    let feet = body.feet();
    let xs = [
        body.pos.x + tuning.foot_inset,
        body.pos.x + body.size.x - tuning.foot_inset,
    ];
    let size = body.size;
    let x = body.pos.x;
    let fits = |s: &Surface| body_fits(map, tuning, Vec2::new(x, s.y - size.y), size);
    let mut surface = find_surface(map, &xs, feet, window).filter(|s| fits(s));

    // Look-ahead only keeps a runner on a step going down; it never lifts.
    if surface.is_none() && grounded && body.vel.x != 0.0 {
        let ahead = body.vel.x * tuning.lookahead_window;
        let xs_ahead = [xs[0] + ahead, xs[1] + ahead];
        surface = find_surface(map, &xs_ahead, feet, (0.0, window.1)).filter(|s| fits(s));
    }

    match surface {
        Some(s) => {
            body.pos.y = s.y - body.size.y;
            body.vel.y = 0.0;
            phys.grounded = true;
            phys.on_slope = s.slope;
        }
        None => {
            phys.grounded = false;
            phys.on_slope = false;
        }
    }
}
