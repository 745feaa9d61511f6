//! Scene assembly: snapshot plus animation state into a vertex list
//!
//! Everything is drawn with placeholder shapes in back-to-front order.

use glam::Vec2;

use super::anim::{Animator, ChickenPose};
use super::shapes::{circle, rect, striped_band, with_alpha};
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::sim::{BodyView, BugKind, BugView, GamePhase, ObstacleKind, Snapshot};

/// Height of the hedge band behind the ground
const HEDGE_HEIGHT: f32 = 40.0 * SCALE;
/// Grass strip on top of the soil
const GRASS_HEIGHT: f32 = 6.0 * SCALE;

pub fn obstacle_color(kind: ObstacleKind) -> [f32; 4] {
    match kind {
        ObstacleKind::Leaves => colors::LEAVES,
        ObstacleKind::Gnome => colors::GNOME,
        ObstacleKind::BirdBath => colors::BIRDBATH,
        ObstacleKind::Statue => colors::STATUE,
        ObstacleKind::Post => colors::POST,
        ObstacleKind::TallPost => colors::TALL_POST,
    }
}

/// Build the full frame
pub fn build(snap: &Snapshot, anim: &Animator) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(1024);

    background(&mut vertices, anim);

    for obstacle in &snap.obstacles {
        vertices.extend(rect(obstacle.pos, obstacle.size, obstacle_color(obstacle.kind)));
    }

    // The biker only appears during a run
    if snap.phase == GamePhase::Playing {
        chaser(&mut vertices, &snap.chaser, anim.biker_run.frame);
    }
    chicken(&mut vertices, &snap.player, anim);

    if let Some(bug) = &snap.bug {
        match bug.kind {
            BugKind::Worm => worm(&mut vertices, bug, anim.worm.frame),
            _ => dragonfly(&mut vertices, bug, anim.dragonfly.frame),
        }
    }

    // Bonus text itself is drawn by the DOM layer; this is its fading marker
    for text in &snap.floating_texts {
        vertices.extend(circle(
            text.pos,
            5.0 * SCALE,
            with_alpha(colors::BONUS, text.alpha),
            12,
        ));
    }

    vertices
}

fn background(out: &mut Vec<Vertex>, anim: &Animator) {
    out.extend(striped_band(
        GROUND_Y - HEDGE_HEIGHT,
        HEDGE_HEIGHT,
        CANVAS_WIDTH,
        Animator::HEDGE_TILE,
        anim.scroll.hedge,
        colors::HEDGE,
        colors::HEDGE_DARK,
    ));
    out.extend(striped_band(
        GROUND_Y,
        GROUND_HEIGHT,
        CANVAS_WIDTH,
        Animator::GROUND_TILE,
        anim.scroll.ground,
        colors::SOIL,
        colors::SOIL_DARK,
    ));
    out.extend(rect(
        Vec2::new(0.0, GROUND_Y),
        Vec2::new(CANVAS_WIDTH, GRASS_HEIGHT),
        colors::GRASS,
    ));
}

fn chicken(out: &mut Vec<Vertex>, body: &BodyView, anim: &Animator) {
    let (frame, _) = anim.chicken_frame();
    let size = body.size;
    // Walk/idle bob
    let bob = match anim.pose {
        ChickenPose::Walk | ChickenPose::Idle => (frame % 2) as f32 * SCALE,
        _ => 0.0,
    };
    let pos = body.pos + Vec2::new(0.0, bob);

    out.extend(rect(pos, size, colors::CHICKEN));
    out.extend(rect(
        pos + Vec2::new(size.x * 0.55, -size.y * 0.15),
        Vec2::new(size.x * 0.3, size.y * 0.15),
        colors::COMB,
    ));
    out.extend(circle(
        pos + Vec2::new(size.x * 0.7, size.y * 0.25),
        size.x * 0.06,
        colors::EYE,
        8,
    ));

    // Beak dips while pecking
    let beak_y = match anim.pose {
        ChickenPose::Peck if frame % 4 >= 2 => size.y * 0.5,
        _ => size.y * 0.3,
    };
    out.extend(rect(
        pos + Vec2::new(size.x, beak_y),
        Vec2::new(size.x * 0.25, size.y * 0.12),
        colors::BEAK,
    ));

    if anim.pose == ChickenPose::Fly {
        let flap = if frame % 2 == 0 { -0.2 } else { 0.1 };
        out.extend(rect(
            pos + Vec2::new(size.x * 0.1, size.y * (0.3 + flap)),
            Vec2::new(size.x * 0.45, size.y * 0.2),
            colors::BEAK,
        ));
    }
}

fn chaser(out: &mut Vec<Vertex>, body: &BodyView, frame: u32) {
    let size = body.size;
    let wheel_r = size.x * 0.16;
    let rider = Vec2::new(size.x * 0.25, 0.0);
    out.extend(rect(
        body.pos + rider,
        Vec2::new(size.x * 0.5, size.y - wheel_r * 1.5),
        colors::BIKER,
    ));

    let wobble = (frame % 3) as f32 * 0.5 * SCALE;
    for wx in [wheel_r, size.x - wheel_r] {
        out.extend(circle(
            body.pos + Vec2::new(wx, size.y - wheel_r + wobble),
            wheel_r,
            colors::WHEEL,
            16,
        ));
    }
}

fn worm(out: &mut Vec<Vertex>, bug: &BugView, frame: u32) {
    let segments = 4;
    let seg_w = bug.size.x / segments as f32;
    let left = bug.pos.x - bug.size.x / 2.0;
    for i in 0..segments {
        // Inchworm ripple
        let lift = if (i + frame) % 4 == 0 { -2.0 * SCALE } else { 0.0 };
        out.extend(rect(
            Vec2::new(left + i as f32 * seg_w, bug.pos.y - bug.size.y / 2.0 + lift),
            Vec2::new(seg_w * 0.9, bug.size.y),
            colors::WORM,
        ));
    }
}

fn dragonfly(out: &mut Vec<Vertex>, bug: &BugView, frame: u32) {
    let r = bug.size.x / 2.0;
    let wing = if frame % 2 == 0 { r * 0.8 } else { r * 0.3 };
    out.extend(rect(
        bug.pos + Vec2::new(-r * 0.6, -wing),
        Vec2::new(r * 1.2, wing),
        with_alpha(colors::SKY, 0.8),
    ));
    out.extend(circle(bug.pos, r * 0.5, colors::DRAGONFLY, 12));
}
