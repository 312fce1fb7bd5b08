//! Shape generation for 2D primitives
//!
//! All shapes append triangle-list vertices in pixel coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Axis-aligned filled rectangle
pub fn rect(out: &mut Vec<Vertex>, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
    gradient_rect(out, x, y, w, h, color, color);
}

/// Rectangle fading vertically from `top` to `bottom`
pub fn gradient_rect(
    out: &mut Vec<Vertex>,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    top: [f32; 4],
    bottom: [f32; 4],
) {
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let (x2, y2) = (x + w, y + h);

    out.push(Vertex::new(x, y, top));
    out.push(Vertex::new(x2, y, top));
    out.push(Vertex::new(x, y2, bottom));

    out.push(Vertex::new(x, y2, bottom));
    out.push(Vertex::new(x2, y, top));
    out.push(Vertex::new(x2, y2, bottom));
}

/// Rectangle border of the given thickness, drawn inside the bounds
pub fn outline_rect(
    out: &mut Vec<Vertex>,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    thickness: f32,
    color: [f32; 4],
) {
    let t = thickness.min(w / 2.0).min(h / 2.0);
    rect(out, x, y, w, t, color);
    rect(out, x, y + h - t, w, t, color);
    rect(out, x, y + t, t, h - 2.0 * t, color);
    rect(out, x + w - t, y + t, t, h - 2.0 * t, color);
}

/// Generate vertices for a filled circle
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    ellipse(out, center, radius, radius, 0.0, color, segments);
}

/// Filled ellipse rotated by `rotation` radians
pub fn ellipse(
    out: &mut Vec<Vertex>,
    center: Vec2,
    rx: f32,
    ry: f32,
    rotation: f32,
    color: [f32; 4],
    segments: u32,
) {
    let segments = segments.max(3);
    let (sin_r, cos_r) = rotation.sin_cos();
    let point = |theta: f32| {
        let local = Vec2::new(rx * theta.cos(), ry * theta.sin());
        center + Vec2::new(local.x * cos_r - local.y * sin_r, local.x * sin_r + local.y * cos_r)
    };

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let (p1, p2) = (point(theta1), point(theta2));

        // Triangle from center to edge
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(p1.x, p1.y, color));
        out.push(Vertex::new(p2.x, p2.y, color));
    }
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    let segments = segments.max(3);
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        out.push(Vertex::new(inner1.x, inner1.y, color));
        out.push(Vertex::new(outer1.x, outer1.y, color));
        out.push(Vertex::new(inner2.x, inner2.y, color));

        out.push(Vertex::new(inner2.x, inner2.y, color));
        out.push(Vertex::new(outer1.x, outer1.y, color));
        out.push(Vertex::new(outer2.x, outer2.y, color));
    }
}

/// Convex polygon as a triangle fan around its first point
pub fn polygon(out: &mut Vec<Vertex>, points: &[Vec2], color: [f32; 4]) {
    if points.len() < 3 {
        return;
    }
    let first = points[0];
    for pair in points[1..].windows(2) {
        out.push(Vertex::new(first.x, first.y, color));
        out.push(Vertex::new(pair[0].x, pair[0].y, color));
        out.push(Vertex::new(pair[1].x, pair[1].y, color));
    }
}

/// Irregular four-point glass shard of size `s`
pub fn shard(out: &mut Vec<Vertex>, center: Vec2, size: f32, rotation: f32, color: [f32; 4]) {
    let s = size;
    let rot = Vec2::from_angle(rotation);
    let points = [
        Vec2::new(-s / 2.0, -s / 2.0),
        Vec2::new(s / 2.0, -s / 5.0),
        Vec2::new(s / 2.5, s / 2.0),
        Vec2::new(-s / 5.0, s / 2.5),
    ]
    .map(|p| center + rot.rotate(p));
    polygon(out, &points, color);
}
