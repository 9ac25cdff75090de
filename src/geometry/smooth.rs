//! Weighted moving-average smoothing with a triangular kernel.

use super::point::{CanvasLayout, Point};

/// Symmetric smoothing window: the centre point plus two neighbors per side.
const WINDOW_SIZE: usize = 5;

/// Smooth a point sequence by recomputing each interior point as a weighted
/// average of its neighbors.
///
/// Weights follow a triangular kernel, `1 - |offset| / WINDOW_SIZE`, so the
/// centre point dominates and the denominator never reaches zero inside the
/// window. The first and last points are never recomputed. Every output
/// point is clamped into the canvas bounds. Inputs shorter than 3 points are
/// returned unchanged.
pub fn smooth_points(points: &[Point], layout: CanvasLayout) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let radius = WINDOW_SIZE / 2;
    let last = points.len() - 1;
    let mut smoothed = Vec::with_capacity(points.len());
    smoothed.push(points[0]);

    for i in 1..last {
        let start = i.saturating_sub(radius);
        let end = (i + radius).min(last);

        let mut sum_x = 0.0f32;
        let mut sum_y = 0.0f32;
        let mut total_weight = 0.0f32;

        for (j, p) in points.iter().enumerate().take(end + 1).skip(start) {
            let offset = (i as f32 - j as f32).abs();
            let weight = 1.0 - offset / WINDOW_SIZE as f32;
            sum_x += p.x * weight;
            sum_y += p.y * weight;
            total_weight += weight;
        }

        smoothed.push(Point {
            x: sum_x / total_weight,
            y: sum_y / total_weight,
            width: points[i].width,
        });
    }

    smoothed.push(points[last]);

    for p in &mut smoothed {
        *p = layout.clamp(*p);
    }
    smoothed
}
