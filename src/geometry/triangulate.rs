//! Ear-clipping triangulation of simple polygons with holes.
//!
//! Holes are spliced into the outer contour through a bridge edge
//! (rightmost hole vertex to the nearest mutually visible outer vertex),
//! producing one weakly simple polygon that is then ear-clipped.

use glam::Vec2;

const EPSILON: f32 = 1e-9;

/// Signed area, positive for counter-clockwise contours
pub fn signed_area(contour: &[Vec2]) -> f32 {
    let n = contour.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let a = contour[i];
        let b = contour[(i + 1) % n];
        area += a.x * b.y - b.x * a.y;
    }
    area * 0.5
}

pub fn is_clockwise(contour: &[Vec2]) -> bool {
    signed_area(contour) < 0.0
}

/// Even-odd point containment
pub fn contains_point(contour: &[Vec2], p: Vec2) -> bool {
    let n = contour.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (a, b) = (contour[i], contour[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Triangulate `contour` minus `holes`.
///
/// Returned indices address the concatenation `contour ++ holes[0] ++ holes[1] ...`
/// and every triangle is counter-clockwise. Input orientation does not
/// matter; the outer contour is treated as CCW and holes as CW.
pub fn triangulate(contour: &[Vec2], holes: &[Vec<Vec2>]) -> Vec<[u32; 3]> {
    if contour.len() < 3 {
        return Vec::new();
    }

    let mut points: Vec<Vec2> = contour.to_vec();
    let mut ring: Vec<usize> = (0..contour.len()).collect();
    if is_clockwise(contour) {
        ring.reverse();
    }

    let mut hole_rings: Vec<Vec<usize>> = Vec::with_capacity(holes.len());
    for hole in holes.iter().filter(|h| h.len() >= 3) {
        let start = points.len();
        points.extend_from_slice(hole);
        let mut h: Vec<usize> = (start..start + hole.len()).collect();
        if !is_clockwise(hole) {
            h.reverse();
        }
        hole_rings.push(h);
    }

    // Rightmost holes first so later bridges can pass around earlier ones
    hole_rings.sort_by(|a, b| max_x(&points, b).total_cmp(&max_x(&points, a)));
    for (k, hole) in hole_rings.iter().enumerate() {
        ring = bridge_hole(&points, ring, hole, &hole_rings[k + 1..]);
    }

    ear_clip(&points, ring)
}

fn max_x(points: &[Vec2], ring: &[usize]) -> f32 {
    ring.iter()
        .map(|&i| points[i].x)
        .fold(f32::NEG_INFINITY, f32::max)
}

fn bridge_hole(points: &[Vec2], ring: Vec<usize>, hole: &[usize], pending: &[Vec<usize>]) -> Vec<usize> {
    let Some(hole_start) = (0..hole.len()).max_by(|&a, &b| points[hole[a]].x.total_cmp(&points[hole[b]].x)) else {
        return ring;
    };
    let m = points[hole[hole_start]];

    let mut candidates: Vec<usize> = (0..ring.len()).collect();
    candidates.sort_by(|&a, &b| {
        let da = points[ring[a]].distance_squared(m);
        let db = points[ring[b]].distance_squared(m);
        da.total_cmp(&db)
    });

    let visible = |slot: usize| {
        let p = points[ring[slot]];
        let crosses_ring = (0..ring.len()).any(|i| {
            let (a, b) = (points[ring[i]], points[ring[(i + 1) % ring.len()]]);
            segments_cross(m, p, a, b)
        });
        let crosses_hole = |h: &[usize]| {
            (0..h.len()).any(|i| segments_cross(m, p, points[h[i]], points[h[(i + 1) % h.len()]]))
        };
        !crosses_ring && !crosses_hole(hole) && !pending.iter().any(|h| crosses_hole(h))
    };

    let slot = candidates
        .iter()
        .copied()
        .find(|&slot| visible(slot))
        .unwrap_or(candidates[0]);

    let mut merged = Vec::with_capacity(ring.len() + hole.len() + 2);
    merged.extend_from_slice(&ring[..=slot]);
    for k in 0..=hole.len() {
        merged.push(hole[(hole_start + k) % hole.len()]);
    }
    merged.push(ring[slot]);
    merged.extend_from_slice(&ring[slot + 1..]);
    merged
}

/// Proper intersection only; touching at endpoints does not count
fn segments_cross(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    if p1 == q1 || p1 == q2 || p2 == q1 || p2 == q2 {
        return false;
    }
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);
    ((d1 > EPSILON && d2 < -EPSILON) || (d1 < -EPSILON && d2 > EPSILON))
        && ((d3 > EPSILON && d4 < -EPSILON) || (d3 < -EPSILON && d4 > EPSILON))
}

fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a - o).perp_dot(b - o)
}

fn inside_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    cross(a, b, p) > EPSILON && cross(b, c, p) > EPSILON && cross(c, a, p) > EPSILON
}

fn ear_clip(points: &[Vec2], mut ring: Vec<usize>) -> Vec<[u32; 3]> {
    let mut triangles = Vec::with_capacity(ring.len().saturating_sub(2));
    let mut cursor = 0;
    let mut stalled = 0;

    while ring.len() > 3 {
        let n = ring.len();
        let (ip, ic, inx) = ((cursor + n - 1) % n, cursor % n, (cursor + 1) % n);
        let (a, b, c) = (points[ring[ip]], points[ring[ic]], points[ring[inx]]);

        let convex = cross(a, b, c) > EPSILON;
        let is_ear = convex
            && !ring.iter().any(|&k| {
                let p = points[k];
                p != a && p != b && p != c && inside_triangle(p, a, b, c)
            });

        if is_ear {
            triangles.push([ring[ip] as u32, ring[ic] as u32, ring[inx] as u32]);
            ring.remove(ic);
            cursor = ip.min(ring.len() - 1);
            stalled = 0;
            continue;
        }

        stalled += 1;
        if stalled > n {
            // No ear left: the remainder is degenerate (collinear or
            // self-touching). Drop a flat vertex, or force a clip.
            if cross(a, b, c).abs() <= EPSILON {
                ring.remove(ic);
            } else {
                triangles.push([ring[ip] as u32, ring[ic] as u32, ring[inx] as u32]);
                ring.remove(ic);
            }
            cursor = ip.min(ring.len() - 1);
            stalled = 0;
            continue;
        }
        cursor = (cursor + 1) % n;
    }

    if ring.len() == 3 {
        let (a, b, c) = (points[ring[0]], points[ring[1]], points[ring[2]]);
        if cross(a, b, c).abs() > EPSILON {
            triangles.push([ring[0] as u32, ring[1] as u32, ring[2] as u32]);
        }
    }
    triangles
}
