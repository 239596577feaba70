//! Ear clipping for polygons with holes
//!
//! Holes are joined to the outer contour through bridge edges, turning the
//! shape into a single weakly simple polygon that is then clipped ear by ear.

use super::shape::{same_point, with_orientation, Point};

const EPSILON: f64 = 1e-12;

fn cross(a: Point, b: Point, c: Point) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

fn in_triangle(a: Point, b: Point, c: Point, p: Point) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

/// Triangulates `outer` minus `holes`
///
/// Returns the vertex list and counter-clockwise triangles indexing it.
/// Input winding does not matter. The loop always terminates; degenerate
/// input may leave part of the area uncovered.
pub fn triangulate(outer: &[Point], holes: &[Vec<Point>]) -> (Vec<Point>, Vec<[u32; 3]>) {
    let mut points = with_orientation(outer, true);
    let mut ring: Vec<usize> = (0..points.len()).collect();

    // Rightmost vertex of every hole, bridged right to left
    let mut pending: Vec<(Vec<usize>, usize)> = Vec::with_capacity(holes.len());
    for hole in holes.iter().filter(|h| h.len() >= 3) {
        let start = points.len();
        points.extend(with_orientation(hole, false));
        let indices: Vec<usize> = (start..points.len()).collect();
        let rightmost = (0..indices.len())
            .max_by(|&a, &b| points[indices[a]][0].total_cmp(&points[indices[b]][0]))
            .unwrap_or(0);
        pending.push((indices, rightmost));
    }
    pending.sort_by(|(a, ma), (b, mb)| points[b[*mb]][0].total_cmp(&points[a[*ma]][0]));

    for (indices, rightmost) in pending {
        let Some(bridge) = find_bridge(&points, &ring, indices[rightmost]) else {
            log::debug!("No bridge found for hole, skipping it");
            continue;
        };
        let mut spliced = Vec::with_capacity(ring.len() + indices.len() + 2);
        spliced.extend_from_slice(&ring[..=bridge]);
        spliced.extend_from_slice(&indices[rightmost..]);
        spliced.extend_from_slice(&indices[..=rightmost]);
        spliced.extend_from_slice(&ring[bridge..]);
        ring = spliced;
    }

    let triangles = clip_ears(&points, ring);
    (points, triangles)
}

/// Finds the ring position visible from hole vertex `m` along +x
fn find_bridge(points: &[Point], ring: &[usize], m: usize) -> Option<usize> {
    let hole_point = points[m];
    let n = ring.len();

    let mut nearest_x = f64::INFINITY;
    let mut candidate = None;
    for k in 0..n {
        let a = points[ring[k]];
        let b = points[ring[(k + 1) % n]];
        // Only upward edges can be hit from inside a counter-clockwise ring
        if a[1] <= hole_point[1] && hole_point[1] <= b[1] && a[1] < b[1] {
            let x = a[0] + (hole_point[1] - a[1]) * (b[0] - a[0]) / (b[1] - a[1]);
            if x >= hole_point[0] && x < nearest_x {
                nearest_x = x;
                candidate = Some(if a[0] > b[0] { k } else { (k + 1) % n });
            }
        }
    }

    let candidate = candidate?;
    let hit = [nearest_x, hole_point[1]];
    let end = points[ring[candidate]];
    if same_point(hit, end) {
        return Some(facing_copy(points, ring, candidate, hole_point));
    }

    // A reflex vertex inside (M, hit, end) would block the bridge; take the
    // one closest in angle to the ray instead
    let (t0, t1, t2) = if cross(hole_point, hit, end) < 0.0 {
        (hole_point, end, hit)
    } else {
        (hole_point, hit, end)
    };

    let mut best = candidate;
    let mut best_tan = f64::INFINITY;
    let mut best_dist = f64::INFINITY;
    for k in 0..n {
        let p = points[ring[k]];
        if k == candidate
            || same_point(p, end)
            || p[0] <= hole_point[0]
            || !in_triangle(t0, t1, t2, p)
        {
            continue;
        }
        let prev = points[ring[(k + n - 1) % n]];
        let next = points[ring[(k + 1) % n]];
        if cross(prev, p, next) > 0.0 {
            continue;
        }
        let dx = p[0] - hole_point[0];
        let dy = p[1] - hole_point[1];
        let tan = dy.abs() / dx;
        let dist = dx * dx + dy * dy;
        if tan < best_tan || (tan == best_tan && dist < best_dist) {
            best = k;
            best_tan = tan;
            best_dist = dist;
        }
    }

    Some(facing_copy(points, ring, best, hole_point))
}

/// Whether `target` lies inside the interior corner at ring position `k`
fn locally_inside(points: &[Point], ring: &[usize], k: usize, target: Point) -> bool {
    let n = ring.len();
    let prev = points[ring[(k + n - 1) % n]];
    let p = points[ring[k]];
    let next = points[ring[(k + 1) % n]];
    if cross(prev, p, next) >= 0.0 {
        cross(p, next, target) >= 0.0 && cross(prev, p, target) >= 0.0
    } else {
        cross(p, next, target) >= 0.0 || cross(prev, p, target) >= 0.0
    }
}

/// Vertices already used by a bridge appear twice in the ring. Picks the
/// copy whose corner opens towards `target`.
fn facing_copy(points: &[Point], ring: &[usize], k: usize, target: Point) -> usize {
    let p = points[ring[k]];
    (0..ring.len())
        .find(|&j| same_point(points[ring[j]], p) && locally_inside(points, ring, j, target))
        .unwrap_or(k)
}

fn clip_ears(points: &[Point], mut ring: Vec<usize>) -> Vec<[u32; 3]> {
    let mut triangles = Vec::with_capacity(ring.len().saturating_sub(2));
    let corner = |ring: &[usize], i: usize| {
        let n = ring.len();
        (ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n])
    };

    let mut i = 0;
    let mut misses = 0;
    while ring.len() > 3 {
        let n = ring.len();
        i %= n;
        let (a, b, c) = corner(&ring, i);
        let turn = cross(points[a], points[b], points[c]);

        if turn.abs() <= EPSILON {
            // Collinear or spike vertex: no area to cover
            ring.remove(i);
            misses = 0;
            continue;
        }

        if turn > 0.0 && is_ear(points, &ring, i) {
            triangles.push([a as u32, b as u32, c as u32]);
            ring.remove(i);
            misses = 0;
            continue;
        }

        i += 1;
        misses += 1;
        if misses >= n {
            // No clean ear left; clip the most convex corner so we finish
            let k = (0..n)
                .max_by(|&x, &y| {
                    let (xa, xb, xc) = corner(&ring, x);
                    let (ya, yb, yc) = corner(&ring, y);
                    cross(points[xa], points[xb], points[xc])
                        .total_cmp(&cross(points[ya], points[yb], points[yc]))
                })
                .unwrap_or(0);
            let (a, b, c) = corner(&ring, k);
            if cross(points[a], points[b], points[c]) > EPSILON {
                triangles.push([a as u32, b as u32, c as u32]);
            }
            ring.remove(k);
            misses = 0;
        }
    }

    if let [a, b, c] = ring[..] {
        if cross(points[a], points[b], points[c]) > EPSILON {
            triangles.push([a as u32, b as u32, c as u32]);
        }
    }

    triangles
}

fn is_ear(points: &[Point], ring: &[usize], i: usize) -> bool {
    let n = ring.len();
    let (ia, ic) = ((i + n - 1) % n, (i + 1) % n);
    let (a, b, c) = (points[ring[ia]], points[ring[i]], points[ring[ic]]);

    (0..n)
        .filter(|&k| k != ia && k != i && k != ic)
        .filter(|&k| {
            let p = points[ring[k]];
            // Bridge endpoints appear twice; their copies do not block the ear
            !same_point(p, a) && !same_point(p, b) && !same_point(p, c) && in_triangle(a, b, c, p)
        })
        // Only reflex or flat corners can block
        .all(|k| {
            let prev = points[ring[(k + n - 1) % n]];
            let next = points[ring[(k + 1) % n]];
            cross(prev, points[ring[k]], next) > 0.0
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::text::shape::signed_area;

    fn covered_area(points: &[Point], triangles: &[[u32; 3]]) -> f64 {
        triangles
            .iter()
            .map(|t| {
                let [a, b, c] = t.map(|i| points[i as usize]);
                let area = cross(a, b, c) * 0.5;
                assert!(area > 0.0, "triangle is not counter-clockwise");
                area
            })
            .sum()
    }

    fn circle(cx: f64, cy: f64, r: f64, n: usize) -> Vec<Point> {
        (0..n)
            .map(|k| {
                let a = std::f64::consts::TAU * k as f64 / n as f64;
                [cx + r * a.cos(), cy + r * a.sin()]
            })
            .collect()
    }

    #[test]
    fn test_square() {
        let square = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        let (points, triangles) = triangulate(&square, &[]);
        assert_eq!(triangles.len(), 2);
        assert!((covered_area(&points, &triangles) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_clockwise_input_is_normalised() {
        let square = [[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]];
        let (points, triangles) = triangulate(&square, &[]);
        assert!((covered_area(&points, &triangles) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_square_with_square_hole() {
        let outer = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        let hole = vec![[3.0, 3.0], [7.0, 3.0], [7.0, 7.0], [3.0, 7.0]];
        let (points, triangles) = triangulate(&outer, &[hole]);
        assert_eq!(triangles.len(), 8);
        assert!((covered_area(&points, &triangles) - 84.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_holes() {
        let outer = [[0.0, 0.0], [6.0, 0.0], [6.0, 10.0], [0.0, 10.0]];
        let lower = vec![[1.0, 1.0], [5.0, 1.0], [5.0, 4.0], [1.0, 4.0]];
        let upper = vec![[1.0, 6.0], [5.0, 6.0], [5.0, 9.0], [1.0, 9.0]];
        let (points, triangles) = triangulate(&outer, &[lower, upper]);
        assert!((covered_area(&points, &triangles) - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_ring_with_offset_hole() {
        let outer = circle(0.0, 0.0, 10.0, 48);
        let hole = circle(0.5, 0.0, 5.0, 48);
        let expected = signed_area(&outer) - signed_area(&hole);
        let (points, triangles) = triangulate(&outer, &[hole]);
        assert!((covered_area(&points, &triangles) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_hole_bridged_onto_earlier_bridge() {
        // The third hole's ray hits the vertex the second hole already bridged to
        let outer = [[0.0, 0.0], [8.0, 0.0], [8.0, 6.0], [0.0, 6.0]];
        let holes = vec![
            vec![[6.0, 2.0], [7.0, 2.0], [7.0, 4.0], [6.0, 4.0]],
            vec![[2.0, 2.0], [4.0, 3.0], [2.0, 3.0]],
            vec![[3.0, 4.0], [4.0, 4.0], [4.0, 5.0]],
        ];
        let expected =
            signed_area(&outer) - holes.iter().map(|h| signed_area(h).abs()).sum::<f64>();
        let (points, triangles) = triangulate(&outer, &holes);
        assert!((expected - 44.5).abs() < 1e-9);
        assert!((covered_area(&points, &triangles) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_bridge_keeps_hole() {
        // The first bridge runs along the same line as one of the hole's edges
        let outer = [[0.0, 0.0], [8.0, 0.0], [8.0, 8.0], [0.0, 8.0]];
        let holes = vec![
            vec![[1.0, 1.0], [4.0, 4.0], [1.0, 7.0]],
            vec![[6.0, 2.0], [6.0, 5.0], [5.0, 5.0]],
        ];
        let (points, triangles) = triangulate(&outer, &holes);
        assert!((covered_area(&points, &triangles) - 53.5).abs() < 1e-9);
    }

    #[test]
    fn test_scattered_holes_cover_exact_area() {
        let outer = [[0.0, 0.0], [8.0, 0.0], [8.0, 10.0], [0.0, 10.0]];
        let holes = vec![
            vec![[4.0, 7.0], [5.0, 8.0], [4.0, 8.0]],
            vec![[7.0, 7.0], [7.0, 9.0], [6.0, 9.0]],
            vec![[1.0, 5.0], [6.0, 5.5], [1.0, 6.0]],
        ];
        let (points, triangles) = triangulate(&outer, &holes);
        assert!((covered_area(&points, &triangles) - 76.0).abs() < 1e-9);
    }

    #[test]
    fn test_concave_outline_with_hole() {
        let outer = [
            [0.0, 0.0],
            [9.0, 0.0],
            [9.0, 9.0],
            [6.0, 9.0],
            [6.0, 3.0],
            [3.0, 3.0],
            [3.0, 9.0],
            [0.0, 9.0],
        ];
        let hole = vec![[1.0, 4.0], [2.0, 4.0], [2.0, 8.0], [1.0, 8.0]];
        let (points, triangles) = triangulate(&outer, &[hole]);
        assert!((covered_area(&points, &triangles) - 59.0).abs() < 1e-9);
    }
}
