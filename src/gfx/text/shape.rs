//! Glyph outlines: command parsing, curve flattening and hole detection

use std::str::SplitWhitespace;

/// 2D point in layout space
pub type Point = [f64; 2];

/// Line segments per quadratic or cubic curve
pub const CURVE_SEGMENTS: usize = 12;

const EPSILON: f64 = 1e-9;

/// One filled region with the holes cut out of it
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub outer: Vec<Point>,
    pub holes: Vec<Vec<Point>>,
}

/// Parses a typeface outline into closed contours
///
/// Coordinates are mapped through `p * scale + offset`. Parsing stops at the
/// first malformed command and keeps the contours read so far.
pub fn parse_outline(outline: &str, scale: f64, offset: Point) -> Vec<Vec<Point>> {
    let mut tokens = outline.split_whitespace();
    let mut contours = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut pen: Point = offset;

    while let Some(command) = tokens.next() {
        match command {
            "m" => {
                let Some(p) = read_point(&mut tokens, scale, offset) else {
                    break;
                };
                close_contour(&mut contours, &mut current);
                current.push(p);
                pen = p;
            }
            "l" => {
                let Some(p) = read_point(&mut tokens, scale, offset) else {
                    break;
                };
                if current.is_empty() {
                    current.push(pen);
                }
                current.push(p);
                pen = p;
            }
            "q" => {
                // End point first, then the control point
                let (Some(end), Some(control)) = (
                    read_point(&mut tokens, scale, offset),
                    read_point(&mut tokens, scale, offset),
                ) else {
                    break;
                };
                if current.is_empty() {
                    current.push(pen);
                }
                for step in 1..=CURVE_SEGMENTS {
                    let t = step as f64 / CURVE_SEGMENTS as f64;
                    current.push(quadratic(pen, control, end, t));
                }
                pen = end;
            }
            "b" => {
                let (Some(end), Some(c1), Some(c2)) = (
                    read_point(&mut tokens, scale, offset),
                    read_point(&mut tokens, scale, offset),
                    read_point(&mut tokens, scale, offset),
                ) else {
                    break;
                };
                if current.is_empty() {
                    current.push(pen);
                }
                for step in 1..=CURVE_SEGMENTS {
                    let t = step as f64 / CURVE_SEGMENTS as f64;
                    current.push(cubic(pen, c1, c2, end, t));
                }
                pen = end;
            }
            "z" => close_contour(&mut contours, &mut current),
            other => {
                log::warn!("Unknown outline command {:?}", other);
                break;
            }
        }
    }

    close_contour(&mut contours, &mut current);
    contours
}

fn read_point(tokens: &mut SplitWhitespace<'_>, scale: f64, offset: Point) -> Option<Point> {
    let x: f64 = tokens.next()?.parse().ok()?;
    let y: f64 = tokens.next()?.parse().ok()?;
    Some([x * scale + offset[0], y * scale + offset[1]])
}

fn close_contour(contours: &mut Vec<Vec<Point>>, current: &mut Vec<Point>) {
    let mut contour = std::mem::take(current);
    contour.dedup_by(|a, b| same_point(*a, *b));
    if contour.len() > 1 && same_point(contour[0], contour[contour.len() - 1]) {
        contour.pop();
    }
    if contour.len() >= 3 {
        contours.push(contour);
    }
}

fn quadratic(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let k = 1.0 - t;
    [
        k * k * p0[0] + 2.0 * k * t * p1[0] + t * t * p2[0],
        k * k * p0[1] + 2.0 * k * t * p1[1] + t * t * p2[1],
    ]
}

fn cubic(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let k = 1.0 - t;
    let (a, b, c, d) = (k * k * k, 3.0 * k * k * t, 3.0 * k * t * t, t * t * t);
    [
        a * p0[0] + b * p1[0] + c * p2[0] + d * p3[0],
        a * p0[1] + b * p1[1] + c * p2[1] + d * p3[1],
    ]
}

pub fn same_point(a: Point, b: Point) -> bool {
    (a[0] - b[0]).abs() <= EPSILON && (a[1] - b[1]).abs() <= EPSILON
}

/// Shoelace area; positive for counter-clockwise contours
pub fn signed_area(contour: &[Point]) -> f64 {
    let n = contour.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let a = contour[i];
            let b = contour[(i + 1) % n];
            a[0] * b[1] - b[0] * a[1]
        })
        .sum();
    twice * 0.5
}

/// Returns the contour wound counter-clockwise (`ccw`) or clockwise
pub fn with_orientation(contour: &[Point], ccw: bool) -> Vec<Point> {
    let mut out = contour.to_vec();
    if (signed_area(&out) > 0.0) != ccw {
        out.reverse();
    }
    out
}

/// Even-odd point in polygon test
pub fn contains_point(polygon: &[Point], p: Point) -> bool {
    let n = polygon.len();
    let mut inside = false;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        if (a[1] > p[1]) != (b[1] > p[1]) {
            let x = a[0] + (p[1] - a[1]) * (b[0] - a[0]) / (b[1] - a[1]);
            if p[0] < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Groups contours into solids and holes
///
/// The largest contour sets the solid winding. Each hole goes to the
/// smallest solid containing it; a hole with no container becomes a solid.
pub fn classify(contours: Vec<Vec<Point>>) -> Vec<Shape> {
    let areas: Vec<f64> = contours.iter().map(|c| signed_area(c)).collect();
    let Some(largest) = (0..contours.len())
        .filter(|&i| areas[i].abs() > EPSILON)
        .max_by(|&a, &b| areas[a].abs().total_cmp(&areas[b].abs()))
    else {
        return Vec::new();
    };
    let solid_is_ccw = areas[largest] > 0.0;

    let (solid_ids, hole_ids): (Vec<usize>, Vec<usize>) = (0..contours.len())
        .filter(|&i| areas[i].abs() > EPSILON)
        .partition(|&i| (areas[i] > 0.0) == solid_is_ccw);

    let mut shapes: Vec<Shape> = solid_ids
        .iter()
        .map(|&i| Shape {
            outer: contours[i].clone(),
            holes: Vec::new(),
        })
        .collect();

    for h in hole_ids {
        let probe = contours[h][0];
        let owner = solid_ids
            .iter()
            .enumerate()
            .filter(|&(_, &s)| contains_point(&contours[s], probe))
            .min_by(|&(_, &a), &(_, &b)| areas[a].abs().total_cmp(&areas[b].abs()))
            .map(|(k, _)| k);

        match owner {
            Some(k) => shapes[k].holes.push(contours[h].clone()),
            None => shapes.push(Shape {
                outer: contours[h].clone(),
                holes: Vec::new(),
            }),
        }
    }

    shapes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closing_duplicate_is_dropped() {
        let contours = parse_outline("m 0 0 l 10 0 l 10 10 l 0 0", 1.0, [0.0, 0.0]);
        assert_eq!(contours, vec![vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]]);
    }

    #[test]
    fn test_scale_and_offset() {
        let contours = parse_outline("m 0 0 l 100 0 l 100 100", 0.5, [2.0, 1.0]);
        assert_eq!(contours[0][1], [52.0, 1.0]);
        assert_eq!(contours[0][2], [52.0, 51.0]);
    }

    #[test]
    fn test_quadratic_end_point_comes_first() {
        // Curve to (10,0) with control above the chord
        let contours = parse_outline("m 0 0 q 10 0 5 10 l 5 -5", 1.0, [0.0, 0.0]);
        let contour = &contours[0];
        assert_eq!(contour.len(), 1 + CURVE_SEGMENTS + 1);
        assert_eq!(contour[CURVE_SEGMENTS], [10.0, 0.0]);
        // Midpoint of the curve is halfway up to the control point
        let mid = contour[CURVE_SEGMENTS / 2];
        assert!((mid[0] - 5.0).abs() < 1e-9 && (mid[1] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_cubic_flattening() {
        let contours = parse_outline("m 0 0 b 30 0 10 10 20 10 l 15 -10", 1.0, [0.0, 0.0]);
        assert_eq!(contours[0].len(), 1 + CURVE_SEGMENTS + 1);
        assert_eq!(contours[0][CURVE_SEGMENTS], [30.0, 0.0]);
    }

    #[test]
    fn test_truncated_command_keeps_prior_contours() {
        let contours = parse_outline("m 0 0 l 1 0 l 1 1 m 5 5 l 6", 1.0, [0.0, 0.0]);
        assert_eq!(contours.len(), 1);
    }

    #[test]
    fn test_hole_assigned_to_smallest_container() {
        let big = vec![[0.0, 0.0], [100.0, 0.0], [100.0, 100.0], [0.0, 100.0]];
        let small = vec![[10.0, 10.0], [50.0, 10.0], [50.0, 50.0], [10.0, 50.0]];
        let hole = with_orientation(
            &[[20.0, 20.0], [30.0, 20.0], [30.0, 30.0], [20.0, 30.0]],
            false,
        );
        let shapes = classify(vec![big.clone(), small.clone(), hole.clone()]);

        assert_eq!(shapes.len(), 2);
        assert!(shapes[0].holes.is_empty());
        assert_eq!(shapes[1].outer, small);
        assert_eq!(shapes[1].holes, vec![hole]);
    }

    #[test]
    fn test_clockwise_fonts_are_supported() {
        // Solid wound clockwise, hole counter-clockwise
        let outer = with_orientation(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]], false);
        let hole = with_orientation(&[[3.0, 3.0], [6.0, 3.0], [6.0, 6.0], [3.0, 6.0]], true);
        let shapes = classify(vec![outer, hole]);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].holes.len(), 1);
    }

    #[test]
    fn test_orphan_hole_becomes_solid() {
        let outer = vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        let stray = with_orientation(&[[20.0, 0.0], [22.0, 0.0], [22.0, 2.0], [20.0, 2.0]], false);
        let shapes = classify(vec![outer, stray]);
        assert_eq!(shapes.len(), 2);
        assert!(shapes.iter().all(|s| s.holes.is_empty()));
    }
}
