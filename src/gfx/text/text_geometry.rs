//! Extruded text meshes

use crate::gfx::geometry::GeometryData;

use super::{
    font::Font,
    shape::{classify, parse_outline, with_orientation, Point, Shape},
    triangulate::triangulate,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextOptions {
    /// Em size in world units
    pub size: f32,
    /// Extrusion along +Z
    pub depth: f32,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            size: 0.5,
            depth: 0.1,
        }
    }
}

/// Lays out `text` with `font` and extrudes it into a closed mesh
///
/// The origin is the left end of the first baseline. The back cap lies at
/// z = 0 and the front cap at z = depth.
pub fn generate_text(font: &Font, text: &str, options: &TextOptions) -> GeometryData {
    let mut geometry = GeometryData::new();
    let scale = (options.size / font.resolution) as f64;
    let line_height = font.line_height(options.size) as f64;

    let mut pen: Point = [0.0, 0.0];
    for ch in text.chars() {
        if ch == '\n' {
            pen = [0.0, pen[1] - line_height];
            continue;
        }

        let Some(glyph) = font.glyph_or_fallback(ch) else {
            log::warn!("Skipping {:?}: font has no fallback glyph", ch);
            continue;
        };

        if let Some(outline) = &glyph.o {
            for shape in classify(parse_outline(outline, scale, pen)) {
                extrude_shape(&mut geometry, &shape, options.depth);
            }
        }
        pen[0] += glyph.ha as f64 * scale;
    }

    geometry
}

fn extrude_shape(geometry: &mut GeometryData, shape: &Shape, depth: f32) {
    let outer = with_orientation(&shape.outer, true);
    let holes: Vec<Vec<Point>> = shape
        .holes
        .iter()
        .map(|hole| with_orientation(hole, false))
        .collect();

    let (points, triangles) = triangulate(&outer, &holes);

    // Back cap faces -Z, so its triangles are reversed
    let back = geometry.vertex_count() as u32;
    for p in &points {
        let (x, y) = (p[0] as f32, p[1] as f32);
        geometry.push_vertex([x, y, 0.0], [0.0, 0.0, -1.0], [x, y]);
    }
    for [a, b, c] in &triangles {
        geometry.indices.extend_from_slice(&[back + a, back + c, back + b]);
    }

    let front = geometry.vertex_count() as u32;
    for p in &points {
        let (x, y) = (p[0] as f32, p[1] as f32);
        geometry.push_vertex([x, y, depth], [0.0, 0.0, 1.0], [x, y]);
    }
    for [a, b, c] in &triangles {
        geometry.indices.extend_from_slice(&[front + a, front + b, front + c]);
    }

    for contour in std::iter::once(&outer).chain(holes.iter()) {
        extrude_walls(geometry, contour, depth);
    }
}

/// Side quads with flat normals pointing away from the solid
fn extrude_walls(geometry: &mut GeometryData, contour: &[Point], depth: f32) {
    let n = contour.len();
    for i in 0..n {
        let p0 = contour[i];
        let p1 = contour[(i + 1) % n];
        let (dx, dy) = (p1[0] - p0[0], p1[1] - p0[1]);
        let length = (dx * dx + dy * dy).sqrt();
        if length <= f64::EPSILON {
            continue;
        }
        let normal = [(dy / length) as f32, (-dx / length) as f32, 0.0];

        let (x0, y0) = (p0[0] as f32, p0[1] as f32);
        let (x1, y1) = (p1[0] as f32, p1[1] as f32);
        let a = geometry.push_vertex([x0, y0, 0.0], normal, [0.0, 0.0]);
        let b = geometry.push_vertex([x1, y1, 0.0], normal, [1.0, 0.0]);
        let c = geometry.push_vertex([x1, y1, depth], normal, [1.0, 1.0]);
        let d = geometry.push_vertex([x0, y0, depth], normal, [0.0, 1.0]);
        geometry.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::text::font::tests::TEST_FONT;

    fn font() -> Font {
        Font::from_json(TEST_FONT).unwrap()
    }

    /// Sum of the front cap's projected area
    fn front_area(geometry: &GeometryData, depth: f32) -> f32 {
        geometry
            .indices
            .chunks(3)
            .map(|t| t.iter().map(|&i| geometry.vertices[i as usize]).collect::<Vec<_>>())
            // Wall triangles always touch z = 0
            .filter(|v| v.iter().all(|p| p[2] == depth))
            .map(|v| {
                ((v[1][0] - v[0][0]) * (v[2][1] - v[0][1]) - (v[1][1] - v[0][1]) * (v[2][0] - v[0][0]))
                    * 0.5
            })
            .sum()
    }

    #[test]
    fn test_depth_extent() {
        let options = TextOptions::default();
        let geometry = generate_text(&font(), "IO", &options);
        let (min, max) = geometry.bounds().unwrap();
        assert_eq!(min[2], 0.0);
        assert_eq!(max[2], options.depth);
        assert!(geometry.triangle_count() > 0);
    }

    #[test]
    fn test_glyph_advance_and_scale() {
        // "I" is 50 units wide, advance 60, so "II" spans 110 units
        let geometry = generate_text(&font(), "II", &TextOptions { size: 1.0, depth: 0.1 });
        let (min, max) = geometry.bounds().unwrap();
        assert!((min[0] - 0.0).abs() < 1e-6);
        assert!((max[0] - 1.1).abs() < 1e-6);
        assert!((max[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_hole_is_cut_from_caps() {
        let depth = 0.1;
        let geometry = generate_text(&font(), "O", &TextOptions { size: 1.0, depth });
        // 1.0 x 1.0 square minus a 0.4 x 0.4 hole
        assert!((front_area(&geometry, depth) - 0.84).abs() < 1e-4);
    }

    #[test]
    fn test_missing_glyph_uses_question_mark() {
        let options = TextOptions { size: 1.0, depth: 0.1 };
        let fallback = generate_text(&font(), "Z", &options);
        let question = generate_text(&font(), "?", &options);
        assert_eq!(fallback.vertices, question.vertices);
        assert_eq!(fallback.indices, question.indices);
    }

    #[test]
    fn test_newline_moves_down_one_line() {
        let options = TextOptions { size: 1.0, depth: 0.1 };
        let geometry = generate_text(&font(), "I\nI", &options);
        let (min, _) = geometry.bounds().unwrap();
        let line_height = font().line_height(1.0);
        assert!((min[1] + line_height).abs() < 1e-6);
        assert!(min[0].abs() < 1e-6);
    }

    #[test]
    fn test_side_walls_face_outward() {
        let geometry = generate_text(&font(), "I", &TextOptions { size: 1.0, depth: 0.1 });
        for (v, n) in geometry.vertices.iter().zip(&geometry.normals) {
            if n[2] != 0.0 {
                continue;
            }
            // Walls of the 0.5 square: normals point away from its centre
            let to_vertex = [v[0] - 0.25, v[1] - 0.25];
            assert!(to_vertex[0] * n[0] + to_vertex[1] * n[1] > 0.0);
        }
    }
}
