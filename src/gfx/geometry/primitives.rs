//! # Primitive Shape Generation
//!
//! All shapes are generated with outward normals and texture coordinates.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a plane in the XY plane centred at the origin
///
/// # Arguments
/// * `width` - Size along X
/// * `height` - Size along Y
/// * `width_segments` - Number of subdivisions along width
/// * `height_segments` - Number of subdivisions along height
///
/// The normal points along +Z. Rotate the owning object to lay it flat.
pub fn generate_plane(
    width: f32,
    height: f32,
    width_segments: u32,
    height_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for y in 0..=h_segs {
        let v = y as f32 / h_segs as f32;
        let pos_y = (v - 0.5) * height;

        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.push_vertex([pos_x, pos_y, 0.0], [0.0, 0.0, 1.0], [u, v]);
        }
    }

    for y in 0..h_segs {
        for x in 0..w_segs {
            let i = y * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            data.indices.extend_from_slice(&[i, i + 1, next_row]);
            data.indices.extend_from_slice(&[i + 1, next_row + 1, next_row]);
        }
    }

    data
}

/// Generate an axis-aligned box centred at the origin
///
/// Each face gets its own four vertices so normals stay flat.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    // (normal, u, v) with u x v == normal, so corners walk counter-clockwise
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let size = [width, height, depth];
    let mut data = GeometryData::new();

    for (normal, u_axis, v_axis) in FACES {
        let base = data.vertices.len() as u32;
        for (su, sv) in CORNERS {
            let mut position = [0.0; 3];
            for axis in 0..3 {
                let unit = normal[axis] + su * u_axis[axis] + sv * v_axis[axis];
                position[axis] = 0.5 * unit * size[axis];
            }
            data.push_vertex(position, normal, [(su + 1.0) * 0.5, (sv + 1.0) * 0.5]);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a cylinder along the Y axis
///
/// # Arguments
/// * `radius_top` - Radius of the cap at `+height / 2`
/// * `radius_bottom` - Radius of the cap at `-height / 2`
/// * `height` - Height of the cylinder
/// * `radial_segments` - Number of segments around the circumference
///
/// A cap with zero radius is omitted, which turns the shape into a cone.
pub fn generate_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = radial_segments.max(3);
    let half_height = height * 0.5;
    let slope = if height.abs() > f32::EPSILON {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };

    // Side: one ring of top and bottom vertices, seam duplicated for UVs
    let side_start = data.vertices.len() as u32;
    for i in 0..=segs {
        let u = i as f32 / segs as f32;
        let theta = u * 2.0 * PI;
        let (sin_t, cos_t) = theta.sin_cos();

        let normal_len = (1.0 + slope * slope).sqrt();
        let normal = [sin_t / normal_len, slope / normal_len, cos_t / normal_len];

        data.push_vertex(
            [radius_top * sin_t, half_height, radius_top * cos_t],
            normal,
            [u, 1.0],
        );
        data.push_vertex(
            [radius_bottom * sin_t, -half_height, radius_bottom * cos_t],
            normal,
            [u, 0.0],
        );
    }

    for i in 0..segs {
        let top = side_start + i * 2;
        let bottom = top + 1;
        let next_top = top + 2;
        let next_bottom = top + 3;

        data.indices.extend_from_slice(&[top, bottom, next_top]);
        data.indices.extend_from_slice(&[bottom, next_bottom, next_top]);
    }

    if radius_top > 0.0 {
        generate_cap(&mut data, radius_top, half_height, segs, true);
    }
    if radius_bottom > 0.0 {
        generate_cap(&mut data, radius_bottom, -half_height, segs, false);
    }

    data
}

fn generate_cap(data: &mut GeometryData, radius: f32, y: f32, segs: u32, top: bool) {
    let normal = if top { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };
    let center = data.push_vertex([0.0, y, 0.0], normal, [0.5, 0.5]);

    for i in 0..=segs {
        let theta = i as f32 / segs as f32 * 2.0 * PI;
        let (sin_t, cos_t) = theta.sin_cos();
        data.push_vertex(
            [radius * sin_t, y, radius * cos_t],
            normal,
            [0.5 + 0.5 * sin_t, 0.5 + 0.5 * cos_t],
        );
    }

    for i in 0..segs {
        let current = center + 1 + i;
        let next = current + 1;
        if top {
            data.indices.extend_from_slice(&[center, current, next]);
        } else {
            data.indices.extend_from_slice(&[center, next, current]);
        }
    }
}

/// Generate a UV sphere centred at the origin
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `width_segments` - Segments around the Y axis (at least 3)
/// * `height_segments` - Segments from pole to pole (at least 2)
///
/// Pole rows emit a single triangle per segment instead of a degenerate quad.
pub fn generate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(3);
    let h_segs = height_segments.max(2);

    for iy in 0..=h_segs {
        let v = iy as f32 / h_segs as f32;
        let theta = v * PI;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for ix in 0..=w_segs {
            let u = ix as f32 / w_segs as f32;
            let phi = u * 2.0 * PI;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let normal = [-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta];
            data.push_vertex(
                [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                normal,
                [u, 1.0 - v],
            );
        }
    }

    let row = w_segs + 1;
    for iy in 0..h_segs {
        for ix in 0..w_segs {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            if iy != 0 {
                data.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != h_segs - 1 {
                data.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    data
}
