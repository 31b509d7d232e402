//! Procedural geometry: the shared low-poly solid and the particle cloud.

use glam::Vec3;
use rand::prelude::*;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Flat-shaded unit icosahedron: 20 faces, 3 vertices each, per-face normals.
pub fn icosahedron() -> Vec<MeshVertex> {
    let t = (1.0 + 5.0_f32.sqrt()) * 0.5;
    let corners: [Vec3; 12] = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ];
    const FACES: [[usize; 3]; 20] = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    let mut out = Vec::with_capacity(FACES.len() * 3);
    for [a, b, c] in FACES {
        let (pa, pb, pc) = (
            corners[a].normalize(),
            corners[b].normalize(),
            corners[c].normalize(),
        );
        let n = (pb - pa).cross(pc - pa).normalize();
        for p in [pa, pb, pc] {
            out.push(MeshVertex {
                position: p.to_array(),
                normal: n.to_array(),
            });
        }
    }
    out
}

/// `count` points uniformly distributed in a box of `extents`, centered on
/// the origin. Seeded so a layout is reproducible.
pub fn particle_positions(count: usize, extents: [f32; 3], seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    let half = Vec3::from_array(extents) * 0.5;
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-half.x..=half.x),
                rng.gen_range(-half.y..=half.y),
                rng.gen_range(-half.z..=half.z),
            )
        })
        .collect()
}
