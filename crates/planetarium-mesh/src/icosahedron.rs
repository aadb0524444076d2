//! The base icosahedron that planet sections are cut from.

use glam::Vec3;

/// One mesh section per icosahedron face.
pub const NUM_SECTIONS: usize = 20;

/// The 12 corners, not normalised: `(±1, ±t, 0)`, `(0, ±1, ±t)`, `(±t, 0, ±1)`.
pub fn vertices() -> [Vec3; 12] {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    [
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(-t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(t, 0.0, -1.0),
    ]
}

/// Faces in section order, counter-clockwise seen from outside.
pub const FACES: [[u32; 3]; NUM_SECTIONS] = [
    [0, 5, 11],
    [0, 1, 5],
    [0, 7, 1],
    [0, 10, 7],
    [0, 11, 10],
    [1, 9, 5],
    [5, 4, 11],
    [11, 2, 10],
    [10, 6, 7],
    [7, 8, 1],
    [3, 4, 9],
    [3, 2, 4],
    [3, 6, 2],
    [3, 8, 6],
    [3, 9, 8],
    [4, 5, 9],
    [2, 11, 4],
    [6, 10, 2],
    [8, 7, 6],
    [9, 1, 8],
];

/// Unit-sphere corners of one face.
pub fn face_corners(section: usize) -> [Vec3; 3] {
    let verts = vertices();
    FACES[section].map(|i| verts[i as usize].normalize())
}
