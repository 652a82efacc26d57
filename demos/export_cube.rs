//! Build a textured cube and export it to every supported format.
//!
//! Run with: cargo run --example export_cube

use meshport::io;
use meshport::mesh::TriMesh;
use nalgebra::{Point2, Point3};

fn main() {
    let mut mesh = TriMesh::new();

    // Unit cube corners.
    let corners = [
        (0.0, 0.0, 0.0),
        (1.0, 0.0, 0.0),
        (1.0, 1.0, 0.0),
        (0.0, 1.0, 0.0),
        (0.0, 0.0, 1.0),
        (1.0, 0.0, 1.0),
        (1.0, 1.0, 1.0),
        (0.0, 1.0, 1.0),
    ];
    let vs: Vec<_> = corners
        .iter()
        .map(|&(x, y, z)| mesh.add_vertex(Point3::new(x, y, z)))
        .collect();

    // Two triangles per side, outward winding.
    let sides = [
        [0, 2, 1],
        [0, 3, 2], // bottom
        [4, 5, 6],
        [4, 6, 7], // top
        [0, 1, 5],
        [0, 5, 4], // front
        [2, 3, 7],
        [2, 7, 6], // back
        [1, 2, 6],
        [1, 6, 5], // right
        [3, 0, 4],
        [3, 4, 7], // left
    ];
    let faces: Vec<_> = sides
        .iter()
        .map(|&[a, b, c]| mesh.add_face([vs[a], vs[b], vs[c]]).expect("valid face"))
        .collect();

    // Texture the top two faces; the rest stay materialless.
    let m = mesh.add_material();
    mesh.set_texture(m, "cube_top.png").expect("valid material");
    let uv = [
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
    ];
    let uvs: Vec<_> = uv
        .iter()
        .map(|&p| mesh.add_uv(m, p).expect("valid material"))
        .collect();
    mesh.map_face(m, faces[2], [uvs[0], uvs[1], uvs[2]]).expect("valid mapping");
    mesh.map_face(m, faces[3], [uvs[0], uvs[2], uvs[3]]).expect("valid mapping");

    println!(
        "Cube: {} vertices, {} faces, {} material(s)",
        mesh.num_vertices(),
        mesh.num_faces(),
        mesh.num_materials()
    );

    for name in ["cube.idtf", "cube.obj", "cube.ply"] {
        io::save(&mesh, name).expect("export failed");
        println!("Saved {name}");
    }
}
