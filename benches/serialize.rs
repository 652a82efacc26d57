//! Benchmarks for index building and emission.

use criterion::{criterion_group, criterion_main, Criterion};
use meshport::prelude::*;
use nalgebra::{Point2, Point3};

fn create_grid_mesh(n: usize, textured: bool) -> TriMesh {
    let mut mesh = TriMesh::new();
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));

    // Create grid vertices
    for j in 0..=n {
        for i in 0..=n {
            vertices.push(mesh.add_vertex(Point3::new(i as f64, j as f64, 0.0)));
        }
    }

    let material = textured.then(|| mesh.add_material());

    // Create triangles, two per cell
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            let f0 = mesh.add_face([vertices[v00], vertices[v10], vertices[v11]]).unwrap();
            let f1 = mesh.add_face([vertices[v00], vertices[v11], vertices[v01]]).unwrap();

            if let Some(m) = material {
                let mut uv = |v: usize| {
                    let x = (v % (n + 1)) as f64 / n as f64;
                    let y = (v / (n + 1)) as f64 / n as f64;
                    mesh.add_uv(m, Point2::new(x, y)).unwrap()
                };
                let (u00, u10, u01, u11) = (uv(v00), uv(v10), uv(v01), uv(v11));
                mesh.map_face(m, f0, [u00, u10, u11]).unwrap();
                mesh.map_face(m, f1, [u00, u11, u01]).unwrap();
            }
        }
    }

    mesh
}

fn bench_build_index(c: &mut Criterion) {
    let plain = create_grid_mesh(50, false);
    let textured = create_grid_mesh(50, true);

    c.bench_function("build_index_grid_50x50", |b| {
        b.iter(|| SerializationIndex::build(&plain, SubMesh::All).unwrap());
    });

    c.bench_function("build_index_grid_50x50_textured", |b| {
        let material = textured.material_ids().next().unwrap();
        b.iter(|| SerializationIndex::build(&textured, SubMesh::Material(material)).unwrap());
    });
}

fn bench_emit(c: &mut Criterion) {
    let mesh = create_grid_mesh(50, true);
    let material = mesh.material_ids().next().unwrap();
    let index = SerializationIndex::build(&mesh, SubMesh::Material(material)).unwrap();
    let options = EmitOptions::default();

    c.bench_function("emit_grid_50x50_textured", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(1 << 20);
            index.emit(&mesh, &options, &mut out).unwrap();
            out
        });
    });
}

criterion_group!(benches, bench_build_index, bench_emit);
criterion_main!(benches);
