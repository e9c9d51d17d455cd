//! Benchmarks for STL codec operations.
//!
//! Run with: cargo bench -p stl-codec
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p stl-codec -- --save-baseline main
//! 2. After changes: cargo bench -p stl-codec -- --baseline main

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::io::Cursor;

use facet_types::{FacetMesh, Point3};
use stl_codec::{decode, encode, StlFormat};

/// Build a flat grid of quads as a facet soup.
fn create_grid_mesh(cells: u32) -> FacetMesh {
    let mut mesh = FacetMesh::with_capacity((cells * cells * 2) as usize);
    for y in 0..cells {
        for x in 0..cells {
            let (x0, y0) = (x as f32, y as f32);
            let (x1, y1) = (x0 + 1.0, y0 + 1.0);
            let z = f32::midpoint(x0, y0).sin();
            mesh.push_quad([
                Point3::new(x0, y0, z),
                Point3::new(x1, y0, z),
                Point3::new(x1, y1, z),
                Point3::new(x0, y1, z),
            ]);
        }
    }
    mesh
}

fn encoded_bytes(mesh: &FacetMesh, format: StlFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    encode(mesh, format, &mut bytes).expect("encode failed");
    bytes
}

fn bench_encode(c: &mut Criterion) {
    let mesh = create_grid_mesh(64);
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Elements(mesh.facet_count() as u64));

    group.bench_function("binary", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            encode(black_box(&mesh), StlFormat::Binary, &mut out).expect("encode failed");
            out
        });
    });
    group.bench_function("ascii", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            encode(black_box(&mesh), StlFormat::Ascii, &mut out).expect("encode failed");
            out
        });
    });
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mesh = create_grid_mesh(64);
    let binary = encoded_bytes(&mesh, StlFormat::Binary);
    let ascii = encoded_bytes(&mesh, StlFormat::Ascii);

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(mesh.facet_count() as u64));

    group.bench_function("binary", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new(black_box(binary.as_slice()));
            decode(&mut cursor).expect("decode failed")
        });
    });
    group.bench_function("ascii", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new(black_box(ascii.as_slice()));
            decode(&mut cursor).expect("decode failed")
        });
    });
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
