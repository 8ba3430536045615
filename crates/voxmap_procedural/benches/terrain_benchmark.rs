//! Benchmark for terrain generation and host block reads.
//!
//! Run with: cargo bench --package voxmap_procedural --bench terrain_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use voxmap_procedural::{ProceduralWorld, SimplexNoise, StreamingConfig, TerrainConfig, TerrainGenerator, WorldSeed};
use voxmap_shared::{ChunkCoord, WorldAccessor};

fn benchmark_noise(c: &mut Criterion) {
    let noise = SimplexNoise::new(WorldSeed::new(42));

    c.bench_function("simplex_fbm_5_octaves", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 1.0;
            black_box(noise.fbm(black_box(x * 0.008), black_box(x * 0.005), 5, 0.5, 2.0))
        });
    });
}

fn benchmark_chunk_generation(c: &mut Criterion) {
    let gen = TerrainGenerator::new(TerrainConfig::default());

    let mut group = c.benchmark_group("chunk_generation");
    group.throughput(Throughput::Elements(1));
    group.bench_function("single_chunk", |b| {
        let mut i = 0i32;
        b.iter(|| {
            i = i.wrapping_add(1);
            black_box(gen.generate(ChunkCoord::new(i, -i / 3)))
        });
    });

    // Full streaming window around a player: 9x9 chunks
    group.throughput(Throughput::Elements(81));
    group.bench_function("stream_window_radius_4", |b| {
        b.iter(|| {
            let mut world = ProceduralWorld::new(TerrainConfig::default(), StreamingConfig::default());
            world.spawn_player(0.0, 0.0, 0.0);
            black_box(world.stream_step())
        });
    });
    group.finish();
}

fn benchmark_block_reads(c: &mut Criterion) {
    let mut world = ProceduralWorld::new(TerrainConfig::default(), StreamingConfig::default());
    world.spawn_player(0.0, 0.0, 0.0);
    world.stream_step();

    c.bench_function("block_at_column_walk", |b| {
        b.iter(|| {
            let mut found = 0u32;
            for y in (0..90).rev() {
                if !world.block_at(black_box(7), y, black_box(-9)).is_air() {
                    found += 1;
                }
            }
            black_box(found)
        });
    });
}

criterion_group!(benches, benchmark_noise, benchmark_chunk_generation, benchmark_block_reads);
criterion_main!(benches);
