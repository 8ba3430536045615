//! Benchmark for the minimap frame path.
//!
//! Run with: cargo bench --package voxmap_rendering --bench minimap_benchmark

use std::time::Instant;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use voxmap_procedural::{base_color, block_registry, ProceduralWorld, StreamingConfig, TerrainConfig};
use voxmap_rendering::cache::{sample_chunk, BuildContext, ChunkTileCache};
use voxmap_rendering::{
    sample_column, CacheConfig, ColorTable, Compositor, MinimapConfig, RasterSurface, RenderSurface,
};
use voxmap_shared::{ChunkCoord, Rgb, Vec3};

fn world() -> ProceduralWorld {
    let mut world = ProceduralWorld::new(TerrainConfig::default(), StreamingConfig::default());
    world.set_player(Vec3::new(0.5, 90.0, 0.5), 0.3);
    world.stream_step();
    world
}

fn table() -> ColorTable {
    let entries = block_registry()
        .iter()
        .filter_map(|def| base_color(def.id).map(|[r, g, b]| (def.id, Rgb::new(r, g, b))))
        .collect::<Vec<_>>();
    ColorTable::from_entries(entries, Rgb::GRAY)
}

fn benchmark_sampling(c: &mut Criterion) {
    let world = world();
    let registry = block_registry();
    let colors = table();

    c.bench_function("sample_column", |b| {
        let mut i = 0i32;
        b.iter(|| {
            i = (i + 1) % 48;
            black_box(sample_column(&world, &registry, black_box(i - 24), black_box(7), 110.0, false))
        });
    });

    let mut group = c.benchmark_group("chunk_tile");
    group.throughput(Throughput::Elements(256));
    group.bench_function("sample_only", |b| {
        b.iter(|| black_box(sample_chunk(&world, &registry, ChunkCoord::new(1, -1), 110.0, false)));
    });
    group.bench_function("sample_and_rasterize", |b| {
        let ctx = BuildContext {
            world: &world,
            registry: &registry,
            colors: &colors,
            scan_y: 110.0,
            show_plants: false,
        };
        b.iter(|| {
            // Radius 0: exactly one chunk built into a tile.
            let mut cache = ChunkTileCache::new(&CacheConfig::default());
            black_box(cache.ensure_loaded(&ctx, ChunkCoord::new(1, -1), 0, Instant::now()))
        });
    });
    group.finish();
}

fn benchmark_frames(c: &mut Criterion) {
    let world = world();
    let config = MinimapConfig::default();

    // Cold: all 49 chunks built inside the frame.
    c.bench_function("frame_cold_cache", |b| {
        b.iter(|| {
            let mut compositor = Compositor::new(&config, table());
            let mut surface = RasterSurface::new(config.viewport.size_px);
            black_box(compositor.render_frame(&world, &mut surface, Instant::now()))
        });
    });

    // Warm: player stays in the same chunk, only blits and the marker.
    let mut compositor = Compositor::new(&config, table());
    let mut surface = RasterSurface::new(config.viewport.size_px);
    compositor.render_frame(&world, &mut surface, Instant::now());
    c.bench_function("frame_warm_cache", |b| {
        b.iter(|| black_box(compositor.render_frame(&world, &mut surface, Instant::now())));
    });

    surface.set_rotation(37.0);
    c.bench_function("present_rotated_200px", |b| {
        b.iter(|| black_box(surface.present()));
    });
}

criterion_group!(benches, benchmark_sampling, benchmark_frames);
criterion_main!(benches);
