//! # Demo Walk Integration Test
//!
//! The scripted walk renders every frame, colors every textured block from
//! its stand-in texture and leaves the marker at the center of a round map.

use voxmap::rendering::MinimapConfig;
use voxmap::{run_demo, DemoConfig, WalkConfig};

fn short_walk(frames: u32) -> DemoConfig {
    DemoConfig {
        walk: WalkConfig {
            frames,
            output: None,
            ..WalkConfig::default()
        },
        ..DemoConfig::default()
    }
}

#[tokio::test]
async fn test_walk_draws_every_frame() {
    let summary = run_demo(&MinimapConfig::default(), &short_walk(40)).await.unwrap();

    assert_eq!(summary.frames, 40);
    assert_eq!(summary.drawn, 40);
    // Ten generated blocks; the flower ships without a texture.
    assert_eq!(summary.table.resolved, 9);
    assert_eq!(summary.table.unresolved, 1);
    assert_eq!(summary.table.failed, 0);
    assert!(summary.tiles_cached >= 49);
}

#[tokio::test]
async fn test_final_frame_is_round_with_marker() {
    let minimap = MinimapConfig::default();
    let summary = run_demo(&minimap, &short_walk(10)).await.unwrap();
    let size = minimap.viewport.size_px;

    assert_eq!(summary.image.dimensions(), (size, size));
    assert_eq!(summary.image.get_pixel(size / 2, size / 2).0, [255, 255, 255, 255]);
    assert_eq!(summary.image.get_pixel(0, 0).0[3], 0);
    assert_eq!(summary.image.get_pixel(size - 1, size - 1).0[3], 0);
}

#[tokio::test]
async fn test_slow_streaming_still_fills_in() {
    let mut demo = short_walk(120);
    demo.streaming.chunks_per_step = 2;
    demo.walk.speed = 0.0;
    let summary = run_demo(&MinimapConfig::default(), &demo).await.unwrap();

    // Two chunks per step fill the 81-chunk host radius long before the end.
    assert_eq!(summary.chunks_streamed, 81);
    assert_eq!(summary.drawn, 120);
}
