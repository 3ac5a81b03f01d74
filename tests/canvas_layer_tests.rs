use glam::Vec2;
use portfolio_visuals::core::canvas_layer::{BACKDROP_DOWNSCALE, BLOB_COUNT};
use portfolio_visuals::core::{BlobField, Canvas, DisplayContext, DrawOp, LayerLogic, TimedLayer};

// ============================================================================
// Canvas Core Functionality Tests
// ============================================================================

#[test]
fn test_canvas_new() {
    let canvas = Canvas::new(640, 480);
    assert_eq!(canvas.dimensions(), (640, 480));
    assert_eq!(canvas.pixels().len(), 640 * 480 * 4);
    assert_eq!(canvas.alpha().len(), 640 * 480);
}

#[test]
fn test_canvas_clear_opaque() {
    let executed = Canvas::new(100, 100)
        .draw(DrawOp::Clear(255, 128, 64, 255))
        .execute_ops();

    let pixels = executed.pixels();
    assert_eq!(&pixels[0..4], &[255, 128, 64, 255]);
    assert_eq!(executed.alpha()[0], 1.0);

    let last_idx = (100 * 100 - 1) * 4;
    assert_eq!(&pixels[last_idx..last_idx + 4], &[255, 128, 64, 255]);
}

#[test]
fn test_draw_is_deferred_until_execute() {
    let canvas = Canvas::new(4, 4).draw(DrawOp::Clear(10, 20, 30, 255));
    assert!(canvas.pixels().iter().all(|&b| b == 0));

    let executed = canvas.execute_ops();
    assert_eq!(&executed.pixels()[0..4], &[10, 20, 30, 255]);
}

#[test]
fn test_radial_gradient_outside_canvas_is_clipped() {
    let canvas = Canvas::new(10, 10)
        .draw(DrawOp::Clear(0, 0, 0, 255))
        .draw(DrawOp::RadialGradient {
            cx: -50.0,
            cy: -50.0,
            radius: 20.0,
            r: 255,
            g: 255,
            b: 255,
            alpha: 1.0,
        })
        .execute_ops();

    assert!(canvas.pixels().chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
}

#[test]
fn test_transparent_canvas_gains_alpha_from_gradient() {
    let canvas = Canvas::new(3, 3)
        .draw(DrawOp::RadialGradient {
            cx: 1.5,
            cy: 1.5,
            radius: 10.0,
            r: 0,
            g: 255,
            b: 0,
            alpha: 0.7,
        })
        .execute_ops();

    let centre = canvas.alpha()[4];
    assert!(centre > 0.6 && centre <= 0.7);
    assert_eq!(canvas.pixels()[4 * 4 + 1], 255);
}

// ============================================================================
// Blob Backdrop Tests
// ============================================================================

#[test]
fn test_blob_field_moves_with_delta() {
    let mut field = BlobField::new(1280.0, 800.0, 7);
    let before: Vec<Vec2> = field.blobs().iter().map(|b| b.position).collect();

    field.step(1.0 / 60.0);

    for (blob, start) in field.blobs().iter().zip(&before) {
        let moved = blob.position - *start;
        assert!((moved - blob.velocity).length() < 1e-3);
    }
}

#[test]
fn test_blob_field_stays_near_viewport() {
    let mut field = BlobField::new(640.0, 480.0, 21);
    for _ in 0..20_000 {
        field.step(1.0 / 60.0);
    }

    for blob in field.blobs() {
        let margin = blob.radius + blob.velocity.length() + 1.0;
        assert!(blob.position.x > -margin && blob.position.x < 640.0 + margin);
        assert!(blob.position.y > -margin && blob.position.y < 480.0 + margin);
    }
}

#[test]
fn test_different_seeds_differ() {
    let a = BlobField::new(800.0, 600.0, 1);
    let b = BlobField::new(800.0, 600.0, 2);
    assert_eq!(a.blobs().len(), BLOB_COUNT);
    assert_ne!(a.blobs(), b.blobs());
}

#[test]
fn test_paint_scales_to_downscaled_context() {
    let field = BlobField::new(1280.0, 800.0, 3);
    let ctx = DisplayContext::new(1280, 800).downscaled(BACKDROP_DOWNSCALE);
    assert_eq!((ctx.width, ctx.height), (160, 100));

    let canvas = field.paint(&ctx);
    assert_eq!(canvas.dimensions(), (160, 100));
    assert!(canvas.alpha().iter().all(|&a| (a - 1.0).abs() < 1e-6));
}

// ============================================================================
// Timed Layer Tests
// ============================================================================

#[test]
fn test_timed_layer_updates_at_its_own_rate() {
    let mut layer = TimedLayer::new(BlobField::new(800.0, 600.0, 5), 30.0);
    let start = layer.logic().blobs()[0].position;

    assert!(!layer.update(1.0 / 120.0));
    assert_eq!(layer.logic().blobs()[0].position, start);

    assert!(layer.update(1.0 / 30.0));
    assert_ne!(layer.logic().blobs()[0].position, start);
}

#[test]
fn test_layer_logic_update_is_pure() {
    let field = BlobField::new(800.0, 600.0, 5);
    let next = LayerLogic::update(&field, 0.5);
    assert_ne!(field.blobs(), next.blobs());
    assert_eq!(field.blobs(), BlobField::new(800.0, 600.0, 5).blobs());
}

#[test]
fn test_layer_render_matches_context() {
    let layer = TimedLayer::new(BlobField::new(320.0, 240.0, 9), 60.0);
    let ctx = DisplayContext::new(40, 30);
    let out = layer.render(&ctx);
    assert_eq!(out.pixels.len(), ctx.buffer_size());
    assert_eq!(out.alpha.map(|a| a.len()), Some(ctx.pixel_count()));
}
