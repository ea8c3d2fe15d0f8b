use spotdrift::{
    Animator, AnimatorConfig, PreparedImage, ResizeBus, Rgba8Premul, Scene, SurfaceSize, Tuning,
    WrapRect, load_images,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> PreparedImage {
    let px = Rgba8Premul::from_straight_rgba(rgba[0], rgba[1], rgba[2], rgba[3]);
    let mut bytes = Vec::with_capacity(width as usize * height as usize * 4);
    for _ in 0..width * height {
        bytes.extend_from_slice(&px.to_bytes());
    }
    PreparedImage::from_premul_parts(width, height, bytes).unwrap()
}

fn wrap(x0: f64, y0: f64, width: f64, height: f64) -> WrapRect {
    WrapRect {
        x0,
        y0,
        width,
        height,
    }
}

#[test]
fn loop_starts_renders_and_stops() {
    init_tracing();
    let mut animator =
        Animator::new(SurfaceSize::new(200, 200), AnimatorConfig::default()).unwrap();
    animator
        .add_item(
            &solid_image(4, 4, [255, 255, 255, 255]),
            30.0,
            wrap(10.0, 10.0, 60.0, 60.0),
            None,
        )
        .unwrap();

    assert!(!animator.tick().unwrap());

    animator.start();
    assert!(animator.tick().unwrap());
    assert!(animator.frame_rgba().data.iter().any(|&b| b != 0));

    animator.stop();
    let before = animator.frame_rgba();
    assert!(!animator.tick().unwrap());
    assert_eq!(animator.frame_rgba().data, before.data);
}

#[test]
fn empty_image_batch_yields_running_engine_with_zero_items() {
    init_tracing();
    let images = load_images(".", &[]).unwrap();
    assert!(images.is_empty());

    let scene = Scene {
        surface: SurfaceSize::new(64, 64),
        color: spotdrift::ColorDef::default(),
        background: None,
        tuning: Tuning::default(),
        items: Vec::new(),
    };
    let mut animator = Animator::from_scene(&scene, &images).unwrap();
    assert_eq!(animator.item_count(), 0);

    let frames = animator.capture_frames(2).unwrap();
    assert_eq!(frames.len(), 2);
    assert!(frames[1].data.iter().all(|&b| b == 0));
}

#[test]
fn resize_notifications_rescale_the_surface() {
    init_tracing();
    let bus = ResizeBus::new();
    let mut animator =
        Animator::new(SurfaceSize::new(100, 100), AnimatorConfig::default()).unwrap();
    animator
        .add_item(
            &solid_image(2, 2, [0, 0, 255, 255]),
            20.0,
            wrap(0.0, 0.0, 50.0, 50.0),
            None,
        )
        .unwrap();
    animator.watch_resize(&bus);
    animator.start();
    animator.tick().unwrap();

    bus.publish(SurfaceSize::new(160, 90));
    animator.tick().unwrap();

    let frame = animator.frame_rgba();
    assert_eq!((frame.width, frame.height), (160, 90));
    assert_eq!(frame.data.len(), 160 * 90 * 4);
}

#[test]
fn destroyed_animator_ignores_later_publishes_and_ticks() {
    init_tracing();
    let bus = ResizeBus::new();
    let mut animator =
        Animator::new(SurfaceSize::new(80, 80), AnimatorConfig::default()).unwrap();
    animator.watch_resize(&bus);
    animator.start();
    animator.tick().unwrap();

    animator.destroy();
    bus.publish(SurfaceSize::new(400, 400));
    assert!(!animator.tick().unwrap());
    assert_eq!(animator.surface_size(), SurfaceSize::new(80, 80));
}
