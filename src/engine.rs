use crate::{
    assets::color::ColorDef,
    assets::store::PreparedImage,
    events::{ResizeBus, ResizeSubscription},
    foundation::core::{Point, Rect, SurfaceSize},
    foundation::error::{SpotdriftError, SpotdriftResult},
    motion::drift::{self, Placement},
    motion::spotlight,
    render::FrameRGBA,
    render::cpu::{CpuSurface, ImagePaint, ScenePainter},
    scene::model::{Scene, Tuning, WrapRect},
};

/// Identifies one pending frame-callback registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHandle(u64);

/// Animator construction options.
#[derive(Clone, Debug, Default)]
pub struct AnimatorConfig {
    /// Default illumination tint for items registered without a color.
    pub base_color: ColorDef,
    /// Optional opaque backdrop filled before the items each frame; the
    /// surface clears to transparent without it.
    pub clear_color: Option<ColorDef>,
    pub tuning: Tuning,
}

/// One registered image+region pairing: motion state plus the draw
/// resources cached at registration.
struct DriftItem {
    paint: ImagePaint,
    image_width: u32,
    image_height: u32,
    width_pct: f64,
    wrap: WrapRect,
    /// Straight RGBA tint, resolved against the base color up front.
    tint: [u8; 4],
    phase: f64,
}

impl DriftItem {
    fn placement(&self, surface: SurfaceSize) -> Placement {
        drift::resolve_placement(
            self.width_pct,
            self.wrap,
            self.image_width,
            self.image_height,
            surface,
        )
    }

    /// Draw the fitted image at its current drift position, then the
    /// illumination overlay on top of it.
    fn render(
        &self,
        painter: &mut ScenePainter<'_>,
        surface: SurfaceSize,
        tuning: &Tuning,
    ) -> SpotdriftResult<()> {
        let placement = self.placement(surface);
        let pos = drift::drift_position(&placement, self.phase);
        painter.draw_image(
            &self.paint,
            Rect::new(pos.x, pos.y, pos.x + placement.width, pos.y + placement.height),
        );

        let radius = spotlight::spotlight_radius(placement.width, placement.height);
        let center = Point::new(
            pos.x + placement.width / 2.0,
            pos.y + placement.height / 2.0,
        );
        let focal = spotlight::spotlight_focal(center, radius, self.phase, tuning);
        let tile = spotlight::render_overlay_tile(
            spotlight::overlay_rect(pos, placement.width, placement.height),
            focal,
            radius,
            self.tint,
            tuning.spotlight_power,
        )?;
        painter.draw_overlay(&tile)
    }

    fn advance(&mut self, tuning: &Tuning) {
        self.phase += tuning.phase_step();
    }
}

/// Drives a set of drifting, spotlit items over one shared CPU surface.
///
/// Lifecycle is idle → running → idle: [`Animator::start`] registers a
/// frame callback, every [`Animator::tick`] renders and re-registers,
/// [`Animator::stop`] cancels the pending registration. There is no
/// paused state; phase lives on the items and is never reset, so a start
/// after stop resumes motion where it left off.
pub struct Animator {
    surface_size: SurfaceSize,
    surface: CpuSurface,
    items: Vec<DriftItem>,
    config: AnimatorConfig,
    scheduled: Option<FrameHandle>,
    next_handle: u64,
    resize: Option<ResizeSubscription>,
}

impl Animator {
    pub fn new(surface: SurfaceSize, config: AnimatorConfig) -> SpotdriftResult<Self> {
        config.tuning.validate()?;
        Ok(Self {
            surface_size: surface,
            surface: CpuSurface::new(surface)?,
            items: Vec::new(),
            config,
            scheduled: None,
            next_handle: 0,
            resize: None,
        })
    }

    /// Build an animator from a validated scene plus its prepared images,
    /// one per scene item in order.
    pub fn from_scene(scene: &Scene, images: &[PreparedImage]) -> SpotdriftResult<Self> {
        scene.validate()?;
        if images.len() != scene.items.len() {
            return Err(SpotdriftError::validation(format!(
                "scene has {} items but {} prepared images",
                scene.items.len(),
                images.len()
            )));
        }

        let mut animator = Self::new(
            scene.surface,
            AnimatorConfig {
                base_color: scene.color,
                clear_color: scene.background,
                tuning: scene.tuning,
            },
        )?;
        for (spec, image) in scene.items.iter().zip(images) {
            animator.add_item(image, spec.width_pct, spec.wrap, spec.color)?;
        }
        Ok(animator)
    }

    /// Register one image+region pairing. Later registrations draw on top;
    /// items cannot be removed, only torn down with the animator.
    pub fn add_item(
        &mut self,
        image: &PreparedImage,
        width_pct: f64,
        wrap: WrapRect,
        color: Option<ColorDef>,
    ) -> SpotdriftResult<()> {
        let paint = ImagePaint::from_prepared(image)?;
        let tint = color.unwrap_or(self.config.base_color).to_straight_rgba8();
        self.items.push(DriftItem {
            paint,
            image_width: image.width,
            image_height: image.height,
            width_pct,
            wrap,
            tint,
            phase: 0.0,
        });
        Ok(())
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_running(&self) -> bool {
        self.scheduled.is_some()
    }

    /// Subscribe to surface size notifications for the animator's
    /// lifetime. The subscription is released by [`Animator::destroy`].
    pub fn watch_resize(&mut self, bus: &ResizeBus) {
        self.resize = Some(bus.subscribe());
    }

    /// Track a new surface size directly. Takes effect at the next frame.
    pub fn set_surface_size(&mut self, size: SurfaceSize) {
        self.surface_size = size;
    }

    pub fn surface_size(&self) -> SurfaceSize {
        self.surface_size
    }

    /// Begin the frame loop. A no-op when already running, so a double
    /// start cannot leak a second registration.
    pub fn start(&mut self) {
        if self.scheduled.is_none() {
            self.scheduled = Some(self.issue_handle());
        }
    }

    /// Cancel the pending frame registration. An in-flight tick runs to
    /// completion; nothing is rescheduled after it.
    pub fn stop(&mut self) {
        self.scheduled = None;
    }

    /// Tear down: stop the loop and release the resize subscription.
    pub fn destroy(&mut self) {
        self.stop();
        self.resize = None;
    }

    /// Drive one frame of the host's pump.
    ///
    /// Consumes the pending registration if present: drains resize
    /// notifications, clears the surface, renders every item in
    /// registration order, advances each item's phase, and re-registers
    /// for the next frame. Returns `false`, touching nothing, when the
    /// loop is not running.
    #[tracing::instrument(skip(self))]
    pub fn tick(&mut self) -> SpotdriftResult<bool> {
        if self.scheduled.take().is_none() {
            return Ok(false);
        }

        if let Some(sub) = &self.resize
            && let Some(size) = sub.latest()
        {
            self.surface_size = size;
        }

        self.render_frame()?;
        for item in &mut self.items {
            item.advance(&self.config.tuning);
        }

        self.scheduled = Some(self.issue_handle());
        Ok(true)
    }

    fn render_frame(&mut self) -> SpotdriftResult<()> {
        if self.surface_size.is_zero_area() {
            // Degrade gracefully: keep tracking the size, draw nothing.
            self.surface.ensure(self.surface_size)?;
            return Ok(());
        }

        self.surface.ensure(self.surface_size)?;
        self.surface
            .clear(self.config.clear_color.map(ColorDef::to_rgba8_premul));

        let size = self.surface_size;
        let tuning = self.config.tuning;
        let items = &self.items;
        self.surface.paint_scene(|painter| {
            for (idx, item) in items.iter().enumerate() {
                if let Err(err) = item.render(painter, size, &tuning) {
                    // One bad item must not take down the whole loop.
                    tracing::warn!(item = idx, error = %err, "skipping item render");
                }
            }
            Ok(())
        })
    }

    /// Read back the current surface pixels.
    pub fn frame_rgba(&self) -> FrameRGBA {
        self.surface.frame_rgba()
    }

    /// Offline convenience: ensure the loop is running, render `count`
    /// frames, and collect each readback.
    pub fn capture_frames(&mut self, count: u32) -> SpotdriftResult<Vec<FrameRGBA>> {
        self.start();
        let mut out = Vec::with_capacity(count as usize);
        for _ in 0..count {
            self.tick()?;
            out.push(self.frame_rgba());
        }
        Ok(out)
    }

    fn issue_handle(&mut self) -> FrameHandle {
        self.next_handle += 1;
        FrameHandle(self.next_handle)
    }
}
