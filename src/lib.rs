//! Spotdrift renders a set of images that drift in slow elliptical orbits
//! inside independently placed "wrap" rectangles of one shared drawing
//! surface, each image covered by a moving radial-gradient veil whose
//! transparent hot spot reads as light falling across the image. It is a
//! decorative component for page backgrounds and hero areas, rendered
//! entirely on CPU.
//!
//! # Overview
//!
//! 1. **Prepare**: image sources (raster or SVG) are loaded up front into
//!    [`PreparedImage`] handles: ordered, all-or-nothing, never during a
//!    frame.
//! 2. **Register**: each image+region pairing becomes one item of an
//!    [`Animator`] bound to a surface size; registration order is draw order.
//! 3. **Drive**: the host's frame pump calls [`Animator::tick`] once per
//!    frame between [`Animator::start`] and [`Animator::stop`]; each tick
//!    clears the surface, redraws every item, and advances its phase.
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single-threaded, cooperative**: no per-frame work blocks or suspends;
//!   cancellation only unschedules the next frame.
//! - **Pull-based resize**: items recompute their pixel placement from the
//!   current surface size on every frame, so a live resize rescales orbits
//!   without a separate invalidation path.
//! - **Premultiplied RGBA8** end-to-end.
#![forbid(unsafe_code)]

mod assets;
mod engine;
mod events;
mod foundation;
mod motion;
mod render;
mod scene;

pub use assets::color::ColorDef;
pub use assets::decode::{decode_image, decode_svg_image};
pub use assets::store::{PreparedImage, load_image, load_images};
pub use engine::{Animator, AnimatorConfig, FrameHandle};
pub use events::{ResizeBus, ResizeSubscription};
pub use foundation::core::{Affine, Point, Rect, Rgba8Premul, SurfaceSize, Vec2};
pub use foundation::error::{SpotdriftError, SpotdriftResult};
pub use motion::drift::{Placement, drift_position, resolve_placement};
pub use motion::spotlight::{
    OverlayTile, overlay_rect, render_overlay_tile, spotlight_focal, spotlight_radius,
    veil_coverage,
};
pub use render::FrameRGBA;
pub use render::cpu::{CpuSurface, ImagePaint, ScenePainter};
pub use scene::model::{ItemSpec, Scene, Tuning, WrapRect};
