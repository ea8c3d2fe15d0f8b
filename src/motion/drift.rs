use crate::{
    foundation::core::{Point, Rect, SurfaceSize},
    scene::model::WrapRect,
};

/// Pixel-space placement of one item: its wrap rectangle on the surface
/// and the fitted drawn size inside it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Wrap rectangle in surface pixels.
    pub wrap: Rect,
    /// Drawn item width in pixels.
    pub width: f64,
    /// Drawn item height in pixels.
    pub height: f64,
}

/// Resolve percentage layout to surface pixels, scale-fitting the image.
///
/// The target height derives from the surface WIDTH through the image's
/// aspect ratio, never from the surface height. Only a height overflow
/// triggers the aspect-preserving fit-clamp; a width overflow without a
/// height overflow draws past the wrap rectangle horizontally, as given.
///
/// Pure in its inputs: calling it every frame with unchanged dimensions
/// yields identical placements, which is what makes live resize safe
/// without an invalidation path.
pub fn resolve_placement(
    width_pct: f64,
    wrap: WrapRect,
    image_width: u32,
    image_height: u32,
    surface: SurfaceSize,
) -> Placement {
    let sw = f64::from(surface.width);
    let sh = f64::from(surface.height);

    let wrap_x0 = sw * wrap.x0 / 100.0;
    let wrap_y0 = sh * wrap.y0 / 100.0;
    let wrap_w = wrap.width / 100.0 * sw;
    let wrap_h = wrap.height / 100.0 * sh;

    let iw = f64::from(image_width);
    let ih = f64::from(image_height);

    let mut width = width_pct / 100.0 * sw;
    // Height scales off surface width via the image aspect ratio.
    let mut height = (width_pct / iw * ih) / 100.0 * sw;
    if height > wrap_h {
        height = wrap_h;
        width = wrap_h * iw / ih;
    }

    Placement {
        wrap: Rect::new(wrap_x0, wrap_y0, wrap_x0 + wrap_w, wrap_y0 + wrap_h),
        width,
        height,
    }
}

/// Drift position at phase `t`: an ellipse inscribed in the slack space of
/// the wrap rectangle, cosine on x and sine on y, period `2π`.
///
/// Amplitude is `(wrap size − item size) / 2`, so the drawn image touches
/// the wrap edges at the motion extremes and never crosses them.
pub fn drift_position(placement: &Placement, t: f64) -> Point {
    let x = ((placement.wrap.width() - placement.width) / 2.0) * (t.cos() + 1.0)
        + placement.wrap.x0;
    let y = ((placement.wrap.height() - placement.height) / 2.0) * (t.sin() + 1.0)
        + placement.wrap.y0;
    Point::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURFACE: SurfaceSize = SurfaceSize {
        width: 1000,
        height: 800,
    };

    const WRAP: WrapRect = WrapRect {
        x0: 10.0,
        y0: 10.0,
        width: 30.0,
        height: 30.0,
    };

    #[test]
    fn square_image_fits_without_clamp() {
        let p = resolve_placement(20.0, WRAP, 100, 100, SURFACE);
        assert_eq!(p.wrap, Rect::new(100.0, 80.0, 400.0, 320.0));
        assert_eq!(p.width, 200.0);
        assert_eq!(p.height, 200.0);

        let at0 = drift_position(&p, 0.0);
        assert_eq!(at0.x, 200.0); // ((300-200)/2) * 2 + 100
        assert_eq!(at0.y, 100.0); // ((240-200)/2) * 1 + 80

        let at_quarter = drift_position(&p, std::f64::consts::FRAC_PI_2);
        assert!((at_quarter.x - 150.0).abs() < 1e-9);
        assert!((at_quarter.y - 120.0).abs() < 1e-9);
    }

    #[test]
    fn wide_image_height_derives_from_surface_width() {
        // 2:1 image: height is half the target width, not a function of
        // the surface height.
        let p = resolve_placement(20.0, WRAP, 200, 100, SURFACE);
        assert_eq!(p.width, 200.0);
        assert_eq!(p.height, 100.0);
    }

    #[test]
    fn tall_image_clamps_to_wrap_height_preserving_aspect() {
        let p = resolve_placement(20.0, WRAP, 100, 200, SURFACE);
        assert_eq!(p.height, 240.0); // wrap height in px
        assert_eq!(p.width, 120.0);
        assert!((p.width / p.height - 100.0 / 200.0).abs() < 1e-12);
    }

    #[test]
    fn width_overflow_without_height_overflow_is_preserved() {
        // Wrap narrower than the item: no symmetric width clamp exists.
        let wrap = WrapRect {
            x0: 10.0,
            y0: 10.0,
            width: 10.0,
            height: 30.0,
        };
        let p = resolve_placement(20.0, wrap, 200, 100, SURFACE);
        assert_eq!(p.width, 200.0);
        assert!(p.width > p.wrap.width());
    }

    #[test]
    fn motion_stays_inside_wrap_for_all_phases() {
        let p = resolve_placement(20.0, WRAP, 100, 100, SURFACE);
        for i in 0..=1000 {
            let t = (i as f64) * std::f64::consts::TAU / 1000.0;
            let pos = drift_position(&p, t);
            assert!(pos.x >= p.wrap.x0 - 1e-9);
            assert!(pos.x + p.width <= p.wrap.x1 + 1e-9);
            assert!(pos.y >= p.wrap.y0 - 1e-9);
            assert!(pos.y + p.height <= p.wrap.y1 + 1e-9);
        }
    }

    #[test]
    fn resolve_is_idempotent_for_fixed_inputs() {
        let a = resolve_placement(20.0, WRAP, 100, 100, SURFACE);
        let b = resolve_placement(20.0, WRAP, 100, 100, SURFACE);
        assert_eq!(a, b);
    }
}
