use crate::{
    foundation::core::{Point, Rect, Rgba8Premul},
    foundation::error::{SpotdriftError, SpotdriftResult},
    scene::model::Tuning,
};

/// Radius of the illumination gradient for a drawn size of `(width, height)`.
pub fn spotlight_radius(width: f64, height: f64) -> f64 {
    width.min(height) / 2.0
}

/// Focal point of the hot spot at phase `t`.
///
/// Orbits the drawn image center at `radius × spotlight_range`, with its
/// own angular speed, so the light moves independently of the image's
/// positional drift.
pub fn spotlight_focal(center: Point, radius: f64, t: f64, tuning: &Tuning) -> Point {
    let angle = t * tuning.rotation_speed;
    Point::new(
        center.x + radius * tuning.spotlight_range * angle.cos(),
        center.y + radius * tuning.spotlight_range * angle.sin(),
    )
}

/// Overlay bounds for an item drawn at `pos` with size `(width, height)`:
/// the drawn rect with a one-pixel outward bleed so the veil seals the
/// image edges without seams.
pub fn overlay_rect(pos: Point, width: f64, height: f64) -> Rect {
    Rect::new(
        pos.x - 1.0,
        pos.y - 1.0,
        pos.x - 1.0 + width.ceil() + 1.0,
        pos.y - 1.0 + height.ceil() + 1.0,
    )
}

/// Veil coverage at ramp `offset`.
///
/// The ramp runs from the outer gradient circle inward: offset 0 sits on
/// (and beyond) the circle at the gradient radius, offset 1 is the focal
/// point. Coverage is 1 through the plateau `[0, 1 − power]`, then fades
/// linearly to 0 at the focal point. With `power = 1` the plateau
/// collapses and the whole ramp is a linear fade.
pub fn veil_coverage(offset: f64, power: f64) -> f64 {
    let plateau = 1.0 - power;
    if offset <= plateau || power <= 0.0 {
        return 1.0;
    }
    ((1.0 - offset) / power).clamp(0.0, 1.0)
}

fn ramp_offset(dist: f64, radius: f64) -> f64 {
    if radius <= 0.0 {
        return 0.0;
    }
    (1.0 - dist / radius).clamp(0.0, 1.0)
}

/// Veil pixel for straight `tint` at the given coverage: channels fade in
/// straight alpha toward fully transparent, then premultiply. This matches
/// two-stop gradient interpolation against a transparent end color.
fn veil_pixel(tint: [u8; 4], coverage: f64) -> Rgba8Premul {
    let a = (f64::from(tint[3]) * coverage).round().clamp(0.0, 255.0) as u8;
    let premul = |c: u8| -> u8 {
        let straight = f64::from(c) * coverage;
        (straight * f64::from(a) / 255.0).round().clamp(0.0, 255.0) as u8
    };
    Rgba8Premul {
        r: premul(tint[0]),
        g: premul(tint[1]),
        b: premul(tint[2]),
        a,
    }
}

/// Synthesized illumination overlay covering one item's drawn bounds.
#[derive(Clone, Debug)]
pub struct OverlayTile {
    /// Tile origin and extent in surface pixels (integral sizes).
    pub rect: Rect,
    pub width: u32,
    pub height: u32,
    /// Row-major premultiplied RGBA8, `width × height`.
    pub rgba8_premul: Vec<u8>,
}

/// Rasterize the radial veil ramp into a tile positioned at `rect`.
///
/// Each pixel samples the ramp at its center against the focal point;
/// pixels on or beyond the gradient radius take full tint (the pad color
/// of the outer circle).
pub fn render_overlay_tile(
    rect: Rect,
    focal: Point,
    radius: f64,
    tint: [u8; 4],
    power: f64,
) -> SpotdriftResult<OverlayTile> {
    let width = rect.width().max(0.0).round() as u32;
    let height = rect.height().max(0.0).round() as u32;

    // Avoid pathological allocations for absurd item sizes; anything this
    // large could not become a surface pixmap either.
    const MAX_DIM: u32 = 16_384;
    if width > MAX_DIM || height > MAX_DIM {
        return Err(SpotdriftError::render(format!(
            "overlay tile too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let mut bytes = vec![0u8; width as usize * height as usize * 4];

    for y in 0..height {
        let py = rect.y0 + f64::from(y) + 0.5;
        for x in 0..width {
            let px = rect.x0 + f64::from(x) + 0.5;
            let dist = (px - focal.x).hypot(py - focal.y);
            let coverage = veil_coverage(ramp_offset(dist, radius), power);
            let pixel = veil_pixel(tint, coverage);
            let idx = (y as usize * width as usize + x as usize) * 4;
            bytes[idx..idx + 4].copy_from_slice(&pixel.to_bytes());
        }
    }

    Ok(OverlayTile {
        rect,
        width,
        height,
        rgba8_premul: bytes,
    })
}
