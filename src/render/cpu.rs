use std::sync::Arc;

use crate::{
    assets::store::PreparedImage,
    foundation::core::{Affine, Rect, Rgba8Premul, SurfaceSize},
    foundation::error::{SpotdriftError, SpotdriftResult},
    motion::spotlight::OverlayTile,
    render::FrameRGBA,
};

/// CPU drawing surface: a premultiplied RGBA8 pixmap plus per-frame draw
/// plumbing. Exactly one animator owns a surface; nothing else draws to it.
pub struct CpuSurface {
    width: u16,
    height: u16,
    // None while the tracked size has zero area ("context unobtainable").
    pixmap: Option<vello_cpu::Pixmap>,
}

impl CpuSurface {
    pub fn new(size: SurfaceSize) -> SpotdriftResult<Self> {
        let (width, height) = surface_dims_u16(size)?;
        Ok(Self {
            width,
            height,
            pixmap: alloc_pixmap(width, height),
        })
    }

    /// Reallocate backing storage when the tracked size changed.
    pub fn ensure(&mut self, size: SurfaceSize) -> SpotdriftResult<()> {
        let (width, height) = surface_dims_u16(size)?;
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixmap = alloc_pixmap(width, height);
        }
        Ok(())
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(u32::from(self.width), u32::from(self.height))
    }

    /// Fill the whole surface with `clear`, or fully transparent pixels
    /// when no backdrop is set.
    pub fn clear(&mut self, clear: Option<Rgba8Premul>) {
        let Some(pixmap) = &mut self.pixmap else {
            return;
        };
        let bytes = clear.unwrap_or(Rgba8Premul::transparent()).to_bytes();
        for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    /// Run `draw` against a fresh render context and resolve the result
    /// into the pixmap. A zero-area surface silently skips the whole pass.
    pub fn paint_scene<F>(&mut self, draw: F) -> SpotdriftResult<()>
    where
        F: FnOnce(&mut ScenePainter<'_>) -> SpotdriftResult<()>,
    {
        let Some(pixmap) = &mut self.pixmap else {
            return Ok(());
        };

        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        let mut painter = ScenePainter { ctx: &mut ctx };
        draw(&mut painter)?;
        ctx.flush();
        ctx.render_to_pixmap(pixmap);
        Ok(())
    }

    /// Read back the current surface pixels.
    pub fn frame_rgba(&self) -> FrameRGBA {
        let data = match &self.pixmap {
            Some(pixmap) => pixmap.data_as_u8_slice().to_vec(),
            None => Vec::new(),
        };
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data,
            premultiplied: true,
        }
    }
}

/// Draw interface handed to the per-frame scene closure.
pub struct ScenePainter<'a> {
    ctx: &'a mut vello_cpu::RenderContext,
}

impl ScenePainter<'_> {
    /// Draw `paint` scaled from its intrinsic size into `dst`.
    pub fn draw_image(&mut self, paint: &ImagePaint, dst: Rect) {
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        let sx = dst.width() / paint.width;
        let sy = dst.height() / paint.height;
        let transform =
            Affine::translate((dst.x0, dst.y0)) * Affine::scale_non_uniform(sx, sy);
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(paint.image.clone());
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, paint.width, paint.height));
    }

    /// Draw a synthesized overlay tile at its own surface position, 1:1.
    pub fn draw_overlay(&mut self, tile: &OverlayTile) -> SpotdriftResult<()> {
        let paint = ImagePaint::from_premul_bytes(&tile.rgba8_premul, tile.width, tile.height)?;
        self.draw_image(&paint, tile.rect);
        Ok(())
    }
}

/// Reusable CPU paint for decoded pixels, built once per registration.
#[derive(Clone)]
pub struct ImagePaint {
    image: vello_cpu::Image,
    width: f64,
    height: f64,
}

impl ImagePaint {
    pub fn from_prepared(img: &PreparedImage) -> SpotdriftResult<Self> {
        Self::from_premul_bytes(img.rgba8_premul.as_slice(), img.width, img.height)
    }

    /// Wrap raw premultiplied RGBA8 bytes as a paint.
    pub fn from_premul_bytes(bytes: &[u8], width: u32, height: u32) -> SpotdriftResult<Self> {
        let pixmap = premul_bytes_to_pixmap(bytes, width, height)?;
        Ok(Self {
            image: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            width: f64::from(width),
            height: f64::from(height),
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn alloc_pixmap(width: u16, height: u16) -> Option<vello_cpu::Pixmap> {
    if width == 0 || height == 0 {
        return None;
    }
    Some(vello_cpu::Pixmap::new(width, height))
}

fn surface_dims_u16(size: SurfaceSize) -> SpotdriftResult<(u16, u16)> {
    let width: u16 = size
        .width
        .try_into()
        .map_err(|_| SpotdriftError::render("surface width exceeds u16"))?;
    let height: u16 = size
        .height
        .try_into()
        .map_err(|_| SpotdriftError::render("surface height exceeds u16"))?;
    Ok((width, height))
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> SpotdriftResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| SpotdriftError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| SpotdriftError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(SpotdriftError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Point;
    use crate::motion::spotlight;

    fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> PreparedImage {
        let px = Rgba8Premul::from_straight_rgba(rgba[0], rgba[1], rgba[2], rgba[3]);
        let mut bytes = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width * height {
            bytes.extend_from_slice(&px.to_bytes());
        }
        PreparedImage::from_premul_parts(width, height, bytes).unwrap()
    }

    fn pixel(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * frame.width + x) * 4) as usize;
        [
            frame.data[idx],
            frame.data[idx + 1],
            frame.data[idx + 2],
            frame.data[idx + 3],
        ]
    }

    #[test]
    fn clear_fills_backdrop_or_transparent() {
        let mut surface = CpuSurface::new(SurfaceSize::new(4, 4)).unwrap();
        surface.clear(None);
        assert_eq!(pixel(&surface.frame_rgba(), 2, 2), [0, 0, 0, 0]);

        surface.clear(Some(Rgba8Premul::from_straight_rgba(18, 20, 28, 255)));
        assert_eq!(pixel(&surface.frame_rgba(), 2, 2), [18, 20, 28, 255]);
    }

    #[test]
    fn draw_image_scales_into_dst_rect() {
        let mut surface = CpuSurface::new(SurfaceSize::new(8, 8)).unwrap();
        surface.clear(None);
        let paint = ImagePaint::from_prepared(&solid_image(2, 2, [255, 0, 0, 255])).unwrap();
        surface
            .paint_scene(|painter| {
                painter.draw_image(&paint, Rect::new(2.0, 2.0, 6.0, 6.0));
                Ok(())
            })
            .unwrap();

        let frame = surface.frame_rgba();
        assert_eq!(pixel(&frame, 4, 4), [255, 0, 0, 255]);
        assert_eq!(pixel(&frame, 0, 0), [0, 0, 0, 0]);
        assert_eq!(pixel(&frame, 7, 7), [0, 0, 0, 0]);
    }

    #[test]
    fn overlay_draws_at_tile_position() {
        let mut surface = CpuSurface::new(SurfaceSize::new(8, 8)).unwrap();
        surface.clear(None);
        // Degenerate radius: the whole tile takes full tint.
        let tile = spotlight::render_overlay_tile(
            Rect::new(1.0, 1.0, 4.0, 4.0),
            Point::new(100.0, 100.0),
            1.0,
            [0, 0, 255, 255],
            1.0,
        )
        .unwrap();
        surface
            .paint_scene(|painter| painter.draw_overlay(&tile))
            .unwrap();

        let frame = surface.frame_rgba();
        assert_eq!(pixel(&frame, 2, 2), [0, 0, 255, 255]);
        assert_eq!(pixel(&frame, 6, 6), [0, 0, 0, 0]);
    }

    #[test]
    fn zero_area_surface_noops() {
        let mut surface = CpuSurface::new(SurfaceSize::new(0, 100)).unwrap();
        surface.clear(None);
        let called = std::cell::Cell::new(false);
        surface
            .paint_scene(|_| {
                called.set(true);
                Ok(())
            })
            .unwrap();
        assert!(!called.get());
        assert!(surface.frame_rgba().data.is_empty());
    }

    #[test]
    fn rejects_surface_beyond_u16() {
        assert!(CpuSurface::new(SurfaceSize::new(70_000, 100)).is_err());
    }
}
