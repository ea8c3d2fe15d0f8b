use std::{
    path::Path,
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::decode,
    foundation::error::{SpotdriftError, SpotdriftResult},
};

/// Decoded image ready to draw: premultiplied RGBA8 with known dimensions.
///
/// Handles are cheap to clone and shared read-only; the engine never
/// mutates or re-decodes them.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels, always > 0.
    pub width: u32,
    /// Height in pixels, always > 0.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Build a handle from raw premultiplied pixels (synthetic images,
    /// tests). Validates dimensions and byte length.
    pub fn from_premul_parts(width: u32, height: u32, rgba8_premul: Vec<u8>) -> SpotdriftResult<Self> {
        if width == 0 || height == 0 {
            return Err(SpotdriftError::asset("image width/height must be > 0"));
        }
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(SpotdriftError::asset("image byte length mismatch"));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }
}

/// Load one image source relative to `root`, dispatching raster vs SVG.
pub fn load_image(root: &Path, source: &str) -> SpotdriftResult<PreparedImage> {
    let path = root.join(source);
    let bytes =
        std::fs::read(&path).with_context(|| format!("read image '{}'", path.display()))?;
    if is_svg_source(source, &bytes) {
        decode::decode_svg_image(&bytes)
    } else {
        decode::decode_image(&bytes)
    }
}

/// Load an ordered batch of image sources.
///
/// The result preserves input order. An empty input resolves to an empty
/// batch without error. The batch is all-or-nothing: the first failing
/// source aborts the whole load with the underlying IO/decode reason, so
/// callers never see a partially prepared set.
pub fn load_images(root: impl AsRef<Path>, sources: &[String]) -> SpotdriftResult<Vec<PreparedImage>> {
    let root = root.as_ref();
    let mut out = Vec::with_capacity(sources.len());
    for source in sources {
        out.push(load_image(root, source)?);
    }
    Ok(out)
}

fn is_svg_source(source: &str, bytes: &[u8]) -> bool {
    let by_ext = Path::new(source)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if by_ext {
        return true;
    }
    // Extensionless sources: sniff the XML/SVG preamble.
    let head = &bytes[..bytes.len().min(256)];
    head.trim_ascii_start().starts_with(b"<svg") || head.trim_ascii_start().starts_with(b"<?xml")
}
