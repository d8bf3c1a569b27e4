//! Frame composition: base image, scaled overlay, selection chrome.

use image::RgbaImage;
use image::imageops::{self, FilterType};
use peniko::Color;
use stampink_core::OverlayRect;
use stampink_core::overlay::HANDLE_SIZE;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Compositor errors.
#[derive(Debug, Error)]
pub enum CompositorError {
    #[error("failed to load image {path}: {source}")]
    Load {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Decode an image file into an owned RGBA bitmap.
pub fn load_image(path: &Path) -> Result<RgbaImage, CompositorError> {
    let img = image::open(path).map_err(|source| CompositorError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Composites the editing session into a packed `0x00RRGGBB` frame.
///
/// Owns the base image for the duration of one session (replaced wholesale
/// when the user picks a new file) and the fixed overlay bitmap for the
/// process lifetime. Every [`render`](Self::render) is a full repaint; with
/// unchanged inputs it produces an identical frame.
pub struct Compositor {
    base: Option<RgbaImage>,
    overlay: Option<RgbaImage>,
    /// Overlay rescaled to the last rectangle size, keyed by that size.
    scaled_overlay: Option<(u32, u32, RgbaImage)>,
    frame: Vec<u32>,
    chrome_color: Color,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    /// Create an empty compositor. Nothing renders until a base image is set.
    pub fn new() -> Self {
        Self {
            base: None,
            overlay: None,
            scaled_overlay: None,
            frame: Vec::new(),
            chrome_color: Color::from_rgba8(255, 255, 255, 204),
        }
    }

    /// Set the fixed overlay bitmap. Called once at startup; when it never
    /// arrives (asset missing), frames simply contain no overlay.
    pub fn set_overlay_image(&mut self, image: RgbaImage) {
        self.scaled_overlay = None;
        self.overlay = Some(image);
    }

    /// Replace the base image, starting a new session.
    pub fn set_base_image(&mut self, image: RgbaImage) {
        self.base = Some(image);
    }

    /// Dimensions of the current base image, which are also the frame
    /// dimensions.
    pub fn base_size(&self) -> Option<(u32, u32)> {
        self.base.as_ref().map(|b| (b.width(), b.height()))
    }

    /// Composite a frame: base image at the origin, overlay stretched into
    /// `rect`, and, when `selected`, a translucent border plus the handle
    /// square at the bottom-right corner.
    ///
    /// Returns `None` when no base image is loaded (no-op). The overlay may
    /// extend past the frame edge (resize is not clamped to the canvas) and
    /// gets clipped here.
    pub fn render(&mut self, rect: &OverlayRect, selected: bool) -> Option<&[u32]> {
        let base = self.base.as_ref()?;
        let (fw, fh) = (base.width() as usize, base.height() as usize);
        self.frame.resize(fw * fh, 0);

        for (dst, px) in self.frame.iter_mut().zip(base.pixels()) {
            let [r, g, b, _] = px.0;
            *dst = pack(r, g, b);
        }

        let x = rect.position.x.round() as i64;
        let y = rect.position.y.round() as i64;
        let w = rect.width.round().max(1.0) as u32;
        let h = rect.height.round().max(1.0) as u32;

        if let Some(overlay) = &self.overlay {
            if !matches!(self.scaled_overlay, Some((cw, ch, _)) if cw == w && ch == h) {
                log::trace!("rescaling overlay to {}x{}", w, h);
                let scaled = imageops::resize(overlay, w, h, FilterType::Triangle);
                self.scaled_overlay = Some((w, h, scaled));
            }
            if let Some((_, _, scaled)) = &self.scaled_overlay {
                blit_blended(&mut self.frame, fw, fh, scaled, x, y);
            }
        }

        if selected {
            let c = self.chrome_color.to_rgba8();
            let chrome = (c.r, c.g, c.b, c.a);
            let (w, h) = (w as i64, h as i64);
            // 2 px border centered on the rectangle edges, drawn as four
            // non-overlapping strips.
            fill_blended(&mut self.frame, fw, fh, x - 1, y - 1, w + 2, 2, chrome);
            fill_blended(&mut self.frame, fw, fh, x - 1, y + h - 1, w + 2, 2, chrome);
            fill_blended(&mut self.frame, fw, fh, x - 1, y + 1, 2, h - 2, chrome);
            fill_blended(&mut self.frame, fw, fh, x + w - 1, y + 1, 2, h - 2, chrome);
            // Handle square flush with the bottom-right corner.
            let hs = HANDLE_SIZE as i64;
            fill_blended(&mut self.frame, fw, fh, x + w - hs, y + h - hs, hs, hs, chrome);
        }

        Some(&self.frame)
    }
}

fn pack(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Src-over blend of `(r, g, b, a)` onto an opaque packed pixel.
fn blend(dst: u32, r: u8, g: u8, b: u8, a: u8) -> u32 {
    if a == 255 {
        return pack(r, g, b);
    }
    let (a, ia) = (a as u32, 255 - a as u32);
    let dr = (dst >> 16) & 0xFF;
    let dg = (dst >> 8) & 0xFF;
    let db = dst & 0xFF;
    let or = (r as u32 * a + dr * ia) / 255;
    let og = (g as u32 * a + dg * ia) / 255;
    let ob = (b as u32 * a + db * ia) / 255;
    (or << 16) | (og << 8) | ob
}

/// Blend an RGBA bitmap onto the frame at `(x, y)`, clipped to the frame.
fn blit_blended(frame: &mut [u32], fw: usize, fh: usize, src: &RgbaImage, x: i64, y: i64) {
    for (sy, row) in src.rows().enumerate() {
        let dy = y + sy as i64;
        if dy < 0 || dy >= fh as i64 {
            continue;
        }
        for (sx, px) in row.enumerate() {
            let dx = x + sx as i64;
            if dx < 0 || dx >= fw as i64 {
                continue;
            }
            let [r, g, b, a] = px.0;
            let idx = dy as usize * fw + dx as usize;
            frame[idx] = blend(frame[idx], r, g, b, a);
        }
    }
}

/// Blend a solid rectangle onto the frame, clipped to the frame.
fn fill_blended(
    frame: &mut [u32],
    fw: usize,
    fh: usize,
    x: i64,
    y: i64,
    w: i64,
    h: i64,
    (r, g, b, a): (u8, u8, u8, u8),
) {
    let x0 = x.max(0) as usize;
    let y0 = y.max(0) as usize;
    let x1 = (x + w).clamp(0, fw as i64) as usize;
    let y1 = (y + h).clamp(0, fh as i64) as usize;
    for row in y0..y1 {
        for col in x0..x1 {
            let idx = row * fw + col;
            frame[idx] = blend(frame[idx], r, g, b, a);
        }
    }
}
