use crate::foundation::error::{EmojifyError, EmojifyResult};

/// Fixed pixel dimensions of a render target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Construct a canvas, rejecting empty dimensions.
    pub fn new(width: u32, height: u32) -> EmojifyResult<Self> {
        if width == 0 || height == 0 {
            return Err(EmojifyError::internal("canvas dimensions must be non-zero"));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels covered by this canvas.
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Canvas dimensions narrowed to the `u16` range required by the rasterizer.
    pub(crate) fn as_u16(self) -> EmojifyResult<(u16, u16)> {
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| EmojifyError::internal("canvas width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| EmojifyError::internal("canvas height exceeds u16"))?;
        Ok((w, h))
    }
}

/// A single image: row-major, tightly packed, straight-alpha RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes, `width * height * 4` long.
    pub pixels: Vec<u8>,
}

impl Frame {
    /// A fully transparent frame of the given canvas size.
    pub fn transparent(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            pixels: vec![0; canvas.pixel_count() * 4],
        }
    }

    /// Wrap raw straight RGBA8 bytes, checking the length.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> EmojifyResult<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            return Err(EmojifyError::internal("frame byte length mismatch"));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Canvas dimensions of this frame.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// RGBA of the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.pixels[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Smallest rectangle `(x0, y0, x1, y1)` (exclusive end) holding every pixel with
    /// non-zero alpha, or `None` for a fully transparent frame.
    pub fn opaque_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (i, px) in self.pixels.chunks_exact(4).enumerate() {
            if px[3] == 0 {
                continue;
            }
            let x = (i % self.width as usize) as u32;
            let y = (i / self.width as usize) as u32;
            bounds = Some(match bounds {
                None => (x, y, x + 1, y + 1),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
            });
        }
        bounds
    }
}

/// Exact set of canvas pixels covered by the glyph fill layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FillMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl FillMask {
    /// Build from a premultiplied or straight RGBA8 coverage layer: every pixel with
    /// non-zero alpha is a member.
    pub fn from_alpha(canvas: Canvas, rgba8: &[u8]) -> EmojifyResult<Self> {
        if rgba8.len() != canvas.pixel_count() * 4 {
            return Err(EmojifyError::internal("fill layer byte length mismatch"));
        }
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            bits: rgba8.chunks_exact(4).map(|px| px[3] != 0).collect(),
        })
    }

    /// Canvas the mask was recorded on.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Whether `(x, y)` belongs to the fill layer.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[y as usize * self.width as usize + x as usize]
    }

    /// Whether the pixel with linear index `idx` belongs to the fill layer.
    pub fn contains_index(&self, idx: usize) -> bool {
        self.bits.get(idx).copied().unwrap_or(false)
    }

    /// Number of member pixels.
    pub fn len(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Whether no pixel is a member.
    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|b| *b)
    }
}

pub(crate) fn premul_rgba8(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    let premul = |c: u8| -> u8 { ((u16::from(c) * u16::from(a) + 127) / 255) as u8 };
    [premul(r), premul(g), premul(b), a]
}

pub(crate) fn unpremul_rgba8(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    if a == 0 {
        return [0, 0, 0, 0];
    }
    if a == 255 {
        return [r, g, b, a];
    }
    let unpremul =
        |c: u8| -> u8 { ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8 };
    [unpremul(r), unpremul(g), unpremul(b), a]
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/frame.rs"]
mod tests;
