use crate::foundation::{
    error::{EmojifyError, EmojifyResult},
    frame::Canvas,
};

const ONE_Q16: u32 = 1 << 16;

/// Symmetric 1-D Gaussian with Q16 fixed-point taps.
///
/// Taps always sum to exactly `1 << 16`, so blurring a flat layer leaves it untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GaussianKernel {
    taps: Vec<u32>,
}

impl GaussianKernel {
    pub fn new(radius: u32, sigma: f32) -> EmojifyResult<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(EmojifyError::internal(format!(
                "gaussian sigma must be positive, got {sigma}"
            )));
        }

        let two_sigma_sq = 2.0 * f64::from(sigma).powi(2);
        let r = radius as i64;
        let falloff: Vec<f64> = (-r..=r)
            .map(|i| (-((i * i) as f64) / two_sigma_sq).exp())
            .collect();
        let total: f64 = falloff.iter().sum();

        let mut taps: Vec<u32> = falloff
            .iter()
            .map(|f| (f / total * f64::from(ONE_Q16)).round() as u32)
            .collect();

        // Rounding drift goes to the centre tap.
        let drift = i64::from(ONE_Q16) - taps.iter().map(|&t| i64::from(t)).sum::<i64>();
        let centre = &mut taps[radius as usize];
        *centre = (i64::from(*centre) + drift).clamp(0, i64::from(ONE_Q16)) as u32;

        Ok(Self { taps })
    }

    pub fn radius(&self) -> u32 {
        (self.taps.len() / 2) as u32
    }

    /// Blur a premultiplied RGBA8 layer covering `canvas`. Samples past the edge clamp.
    pub fn apply(&self, canvas: Canvas, layer: &[u8]) -> EmojifyResult<Vec<u8>> {
        if layer.len() != canvas.pixel_count() * 4 {
            return Err(EmojifyError::internal(format!(
                "blur layer is {} bytes, canvas {}x{} needs {}",
                layer.len(),
                canvas.width,
                canvas.height,
                canvas.pixel_count() * 4
            )));
        }
        if self.radius() == 0 {
            return Ok(layer.to_vec());
        }

        let (w, h) = (canvas.width as usize, canvas.height as usize);
        let mut rows = vec![0u8; layer.len()];
        let mut out = vec![0u8; layer.len()];
        self.pass(layer, &mut rows, h, w, (w * 4, 4));
        self.pass(&rows, &mut out, w, h, (4, w * 4));
        Ok(out)
    }

    /// Convolve `lines` lines of `len` pixels each. `stride.0` steps between lines and
    /// `stride.1` between pixels along a line, both in bytes.
    fn pass(&self, src: &[u8], dst: &mut [u8], lines: usize, len: usize, stride: (usize, usize)) {
        let (line_step, px_step) = stride;
        let radius = self.radius() as isize;
        let last = len as isize - 1;

        for line in 0..lines {
            let base = line * line_step;
            for i in 0..len {
                let mut sum = [0u64; 4];
                for (k, &tap) in self.taps.iter().enumerate() {
                    let j = (i as isize + k as isize - radius).clamp(0, last) as usize;
                    let at = base + j * px_step;
                    for (acc, &v) in sum.iter_mut().zip(&src[at..at + 4]) {
                        *acc += u64::from(tap) * u64::from(v);
                    }
                }
                let at = base + i * px_step;
                for (d, acc) in dst[at..at + 4].iter_mut().zip(sum) {
                    *d = ((acc + u64::from(ONE_Q16 / 2)) >> 16).min(255) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
