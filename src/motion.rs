//! Expansion of a styled base frame into an ordered animation sequence.

use rayon::prelude::*;

use crate::{
    config::EngineConfig,
    foundation::{
        color::Rgb8,
        error::{EmojifyError, EmojifyResult},
        frame::{FillMask, Frame},
        math::Rng64,
    },
    model::{Intensity, Motion, MotionKind},
    render::raster::{Surface, frame_to_premul, image_paint, premul_to_frame},
};

/// Ordered frames with uniform timing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationSequence {
    /// Frames in playback order, all with the base frame's dimensions.
    pub frames: Vec<Frame>,
    /// Display time of every frame.
    pub duration_ms_per_frame: u32,
    /// Number of plays; `0` loops forever.
    pub loop_count: u32,
}

impl AnimationSequence {
    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the sequence holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Maximum shake displacement per axis, in pixels.
pub fn shake_radius(intensity: Intensity) -> u32 {
    match intensity {
        Intensity::Low => 2,
        Intensity::Medium => 5,
        Intensity::High => 10,
    }
}

/// Peak bounce displacement, in pixels.
pub fn bounce_amplitude(intensity: Intensity) -> f32 {
    match intensity {
        Intensity::Low => 5.0,
        Intensity::Medium => 10.0,
        Intensity::High => 20.0,
    }
}

/// Per-frame `(dx, dy)` jitter drawn from a stream seeded with `seed`.
pub fn shake_offsets(seed: u64, frame_count: u32, radius: u32) -> Vec<(i32, i32)> {
    let mut rng = Rng64::new(seed);
    (0..frame_count)
        .map(|_| {
            let dx = rng.next_i32_symmetric(radius);
            let dy = rng.next_i32_symmetric(radius);
            (dx, dy)
        })
        .collect()
}

/// Vertical displacement of frame `index` out of `frame_count`.
pub fn bounce_offset(index: u32, frame_count: u32, amplitude: f32) -> i32 {
    let phase = std::f32::consts::TAU * index as f32 / frame_count.max(1) as f32;
    (amplitude * phase.sin()).round() as i32
}

/// Whole turns per loop for a speed multiplier; never below one.
pub fn spin_turns(speed: f32) -> u32 {
    speed.round().max(1.0) as u32
}

/// Rotation of frame `index`, in degrees.
pub fn spin_angle_deg(index: u32, frame_count: u32, speed: f32) -> f64 {
    360.0 * f64::from(index) / f64::from(frame_count.max(1)) * f64::from(spin_turns(speed))
}

/// Hue offset of frame `index`, in degrees, `[0, 360)`.
pub fn gaming_hue_offset(index: u32, frame_count: u32) -> f32 {
    360.0 * index as f32 / frame_count.max(1) as f32
}

/// Shift `frame` by whole pixels. Pixels moved off-canvas are dropped; uncovered pixels are
/// transparent.
pub fn translate_frame(frame: &Frame, dx: i32, dy: i32) -> Frame {
    let mut out = Frame::transparent(frame.canvas());
    let w = frame.width as i64;
    let h = frame.height as i64;
    let row_bytes = frame.width as usize * 4;

    // Overlapping column span, identical for every row.
    let src_x0 = (-i64::from(dx)).clamp(0, w);
    let src_x1 = (w - i64::from(dx)).clamp(0, w);
    if src_x0 >= src_x1 {
        return out;
    }
    let dst_x0 = (src_x0 + i64::from(dx)) as usize;
    let span = (src_x1 - src_x0) as usize * 4;

    for sy in 0..h {
        let ty = sy + i64::from(dy);
        if !(0..h).contains(&ty) {
            continue;
        }
        let src = sy as usize * row_bytes + src_x0 as usize * 4;
        let dst = ty as usize * row_bytes + dst_x0 * 4;
        out.pixels[dst..dst + span].copy_from_slice(&frame.pixels[src..src + span]);
    }
    out
}

/// Rotate the hue of every pixel in `mask` by `degrees`; every other pixel is copied unchanged.
pub fn recolor_frame(frame: &Frame, mask: &FillMask, degrees: f32) -> Frame {
    let mut out = frame.clone();
    for (idx, px) in out.pixels.chunks_exact_mut(4).enumerate() {
        if !mask.contains_index(idx) {
            continue;
        }
        let c = Rgb8::new(px[0], px[1], px[2]).rotate_hue(degrees);
        px[0] = c.r;
        px[1] = c.g;
        px[2] = c.b;
    }
    out
}

/// Builds animation sequences with the frame count and timing from an [`EngineConfig`].
#[derive(Clone, Copy, Debug)]
pub struct MotionSynthesizer {
    config: EngineConfig,
}

impl MotionSynthesizer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Produce `frame_count` frames for `motion`, in index order.
    ///
    /// `seed` drives shake jitter. `MotionKind::None` never reaches here and is rejected as an
    /// internal failure.
    #[tracing::instrument(skip(self, frame, mask), fields(kind = ?motion.kind, frames = self.config.frame_count))]
    pub fn synthesize(
        &self,
        frame: &Frame,
        mask: &FillMask,
        motion: &Motion,
        seed: u64,
    ) -> EmojifyResult<AnimationSequence> {
        self.config.validate()?;
        if mask.canvas() != frame.canvas() {
            return Err(EmojifyError::internal("fill mask does not match frame canvas"));
        }
        let n = self.config.frame_count;

        let frames: Vec<Frame> = match motion.kind {
            MotionKind::None => {
                return Err(EmojifyError::internal(
                    "static motion has no animation sequence",
                ));
            }
            MotionKind::Shake => {
                let offsets = shake_offsets(seed, n, shake_radius(motion.intensity));
                offsets
                    .par_iter()
                    .map(|&(dx, dy)| translate_frame(frame, dx, dy))
                    .collect()
            }
            MotionKind::Bounce => {
                let amplitude = bounce_amplitude(motion.intensity);
                (0..n)
                    .into_par_iter()
                    .map(|i| translate_frame(frame, 0, bounce_offset(i, n, amplitude)))
                    .collect()
            }
            MotionKind::Gaming => (0..n)
                .into_par_iter()
                .map(|i| recolor_frame(frame, mask, gaming_hue_offset(i, n)))
                .collect(),
            MotionKind::Spin => self.spin(frame, n, motion.speed)?,
        };

        tracing::debug!(frames = frames.len(), "animation synthesized");
        Ok(AnimationSequence {
            frames,
            duration_ms_per_frame: self.config.frame_duration_ms(),
            loop_count: 0,
        })
    }

    fn spin(&self, frame: &Frame, n: u32, speed: f32) -> EmojifyResult<Vec<Frame>> {
        let canvas = frame.canvas();
        let paint = image_paint(&frame_to_premul(frame), canvas)?;
        let center = vello_cpu::kurbo::Point::new(
            f64::from(canvas.width) / 2.0,
            f64::from(canvas.height) / 2.0,
        );

        (0..n)
            .into_par_iter()
            .map(|i| {
                let angle = spin_angle_deg(i, n, speed).to_radians();
                let mut surface = Surface::new(canvas)?;
                surface.draw_image(
                    &paint,
                    vello_cpu::kurbo::Affine::rotate_about(angle, center),
                );
                premul_to_frame(canvas, &surface.finish())
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/unit/motion.rs"]
mod tests;
