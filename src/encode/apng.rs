use anyhow::Context;

use crate::{
    foundation::error::{EmojifyError, EmojifyResult},
    motion::AnimationSequence,
};

pub(crate) fn encode_apng(seq: &AnimationSequence) -> EmojifyResult<Vec<u8>> {
    let first = seq
        .frames
        .first()
        .ok_or_else(|| EmojifyError::internal("cannot encode an empty animation"))?;
    let (width, height) = (first.width, first.height);
    if seq
        .frames
        .iter()
        .any(|f| f.width != width || f.height != height)
    {
        return Err(EmojifyError::internal("animation frames differ in size"));
    }
    let num_frames: u32 = seq
        .frames
        .len()
        .try_into()
        .map_err(|_| EmojifyError::internal("too many animation frames"))?;
    let delay_ms: u16 = seq
        .duration_ms_per_frame
        .try_into()
        .map_err(|_| EmojifyError::internal("frame duration exceeds u16 milliseconds"))?;

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder
            .set_animated(num_frames, seq.loop_count)
            .context("apng animation control")?;
        encoder
            .set_frame_delay(delay_ms, 1000)
            .context("apng frame delay")?;

        let mut writer = encoder.write_header().context("apng header")?;
        for frame in &seq.frames {
            writer
                .write_image_data(&frame.pixels)
                .context("apng frame data")?;
        }
        writer.finish().context("apng finish")?;
    }
    Ok(out)
}
