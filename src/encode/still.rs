use anyhow::Context;
use image::ImageEncoder as _;

use crate::foundation::{error::EmojifyResult, frame::Frame};

pub(crate) fn encode_webp_lossless(frame: &Frame) -> EmojifyResult<Vec<u8>> {
    let mut out = Vec::new();
    image::codecs::webp::WebPEncoder::new_lossless(&mut out)
        .write_image(
            &frame.pixels,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgba8,
        )
        .context("encode webp")?;
    Ok(out)
}
