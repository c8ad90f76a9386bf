//! Premultiplied RGBA8 layer merging.

use crate::foundation::{
    error::{EmojifyError, EmojifyResult},
    math::mul_div255_u16,
};

/// Premultiplied source-over of one pixel, `src` first scaled by `opacity` out of 255.
pub fn over(dst: [u8; 4], src: [u8; 4], opacity: u8) -> [u8; 4] {
    let op = u16::from(opacity);
    let scale = |v: u8| mul_div255_u16(u16::from(v), op) as u8;

    let src_a = scale(src[3]);
    if src_a == 0 {
        return dst;
    }
    let keep = u16::from(255 - src_a);

    let mut out = [0u8; 4];
    for (o, (&d, &s)) in out.iter_mut().zip(dst.iter().zip(&src)) {
        *o = scale(s).saturating_add(mul_div255_u16(u16::from(d), keep) as u8);
    }
    out
}

/// Merge a whole `layer` onto `acc` with [`over`]. Both buffers cover the same canvas.
pub fn over_in_place(acc: &mut [u8], layer: &[u8], opacity: u8) -> EmojifyResult<()> {
    if acc.len() != layer.len() || !acc.len().is_multiple_of(4) {
        return Err(EmojifyError::internal(format!(
            "cannot merge a {}-byte layer onto {} bytes",
            layer.len(),
            acc.len()
        )));
    }
    if opacity == 0 {
        return Ok(());
    }
    for (d, s) in acc.chunks_exact_mut(4).zip(layer.chunks_exact(4)) {
        let merged = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&merged);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
