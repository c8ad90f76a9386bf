//! Rasterization and layering of styled text onto a canvas.

pub mod blur;
pub mod compose;
pub mod composite;
pub(crate) mod raster;
