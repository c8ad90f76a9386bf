pub mod color;
pub mod error;
pub mod frame;
pub(crate) mod math;
