pub mod frame;
pub mod image_helper;
pub mod pixel;
pub mod sanity;
pub mod stress;
pub mod vegetation;
