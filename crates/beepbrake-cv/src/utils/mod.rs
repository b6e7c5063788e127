//! Utility modules

pub mod image;

pub use self::image::{WorkingBuffer, frame_size};
