#![deny(missing_docs)]
//! Dense image containers for depth maps, masks and flow fields

/// image representation for computer vision purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
