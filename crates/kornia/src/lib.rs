#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use kornia_image as image;

#[doc(inline)]
pub use kornia_3d as k3d;

#[doc(inline)]
pub use kornia_eval as eval;
