//! Plain data shared by the physics and scene layers.

pub mod geometry;
pub mod palette;
pub mod shapes;
