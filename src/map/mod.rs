pub mod geometry;
pub mod projection;
pub mod renderer;

pub use projection::{Projection, Viewport};
pub use renderer::{MapRenderer, PatchStyle, PolygonBatch, Region, Ring, StyleInput};
