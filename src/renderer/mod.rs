//! WebGPU rendering
//!
//! The render pass reads simulation state and writes pixels, nothing else.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::{Vertex, colors};
