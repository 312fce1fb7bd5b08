//! WebGPU rendering module
//!
//! The scene builder turns a simulation snapshot into triangles in pixel
//! space; the pipeline uploads and draws them.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_frame;
pub use vertex::Vertex;
