//! WebGPU rendering module
//!
//! Uses SDF (Signed Distance Fields) for all rendering in the fragment shader.
//! The simulation is mirrored into a retained `Scene` through `SceneSync`.

pub mod scene;
pub mod sdf_pipeline;
pub mod viewport;

pub use scene::{Circle, RenderSurface, Scene, SceneSync};
pub use sdf_pipeline::SdfRenderState;
pub use viewport::Viewport;
