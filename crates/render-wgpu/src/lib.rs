//! wgpu render backend for the flyview demo.
//!
//! Draws the cube scene with a single textured, lit pipeline. Projection and
//! view are uploaded once per frame; every cube gets its own model matrix
//! and draw call.
//!
//! # Invariants
//! - The renderer never mutates camera or scene state.
//! - Shader compile and pipeline mismatches surface as `RenderError`, not device panics.
//! - Model data never exceeds the device's `max_buffer_size`.

mod error;
mod mesh;
mod renderer;
mod shaders;
mod texture;

pub use error::RenderError;
pub use mesh::{GpuMesh, MeshData, Vertex};
pub use renderer::{CLEAR_COLOR, CUBE_SIZE, CubeRenderer, align_to, model_capacity};
pub use shaders::{CUBE_SHADER, FRAGMENT_ENTRY, Shader, VERTEX_ENTRY, read_source};
pub use texture::{DEPTH_FORMAT, Texture, checkerboard};
