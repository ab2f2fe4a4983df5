//! glmat Core Library - transform math for WebGL-style scenes
//!
//! Stateless construction of the 3x3 and 4x4 matrices a frame needs
//! (translation, rotation, scale, projection, look-at, inversion), the
//! fixed order they are composed in, and the scene parameters that feed
//! them. All matrices are row-major and act on row vectors, matching
//! `uniformMatrix4fv(location, false, matrix)`.

pub mod camera;
pub mod error;
pub mod geometry;
pub mod mat3;
pub mod mat4;
pub mod params;
pub mod scene;
pub mod vector;

// Re-export commonly used types
pub use camera::{Camera, Lens, OrbitCamera, ProjectionMode};
pub use error::{Error, ParamError, Result};
pub use geometry::{Mesh, Triangle, Vertex};
pub use mat3::Mat3;
pub use mat4::Mat4;
pub use scene::{RotationOrder, Scene, Scene2DParams, SceneParams};
