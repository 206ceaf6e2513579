//! # Osteoview Viewer
//!
//! Orchestration layer for the interactive 3D model viewer: camera framing
//! presets, the measurement toolkit state machine, input-to-action mapping,
//! scene-node traversal, the annotation cache, and the viewer state that ties
//! processing parameters to derived geometry.
//!
//! Rendering itself is out of scope; this crate produces the buffers and
//! camera state a renderer consumes.

pub mod camera;
pub mod measure;
pub mod input;
pub mod scene;
pub mod annotations;
pub mod orchestrator;

pub use camera::*;
pub use measure::*;
pub use input::*;
pub use scene::*;
pub use annotations::*;
pub use orchestrator::*;
