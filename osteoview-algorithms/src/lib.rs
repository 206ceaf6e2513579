//! # Osteoview Algorithms
//!
//! Pure computation over meshes and images: Laplacian smoothing, surface and
//! volume metrics, displacement heatmaps, and the pre-upload image quality
//! analyzer. Nothing in this crate touches the network or the render loop;
//! every function maps input buffers to output buffers.

pub mod smoothing;
pub mod metrics;
pub mod heatmap;
pub mod quality;

// Re-export commonly used items
pub use smoothing::*;
pub use metrics::*;
pub use heatmap::*;
pub use quality::*;
