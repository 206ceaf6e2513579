//! Core data structures for osteoview
//!
//! This crate provides the fundamental types shared by the processing and
//! viewer crates: triangle meshes, point aliases, domain records for
//! measurements/annotations/jobs, and the common error type.

pub mod point;
pub mod mesh;
pub mod traits;
pub mod records;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use traits::*;
pub use records::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};

/// Common result type for osteoview operations
pub type Result<T> = std::result::Result<T, Error>;
