//! Transformation module.
//!
//! - Assembler: parsed sections and steps into the course tree
//! - Pipeline: the end-to-end conversion run

pub mod assembler;
pub mod pipeline;

pub use assembler::{assemble, CourseBuilder};
pub use pipeline::*;
